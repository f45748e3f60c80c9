//! Field schema: the definition of a single input within a workflow template.

use serde::{Deserialize, Serialize};

/// The input type of a field, driving both rendering and validation.
///
/// This is a closed sum: every dispatch site matches exhaustively, and
/// schemas authored with a type tag this build does not know about land on
/// [`FieldType::Unknown`], which behaves like plain text. Unknown types
/// degrade gracefully, they are never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Email,
    Date,
    File,
    /// Single choice from `validation.options` (`"dropdown"` in older
    /// template snapshots).
    #[serde(alias = "dropdown")]
    Select,
    Multiselect,
    #[serde(other)]
    Unknown,
}

impl Default for FieldType {
    fn default() -> Self {
        FieldType::Text
    }
}

/// Type-dependent constraint bag for a field.
///
/// Constraints irrelevant to the field's type are ignored by validation,
/// never an error — a `pattern` on a `number` field is simply dead weight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationRules {
    // Numeric fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,

    // String fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    // File fields. `file_types` entries may be extensions (".pdf") or bare
    // tokens ("pdf"); `max_file_size` is in megabytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<f64>,

    // Choice fields (select / multiselect).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// One form input definition within a workflow template.
///
/// Owned by its parent template; fields have no independent lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    /// Opaque unique identifier, assigned at authoring time, immutable.
    pub id: String,
    /// Machine key used as the form-state key and request payload key.
    /// Derived from `label` when not explicitly set (see [`Self::key`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Human-readable caption.
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "ValidationRules::is_empty")]
    pub validation: ValidationRules,
    /// File fields only: render an inline preview of the accepted file.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub visualize_file: bool,
}

impl ValidationRules {
    /// True when no constraint is set (used to keep serialized templates lean).
    pub fn is_empty(&self) -> bool {
        *self == ValidationRules::default()
    }
}

impl FieldSchema {
    /// The key this field's value travels under in form state and request
    /// payloads: the explicit `name` when set, otherwise the label
    /// lowercased with spaces turned into underscores.
    pub fn key(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => self.label.to_lowercase().replace(' ', "_"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_prefers_explicit_name() {
        let field = FieldSchema {
            id: "f1".into(),
            name: Some("cvFile".into()),
            label: "Upload CV".into(),
            field_type: FieldType::File,
            placeholder: None,
            required: true,
            default_value: None,
            validation: ValidationRules::default(),
            visualize_file: false,
        };
        assert_eq!(field.key(), "cvFile");
    }

    #[test]
    fn key_derives_from_label() {
        let field = FieldSchema {
            id: "f1".into(),
            name: None,
            label: "Describe your IT issue".into(),
            field_type: FieldType::Textarea,
            placeholder: None,
            required: true,
            default_value: None,
            validation: ValidationRules::default(),
            visualize_file: false,
        };
        assert_eq!(field.key(), "describe_your_it_issue");
    }

    #[test]
    fn dropdown_alias_deserializes_as_select() {
        let json = r#"{"id": "f", "label": "Pick one", "type": "dropdown"}"#;
        let field: FieldSchema = serde_json::from_str(json).unwrap();
        assert_eq!(field.field_type, FieldType::Select);
    }

    #[test]
    fn unknown_type_tag_degrades_to_unknown_variant() {
        let json = r#"{"id": "f", "label": "Mystery", "type": "starsign"}"#;
        let field: FieldSchema = serde_json::from_str(json).unwrap();
        assert_eq!(field.field_type, FieldType::Unknown);
    }

    #[test]
    fn irrelevant_validation_keys_are_kept_but_harmless() {
        // A pattern on a number field deserializes fine; validate.rs ignores it.
        let json = r#"{
            "id": "f", "label": "Count", "type": "number",
            "validation": {"min": 1, "pattern": "^x$"}
        }"#;
        let field: FieldSchema = serde_json::from_str(json).unwrap();
        assert_eq!(field.validation.min, Some(1.0));
        assert_eq!(field.validation.pattern.as_deref(), Some("^x$"));
    }
}
