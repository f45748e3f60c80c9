//! Synchronous, local field validation — the gate between raw user input and
//! form state.
//!
//! Nothing in this module touches the network: every check operates on the
//! candidate value and the field's own `validation` bag. Rejected input never
//! enters form state, so validation errors are fully recovered here and never
//! reach the executor.

use std::sync::OnceLock;

use crate::error::CoreError;
use crate::field::{FieldSchema, FieldType};
use crate::template::{WorkflowTemplate, MAX_DESCRIPTION_LEN, MAX_WORKFLOW_NAME_LEN};
use crate::value::{FieldValue, FileUpload, FormData};

/* --------------------------------------------------------------------------
   Template authoring validation
   -------------------------------------------------------------------------- */

/// Validate a workflow name: non-blank and within length limit.
pub fn validate_workflow_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Workflow name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_WORKFLOW_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Workflow name too long: {} chars (max {MAX_WORKFLOW_NAME_LEN})",
            name.len()
        )));
    }
    Ok(())
}

/// Validate a workflow description length.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "Description too long: {} chars (max {MAX_DESCRIPTION_LEN})",
            description.len()
        )));
    }
    Ok(())
}

/// Validate a field list at authoring time.
///
/// Catches template-authoring mistakes (`min > max`, empty labels, regex
/// patterns that do not compile) when the template is saved, so they are
/// never a runtime concern for the renderer.
pub fn validate_fields(fields: &[FieldSchema]) -> Result<(), CoreError> {
    for field in fields {
        if field.label.is_empty() {
            return Err(CoreError::Validation(format!(
                "Field '{}' has an empty label",
                field.id
            )));
        }
        let v = &field.validation;
        if let (Some(min), Some(max)) = (v.min, v.max) {
            if min > max {
                return Err(CoreError::Validation(format!(
                    "Field '{}': min ({min}) exceeds max ({max})",
                    field.label
                )));
            }
        }
        if let (Some(min), Some(max)) = (v.min_length, v.max_length) {
            if min > max {
                return Err(CoreError::Validation(format!(
                    "Field '{}': minLength ({min}) exceeds maxLength ({max})",
                    field.label
                )));
            }
        }
        if let Some(pattern) = &v.pattern {
            if regex::Regex::new(pattern).is_err() {
                return Err(CoreError::Validation(format!(
                    "Field '{}': invalid pattern '{pattern}'",
                    field.label
                )));
            }
        }
        if let Some(size) = v.max_file_size {
            if size <= 0.0 {
                return Err(CoreError::Validation(format!(
                    "Field '{}': maxFileSize must be positive",
                    field.label
                )));
            }
        }
    }
    Ok(())
}

/* --------------------------------------------------------------------------
   Raw input coercion
   -------------------------------------------------------------------------- */

/// A submitted value before coercion: either text or an uploaded file.
#[derive(Debug, Clone)]
pub enum RawValue {
    Text(String),
    File(FileUpload),
}

fn email_regex() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex"))
}

/// Coerce and validate one submitted value against its field schema.
///
/// Dispatches purely on `field.type`; an [`FieldType::Unknown`] tag falls
/// back to plain text handling. Constraints irrelevant to the type are
/// ignored. Returns the typed value that may enter form state, or a
/// validation error describing why the input was rejected.
pub fn coerce_field(field: &FieldSchema, raw: RawValue) -> Result<FieldValue, CoreError> {
    match (field.field_type, raw) {
        (FieldType::File, RawValue::File(file)) => accept_file(field, file),
        (FieldType::File, RawValue::Text(_)) => Err(CoreError::Validation(format!(
            "Field '{}' expects a file upload",
            field.label
        ))),
        // File-typed fields were handled above, so any other field type
        // receiving an upload is a mismatch.
        (_, RawValue::File(_)) => Err(CoreError::Validation(format!(
            "Field '{}' does not accept a file",
            field.label
        ))),
        (FieldType::Number, RawValue::Text(text)) => accept_number(field, &text),
        (FieldType::Email, RawValue::Text(text)) => accept_email(field, text),
        (FieldType::Date, RawValue::Text(text)) => accept_date(field, &text),
        (FieldType::Select, RawValue::Text(text)) => accept_choice(field, text),
        (FieldType::Multiselect, RawValue::Text(text)) => accept_choices(field, &text),
        // text / textarea / unknown all behave as plain text.
        (_, RawValue::Text(text)) => accept_text(field, text),
    }
}

fn accept_text(field: &FieldSchema, text: String) -> Result<FieldValue, CoreError> {
    let v = &field.validation;
    if let Some(min) = v.min_length {
        if text.chars().count() < min {
            return Err(CoreError::Validation(format!(
                "Field '{}' must be at least {min} characters",
                field.label
            )));
        }
    }
    if let Some(max) = v.max_length {
        if text.chars().count() > max {
            return Err(CoreError::Validation(format!(
                "Field '{}' must be at most {max} characters",
                field.label
            )));
        }
    }
    if let Some(pattern) = &v.pattern {
        let re = regex::Regex::new(pattern).map_err(|_| {
            CoreError::Validation(format!(
                "Field '{}' has an invalid pattern '{pattern}'",
                field.label
            ))
        })?;
        if !re.is_match(&text) {
            return Err(CoreError::Validation(format!(
                "Field '{}' does not match the expected format",
                field.label
            )));
        }
    }
    Ok(FieldValue::Text(text))
}

fn accept_number(field: &FieldSchema, text: &str) -> Result<FieldValue, CoreError> {
    let n: f64 = text.trim().parse().map_err(|_| {
        CoreError::Validation(format!("Field '{}' must be a number", field.label))
    })?;
    let v = &field.validation;
    if let Some(min) = v.min {
        if n < min {
            return Err(CoreError::Validation(format!(
                "Field '{}' must be at least {min}",
                field.label
            )));
        }
    }
    if let Some(max) = v.max {
        if n > max {
            return Err(CoreError::Validation(format!(
                "Field '{}' must be at most {max}",
                field.label
            )));
        }
    }
    Ok(FieldValue::Number(n))
}

fn accept_email(field: &FieldSchema, text: String) -> Result<FieldValue, CoreError> {
    if !email_regex().is_match(&text) {
        return Err(CoreError::Validation(format!(
            "Field '{}' must be a valid email address",
            field.label
        )));
    }
    Ok(FieldValue::Text(text))
}

fn accept_date(field: &FieldSchema, text: &str) -> Result<FieldValue, CoreError> {
    let date = chrono::NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|_| {
        CoreError::Validation(format!(
            "Field '{}' must be an ISO date (YYYY-MM-DD)",
            field.label
        ))
    })?;
    Ok(FieldValue::Date(date))
}

fn accept_choice(field: &FieldSchema, text: String) -> Result<FieldValue, CoreError> {
    if let Some(options) = &field.validation.options {
        if !options.iter().any(|o| o == &text) {
            return Err(CoreError::Validation(format!(
                "Field '{}': '{text}' is not one of the allowed options",
                field.label
            )));
        }
    }
    Ok(FieldValue::Choice(text))
}

fn accept_choices(field: &FieldSchema, text: &str) -> Result<FieldValue, CoreError> {
    // Multi-selections arrive either as a JSON array string or as a single
    // token (the API layer folds repeated form entries into an array).
    let selected: Vec<String> = if text.trim_start().starts_with('[') {
        serde_json::from_str(text).map_err(|_| {
            CoreError::Validation(format!(
                "Field '{}' must be a JSON array of selections",
                field.label
            ))
        })?
    } else {
        vec![text.to_string()]
    };

    if let Some(options) = &field.validation.options {
        for choice in &selected {
            if !options.iter().any(|o| o == choice) {
                return Err(CoreError::Validation(format!(
                    "Field '{}': '{choice}' is not one of the allowed options",
                    field.label
                )));
            }
        }
    }
    Ok(FieldValue::Choices(selected))
}

fn accept_file(field: &FieldSchema, file: FileUpload) -> Result<FieldValue, CoreError> {
    let v = &field.validation;
    if let Some(max_mb) = v.max_file_size {
        if file.size_mb() > max_mb {
            return Err(CoreError::Validation(format!(
                "File for '{}' exceeds the {max_mb} MB size limit",
                field.label
            )));
        }
    }
    if let Some(types) = &v.file_types {
        if !file_type_allowed(&file, types) {
            return Err(CoreError::Validation(format!(
                "File type not allowed for '{}'. Accepted types: {}",
                field.label,
                types.join(", ")
            )));
        }
    }
    Ok(FieldValue::File(file))
}

/// Case-insensitive acceptance check against a mixed list of extension
/// tokens (`".pdf"`, `"pdf"`) and MIME types (`"application/pdf"`).
pub fn file_type_allowed(file: &FileUpload, accepted: &[String]) -> bool {
    let extension = file.extension();
    let mime = file.content_type.as_deref().map(str::to_lowercase);

    accepted.iter().any(|token| {
        let token = token.trim().to_lowercase();
        if token.is_empty() {
            return false;
        }
        if token.contains('/') {
            return mime.as_deref() == Some(token.as_str());
        }
        let normalized = if token.starts_with('.') {
            token
        } else {
            format!(".{token}")
        };
        extension.as_deref() == Some(normalized.as_str())
    })
}

/* --------------------------------------------------------------------------
   Form resolution
   -------------------------------------------------------------------------- */

/// Resolve raw submissions into validated form state for one template.
///
/// Submissions are matched to fields by the field's machine key (or its
/// label as a fallback); repeated entries for a multiselect field fold into
/// one array. Entries that match no field are ignored. Fields left absent
/// pick up their `default_value` when one is set. Missing required fields
/// block execution — a hard precondition, not a hint.
pub fn resolve_form(
    template: &WorkflowTemplate,
    raw: Vec<(String, RawValue)>,
) -> Result<FormData, CoreError> {
    let mut form = FormData::new();

    for field in &template.fields {
        let key = field.key();
        let mut matches: Vec<RawValue> = raw
            .iter()
            .filter(|(k, _)| *k == key || *k == field.label)
            .map(|(_, v)| v.clone())
            .collect();

        // Empty text submissions count as absent.
        matches.retain(|r| !matches!(r, RawValue::Text(t) if t.is_empty()));

        let raw_value = match matches.len() {
            0 => match &field.default_value {
                Some(default) => Some(default_as_raw(default)),
                None => None,
            },
            1 => Some(matches.remove(0)),
            // Repeated entries: fold text values into a JSON array for
            // multiselect coercion.
            _ => {
                let texts: Vec<String> = matches
                    .iter()
                    .filter_map(|r| match r {
                        RawValue::Text(t) => Some(t.clone()),
                        RawValue::File(_) => None,
                    })
                    .collect();
                Some(RawValue::Text(
                    serde_json::to_string(&texts)
                        .map_err(|e| CoreError::Internal(e.to_string()))?,
                ))
            }
        };

        if let Some(raw_value) = raw_value {
            let value = coerce_field(field, raw_value)?;
            form.insert(key, value);
        }
    }

    check_required(template, &form)?;
    Ok(form)
}

/// Verify every required field has a value in the form state.
pub fn check_required(template: &WorkflowTemplate, form: &FormData) -> Result<(), CoreError> {
    let missing: Vec<&str> = template
        .fields
        .iter()
        .filter(|f| f.required && !form.contains_key(&f.key()))
        .map(|f| f.label.as_str())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

fn default_as_raw(default: &serde_json::Value) -> RawValue {
    match default {
        serde_json::Value::String(s) => RawValue::Text(s.clone()),
        other => RawValue::Text(other.to_string()),
    }
}

/* --------------------------------------------------------------------------
   Tests
   -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ValidationRules;
    use crate::template::CreateWorkflow;
    use assert_matches::assert_matches;

    fn field(field_type: FieldType, label: &str, validation: ValidationRules) -> FieldSchema {
        FieldSchema {
            id: label.to_lowercase(),
            name: None,
            label: label.into(),
            field_type,
            placeholder: None,
            required: false,
            default_value: None,
            validation,
            visualize_file: false,
        }
    }

    fn pdf_upload(filename: &str, len: usize) -> FileUpload {
        FileUpload {
            filename: filename.into(),
            content_type: Some("application/pdf".into()),
            bytes: vec![0u8; len],
        }
    }

    fn template_with(fields: Vec<FieldSchema>) -> WorkflowTemplate {
        let mut t = WorkflowTemplate::create(CreateWorkflow {
            name: "Test".into(),
            description: None,
            category: None,
            icon: None,
            status: None,
            fields: None,
            api_config: None,
            is_published: None,
            created_by: None,
        });
        t.fields = fields;
        t
    }

    // --- File size / type gates ---

    #[test]
    fn oversized_file_is_rejected_and_never_enters_form_state() {
        let f = field(
            FieldType::File,
            "Upload CV",
            ValidationRules {
                max_file_size: Some(1.0),
                ..Default::default()
            },
        );
        let too_big = pdf_upload("cv.pdf", 2 * 1024 * 1024);
        let err = coerce_field(&f, RawValue::File(too_big)).unwrap_err();
        assert!(err.to_string().contains("size limit"));

        let mut t = template_with(vec![f]);
        t.fields[0].required = false;
        // Nothing resolved means nothing entered form state.
        let form = resolve_form(&t, Vec::new()).unwrap();
        assert!(form.is_empty());
    }

    #[test]
    fn file_type_list_mixes_extensions_and_bare_tokens() {
        let accepted = vec![".pdf".to_string(), "docx".to_string()];

        assert!(file_type_allowed(&pdf_upload("resume.PDF", 10), &accepted));
        assert!(file_type_allowed(&pdf_upload("resume.docx", 10), &accepted));
        assert!(!file_type_allowed(&pdf_upload("resume.txt", 10), &accepted));
    }

    #[test]
    fn file_type_matches_declared_mime() {
        let accepted = vec!["application/pdf".to_string()];
        // Extension does not match, MIME does.
        assert!(file_type_allowed(&pdf_upload("blob.bin", 10), &accepted));
    }

    #[test]
    fn rejected_txt_accepted_uppercase_pdf() {
        let f = field(
            FieldType::File,
            "Upload CV",
            ValidationRules {
                file_types: Some(vec![".pdf".into(), ".docx".into()]),
                ..Default::default()
            },
        );
        assert_matches!(
            coerce_field(&f, RawValue::File(pdf_upload("resume.txt", 4))),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            coerce_field(&f, RawValue::File(pdf_upload("resume.PDF", 4))),
            Ok(FieldValue::File(_))
        );
    }

    // --- Choice fields ---

    #[test]
    fn select_rejects_value_outside_options() {
        let f = field(
            FieldType::Select,
            "Mode",
            ValidationRules {
                options: Some(vec!["A".into(), "B".into()]),
                ..Default::default()
            },
        );
        assert_matches!(
            coerce_field(&f, RawValue::Text("C".into())),
            Err(CoreError::Validation(_))
        );
        assert_eq!(
            coerce_field(&f, RawValue::Text("A".into())).unwrap(),
            FieldValue::Choice("A".into())
        );
    }

    #[test]
    fn multiselect_accepts_json_array_within_options() {
        let f = field(
            FieldType::Multiselect,
            "Tags",
            ValidationRules {
                options: Some(vec!["x".into(), "y".into(), "z".into()]),
                ..Default::default()
            },
        );
        assert_eq!(
            coerce_field(&f, RawValue::Text(r#"["x","z"]"#.into())).unwrap(),
            FieldValue::Choices(vec!["x".into(), "z".into()])
        );
        assert_matches!(
            coerce_field(&f, RawValue::Text(r#"["x","nope"]"#.into())),
            Err(CoreError::Validation(_))
        );
    }

    // --- Scalar fields ---

    #[test]
    fn number_respects_min_max() {
        let f = field(
            FieldType::Number,
            "Count",
            ValidationRules {
                min: Some(1.0),
                max: Some(10.0),
                ..Default::default()
            },
        );
        assert_matches!(coerce_field(&f, RawValue::Text("0".into())), Err(_));
        assert_matches!(coerce_field(&f, RawValue::Text("11".into())), Err(_));
        assert_eq!(
            coerce_field(&f, RawValue::Text("5".into())).unwrap(),
            FieldValue::Number(5.0)
        );
        assert_matches!(coerce_field(&f, RawValue::Text("abc".into())), Err(_));
    }

    #[test]
    fn email_shape_is_enforced() {
        let f = field(FieldType::Email, "Contact", ValidationRules::default());
        assert_matches!(coerce_field(&f, RawValue::Text("not-an-email".into())), Err(_));
        assert_matches!(
            coerce_field(&f, RawValue::Text("user@example.com".into())),
            Ok(FieldValue::Text(_))
        );
    }

    #[test]
    fn date_parses_iso_only() {
        let f = field(FieldType::Date, "Due", ValidationRules::default());
        assert_matches!(coerce_field(&f, RawValue::Text("2026-01-31".into())), Ok(_));
        assert_matches!(coerce_field(&f, RawValue::Text("31/01/2026".into())), Err(_));
    }

    #[test]
    fn unknown_type_behaves_as_text() {
        let f = field(FieldType::Unknown, "Mystery", ValidationRules::default());
        assert_eq!(
            coerce_field(&f, RawValue::Text("anything".into())).unwrap(),
            FieldValue::Text("anything".into())
        );
    }

    #[test]
    fn irrelevant_constraints_are_ignored() {
        // A pattern on a number field does not apply.
        let f = field(
            FieldType::Number,
            "Count",
            ValidationRules {
                pattern: Some("^nope$".into()),
                ..Default::default()
            },
        );
        assert_matches!(coerce_field(&f, RawValue::Text("7".into())), Ok(_));
    }

    // --- Authoring validation ---

    #[test]
    fn min_greater_than_max_is_an_authoring_error() {
        let f = field(
            FieldType::Number,
            "Count",
            ValidationRules {
                min: Some(10.0),
                max: Some(1.0),
                ..Default::default()
            },
        );
        let err = validate_fields(&[f]).unwrap_err();
        assert!(err.to_string().contains("exceeds max"));
    }

    #[test]
    fn empty_label_is_an_authoring_error() {
        let f = field(FieldType::Text, "", ValidationRules::default());
        assert_matches!(validate_fields(&[f]), Err(CoreError::Validation(_)));
    }

    // --- Form resolution ---

    #[test]
    fn missing_required_field_blocks_resolution() {
        let mut f = field(FieldType::Text, "Problem", ValidationRules::default());
        f.required = true;
        let t = template_with(vec![f]);

        let err = resolve_form(&t, Vec::new()).unwrap_err();
        assert!(err.to_string().contains("Problem"));
    }

    #[test]
    fn default_value_seeds_absent_fields() {
        let mut f = field(FieldType::Text, "Region", ValidationRules::default());
        f.default_value = Some(serde_json::Value::String("eu-west".into()));
        let t = template_with(vec![f]);

        let form = resolve_form(&t, Vec::new()).unwrap();
        assert_eq!(form.get("region"), Some(&FieldValue::Text("eu-west".into())));
    }

    #[test]
    fn repeated_entries_fold_into_multiselect() {
        let f = field(
            FieldType::Multiselect,
            "Tags",
            ValidationRules {
                options: Some(vec!["x".into(), "y".into()]),
                ..Default::default()
            },
        );
        let t = template_with(vec![f]);
        let raw = vec![
            ("tags".to_string(), RawValue::Text("x".into())),
            ("tags".to_string(), RawValue::Text("y".into())),
        ];
        let form = resolve_form(&t, raw).unwrap();
        assert_eq!(
            form.get("tags"),
            Some(&FieldValue::Choices(vec!["x".into(), "y".into()]))
        );
    }

    #[test]
    fn submissions_match_by_label_fallback() {
        let f = field(FieldType::Text, "Problem Summary", ValidationRules::default());
        let t = template_with(vec![f]);
        let raw = vec![(
            "Problem Summary".to_string(),
            RawValue::Text("it broke".into()),
        )];
        let form = resolve_form(&t, raw).unwrap();
        assert_eq!(
            form.get("problem_summary"),
            Some(&FieldValue::Text("it broke".into()))
        );
    }
}
