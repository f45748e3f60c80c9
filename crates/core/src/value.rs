//! Typed form values collected for one workflow run.

use serde::Serialize;

/// An uploaded file held in memory for the duration of one run.
///
/// Equality and debug output deliberately ignore the byte contents beyond
/// their length; uploads can be large.
#[derive(Clone, PartialEq)]
pub struct FileUpload {
    pub filename: String,
    /// Declared MIME type from the upload, when the client sent one.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    /// File size in megabytes, as used by `validation.max_file_size`.
    pub fn size_mb(&self) -> f64 {
        self.bytes.len() as f64 / (1024.0 * 1024.0)
    }

    /// Lowercased extension including the leading dot (`".pdf"`), if any.
    pub fn extension(&self) -> Option<String> {
        let dot = self.filename.rfind('.')?;
        if dot == 0 || dot + 1 == self.filename.len() {
            return None;
        }
        Some(self.filename[dot..].to_lowercase())
    }
}

impl std::fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUpload")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A validated value for a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    /// ISO date, stored and submitted as `YYYY-MM-DD`.
    Date(chrono::NaiveDate),
    /// Single selection from a choice field.
    Choice(String),
    /// Multi-selection from a multiselect field.
    Choices(Vec<String>),
    File(FileUpload),
}

impl FieldValue {
    pub fn is_file(&self) -> bool {
        matches!(self, FieldValue::File(_))
    }

    /// Scalar representation for wire encoding (query string / multipart
    /// text part). Files have no scalar form.
    pub fn to_scalar(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) | FieldValue::Choice(s) => Some(s.clone()),
            FieldValue::Number(n) => {
                // Integral numbers in i64 range serialize without a trailing
                // ".0"; the cast would saturate outside it.
                if n.fract() == 0.0
                    && n.is_finite()
                    && (i64::MIN as f64..i64::MAX as f64).contains(n)
                {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(n.to_string())
                }
            }
            FieldValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            // Nested sequences JSON-stringify, mirroring how the form layer
            // serialized arrays.
            FieldValue::Choices(items) => serde_json::to_string(items).ok(),
            FieldValue::File(_) => None,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) | FieldValue::Choice(s) => serializer.serialize_str(s),
            FieldValue::Number(n) => serializer.serialize_f64(*n),
            FieldValue::Date(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            FieldValue::Choices(items) => items.serialize(serializer),
            FieldValue::File(f) => serializer.serialize_str(&f.filename),
        }
    }
}

/// The collected form state of one run: field key to validated value, in
/// submission order.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    entries: Vec<(String, FieldValue)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value for `key`, preserving first-seen order.
    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Discard all collected values (the "start new workflow" reset).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
