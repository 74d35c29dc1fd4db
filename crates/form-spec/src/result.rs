use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Machine-readable reason a field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Required,
    TypeMismatch,
    InvalidChoice,
    InvalidDatetime,
    InvalidEmail,
    InvalidUrl,
    NotPositive,
    TooShort,
    PatternMismatch,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Required => "required",
            ErrorCode::TypeMismatch => "type_mismatch",
            ErrorCode::InvalidChoice => "invalid_choice",
            ErrorCode::InvalidDatetime => "invalid_datetime",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::InvalidUrl => "invalid_url",
            ErrorCode::NotPositive => "not_positive",
            ErrorCode::TooShort => "too_short",
            ErrorCode::PatternMismatch => "pattern_mismatch",
        }
    }
}

/// Error attached to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub code: ErrorCode,
    pub message: String,
}

/// Field name to error; empty means the record is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationResult {
    errors: BTreeMap<String, FieldError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.errors.get(field)
    }

    pub fn message(&self, field: &str) -> Option<&str> {
        self.get(field).map(|error| error.message.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.errors.iter().map(|(field, error)| (field.as_str(), error))
    }

    /// Records `error` unless the field already failed; the first error wins.
    pub(crate) fn record(&mut self, field: &str, error: FieldError) {
        self.errors.entry(field.to_string()).or_insert(error);
    }
}
