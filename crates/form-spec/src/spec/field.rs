use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::record::FieldValue;

/// Supported field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Enum,
    Boolean,
    /// Local date and time as produced by `datetime-local` inputs.
    Datetime,
    /// Named checkboxes, stored as a map of booleans.
    Flags,
}

impl FieldKind {
    /// Whether a value of this shape can be held by a field of this kind.
    ///
    /// Number fields also take text because browser inputs hand numbers over
    /// as strings; the numeric reading happens in the format checks.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match self {
            FieldKind::Text | FieldKind::Enum | FieldKind::Datetime => {
                matches!(value, FieldValue::Text(_))
            }
            FieldKind::Number => matches!(value, FieldValue::Number(_) | FieldValue::Text(_)),
            FieldKind::Boolean => matches!(value, FieldValue::Bool(_)),
            FieldKind::Flags => matches!(value, FieldValue::Flags(_)),
        }
    }
}

/// One input of a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    #[serde(default, rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<FieldValue>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            choices: Vec::new(),
            default_value: None,
        }
    }

    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn default_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}
