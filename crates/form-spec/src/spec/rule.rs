use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::expr::Expr;
use crate::record::Record;

/// Whether a field must be filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Required {
    Always(bool),
    When(Expr),
}

impl Default for Required {
    fn default() -> Self {
        Required::Always(false)
    }
}

impl Required {
    pub fn applies(&self, record: &Record) -> bool {
        match self {
            Required::Always(required) => *required,
            Required::When(expr) => expr.evaluate(record),
        }
    }
}

/// Format checks applied to present values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Format {
    Email,
    Url,
    PositiveNumber,
    MinLength { min: usize },
    Pattern { pattern: String },
}

/// Constraints for a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldRule {
    pub field: String,
    #[serde(default)]
    pub required: Required,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formats: Vec<Format>,
    /// Template replacing the default "is required" message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_message: Option<String>,
    /// Template replacing the default message of any failed check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_message: Option<String>,
}

impl FieldRule {
    pub fn optional(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            required: Required::Always(false),
            formats: Vec::new(),
            required_message: None,
            invalid_message: None,
        }
    }

    pub fn required(field: impl Into<String>) -> Self {
        Self {
            required: Required::Always(true),
            ..Self::optional(field)
        }
    }

    pub fn required_when(field: impl Into<String>, expr: Expr) -> Self {
        Self {
            required: Required::When(expr),
            ..Self::optional(field)
        }
    }

    pub fn format(mut self, format: Format) -> Self {
        self.formats.push(format);
        self
    }

    pub fn required_message(mut self, template: impl Into<String>) -> Self {
        self.required_message = Some(template.into());
        self
    }

    pub fn invalid_message(mut self, template: impl Into<String>) -> Self {
        self.invalid_message = Some(template.into());
        self
    }
}

/// A named predicate shared by rule sets and the visibility projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Guard {
    pub id: String,
    pub when: Expr,
}

impl Guard {
    pub fn new(id: impl Into<String>, when: Expr) -> Self {
        Self {
            id: id.into(),
            when,
        }
    }
}

/// Ordered rules, active only while `guard` holds (or always, without one).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleSet {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<String>,
    pub rules: Vec<FieldRule>,
}

impl RuleSet {
    pub fn unconditional(id: impl Into<String>, rules: Vec<FieldRule>) -> Self {
        Self {
            id: id.into(),
            guard: None,
            rules,
        }
    }

    pub fn guarded(id: impl Into<String>, guard: impl Into<String>, rules: Vec<FieldRule>) -> Self {
        Self {
            id: id.into(),
            guard: Some(guard.into()),
            rules,
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.field.as_str())
    }
}
