use std::collections::BTreeSet;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::Record;
use crate::spec::field::FieldSpec;
use crate::spec::rule::{Format, Guard, RuleSet};

/// Definition mistakes reported by [`FormSpec::check`].
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),
    #[error("guard '{0}' is declared more than once")]
    DuplicateGuard(String),
    #[error("rule set '{rule_set}' refers to unknown guard '{guard}'")]
    UnknownGuard { rule_set: String, guard: String },
    #[error("rule set '{rule_set}' refers to undeclared field '{field}'")]
    UnknownField { rule_set: String, field: String },
    #[error("guard '{guard}' reads undeclared field '{field}'")]
    UnknownGuardField { guard: String, field: String },
    #[error("category field '{0}' is not declared")]
    UnknownCategory(String),
    #[error("pattern for field '{field}' does not compile")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },
}

/// Top-level form definition: fields, named guards and the rule table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormSpec {
    pub id: String,
    pub title: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field whose value selects guarded rule sets and follow-up questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub fields: Vec<FieldSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub guards: Vec<Guard>,
    pub rule_sets: Vec<RuleSet>,
}

impl FormSpec {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn guard(&self, id: &str) -> Option<&Guard> {
        self.guards.iter().find(|guard| guard.id == id)
    }

    /// Whether `rule_set` applies to `record`.
    pub fn is_active(&self, rule_set: &RuleSet, record: &Record) -> bool {
        let Some(guard_id) = &rule_set.guard else {
            return true;
        };
        match self.guard(guard_id) {
            Some(guard) => guard.when.evaluate(record),
            None => {
                tracing::warn!(
                    form = %self.id,
                    rule_set = %rule_set.id,
                    guard = %guard_id,
                    "rule set refers to an unknown guard; treating it as inactive"
                );
                false
            }
        }
    }

    /// Current category value, when the form has a category field and it is
    /// filled in with text.
    pub fn category_value<'a>(&self, record: &'a Record) -> Option<&'a str> {
        let field = self.category.as_deref()?;
        record.text(field).filter(|value| !value.is_empty())
    }

    /// A fresh record holding only declared defaults.
    pub fn initial_record(&self) -> Record {
        self.fields
            .iter()
            .filter_map(|field| {
                field
                    .default_value
                    .clone()
                    .map(|value| (field.name.clone(), value))
            })
            .collect()
    }

    /// Verifies that guards, fields and patterns referenced by the rule table
    /// exist and are well formed.
    pub fn check(&self) -> Result<(), SpecError> {
        let mut names = BTreeSet::new();
        for field in &self.fields {
            if !names.insert(field.name.as_str()) {
                return Err(SpecError::DuplicateField(field.name.clone()));
            }
        }

        let mut guard_ids = BTreeSet::new();
        for guard in &self.guards {
            if !guard_ids.insert(guard.id.as_str()) {
                return Err(SpecError::DuplicateGuard(guard.id.clone()));
            }
            if let Some(field) = guard.when.fields().into_iter().find(|f| !names.contains(f)) {
                return Err(SpecError::UnknownGuardField {
                    guard: guard.id.clone(),
                    field: field.to_string(),
                });
            }
        }

        if let Some(category) = &self.category
            && !names.contains(category.as_str())
        {
            return Err(SpecError::UnknownCategory(category.clone()));
        }

        for rule_set in &self.rule_sets {
            if let Some(guard) = &rule_set.guard
                && !guard_ids.contains(guard.as_str())
            {
                return Err(SpecError::UnknownGuard {
                    rule_set: rule_set.id.clone(),
                    guard: guard.clone(),
                });
            }
            for rule in &rule_set.rules {
                if !names.contains(rule.field.as_str()) {
                    return Err(SpecError::UnknownField {
                        rule_set: rule_set.id.clone(),
                        field: rule.field.clone(),
                    });
                }
                for format in &rule.formats {
                    if let Format::Pattern { pattern } = format {
                        Regex::new(pattern).map_err(|source| SpecError::InvalidPattern {
                            field: rule.field.clone(),
                            source,
                        })?;
                    }
                }
            }
        }

        Ok(())
    }
}
