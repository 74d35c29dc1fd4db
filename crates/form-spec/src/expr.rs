use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::record::{FieldValue, Record};

/// Lightweight expression AST used for guards and predicate-driven `required`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Expr {
    LiteralBool { value: bool },
    Eq { field: String, value: FieldValue },
    In { field: String, values: Vec<FieldValue> },
    IsSet { field: String },
    And { expressions: Vec<Expr> },
    Or { expressions: Vec<Expr> },
    Not { expression: Box<Expr> },
}

impl Expr {
    pub fn eq(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Expr::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn one_of<V: Into<FieldValue>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Expr::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_set(field: impl Into<String>) -> Self {
        Expr::IsSet {
            field: field.into(),
        }
    }

    /// Evaluates the expression against the given record.
    ///
    /// Only `record` is consulted; a missing field never matches `eq`/`in`.
    pub fn evaluate(&self, record: &Record) -> bool {
        match self {
            Expr::LiteralBool { value } => *value,
            Expr::Eq { field, value } => record.get(field) == Some(value),
            Expr::In { field, values } => record
                .get(field)
                .is_some_and(|current| values.contains(current)),
            Expr::IsSet { field } => !record.is_blank(field),
            Expr::And { expressions } => expressions.iter().all(|expr| expr.evaluate(record)),
            Expr::Or { expressions } => expressions.iter().any(|expr| expr.evaluate(record)),
            Expr::Not { expression } => !expression.evaluate(record),
        }
    }

    /// Field names the expression reads.
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::LiteralBool { .. } => {}
            Expr::Eq { field, .. } | Expr::In { field, .. } | Expr::IsSet { field } => {
                out.push(field)
            }
            Expr::And { expressions } | Expr::Or { expressions } => {
                for expr in expressions {
                    expr.collect_fields(out);
                }
            }
            Expr::Not { expression } => expression.collect_fields(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn eq_requires_exact_match() {
        let guard = Expr::eq("surveyTopic", "Technology");
        assert!(guard.evaluate(&Record::new().with("surveyTopic", "Technology")));
        assert!(!guard.evaluate(&Record::new().with("surveyTopic", "technology")));
        assert!(!guard.evaluate(&Record::new()));
    }

    #[test]
    fn in_matches_any_listed_value() {
        let guard = Expr::one_of("position", ["Developer", "Designer"]);
        assert!(guard.evaluate(&Record::new().with("position", "Designer")));
        assert!(!guard.evaluate(&Record::new().with("position", "Manager")));
    }

    #[test]
    fn combinators_short_circuit_as_expected() {
        let guard = Expr::And {
            expressions: vec![
                Expr::is_set("email"),
                Expr::Not {
                    expression: Box::new(Expr::eq("isAttendingWithGuest", "No")),
                },
            ],
        };
        let record = Record::new()
            .with("email", "a@b.com")
            .with("isAttendingWithGuest", "Yes");
        assert!(guard.evaluate(&record));
        assert!(!guard.evaluate(&record.clone().with("email", "")));
    }

    #[test]
    fn deserializes_from_tagged_json() {
        let expr: Expr = serde_json::from_value(json!({
            "op": "or",
            "expressions": [
                { "op": "eq", "field": "position", "value": "Developer" },
                { "op": "literal_bool", "value": false }
            ]
        }))
        .expect("expr");
        assert_eq!(expr.fields(), vec!["position"]);
        assert!(expr.evaluate(&Record::new().with("position", "Developer")));
    }
}
