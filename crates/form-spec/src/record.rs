use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A single field value as it arrives from a form input.
///
/// Enum and datetime inputs travel as text; the declared
/// [`FieldKind`](crate::spec::field::FieldKind) says how to read them.
/// Numbers keep their JSON representation so `34` is echoed back as `34`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(Number),
    Text(String),
    Flags(BTreeMap<String, bool>),
}

impl FieldValue {
    /// Mirrors the falsy check forms apply before submitting: empty text and
    /// flag maps without a single checked entry count as "not filled in".
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::Flags(flags) => !flags.values().any(|checked| *checked),
            FieldValue::Bool(_) | FieldValue::Number(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric reading of the value; text is parsed after trimming.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(number) => number.as_f64(),
            FieldValue::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

}

// Numbers compare by value so guards match `34` against `34.0`.
impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            (FieldValue::Number(a), FieldValue::Number(b)) => a.as_f64() == b.as_f64(),
            (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
            (FieldValue::Flags(a), FieldValue::Flags(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<Number> for FieldValue {
    fn from(value: Number) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(value.into())
    }
}

/// NaN and infinities have no JSON form and are kept as their text.
impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Number::from_f64(value)
            .map_or_else(|| FieldValue::Text(value.to_string()), FieldValue::Number)
    }
}

impl From<BTreeMap<String, bool>> for FieldValue {
    fn from(value: BTreeMap<String, bool>) -> Self {
        FieldValue::Flags(value)
    }
}

/// Field values of one form instance, keyed by field name.
///
/// JSON `null` entries are dropped on deserialization so that a cleared input
/// and a missing input look the same to the validator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Option<FieldValue>>",
    into = "BTreeMap<String, FieldValue>"
)]
pub struct Record {
    values: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Stores `value` and returns the previous value, if any.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Text value of `name`, if present and textual.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// `true` when `name` is absent or holds an empty value.
    pub fn is_blank(&self, name: &str) -> bool {
        self.get(name).is_none_or(FieldValue::is_empty)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.values.iter()
    }
}

impl From<BTreeMap<String, Option<FieldValue>>> for Record {
    fn from(raw: BTreeMap<String, Option<FieldValue>>) -> Self {
        let values = raw
            .into_iter()
            .filter_map(|(name, value)| value.map(|value| (name, value)))
            .collect();
        Self { values }
    }
}

impl From<BTreeMap<String, FieldValue>> for Record {
    fn from(values: BTreeMap<String, FieldValue>) -> Self {
        Self { values }
    }
}

impl From<Record> for BTreeMap<String, FieldValue> {
    fn from(record: Record) -> Self {
        record.values
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let values = iter
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_entries_are_treated_as_absent() {
        let record: Record =
            serde_json::from_value(json!({ "name": "Ada", "guestName": null })).expect("record");
        assert_eq!(record.len(), 1);
        assert!(record.get("guestName").is_none());
        assert!(record.is_blank("guestName"));
    }

    #[test]
    fn untagged_values_keep_their_shape() {
        let record: Record = serde_json::from_value(json!({
            "age": "31",
            "score": 4.5,
            "subscribed": false,
            "skills": { "CSS": true, "Python": false }
        }))
        .expect("record");

        assert_eq!(record.text("age"), Some("31"));
        assert_eq!(record.get("score"), Some(&FieldValue::from(4.5)));
        assert_eq!(record.get("subscribed"), Some(&FieldValue::Bool(false)));
        assert!(!record.is_blank("skills"));
    }

    #[test]
    fn integers_serialize_without_a_fraction() {
        let record: Record =
            serde_json::from_value(json!({ "age": 34, "score": 4.5 })).expect("record");
        assert_eq!(record.get("age").and_then(FieldValue::as_number), Some(34.0));
        assert_eq!(
            serde_json::to_string(&record).expect("json"),
            r#"{"age":34,"score":4.5}"#
        );
    }

    #[test]
    fn non_finite_numbers_fall_back_to_text() {
        assert_eq!(FieldValue::from(f64::NAN), FieldValue::from("NaN"));
        assert_eq!(FieldValue::from(2.5).as_number(), Some(2.5));
    }

    #[test]
    fn numbers_compare_by_value() {
        assert_eq!(FieldValue::from(34), FieldValue::from(34.0));
        assert_ne!(FieldValue::from(34), FieldValue::from("34"));
    }

    #[test]
    fn unchecked_flags_count_as_empty() {
        let flags = BTreeMap::from([("CSS".to_string(), false), ("Python".to_string(), false)]);
        assert!(FieldValue::Flags(flags).is_empty());
        assert!(!FieldValue::Bool(false).is_empty());
        assert!(FieldValue::from("").is_empty());
    }

    #[test]
    fn numeric_text_is_trimmed_before_parsing() {
        assert_eq!(FieldValue::from(" 12 ").as_number(), Some(12.0));
        assert_eq!(FieldValue::from("twelve").as_number(), None);
    }
}
