use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::message::{MessageContext, default_template, render};
use crate::record::{FieldValue, Record};
use crate::result::{ErrorCode, FieldError, ValidationResult};
use crate::spec::field::{FieldKind, FieldSpec};
use crate::spec::form::FormSpec;
use crate::spec::rule::{FieldRule, Format};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email regex"));
static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://.+\..+$").expect("url regex"));

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Evaluates every active rule set of `spec` against `record`.
///
/// Never fails: problems come back as entries of the result, at most one per
/// field, and an empty result is the only success signal.
pub fn validate(spec: &FormSpec, record: &Record) -> ValidationResult {
    let mut result = ValidationResult::default();

    for rule_set in &spec.rule_sets {
        if !spec.is_active(rule_set, record) {
            tracing::trace!(form = %spec.id, rule_set = %rule_set.id, "rule set inactive");
            continue;
        }
        for rule in &rule_set.rules {
            if result.contains(&rule.field) {
                continue;
            }
            if let Some(error) = check_rule(spec.field(&rule.field), rule, record) {
                result.record(&rule.field, error);
            }
        }
    }

    result
}

fn check_rule(field: Option<&FieldSpec>, rule: &FieldRule, record: &Record) -> Option<FieldError> {
    let label = field.map_or(rule.field.as_str(), |field| field.label.as_str());
    let fail = |code: ErrorCode, min: Option<usize>| {
        let template = match code {
            ErrorCode::Required => rule.required_message.as_deref(),
            _ => rule.invalid_message.as_deref(),
        }
        .unwrap_or_else(|| default_template(code));
        let ctx = MessageContext {
            field: &rule.field,
            label,
            min,
        };
        Some(FieldError {
            code,
            message: render(template, &ctx),
        })
    };

    let value = match record.get(&rule.field) {
        Some(value) if !value.is_empty() => value,
        _ if rule.required.applies(record) => return fail(ErrorCode::Required, None),
        _ => return None,
    };

    if let Some(field) = field
        && let Some(code) = check_kind(field, value)
    {
        return fail(code, None);
    }

    for format in &rule.formats {
        if let Some(code) = check_format(format, value) {
            let min = match format {
                Format::MinLength { min } => Some(*min),
                _ => None,
            };
            return fail(code, min);
        }
    }

    None
}

fn check_kind(field: &FieldSpec, value: &FieldValue) -> Option<ErrorCode> {
    if !field.kind.accepts(value) {
        return Some(ErrorCode::TypeMismatch);
    }

    if matches!(field.kind, FieldKind::Enum)
        && !field.choices.is_empty()
        && let Some(text) = value.as_text()
        && !field.choices.iter().any(|choice| choice == text)
    {
        return Some(ErrorCode::InvalidChoice);
    }

    if matches!(field.kind, FieldKind::Datetime)
        && let Some(text) = value.as_text()
        && !is_local_datetime(text)
    {
        return Some(ErrorCode::InvalidDatetime);
    }

    None
}

fn is_local_datetime(text: &str) -> bool {
    DATETIME_FORMATS
        .iter()
        .any(|format| NaiveDateTime::parse_from_str(text, format).is_ok())
}

fn check_format(format: &Format, value: &FieldValue) -> Option<ErrorCode> {
    match format {
        Format::Email => {
            let text = value.as_text()?;
            (!EMAIL.is_match(text)).then_some(ErrorCode::InvalidEmail)
        }
        Format::Url => {
            let text = value.as_text()?;
            (!URL.is_match(text)).then_some(ErrorCode::InvalidUrl)
        }
        Format::PositiveNumber => match value.as_number() {
            Some(number) if number.is_finite() && number > 0.0 => None,
            _ => Some(ErrorCode::NotPositive),
        },
        Format::MinLength { min } => {
            let text = value.as_text()?;
            (text.chars().count() < *min).then_some(ErrorCode::TooShort)
        }
        // Patterns that fail to compile are reported by `FormSpec::check`.
        Format::Pattern { pattern } => {
            let text = value.as_text()?;
            let regex = Regex::new(pattern).ok()?;
            (!regex.is_match(text)).then_some(ErrorCode::PatternMismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> FieldValue {
        FieldValue::from(value)
    }

    #[test]
    fn email_pattern_needs_a_dot_after_the_at() {
        assert_eq!(check_format(&Format::Email, &text("a@b.com")), None);
        assert_eq!(
            check_format(&Format::Email, &text("a@b")),
            Some(ErrorCode::InvalidEmail)
        );
        assert_eq!(check_format(&Format::Email, &text(" x a@b.c y ")), None);
    }

    #[test]
    fn url_pattern_needs_scheme_and_dot() {
        assert_eq!(check_format(&Format::Url, &text("https://ex.io")), None);
        assert_eq!(check_format(&Format::Url, &text("http://a.b/c")), None);
        assert_eq!(
            check_format(&Format::Url, &text("ftp://ex.io")),
            Some(ErrorCode::InvalidUrl)
        );
        assert_eq!(
            check_format(&Format::Url, &text("https://localhost")),
            Some(ErrorCode::InvalidUrl)
        );
    }

    #[test]
    fn positive_number_rejects_zero_negative_and_garbage() {
        assert_eq!(check_format(&Format::PositiveNumber, &text("21")), None);
        assert_eq!(check_format(&Format::PositiveNumber, &FieldValue::from(0.5)), None);
        for bad in ["0", "-3", "abc", "NaN", "inf"] {
            assert_eq!(
                check_format(&Format::PositiveNumber, &text(bad)),
                Some(ErrorCode::NotPositive),
                "{bad}"
            );
        }
    }

    #[test]
    fn min_length_counts_characters() {
        let format = Format::MinLength { min: 3 };
        assert_eq!(check_format(&format, &text("héé")), None);
        assert_eq!(check_format(&format, &text("hé")), Some(ErrorCode::TooShort));
    }

    #[test]
    fn datetime_accepts_local_input_shapes() {
        assert!(is_local_datetime("2024-05-01T09:30"));
        assert!(is_local_datetime("2024-05-01T09:30:15"));
        assert!(!is_local_datetime("2024-05-01"));
        assert!(!is_local_datetime("tomorrow at nine"));
    }
}
