use std::sync::LazyLock;

use handlebars::Handlebars;
use serde::Serialize;

use crate::result::ErrorCode;

static TEMPLATES: LazyLock<Handlebars<'static>> = LazyLock::new(|| {
    let mut registry = Handlebars::new();
    registry.register_escape_fn(handlebars::no_escape);
    registry
});

/// Values available to message templates.
#[derive(Debug, Clone, Serialize)]
pub struct MessageContext<'a> {
    pub field: &'a str,
    pub label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
}

pub fn default_template(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::Required => "{{label}} is required",
        ErrorCode::TypeMismatch => "{{label}} has the wrong type",
        ErrorCode::NotPositive => "{{label}} must be a positive number",
        ErrorCode::TooShort => "{{label}} must be at least {{min}} characters",
        ErrorCode::InvalidChoice
        | ErrorCode::InvalidDatetime
        | ErrorCode::InvalidEmail
        | ErrorCode::InvalidUrl
        | ErrorCode::PatternMismatch => "{{label}} is not valid",
    }
}

/// Renders `template`; a template that does not render is returned as is.
pub fn render(template: &str, ctx: &MessageContext<'_>) -> String {
    match TEMPLATES.render_template(template, ctx) {
        Ok(message) => message,
        Err(err) => {
            tracing::debug!(error = %err, template, "message template did not render");
            template.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_label_and_min_without_escaping() {
        let ctx = MessageContext {
            field: "highestQualification",
            label: "Bachelor's degree",
            min: Some(50),
        };
        assert_eq!(
            render(default_template(ErrorCode::TooShort), &ctx),
            "Bachelor's degree must be at least 50 characters"
        );
    }

    #[test]
    fn broken_template_falls_back_to_raw_text() {
        let ctx = MessageContext {
            field: "email",
            label: "Email",
            min: None,
        };
        assert_eq!(render("{{#if}}oops", &ctx), "{{#if}}oops");
    }
}
