//! Rule tables for the built-in survey, event registration and job
//! application forms.
//!
//! Guard ids are exported so callers that render these forms can ask the
//! same predicates the validator uses.

use std::collections::BTreeMap;

use crate::expr::Expr;
use crate::spec::field::{FieldKind, FieldSpec};
use crate::spec::form::FormSpec;
use crate::spec::rule::{FieldRule, Format, Guard, RuleSet};

pub const SURVEY: &str = "survey";
pub const EVENT_REGISTRATION: &str = "event-registration";
pub const JOB_APPLICATION: &str = "job-application";

pub const TECHNOLOGY_TOPIC: &str = "technology-topic";
pub const HEALTH_TOPIC: &str = "health-topic";
pub const EDUCATION_TOPIC: &str = "education-topic";
pub const ATTENDING_WITH_GUEST: &str = "attending-with-guest";
pub const DEVELOPER_OR_DESIGNER: &str = "developer-or-designer";
pub const DESIGNER: &str = "designer";
pub const MANAGER: &str = "manager";

pub const FEEDBACK_MIN_LENGTH: usize = 50;

const VERSION: &str = "1.0.0";

/// Ids of every built-in form.
pub fn ids() -> [&'static str; 3] {
    [SURVEY, EVENT_REGISTRATION, JOB_APPLICATION]
}

/// Returns a fresh copy of the built-in form with `id`.
pub fn builtin(id: &str) -> Option<FormSpec> {
    match id {
        SURVEY => Some(survey()),
        EVENT_REGISTRATION => Some(event_registration()),
        JOB_APPLICATION => Some(job_application()),
        _ => None,
    }
}

pub fn all() -> Vec<FormSpec> {
    vec![survey(), event_registration(), job_application()]
}

pub fn survey() -> FormSpec {
    FormSpec {
        id: SURVEY.into(),
        title: "Survey Form".into(),
        version: VERSION.into(),
        description: Some("Topic survey with follow-up questions per topic.".into()),
        category: Some("surveyTopic".into()),
        fields: vec![
            FieldSpec::new("fullName", "Full Name", FieldKind::Text),
            FieldSpec::new("email", "Email", FieldKind::Text),
            FieldSpec::new("surveyTopic", "Survey Topic", FieldKind::Enum).choices([
                "Technology",
                "Health",
                "Education",
            ]),
            FieldSpec::new(
                "favoriteProgrammingLanguage",
                "Favorite Programming Language",
                FieldKind::Enum,
            )
            .choices(["JavaScript", "Python", "Java", "C#"]),
            FieldSpec::new("yearsOfExperience", "Years of Experience", FieldKind::Number),
            FieldSpec::new("exerciseFrequency", "Exercise Frequency", FieldKind::Enum).choices([
                "Daily", "Weekly", "Monthly", "Rarely",
            ]),
            FieldSpec::new("dietPreference", "Diet Preference", FieldKind::Enum).choices([
                "Vegetarian",
                "Vegan",
                "Non-Vegetarian",
            ]),
            FieldSpec::new(
                "highestQualification",
                "Highest Qualification",
                FieldKind::Enum,
            )
            .choices(["High School", "Bachelor's", "Master's", "PhD"]),
            FieldSpec::new("fieldOfStudy", "Field of Study", FieldKind::Text),
            FieldSpec::new("feedback", "Feedback", FieldKind::Text),
        ],
        guards: vec![
            Guard::new(TECHNOLOGY_TOPIC, Expr::eq("surveyTopic", "Technology")),
            Guard::new(HEALTH_TOPIC, Expr::eq("surveyTopic", "Health")),
            Guard::new(EDUCATION_TOPIC, Expr::eq("surveyTopic", "Education")),
        ],
        rule_sets: vec![
            RuleSet::unconditional(
                "identity",
                vec![
                    FieldRule::required("fullName"),
                    FieldRule::required("email").format(Format::Email),
                    FieldRule::required("surveyTopic"),
                ],
            ),
            RuleSet::guarded(
                "technology",
                TECHNOLOGY_TOPIC,
                vec![
                    FieldRule::required("favoriteProgrammingLanguage"),
                    FieldRule::required("yearsOfExperience"),
                ],
            ),
            RuleSet::guarded(
                "health",
                HEALTH_TOPIC,
                vec![
                    FieldRule::required("exerciseFrequency"),
                    FieldRule::required("dietPreference"),
                ],
            ),
            RuleSet::guarded(
                "education",
                EDUCATION_TOPIC,
                vec![
                    FieldRule::required("highestQualification"),
                    FieldRule::required("fieldOfStudy"),
                ],
            ),
            RuleSet::unconditional(
                "feedback",
                vec![FieldRule::required("feedback").format(Format::MinLength {
                    min: FEEDBACK_MIN_LENGTH,
                })],
            ),
        ],
    }
}

pub fn event_registration() -> FormSpec {
    FormSpec {
        id: EVENT_REGISTRATION.into(),
        title: "Event Registration Form".into(),
        version: VERSION.into(),
        description: None,
        category: None,
        fields: vec![
            FieldSpec::new("name", "Name", FieldKind::Text),
            FieldSpec::new("email", "Email", FieldKind::Text),
            FieldSpec::new("age", "Age", FieldKind::Number),
            FieldSpec::new(
                "isAttendingWithGuest",
                "Are you coming with a guest?",
                FieldKind::Enum,
            )
            .choices(["Yes", "No"])
            .default_value("No"),
            FieldSpec::new("guestName", "Guest Name", FieldKind::Text),
        ],
        guards: vec![Guard::new(
            ATTENDING_WITH_GUEST,
            Expr::eq("isAttendingWithGuest", "Yes"),
        )],
        rule_sets: vec![
            RuleSet::unconditional(
                "attendee",
                vec![
                    FieldRule::required("name"),
                    FieldRule::required("email").format(Format::Email),
                    FieldRule::required("age").format(Format::PositiveNumber),
                    FieldRule::optional("isAttendingWithGuest"),
                ],
            ),
            RuleSet::guarded(
                "guest",
                ATTENDING_WITH_GUEST,
                vec![FieldRule::required("guestName").required_message("Guest name is required")],
            ),
        ],
    }
}

pub fn job_application() -> FormSpec {
    let skills: BTreeMap<String, bool> = ["JavaScript", "CSS", "Python"]
        .into_iter()
        .map(|skill| (skill.to_string(), false))
        .collect();

    FormSpec {
        id: JOB_APPLICATION.into(),
        title: "Job Application Form".into(),
        version: VERSION.into(),
        description: None,
        category: Some("position".into()),
        fields: vec![
            FieldSpec::new("fullName", "Full Name", FieldKind::Text),
            FieldSpec::new("email", "Email", FieldKind::Text),
            FieldSpec::new("phoneNumber", "Phone Number", FieldKind::Text),
            FieldSpec::new("position", "Applying for Position", FieldKind::Enum).choices([
                "Developer",
                "Designer",
                "Manager",
            ]),
            FieldSpec::new("relevantExperience", "Relevant Experience", FieldKind::Number),
            FieldSpec::new("portfolioURL", "Portfolio URL", FieldKind::Text),
            FieldSpec::new(
                "managementExperience",
                "Management Experience",
                FieldKind::Text,
            ),
            FieldSpec::new("additionalSkills", "Additional Skills", FieldKind::Flags)
                .choices(["JavaScript", "CSS", "Python"])
                .default_value(skills),
            FieldSpec::new(
                "preferredInterviewTime",
                "Preferred Interview Time",
                FieldKind::Datetime,
            ),
        ],
        guards: vec![
            Guard::new(
                DEVELOPER_OR_DESIGNER,
                Expr::one_of("position", ["Developer", "Designer"]),
            ),
            Guard::new(DESIGNER, Expr::eq("position", "Designer")),
            Guard::new(MANAGER, Expr::eq("position", "Manager")),
        ],
        rule_sets: vec![
            RuleSet::unconditional(
                "applicant",
                vec![
                    FieldRule::required("fullName"),
                    FieldRule::required("email").format(Format::Email),
                    FieldRule::required("phoneNumber"),
                    FieldRule::optional("position"),
                ],
            ),
            RuleSet::guarded(
                "experience",
                DEVELOPER_OR_DESIGNER,
                vec![FieldRule::required("relevantExperience")],
            ),
            RuleSet::guarded(
                "portfolio",
                DESIGNER,
                vec![FieldRule::required("portfolioURL").format(Format::Url)],
            ),
            RuleSet::guarded(
                "management",
                MANAGER,
                vec![FieldRule::required("managementExperience")],
            ),
            RuleSet::unconditional(
                "scheduling",
                vec![
                    FieldRule::required("additionalSkills")
                        .required_message("At least one skill must be selected"),
                    FieldRule::required("preferredInterviewTime"),
                ],
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_forms_pass_definition_checks() {
        for spec in all() {
            spec.check()
                .unwrap_or_else(|err| panic!("{} is malformed: {err}", spec.id));
        }
    }

    #[test]
    fn builtin_lookup_matches_ids() {
        for id in ids() {
            assert_eq!(builtin(id).map(|spec| spec.id), Some(id.to_string()));
        }
        assert!(builtin("newsletter").is_none());
    }
}
