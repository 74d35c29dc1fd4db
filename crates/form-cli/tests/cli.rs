use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use serde_json::{Value, json};

fn formkit() -> Command {
    let mut cmd = Command::cargo_bin("formkit").expect("binary");
    cmd.env_remove("FORMKIT_QUESTIONS");
    cmd
}

fn stdout_of(cmd: &mut Command) -> (bool, String) {
    let output = cmd.output().expect("run formkit");
    (
        output.status.success(),
        String::from_utf8(output.stdout).expect("utf8"),
    )
}

#[test]
fn validate_reports_missing_conditional_field() {
    let temp = TempDir::new().unwrap();
    let record = temp.child("record.json");
    record
        .write_str(
            &json!({
                "fullName": "Ada Lovelace",
                "email": "ada@example.com",
                "surveyTopic": "Technology",
                "favoriteProgrammingLanguage": "",
                "yearsOfExperience": "3",
                "feedback": "x".repeat(50)
            })
            .to_string(),
        )
        .unwrap();

    let (ok, stdout) = stdout_of(formkit().args([
        "validate",
        "--form",
        "survey",
        "--record",
        record.path().to_str().unwrap(),
    ]));
    assert!(!ok);
    assert!(stdout.contains("Validation result: invalid"));
    assert!(stdout.contains(
        "favoriteProgrammingLanguage - Favorite Programming Language is required (required)"
    ));
    assert!(!stdout.contains("email -"));
}

#[test]
fn validate_json_output_for_valid_record() {
    let temp = TempDir::new().unwrap();
    let record = temp.child("record.json");
    record
        .write_str(
            &json!({
                "name": "Linus",
                "email": "linus@example.org",
                "age": 34,
                "isAttendingWithGuest": "No"
            })
            .to_string(),
        )
        .unwrap();

    let (ok, stdout) = stdout_of(formkit().args([
        "validate",
        "--form",
        "event-registration",
        "--record",
        record.path().to_str().unwrap(),
        "--json",
    ]));
    assert!(ok);
    let parsed: Value = serde_json::from_str(&stdout).expect("json");
    assert_eq!(parsed, json!({}));
}

#[test]
fn validate_accepts_custom_spec_file() {
    let temp = TempDir::new().unwrap();
    let spec = temp.child("spec.json");
    spec.write_str(
        &json!({
            "id": "rsvp",
            "title": "RSVP",
            "version": "1.0",
            "fields": [{ "name": "email", "label": "Email", "type": "text" }],
            "rule_sets": [{
                "id": "contact",
                "rules": [{ "field": "email", "required": true, "formats": [{ "kind": "email" }] }]
            }]
        })
        .to_string(),
    )
    .unwrap();
    let record = temp.child("record.json");
    record.write_str(r#"{"email": "a@b"}"#).unwrap();

    let (ok, stdout) = stdout_of(formkit().args([
        "validate",
        "--spec",
        spec.path().to_str().unwrap(),
        "--record",
        record.path().to_str().unwrap(),
    ]));
    assert!(!ok);
    assert!(stdout.contains("email - Email is not valid (invalid_email)"));
}

#[test]
fn visible_lists_fields_for_selected_position() {
    let temp = TempDir::new().unwrap();
    let record = temp.child("record.json");
    record.write_str(r#"{"position": "Manager"}"#).unwrap();

    let (ok, stdout) = stdout_of(formkit().args([
        "visible",
        "--form",
        "job-application",
        "--record",
        record.path().to_str().unwrap(),
    ]));
    assert!(ok);
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines.contains(&"managementExperience"));
    assert!(!lines.contains(&"portfolioURL"));
    assert!(!lines.contains(&"relevantExperience"));
}

#[test]
fn questions_prints_builtin_topic() {
    let (ok, stdout) = stdout_of(formkit().args(["questions", "--topic", "Technology"]));
    assert!(ok);
    assert_eq!(
        stdout.lines().collect::<Vec<_>>(),
        [
            "What is your favorite IDE?",
            "Do you contribute to open-source projects?"
        ]
    );

    let (ok, stdout) = stdout_of(formkit().args(["questions", "--topic", "Unknown"]));
    assert!(ok);
    assert!(stdout.is_empty());
}

#[test]
fn questions_reads_catalog_from_env() {
    let temp = TempDir::new().unwrap();
    let catalog = temp.child("questions.json");
    catalog
        .write_str(r#"{"Finance": ["Do you keep a budget?"]}"#)
        .unwrap();

    let (ok, stdout) = stdout_of(
        formkit()
            .env("FORMKIT_QUESTIONS", catalog.path())
            .args(["questions", "--topic", "Finance"]),
    );
    assert!(ok);
    assert_eq!(stdout.trim(), "Do you keep a budget?");
}

#[test]
fn forms_and_show_expose_builtin_definitions() {
    let (ok, stdout) = stdout_of(formkit().arg("forms"));
    assert!(ok);
    assert!(stdout.contains("survey\tSurvey Form (category: surveyTopic)"));
    assert!(stdout.contains("event-registration\tEvent Registration Form"));

    let (ok, stdout) = stdout_of(formkit().args(["show", "--form", "job-application"]));
    assert!(ok);
    let spec: Value = serde_json::from_str(&stdout).expect("json");
    assert_eq!(spec["id"], "job-application");
    assert_eq!(spec["guards"].as_array().map(Vec::len), Some(3));
}

#[test]
fn schema_describes_form_spec() {
    let (ok, stdout) = stdout_of(formkit().arg("schema"));
    assert!(ok);
    let schema: Value = serde_json::from_str(&stdout).expect("json");
    assert_eq!(schema["title"], "FormSpec");
    assert!(schema["properties"]["rule_sets"].is_object());
}
