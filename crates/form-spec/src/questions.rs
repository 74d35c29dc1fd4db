use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

static BUILTIN: LazyLock<QuestionCatalog> = LazyLock::new(QuestionCatalog::builtin);

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read question catalog {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse question catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Body of `GET /questions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub questions: Vec<String>,
}

/// Body of `POST /submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub additional_questions: Vec<String>,
}

/// Read-only mapping from a category value to its follow-up questions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionCatalog {
    topics: BTreeMap<String, Vec<String>>,
}

impl QuestionCatalog {
    /// The seed catalog: two questions each for Technology, Health and
    /// Education.
    pub fn builtin() -> Self {
        let seed: [(&str, [&str; 2]); 3] = [
            (
                "Technology",
                [
                    "What is your favorite IDE?",
                    "Do you contribute to open-source projects?",
                ],
            ),
            (
                "Health",
                [
                    "Do you track your daily calorie intake?",
                    "Do you prefer home workouts or gym?",
                ],
            ),
            (
                "Education",
                [
                    "What was your favorite subject in school?",
                    "Do you prefer online courses or in-person classes?",
                ],
            ),
        ];
        let topics = seed
            .into_iter()
            .map(|(topic, questions)| {
                (
                    topic.to_string(),
                    questions.iter().map(|question| question.to_string()).collect::<Vec<_>>(),
                )
            })
            .collect();
        Self { topics }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Questions for `topic`; unknown topics yield an empty slice.
    pub fn lookup(&self, topic: &str) -> &[String] {
        self.topics.get(topic).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.topics.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

/// Looks `topic` up in the process-wide built-in catalog.
pub fn lookup(topic: &str) -> &'static [String] {
    BUILTIN.lookup(topic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_catalog_has_two_questions_per_topic() {
        let catalog = QuestionCatalog::builtin();
        assert_eq!(catalog.topics().collect::<Vec<_>>(), ["Education", "Health", "Technology"]);
        assert_eq!(
            catalog.lookup("Technology"),
            [
                "What is your favorite IDE?".to_string(),
                "Do you contribute to open-source projects?".to_string()
            ]
        );
    }

    #[test]
    fn unknown_topic_is_empty_and_stable() {
        assert!(lookup("Unknown").is_empty());
        assert_eq!(lookup("Health"), lookup("Health"));
        assert_eq!(lookup("Health").len(), 2);
        assert!(lookup("health").is_empty());
    }

    #[test]
    fn catalog_loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, r#"{{"Finance": ["Do you keep a budget?"]}}"#).expect("write");
        let catalog = QuestionCatalog::from_path(file.path()).expect("catalog");
        assert_eq!(catalog.lookup("Finance"), ["Do you keep a budget?".to_string()]);
        assert!(catalog.lookup("Technology").is_empty());
    }

    #[test]
    fn malformed_catalog_is_reported() {
        assert!(matches!(
            QuestionCatalog::from_json_str(r#"{"Finance": "not a list"}"#),
            Err(CatalogError::Parse(_))
        ));
    }
}
