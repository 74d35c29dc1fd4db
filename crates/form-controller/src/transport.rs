use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use form_spec::{QuestionCatalog, QuestionsResponse, Record, SubmitResponse};

/// Failures talking to the follow-up question or submission endpoint.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {status}")]
    Status { status: u16 },
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

/// What the controller hands to a transport on submit.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest {
    pub form_id: String,
    pub category: Option<String>,
    pub record: Record,
}

/// Request/response channel used by the controller.
///
/// Both calls resolve to the list of follow-up questions for a category.
pub trait Transport {
    fn fetch_questions(
        &self,
        topic: &str,
    ) -> impl Future<Output = Result<Vec<String>, TransportError>> + Send;

    fn submit(
        &self,
        request: &SubmitRequest,
    ) -> impl Future<Output = Result<Vec<String>, TransportError>> + Send;
}

/// Answers directly from an in-process catalog.
#[derive(Debug, Clone)]
pub struct LocalTransport {
    catalog: Arc<QuestionCatalog>,
}

impl LocalTransport {
    pub fn new(catalog: Arc<QuestionCatalog>) -> Self {
        Self { catalog }
    }

    pub fn builtin() -> Self {
        Self::new(Arc::new(QuestionCatalog::builtin()))
    }
}

impl Transport for LocalTransport {
    async fn fetch_questions(&self, topic: &str) -> Result<Vec<String>, TransportError> {
        Ok(self.catalog.lookup(topic).to_vec())
    }

    async fn submit(&self, request: &SubmitRequest) -> Result<Vec<String>, TransportError> {
        let questions = request
            .category
            .as_deref()
            .map(|category| self.catalog.lookup(category).to_vec())
            .unwrap_or_default();
        Ok(questions)
    }
}

/// Client for the `/questions` and `/submit` endpoints.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(TransportError::Status {
            status: status.as_u16(),
        })
    }
}

impl Transport for HttpTransport {
    async fn fetch_questions(&self, topic: &str) -> Result<Vec<String>, TransportError> {
        let response = self
            .client
            .get(self.url("/questions"))
            .query(&[("topic", topic)])
            .send()
            .await?;
        let body: QuestionsResponse = ensure_success(response)?.json().await?;
        Ok(body.questions)
    }

    async fn submit(&self, request: &SubmitRequest) -> Result<Vec<String>, TransportError> {
        let response = self
            .client
            .post(self.url("/submit"))
            .query(&[("form", request.form_id.as_str())])
            .json(&request.record)
            .send()
            .await?;
        let body: SubmitResponse = ensure_success(response)?.json().await?;
        Ok(body.additional_questions)
    }
}
