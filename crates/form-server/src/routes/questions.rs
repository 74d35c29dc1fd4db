use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::{Json, Router, routing::get};
use serde::Deserialize;

use form_spec::QuestionsResponse;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TopicQuery {
    pub topic: Option<String>,
}

/// `GET /questions?topic=T`; unknown, missing or unreadable topics get an
/// empty list.
async fn list_questions(
    State(state): State<AppState>,
    query: Result<Query<TopicQuery>, QueryRejection>,
) -> Json<QuestionsResponse> {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "ignoring malformed question query");
            TopicQuery { topic: None }
        }
    };
    let questions = query
        .topic
        .as_deref()
        .map(|topic| state.catalog.lookup(topic).to_vec())
        .unwrap_or_default();
    tracing::debug!(topic = ?query.topic, count = questions.len(), "follow-up questions");
    Json(QuestionsResponse { questions })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/questions", get(list_questions))
}
