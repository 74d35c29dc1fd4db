use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::{Json, Router, routing::post};
use serde::Deserialize;

use form_spec::{Record, SubmitResponse, forms};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitQuery {
    /// Built-in form the record belongs to; defaults to the survey.
    pub form: Option<String>,
}

/// `POST /submit`: answers with the follow-up questions for the submitted
/// record's category. Nothing is stored.
async fn submit(
    State(state): State<AppState>,
    Query(query): Query<SubmitQuery>,
    payload: Result<Json<Record>, JsonRejection>,
) -> AppResult<Json<SubmitResponse>> {
    let form_id = query.form.as_deref().unwrap_or(forms::SURVEY);
    let form = forms::builtin(form_id).ok_or_else(|| AppError::UnknownForm(form_id.to_string()))?;
    let Json(record) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let category = form.category_value(&record);
    let additional_questions = category
        .map(|topic| state.catalog.lookup(topic).to_vec())
        .unwrap_or_default();
    tracing::info!(
        form = %form.id,
        category = ?category,
        questions = additional_questions.len(),
        "submission received"
    );

    Ok(Json(SubmitResponse {
        additional_questions,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/submit", post(submit))
}
