pub mod health;
pub mod questions;
pub mod submit;

use axum::Router;

use crate::state::AppState;

/// Routes of the follow-up question API.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(questions::router())
        .merge(submit::router())
}
