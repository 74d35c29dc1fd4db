use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use form_server::{AppState, ServerConfig, build_app_router};
use form_spec::QuestionCatalog;

/// Router over the built-in catalog with the production middleware stack.
pub fn build_test_app() -> Router {
    build_test_app_with(QuestionCatalog::builtin())
}

pub fn build_test_app_with(catalog: QuestionCatalog) -> Router {
    let config = ServerConfig::default();
    build_app_router(AppState::new(catalog), &config)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: &Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
