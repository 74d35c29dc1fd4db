use std::sync::Arc;

use form_spec::QuestionCatalog;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// The catalog is loaded once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<QuestionCatalog>,
}

impl AppState {
    pub fn new(catalog: QuestionCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }
}
