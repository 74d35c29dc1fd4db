pub mod config;
pub mod error;
pub mod router;
pub mod routes;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use router::build_app_router;
pub use state::AppState;
