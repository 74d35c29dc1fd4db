use form_server::{AppState, ServerConfig, build_app_router};
use form_spec::QuestionCatalog;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "form_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    let catalog = match &config.questions_file {
        Some(path) => QuestionCatalog::from_path(path)?,
        None => QuestionCatalog::builtin(),
    };
    tracing::info!(topics = catalog.len(), "Question catalog loaded");

    let addr = config.socket_addr();
    let app = build_app_router(AppState::new(catalog), &config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Starting server on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
