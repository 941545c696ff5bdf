// LMS FAQ assistant backend
// Rule-based FAQ matching behind a small JSON API

mod brain;
mod config;
mod database;
mod error;
mod models;
mod server;
mod store;

#[cfg(test)]
mod tests;

use anyhow::Context;
use brain::FaqAssistant;
use config::{AppConfig, LogFormat};
use server::{create_router, AppState};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "info,lms_faq_core=debug,sqlx=warn";

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;
    init_tracing(config.log_format);

    let store = store::select_store(&config.database_url, config.seed_faqs).await;
    info!("FAQ store: {:?}", store.kind());

    let assistant = FaqAssistant::new(store, &config.matcher)
        .context("Invalid matcher configuration")?
        .with_store_timeout(config.store_timeout);
    let app = create_router(AppState::new(assistant), config.request_timeout);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
