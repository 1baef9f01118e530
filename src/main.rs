mod config;
mod error;
mod gemini;
mod generator;
mod models;
mod normalize;
mod parse;
mod prompt;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::AppConfig;
use crate::gemini::GeminiClient;
use crate::generator::AdCopyGenerator;
use crate::routes::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Init tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = AppConfig::from_env()?;
    if config.gemini.api_key.is_some() {
        tracing::info!("GEMINI_API_KEY is set");
    } else {
        tracing::warn!("GEMINI_API_KEY is not set; ad generation requests will fail");
    }
    tracing::info!(
        headline_max = config.rules.headline_max_chars,
        description_max = config.rules.description_max_chars,
        join_headlines = config.rules.join_headlines,
        model = %config.gemini.model,
        "Ad rules loaded"
    );

    let generator = AdCopyGenerator::new(
        Arc::new(GeminiClient::new(config.gemini.clone())),
        config.rules.clone(),
        config.params.clone(),
        config.request_timeout,
    );
    let app = build_router(AppState { generator: Arc::new(generator) });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutting down");
        })
        .await?;
    Ok(())
}
