use axum::routing::{get, post};
use axum::Router;
use tracing_subscriber::EnvFilter;

use doc_search::api;
use doc_search::config::Config;
use doc_search::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Store backend: {}", config.store_backend);
    tracing::info!("LLM provider: {} ({})", config.llm.provider, config.llm.base_url);
    if config.reranker.base_url.is_none() {
        tracing::info!("Reranker: not configured (RRF order only)");
    }

    let state = AppState::new(config.clone()).await?;

    let app = Router::new()
        .route("/api/retrieve", post(api::retrieve::retrieve))
        .route("/api/sources", get(api::sources::list_sources))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
