use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::models::SourceSummary;
use crate::state::AppState;

/// GET /api/sources - distinct indexed sources with chunk counts.
pub async fn list_sources(
    State(state): State<AppState>,
) -> Result<Json<Vec<SourceSummary>>, (StatusCode, String)> {
    let sources = state.retriever.list_sources().await.map_err(|e| {
        tracing::error!("Listing sources failed: {e:#}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Listing sources failed: {e}"),
        )
    })?;

    Ok(Json(sources))
}
