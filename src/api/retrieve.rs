use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::context;
use crate::llm::query_expand;
use crate::models::{RetrieveRequest, RetrieveResponse};
use crate::state::AppState;
use crate::store::ChunkFilter;

/// POST /api/retrieve - Full hybrid retrieval pipeline:
///   1. Query translation + expansion (up to 2 alternative phrasings)
///   2. Per-variant BM25 + semantic search, fused with RRF
///   3. Page-level merge keeping the max fused score per page
///   4. Optional cross-encoder rerank with RRF fallback
///   5. Context assembly for the answer-synthesis collaborator
pub async fn retrieve(
    State(state): State<AppState>,
    Json(req): Json<RetrieveRequest>,
) -> Result<Json<RetrieveResponse>, (StatusCode, String)> {
    let query = req.query.trim().to_string();
    if query.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Query is required".to_string()));
    }

    let filter = match req.sources {
        Some(sources) if !sources.is_empty() => ChunkFilter::by_sources(sources),
        _ => ChunkFilter::all(),
    };

    let variants = if req.use_expansion {
        query_expand::expand_with_fallback(&state.http_client, &state.config.llm, &query).await
    } else {
        vec![query.clone()]
    };

    let pages = state
        .retriever
        .retrieve(&variants, &filter, req.max_pages)
        .await
        .map_err(|e| {
            tracing::error!("Retrieval failed: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Retrieval failed: {e}"),
            )
        })?;

    let context = context::assemble(&pages, req.max_pages);

    Ok(Json(RetrieveResponse {
        query,
        variants,
        pages,
        context,
    }))
}
