//! Cross-encoder reranker capability.
//!
//! Selected once at construction from configuration: [`HttpReranker`] talks
//! to a Cohere-compatible `/v1/rerank` endpoint (e.g. llama-server with a
//! reranker model); [`NoopReranker`] is the permanent-fallback implementation
//! when no endpoint is configured. The retrieval pipeline treats a failed
//! call and an inactive capability identically: keep the RRF order.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::RerankerConfig;

/// Result of reranking a single document.
#[derive(Debug, Clone)]
pub struct RerankResult {
    /// Index into the original documents array.
    pub index: usize,
    /// Relevance score reported by the model.
    pub score: f32,
}

#[async_trait]
pub trait Reranker: Send + Sync {
    /// Whether a reranking capability is configured. Detected once at
    /// construction; `false` means callers skip the call entirely.
    fn is_active(&self) -> bool;

    /// Score `documents` against `query` and return the `top_n` most relevant
    /// as indices into the input, sorted by descending score.
    async fn rerank(
        &self,
        query: &str,
        documents: &[String],
        top_n: usize,
    ) -> Result<Vec<RerankResult>>;
}

/// Build the reranker implied by configuration.
pub fn from_config(client: reqwest::Client, config: &RerankerConfig) -> Arc<dyn Reranker> {
    match &config.base_url {
        Some(_) => Arc::new(HttpReranker {
            client,
            config: config.clone(),
        }),
        None => {
            tracing::info!("No reranker configured; retrieval will use RRF order");
            Arc::new(NoopReranker)
        }
    }
}

/// Reranking disabled. Never called by the pipeline, but returns an error
/// rather than a fabricated ranking if something calls it anyway.
pub struct NoopReranker;

#[async_trait]
impl Reranker for NoopReranker {
    fn is_active(&self) -> bool {
        false
    }

    async fn rerank(
        &self,
        _query: &str,
        _documents: &[String],
        _top_n: usize,
    ) -> Result<Vec<RerankResult>> {
        anyhow::bail!("Reranker not configured")
    }
}

pub struct HttpReranker {
    client: reqwest::Client,
    config: RerankerConfig,
}

#[async_trait]
impl Reranker for HttpReranker {
    fn is_active(&self) -> bool {
        true
    }

    async fn rerank(
        &self,
        query: &str,
        documents: &[String],
        top_n: usize,
    ) -> Result<Vec<RerankResult>> {
        let base_url = self
            .config
            .base_url
            .as_deref()
            .context("Reranker base_url not configured")?;
        let model = self.config.model.as_deref().unwrap_or("default");

        let url = format!("{}/v1/rerank", base_url.trim_end_matches('/'));

        let req_body = RerankRequest {
            model: model.to_string(),
            query: query.to_string(),
            documents: documents.to_vec(),
            top_n,
        };

        let timeout = std::time::Duration::from_secs(self.config.timeout_secs.min(30));

        let resp = self
            .client
            .post(&url)
            .timeout(timeout)
            .json(&req_body)
            .send()
            .await
            .context("Failed to reach reranker endpoint")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Reranker returned {status}: {body}");
        }

        let body: RerankResponse = resp
            .json()
            .await
            .context("Failed to parse reranker response")?;

        let mut results: Vec<RerankResult> = body
            .results
            .into_iter()
            .map(|r| RerankResult {
                index: r.index,
                score: r.relevance_score,
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_n);

        Ok(results)
    }
}

// ─── Request/Response types ────────────────────────────

#[derive(Serialize)]
struct RerankRequest {
    model: String,
    query: String,
    documents: Vec<String>,
    top_n: usize,
}

#[derive(Deserialize)]
struct RerankResponse {
    results: Vec<RerankResultRaw>,
}

#[derive(Deserialize)]
struct RerankResultRaw {
    index: usize,
    relevance_score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RerankerConfig;

    #[test]
    fn test_from_config_without_url_is_inactive() {
        let reranker = from_config(reqwest::Client::new(), &RerankerConfig::default());
        assert!(!reranker.is_active());
    }

    #[test]
    fn test_from_config_with_url_is_active() {
        let config = RerankerConfig {
            base_url: Some("http://127.0.0.1:8082".to_string()),
            model: Some("rerank-v3.5".to_string()),
            timeout_secs: 10,
        };
        let reranker = from_config(reqwest::Client::new(), &config);
        assert!(reranker.is_active());
    }

    #[tokio::test]
    async fn test_noop_rerank_errors() {
        let result = NoopReranker.rerank("q", &["doc".to_string()], 1).await;
        assert!(result.is_err());
    }
}
