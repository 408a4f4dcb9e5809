//! HTTP adapter for a Chroma-style REST index store.
//!
//! The collection is resolved once at construction (get-or-create); every
//! operation then targets `/api/v1/collections/{id}/...`. Embeddings are
//! produced client-side by the injected [`Embedder`] because the REST API
//! does not embed on the server.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::llm::embeddings::Embedder;
use crate::models::{ChunkMeta, ChunkRecord};
use crate::store::{ChunkBatch, ChunkFilter, IndexStore, StoreError};

pub struct ChromaStore {
    client: reqwest::Client,
    base_url: String,
    collection_id: String,
    embedder: Arc<dyn Embedder>,
}

impl ChromaStore {
    /// Resolve (or create) the named collection and return a ready store handle.
    pub async fn connect(
        client: reqwest::Client,
        base_url: &str,
        collection: &str,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self, StoreError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let url = format!("{base_url}/api/v1/collections");

        let resp = client
            .post(&url)
            .json(&json!({ "name": collection, "get_or_create": true }))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Protocol(format!(
                "collection setup returned {status}: {body}"
            )));
        }

        let body: CollectionResponse = resp
            .json()
            .await
            .map_err(|e| StoreError::Protocol(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            collection_id: body.id,
            embedder,
        })
    }

    fn collection_url(&self, op: &str) -> String {
        format!(
            "{}/api/v1/collections/{}/{op}",
            self.base_url, self.collection_id
        )
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        op: &str,
        body: &serde_json::Value,
    ) -> Result<T, StoreError> {
        let resp = self
            .client
            .post(self.collection_url(op))
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(StoreError::Protocol(format!(
                "{op} returned {status}: {text}"
            )));
        }

        resp.json::<T>()
            .await
            .map_err(|e| StoreError::Protocol(e.to_string()))
    }
}

/// Equality filter in Chroma's `where` syntax; None when unfiltered.
fn where_clause(filter: &ChunkFilter) -> Option<serde_json::Value> {
    let sources = filter.sources.as_ref()?;
    match sources.as_slice() {
        [single] => Some(json!({ "source": { "$eq": single } })),
        many => Some(json!({ "source": { "$in": many } })),
    }
}

#[async_trait]
impl IndexStore for ChromaStore {
    async fn get(&self, filter: &ChunkFilter) -> Result<ChunkBatch, StoreError> {
        let mut body = json!({ "include": ["documents", "metadatas"] });
        if let Some(clause) = where_clause(filter) {
            body["where"] = clause;
        }

        let resp: GetResponse = self.post_json("get", &body).await?;

        let metadatas = resp
            .metadatas
            .into_iter()
            .map(|m| m.into_meta())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ChunkBatch {
            ids: resp.ids,
            documents: resp.documents,
            metadatas,
        })
    }

    async fn query(
        &self,
        text: &str,
        n: usize,
        filter: &ChunkFilter,
    ) -> Result<Vec<String>, StoreError> {
        let embedding = self
            .embedder
            .embed_single(text)
            .await
            .map_err(|e| StoreError::Unavailable(format!("embedding failed: {e}")))?;

        let mut body = json!({
            "query_embeddings": [embedding],
            "n_results": n,
            "include": [],
        });
        if let Some(clause) = where_clause(filter) {
            body["where"] = clause;
        }

        let resp: QueryResponse = self.post_json("query", &body).await?;
        Ok(resp.ids.into_iter().next().unwrap_or_default())
    }

    async fn add(&self, chunks: &[ChunkRecord]) -> Result<(), StoreError> {
        if chunks.is_empty() {
            return Ok(());
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self
            .embedder
            .embed_batch(&texts)
            .await
            .map_err(|e| StoreError::Unavailable(format!("embedding failed: {e}")))?;

        if embeddings.len() != chunks.len() {
            return Err(StoreError::Protocol(format!(
                "embedder returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        let metadatas: Vec<serde_json::Value> = chunks
            .iter()
            .map(|c| {
                json!({
                    "source": c.meta.source,
                    "page_number": c.meta.page_number,
                    "chunk_serial": c.meta.chunk_serial,
                    "full_page_content": c.meta.full_page_content,
                })
            })
            .collect();

        let body = json!({
            "ids": ids,
            "documents": texts,
            "embeddings": embeddings,
            "metadatas": metadatas,
        });

        let _: serde_json::Value = self.post_json("add", &body).await?;
        Ok(())
    }

    async fn delete(&self, ids: &[String]) -> Result<usize, StoreError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let body = json!({ "ids": ids });
        let _: serde_json::Value = self.post_json("delete", &body).await?;
        Ok(ids.len())
    }
}

// ─── Response types ────────────────────────────────────

#[derive(Deserialize)]
struct CollectionResponse {
    id: String,
}

#[derive(Deserialize)]
struct GetResponse {
    ids: Vec<String>,
    #[serde(default)]
    documents: Vec<String>,
    #[serde(default)]
    metadatas: Vec<RawMeta>,
}

#[derive(Deserialize)]
struct QueryResponse {
    /// One inner list per query embedding; we always send exactly one.
    ids: Vec<Vec<String>>,
}

/// Chroma stores metadata as a flat scalar map.
#[derive(Deserialize)]
struct RawMeta {
    source: String,
    page_number: usize,
    chunk_serial: u64,
    full_page_content: String,
}

impl RawMeta {
    fn into_meta(self) -> Result<ChunkMeta, StoreError> {
        Ok(ChunkMeta {
            source: self.source,
            page_number: self.page_number,
            chunk_serial: self.chunk_serial,
            full_page_content: self.full_page_content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_where_clause_none_for_unfiltered() {
        assert!(where_clause(&ChunkFilter::all()).is_none());
    }

    #[test]
    fn test_where_clause_single_source_uses_eq() {
        let clause = where_clause(&ChunkFilter::by_source("a.pdf")).unwrap();
        assert_eq!(clause, json!({ "source": { "$eq": "a.pdf" } }));
    }

    #[test]
    fn test_where_clause_multiple_sources_use_in() {
        let clause = where_clause(&ChunkFilter::by_sources(vec![
            "a.pdf".to_string(),
            "b.pdf".to_string(),
        ]))
        .unwrap();
        assert_eq!(clause, json!({ "source": { "$in": ["a.pdf", "b.pdf"] } }));
    }
}
