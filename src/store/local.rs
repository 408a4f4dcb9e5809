//! In-process Index Store with disk persistence and cosine similarity search.
//! Embeddings come from the injected [`Embedder`]; chunk texts are embedded
//! at `add` time and queries at `query` time.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::llm::embeddings::Embedder;
use crate::models::{ChunkMeta, ChunkRecord};
use crate::store::{ChunkBatch, ChunkFilter, IndexStore, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredChunk {
    id: String,
    text: String,
    meta: ChunkMeta,
    embedding: Vec<f32>,
}

pub struct LocalStore {
    entries: RwLock<Vec<StoredChunk>>,
    persist_path: std::path::PathBuf,
    embedder: Arc<dyn Embedder>,
}

impl LocalStore {
    pub fn open_or_create(store_dir: &Path, embedder: Arc<dyn Embedder>) -> Result<Self, StoreError> {
        std::fs::create_dir_all(store_dir)?;
        let persist_path = store_dir.join("chunks.json");

        let entries = if persist_path.exists() {
            let data = std::fs::read_to_string(&persist_path)?;
            serde_json::from_str(&data).unwrap_or_default()
        } else {
            Vec::new()
        };

        Ok(Self {
            entries: RwLock::new(entries),
            persist_path,
            embedder,
        })
    }

    fn persist(&self, entries: &[StoredChunk]) -> Result<(), StoreError> {
        // Atomic write via temp file + rename
        let data = serde_json::to_string(entries)?;
        let tmp_path = self.persist_path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &data)?;
        std::fs::rename(&tmp_path, &self.persist_path)?;
        Ok(())
    }
}

#[async_trait]
impl IndexStore for LocalStore {
    async fn get(&self, filter: &ChunkFilter) -> Result<ChunkBatch, StoreError> {
        let entries = self.entries.read();
        let mut batch = ChunkBatch::default();

        for entry in entries.iter().filter(|e| filter.matches(&e.meta)) {
            batch.ids.push(entry.id.clone());
            batch.documents.push(entry.text.clone());
            batch.metadatas.push(entry.meta.clone());
        }

        Ok(batch)
    }

    async fn query(
        &self,
        text: &str,
        n: usize,
        filter: &ChunkFilter,
    ) -> Result<Vec<String>, StoreError> {
        let query_embedding = self
            .embedder
            .embed_single(text)
            .await
            .map_err(|e| StoreError::Unavailable(format!("embedding failed: {e}")))?;

        let entries = self.entries.read();
        let mut scored: Vec<(f32, &StoredChunk)> = entries
            .iter()
            .filter(|e| filter.matches(&e.meta))
            .map(|e| (cosine_similarity(&query_embedding, &e.embedding), e))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(n);

        Ok(scored.into_iter().map(|(_, e)| e.id.clone()).collect())
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

        let mut entries = self.entries.write();
        for (chunk, embedding) in chunks.iter().zip(embeddings) {
            entries.push(StoredChunk {
                id: chunk.id.clone(),
                text: chunk.text.clone(),
                meta: chunk.meta.clone(),
                embedding,
            });
        }

        self.persist(&entries)
    }

    async fn delete(&self, ids: &[String]) -> Result<usize, StoreError> {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|e| !ids.contains(&e.id));
        let removed = before - entries.len();

        self.persist(&entries)?;
        Ok(removed)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for i in 0..a.len() {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}
