//! Index Store contract and implementations.
//!
//! The store owns the embedding/similarity math; the retrieval pipeline only
//! sees ordered candidate ids. Two backends ship: [`local::LocalStore`], an
//! in-process store with JSON persistence, and [`chroma::ChromaStore`], an
//! HTTP adapter for a Chroma-style REST service.

pub mod chroma;
pub mod local;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ChunkMeta, ChunkRecord};

/// Errors from the Index Store. Store failures are fatal to a retrieval:
/// no meaningful ranking is possible without the store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("index store unreachable: {0}")]
    Unavailable(String),
    #[error("index store protocol error: {0}")]
    Protocol(String),
    #[error("index store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("index store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Equality filter over chunk metadata. `sources: None` matches everything.
#[derive(Debug, Clone, Default)]
pub struct ChunkFilter {
    pub sources: Option<Vec<String>>,
}

impl ChunkFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_source(source: impl Into<String>) -> Self {
        Self {
            sources: Some(vec![source.into()]),
        }
    }

    pub fn by_sources(sources: Vec<String>) -> Self {
        Self {
            sources: Some(sources),
        }
    }

    pub fn matches(&self, meta: &ChunkMeta) -> bool {
        match &self.sources {
            Some(sources) => sources.iter().any(|s| s == &meta.source),
            None => true,
        }
    }
}

/// Parallel arrays of everything matching a `get` filter, mirroring the
/// store's wire shape.
#[derive(Debug, Clone, Default)]
pub struct ChunkBatch {
    pub ids: Vec<String>,
    pub documents: Vec<String>,
    pub metadatas: Vec<ChunkMeta>,
}

impl ChunkBatch {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// The Index Store collaborator contract.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Return all chunks matching the filter.
    async fn get(&self, filter: &ChunkFilter) -> Result<ChunkBatch, StoreError>;

    /// Nearest-neighbor search over chunk embeddings. Returns chunk ids
    /// ordered most-to-least similar, respecting the same filter semantics
    /// as `get`.
    async fn query(
        &self,
        text: &str,
        n: usize,
        filter: &ChunkFilter,
    ) -> Result<Vec<String>, StoreError>;

    /// Persist a batch of chunks.
    async fn add(&self, chunks: &[ChunkRecord]) -> Result<(), StoreError>;

    /// Remove chunks by id. Returns the number removed.
    async fn delete(&self, ids: &[String]) -> Result<usize, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(source: &str) -> ChunkMeta {
        ChunkMeta {
            source: source.to_string(),
            page_number: 1,
            chunk_serial: 1,
            full_page_content: "text".to_string(),
        }
    }

    #[test]
    fn test_filter_all_matches_everything() {
        assert!(ChunkFilter::all().matches(&meta("a.pdf")));
    }

    #[test]
    fn test_filter_by_source() {
        let f = ChunkFilter::by_source("a.pdf");
        assert!(f.matches(&meta("a.pdf")));
        assert!(!f.matches(&meta("b.pdf")));
    }

    #[test]
    fn test_filter_by_sources_any() {
        let f = ChunkFilter::by_sources(vec!["a.pdf".to_string(), "b.pdf".to_string()]);
        assert!(f.matches(&meta("b.pdf")));
        assert!(!f.matches(&meta("c.pdf")));
    }
}
