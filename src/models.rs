use serde::{Deserialize, Serialize};

/// Metadata stored alongside every chunk in the Index Store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMeta {
    /// Document identifier, stable across ingestion (typically the file name).
    pub source: String,
    /// 1-based page number within the source.
    pub page_number: usize,
    /// Monotonically increasing serial, unique within a source.
    pub chunk_serial: u64,
    /// The complete trimmed page text, identical for every chunk of the page.
    /// Scoring happens on `ChunkRecord::text`; answers come from this field
    /// (parent-document retrieval).
    pub full_page_content: String,
}

/// The indexed unit: one scored window of a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Globally unique id: `{source}__p{page_number}__s{chunk_serial}`.
    pub id: String,
    /// Window content, optionally prefixed with a generated context sentence
    /// and a `[source: … | section: …]` header. Used only for ranking.
    pub text: String,
    pub meta: ChunkMeta,
}

/// Format the globally unique chunk id.
pub fn chunk_id(source: &str, page_number: usize, chunk_serial: u64) -> String {
    format!("{source}__p{page_number}__s{chunk_serial}")
}

/// A fused chunk-level candidate for a single query variant.
#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub chunk_id: String,
    pub source: String,
    pub page_number: usize,
    pub score: f32,
    pub full_page_content: String,
}

/// A page-level result after the multi-variant merge (and optional rerank).
/// Unique by `(source, page_number)` within one retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageHit {
    pub source: String,
    pub page_number: usize,
    pub score: f32,
    pub full_page_content: String,
}

/// Retrieve request
#[derive(Debug, Clone, Deserialize)]
pub struct RetrieveRequest {
    pub query: String,
    /// Restrict the search to these sources (None = whole corpus).
    pub sources: Option<Vec<String>>,
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    /// Run LLM query translation + expansion before searching.
    #[serde(default = "default_true")]
    pub use_expansion: bool,
}

fn default_max_pages() -> usize {
    10
}

fn default_true() -> bool {
    true
}

/// Retrieve response
#[derive(Debug, Clone, Serialize)]
pub struct RetrieveResponse {
    pub query: String,
    /// The query variants that were actually searched.
    pub variants: Vec<String>,
    pub pages: Vec<PageHit>,
    /// Assembled context window for the answer-synthesis collaborator.
    /// Empty string when `pages` is empty.
    pub context: String,
}

/// One indexed source as reported by GET /api/sources.
#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub source: String,
    pub chunk_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_id_format() {
        assert_eq!(chunk_id("report.pdf", 12, 340), "report.pdf__p12__s340");
    }

    #[test]
    fn test_retrieve_request_defaults() {
        let req: RetrieveRequest = serde_json::from_str(r#"{"query": "dam height"}"#).unwrap();
        assert_eq!(req.max_pages, 10);
        assert!(req.use_expansion);
        assert!(req.sources.is_none());
    }
}
