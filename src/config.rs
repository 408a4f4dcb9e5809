use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the local store persists its data
    pub data_dir: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// Index store backend: "local" or "chroma"
    pub store_backend: String,
    /// Base URL of the Chroma-style store (used when store_backend = "chroma")
    pub store_url: String,
    /// Collection name in the remote store
    pub collection: String,
    /// LLM provider configuration (query expansion, embeddings, annotation)
    pub llm: LlmConfig,
    /// Cross-encoder reranker configuration
    pub reranker: RerankerConfig,
    /// Retrieval pipeline tuning
    pub retrieval: RetrievalConfig,
    /// Ingestion tuning
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "ollama" or "openai"
    pub provider: String,
    /// Base URL for the LLM API
    pub base_url: String,
    /// Model name for query expansion and chunk annotation
    pub chat_model: String,
    /// Model name for embeddings
    pub embedding_model: String,
    /// API key (only needed for cloud providers)
    pub api_key: Option<String>,
}

/// Configuration for the cross-encoder reranker sidecar (e.g. a Cohere-compatible
/// `/v1/rerank` endpoint served by llama-server).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RerankerConfig {
    /// Base URL for the reranker API (e.g. "http://127.0.0.1:8082").
    /// If None, reranking falls back to RRF order.
    pub base_url: Option<String>,
    /// Model name to send in the rerank request.
    pub model: Option<String>,
    /// Request timeout in seconds (capped at 30).
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Fused candidates kept per query variant before the page merge.
    pub n_results: usize,
    /// RRF rank-discount constant.
    pub k_rrf: f32,
    /// Weight contributed by each of the two ranked lists.
    pub list_weight: f32,
    /// Maximum pages handed to the reranker.
    pub rerank_window: usize,
    /// Character budget per document sent to the reranker.
    pub rerank_doc_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Window size in characters.
    pub chunk_size: usize,
    /// Overlap between adjacent windows in characters.
    pub overlap: usize,
    /// Chunks written to the store per batch.
    pub batch_size: usize,
    /// Generate a context sentence per page via the LLM (best-effort).
    pub annotate: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            bind_addr: "127.0.0.1:9100".to_string(),
            store_backend: "local".to_string(),
            store_url: "http://localhost:8000".to_string(),
            collection: "pdf_collection".to_string(),
            llm: LlmConfig::default(),
            reranker: RerankerConfig::default(),
            retrieval: RetrievalConfig::default(),
            ingest: IngestConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: "http://localhost:11434".to_string(),
            chat_model: "llama3.2".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            api_key: None,
        }
    }
}

impl Default for RerankerConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: None,
            timeout_secs: 10,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            n_results: 50,
            k_rrf: 60.0,
            list_weight: 0.5,
            rerank_window: 100,
            rerank_doc_chars: 1500,
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 100,
            batch_size: 200,
            annotate: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("DOC_SEARCH_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(addr) = std::env::var("DOC_SEARCH_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(backend) = std::env::var("DOC_SEARCH_STORE_BACKEND") {
            config.store_backend = backend;
        }
        if let Ok(url) = std::env::var("DOC_SEARCH_STORE_URL") {
            config.store_url = url;
        }
        if let Ok(name) = std::env::var("DOC_SEARCH_COLLECTION") {
            config.collection = name;
        }
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_CHAT_MODEL") {
            config.llm.chat_model = model;
        }
        if let Ok(model) = std::env::var("LLM_EMBEDDING_MODEL") {
            config.llm.embedding_model = model;
        }
        if let Ok(key) = std::env::var("LLM_API_KEY") {
            config.llm.api_key = Some(key);
        }
        if let Ok(val) = std::env::var("DOC_SEARCH_N_RESULTS") {
            if let Ok(v) = val.parse() {
                config.retrieval.n_results = v;
            }
        }
        if let Ok(val) = std::env::var("DOC_SEARCH_RERANK_WINDOW") {
            if let Ok(v) = val.parse() {
                config.retrieval.rerank_window = v;
            }
        }
        if let Ok(val) = std::env::var("DOC_SEARCH_CHUNK_SIZE") {
            if let Ok(v) = val.parse() {
                config.ingest.chunk_size = v;
            }
        }
        if let Ok(val) = std::env::var("DOC_SEARCH_CHUNK_OVERLAP") {
            if let Ok(v) = val.parse() {
                config.ingest.overlap = v;
            }
        }
        if let Ok(val) = std::env::var("DOC_SEARCH_BATCH_SIZE") {
            if let Ok(v) = val.parse() {
                config.ingest.batch_size = v;
            }
        }
        if let Ok(val) = std::env::var("DOC_SEARCH_ANNOTATE") {
            config.ingest.annotate = matches!(val.as_str(), "1" | "true" | "yes");
        }

        // Reranker config
        if let Ok(url) = std::env::var("RERANKER_BASE_URL") {
            config.reranker.base_url = Some(url);
        }
        if let Ok(model) = std::env::var("RERANKER_MODEL") {
            config.reranker.model = Some(model);
        }
        if let Ok(val) = std::env::var("RERANKER_TIMEOUT_SECS") {
            if let Ok(v) = val.parse::<u64>() {
                config.reranker.timeout_secs = v.min(30); // Cap at 30s
            }
        }

        config
    }

    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }
}
