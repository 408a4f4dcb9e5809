use std::sync::Arc;

use crate::config::Config;
use crate::llm::embeddings::HttpEmbedder;
use crate::rerank;
use crate::search::pipeline::Retriever;
use crate::store::chroma::ChromaStore;
use crate::store::local::LocalStore;
use crate::store::IndexStore;

/// Shared application state. Every collaborator handle is constructed once
/// here and injected; no component creates its own clients.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub http_client: reqwest::Client,
    pub retriever: Arc<Retriever>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        let embedder = Arc::new(HttpEmbedder::new(http_client.clone(), config.llm.clone()));

        let store: Arc<dyn IndexStore> = match config.store_backend.as_str() {
            "chroma" => Arc::new(
                ChromaStore::connect(
                    http_client.clone(),
                    &config.store_url,
                    &config.collection,
                    embedder,
                )
                .await?,
            ),
            _ => Arc::new(LocalStore::open_or_create(&config.store_dir(), embedder)?),
        };

        let reranker = rerank::from_config(http_client.clone(), &config.reranker);

        let retriever = Arc::new(Retriever::new(
            store,
            reranker,
            config.retrieval.clone(),
        ));

        Ok(Self {
            config,
            http_client,
            retriever,
        })
    }
}
