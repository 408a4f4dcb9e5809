//! The query-time retrieval pipeline.
//!
//! For each query variant: BM25 over the filtered corpus + nearest-neighbor
//! store query, fused with RRF. Variant results merge at page granularity
//! (max score per page), then the optional reranker reorders the top window.
//! Only Index Store failures propagate; every optional stage has a defined
//! fallback.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::models::{PageHit, RankedCandidate, SourceSummary};
use crate::rerank::Reranker;
use crate::search::{bm25, fusion, merge, semantic};
use crate::store::{ChunkBatch, ChunkFilter, IndexStore};

/// The retrieval session: an explicitly constructed handle over the injected
/// store and reranker, shared across queries.
pub struct Retriever {
    store: Arc<dyn IndexStore>,
    reranker: Arc<dyn Reranker>,
    config: RetrievalConfig,
}

impl Retriever {
    pub fn new(
        store: Arc<dyn IndexStore>,
        reranker: Arc<dyn Reranker>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            store,
            reranker,
            config,
        }
    }

    /// Pipeline entry point. Runs the full hybrid pipeline over
    /// `query_variants` (primary first) and returns at most `max_pages`
    /// page hits, best first. An empty filtered corpus yields `Ok(vec![])`.
    pub async fn retrieve(
        &self,
        query_variants: &[String],
        filter: &ChunkFilter,
        max_pages: usize,
    ) -> Result<Vec<PageHit>> {
        let Some(primary) = query_variants.first() else {
            return Ok(Vec::new());
        };

        let corpus = self
            .store
            .get(filter)
            .await
            .context("Failed to fetch candidate corpus from index store")?;

        if corpus.is_empty() {
            tracing::info!("No chunks match the filter; returning empty result");
            return Ok(Vec::new());
        }

        // id → position, built once per query from the filtered corpus fetch
        let by_id: HashMap<&str, usize> = corpus
            .ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        let mut candidates: Vec<RankedCandidate> = Vec::new();

        for variant in query_variants {
            let fused = self.run_variant(variant, &corpus, filter).await?;
            tracing::debug!("Variant '{variant}': {} fused candidates", fused.len());

            for (chunk_id, score) in fused {
                // The store may rank ids that left the corpus between calls
                let Some(&idx) = by_id.get(chunk_id.as_str()) else {
                    tracing::debug!("Skipping unknown chunk id from store: {chunk_id}");
                    continue;
                };
                let meta = &corpus.metadatas[idx];
                candidates.push(RankedCandidate {
                    chunk_id,
                    source: meta.source.clone(),
                    page_number: meta.page_number,
                    score,
                    full_page_content: meta.full_page_content.clone(),
                });
            }
        }

        let merged = merge::merge_pages(candidates);
        tracing::info!(
            "Merged {} unique pages across {} variants",
            merged.len(),
            query_variants.len()
        );

        Ok(self.apply_rerank(primary, merged, max_pages).await)
    }

    /// One variant: lexical + semantic rankings fused with RRF.
    async fn run_variant(
        &self,
        variant: &str,
        corpus: &ChunkBatch,
        filter: &ChunkFilter,
    ) -> Result<Vec<(String, f32)>> {
        let lexical_ids: Vec<String> = bm25::rank(variant, &corpus.documents)
            .into_iter()
            .take(self.config.n_results)
            .map(|(idx, _)| corpus.ids[idx].clone())
            .collect();

        let semantic_ids = semantic::rank(
            self.store.as_ref(),
            variant,
            self.config.n_results,
            corpus.len(),
            filter,
        )
        .await
        .context("Semantic ranking failed")?;

        Ok(fusion::fuse(
            &lexical_ids,
            &semantic_ids,
            self.config.n_results,
            self.config.k_rrf,
            self.config.list_weight,
        ))
    }

    /// Rerank the top window if the capability is active; on any failure fall
    /// back to truncating the RRF-sorted list. Never fails the pipeline.
    async fn apply_rerank(
        &self,
        query: &str,
        mut pages: Vec<PageHit>,
        max_pages: usize,
    ) -> Vec<PageHit> {
        if !self.reranker.is_active() || pages.is_empty() {
            pages.truncate(max_pages);
            return pages;
        }

        let window_len = pages.len().min(self.config.rerank_window);
        let window = &pages[..window_len];
        let documents: Vec<String> = window
            .iter()
            .map(|p| truncate_chars(&p.full_page_content, self.config.rerank_doc_chars).to_string())
            .collect();
        let top_n = max_pages.min(window_len);

        match self.reranker.rerank(query, &documents, top_n).await {
            Ok(results) => {
                let reranked: Vec<PageHit> = results
                    .into_iter()
                    .filter(|r| r.index < window_len)
                    .map(|r| {
                        let mut page = window[r.index].clone();
                        page.score = r.score;
                        page
                    })
                    .collect();
                tracing::info!("Reranker reordered {} pages", reranked.len());
                reranked
            }
            Err(e) => {
                tracing::warn!("Reranking failed, keeping RRF order: {e}");
                pages.truncate(max_pages);
                pages
            }
        }
    }

    /// Distinct sources currently indexed, with chunk counts.
    pub async fn list_sources(&self) -> Result<Vec<SourceSummary>> {
        let corpus = self
            .store
            .get(&ChunkFilter::all())
            .await
            .context("Failed to list sources from index store")?;

        let mut counts: HashMap<String, usize> = HashMap::new();
        for meta in &corpus.metadatas {
            *counts.entry(meta.source.clone()).or_insert(0) += 1;
        }

        let mut sources: Vec<SourceSummary> = counts
            .into_iter()
            .map(|(source, chunk_count)| SourceSummary {
                source,
                chunk_count,
            })
            .collect();
        sources.sort_by(|a, b| a.source.cmp(&b.source));
        Ok(sources)
    }
}

/// Truncate to at most `max_chars` bytes on a UTF-8 char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    if text.len() <= max_chars {
        return text;
    }
    let mut end = max_chars;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_short() {
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_truncate_chars_boundary() {
        let text = "אבגד"; // 8 bytes
        let out = truncate_chars(text, 5);
        assert!(out.len() <= 5);
        assert!(text.starts_with(out));
    }
}
