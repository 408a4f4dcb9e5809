//! Ingestion-time chunk writer.
//!
//! Each page of a source is split into fixed-size overlapping character
//! windows; every retained window becomes one immutable chunk carrying the
//! full page text for parent-document retrieval. Chunks are written to the
//! Index Store in fixed-size batches to bound memory.

pub mod header;

use anyhow::{Context, Result};

use crate::config::IngestConfig;
use crate::ingest::header::HeaderExtractor;
use crate::llm::annotate::ContextAnnotator;
use crate::models::{chunk_id, ChunkMeta, ChunkRecord};
use crate::store::{ChunkFilter, IndexStore};

/// One page of extracted document text, 1-based.
#[derive(Debug, Clone)]
pub struct PageText {
    pub page_number: usize,
    pub text: String,
}

/// Typed ingestion progress callback, decoupled from any UI.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, current: usize, total: usize);
}

/// Progress reporting disabled.
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _current: usize, _total: usize) {}
}

/// Split page text into overlapping character windows. Windows that are
/// empty after trimming are dropped. Operates on char boundaries so
/// multi-byte text never splits mid-character.
pub fn split_page(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    if chunk_size == 0 {
        return Vec::new();
    }
    let step = chunk_size.saturating_sub(overlap).max(1);

    // Byte offset of every char boundary, plus the end of the text
    let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    boundaries.push(text.len());
    let char_count = boundaries.len() - 1;

    let mut windows = Vec::new();
    let mut pos = 0usize;

    while pos < char_count {
        let end = (pos + chunk_size).min(char_count);
        let window = &text[boundaries[pos]..boundaries[end]];
        if !window.trim().is_empty() {
            windows.push(window.to_string());
        }
        pos += step;
    }

    windows
}

/// Ingestion session over an injected store handle. Owns the per-source
/// chunk serial counter explicitly instead of capturing it in loop state.
pub struct IngestSession<'a> {
    store: &'a dyn IndexStore,
    config: IngestConfig,
    serial: u64,
}

impl<'a> IngestSession<'a> {
    pub fn new(store: &'a dyn IndexStore, config: IngestConfig) -> Self {
        Self {
            store,
            config,
            serial: 0,
        }
    }

    /// Ingest every page of one source. Returns the number of chunks written.
    ///
    /// Header extraction and context annotation are best-effort; a page with
    /// neither still produces chunks. Batches flush every
    /// `config.batch_size` chunks and once at the end.
    pub async fn ingest_source(
        &mut self,
        source: &str,
        pages: &[PageText],
        headers: &dyn HeaderExtractor,
        annotator: &dyn ContextAnnotator,
        progress: &dyn ProgressObserver,
    ) -> Result<usize> {
        self.serial = 0;
        let mut batch: Vec<ChunkRecord> = Vec::new();
        let mut written = 0usize;

        for (i, page) in pages.iter().enumerate() {
            let full_page = page.text.trim();
            if full_page.is_empty() {
                progress.on_progress(i + 1, pages.len());
                continue;
            }

            let section = headers.extract(full_page);
            let annotation = annotator.annotate(source, full_page).await;

            let prefix = chunk_prefix(source, section.as_deref(), annotation.as_deref());

            for window in split_page(full_page, self.config.chunk_size, self.config.overlap) {
                self.serial += 1;
                batch.push(ChunkRecord {
                    id: chunk_id(source, page.page_number, self.serial),
                    text: format!("{prefix}{window}"),
                    meta: ChunkMeta {
                        source: source.to_string(),
                        page_number: page.page_number,
                        chunk_serial: self.serial,
                        full_page_content: full_page.to_string(),
                    },
                });

                if batch.len() >= self.config.batch_size {
                    written += self.flush(&mut batch).await?;
                }
            }

            progress.on_progress(i + 1, pages.len());
        }

        written += self.flush(&mut batch).await?;
        tracing::info!("Ingested {written} chunks for {source}");
        Ok(written)
    }

    async fn flush(&self, batch: &mut Vec<ChunkRecord>) -> Result<usize> {
        if batch.is_empty() {
            return Ok(0);
        }
        let count = batch.len();
        self.store
            .add(batch)
            .await
            .context("Failed to write chunk batch to index store")?;
        batch.clear();
        Ok(count)
    }
}

fn chunk_prefix(source: &str, section: Option<&str>, annotation: Option<&str>) -> String {
    let mut prefix = String::new();
    if let Some(sentence) = annotation {
        prefix.push_str(sentence);
        prefix.push('\n');
    }
    match section {
        Some(sec) => prefix.push_str(&format!("[source: {source} | section: {sec}]\n")),
        None => prefix.push_str(&format!("[source: {source}]\n")),
    }
    prefix
}

/// Bulk-delete every chunk of a source. Returns the number removed.
pub async fn delete_source(store: &dyn IndexStore, source: &str) -> Result<usize> {
    let batch = store
        .get(&ChunkFilter::by_source(source))
        .await
        .context("Failed to look up chunks for deletion")?;

    if batch.is_empty() {
        return Ok(0);
    }

    let removed = store
        .delete(&batch.ids)
        .await
        .context("Failed to delete chunks from index store")?;
    tracing::info!("Deleted {removed} chunks of {source}");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_empty_text() {
        assert!(split_page("", 500, 100).is_empty());
        assert!(split_page("   \n ", 500, 100).is_empty());
    }

    #[test]
    fn test_split_short_text_single_window() {
        let windows = split_page("short page", 500, 100);
        assert_eq!(windows, vec!["short page"]);
    }

    #[test]
    fn test_split_window_size_and_overlap() {
        let text = "a".repeat(1000);
        let windows = split_page(&text, 500, 100);
        // Positions 0, 400, 800
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].len(), 500);
        assert_eq!(windows[1].len(), 500);
        assert_eq!(windows[2].len(), 200);
    }

    #[test]
    fn test_split_adjacent_windows_share_overlap() {
        let text: String = (0..1000).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let windows = split_page(&text, 500, 100);
        let tail = &windows[0][400..];
        assert_eq!(&windows[1][..100], tail);
    }

    #[test]
    fn test_split_multibyte_text() {
        let text = "א".repeat(600);
        let windows = split_page(&text, 500, 100);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].chars().count(), 500);
    }

    #[test]
    fn test_split_overlap_ge_chunk_size_still_advances() {
        let text = "x".repeat(100);
        let windows = split_page(&text, 10, 10);
        // Degenerate config: step clamps to 1 instead of looping forever
        assert!(!windows.is_empty());
    }

    #[test]
    fn test_chunk_prefix_with_section() {
        let p = chunk_prefix("spec.pdf", Some("6.2.3 Spillway"), None);
        assert_eq!(p, "[source: spec.pdf | section: 6.2.3 Spillway]\n");
    }

    #[test]
    fn test_chunk_prefix_with_annotation() {
        let p = chunk_prefix("spec.pdf", None, Some("Page about dam geometry."));
        assert_eq!(p, "Page about dam geometry.\n[source: spec.pdf]\n");
    }
}
