use anyhow::Result;
use async_trait::async_trait;

use crate::config::LlmConfig;
use crate::llm::chat_complete;

/// How much page text to show the model when asking for a context sentence.
const ANNOTATE_PAGE_CHARS: usize = 2_000;

/// Generates a one-sentence description of a page, prepended to each of its
/// chunks so short windows score better against vague queries. Best-effort:
/// implementations return `None` on failure and ingestion carries on.
#[async_trait]
pub trait ContextAnnotator: Send + Sync {
    async fn annotate(&self, source: &str, page_text: &str) -> Option<String>;
}

/// Annotation disabled: every chunk is stored without a context sentence.
pub struct NoAnnotator;

#[async_trait]
impl ContextAnnotator for NoAnnotator {
    async fn annotate(&self, _source: &str, _page_text: &str) -> Option<String> {
        None
    }
}

/// LLM-backed annotator. Failures are logged and swallowed.
pub struct LlmAnnotator {
    client: reqwest::Client,
    config: LlmConfig,
}

impl LlmAnnotator {
    pub fn new(client: reqwest::Client, config: LlmConfig) -> Self {
        Self { client, config }
    }

    async fn try_annotate(&self, source: &str, page_text: &str) -> Result<String> {
        let mut end = page_text.len().min(ANNOTATE_PAGE_CHARS);
        while !page_text.is_char_boundary(end) {
            end -= 1;
        }
        let excerpt = &page_text[..end];

        let prompt = format!(
            "Write ONE short English sentence describing what this document page is about. \
             No preamble, no quotes.\n\n\
             Document: {source}\n\nPage text:\n{excerpt}"
        );

        let response = chat_complete(&self.client, &self.config, &prompt).await?;
        let sentence = response.trim().lines().next().unwrap_or("").trim();
        if sentence.is_empty() {
            anyhow::bail!("Empty annotation response");
        }
        Ok(sentence.to_string())
    }
}

#[async_trait]
impl ContextAnnotator for LlmAnnotator {
    async fn annotate(&self, source: &str, page_text: &str) -> Option<String> {
        match self.try_annotate(source, page_text).await {
            Ok(sentence) => Some(sentence),
            Err(e) => {
                tracing::warn!("Context annotation failed for {source}: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_annotator_returns_none() {
        let a = NoAnnotator;
        assert!(a.annotate("a.pdf", "some page").await.is_none());
    }
}
