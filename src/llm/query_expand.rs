use anyhow::Result;

use crate::config::LlmConfig;
use crate::llm::chat_complete;

/// Translate the raw query to a normalized English search query.
/// The corpus is indexed in English; questions arrive in Hebrew or English.
pub async fn translate_query(
    client: &reqwest::Client,
    config: &LlmConfig,
    raw_query: &str,
) -> Result<String> {
    let prompt = format!(
        "Translate the following question to English. \
         Return ONLY the translated question, no explanation.\n\n\
         Question: {raw_query}"
    );

    let response = chat_complete(client, config, &prompt).await?;
    let translated = response.trim();
    if translated.is_empty() {
        anyhow::bail!("Empty translation response");
    }
    Ok(translated.to_string())
}

/// Generate up to 2 alternative phrasings of an English query: one with
/// abbreviated technical units, one with expanded descriptive terms.
pub async fn expand_query(
    client: &reqwest::Client,
    config: &LlmConfig,
    query_en: &str,
) -> Result<Vec<String>> {
    let prompt = format!(
        "Generate 2 alternative English search queries for the following question. \
         Query 1: use abbreviated technical units (e.g. 'mio m3', 'MCM', 'million m3', 'Mm3'). \
         Query 2: use expanded descriptive terms (e.g. 'million cubic meters', 'storage capacity', 'total volume'). \
         Return ONLY the 2 queries, one per line, no numbering or explanation.\n\n\
         Original query: {query_en}"
    );

    let response = chat_complete(client, config, &prompt).await?;
    Ok(parse_expanded_queries(&response))
}

fn parse_expanded_queries(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim().trim_start_matches(['-', '*', ' ']).trim())
        .filter(|line| !line.is_empty() && !line.starts_with("```"))
        .take(2)
        .map(|line| line.to_string())
        .collect()
}

/// Build the full variant list for one retrieval run: the translated primary
/// query first, then up to 2 reformulations. Any LLM failure degrades to the
/// raw input as the sole variant; retrieval is never aborted here.
pub async fn expand_with_fallback(
    client: &reqwest::Client,
    config: &LlmConfig,
    raw_query: &str,
) -> Vec<String> {
    let primary = match translate_query(client, config, raw_query).await {
        Ok(q) => q,
        Err(e) => {
            tracing::warn!("Query translation failed, using raw query: {e}");
            return vec![raw_query.to_string()];
        }
    };

    let mut variants = vec![primary.clone()];
    match expand_query(client, config, &primary).await {
        Ok(expanded) => {
            tracing::info!("Query expanded: {:?}", expanded);
            for eq in expanded {
                if !eq.is_empty() && !variants.contains(&eq) {
                    variants.push(eq);
                }
            }
        }
        Err(e) => {
            tracing::warn!("Query expansion failed: {e}");
        }
    }

    variants
}
