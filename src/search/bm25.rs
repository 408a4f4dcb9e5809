//! In-memory BM25 lexical ranker.
//!
//! The ranking is rebuilt per call over the filtered candidate corpus fetched
//! for the current query run. Rebuilding guarantees the lexical signal never
//! goes stale relative to the Index Store, at O(corpus size) per query.

use std::collections::HashMap;

const K1: f32 = 1.2;
const B: f32 = 0.75;

/// Lowercase whitespace tokenization. No stemming, no stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|t| t.to_lowercase())
        .collect()
}

/// Rank `docs` against `query` with BM25. Returns `(doc_index, score)` pairs
/// ordered by descending score; documents scoring 0 are omitted. Ties break
/// by ascending doc index so the ordering is deterministic.
pub fn rank(query: &str, docs: &[String]) -> Vec<(usize, f32)> {
    if docs.is_empty() {
        return Vec::new();
    }

    let query_terms = tokenize(query);
    if query_terms.is_empty() {
        return Vec::new();
    }

    let tokenized: Vec<Vec<String>> = docs.iter().map(|d| tokenize(d)).collect();
    let n = docs.len() as f32;
    let avg_len: f32 = tokenized.iter().map(|t| t.len() as f32).sum::<f32>() / n;

    // Document frequency per query term
    let mut df: HashMap<&str, usize> = HashMap::new();
    for term in &query_terms {
        let count = tokenized
            .iter()
            .filter(|tokens| tokens.iter().any(|t| t == term))
            .count();
        df.insert(term.as_str(), count);
    }

    let mut scored: Vec<(usize, f32)> = Vec::new();

    for (doc_idx, tokens) in tokenized.iter().enumerate() {
        if tokens.is_empty() {
            continue;
        }

        let doc_len = tokens.len() as f32;
        let mut score = 0.0f32;

        for term in &query_terms {
            let tf = tokens.iter().filter(|t| *t == term).count() as f32;
            if tf == 0.0 {
                continue;
            }
            let dfi = df[term.as_str()] as f32;
            let idf = (1.0 + (n - dfi + 0.5) / (dfi + 0.5)).ln();
            let norm = tf * (K1 + 1.0) / (tf + K1 * (1.0 - B + B * doc_len / avg_len.max(1e-6)));
            score += idf * norm;
        }

        if score > 0.0 {
            scored.push((doc_idx, score));
        }
    }

    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_tokenize_lowercases_and_splits() {
        assert_eq!(
            tokenize("Reservoir Capacity 1.2"),
            vec!["reservoir", "capacity", "1.2"]
        );
    }

    #[test]
    fn test_empty_corpus() {
        assert!(rank("anything", &[]).is_empty());
    }

    #[test]
    fn test_empty_query() {
        assert!(rank("   ", &docs(&["some text"])).is_empty());
    }

    #[test]
    fn test_non_matching_docs_excluded() {
        let corpus = docs(&["dam spillway design", "unrelated filler text"]);
        let ranked = rank("spillway", &corpus);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].0, 0);
    }

    #[test]
    fn test_term_frequency_orders_results() {
        let corpus = docs(&[
            "reservoir capacity reservoir capacity",
            "reservoir plus a lot of other unrelated words here",
            "nothing relevant at all",
        ]);
        let ranked = rank("reservoir capacity", &corpus);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].0, 0);
        assert_eq!(ranked[1].0, 1);
        assert!(ranked[0].1 > ranked[1].1);
    }

    #[test]
    fn test_rare_term_outweighs_common_term() {
        // "dam" appears everywhere, "penstock" only in doc 2
        let corpus = docs(&["dam dam dam", "dam overview", "dam penstock"]);
        let ranked = rank("penstock", &corpus);
        assert_eq!(ranked[0].0, 2);
    }

    #[test]
    fn test_deterministic_tie_break_by_index() {
        let corpus = docs(&["alpha beta", "alpha beta"]);
        let ranked = rank("alpha", &corpus);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].0, 0);
        assert_eq!(ranked[1].0, 1);
    }
}
