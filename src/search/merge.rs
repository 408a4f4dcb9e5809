//! Page-level merge across query variants.
//!
//! Chunk-level candidates from every variant collapse into one entry per
//! `(source, page_number)`, retaining the maximum fused score seen for that
//! page. Keeping the max (not the sum) makes the merge idempotent and
//! order-independent across variants, and page text travels unchanged since
//! content is variant-independent.

use std::collections::HashMap;

use crate::models::{PageHit, RankedCandidate};

/// Collapse chunk candidates to unique pages, sorted by descending retained
/// score. Equal scores order by `(source, page_number)` ascending.
pub fn merge_pages(candidates: impl IntoIterator<Item = RankedCandidate>) -> Vec<PageHit> {
    let mut best: HashMap<(String, usize), PageHit> = HashMap::new();

    for cand in candidates {
        let key = (cand.source.clone(), cand.page_number);
        match best.get_mut(&key) {
            Some(existing) => {
                if cand.score > existing.score {
                    existing.score = cand.score;
                }
            }
            None => {
                best.insert(
                    key,
                    PageHit {
                        source: cand.source,
                        page_number: cand.page_number,
                        score: cand.score,
                        full_page_content: cand.full_page_content,
                    },
                );
            }
        }
    }

    let mut pages: Vec<PageHit> = best.into_values().collect();
    pages.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.source.cmp(&b.source))
            .then_with(|| a.page_number.cmp(&b.page_number))
    });
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(source: &str, page: usize, score: f32) -> RankedCandidate {
        RankedCandidate {
            chunk_id: format!("{source}__p{page}__s0"),
            source: source.to_string(),
            page_number: page,
            score,
            full_page_content: format!("content of {source} page {page}"),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(merge_pages(vec![]).is_empty());
    }

    #[test]
    fn test_max_score_retained_not_summed() {
        let merged = merge_pages(vec![cand("a.pdf", 1, 0.02), cand("a.pdf", 1, 0.05)]);
        assert_eq!(merged.len(), 1);
        assert!((merged[0].score - 0.05).abs() < 1e-7);
    }

    #[test]
    fn test_lower_score_does_not_overwrite() {
        let merged = merge_pages(vec![cand("a.pdf", 1, 0.05), cand("a.pdf", 1, 0.02)]);
        assert!((merged[0].score - 0.05).abs() < 1e-7);
    }

    #[test]
    fn test_order_independent() {
        let forward = merge_pages(vec![
            cand("a.pdf", 1, 0.02),
            cand("a.pdf", 2, 0.04),
            cand("a.pdf", 1, 0.05),
        ]);
        let backward = merge_pages(vec![
            cand("a.pdf", 1, 0.05),
            cand("a.pdf", 2, 0.04),
            cand("a.pdf", 1, 0.02),
        ]);
        assert_eq!(forward.len(), backward.len());
        for (f, b) in forward.iter().zip(backward.iter()) {
            assert_eq!(f.source, b.source);
            assert_eq!(f.page_number, b.page_number);
            assert!((f.score - b.score).abs() < 1e-7);
        }
    }

    #[test]
    fn test_pages_unique_by_source_and_page() {
        let merged = merge_pages(vec![
            cand("a.pdf", 1, 0.1),
            cand("b.pdf", 1, 0.2),
            cand("a.pdf", 2, 0.3),
            cand("a.pdf", 1, 0.15),
        ]);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_sorted_descending_with_deterministic_ties() {
        let merged = merge_pages(vec![
            cand("b.pdf", 3, 0.5),
            cand("a.pdf", 7, 0.5),
            cand("a.pdf", 2, 0.5),
            cand("c.pdf", 1, 0.9),
        ]);
        assert_eq!(merged[0].source, "c.pdf");
        // Ties: a.pdf p2, a.pdf p7, b.pdf p3
        assert_eq!(
            merged[1..]
                .iter()
                .map(|p| (p.source.as_str(), p.page_number))
                .collect::<Vec<_>>(),
            vec![("a.pdf", 2), ("a.pdf", 7), ("b.pdf", 3)]
        );
    }

    #[test]
    fn test_page_text_travels_unchanged() {
        let merged = merge_pages(vec![cand("a.pdf", 1, 0.02), cand("a.pdf", 1, 0.05)]);
        assert_eq!(merged[0].full_page_content, "content of a.pdf page 1");
    }
}
