//! Reciprocal Rank Fusion for one query variant.
//!
//! The lexical and semantic rankings each contribute
//! `list_weight / (k_rrf + rank)` to every chunk id they rank (rank is
//! 1-based); an id absent from a list contributes zero from that list. The
//! rank discount flattens the advantage of very top ranks, which is what
//! makes rank-based fusion robust against incomparable raw scores.

use std::collections::HashMap;

/// Fuse two ordered id lists into `(chunk_id, fused_score)` pairs, sorted by
/// descending score, truncated to `n_results`. Equal scores order by chunk id
/// ascending so the ranking is deterministic.
pub fn fuse(
    lexical_ids: &[String],
    semantic_ids: &[String],
    n_results: usize,
    k_rrf: f32,
    list_weight: f32,
) -> Vec<(String, f32)> {
    let mut scores: HashMap<&str, f32> = HashMap::new();

    for list in [lexical_ids, semantic_ids] {
        for (rank, id) in list.iter().enumerate() {
            let contribution = list_weight / (k_rrf + rank as f32 + 1.0);
            *scores.entry(id.as_str()).or_insert(0.0) += contribution;
        }
    }

    let mut fused: Vec<(String, f32)> = scores
        .into_iter()
        .map(|(id, score)| (id.to_string(), score))
        .collect();

    fused.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    fused.truncate(n_results);
    fused
}

#[cfg(test)]
mod tests {
    use super::*;

    const K: f32 = 60.0;
    const W: f32 = 0.5;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Expected contribution of a 1-based rank in one list.
    fn rr(rank: usize) -> f32 {
        W / (K + rank as f32)
    }

    #[test]
    fn test_empty_lists() {
        assert!(fuse(&[], &[], 10, K, W).is_empty());
    }

    #[test]
    fn test_single_list_scores_exact() {
        let fused = fuse(&ids(&["a", "b"]), &[], 10, K, W);
        assert_eq!(fused.len(), 2);
        assert_eq!(fused[0].0, "a");
        assert!((fused[0].1 - rr(1)).abs() < 1e-7);
        assert!((fused[1].1 - rr(2)).abs() < 1e-7);
    }

    #[test]
    fn test_both_lists_sum_exact() {
        // a: lex rank 1, sem rank 2; b: lex rank 2, sem rank 1
        let fused = fuse(&ids(&["a", "b"]), &ids(&["b", "a"]), 10, K, W);
        let a = fused.iter().find(|(id, _)| id == "a").unwrap();
        let b = fused.iter().find(|(id, _)| id == "b").unwrap();
        assert!((a.1 - (rr(1) + rr(2))).abs() < 1e-7);
        assert!((b.1 - (rr(2) + rr(1))).abs() < 1e-7);
    }

    #[test]
    fn test_absent_id_contributes_zero() {
        let fused = fuse(&ids(&["a", "b", "c"]), &ids(&["b"]), 10, K, W);
        let c = fused.iter().find(|(id, _)| id == "c").unwrap();
        assert!((c.1 - rr(3)).abs() < 1e-7);
    }

    #[test]
    fn test_five_chunk_known_orderings() {
        // Synthetic corpus of 5 chunks with known lexical and semantic orders
        let lex = ids(&["c1", "c2", "c3", "c4", "c5"]);
        let sem = ids(&["c3", "c1", "c5", "c2", "c4"]);
        let fused = fuse(&lex, &sem, 10, K, W);

        let expected = [
            ("c1", rr(1) + rr(2)),
            ("c2", rr(2) + rr(4)),
            ("c3", rr(3) + rr(1)),
            ("c4", rr(4) + rr(5)),
            ("c5", rr(5) + rr(3)),
        ];
        for (id, want) in expected {
            let got = fused.iter().find(|(i, _)| i == id).unwrap().1;
            assert!(
                (got - want).abs() < 1e-7,
                "{id}: got {got}, want {want}"
            );
        }
        // c1 and c3 have symmetric ranks, so equal scores: id breaks the tie
        assert_eq!(fused[0].0, "c1");
        assert_eq!(fused[1].0, "c3");
    }

    #[test]
    fn test_truncates_to_n_results() {
        let lex: Vec<String> = (0..30).map(|i| format!("c{i:02}")).collect();
        let fused = fuse(&lex, &[], 5, K, W);
        assert_eq!(fused.len(), 5);
        assert_eq!(fused[0].0, "c00");
    }

    #[test]
    fn test_equal_scores_break_by_id() {
        // Same id set, both at rank 1 of exactly one list
        let fused = fuse(&ids(&["z"]), &ids(&["a"]), 10, K, W);
        assert_eq!(fused[0].0, "a");
        assert_eq!(fused[1].0, "z");
    }
}
