//! Thin adapter over the Index Store's nearest-neighbor query. The store owns
//! the embedding and similarity math; this module only clamps the result
//! count to the corpus size.

use crate::store::{ChunkFilter, IndexStore, StoreError};

/// Ordered most-to-least similar chunk ids for one query variant.
pub async fn rank(
    store: &dyn IndexStore,
    text: &str,
    n_results: usize,
    corpus_size: usize,
    filter: &ChunkFilter,
) -> Result<Vec<String>, StoreError> {
    let n_sem = n_results.min(corpus_size);
    if n_sem == 0 {
        return Ok(Vec::new());
    }
    store.query(text, n_sem, filter).await
}
