//! The hybrid retrieval pipeline: lexical + semantic ranking per query
//! variant, RRF fusion, page-level merge, optional rerank.

pub mod bm25;
pub mod fusion;
pub mod merge;
pub mod pipeline;
pub mod semantic;
