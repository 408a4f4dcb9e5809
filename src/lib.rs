//! # doc-search
//!
//! Hybrid page retrieval over an indexed corpus of documents: BM25 keyword
//! ranking and embedding nearest-neighbor search are fused with Reciprocal
//! Rank Fusion across reformulated query variants, deduplicated at page
//! level, and optionally refined by an external cross-encoder reranker.
//!
//! ## Architecture
//!
//! ```text
//!                          ┌─────────────┐
//!                          │  User Query  │
//!                          └──────┬───────┘
//!                                 │
//!                  ┌──────────────┴──────────────┐
//!                  │  Translation + Expansion     │
//!                  │  (LLM, degrade-to-raw)       │
//!                  └──────────────┬──────────────┘
//!                                 │ up to 3 variants
//!            ┌────────────────────┼────────────────────┐
//!            ▼                    ▼                    ▼
//!     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//!     │  Variant 1   │     │  Variant 2   │     │  Variant 3   │
//!     │ BM25+Vector  │     │ BM25+Vector  │     │ BM25+Vector  │
//!     └──────┬──────┘     └──────┬──────┘     └──────┬──────┘
//!            │ RRF fuse          │ RRF fuse          │ RRF fuse
//!            └───────────────────┼───────────────────┘
//!                                ▼
//!                  ┌──────────────────────────┐
//!                  │  Page-level merge         │
//!                  │  max fused score per page │
//!                  └────────────┬─────────────┘
//!                               ▼
//!                  ┌──────────────────────────┐
//!                  │  Cross-encoder rerank     │
//!                  │  (optional; RRF fallback) │
//!                  └────────────┬─────────────┘
//!                               ▼
//!                  ┌──────────────────────────┐
//!                  │  Context assembly         │
//!                  │  full parent-page blocks  │
//!                  └──────────────────────────┘
//! ```
//!
//! Scoring happens on small chunks; answers come from the full parent page
//! (parent-document retrieval). The lexical ranking is rebuilt in memory per
//! query so it never goes stale relative to the Index Store.
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for store, LLM, reranker, and pipeline tuning
//! - [`models`] - Shared data types: `ChunkRecord`, `PageHit`, request/response types
//! - [`store`] - Index Store contract plus local and Chroma-HTTP backends
//! - [`search::bm25`] - In-memory per-call BM25 lexical ranker
//! - [`search::fusion`] - Reciprocal Rank Fusion for one query variant
//! - [`search::merge`] - Multi-variant page-level merge
//! - [`search::pipeline`] - The `Retriever` entry point and rerank routing
//! - [`rerank`] - Cross-encoder reranker capability with no-op fallback
//! - [`context`] - Final context window assembly
//! - [`ingest`] - Page chunking, section headers, batched store writes
//! - [`llm`] - Query expansion, embeddings, and chunk annotation clients
//! - [`api`] - Axum HTTP handlers
//! - [`state`] - Shared application state with injected collaborator handles

pub mod api;
pub mod config;
pub mod context;
pub mod ingest;
pub mod llm;
pub mod models;
pub mod rerank;
pub mod search;
pub mod state;
pub mod store;
