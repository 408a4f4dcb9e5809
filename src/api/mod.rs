//! Axum HTTP handlers.

pub mod retrieve;
pub mod sources;
