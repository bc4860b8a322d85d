// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod docs;
pub mod extract;
pub mod merge;
pub mod metrics;
pub mod request_log;
pub mod validate;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::merge::{merge_articles, NormalizedArticle};
