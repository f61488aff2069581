// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod analysis;
pub mod config;
pub mod notify;
pub mod profile;
pub mod report;
pub mod sources;

// ---- Re-exports for stable public API ----
pub use crate::analysis::expander::{expand_queries, DEFAULT_MAX_OUT};
pub use crate::analysis::normalize::normalize_kw;
pub use crate::analysis::scorer::{build_issues_from_docs, IssueItem};
pub use crate::analysis::taxonomy::classify;
pub use crate::sources::types::{SignalDoc, SignalSource, SourceTag};

// Re-export notification types for easy use in bins/tests
pub use crate::notify::{IssueDigest, Notifier, NotifierMux};
