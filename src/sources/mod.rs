// src/sources/mod.rs
pub mod cache;
pub mod naver;
pub mod rss;
pub mod trends;
pub mod types;

use tracing::{info, warn};

use crate::analysis::taxonomy::gate_keywords;
use types::{SignalDoc, SignalSource, SourceTag};

/// Fetch from every source in order; a failing source is logged and skipped
/// so the run continues with whatever was collected.
pub async fn collect_docs(
    sources: &[Box<dyn SignalSource>],
    queries: &[String],
    recency_days: u32,
) -> Vec<SignalDoc> {
    let mut docs = Vec::new();
    for src in sources {
        match src.fetch(queries, recency_days).await {
            Ok(mut v) => {
                info!(source = src.name(), count = v.len(), "source fetched");
                docs.append(&mut v);
            }
            Err(e) => warn!(source = src.name(), error = ?e, "source failed"),
        }
    }
    docs
}

/// RSS feeds cover general news; keep only items touching a taxonomy trigger
/// keyword in title + text. Non-RSS docs pass through untouched.
pub fn gate_rss_docs(docs: Vec<SignalDoc>) -> Vec<SignalDoc> {
    docs.into_iter()
        .filter(|d| {
            if d.source != SourceTag::RssNews {
                return true;
            }
            let joined = format!("{} {}", d.title, d.text);
            gate_keywords().any(|w| joined.contains(w))
        })
        .collect()
}
