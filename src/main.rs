//! Issue radar — binary entrypoint.
//! One-shot run: expand queries, collect signals from every configured
//! source, gate, score, and report the ranked issues.

use std::collections::HashMap;

use chrono::Utc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use issue_radar::analysis::expander::{expand_queries, DEFAULT_MAX_OUT};
use issue_radar::analysis::scorer::build_issues_from_docs;
use issue_radar::config::AppConfig;
use issue_radar::notify::{IssueDigest, NotifierMux};
use issue_radar::profile::BrandProfile;
use issue_radar::report;
use issue_radar::sources::cache::DayCache;
use issue_radar::sources::naver::NaverSearchSource;
use issue_radar::sources::rss::RssNewsSource;
use issue_radar::sources::trends::GoogleTrendsSource;
use issue_radar::sources::types::SignalSource;
use issue_radar::sources::{collect_docs, gate_rss_docs};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("issue_radar=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

/// How many top issues go out to the webhook channels.
const DIGEST_TOP: usize = 5;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::from_env();
    let profile = BrandProfile::load_default();

    // 1) Long-tail query expansion
    let expanded = expand_queries(&profile.seed_queries, DEFAULT_MAX_OUT);
    info!(queries = expanded.len(), "expanded seed queries");

    // 2) Source setup
    let cache = DayCache::new(&cfg.cache_dir);
    let mut sources: Vec<Box<dyn SignalSource>> = Vec::new();

    match (&cfg.naver_client_id, &cfg.naver_client_secret) {
        (Some(id), Some(secret)) => {
            sources.push(Box::new(NaverSearchSource::new(
                id,
                secret,
                cfg.naver_display,
                cfg.naver_max_queries,
                cache.clone(),
            )?));
        }
        _ => warn!("NAVER_CLIENT_ID / NAVER_CLIENT_SECRET not set; skipping the Naver search source"),
    }
    sources.push(Box::new(GoogleTrendsSource::new(cache.clone())));
    sources.push(Box::new(RssNewsSource::new(cfg.rss_feeds.clone())));

    // 3) Collect + gate
    let docs = collect_docs(&sources, &expanded, cfg.recency_days).await;
    let docs_total = docs.len();
    let gated = gate_rss_docs(docs);

    if cfg.debug {
        let mut by_source: HashMap<&str, usize> = HashMap::new();
        for d in &gated {
            *by_source.entry(d.source.as_str()).or_default() += 1;
        }
        info!(
            docs_total,
            docs_after_filter = gated.len(),
            ?by_source,
            "collection summary"
        );
    }

    // 4) Score + report
    let issues = build_issues_from_docs(&gated, &profile.taxonomy_boost, &cfg.source_weights);
    report::print_report(&profile, &issues);

    // 5) Webhook digest (skipped on an empty run; the console warning above
    //    already covers that case)
    if !issues.is_empty() {
        let digest = IssueDigest {
            brand: profile.brand.clone(),
            generated_at: Utc::now(),
            top: issues.iter().take(DIGEST_TOP).cloned().collect(),
        };
        NotifierMux::from_env().send_all(&digest).await;
    }

    Ok(())
}
