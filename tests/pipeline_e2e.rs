// tests/pipeline_e2e.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;

use issue_radar::build_issues_from_docs;
use issue_radar::profile::BrandProfile;
use issue_radar::sources::types::{DocMeta, SignalDoc, SignalSource, SourceTag};
use issue_radar::sources::{collect_docs, gate_rss_docs};

struct MockSearchSource;

#[async_trait]
impl SignalSource for MockSearchSource {
    async fn fetch(&self, queries: &[String], _recency_days: u32) -> Result<Vec<SignalDoc>> {
        assert!(!queries.is_empty(), "expander output should reach sources");
        Ok(vec![
            SignalDoc {
                source: SourceTag::NaverCafearticle,
                title: "아이 산만  이유".to_string(),
                text: "본문".to_string(),
                url: "https://cafe.naver.com/a/1".to_string(),
                published_at: None,
                meta: DocMeta {
                    query: Some(queries[0].clone()),
                    ..DocMeta::default()
                },
            },
            SignalDoc {
                source: SourceTag::NaverCafearticle,
                title: "아이 산만 이유".to_string(),
                text: String::new(),
                url: "https://cafe.naver.com/a/2".to_string(),
                published_at: None,
                meta: DocMeta::default(),
            },
        ])
    }

    fn name(&self) -> &'static str {
        "mock_search"
    }
}

struct MockRssSource;

#[async_trait]
impl SignalSource for MockRssSource {
    async fn fetch(&self, _queries: &[String], _recency_days: u32) -> Result<Vec<SignalDoc>> {
        Ok(vec![
            SignalDoc {
                source: SourceTag::RssNews,
                title: "초등 입학 준비 특집".to_string(),
                text: "초등 입학 준비 특집\n한글 떼기".to_string(),
                url: "https://news.example/1".to_string(),
                published_at: None,
                meta: DocMeta::default(),
            },
            SignalDoc {
                source: SourceTag::RssNews,
                title: "지역 축제 일정".to_string(),
                text: "지역 축제 일정\n먹거리".to_string(),
                url: "https://news.example/2".to_string(),
                published_at: None,
                meta: DocMeta::default(),
            },
        ])
    }

    fn name(&self) -> &'static str {
        "mock_rss"
    }
}

struct FailingSource;

#[async_trait]
impl SignalSource for FailingSource {
    async fn fetch(&self, _queries: &[String], _recency_days: u32) -> Result<Vec<SignalDoc>> {
        Err(anyhow!("simulated outage"))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

#[tokio::test]
async fn full_pipeline_from_mock_sources_to_ranked_issues() {
    let profile = BrandProfile::default_seed();
    let queries = issue_radar::expand_queries(&profile.seed_queries, 80);

    let sources: Vec<Box<dyn SignalSource>> = vec![
        Box::new(MockSearchSource),
        Box::new(FailingSource), // must not abort the run
        Box::new(MockRssSource),
    ];

    let docs = collect_docs(&sources, &queries, 30).await;
    assert_eq!(docs.len(), 4);

    let gated = gate_rss_docs(docs);
    // The keyword-free RSS item is gone, everything else survives.
    assert_eq!(gated.len(), 3);

    let issues = build_issues_from_docs(
        &gated,
        &profile.taxonomy_boost,
        &issue_radar::config::default_source_weights(),
    );

    // The two cafe docs normalize to the same phrase and fold together.
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].phrase, "아이 산만 이유");
    assert_eq!(
        issues[0].evidence,
        vec!["https://cafe.naver.com/a/1", "https://cafe.naver.com/a/2"]
    );
    assert!(issues[0].score >= issues[1].score);

    // cafe: raw 1.0 × boost 1.35 × weight 1.35 × date bonus 1.10, twice.
    let per_doc = 1.0 * 1.35 * 1.35 * 1.10;
    assert!((issues[0].score - 2.0 * per_doc).abs() < 1e-9);
}
