// src/sources/trends.rs
//! Google Trends related-queries connector.
//!
//! For each seed query this resolves the RELATED_QUERIES widget token via the
//! explore endpoint, then fetches the ranked top/rising keyword lists. The
//! trends payloads are schemaless and prefixed with an XSSI guard, so parsing
//! walks `serde_json::Value` tolerantly. Results are cached per day and
//! timeframe; rate limiting beyond the retry budget fails the whole fetch
//! (the orchestrator logs and moves on).

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::cache::DayCache;
use super::types::{DocMeta, SignalDoc, SignalSource, SourceTag, TrendKind, TrendMeta};

const EXPLORE_URL: &str = "https://trends.google.com/trends/api/explore";
const RELATED_URL: &str = "https://trends.google.com/trends/api/widgetdata/relatedsearches";

const HL: &str = "ko-KR";
const TZ: i32 = 540; // KST offset in minutes
const GEO: &str = "KR";

const MAX_SEEDS: usize = 40;
const LIST_HEAD: usize = 10;
const MAX_RETRY: u32 = 5;
/// Delay between seeds to stay under the unofficial rate limit.
const SEED_DELAY_MS: u64 = 1500;

/// One related keyword with its relative interest value.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RelatedEntry {
    query: String,
    value: Option<f64>,
}

/// Cached per-seed payload.
#[derive(Debug, Serialize, Deserialize)]
struct SeedRelated {
    seed: String,
    top: Vec<RelatedEntry>,
    rising: Vec<RelatedEntry>,
}

pub struct GoogleTrendsSource {
    client: Client,
    cache: DayCache,
}

impl GoogleTrendsSource {
    pub fn new(cache: DayCache) -> Self {
        let client = Client::builder()
            .user_agent("issue-radar/0.1")
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, cache }
    }

    /// GET with XSSI prefix handling and 429 backoff.
    async fn call(&self, url: &str, params: &[(&str, &str)]) -> Result<String> {
        for attempt in 0..MAX_RETRY {
            let resp = self.client.get(url).query(params).send().await;
            match resp {
                Ok(r) if r.status().is_success() => {
                    return r.text().await.map_err(|e| anyhow!("trends body: {e}"));
                }
                Ok(r) if r.status().as_u16() == 429 => {
                    debug!(attempt, "trends rate limited, backing off");
                    tokio::time::sleep(Duration::from_secs(1 << attempt)).await;
                }
                Ok(r) => return Err(anyhow!("trends status {}", r.status())),
                Err(e) => {
                    if attempt + 1 == MAX_RETRY {
                        return Err(anyhow!("trends request: {e}"));
                    }
                    tokio::time::sleep(Duration::from_secs(1 << attempt)).await;
                }
            }
        }
        Err(anyhow!("trends rate limited after {MAX_RETRY} attempts"))
    }

    async fn related_for(&self, seed: &str, timeframe: &str) -> Result<SeedRelated> {
        let explore_req = serde_json::json!({
            "comparisonItem": [{ "keyword": seed, "time": timeframe, "geo": GEO }],
            "category": 0,
            "property": "",
        })
        .to_string();
        let tz = TZ.to_string();

        let explore_body = self
            .call(
                EXPLORE_URL,
                &[("hl", HL), ("tz", tz.as_str()), ("req", explore_req.as_str())],
            )
            .await?;
        let (token, request) = related_widget(&explore_body)
            .ok_or_else(|| anyhow!("no RELATED_QUERIES widget for {seed:?}"))?;

        let widget_req = request.to_string();
        let related_body = self
            .call(
                RELATED_URL,
                &[
                    ("hl", HL),
                    ("tz", tz.as_str()),
                    ("req", widget_req.as_str()),
                    ("token", token.as_str()),
                ],
            )
            .await?;
        let (top, rising) = ranked_lists(&related_body);

        Ok(SeedRelated {
            seed: seed.to_string(),
            top,
            rising,
        })
    }
}

#[async_trait]
impl SignalSource for GoogleTrendsSource {
    async fn fetch(&self, queries: &[String], recency_days: u32) -> Result<Vec<SignalDoc>> {
        let timeframe = if recency_days <= 30 {
            "today 1-m"
        } else {
            "today 3-m"
        };
        let key = format!("trends_related_{}", timeframe.replace(' ', "_"));

        if let Some(cached) = self.cache.load::<Vec<SeedRelated>>(&key) {
            debug!(seeds = cached.len(), "trends cache hit");
            return Ok(docs_from_related(&cached, timeframe));
        }

        let mut collected: Vec<SeedRelated> = Vec::new();
        for seed in queries.iter().take(MAX_SEEDS) {
            collected.push(self.related_for(seed, timeframe).await?);
            tokio::time::sleep(Duration::from_millis(SEED_DELAY_MS)).await;
        }

        if let Err(e) = self.cache.store(&key, &collected) {
            tracing::warn!(error = ?e, "trends cache write failed");
        }
        Ok(docs_from_related(&collected, timeframe))
    }

    fn name(&self) -> &'static str {
        "google_trends"
    }
}

/// Strip the `)]}'` XSSI guard the trends endpoints prepend.
fn strip_xssi(body: &str) -> Option<&str> {
    body.find('{').map(|i| &body[i..])
}

/// Find the RELATED_QUERIES widget in an explore response; returns its token
/// and the prepared widget request object.
fn related_widget(explore_body: &str) -> Option<(String, Value)> {
    let v: Value = serde_json::from_str(strip_xssi(explore_body)?).ok()?;
    for widget in v.get("widgets")?.as_array()? {
        if widget.get("id").and_then(Value::as_str) == Some("RELATED_QUERIES") {
            let token = widget.get("token")?.as_str()?.to_string();
            let request = widget.get("request")?.clone();
            return Some((token, request));
        }
    }
    None
}

/// Extract (top, rising) keyword lists from a relatedsearches response.
/// rankedList[0] is top, rankedList[1] is rising; each capped at LIST_HEAD.
fn ranked_lists(body: &str) -> (Vec<RelatedEntry>, Vec<RelatedEntry>) {
    let mut top = Vec::new();
    let mut rising = Vec::new();

    let parsed = strip_xssi(body).and_then(|s| serde_json::from_str::<Value>(s).ok());
    let Some(v) = parsed else {
        return (top, rising);
    };
    let Some(lists) = v.pointer("/default/rankedList").and_then(Value::as_array) else {
        return (top, rising);
    };

    for (i, list) in lists.iter().enumerate().take(2) {
        let out = if i == 0 { &mut top } else { &mut rising };
        let Some(entries) = list.get("rankedKeyword").and_then(Value::as_array) else {
            continue;
        };
        for item in entries.iter().take(LIST_HEAD) {
            let query = item
                .get("query")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .trim()
                .to_string();
            if query.is_empty() {
                continue;
            }
            out.push(RelatedEntry {
                query,
                value: item.get("value").and_then(Value::as_f64),
            });
        }
    }

    (top, rising)
}

fn docs_from_related(collected: &[SeedRelated], timeframe: &str) -> Vec<SignalDoc> {
    let mut docs = Vec::new();
    for pack in collected {
        for (kind, entries) in [(TrendKind::Top, &pack.top), (TrendKind::Rising, &pack.rising)] {
            let label = match kind {
                TrendKind::Top => "top",
                TrendKind::Rising => "rising",
            };
            for entry in entries {
                docs.push(SignalDoc {
                    source: SourceTag::GoogleTrends,
                    title: format!("[{}] related_{}: {}", pack.seed, label, entry.query),
                    text: entry.query.clone(),
                    url: String::new(),
                    published_at: None,
                    meta: DocMeta {
                        seed: Some(pack.seed.clone()),
                        trend: Some(TrendMeta {
                            kind,
                            value: entry.value,
                            timeframe: timeframe.to_string(),
                        }),
                        ..DocMeta::default()
                    },
                });
            }
        }
    }
    docs
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPLORE_FIXTURE: &str = r#")]}'
{"widgets":[
  {"id":"TIMESERIES","token":"t0","request":{}},
  {"id":"RELATED_QUERIES","token":"abc123","request":{"restriction":{}}}
]}"#;

    const RELATED_FIXTURE: &str = r#")]}',
{"default":{"rankedList":[
  {"rankedKeyword":[{"query":"아이 산만","value":100},{"query":"  ","value":5}]},
  {"rankedKeyword":[{"query":"틱 증상","value":"Breakout"}]}
]}}"#;

    #[test]
    fn explore_widget_token_is_found() {
        let (token, request) = related_widget(EXPLORE_FIXTURE).unwrap();
        assert_eq!(token, "abc123");
        assert!(request.get("restriction").is_some());
    }

    #[test]
    fn ranked_lists_split_top_and_rising() {
        let (top, rising) = ranked_lists(RELATED_FIXTURE);
        assert_eq!(top.len(), 1); // blank keyword dropped
        assert_eq!(top[0].query, "아이 산만");
        assert_eq!(top[0].value, Some(100.0));
        assert_eq!(rising.len(), 1);
        assert_eq!(rising[0].query, "틱 증상");
        assert_eq!(rising[0].value, None); // non-numeric value tolerated
    }

    #[test]
    fn garbage_body_yields_empty_lists() {
        let (top, rising) = ranked_lists("totally not json");
        assert!(top.is_empty() && rising.is_empty());
    }

    #[test]
    fn docs_carry_trend_meta() {
        let collected = vec![SeedRelated {
            seed: "산만".into(),
            top: vec![RelatedEntry {
                query: "아이 산만".into(),
                value: Some(42.0),
            }],
            rising: vec![RelatedEntry {
                query: "5세 산만".into(),
                value: None,
            }],
        }];
        let docs = docs_from_related(&collected, "today 1-m");
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].text, "아이 산만");
        assert_eq!(docs[0].title, "[산만] related_top: 아이 산만");
        assert!(docs[0].url.is_empty());
        let trend = docs[1].meta.trend.as_ref().unwrap();
        assert_eq!(trend.kind, TrendKind::Rising);
        assert_eq!(trend.value, None);
        assert_eq!(trend.timeframe, "today 1-m");
    }
}
