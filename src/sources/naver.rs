// src/sources/naver.rs
//! Naver Open API search connector (cafearticle / news / blog endpoints).
//!
//! Authenticated with client id/secret headers; each endpoint is queried
//! with sort=date over the long-tail query list and cached per day. Retries
//! with exponential backoff on 429/5xx.

use std::cmp::Reverse;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::cache::DayCache;
use super::types::{DocMeta, SignalDoc, SignalSource, SourceTag};

const API_BASE: &str = "https://openapi.naver.com/v1/search";
const MAX_RETRY: u32 = 5;
/// Polite delay between API calls.
const CALL_DELAY_MS: u64 = 400;
/// Queries shorter than this sort behind the long-tail ones.
const SHORT_QUERY_CHARS: usize = 6;

/// The three search endpoints and the tags their hits carry.
const ENDPOINTS: &[(&str, SourceTag)] = &[
    ("cafearticle", SourceTag::NaverCafearticle),
    ("news", SourceTag::NaverNews),
    ("blog", SourceTag::NaverBlog),
];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    link: String,
    #[serde(default, rename = "originallink")]
    original_link: String,
    #[serde(default, rename = "pubDate")]
    pub_date: String,
}

/// Per-item cache payload; docs are rebuilt from these on a cache hit.
#[derive(Debug, Serialize, Deserialize)]
struct CachedItem {
    query: String,
    title: String,
    description: String,
    link: String,
    pub_date: String,
    endpoint: String,
}

pub struct NaverSearchSource {
    client: Client,
    display: u32,
    max_queries: usize,
    cache: DayCache,
}

impl NaverSearchSource {
    pub fn new(
        client_id: &str,
        client_secret: &str,
        display: u32,
        max_queries: usize,
        cache: DayCache,
    ) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "X-Naver-Client-Id",
            client_id.parse().context("naver client id header")?,
        );
        headers.insert(
            "X-Naver-Client-Secret",
            client_secret.parse().context("naver client secret header")?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .user_agent("issue-radar/0.1")
            .timeout(Duration::from_secs(10))
            .build()
            .context("building naver http client")?;
        Ok(Self {
            client,
            display: display.clamp(1, 100),
            max_queries,
            cache,
        })
    }

    /// One API call with backoff; `None` means the call ultimately failed
    /// (the caller skips the query, it is not an error for the whole fetch).
    async fn call(&self, endpoint: &str, query: &str) -> Option<SearchResponse> {
        let url = format!("{API_BASE}/{endpoint}.json");
        let display = self.display.to_string();
        for attempt in 0..MAX_RETRY {
            let resp = self
                .client
                .get(&url)
                .query(&[
                    ("query", query),
                    ("display", display.as_str()),
                    ("start", "1"),
                    ("sort", "date"),
                ])
                .send()
                .await;
            match resp {
                Ok(r) if r.status().is_success() => return r.json().await.ok(),
                Ok(r) if matches!(r.status().as_u16(), 429 | 500 | 502 | 503 | 504) => {
                    debug!(endpoint, status = r.status().as_u16(), attempt, "naver backoff");
                    tokio::time::sleep(Duration::from_secs(1 << attempt)).await;
                }
                Ok(r) => {
                    warn!(endpoint, status = r.status().as_u16(), "naver call rejected");
                    return None;
                }
                Err(_) => tokio::time::sleep(Duration::from_secs(1 << attempt)).await,
            }
        }
        None
    }
}

#[async_trait]
impl SignalSource for NaverSearchSource {
    async fn fetch(&self, queries: &[String], recency_days: u32) -> Result<Vec<SignalDoc>> {
        let qs = order_queries(queries, self.max_queries);
        let mut docs = Vec::new();

        for (endpoint, tag) in ENDPOINTS {
            let key = format!("naver_{}_{recency_days}", tag.as_str());
            if let Some(cached) = self.cache.load::<Vec<CachedItem>>(&key) {
                debug!(endpoint, count = cached.len(), "naver cache hit");
                docs.extend(docs_from_cached(*tag, &cached));
                continue;
            }

            let mut collected: Vec<CachedItem> = Vec::new();
            for q in &qs {
                let data = self.call(endpoint, q).await;
                tokio::time::sleep(Duration::from_millis(CALL_DELAY_MS)).await;
                let Some(data) = data else { continue };

                for it in data.items {
                    let title = strip_tags(&it.title);
                    let description = strip_tags(&it.description);
                    if title.is_empty() && description.is_empty() {
                        continue;
                    }
                    let link = if it.link.is_empty() {
                        it.original_link
                    } else {
                        it.link
                    };
                    collected.push(CachedItem {
                        query: q.to_string(),
                        title,
                        description,
                        link,
                        pub_date: it.pub_date,
                        endpoint: endpoint.to_string(),
                    });
                }
            }

            docs.extend(docs_from_cached(*tag, &collected));
            if let Err(e) = self.cache.store(&key, &collected) {
                warn!(error = ?e, endpoint, "naver cache write failed");
            }
        }

        Ok(docs)
    }

    fn name(&self) -> &'static str {
        "naver_search"
    }
}

/// Long-tail first: short queries (< 6 chars) sort last, longest first, then
/// cap at `max`.
fn order_queries(queries: &[String], max: usize) -> Vec<String> {
    let mut qs: Vec<&String> = queries.iter().collect();
    qs.sort_by_key(|q| {
        let chars = q.chars().count();
        (chars < SHORT_QUERY_CHARS, Reverse(chars))
    });
    qs.into_iter().take(max).cloned().collect()
}

fn docs_from_cached(tag: SourceTag, items: &[CachedItem]) -> Vec<SignalDoc> {
    items
        .iter()
        .map(|it| {
            let title = if it.title.is_empty() {
                it.query.clone()
            } else {
                it.title.clone()
            };
            SignalDoc {
                source: tag,
                text: format!("{} {}", it.title, it.description).trim().to_string(),
                title,
                url: it.link.clone(),
                published_at: parse_pubdate(&it.pub_date),
                meta: DocMeta {
                    query: Some(it.query.clone()),
                    endpoint: Some(it.endpoint.clone()),
                    ..DocMeta::default()
                },
            }
        })
        .collect()
}

/// e.g. "Tue, 03 Dec 2019 16:08:41 +0900"
fn parse_pubdate(s: &str) -> Option<DateTime<FixedOffset>> {
    if s.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(s).ok()
}

/// Strip the `<b>…</b>` highlight markup and entities the search API embeds
/// in titles and snippets.
pub(crate) fn strip_tags(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
    let unescaped = html_escape::decode_html_entities(s);
    let no_tags = RE_TAGS.replace_all(&unescaped, "");
    no_tags.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_tags_removes_markup_and_entities() {
        assert_eq!(strip_tags("<b>아이</b> 산만&nbsp;이유"), "아이 산만 이유");
        assert_eq!(strip_tags(""), "");
    }

    #[test]
    fn order_queries_prefers_long_tail() {
        let qs: Vec<String> = ["수학", "아이 예민 짜증 해결", "유치원 적응"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let out = order_queries(&qs, 10);
        assert_eq!(out[0], "아이 예민 짜증 해결");
        assert_eq!(out.last().unwrap(), "수학"); // short query pushed back
    }

    #[test]
    fn order_queries_caps_output() {
        let qs: Vec<String> = (0..50).map(|i| format!("긴 질의 문자열 {i}")).collect();
        assert_eq!(order_queries(&qs, 25).len(), 25);
    }

    #[test]
    fn pubdate_parses_rfc2822() {
        let dt = parse_pubdate("Tue, 03 Dec 2019 16:08:41 +0900").unwrap();
        assert_eq!(dt.timezone().local_minus_utc(), 9 * 3600);
        assert!(parse_pubdate("").is_none());
        assert!(parse_pubdate("not a date").is_none());
    }

    #[test]
    fn cached_items_rebuild_docs_with_query_fallback_title() {
        let items = vec![CachedItem {
            query: "아이 산만".into(),
            title: String::new(),
            description: "설명".into(),
            link: "http://cafe.naver.com/x".into(),
            pub_date: String::new(),
            endpoint: "cafearticle".into(),
        }];
        let docs = docs_from_cached(SourceTag::NaverCafearticle, &items);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "아이 산만");
        assert_eq!(docs[0].text, "설명");
        assert_eq!(docs[0].meta.endpoint.as_deref(), Some("cafearticle"));
    }
}
