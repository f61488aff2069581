// src/sources/rss.rs
//! RSS connector for the parenting/education/policy feed list.
//!
//! Feeds are fetched sequentially; a feed that fails to download or parse is
//! logged and skipped so one dead feed never empties the whole source.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use quick_xml::de::from_str;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use super::naver::strip_tags;
use super::types::{DocMeta, SignalDoc, SignalSource, SourceTag};

/// Entries read per feed; the long government feeds can run into thousands.
const MAX_ITEMS_PER_FEED: usize = 300;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

pub struct RssNewsSource {
    client: Client,
    feeds: Vec<String>,
}

impl RssNewsSource {
    pub fn new(feeds: Vec<String>) -> Self {
        let client = Client::builder()
            .user_agent("issue-radar/0.1")
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, feeds }
    }
}

#[async_trait]
impl SignalSource for RssNewsSource {
    async fn fetch(&self, _queries: &[String], _recency_days: u32) -> Result<Vec<SignalDoc>> {
        let mut docs = Vec::new();
        for feed_url in &self.feeds {
            let body = match self.client.get(feed_url).send().await {
                Ok(r) => match r.text().await {
                    Ok(b) => b,
                    Err(e) => {
                        warn!(feed = feed_url.as_str(), error = ?e, "feed body read failed");
                        continue;
                    }
                },
                Err(e) => {
                    warn!(feed = feed_url.as_str(), error = ?e, "feed fetch failed");
                    continue;
                }
            };
            match docs_from_feed_xml(feed_url, &body) {
                Ok(mut v) => docs.append(&mut v),
                Err(e) => warn!(feed = feed_url.as_str(), error = ?e, "feed parse failed"),
            }
        }
        Ok(docs)
    }

    fn name(&self) -> &'static str {
        "rss_news"
    }
}

/// Parse one RSS 2.0 document into signal docs. Public so fixture-based
/// tests can exercise parsing without the network.
pub fn docs_from_feed_xml(feed_url: &str, xml: &str) -> Result<Vec<SignalDoc>> {
    let rss: Rss = from_str(xml).context("parsing rss xml")?;
    let mut out = Vec::new();

    for it in rss.channel.item.into_iter().take(MAX_ITEMS_PER_FEED) {
        let title = strip_tags(it.title.as_deref().unwrap_or_default());
        let summary = strip_tags(it.description.as_deref().unwrap_or_default());
        let link = it.link.unwrap_or_default();

        out.push(SignalDoc {
            source: SourceTag::RssNews,
            text: format!("{title}\n{summary}"),
            title,
            url: link,
            published_at: it.pub_date.as_deref().and_then(parse_pubdate),
            meta: DocMeta {
                feed: Some(feed_url.to_string()),
                ..DocMeta::default()
            },
        });
    }

    Ok(out)
}

fn parse_pubdate(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(s).ok()
}
