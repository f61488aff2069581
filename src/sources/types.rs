// src/sources/types.rs
use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// The closed set of signal origins. The wire names double as keys in the
/// source-weight map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    NaverCafearticle,
    NaverNews,
    NaverBlog,
    GoogleTrends,
    RssNews,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::NaverCafearticle => "naver_cafearticle",
            SourceTag::NaverNews => "naver_news",
            SourceTag::NaverBlog => "naver_blog",
            SourceTag::GoogleTrends => "google_trends",
            SourceTag::RssNews => "rss_news",
        }
    }

    /// The date-sorted Naver search endpoints.
    pub fn is_search(&self) -> bool {
        matches!(
            self,
            SourceTag::NaverCafearticle | SourceTag::NaverNews | SourceTag::NaverBlog
        )
    }
}

/// Which related-queries list a trend keyword came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendKind {
    Top,
    Rising,
}

/// Trend-source side channel, populated only by the trends connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendMeta {
    pub kind: TrendKind,
    /// Relative interest value; `None` when the API reports a non-numeric
    /// placeholder (e.g. "Breakout").
    pub value: Option<f64>,
    pub timeframe: String,
}

/// Source-specific provenance. Each connector fills only its own fields;
/// consumers ignore the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocMeta {
    /// Search query that produced the hit (Naver).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Seed keyword the related list was expanded from (trends).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
    /// API endpoint name (Naver).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Originating feed URL (RSS).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendMeta>,
}

/// One unit of evidence handed to the scorer. Created fresh per fetch call,
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalDoc {
    pub source: SourceTag,
    pub title: String,
    pub text: String,
    /// Empty when the source has no landing page (trend keywords).
    pub url: String,
    pub published_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub meta: DocMeta,
}

#[async_trait::async_trait]
pub trait SignalSource: Send + Sync {
    async fn fetch(&self, queries: &[String], recency_days: u32) -> Result<Vec<SignalDoc>>;
    fn name(&self) -> &'static str;
}
