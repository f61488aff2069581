// src/config.rs
//! Runtime configuration: environment variables with built-in defaults.
//!
//! API credentials come from the environment only (never from files in the
//! repo). Source weights can be overridden from a JSON file; anything
//! missing or malformed falls back to the built-in seed.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_SOURCE_WEIGHTS_PATH: &str = "SOURCE_WEIGHTS_PATH";
pub const DEFAULT_SOURCE_WEIGHTS_PATH: &str = "config/source_weights.json";

const ENV_CACHE_DIR: &str = "ISSUE_RADAR_CACHE_DIR";
const ENV_DEBUG: &str = "ISSUE_RADAR_DEBUG";
const ENV_RECENCY_DAYS: &str = "ISSUE_RADAR_RECENCY_DAYS";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub locale: String,
    pub language: String,
    pub recency_days: u32,
    pub debug: bool,

    pub naver_client_id: Option<String>,
    pub naver_client_secret: Option<String>,
    /// Cap on how many expanded queries the search API is hit with.
    pub naver_max_queries: usize,
    /// Results per query (API allows up to 100).
    pub naver_display: u32,

    pub cache_dir: PathBuf,
    pub source_weights: HashMap<String, f64>,
    pub rss_feeds: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let weights_path = std::env::var(ENV_SOURCE_WEIGHTS_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SOURCE_WEIGHTS_PATH));

        Self {
            locale: "KR".to_string(),
            language: "ko".to_string(),
            recency_days: std::env::var(ENV_RECENCY_DAYS)
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(30),
            debug: std::env::var(ENV_DEBUG).ok().as_deref() == Some("1"),
            naver_client_id: std::env::var("NAVER_CLIENT_ID").ok(),
            naver_client_secret: std::env::var("NAVER_CLIENT_SECRET").ok(),
            naver_max_queries: 25,
            naver_display: 10,
            cache_dir: std::env::var(ENV_CACHE_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".cache")),
            source_weights: load_source_weights(&weights_path),
            rss_feeds: default_rss_feeds(),
        }
    }
}

/// Load the source-weight map from JSON (`{"tag": weight, ...}`).
/// Falls back to [`default_source_weights`] on any error.
pub fn load_source_weights(path: &Path) -> HashMap<String, f64> {
    match fs::read_to_string(path) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_else(|_| default_source_weights()),
        Err(_) => default_source_weights(),
    }
}

/// Built-in source weights (tuning point). Cafe posts track parent concerns
/// most directly; trends sits lower for its 429-driven volatility.
pub fn default_source_weights() -> HashMap<String, f64> {
    let mut weights = HashMap::new();
    for (tag, w) in [
        ("naver_cafearticle", 1.35),
        ("naver_news", 1.05),
        ("naver_blog", 1.10),
        ("google_trends", 0.85),
        ("rss_news", 0.70),
    ] {
        weights.insert(tag.to_string(), w);
    }
    weights
}

/// Default feed list: parenting/education specialty press plus the education
/// and welfare ministries' announcement feeds.
pub fn default_rss_feeds() -> Vec<String> {
    [
        // 베이비뉴스 (parenting/education press)
        "https://www.ibabynews.com/rss/allArticle.xml",
        "https://www.ibabynews.com/rss/clickTop.xml",
        "https://www.ibabynews.com/rss/S1N1.xml",
        "https://www.ibabynews.com/rss/S1N2.xml",
        "https://www.ibabynews.com/rss/S1N3.xml",
        "https://www.ibabynews.com/rss/S1N4.xml",
        "https://www.ibabynews.com/rss/S1N5.xml",
        "https://www.ibabynews.com/rss/S1N6.xml",
        "https://www.ibabynews.com/rss/S2N36.xml",
        "https://www.ibabynews.com/rss/S2N37.xml",
        // KEDI (education policy/research)
        "https://www.kedi.re.kr/khome/main/announce/rssAnnounceData.do?board_sq_no=1",
        "https://www.kedi.re.kr/khome/main/announce/rssAnnounceData.do?board_sq_no=2",
        "https://www.kedi.re.kr/khome/main/announce/rssSeminarData.do",
        "https://www.kedi.re.kr/khome/main/announce/rssAnnounceData.do?board_sq_no=3",
        "https://www.kedi.re.kr/khome/main/research/rssPubData.do",
        "https://www.kedi.re.kr/khome/main/journal/rssMZJournalData.do",
        "https://www.kedi.re.kr/khome/main/journal/rssEDJournalData.do",
        "https://www.kedi.re.kr/khome/main/journal/rssKDJournalData.do",
        "https://www.kedi.re.kr/khome/main/journal/rssEJJournalData.do",
        // MOHW (child health/welfare policy)
        "http://www.mohw.go.kr/rss/board.es?mid=a10501010000&bid=0003&cg_code=C01",
        "http://www.mohw.go.kr/rss/board.es?mid=a10501040000&bid=0003&cg_code=C03",
        "http://www.mohw.go.kr/rss/board.es?mid=a10502000000&bid=0025",
        "http://www.mohw.go.kr/rss/board.es?mid=a10503000000&bid=0027",
        "http://www.mohw.go.kr/rss/board.es?mid=a10409020000&bid=0026",
        // korea.kr policy briefing (ministry-level parent-interest signals)
        "https://www.korea.kr/rss/policy.xml",
        "https://www.korea.kr/rss/reporter.xml",
        "https://www.korea.kr/rss/insight.xml",
        "https://www.korea.kr/rss/fact.xml",
        "https://www.korea.kr/rss/pressrelease.xml",
        "https://www.korea.kr/rss/dept_moe.xml",
        "https://www.korea.kr/rss/dept_mw.xml",
        "https://www.korea.kr/rss/dept_mogef.xml",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_weights_cover_all_five_tags() {
        let w = default_source_weights();
        assert_eq!(w.len(), 5);
        assert!((w["naver_cafearticle"] - 1.35).abs() < 1e-9);
        assert!((w["rss_news"] - 0.70).abs() < 1e-9);
    }

    #[test]
    fn weights_file_overrides_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("weights.json");
        let mut f = fs::File::create(&p).unwrap();
        write!(f, r#"{{"rss_news": 0.5, "naver_news": 2.0}}"#).unwrap();

        let w = load_source_weights(&p);
        assert_eq!(w.len(), 2);
        assert!((w["rss_news"] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn missing_or_invalid_file_falls_back() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.json");
        assert_eq!(load_source_weights(&missing), default_source_weights());

        let bad = tmp.path().join("bad.json");
        fs::write(&bad, "not json").unwrap();
        assert_eq!(load_source_weights(&bad), default_source_weights());
    }
}
