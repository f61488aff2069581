// src/profile.rs
//! Brand profile: who we listen for, seed queries and per-category boosts.
//!
//! Loaded from TOML (`PROFILE_PATH`, default `config/profile.toml`) with a
//! built-in seed profile as fallback, so the binary always has something to
//! run with.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

pub const ENV_PROFILE_PATH: &str = "PROFILE_PATH";
pub const DEFAULT_PROFILE_PATH: &str = "config/profile.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct BrandProfile {
    pub brand: String,
    pub product: String,
    pub target: String,
    pub age_range: String,
    pub seed_queries: Vec<String>,
    /// Category → priority multiplier; categories not listed default to 1.0
    /// inside the scorer.
    #[serde(default)]
    pub taxonomy_boost: HashMap<String, f64>,
}

impl BrandProfile {
    /// Env path → default path → built-in seed.
    pub fn load_default() -> Self {
        let path = std::env::var(ENV_PROFILE_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PROFILE_PATH));
        match Self::load_from_file(&path) {
            Ok(p) => p,
            Err(e) => {
                warn!(path = %path.display(), error = ?e, "profile load failed, using built-in seed");
                Self::default_seed()
            }
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading profile from {}", path.display()))?;
        toml::from_str(&content).context("parsing profile toml")
    }

    /// Built-in seed profile (the 브레인올로지/뉴턴젤리 deployment).
    pub fn default_seed() -> Self {
        let seed_queries = [
            "아이 예민", "아이 짜증", "분리불안", "감정조절", "떼쓰기",
            "주의력", "집중력", "산만", "ADHD 의심", "유치원 적응", "초등 입학",
            "아이 잠", "잠투정", "밤에 자주 깨", "수면 루틴",
            "스마트폰 중독", "유튜브", "게임 집착",
            "한글 떼기", "수학", "또래관계", "친구 문제",
            "감기 자주", "면역", "비염",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let mut taxonomy_boost = HashMap::new();
        for (cat, boost) in [
            ("집중/주의", 1.35),
            ("정서/예민", 1.30),
            ("수면/루틴", 1.20),
            ("디지털/스크린", 1.15),
            ("학습/학교적응", 1.10),
            ("또래/사회성", 1.05),
            ("건강/면역", 0.95),
        ] {
            taxonomy_boost.insert(cat.to_string(), boost);
        }

        Self {
            brand: "브레인올로지".to_string(),
            product: "뉴턴젤리".to_string(),
            target: "30-40대 엄마".to_string(),
            age_range: "5세 이상 자녀".to_string(),
            seed_queries,
            taxonomy_boost,
        }
    }
}
