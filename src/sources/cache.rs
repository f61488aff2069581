// src/sources/cache.rs
//! Day-scoped JSON cache shared by the network connectors.
//!
//! Connectors store the raw items they collected under a key that embeds
//! today's date, so a re-run within the same day replays the cached payload
//! instead of hitting the network again. Read problems degrade to a miss.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct DayCache {
    dir: PathBuf,
}

impl DayCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        let day = chrono::Local::now().format("%Y-%m-%d");
        self.dir.join(format!("{key}_{day}.json"))
    }

    /// `None` on a missing or unreadable entry.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = fs::read(self.path(key)).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    pub fn store<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating cache dir {}", self.dir.display()))?;
        let path = self.path(key);
        let body = serde_json::to_vec_pretty(value).context("serializing cache payload")?;
        fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_within_the_same_day() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = DayCache::new(tmp.path());

        let items = vec!["하나".to_string(), "둘".to_string()];
        cache.store("unit_test", &items).unwrap();

        let loaded: Vec<String> = cache.load("unit_test").unwrap();
        assert_eq!(loaded, items);
    }

    #[test]
    fn missing_entry_is_a_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = DayCache::new(tmp.path());
        assert!(cache.load::<Vec<String>>("nope").is_none());
    }

    #[test]
    fn corrupt_entry_is_a_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = DayCache::new(tmp.path());
        cache.store("bad", &42u32).unwrap();
        assert!(cache.load::<Vec<String>>("bad").is_none());
    }
}
