// src/notify/mod.rs
//! Webhook notifications for finished runs.

pub mod discord;
pub mod slack;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::analysis::scorer::IssueItem;

/// Digest pushed to chat channels after a run.
#[derive(Debug, Clone)]
pub struct IssueDigest {
    pub brand: String,
    pub generated_at: DateTime<Utc>,
    pub top: Vec<IssueItem>,
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, digest: &IssueDigest) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Fan-out to all configured channels; individual failures are logged and
/// never abort the run.
pub struct NotifierMux {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierMux {
    pub fn from_env() -> Self {
        Self {
            notifiers: vec![
                Box::new(slack::SlackNotifier::from_env()),
                Box::new(discord::DiscordNotifier::from_env()),
            ],
        }
    }

    pub fn new(notifiers: Vec<Box<dyn Notifier>>) -> Self {
        Self { notifiers }
    }

    pub async fn send_all(&self, digest: &IssueDigest) {
        for n in &self.notifiers {
            if let Err(e) = n.send(digest).await {
                tracing::warn!(notifier = n.name(), error = ?e, "notification failed");
            }
        }
    }
}

/// Shared text block for chat channels: one line per issue, first link as
/// the evidence sample.
pub(crate) fn digest_text(digest: &IssueDigest) -> String {
    let mut lines = vec![format!(
        "[{}] 이슈 레이더 {} — TOP {}",
        digest.brand,
        digest.generated_at.format("%Y-%m-%d"),
        digest.top.len()
    )];
    for (i, it) in digest.top.iter().enumerate() {
        let link = it
            .evidence
            .iter()
            .find(|ev| ev.starts_with("http"))
            .map(|ev| format!(" ({ev})"))
            .unwrap_or_default();
        lines.push(format!(
            "{}. ({}) {} | score={:.2}{}",
            i + 1,
            it.category,
            it.phrase,
            it.score,
            link
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn digest_text_lists_issues_with_first_link() {
        let digest = IssueDigest {
            brand: "브레인올로지".into(),
            generated_at: Utc.with_ymd_and_hms(2025, 8, 4, 9, 0, 0).unwrap(),
            top: vec![IssueItem {
                phrase: "아이 산만 이유".into(),
                category: "집중/주의".into(),
                score: 2.2,
                evidence: vec!["제목 근거".into(), "http://x/1".into()],
            }],
        };
        let text = digest_text(&digest);
        assert!(text.contains("2025-08-04"));
        assert!(text.contains("1. (집중/주의) 아이 산만 이유 | score=2.20 (http://x/1)"));
    }
}
