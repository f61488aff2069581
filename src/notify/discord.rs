use anyhow::{Context, Result};
use reqwest::Client;

use super::{digest_text, IssueDigest, Notifier};

/// Discord caps message content at 2000 chars; the digest is trimmed to fit.
const MAX_CONTENT_CHARS: usize = 1900;

pub struct DiscordNotifier {
    webhook_url: Option<String>,
    client: Client,
}

impl DiscordNotifier {
    pub fn from_env() -> Self {
        Self {
            webhook_url: std::env::var("DISCORD_WEBHOOK_URL").ok(),
            client: Client::new(),
        }
    }

    pub fn new(url: String) -> Self {
        Self {
            webhook_url: Some(url),
            client: Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, digest: &IssueDigest) -> Result<()> {
        let Some(url) = &self.webhook_url else {
            tracing::debug!("Discord disabled (no DISCORD_WEBHOOK_URL)");
            return Ok(());
        };

        let mut content = digest_text(digest);
        if content.chars().count() > MAX_CONTENT_CHARS {
            content = content.chars().take(MAX_CONTENT_CHARS).collect();
        }
        let body = serde_json::json!({ "content": content });

        self.client
            .post(url)
            .json(&body)
            .send()
            .await
            .context("discord post")?
            .error_for_status()
            .context("discord non-2xx")?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "discord"
    }
}
