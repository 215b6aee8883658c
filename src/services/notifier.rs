//! Report delivery sinks

use crate::services::error::ProviderError;
use serde_json::json;
use tracing::info;

#[async_trait::async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one line of the cycle report
    async fn send(&self, text: &str) -> Result<(), ProviderError>;
}

/// Posts each line to a chat webhook as `{"content": line}`.
///
/// The payload shape matches Discord webhooks.
pub struct WebhookSink {
    client: reqwest::Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()?;
        Ok(Self::with_client(url, client))
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait::async_trait]
impl NotificationSink for WebhookSink {
    async fn send(&self, text: &str) -> Result<(), ProviderError> {
        let response = self
            .client
            .post(&self.url)
            .json(&json!({ "content": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Writes report lines to the log. Used when no webhook is configured.
pub struct LogSink;

#[async_trait::async_trait]
impl NotificationSink for LogSink {
    async fn send(&self, text: &str) -> Result<(), ProviderError> {
        info!(target: "trendwatch::report", "{}", text);
        Ok(())
    }
}
