//! Slack incoming-webhook channel.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

use crate::error::DeliveryError;
use crate::message::WebhookMessage;
use crate::NotifyChannel;

/// Posts messages to a single Slack incoming webhook.
pub struct SlackChannel {
    webhook_url: String,
    client: reqwest::Client,
}

impl SlackChannel {
    /// Create a Slack channel with a specific webhook URL.
    #[must_use]
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NotifyChannel for SlackChannel {
    fn name(&self) -> &'static str {
        "slack"
    }

    async fn send(&self, message: &WebhookMessage) -> Result<(), DeliveryError> {
        let body = message.to_json()?;

        debug!(
            channel = "slack",
            destination = %message.channel,
            bytes = body.len(),
            "Posting webhook message"
        );

        let response = self
            .client
            .post(&self.webhook_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        if response.status().is_success() {
            debug!(channel = "slack", "Webhook accepted message");
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            warn!(
                channel = "slack",
                status = %status,
                body = %body,
                "Slack webhook request failed"
            );

            Err(DeliveryError::Rejected { status, body })
        }
    }
}

/// Post `message` to `webhook_url` once.
pub async fn deliver(message: &WebhookMessage, webhook_url: &str) -> Result<(), DeliveryError> {
    SlackChannel::new(webhook_url).send(message).await
}
