// Slack Notifications
//
// Delivery is best-effort: callers get a bool back, never an error, so a
// broken webhook cannot take down the monitor loop.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error, info};

const SLACK_TIMEOUT_SECS: u64 = 10;

/// Outbound notification channel.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Returns true only when the message was accepted for delivery.
    async fn send(&self, message: &str) -> bool;
}

#[derive(Debug, Serialize)]
struct SlackPayload<'a> {
    text: &'a str,
}

/// Slack incoming-webhook client.
pub struct SlackNotifier {
    client: Client,
    webhook_url: String,
}

impl SlackNotifier {
    pub fn new(webhook_url: String) -> Self {
        Self {
            client: Client::new(),
            webhook_url,
        }
    }
}

#[async_trait]
impl NotificationSink for SlackNotifier {
    async fn send(&self, message: &str) -> bool {
        if self.webhook_url.is_empty() {
            debug!("Slack webhook URL not configured, skipping notification");
            return false;
        }

        let payload = SlackPayload { text: message };
        let result = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .timeout(Duration::from_secs(SLACK_TIMEOUT_SECS))
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                info!("Slack notification sent successfully");
                true
            }
            Ok(response) => {
                error!(
                    "Failed to send Slack notification: HTTP {}",
                    response.status().as_u16()
                );
                false
            }
            Err(e) => {
                error!("Failed to send Slack notification: {}", e);
                false
            }
        }
    }
}
