//! JSON webhook notifier.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{Notification, Notifier, NotifyError};
use crate::config::WebhookConfig;

/// POSTs each notification as JSON to a fixed URL.
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(config: &WebhookConfig) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        debug!("POST {} ({})", self.url, notification.subject);

        let response = self
            .client
            .post(&self.url)
            .json(notification)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationKind;

    #[test]
    fn test_payload_shape() {
        let payload = serde_json::to_value(Notification::imported("A_(2000).mkv")).unwrap();
        assert_eq!(payload["kind"], "imported");
        assert_eq!(payload["subject"], "A_(2000).mkv");
        assert_eq!(
            serde_json::to_value(NotificationKind::Failed).unwrap(),
            "failed"
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_errors() {
        let notifier = WebhookNotifier::new(&WebhookConfig {
            url: "http://127.0.0.1:9/hook".to_string(),
            timeout_secs: 1,
        })
        .unwrap();

        let result = notifier.notify(&Notification::imported("A_(2000).mkv")).await;

        assert!(matches!(result, Err(NotifyError::Http(_))));
    }
}
