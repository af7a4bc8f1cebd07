//! Outcome notifications.
//!
//! Every processed file produces one notification. Delivery is best effort:
//! callers log a `NotifyError` and carry on.

mod log;
mod webhook;

pub use log::LogNotifier;
pub use webhook::WebhookNotifier;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::{NotifierBackend, NotifierConfig};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Notification endpoint returned {status}")]
    Rejected { status: u16 },

    #[error("Notifier not configured: {0}")]
    NotConfigured(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A file reached the library.
    Imported,
    /// A file or release could not be imported.
    Failed,
}

/// A single human-readable notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn imported(file_name: &str) -> Self {
        Self {
            kind: NotificationKind::Imported,
            subject: file_name.to_string(),
            body: format!("Successfully moved {}", file_name),
        }
    }

    pub fn failed(subject: &str, reason: impl std::fmt::Display) -> Self {
        Self {
            kind: NotificationKind::Failed,
            subject: subject.to_string(),
            body: format!("Failed to import {}: {}", subject, reason),
        }
    }
}

/// Delivers notifications to the operator.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Create a notifier from configuration.
pub fn create_notifier(config: &NotifierConfig) -> Result<Box<dyn Notifier>, NotifyError> {
    match config.backend {
        NotifierBackend::Log => Ok(Box::new(LogNotifier)),
        NotifierBackend::Webhook => {
            let webhook = config.webhook.as_ref().ok_or_else(|| {
                NotifyError::NotConfigured(
                    "[notifier.webhook] must be set when backend = \"webhook\"".to_string(),
                )
            })?;
            Ok(Box::new(WebhookNotifier::new(webhook)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WebhookConfig;

    #[test]
    fn test_notification_constructors() {
        let ok = Notification::imported("Movie_(2015).mkv");
        assert_eq!(ok.kind, NotificationKind::Imported);
        assert_eq!(ok.body, "Successfully moved Movie_(2015).mkv");

        let failed = Notification::failed("Unknown.Film.720p.avi", "no match");
        assert_eq!(failed.kind, NotificationKind::Failed);
        assert!(failed.body.contains("no match"));
    }

    #[test]
    fn test_create_log_notifier() {
        let notifier = create_notifier(&NotifierConfig::default()).unwrap();
        assert_eq!(notifier.name(), "log");
    }

    #[test]
    fn test_create_webhook_requires_section() {
        let config = NotifierConfig {
            backend: NotifierBackend::Webhook,
            webhook: None,
        };
        assert!(matches!(
            create_notifier(&config),
            Err(NotifyError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_create_webhook_notifier() {
        let config = NotifierConfig {
            backend: NotifierBackend::Webhook,
            webhook: Some(WebhookConfig {
                url: "http://localhost:9/hook".to_string(),
                timeout_secs: 5,
            }),
        };
        let notifier = create_notifier(&config).unwrap();
        assert_eq!(notifier.name(), "webhook");
    }
}
