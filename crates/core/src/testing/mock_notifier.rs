//! Recording notifier for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::notify::{Notification, Notifier, NotifyError};

/// Notifier that keeps every notification in memory.
///
/// # Example
///
/// ```rust,ignore
/// let notifier = RecordingNotifier::new();
/// notifier.notify(&Notification::imported("Heat_(1995).mkv")).await?;
/// assert_eq!(notifier.sent().await.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<RwLock<Vec<Notification>>>,
    failing: Arc<RwLock<bool>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications delivered so far, in order.
    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.read().await.clone()
    }

    /// When set, every delivery fails (nothing is recorded).
    pub async fn set_failing(&self, failing: bool) {
        *self.failing.write().await = failing;
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        if *self.failing.read().await {
            return Err(NotifyError::Rejected { status: 503 });
        }
        self.sent.write().await.push(notification.clone());
        Ok(())
    }
}
