use async_trait::async_trait;
use tracing::{info, warn};

use super::{Notification, NotificationKind, Notifier, NotifyError};

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        match notification.kind {
            NotificationKind::Imported => info!(subject = %notification.subject, "{}", notification.body),
            NotificationKind::Failed => warn!(subject = %notification.subject, "{}", notification.body),
        }
        Ok(())
    }
}
