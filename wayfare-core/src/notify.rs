use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Notification kinds surfaced to the customer, mirrored by the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    BookingReceived,
    PaymentSuccess,
    Cancellation,
}

#[derive(Debug, thiserror::Error)]
#[error("notification delivery failed: {0}")]
pub struct NotifyError(pub String);

/// In-app notification delivery. Best-effort: callers must never let a
/// delivery failure roll back committed state.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(
        &self,
        user_id: Uuid,
        title: &str,
        message: &str,
        kind: NotificationKind,
        email_preview_url: Option<&str>,
    ) -> Result<(), NotifyError>;
}

/// Outbound email delivery. Returns a preview URL when the backing
/// transport provides one (e.g. a sandbox inbox).
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        html: &str,
    ) -> Result<Option<String>, NotifyError>;
}

/// Tracing-backed notifier for local development and tests.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(
        &self,
        user_id: Uuid,
        title: &str,
        message: &str,
        kind: NotificationKind,
        _email_preview_url: Option<&str>,
    ) -> Result<(), NotifyError> {
        tracing::info!(%user_id, ?kind, title, message, "notification delivered");
        Ok(())
    }
}

pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        _html: &str,
    ) -> Result<Option<String>, NotifyError> {
        tracing::info!(to, subject, "email delivered");
        Ok(None)
    }
}
