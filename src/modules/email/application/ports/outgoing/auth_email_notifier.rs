use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum EmailNotificationError {
    #[error("Notification queue is full")]
    QueueFull,

    #[error("Email sending failed: {0}")]
    SendFailed(String),
}

/// Account-lifecycle mail, from the auth module's point of view.
///
/// The `queue_` methods hand the mail to a background worker and return
/// immediately; `send_password_reset_email` delivers inline because the
/// caller's response depends on it.
#[async_trait]
pub trait AuthEmailNotifier: Send + Sync {
    async fn queue_verification_email(
        &self,
        to: &str,
        name: &str,
        token: &str,
    ) -> Result<(), EmailNotificationError>;

    async fn queue_welcome_email(&self, to: &str, name: &str)
        -> Result<(), EmailNotificationError>;

    async fn send_password_reset_email(
        &self,
        to: &str,
        name: &str,
        token: &str,
    ) -> Result<(), EmailNotificationError>;
}
