use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum EmailDeliveryError {
    #[error("Invalid email address: {0}")]
    Address(String),

    #[error("Message could not be built: {0}")]
    Message(String),

    #[error("Transport failure: {0}")]
    Transport(String),
}

/// Low-level delivery of a single rendered message.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), EmailDeliveryError>;
}
