use crate::email::application::ports::outgoing::email_sender::{EmailDeliveryError, EmailSender};
use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{
    message::header::ContentType, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Message) -> Result<(), EmailDeliveryError>;
}

#[async_trait]
impl Mailer for AsyncSmtpTransport<Tokio1Executor> {
    async fn send(&self, email: Message) -> Result<(), EmailDeliveryError> {
        AsyncTransport::send(self, email)
            .await
            .map(|_resp| ())
            .map_err(|e| EmailDeliveryError::Transport(e.to_string()))
    }
}

pub struct SmtpEmailSender {
    mailer: Box<dyn Mailer>,
    from_email: String,
}

impl SmtpEmailSender {
    pub fn new_with_mailer(mailer: Box<dyn Mailer>, from_email: &str) -> Self {
        Self {
            mailer,
            from_email: from_email.to_string(),
        }
    }

    pub fn new(
        smtp_server: &str,
        smtp_username: &str,
        smtp_password: &str,
        from_email: &str,
    ) -> Self {
        let creds = Credentials::new(smtp_username.to_string(), smtp_password.to_string());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(smtp_server)
            .expect("Invalid SMTP server address")
            .credentials(creds)
            .build();

        Self {
            mailer: Box::new(transport),
            from_email: from_email.to_string(),
        }
    }

    // Plaintext transport for a local catcher such as Mailpit
    pub fn new_local(host: &str, port: u16, from_email: &str) -> Self {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();

        Self {
            mailer: Box::new(transport),
            from_email: from_email.to_string(),
        }
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), EmailDeliveryError> {
        let from = self
            .from_email
            .parse()
            .map_err(|e| EmailDeliveryError::Address(format!("from: {e:?}")))?;
        let to = to
            .parse()
            .map_err(|e| EmailDeliveryError::Address(format!("to: {e:?}")))?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| EmailDeliveryError::Message(e.to_string()))?;

        self.mailer.send(email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AcceptingMailer;

    #[async_trait]
    impl Mailer for AcceptingMailer {
        async fn send(&self, _email: Message) -> Result<(), EmailDeliveryError> {
            Ok(())
        }
    }

    struct UnreachableMailer;

    #[async_trait]
    impl Mailer for UnreachableMailer {
        async fn send(&self, _email: Message) -> Result<(), EmailDeliveryError> {
            panic!("A malformed message must never reach the transport");
        }
    }

    #[tokio::test]
    async fn test_well_formed_mail_is_handed_to_the_transport() {
        let sender =
            SmtpEmailSender::new_with_mailer(Box::new(AcceptingMailer), "noreply@replex.ai");

        let result = sender
            .send_email("user@example.com", "Hello", "<p>Hi</p>")
            .await;

        assert!(result.is_ok(), "Expected Ok, got {:?}", result);
    }

    #[tokio::test]
    async fn test_invalid_from_address_is_caught_before_sending() {
        let sender = SmtpEmailSender::new_with_mailer(Box::new(UnreachableMailer), "not-an-email");

        let result = sender
            .send_email("user@example.com", "Hello", "<p>Hi</p>")
            .await;

        assert!(matches!(result, Err(EmailDeliveryError::Address(_))));
    }

    #[tokio::test]
    async fn test_invalid_to_address_is_caught_before_sending() {
        let sender =
            SmtpEmailSender::new_with_mailer(Box::new(UnreachableMailer), "noreply@replex.ai");

        let result = sender.send_email("not-an-email", "Hello", "<p>Hi</p>").await;

        assert!(matches!(result, Err(EmailDeliveryError::Address(_))));
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces_as_transport_error() {
        struct FailingMailer;

        #[async_trait]
        impl Mailer for FailingMailer {
            async fn send(&self, _email: Message) -> Result<(), EmailDeliveryError> {
                Err(EmailDeliveryError::Transport("connection refused".into()))
            }
        }

        let sender =
            SmtpEmailSender::new_with_mailer(Box::new(FailingMailer), "noreply@replex.ai");

        let result = sender
            .send_email("user@example.com", "Hello", "<p>Hi</p>")
            .await;

        assert!(matches!(result, Err(EmailDeliveryError::Transport(_))));
    }
}
