use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::email::application::ports::outgoing::auth_email_notifier::{
    AuthEmailNotifier, EmailNotificationError,
};
use crate::email::application::ports::outgoing::email_sender::EmailSender;
use crate::email::application::services::notification_queue::{EmailJob, NotificationQueueHandle};

/// Renders and dispatches account-lifecycle mail.
///
/// Verification and welcome mail go through the background queue; the
/// password reset mail is sent inline because the forgot-password flow
/// reports its failure to the caller.
#[derive(Clone)]
pub struct AuthEmailService {
    sender: Arc<dyn EmailSender>,
    queue: NotificationQueueHandle,
    frontend_url: String,
}

impl fmt::Debug for AuthEmailService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthEmailService")
            .field("frontend_url", &self.frontend_url)
            .finish()
    }
}

impl AuthEmailService {
    pub fn new(
        sender: Arc<dyn EmailSender>,
        queue: NotificationQueueHandle,
        frontend_url: &str,
    ) -> Self {
        Self {
            sender,
            queue,
            frontend_url: frontend_url.trim_end_matches('/').to_string(),
        }
    }

    fn verification_body(&self, name: &str, token: &str) -> String {
        format!(
            "<p>Hi {name},</p>\
             <p>Please confirm your email address by clicking the link below:</p>\
             <p><a href=\"{base}/verify-email/{token}\">Verify your email</a></p>\
             <p>If you did not create an account, you can ignore this message.</p>",
            name = name,
            base = self.frontend_url,
            token = token,
        )
    }

    fn welcome_body(&self, name: &str) -> String {
        format!(
            "<p>Hi {name},</p>\
             <p>Your email address is confirmed and your account is ready to use.</p>\
             <p><a href=\"{base}/login\">Sign in</a></p>",
            name = name,
            base = self.frontend_url,
        )
    }

    fn reset_body(&self, name: &str, token: &str) -> String {
        format!(
            "<p>Hi {name},</p>\
             <p>We received a request to reset your password. The link below is valid for one hour:</p>\
             <p><a href=\"{base}/reset-password/{token}\">Reset your password</a></p>\
             <p>If you did not request this, your password is unchanged and you can ignore this message.</p>",
            name = name,
            base = self.frontend_url,
            token = token,
        )
    }
}

#[async_trait]
impl AuthEmailNotifier for AuthEmailService {
    async fn queue_verification_email(
        &self,
        to: &str,
        name: &str,
        token: &str,
    ) -> Result<(), EmailNotificationError> {
        self.queue
            .try_send(EmailJob {
                to: to.to_string(),
                subject: "Verify your email address".to_string(),
                body: self.verification_body(name, token),
            })
            .map_err(|_| EmailNotificationError::QueueFull)
    }

    async fn queue_welcome_email(
        &self,
        to: &str,
        name: &str,
    ) -> Result<(), EmailNotificationError> {
        self.queue
            .try_send(EmailJob {
                to: to.to_string(),
                subject: "Welcome aboard".to_string(),
                body: self.welcome_body(name),
            })
            .map_err(|_| EmailNotificationError::QueueFull)
    }

    async fn send_password_reset_email(
        &self,
        to: &str,
        name: &str,
        token: &str,
    ) -> Result<(), EmailNotificationError> {
        self.sender
            .send_email(to, "Reset your password", &self.reset_body(name, token))
            .await
            .map_err(|e| EmailNotificationError::SendFailed(e.to_string()))
    }
}
