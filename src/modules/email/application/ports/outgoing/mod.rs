pub mod auth_email_notifier;
pub mod email_sender;

pub use auth_email_notifier::{AuthEmailNotifier, EmailNotificationError};
pub use email_sender::{EmailDeliveryError, EmailSender};
