pub mod email_service;
pub mod notification_queue;

pub use email_service::AuthEmailService;
pub use notification_queue::{NotificationQueue, NotificationQueueHandle};
