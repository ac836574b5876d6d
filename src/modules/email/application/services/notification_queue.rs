use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::email::application::ports::outgoing::email_sender::{EmailDeliveryError, EmailSender};

const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct EmailJob {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Handle to the background delivery worker.
///
/// `try_send` never blocks the caller; when the channel is full the job is
/// rejected rather than stalling an HTTP request behind SMTP.
#[derive(Clone)]
pub struct NotificationQueueHandle {
    tx: mpsc::Sender<EmailJob>,
}

impl fmt::Debug for NotificationQueueHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationQueueHandle").finish()
    }
}

impl NotificationQueueHandle {
    pub fn try_send(&self, job: EmailJob) -> Result<(), EmailJob> {
        self.tx.try_send(job).map_err(|e| match e {
            mpsc::error::TrySendError::Full(job) => job,
            mpsc::error::TrySendError::Closed(job) => job,
        })
    }
}

pub struct NotificationQueue;

impl NotificationQueue {
    /// Spawn the delivery worker and return a handle for producers.
    ///
    /// Each job gets up to three delivery attempts with exponential backoff;
    /// a job that still fails is dropped and logged under the
    /// `email_dead_letter` target so operators can replay it by hand.
    pub fn start(sender: Arc<dyn EmailSender>, capacity: usize) -> NotificationQueueHandle {
        let (tx, mut rx) = mpsc::channel::<EmailJob>(capacity);

        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let mut attempt = 1;
                loop {
                    match sender.send_email(&job.to, &job.subject, &job.body).await {
                        Ok(()) => {
                            info!(to = %job.to, subject = %job.subject, "Email delivered");
                            break;
                        }
                        Err(e) if attempt < MAX_ATTEMPTS => {
                            let backoff = Duration::from_secs(1 << (attempt - 1));
                            warn!(
                                to = %job.to,
                                attempt,
                                error = %e,
                                "Email delivery failed, retrying"
                            );
                            tokio::time::sleep(backoff).await;
                            attempt += 1;
                        }
                        Err(e) => {
                            error!(
                                target: "email_dead_letter",
                                to = %job.to,
                                subject = %job.subject,
                                error = %e,
                                "Email delivery abandoned after {} attempts",
                                MAX_ATTEMPTS
                            );
                            break;
                        }
                    }
                }
            }
        });

        NotificationQueueHandle { tx }
    }
}
