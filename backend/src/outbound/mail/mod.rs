//! Mail transport that records messages as structured log events.
//!
//! No SMTP transport is wired in; every message becomes an `info` event on the
//! `fastfeet::mail` target so deployments can ship it through their log
//! pipeline.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{MailDeliveryError, Mailer, OutgoingMail};

/// [`Mailer`] that emits each message as a `tracing` event.
#[derive(Debug, Clone, Default)]
pub struct LogMailer {
    from: Option<String>,
}

impl LogMailer {
    /// Create a mailer stamping `from` on every message.
    pub fn new(from: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
        }
    }

    /// Sender address recorded on each event.
    pub fn from_address(&self) -> &str {
        self.from.as_deref().unwrap_or("noreply@fastfeet.com")
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailDeliveryError> {
        info!(
            target: "fastfeet::mail",
            from = self.from_address(),
            to = %mail.to,
            to_name = %mail.to_name,
            subject = %mail.subject,
            body = %mail.body,
            "mail sent"
        );
        Ok(())
    }
}
