//! Port for the transport that actually sends mail.
use async_trait::async_trait;

use crate::domain::Email;

use super::define_port_error;

define_port_error! {
    /// Errors raised by mail transports.
    pub enum MailDeliveryError {
        /// The transport could not be reached.
        Transport { message: String } => "mail transport failed: {message}",
        /// The message was refused by the transport.
        Refused { message: String } => "mail was refused: {message}",
    }
}

/// A rendered message ready for sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    /// Display name of the recipient.
    pub to_name: String,
    /// Recipient address.
    pub to: Email,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one message.
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailDeliveryError>;
}
