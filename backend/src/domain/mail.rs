//! Background mail jobs.

use serde::{Deserialize, Serialize};

use crate::domain::DeliverySnapshot;
use crate::domain::ports::OutgoingMail;

/// Notification sent to a courier when one of their deliveries is cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationMail {
    /// Delivery state after cancellation, with the courier's contact details.
    pub delivery: DeliverySnapshot,
}

/// A unit of work for the mail worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "key", content = "data")]
pub enum MailJob {
    /// See [`CancellationMail`].
    CancellationMail(CancellationMail),
}

impl CancellationMail {
    /// Render the message sent to the courier.
    pub fn render(&self) -> OutgoingMail {
        let delivery = &self.delivery.delivery;
        let courier = &self.delivery.deliveryman;
        let canceled_at = delivery
            .canceled_at
            .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "now".to_owned());
        let body = format!(
            "Hello {name},\n\n\
             Delivery #{id} ({product}) was canceled at {canceled_at}.\n\
             Please do not pick it up or attempt to deliver it.\n\n\
             FastFeet",
            name = courier.name,
            id = delivery.id,
            product = delivery.product,
        );
        OutgoingMail {
            to_name: courier.name.clone(),
            to: courier.email.clone(),
            subject: "Delivery canceled".to_owned(),
            body,
        }
    }
}

impl MailJob {
    /// Stable job key used by the queue and in logs.
    pub fn key(&self) -> &'static str {
        match self {
            Self::CancellationMail(_) => "CancellationMail",
        }
    }

    /// Render the message this job sends.
    pub fn render(&self) -> OutgoingMail {
        match self {
            Self::CancellationMail(mail) => mail.render(),
        }
    }
}

impl From<CancellationMail> for MailJob {
    fn from(value: CancellationMail) -> Self {
        Self::CancellationMail(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::domain::{
        Delivery, DeliveryId, DeliverymanContact, DeliverymanId, Email, RecipientId,
    };

    fn job() -> MailJob {
        MailJob::from(CancellationMail {
            delivery: DeliverySnapshot {
                delivery: Delivery {
                    id: DeliveryId::new(3),
                    product: "Rocket stove".into(),
                    recipient_id: RecipientId::new(1),
                    deliveryman_id: DeliverymanId::new(2),
                    signature_id: None,
                    start_date: None,
                    end_date: None,
                    canceled_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single(),
                },
                deliveryman: DeliverymanContact {
                    id: DeliverymanId::new(2),
                    name: "Bruno".into(),
                    email: Email::parse("bruno@fastfeet.com").expect("valid email"),
                },
            },
        })
    }

    #[test]
    fn cancellation_mail_is_addressed_to_the_courier() {
        let mail = job().render();
        assert_eq!(mail.to.as_ref(), "bruno@fastfeet.com");
        assert_eq!(mail.subject, "Delivery canceled");
        assert!(mail.body.contains("Delivery #3 (Rocket stove) was canceled at 2024-06-01 12:00 UTC"));
    }

    #[test]
    fn job_serialises_with_its_key() {
        let value = serde_json::to_value(job()).expect("serialise job");
        assert_eq!(value["key"], "CancellationMail");
        assert_eq!(value["data"]["delivery"]["product"], "Rocket stove");
        assert_eq!(value["data"]["delivery"]["deliveryman"]["name"], "Bruno");
    }
}
