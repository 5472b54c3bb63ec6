//! Tests for the delivery service.

use std::sync::Arc;

use chrono::TimeZone;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    MockDeliveryRepository, MockDeliverymanRepository, MockRecipientRepository,
};
use crate::domain::{Deliveryman, Email, ErrorCode, Recipient};

#[fixture]
fn delivery() -> Delivery {
    Delivery {
        id: DeliveryId::new(10),
        product: "Rocket stove".into(),
        recipient_id: RecipientId::new(1),
        deliveryman_id: DeliverymanId::new(2),
        signature_id: None,
        start_date: None,
        end_date: None,
        canceled_at: None,
    }
}

fn recipient() -> Recipient {
    Recipient {
        id: RecipientId::new(1),
        name: "Carla".into(),
        street: "Rua A".into(),
        number: 12,
        complement: None,
        state: "SP".into(),
        city: "Campinas".into(),
        cep: "13000-000".into(),
    }
}

fn courier(id: i32) -> Deliveryman {
    Deliveryman {
        id: DeliverymanId::new(id),
        name: "Bruno".into(),
        email: Email::parse("bruno@fastfeet.com").expect("valid email"),
        avatar_id: None,
    }
}

fn close_request() -> CloseDeliveryRequest {
    CloseDeliveryRequest {
        end_date: Utc
            .with_ymd_and_hms(2024, 5, 2, 15, 30, 0)
            .single()
            .expect("valid timestamp"),
        signature_id: 77,
    }
}

struct Repos {
    deliveries: MockDeliveryRepository,
    recipients: MockRecipientRepository,
    deliverymen: MockDeliverymanRepository,
}

impl Repos {
    fn new() -> Self {
        Self {
            deliveries: MockDeliveryRepository::new(),
            recipients: MockRecipientRepository::new(),
            deliverymen: MockDeliverymanRepository::new(),
        }
    }

    fn service(self) -> DeliveryService {
        DeliveryService::new(
            Arc::new(self.deliveries),
            Arc::new(self.recipients),
            Arc::new(self.deliverymen),
        )
    }
}

#[rstest]
#[tokio::test]
async fn create_checks_recipient_before_deliveryman() {
    let mut repos = Repos::new();
    repos.recipients.expect_find_by_id().return_once(|_| Ok(None));
    repos.deliverymen.expect_find_by_id().never();
    repos.deliveries.expect_insert().never();

    let err = repos
        .service()
        .create(NewDelivery {
            product: "Lamp".into(),
            recipient_id: RecipientId::new(1),
            deliveryman_id: DeliverymanId::new(2),
        })
        .await
        .expect_err("missing recipient");
    assert_eq!(err.message(), "recipient not found");
}

#[rstest]
#[tokio::test]
async fn create_rejects_missing_deliveryman() {
    let mut repos = Repos::new();
    repos
        .recipients
        .expect_find_by_id()
        .return_once(|_| Ok(Some(recipient())));
    repos.deliverymen.expect_find_by_id().return_once(|_| Ok(None));
    repos.deliveries.expect_insert().never();

    let err = repos
        .service()
        .create(NewDelivery {
            product: "Lamp".into(),
            recipient_id: RecipientId::new(1),
            deliveryman_id: DeliverymanId::new(2),
        })
        .await
        .expect_err("missing courier");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "deliveryman not found");
}

#[rstest]
#[tokio::test]
async fn close_records_end_date_and_signature(delivery: Delivery) {
    let expected = close_request();
    let closed = Delivery {
        end_date: Some(expected.end_date),
        signature_id: Some(expected.signature_id),
        ..delivery.clone()
    };
    let mut repos = Repos::new();
    repos
        .deliverymen
        .expect_find_by_id()
        .return_once(|_| Ok(Some(courier(2))));
    repos
        .deliveries
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(delivery)));
    repos
        .deliveries
        .expect_update()
        .withf(move |_, changes| {
            changes.end_date == Some(expected.end_date) && changes.signature_id == Some(77)
        })
        .times(1)
        .return_once(move |_, _| Ok(Some(closed)));

    let result = repos
        .service()
        .close(DeliverymanId::new(2), DeliveryId::new(10), expected)
        .await
        .expect("closed");
    assert_eq!(result.signature_id, Some(77));
}

#[rstest]
#[tokio::test]
async fn close_hides_deliveries_of_other_couriers(delivery: Delivery) {
    let mut repos = Repos::new();
    repos
        .deliverymen
        .expect_find_by_id()
        .return_once(|_| Ok(Some(courier(3))));
    repos
        .deliveries
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(delivery)));
    repos.deliveries.expect_update().never();

    let err = repos
        .service()
        .close(DeliverymanId::new(3), DeliveryId::new(10), close_request())
        .await
        .expect_err("foreign delivery");
    assert_eq!(err.message(), "delivery not found");
}

#[rstest]
#[case(None)]
#[case(Some(Utc::now()))]
#[tokio::test]
async fn close_rejects_cancelled_delivery(
    mut delivery: Delivery,
    #[case] end_date: Option<DateTime<Utc>>,
) {
    delivery.canceled_at = Some(Utc::now());
    delivery.end_date = end_date;
    let mut repos = Repos::new();
    repos
        .deliverymen
        .expect_find_by_id()
        .return_once(|_| Ok(Some(courier(2))));
    repos
        .deliveries
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(delivery)));
    repos.deliveries.expect_update().never();

    let err = repos
        .service()
        .close(DeliverymanId::new(2), DeliveryId::new(10), close_request())
        .await
        .expect_err("cancelled");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "delivery canceled");
}

#[rstest]
#[tokio::test]
async fn update_checks_new_recipient(delivery: Delivery) {
    let mut repos = Repos::new();
    repos
        .deliveries
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(delivery)));
    repos.recipients.expect_find_by_id().return_once(|_| Ok(None));
    repos.deliveries.expect_update().never();

    let err = repos
        .service()
        .update(
            DeliveryId::new(10),
            DeliveryChanges {
                recipient_id: Some(RecipientId::new(99)),
                ..DeliveryChanges::default()
            },
        )
        .await
        .expect_err("missing recipient");
    assert_eq!(err.message(), "recipient not found");
}
