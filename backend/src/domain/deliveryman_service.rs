//! Courier management use cases.

use std::sync::Arc;

use pagination::{ListQuery, PageSize};
use tracing::info;

use crate::domain::ports::DeliverymanRepository;
use crate::domain::service_support::{list_filter, map_persistence_error, page_size};
use crate::domain::{Deliveryman, DeliverymanChanges, DeliverymanId, Error, NewDeliveryman};

const STORE: &str = "deliveryman";

/// CRUD over [`DeliverymanRepository`].
#[derive(Clone)]
pub struct DeliverymanService {
    deliverymen: Arc<dyn DeliverymanRepository>,
}

impl DeliverymanService {
    /// Rows per list page.
    pub const PAGE_SIZE: PageSize = page_size(10);

    /// Create a service over the given repository.
    pub fn new(deliverymen: Arc<dyn DeliverymanRepository>) -> Self {
        Self { deliverymen }
    }

    fn not_found() -> Error {
        Error::not_found("deliveryman not found")
    }

    /// Page of couriers whose name contains the query text.
    pub async fn list(&self, query: &ListQuery) -> Result<Vec<Deliveryman>, Error> {
        self.deliverymen
            .list(&list_filter(query, Self::PAGE_SIZE))
            .await
            .map_err(map_persistence_error(STORE))
    }

    pub async fn show(&self, id: DeliverymanId) -> Result<Deliveryman, Error> {
        self.deliverymen
            .find_by_id(id)
            .await
            .map_err(map_persistence_error(STORE))?
            .ok_or_else(Self::not_found)
    }

    pub async fn create(&self, deliveryman: NewDeliveryman) -> Result<Deliveryman, Error> {
        let created = self
            .deliverymen
            .insert(&deliveryman)
            .await
            .map_err(map_persistence_error(STORE))?;
        info!(deliveryman_id = %created.id, "deliveryman created");
        Ok(created)
    }

    pub async fn update(
        &self,
        id: DeliverymanId,
        changes: DeliverymanChanges,
    ) -> Result<Deliveryman, Error> {
        self.deliverymen
            .update(id, &changes)
            .await
            .map_err(map_persistence_error(STORE))?
            .ok_or_else(Self::not_found)
    }

    pub async fn delete(&self, id: DeliverymanId) -> Result<(), Error> {
        let deleted = self
            .deliverymen
            .delete(id)
            .await
            .map_err(map_persistence_error(STORE))?;
        if !deleted {
            return Err(Self::not_found());
        }
        info!(deliveryman_id = %id, "deliveryman deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockDeliverymanRepository;
    use crate::domain::{Email, ErrorCode};

    fn courier() -> Deliveryman {
        Deliveryman {
            id: DeliverymanId::new(4),
            name: "Bruno".into(),
            email: Email::parse("bruno@fastfeet.com").expect("valid email"),
            avatar_id: None,
        }
    }

    #[tokio::test]
    async fn list_uses_ten_row_pages() {
        let mut repo = MockDeliverymanRepository::new();
        repo.expect_list()
            .withf(|filter| filter.page.offset() == 10 && filter.page.limit() == 10)
            .return_once(|_| Ok(vec![courier()]));
        let query = ListQuery {
            q: None,
            page: Some(2),
        };

        let rows = DeliverymanService::new(Arc::new(repo))
            .list(&query)
            .await
            .expect("list");
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn update_missing_courier_is_not_found() {
        let mut repo = MockDeliverymanRepository::new();
        repo.expect_update().return_once(|_, _| Ok(None));

        let err = DeliverymanService::new(Arc::new(repo))
            .update(DeliverymanId::new(4), DeliverymanChanges::default())
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "deliveryman not found");
    }
}
