//! Order lifecycle: creation, lookup, listing and partial updates

use crate::core::error::{OrderError, OrderResult, StorageError};
use crate::core::order::{NewOrder, Order, OrderPatch, OrderUpdate};
use crate::core::pricing;
use crate::core::query::{OrderQuery, PaginatedResponse, PaginationMeta};
use crate::core::store::OrderStore;
use chrono::{FixedOffset, Utc};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Service orchestrating every order mutation and query
///
/// It is the only component allowed to write to the [`OrderStore`]. All
/// validation happens before the store is touched, so a failed request never
/// leaves a partial write behind.
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    offset: FixedOffset,
}

impl OrderService {
    /// Create a service over `store`, interpreting filter dates at `offset`
    pub fn new(store: Arc<dyn OrderStore>, offset: FixedOffset) -> Self {
        Self { store, offset }
    }

    /// Validate, price and persist a new order
    pub async fn create(&self, request: NewOrder) -> OrderResult<Order> {
        request.validate()?;
        let (items, total_price) = pricing::price_items(&request.items)?;

        let order = Order::new(
            request.customer_name,
            request.customer_email,
            items,
            total_price,
        );
        let order = self
            .store
            .insert(order)
            .await
            .map_err(|e| StorageError::query("insert", e))?;

        tracing::info!(order_id = %order.id, total_price = order.total_price, "Order created");
        Ok(order)
    }

    /// Get an order by ID
    pub async fn get(&self, id: &Uuid) -> OrderResult<Order> {
        self.store
            .get(id)
            .await
            .map_err(|e| StorageError::query("get", e))?
            .ok_or_else(|| OrderError::not_found(id))
    }

    /// List orders matching the query, newest first
    ///
    /// The page and the total count are read concurrently; both see the same
    /// filter but not necessarily the same snapshot.
    pub async fn list(&self, query: OrderQuery) -> OrderResult<PaginatedResponse<Order>> {
        let (filter, page) = query.into_parts(self.offset)?;

        let (data, total_count) = tokio::try_join!(
            self.store.find(&filter, page.skip(), page.limit()),
            self.store.count(&filter),
        )
        .map_err(|e| StorageError::query("list", e))?;

        Ok(PaginatedResponse {
            data,
            meta: PaginationMeta::new(page, total_count),
        })
    }

    /// Apply a partial update
    ///
    /// Absent fields are left untouched. Item patches are merged by position
    /// against the existing items and the total is recomputed. When nothing
    /// is staged the existing order is returned as-is, without touching
    /// `updated_at`.
    pub async fn update(&self, id: &Uuid, patch: OrderPatch) -> OrderResult<Order> {
        patch.validate()?;
        let existing = self.get(id).await?;

        let Some(update) = Self::build_update(&existing, patch)? else {
            tracing::debug!(order_id = %id, "Empty update, order unchanged");
            return Ok(existing);
        };

        let updated = self
            .store
            .update(id, update)
            .await
            .map_err(|e| StorageError::query("update", e))?
            .ok_or_else(|| OrderError::not_found(id))?;

        tracing::info!(order_id = %id, total_price = updated.total_price, "Order updated");
        Ok(updated)
    }

    /// Stage the validated update set, or `None` when the patch changes nothing
    fn build_update(existing: &Order, patch: OrderPatch) -> OrderResult<Option<OrderUpdate>> {
        let items = match patch.items {
            Some(patches) => {
                let merged = pricing::merge_items(&existing.items, &patches)?;
                let total = pricing::compute_total(&merged);
                pricing::validate_total(total)?;
                Some((merged, total))
            }
            None => None,
        };

        if patch.customer_name.is_none() && patch.customer_email.is_none() && items.is_none() {
            return Ok(None);
        }

        Ok(Some(OrderUpdate {
            customer_name: patch.customer_name,
            customer_email: patch.customer_email,
            items,
            updated_at: Utc::now(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::order::{Item, ItemPatch};
    use crate::storage::InMemoryOrderStore;

    fn service() -> (OrderService, InMemoryOrderStore) {
        let store = InMemoryOrderStore::new();
        let service = OrderService::new(Arc::new(store.clone()), FixedOffset::east_opt(0).unwrap());
        (service, store)
    }

    fn new_order(items: Vec<Item>) -> NewOrder {
        NewOrder {
            customer_name: "John Doe".to_string(),
            customer_email: "john.doe@example.com".to_string(),
            items: items.iter().map(ItemPatch::from).collect(),
        }
    }

    #[tokio::test]
    async fn test_create_persists_computed_total() {
        let (service, store) = service();
        let order = service
            .create(new_order(vec![
                Item::new("Pizza", 15.0, 2),
                Item::new("Soda", 2.5, 2),
            ]))
            .await
            .unwrap();

        assert_eq!(order.total_price, 35.0);
        assert!(order.updated_at.is_none());

        let stored = store.get(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.total_price, 35.0);
    }

    #[tokio::test]
    async fn test_create_zero_total_is_invalid_pricing() {
        let (service, store) = service();
        let err = service
            .create(new_order(vec![Item::new("Water", 0.0, 1)]))
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::InvalidPricing { .. }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_bad_item_before_writing() {
        let (service, store) = service();
        let err = service
            .create(new_order(vec![
                Item::new("Pizza", 15.0, 2),
                Item::new("", 3.0, 1),
            ]))
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::InvalidItem { position: 1, .. }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_email() {
        let (service, _) = service();
        let mut request = new_order(vec![Item::new("Pizza", 15.0, 2)]);
        request.customer_email = "nope".to_string();

        let err = service.create(request).await.unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_name_only_keeps_items_and_bumps_timestamp() {
        let (service, _) = service();
        let order = service
            .create(new_order(vec![Item::new("Pizza", 15.0, 2)]))
            .await
            .unwrap();

        let updated = service
            .update(
                &order.id,
                OrderPatch {
                    customer_name: Some("Jane Doe".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.customer_name, "Jane Doe");
        assert_eq!(updated.items, order.items);
        assert_eq!(updated.total_price, 30.0);
        assert_eq!(updated.created_at, order.created_at);
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_update_merges_item_price() {
        let (service, _) = service();
        let order = service
            .create(new_order(vec![Item::new("Pizza", 15.0, 2)]))
            .await
            .unwrap();

        let updated = service
            .update(
                &order.id,
                OrderPatch {
                    items: Some(vec![ItemPatch::default().with_price(20.0)]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.items, vec![Item::new("Pizza", 20.0, 2)]);
        assert_eq!(updated.total_price, 40.0);
    }

    #[tokio::test]
    async fn test_empty_patch_is_a_noop() {
        let (service, _) = service();
        let order = service
            .create(new_order(vec![Item::new("Pizza", 15.0, 2)]))
            .await
            .unwrap();

        let same = service.update(&order.id, OrderPatch::default()).await.unwrap();
        assert_eq!(same, order);
        assert!(same.updated_at.is_none());
    }

    #[tokio::test]
    async fn test_update_failure_leaves_order_untouched() {
        let (service, store) = service();
        let order = service
            .create(new_order(vec![Item::new("Pizza", 15.0, 2)]))
            .await
            .unwrap();

        let err = service
            .update(
                &order.id,
                OrderPatch {
                    customer_name: Some("Jane Doe".to_string()),
                    items: Some(vec![ItemPatch::default().with_price(0.0)]),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::InvalidPricing { .. }));
        assert_eq!(store.get(&order.id).await.unwrap().unwrap(), order);
    }

    #[tokio::test]
    async fn test_update_unknown_order_is_not_found() {
        let (service, store) = service();
        let err = service
            .update(
                &Uuid::new_v4(),
                OrderPatch {
                    customer_name: Some("Nobody".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::NotFound { .. }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_list_pages_over_filtered_orders() {
        let (service, _) = service();
        for _ in 0..25 {
            service
                .create(new_order(vec![Item::new("Pizza", 10.0, 1)]))
                .await
                .unwrap();
        }

        let page = service
            .list(OrderQuery {
                page: Some(3),
                limit: Some(10),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.data.len(), 5);
        assert_eq!(page.meta.total_count, 25);
        assert_eq!(page.meta.total_pages, 3);
        assert!(page.meta.has_previous_page);
        assert!(!page.meta.has_next_page);
    }
}
