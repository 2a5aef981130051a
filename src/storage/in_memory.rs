//! In-memory implementation of OrderStore for testing and development

use crate::core::calendar::DayWindow;
use crate::core::order::{Order, OrderUpdate};
use crate::core::query::OrderFilter;
use crate::core::store::OrderStore;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

/// In-memory order store
///
/// Keeps orders in insertion order so that orders sharing a timestamp still
/// come back in a stable sequence. Uses RwLock for thread-safe access.
#[derive(Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<IndexMap<Uuid, Order>>>,
}

impl InMemoryOrderStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            orders: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Number of stored orders
    ///
    /// A poisoned lock still holds every committed order, so the count is read
    /// through it rather than reported as zero.
    pub fn len(&self) -> usize {
        self.orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: Order) -> Result<Order> {
        let mut orders = self
            .orders
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        orders.insert(order.id, order.clone());

        Ok(order)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Order>> {
        let orders = self
            .orders
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(orders.get(id).cloned())
    }

    async fn find(&self, filter: &OrderFilter, skip: usize, take: usize) -> Result<Vec<Order>> {
        let orders = self
            .orders
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        // Reverse insertion order first so equal timestamps list the latest insert first
        let mut matched: Vec<&Order> = orders
            .values()
            .rev()
            .filter(|order| filter.matches(order))
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matched
            .into_iter()
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &OrderFilter) -> Result<usize> {
        let orders = self
            .orders
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(orders.values().filter(|order| filter.matches(order)).count())
    }

    async fn update(&self, id: &Uuid, update: OrderUpdate) -> Result<Option<Order>> {
        let mut orders = self
            .orders
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let Some(order) = orders.get_mut(id) else {
            return Ok(None);
        };
        order.apply(update);

        Ok(Some(order.clone()))
    }

    async fn scan_created_between(&self, window: &DayWindow) -> Result<Vec<Order>> {
        let orders = self
            .orders
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut matched: Vec<Order> = orders
            .values()
            .filter(|order| window.contains(order.created_at))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::order::Item;
    use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

    fn order_at(name: &str, created_at: &str) -> Order {
        let mut order = Order::new(
            name.to_string(),
            format!("{}@example.com", name.to_lowercase()),
            vec![Item::new("Pizza", 12.0, 1)],
            12.0,
        );
        order.created_at = created_at.parse::<DateTime<Utc>>().unwrap();
        order
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = InMemoryOrderStore::new();
        let order = order_at("Ada", "2025-01-01T12:00:00Z");

        store.insert(order.clone()).await.unwrap();

        let retrieved = store.get(&order.id).await.unwrap();
        assert_eq!(retrieved, Some(order));
        assert!(store.get(&Uuid::new_v4()).await.unwrap().is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_find_sorts_newest_first_and_pages() {
        let store = InMemoryOrderStore::new();
        store.insert(order_at("Old", "2025-01-01T08:00:00Z")).await.unwrap();
        store.insert(order_at("New", "2025-01-03T08:00:00Z")).await.unwrap();
        store.insert(order_at("Mid", "2025-01-02T08:00:00Z")).await.unwrap();

        let all = store.find(&OrderFilter::default(), 0, 10).await.unwrap();
        let names: Vec<&str> = all.iter().map(|o| o.customer_name.as_str()).collect();
        assert_eq!(names, vec!["New", "Mid", "Old"]);

        let second = store.find(&OrderFilter::default(), 1, 1).await.unwrap();
        assert_eq!(second[0].customer_name, "Mid");

        let beyond = store.find(&OrderFilter::default(), 10, 10).await.unwrap();
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn test_count_uses_filter() {
        let store = InMemoryOrderStore::new();
        store.insert(order_at("John Doe", "2025-01-01T08:00:00Z")).await.unwrap();
        store.insert(order_at("Jane Doe", "2025-01-01T09:00:00Z")).await.unwrap();
        store.insert(order_at("Ada", "2025-01-01T10:00:00Z")).await.unwrap();

        let filter = OrderFilter {
            customer_name: Some("doe".to_string()),
            ..Default::default()
        };
        assert_eq!(store.count(&filter).await.unwrap(), 2);
        assert_eq!(store.count(&OrderFilter::default()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_update_missing_order_returns_none() {
        let store = InMemoryOrderStore::new();
        let update = OrderUpdate {
            customer_name: Some("Ghost".to_string()),
            customer_email: None,
            items: None,
            updated_at: Utc::now(),
        };
        assert!(store.update(&Uuid::new_v4(), update).await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_poisoned_lock_keeps_count_and_fails_writes() {
        let store = InMemoryOrderStore::new();
        store.insert(order_at("Ada", "2025-01-01T12:00:00Z")).await.unwrap();

        let orders = store.orders.clone();
        let poisoned = std::thread::spawn(move || {
            let _guard = orders.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(poisoned.is_err());

        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());

        let err = store
            .insert(order_at("Bob", "2025-01-01T13:00:00Z"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to acquire write lock"));
    }

    #[tokio::test]
    async fn test_scan_created_between_is_oldest_first() {
        let store = InMemoryOrderStore::new();
        store.insert(order_at("Late", "2025-01-01T23:59:59.999Z")).await.unwrap();
        store.insert(order_at("Early", "2025-01-01T00:00:00Z")).await.unwrap();
        store.insert(order_at("NextDay", "2025-01-02T00:00:00Z")).await.unwrap();

        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let window = DayWindow::for_date(day, FixedOffset::east_opt(0).unwrap());
        let orders = store.scan_created_between(&window).await.unwrap();

        let names: Vec<&str> = orders.iter().map(|o| o.customer_name.as_str()).collect();
        assert_eq!(names, vec!["Early", "Late"]);
    }
}
