//! Storage trait for orders
//!
//! The services never talk to a database directly. They only need an ordered,
//! filterable collection with single-document atomic writes, which is what
//! [`OrderStore`] describes.

use crate::core::calendar::DayWindow;
use crate::core::order::{Order, OrderUpdate};
use crate::core::query::OrderFilter;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Persistent order collection
///
/// Implementations must make `insert` and `update` atomic per order. There is no
/// cross-order locking: concurrent updates to the same order race and the last
/// write wins.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a new order
    async fn insert(&self, order: Order) -> Result<Order>;

    /// Get an order by ID
    async fn get(&self, id: &Uuid) -> Result<Option<Order>>;

    /// Orders matching `filter`, newest first, after skipping `skip` and keeping at most `take`
    async fn find(&self, filter: &OrderFilter, skip: usize, take: usize) -> Result<Vec<Order>>;

    /// Number of orders matching `filter`
    async fn count(&self, filter: &OrderFilter) -> Result<usize>;

    /// Apply an update set atomically
    ///
    /// Returns `Ok(None)` when the order no longer exists.
    async fn update(&self, id: &Uuid, update: OrderUpdate) -> Result<Option<Order>>;

    /// Every order created inside `window`, oldest first
    ///
    /// This is the aggregation primitive used by daily reports.
    async fn scan_created_between(&self, window: &DayWindow) -> Result<Vec<Order>>;
}
