//! # Bistro
//!
//! Order management backend for a small food business, exposed over REST.
//!
//! ## Features
//!
//! - **Orders**: create, read, paginated and filtered listing, partial update
//! - **Server-side pricing**: totals are always recomputed from the line items
//! - **Daily sales reports**: revenue, order count and top-selling items for
//!   one calendar day, cached for an hour
//! - **Pluggable storage**: services depend on the [`core::OrderStore`] trait
//! - **Configuration**: YAML file with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bistro::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::default().with_env_overrides()?;
//!
//!     ServerBuilder::new()
//!         .with_config(config)
//!         .with_order_store(InMemoryOrderStore::new())
//!         .serve()
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod orders;
pub mod reports;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        Item, ItemPatch, JsonBody, NewOrder, Order, OrderError, OrderPatch, OrderQuery,
        OrderResult, OrderService, OrderStore, PaginatedResponse, PaginationMeta,
    };

    // === Reports ===
    pub use crate::reports::{
        DailySalesReport, MokaReportCache, NoopReportCache, ReportCache, SalesReportService,
        TopSellingItem,
    };

    // === Storage ===
    pub use crate::storage::InMemoryOrderStore;

    // === Config ===
    pub use crate::config::AppConfig;

    // === Server ===
    pub use crate::server::{RestExposure, ServerBuilder, ServerHost};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
