//! Core module containing the order domain: types, rules, storage trait and service

pub mod calendar;
pub mod error;
pub mod extractor;
pub mod order;
pub mod pricing;
pub mod query;
pub mod service;
pub mod store;

pub use calendar::DayWindow;
pub use error::{ErrorResponse, OrderError, OrderResult, StorageError, ValidationError};
pub use extractor::JsonBody;
pub use order::{Item, ItemPatch, NewOrder, Order, OrderPatch, OrderUpdate};
pub use query::{OrderFilter, OrderQuery, PageRequest, PaginatedResponse, PaginationMeta};
pub use service::OrderService;
pub use store::OrderStore;
