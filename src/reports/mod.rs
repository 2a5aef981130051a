//! Daily sales reporting
//!
//! - [`aggregator`]: date parsing and the one-pass aggregation
//! - [`cache`]: report cache trait and providers
//! - `redis_cache`: shared Redis provider (`redis-cache` feature)
//! - [`service`]: cache-aside orchestration
//! - [`handlers`]: HTTP endpoints

pub mod aggregator;
pub mod cache;
pub mod handlers;
#[cfg(feature = "redis-cache")]
pub mod redis_cache;
pub mod service;

pub use aggregator::{DailySalesReport, TopSellingItem};
pub use cache::{MokaReportCache, NoopReportCache, REPORT_CACHE_TTL, ReportCache};
#[cfg(feature = "redis-cache")]
pub use redis_cache::RedisReportCache;
pub use service::SalesReportService;
