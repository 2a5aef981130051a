//! Report cache providers
//!
//! Reports are cached per date string for a fixed time after they are written.
//! New orders do not invalidate an entry, so a report may lag behind the store
//! by up to [`REPORT_CACHE_TTL`].
//!
//! **Important**: [`MokaReportCache`] is NOT distributed. Each process keeps
//! its own entries. With the `redis-cache` feature, `RedisReportCache` shares
//! entries between instances.

use super::aggregator::DailySalesReport;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// How long a cached report stays valid after it is written
pub const REPORT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to reach the cache backend
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    /// Cache operation did not finish in time
    #[error("Cache operation timed out after {0:?}")]
    Timeout(Duration),

    /// Generic backend error
    #[error("Cache backend error: {0}")]
    BackendError(String),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Key under which the report for `date` is stored
pub fn cache_key(date: &str) -> String {
    format!("daily_sales_report_{date}")
}

/// Key-value store for computed daily reports
#[async_trait]
pub trait ReportCache: Send + Sync {
    /// Get the cached report for `date`
    ///
    /// Returns `Ok(Some(report))` on cache hit, `Ok(None)` on cache miss.
    async fn get(&self, date: &str) -> CacheResult<Option<DailySalesReport>>;

    /// Store `report` under `date` for `ttl`
    async fn put(&self, date: &str, report: &DailySalesReport, ttl: Duration) -> CacheResult<()>;

    /// Get the name of the cache provider
    fn provider_name(&self) -> &'static str;
}

/// Cached report together with the TTL it was written with
#[derive(Debug, Clone)]
struct CachedReport {
    report: DailySalesReport,
    ttl: Duration,
}

/// Expires each entry after the TTL passed to [`ReportCache::put`]
struct PerEntryTtl;

impl moka::Expiry<String, CachedReport> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedReport,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedReport,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-memory report cache using Moka
///
/// Every entry lives for the TTL it was written with; overwriting an entry
/// restarts its clock.
#[derive(Clone)]
pub struct MokaReportCache {
    cache: moka::future::Cache<String, CachedReport>,
}

impl std::fmt::Debug for MokaReportCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaReportCache")
            .field("max_capacity", &self.cache.policy().max_capacity())
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}

impl MokaReportCache {
    pub fn new(max_capacity: u64) -> Self {
        let cache = moka::future::Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        debug!(max_capacity = max_capacity, "Moka report cache created");

        Self { cache }
    }
}

#[async_trait]
impl ReportCache for MokaReportCache {
    async fn get(&self, date: &str) -> CacheResult<Option<DailySalesReport>> {
        let key = cache_key(date);
        let result = self.cache.get(&key).await.map(|cached| cached.report);

        if result.is_some() {
            debug!(key = %key, "Cache HIT (moka)");
        } else {
            debug!(key = %key, "Cache MISS (moka)");
        }

        Ok(result)
    }

    async fn put(&self, date: &str, report: &DailySalesReport, ttl: Duration) -> CacheResult<()> {
        let key = cache_key(date);
        let cached = CachedReport {
            report: report.clone(),
            ttl,
        };
        self.cache.insert(key.clone(), cached).await;

        debug!(key = %key, ttl_seconds = ttl.as_secs(), "Cache SET (moka)");
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "moka"
    }
}

/// Cache that never stores anything
///
/// Used when report caching is disabled: every lookup is a miss.
#[derive(Debug, Clone, Default)]
pub struct NoopReportCache;

#[async_trait]
impl ReportCache for NoopReportCache {
    async fn get(&self, _date: &str) -> CacheResult<Option<DailySalesReport>> {
        Ok(None)
    }

    async fn put(&self, _date: &str, _report: &DailySalesReport, _ttl: Duration) -> CacheResult<()> {
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "noop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_format() {
        assert_eq!(cache_key("2025-01-01"), "daily_sales_report_2025-01-01");
    }

    #[tokio::test]
    async fn test_moka_get_returns_none_on_miss() {
        let cache = MokaReportCache::new(100);
        assert_eq!(cache.get("2025-01-01").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_moka_put_and_get() {
        let cache = MokaReportCache::new(100);
        let report = DailySalesReport::empty("2025-01-01");

        cache
            .put("2025-01-01", &report, REPORT_CACHE_TTL)
            .await
            .unwrap();

        assert_eq!(cache.get("2025-01-01").await.unwrap(), Some(report));
        assert_eq!(cache.get("2025-01-02").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_moka_honours_ttl_per_entry() {
        let cache = MokaReportCache::new(100);
        let short = DailySalesReport::empty("2025-01-01");
        let long = DailySalesReport::empty("2025-01-02");

        cache
            .put("2025-01-01", &short, Duration::from_millis(50))
            .await
            .unwrap();
        cache.put("2025-01-02", &long, REPORT_CACHE_TTL).await.unwrap();
        assert!(cache.get("2025-01-01").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(100)).await;
        cache.cache.run_pending_tasks().await;

        assert!(cache.get("2025-01-01").await.unwrap().is_none());
        assert_eq!(cache.get("2025-01-02").await.unwrap(), Some(long));
    }

    #[tokio::test]
    async fn test_moka_overwrite_restarts_ttl() {
        let cache = MokaReportCache::new(100);
        let report = DailySalesReport::empty("2025-01-01");

        cache
            .put("2025-01-01", &report, Duration::from_millis(50))
            .await
            .unwrap();
        cache.put("2025-01-01", &report, REPORT_CACHE_TTL).await.unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        cache.cache.run_pending_tasks().await;

        assert_eq!(cache.get("2025-01-01").await.unwrap(), Some(report));
    }

    #[tokio::test]
    async fn test_noop_always_misses() {
        let cache = NoopReportCache;
        let report = DailySalesReport::empty("2025-01-01");

        cache.put("2025-01-01", &report, REPORT_CACHE_TTL).await.unwrap();
        assert!(cache.get("2025-01-01").await.unwrap().is_none());
        assert_eq!(cache.provider_name(), "noop");
    }

    #[tokio::test]
    async fn test_moka_debug_format() {
        let cache = MokaReportCache::new(100);
        let debug_str = format!("{:?}", cache);
        assert!(debug_str.contains("MokaReportCache"));
        assert!(debug_str.contains("max_capacity"));
    }
}
