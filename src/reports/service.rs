//! Daily sales reports with caching
//!
//! Cache-aware report service. It:
//!
//! - Checks the cache before scanning the store
//! - Populates the cache after a successful aggregation
//! - Treats every cache error or slow cache call as a miss
//! - Only fails when the store itself fails
//!
//! Cached reports are not invalidated by new orders; see [`REPORT_CACHE_TTL`].

use super::aggregator::{self, DailySalesReport};
use super::cache::{CacheError, REPORT_CACHE_TTL, ReportCache};
use crate::core::calendar::{self, DayWindow};
use crate::core::error::{OrderError, OrderResult};
use crate::core::store::OrderStore;
use chrono::{FixedOffset, Offset, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Default upper bound on a single cache call
pub const DEFAULT_CACHE_TIMEOUT: Duration = Duration::from_millis(250);

/// Report service with response caching
///
/// ## Example
///
/// ```ignore
/// let service = SalesReportService::new(store, Arc::new(MokaReportCache::new(1_000)));
///
/// // First call: cache miss -> store scan -> cache populated
/// let report = service.daily_report("2025-01-01").await?;
///
/// // Within the TTL: cache hit
/// let report = service.daily_report("2025-01-01").await?;
/// ```
#[derive(Clone)]
pub struct SalesReportService {
    store: Arc<dyn OrderStore>,
    cache: Arc<dyn ReportCache>,
    offset: FixedOffset,
    cache_timeout: Duration,
}

impl std::fmt::Debug for SalesReportService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesReportService")
            .field("cache_provider", &self.cache.provider_name())
            .field("offset", &self.offset)
            .field("cache_timeout", &self.cache_timeout)
            .finish()
    }
}

impl SalesReportService {
    /// Create a report service computing days in UTC
    pub fn new(store: Arc<dyn OrderStore>, cache: Arc<dyn ReportCache>) -> Self {
        Self {
            store,
            cache,
            offset: Utc.fix(),
            cache_timeout: DEFAULT_CACHE_TIMEOUT,
        }
    }

    /// Use `offset` as the canonical timezone for day boundaries and "today"
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Bound every cache call to `timeout`
    pub fn with_cache_timeout(mut self, timeout: Duration) -> Self {
        self.cache_timeout = timeout;
        self
    }

    /// Get the cache provider name (for diagnostics)
    pub fn cache_provider_name(&self) -> &'static str {
        self.cache.provider_name()
    }

    /// Revenue, order count and top items for the calendar day `date`
    ///
    /// Uses cache-aside:
    /// 1. Validate the date
    /// 2. Check the cache
    /// 3. On miss, scan the day's orders and aggregate them
    /// 4. Populate the cache (best-effort)
    pub async fn daily_report(&self, date: &str) -> OrderResult<DailySalesReport> {
        let day = aggregator::parse_report_date(date, calendar::today(self.offset))?;

        if let Some(cached) = self.try_cache_get(date).await {
            debug!(date = date, "Daily sales report cache HIT");
            return Ok(cached);
        }

        debug!(date = date, "Daily sales report cache MISS, scanning orders");

        let window = DayWindow::for_date(day, self.offset);
        let orders = self.store.scan_created_between(&window).await.map_err(|e| {
            error!(date = date, error = %e, "Error generating sales report");
            OrderError::Internal("Failed to generate sales report".to_string())
        })?;

        let report = aggregator::aggregate(date, &orders);

        self.try_cache_put(date, &report).await;

        Ok(report)
    }

    // =========================================================================
    // Best-effort cache operations
    // =========================================================================

    /// Try to get a report from cache (returns None on miss, error or timeout)
    async fn try_cache_get(&self, date: &str) -> Option<DailySalesReport> {
        let result = tokio::time::timeout(self.cache_timeout, self.cache.get(date))
            .await
            .unwrap_or(Err(CacheError::Timeout(self.cache_timeout)));

        match result {
            Ok(cached) => cached,
            Err(e) => {
                warn!(date = date, error = %e, "Report cache get failed, treating as miss");
                None
            }
        }
    }

    /// Try to store a report in cache (best-effort, never fails)
    async fn try_cache_put(&self, date: &str, report: &DailySalesReport) {
        let result = tokio::time::timeout(
            self.cache_timeout,
            self.cache.put(date, report, REPORT_CACHE_TTL),
        )
        .await
        .unwrap_or(Err(CacheError::Timeout(self.cache_timeout)));

        match result {
            Ok(()) => debug!(
                date = date,
                ttl_secs = REPORT_CACHE_TTL.as_secs(),
                "Report cache populated"
            ),
            Err(e) => warn!(date = date, error = %e, "Report cache set failed (best-effort)"),
        }
    }
}
