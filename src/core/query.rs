//! Query parameters, filters and pagination utilities

use crate::core::calendar::DayWindow;
use crate::core::error::{OrderError, OrderResult};
use crate::core::order::Order;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Default page number when none is given
pub const DEFAULT_PAGE: usize = 1;

/// Default page size when none is given
pub const DEFAULT_LIMIT: usize = 10;

/// Largest page size a caller may request
pub const MAX_LIMIT: usize = 100;

/// Query parameters for listing orders
///
/// Extracted from the URL query string. Every parameter is optional.
///
/// # Example
/// ```text
/// GET /orders?page=2&limit=10
/// GET /orders?startDate=2025-01-01&endDate=2025-01-31
/// GET /orders?customerName=doe
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    /// Page number (starts at 1)
    pub page: Option<usize>,

    /// Number of orders per page, 1 to 100
    pub limit: Option<usize>,

    /// Inclusive lower bound on `createdAt` (`YYYY-MM-DD` or RFC 3339)
    pub start_date: Option<String>,

    /// Inclusive upper bound on `createdAt`, extended to the end of that day
    pub end_date: Option<String>,

    /// Case-insensitive substring of the customer name
    pub customer_name: Option<String>,
}

impl OrderQuery {
    /// Split into a parsed filter and a validated page request
    pub fn into_parts(self, offset: FixedOffset) -> OrderResult<(OrderFilter, PageRequest)> {
        let page = PageRequest::new(
            self.page.unwrap_or(DEFAULT_PAGE),
            self.limit.unwrap_or(DEFAULT_LIMIT),
        )?;

        let created_from = self
            .start_date
            .as_deref()
            .map(|raw| parse_bound("startDate", raw, offset).map(|w| w.start))
            .transpose()?;
        let created_to = self
            .end_date
            .as_deref()
            .map(|raw| parse_bound("endDate", raw, offset).map(|w| w.end))
            .transpose()?;

        let filter = OrderFilter {
            created_from,
            created_to,
            customer_name: self.customer_name.filter(|name| !name.is_empty()),
        };

        Ok((filter, page))
    }
}

/// Resolve a date bound to the window of its calendar day
///
/// A bare date covers the whole day. A full timestamp starts at that exact
/// instant for lower bounds, while upper bounds are stretched to the end of
/// its day.
fn parse_bound(field: &str, raw: &str, offset: FixedOffset) -> OrderResult<DayWindow> {
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(DayWindow::for_date(day, offset));
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(instant) => {
            let instant = instant.with_timezone(&Utc);
            let day = DayWindow::containing(instant, offset);
            Ok(DayWindow {
                start: instant,
                end: day.end,
            })
        }
        Err(_) => Err(OrderError::invalid_filter(
            field,
            format!("'{}' is not a valid date (expected YYYY-MM-DD)", raw),
        )),
    }
}

/// Predicates applied to the order collection
///
/// All present predicates are ANDed. Absent predicates match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub customer_name: Option<String>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        self.created_from.is_none_or(|from| order.created_at >= from)
            && self.created_to.is_none_or(|to| order.created_at <= to)
            && self.customer_name.as_deref().is_none_or(|needle| {
                order
                    .customer_name
                    .to_lowercase()
                    .contains(&needle.to_lowercase())
            })
    }
}

/// A validated page/limit pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    limit: usize,
}

impl PageRequest {
    pub fn new(page: usize, limit: usize) -> OrderResult<Self> {
        if page < 1 {
            return Err(OrderError::invalid_filter("page", "must be at least 1"));
        }
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(OrderError::invalid_filter(
                "limit",
                format!("must be between 1 and {}", MAX_LIMIT),
            ));
        }
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of matching orders before this page
    pub fn skip(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Paginated response structure
///
/// This structure wraps paginated data with metadata about pagination state.
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// The paginated data
    pub data: Vec<T>,

    /// Pagination metadata
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters)
    pub total_count: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a previous page
    pub has_previous_page: bool,

    /// Whether there is a next page
    pub has_next_page: bool,
}

impl PaginationMeta {
    /// Create pagination metadata for `request` over `total_count` matches
    pub fn new(request: PageRequest, total_count: usize) -> Self {
        let total_pages = total_count.div_ceil(request.limit);

        Self {
            page: request.page,
            limit: request.limit,
            total_count,
            total_pages,
            has_previous_page: request.page > 1,
            has_next_page: request.page < total_pages,
        }
    }
}
