//! Daily sales aggregation
//!
//! Revenue, order count and the item tally are all computed in a single pass
//! over the orders created during the requested day.

use crate::core::error::{OrderError, OrderResult};
use crate::core::order::Order;
use chrono::NaiveDate;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Number of entries in `top_selling_items`
pub const TOP_SELLING_LIMIT: usize = 5;

/// Summary of one calendar day of orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySalesReport {
    /// The requested day, echoed verbatim
    pub date: String,
    pub total_revenue: f64,
    pub total_orders: usize,
    pub top_selling_items: Vec<TopSellingItem>,
}

impl DailySalesReport {
    /// Report for a day without any orders
    pub fn empty(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            total_revenue: 0.0,
            total_orders: 0,
            top_selling_items: Vec::new(),
        }
    }
}

/// Total quantity sold of one item name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopSellingItem {
    pub name: String,
    pub count: u64,
}

/// Parse a `YYYY-MM-DD` report date that is not after `today`
pub fn parse_report_date(date: &str, today: NaiveDate) -> OrderResult<NaiveDate> {
    static DATE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = DATE_REGEX.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("report date pattern is valid")
    });

    if !regex.is_match(date) {
        return Err(OrderError::invalid_date(
            date,
            "Date must be in YYYY-MM-DD format",
        ));
    }
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| OrderError::invalid_date(date, "Invalid date provided"))?;
    if day > today {
        return Err(OrderError::invalid_date(
            date,
            "Cannot generate report for future dates",
        ));
    }
    Ok(day)
}

/// Build the report for `date` from the orders created that day
///
/// `orders` are expected oldest first. Items with equal counts keep the order in
/// which their name was first seen.
pub fn aggregate(date: &str, orders: &[Order]) -> DailySalesReport {
    if orders.is_empty() {
        return DailySalesReport::empty(date);
    }

    let mut total_revenue = 0.0;
    let mut tally: IndexMap<&str, u64> = IndexMap::new();

    for order in orders {
        total_revenue += order.total_price;
        for item in &order.items {
            *tally.entry(item.name.as_str()).or_insert(0) += u64::from(item.quantity);
        }
    }

    let mut ranked: Vec<(&str, u64)> = tally.into_iter().collect();
    // Stable sort keeps first-seen order among ties
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    DailySalesReport {
        date: date.to_string(),
        total_revenue,
        total_orders: orders.len(),
        top_selling_items: ranked
            .into_iter()
            .take(TOP_SELLING_LIMIT)
            .map(|(name, count)| TopSellingItem {
                name: name.to_string(),
                count,
            })
            .collect(),
    }
}
