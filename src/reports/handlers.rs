//! HTTP handlers for reports

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use super::aggregator::DailySalesReport;
use super::service::SalesReportService;
use crate::core::error::OrderError;

/// State shared by the report handlers
#[derive(Clone)]
pub struct ReportState {
    pub service: SalesReportService,
}

/// Query string of the daily sales endpoint
#[derive(Debug, Default, Deserialize)]
pub struct DailySalesQuery {
    /// Day in `YYYY-MM-DD` format
    pub date: Option<String>,
}

/// Generate the daily sales report
///
/// GET /reports/daily-sales?date=2025-01-01
pub async fn daily_sales_report(
    State(state): State<ReportState>,
    Query(query): Query<DailySalesQuery>,
) -> Result<Json<DailySalesReport>, OrderError> {
    let date = query
        .date
        .filter(|date| !date.is_empty())
        .ok_or_else(|| OrderError::invalid_date("", "Date is required"))?;

    let report = state.service.daily_report(&date).await?;
    Ok(Json(report))
}
