//! Route tables for the order and report endpoints

use crate::orders::handlers::{OrderState, create_order, get_order, list_orders, update_order};
use crate::reports::handlers::{ReportState, daily_sales_report};
use axum::{Router, routing::get};

/// Build order routes
///
/// - POST /orders - Create an order
/// - GET /orders - List orders (paginated, filtered)
/// - GET /orders/{id} - Get an order
/// - PUT /orders/{id} - Partially update an order
pub fn build_order_routes(state: OrderState) -> Router {
    Router::new()
        .route("/orders", axum::routing::post(create_order).get(list_orders))
        .route("/orders/{id}", get(get_order).put(update_order))
        .with_state(state)
}

/// Build report routes
///
/// - GET /reports/daily-sales?date=YYYY-MM-DD - Daily sales report
pub fn build_report_routes(state: ReportState) -> Router {
    Router::new()
        .route("/reports/daily-sales", get(daily_sales_report))
        .with_state(state)
}
