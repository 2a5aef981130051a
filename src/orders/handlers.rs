//! HTTP handlers for order operations
//!
//! Handlers only translate between HTTP and [`OrderService`]; every rule lives
//! in the service.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use uuid::Uuid;

use crate::core::error::{OrderError, OrderResult};
use crate::core::extractor::JsonBody;
use crate::core::order::{NewOrder, Order, OrderPatch};
use crate::core::query::{OrderQuery, PaginatedResponse};
use crate::core::service::OrderService;

/// State shared by the order handlers
#[derive(Clone)]
pub struct OrderState {
    pub service: OrderService,
}

/// Parse an order id from the path
///
/// An id that is not a UUID cannot name an existing order, so it is reported
/// as not found rather than as a malformed request.
fn parse_order_id(raw: &str) -> OrderResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| OrderError::not_found(raw))
}

/// Create an order
///
/// POST /orders
pub async fn create_order(
    State(state): State<OrderState>,
    JsonBody(request): JsonBody<NewOrder>,
) -> Result<(StatusCode, Json<Order>), OrderError> {
    let order = state.service.create(request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// List orders with pagination and filters
///
/// GET /orders?page=1&limit=10&startDate=2025-01-01&endDate=2025-01-31&customerName=doe
pub async fn list_orders(
    State(state): State<OrderState>,
    query: Result<Query<OrderQuery>, QueryRejection>,
) -> Result<Json<PaginatedResponse<Order>>, OrderError> {
    let Query(query) = query.map_err(|e| OrderError::invalid_filter("query", e.body_text()))?;
    let page = state.service.list(query).await?;
    Ok(Json(page))
}

/// Get an order by ID
///
/// GET /orders/{id}
pub async fn get_order(
    State(state): State<OrderState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, OrderError> {
    let id = parse_order_id(&id)?;
    let order = state.service.get(&id).await?;
    Ok(Json(order))
}

/// Partially update an order
///
/// PUT /orders/{id}
///
/// Only the provided fields change. The total price is recomputed whenever
/// `items` is present.
pub async fn update_order(
    State(state): State<OrderState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<OrderPatch>,
) -> Result<Json<Order>, OrderError> {
    let id = parse_order_id(&id)?;
    let order = state.service.update(&id, patch).await?;
    Ok(Json(order))
}
