//! REST API exposure
//!
//! Consumes a `ServerHost` and produces an Axum `Router` with the health,
//! order and report endpoints plus the shared HTTP middleware.

use super::super::host::ServerHost;
use crate::orders::handlers::OrderState;
use crate::reports::handlers::ReportState;
use crate::server::router::{build_order_routes, build_report_routes};
use anyhow::Result;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// Custom routes are merged after the built-in ones and share the same
    /// middleware stack (request tracing and permissive CORS).
    pub fn build_router(host: Arc<ServerHost>, custom_routes: Vec<Router>) -> Result<Router> {
        let order_state = OrderState {
            service: host.orders.clone(),
        };
        let report_state = ReportState {
            service: host.reports.clone(),
        };

        let mut app = Self::health_routes()
            .merge(build_order_routes(order_state))
            .merge(build_report_routes(report_state));

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        let middleware = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive());

        tracing::debug!(
            cache_provider = host.cache_provider(),
            "REST router built"
        );

        Ok(app.layer(middleware))
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "bistro"
        }))
    }
}
