//! Server host holding the application services
//!
//! The host is transport-agnostic: it owns the services and configuration,
//! and an exposure (REST today) turns it into a router.

use crate::config::AppConfig;
use crate::core::service::OrderService;
use crate::reports::service::SalesReportService;
use std::sync::Arc;

/// Host context containing all application state
pub struct ServerHost {
    /// Effective configuration after file and environment overrides
    pub config: Arc<AppConfig>,

    /// Order CRUD operations
    pub orders: OrderService,

    /// Daily sales reporting
    pub reports: SalesReportService,
}

impl ServerHost {
    pub fn new(config: AppConfig, orders: OrderService, reports: SalesReportService) -> Self {
        Self {
            config: Arc::new(config),
            orders,
            reports,
        }
    }

    /// Name of the report cache provider in use
    pub fn cache_provider(&self) -> &'static str {
        self.reports.cache_provider_name()
    }
}
