//! ServerBuilder for fluent API to build HTTP servers

use super::exposure::RestExposure;
use super::host::ServerHost;
use crate::config::AppConfig;
use crate::core::service::OrderService;
use crate::core::store::OrderStore;
use crate::reports::cache::{MokaReportCache, NoopReportCache, ReportCache};
#[cfg(feature = "redis-cache")]
use crate::reports::redis_cache::RedisReportCache;
use crate::reports::service::SalesReportService;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the order management HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(AppConfig::default())
///     .with_order_store(InMemoryOrderStore::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    order_store: Option<Arc<dyn OrderStore>>,
    report_cache: Option<Arc<dyn ReportCache>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with default configuration
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            order_store: None,
            report_cache: None,
            custom_routes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the order store (required)
    pub fn with_order_store(mut self, store: impl OrderStore + 'static) -> Self {
        self.order_store = Some(Arc::new(store));
        self
    }

    /// Set a shared order store (required)
    pub fn with_shared_order_store(mut self, store: Arc<dyn OrderStore>) -> Self {
        self.order_store = Some(store);
        self
    }

    /// Override the report cache
    ///
    /// Without this, a Moka cache is used when `reports.cache_enabled` is set
    /// and a no-op cache otherwise. See also [`Self::connect_report_cache`].
    pub fn with_report_cache(mut self, cache: impl ReportCache + 'static) -> Self {
        self.report_cache = Some(Arc::new(cache));
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Connect the shared Redis report cache named by `reports.redis_url`
    ///
    /// Keeps the in-process default when no URL is configured, when the
    /// `redis-cache` feature is off, or when the server cannot be reached.
    pub async fn connect_report_cache(mut self) -> Self {
        if self.report_cache.is_some() || !self.config.reports.cache_enabled {
            return self;
        }
        if let Some(url) = self.config.reports.redis_url.clone() {
            self.report_cache = Self::redis_cache(&url).await;
        }
        self
    }

    #[cfg(feature = "redis-cache")]
    async fn redis_cache(url: &str) -> Option<Arc<dyn ReportCache>> {
        match RedisReportCache::connect(url).await {
            Ok(cache) => {
                tracing::info!(backend = "redis", "Shared report cache connected");
                Some(Arc::new(cache))
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Failed to connect to Redis, falling back to in-process report cache"
                );
                None
            }
        }
    }

    #[cfg(not(feature = "redis-cache"))]
    async fn redis_cache(_url: &str) -> Option<Arc<dyn ReportCache>> {
        tracing::warn!(
            "reports.redis_url is set but the 'redis-cache' feature is not enabled, using in-process report cache"
        );
        None
    }

    /// Build the transport-agnostic host
    pub fn build_host(mut self) -> Result<ServerHost> {
        let store = self.order_store.take().ok_or_else(|| {
            anyhow::anyhow!("OrderStore is required. Call .with_order_store()")
        })?;

        let offset = self.config.utc_offset()?;
        let cache = match self.report_cache.take() {
            Some(cache) => cache,
            None => Self::default_cache(&self.config),
        };

        let orders = OrderService::new(store.clone(), offset);
        let reports = SalesReportService::new(store, cache)
            .with_offset(offset)
            .with_cache_timeout(self.config.cache_timeout());

        tracing::info!(
            utc_offset_seconds = offset.local_minus_utc(),
            cache_provider = reports.cache_provider_name(),
            "Server host built"
        );

        Ok(ServerHost::new(self.config, orders, reports))
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let custom_routes = std::mem::take(&mut self.custom_routes);
        let host = Arc::new(self.build_host()?);
        RestExposure::build_router(host, custom_routes)
    }

    /// Serve the application on the configured address with graceful shutdown
    ///
    /// Handles SIGTERM and SIGINT (Ctrl+C).
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.bind_address();
        let app = self.connect_report_cache().await.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    fn default_cache(config: &AppConfig) -> Arc<dyn ReportCache> {
        if config.reports.cache_enabled {
            Arc::new(MokaReportCache::new(config.reports.cache_capacity))
        } else {
            Arc::new(NoopReportCache)
        }
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for a shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
