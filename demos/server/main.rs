//! Order management server
//!
//! Runs the REST API on an in-memory order store.
//!
//! Configuration is read from the YAML file named by `BISTRO_CONFIG` (if set),
//! then environment overrides apply (`PORT`, `BISTRO_HOST`, `REDIS_URL`, ...).
//! A Redis report cache needs `--features redis-cache`.
//!
//! ```sh
//! PORT=8080 RUST_LOG=debug cargo run --example server
//! ```

use anyhow::Result;
use bistro::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::var("BISTRO_CONFIG") {
        Ok(path) => AppConfig::from_yaml_file(&path)?,
        Err(_) => AppConfig::default(),
    }
    .with_env_overrides()?;

    println!("🚀 Starting bistro on http://{}", config.bind_address());
    println!("\n📚 Routes:");
    println!("    POST   /orders                          - Create an order");
    println!("    GET    /orders                          - List orders (page, limit, startDate, endDate, customerName)");
    println!("    GET    /orders/{{id}}                     - Get an order");
    println!("    PUT    /orders/{{id}}                     - Partially update an order");
    println!("    GET    /reports/daily-sales?date=YYYY-MM-DD - Daily sales report");
    println!("    GET    /health                          - Health check\n");

    ServerBuilder::new()
        .with_config(config)
        .with_order_store(InMemoryOrderStore::new())
        .serve()
        .await
}
