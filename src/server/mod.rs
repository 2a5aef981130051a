//! HTTP server assembly
//!
//! `ServerBuilder` wires an order store and a report cache into the services,
//! then exposes them over REST with graceful shutdown.

pub mod builder;
pub mod exposure;
pub mod host;
pub mod router;

pub use builder::ServerBuilder;
pub use exposure::RestExposure;
pub use host::ServerHost;
