//! Order HTTP endpoints

pub mod handlers;
