//! HTTP server for the invoice API
//!
//! This module provides:
//! - Handlers for every invoice operation plus health and metadata routes
//! - Rate limiting, CORS, security headers and panic recovery layers
//! - A `ServerBuilder` that wires a store and configuration into a server

pub mod builder;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::AppState;
pub use router::build_router;
