//! # QR Invoice
//!
//! Storage backend for a QR-code payment invoicing tool. Invoices are created
//! by a point-of-sale frontend, persisted through a pluggable store and served
//! back over a small JSON API.
//!
//! ## Features
//!
//! - **Validated Writes**: every field rule is checked and all violations are reported together
//! - **Unique Invoice Numbers**: enforced by the store, even under concurrent writes
//! - **Paged Listing**: sortable summaries that leave out the heavy QR payload
//! - **Pluggable Storage**: in-memory for development and tests, MongoDB for production
//! - **Hardened HTTP Surface**: rate limiting, CORS, security headers and JSON fallbacks
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use qr_invoice::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new()
//!         .with_config(AppConfig::from_env()?)
//!         .with_store(InMemoryInvoiceStore::new())
//!         .serve()
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        ApiError, FieldViolation, Invoice, InvoicePayload, InvoiceStore, InvoiceSummary,
        ListParams, ListQuery, NewInvoice, PaginationMeta, StoreError, StoreResult,
        validate_invoice,
    };

    // === Storage ===
    pub use crate::storage::InMemoryInvoiceStore;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoInvoiceStore;

    // === Config ===
    pub use crate::config::{AllowedOrigins, AppConfig, Environment, MongoConfig, RateLimitConfig};

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder, build_router};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use uuid::Uuid;
}
