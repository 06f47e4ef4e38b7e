//! Store trait for invoice persistence

use crate::core::invoice::{Invoice, InvoiceSummary};
use crate::core::query::{ListQuery, Page};
use async_trait::async_trait;

/// Errors reported by an [`InvoiceStore`]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The unique invoice-number constraint rejected a write
    #[error("invoice '{invoice_number}' already exists")]
    DuplicateKey { invoice_number: String },

    /// The backend failed to execute an operation
    #[error("{backend} {operation} failed: {message}")]
    Backend {
        backend: &'static str,
        operation: &'static str,
        message: String,
    },

    /// A stored document could not be converted to or from an invoice
    #[error("invoice serialization failed: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn backend(
        backend: &'static str,
        operation: &'static str,
        message: impl std::fmt::Display,
    ) -> Self {
        StoreError::Backend {
            backend,
            operation,
            message: message.to_string(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Document store holding invoices keyed by invoice number
///
/// Implementations must enforce uniqueness of `invoice_number` themselves:
/// when two inserts race for the same number, exactly one succeeds and the
/// other returns [`StoreError::DuplicateKey`].
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Short backend name used in logs and health output
    fn backend_name(&self) -> &'static str;

    /// Check that the backend is reachable
    async fn ping(&self) -> StoreResult<()>;

    /// Whether an invoice with this number exists
    async fn exists(&self, invoice_number: &str) -> StoreResult<bool>;

    /// Persist a new invoice
    async fn insert(&self, invoice: Invoice) -> StoreResult<Invoice>;

    /// Fetch the full document, QR image included
    async fn find_by_number(&self, invoice_number: &str) -> StoreResult<Option<Invoice>>;

    /// Fetch one sorted page of summaries plus the collection size
    async fn list(&self, query: &ListQuery) -> StoreResult<Page<InvoiceSummary>>;

    /// Atomically find and remove an invoice, returning what was removed
    async fn delete_by_number(&self, invoice_number: &str) -> StoreResult<Option<Invoice>>;

    /// Release backend resources; called once at process shutdown
    async fn shutdown(&self) -> StoreResult<()> {
        Ok(())
    }
}
