//! Core module containing the invoice model, store contract and error types

pub mod error;
pub mod invoice;
pub mod query;
pub mod store;
pub mod validation;

pub use error::{ApiError, ApiFailure, ApiResult, FieldViolation};
pub use invoice::{Invoice, InvoiceSummary, NewInvoice};
pub use query::{ListParams, ListQuery, PaginationMeta};
pub use store::{InvoiceStore, StoreError, StoreResult};
pub use validation::{InvoicePayload, validate_invoice};
