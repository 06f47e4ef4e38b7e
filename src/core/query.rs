//! Listing parameters and pagination utilities

use serde::{Deserialize, Serialize};

/// Default number of invoices per page
pub const DEFAULT_LIMIT: u64 = 50;

/// Largest page a client may ask for
pub const MAX_LIMIT: u64 = 100;

/// Largest offset a document store can address
pub const MAX_SKIP: u64 = i64::MAX as u64;

/// Raw query parameters for the listing endpoint
///
/// All values are kept as strings so that malformed input falls back to the
/// defaults instead of rejecting the request.
///
/// # Example
/// ```text
/// GET /api/invoices?limit=20&skip=40&sortBy=total&sortOrder=asc
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub limit: Option<String>,
    pub skip: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListParams {
    /// Resolve the raw parameters into an effective query
    pub fn resolve(&self) -> ListQuery {
        let limit = self
            .limit
            .as_deref()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, MAX_LIMIT);

        let skip = self
            .skip
            .as_deref()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(0)
            .min(MAX_SKIP);

        ListQuery {
            limit,
            skip,
            sort_by: self
                .sort_by
                .as_deref()
                .map(SortField::parse)
                .unwrap_or_default(),
            sort_order: self
                .sort_order
                .as_deref()
                .map(SortOrder::parse)
                .unwrap_or_default(),
        }
    }
}

/// Fields an invoice listing can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    InvoiceNumber,
    Total,
    Subtotal,
    CustomerName,
}

impl SortField {
    /// Parse a client-supplied field name; unknown names sort by creation time
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "createdAt" => SortField::CreatedAt,
            "updatedAt" => SortField::UpdatedAt,
            "invoiceNumber" => SortField::InvoiceNumber,
            "total" => SortField::Total,
            "subtotal" => SortField::Subtotal,
            "customerInfo.name" | "customerName" => SortField::CustomerName,
            _ => SortField::CreatedAt,
        }
    }

    /// Document path of the field
    pub fn field_path(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::InvoiceNumber => "invoiceNumber",
            SortField::Total => "total",
            SortField::Subtotal => "subtotal",
            SortField::CustomerName => "customerInfo.name",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Parse a client-supplied direction; anything but `asc` is descending
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }

    /// Direction as a document-store sort value (`1` or `-1`)
    pub fn as_i32(&self) -> i32 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }
}

/// An effective, fully-defaulted listing query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: u64,
    pub skip: u64,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl Default for ListQuery {
    fn default() -> Self {
        ListParams::default().resolve()
    }
}

/// One page of results as returned by a store
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,

    /// Number of documents in the whole collection
    pub total: u64,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Total number of invoices
    pub total: u64,

    /// Effective page size
    pub limit: u64,

    /// Effective offset
    pub skip: u64,

    /// Whether more invoices exist beyond this page
    pub has_more: bool,
}

impl PaginationMeta {
    pub fn new(query: &ListQuery, total: u64) -> Self {
        Self {
            total,
            limit: query.limit,
            skip: query.skip,
            has_more: query.skip.saturating_add(query.limit) < total,
        }
    }
}
