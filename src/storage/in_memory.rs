//! In-memory implementation of InvoiceStore for testing and development

use crate::core::invoice::{Invoice, InvoiceSummary};
use crate::core::query::{ListQuery, Page, SortField, SortOrder};
use crate::core::store::{InvoiceStore, StoreError, StoreResult};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

const BACKEND: &str = "memory";

#[derive(Default)]
struct Inner {
    /// Invoices keyed by invoice number, each with its insertion sequence
    invoices: HashMap<String, (u64, Invoice)>,
    next_seq: u64,
}

/// In-memory invoice store
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// the uniqueness check and the insert happen under the same write lock.
#[derive(Clone, Default)]
pub struct InMemoryInvoiceStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryInvoiceStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare(a: &Invoice, b: &Invoice, field: SortField) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::InvoiceNumber => a.invoice_number.cmp(&b.invoice_number),
        SortField::Total => a.total.total_cmp(&b.total),
        SortField::Subtotal => a.subtotal.total_cmp(&b.subtotal),
        SortField::CustomerName => a.customer_info.name.cmp(&b.customer_info.name),
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn ping(&self) -> StoreResult<()> {
        self.inner
            .read()
            .map(|_| ())
            .map_err(|e| StoreError::backend(BACKEND, "ping", e))
    }

    async fn exists(&self, invoice_number: &str) -> StoreResult<bool> {
        let inner = self
            .inner
            .read()
            .map_err(|e| StoreError::backend(BACKEND, "read lock", e))?;

        Ok(inner.invoices.contains_key(invoice_number))
    }

    async fn insert(&self, invoice: Invoice) -> StoreResult<Invoice> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| StoreError::backend(BACKEND, "write lock", e))?;

        if inner.invoices.contains_key(&invoice.invoice_number) {
            return Err(StoreError::DuplicateKey {
                invoice_number: invoice.invoice_number,
            });
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner
            .invoices
            .insert(invoice.invoice_number.clone(), (seq, invoice.clone()));

        Ok(invoice)
    }

    async fn find_by_number(&self, invoice_number: &str) -> StoreResult<Option<Invoice>> {
        let inner = self
            .inner
            .read()
            .map_err(|e| StoreError::backend(BACKEND, "read lock", e))?;

        Ok(inner
            .invoices
            .get(invoice_number)
            .map(|(_, invoice)| invoice.clone()))
    }

    async fn list(&self, query: &ListQuery) -> StoreResult<Page<InvoiceSummary>> {
        let inner = self
            .inner
            .read()
            .map_err(|e| StoreError::backend(BACKEND, "read lock", e))?;

        let mut entries: Vec<&(u64, Invoice)> = inner.invoices.values().collect();
        entries.sort_by(|(seq_a, a), (seq_b, b)| {
            let ordering = compare(a, b, query.sort_by).then(seq_a.cmp(seq_b));
            match query.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = entries.len() as u64;
        let skip = usize::try_from(query.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);

        let items = entries
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|(_, invoice)| invoice.summary())
            .collect();

        Ok(Page { items, total })
    }

    async fn delete_by_number(&self, invoice_number: &str) -> StoreResult<Option<Invoice>> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| StoreError::backend(BACKEND, "write lock", e))?;

        Ok(inner
            .invoices
            .remove(invoice_number)
            .map(|(_, invoice)| invoice))
    }
}
