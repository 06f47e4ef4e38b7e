//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoInvoiceStore`, an [`InvoiceStore`] backed by a single
//! MongoDB collection.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag.
//!
//! # Storage model
//!
//! One document per invoice. Uniqueness of `invoiceNumber` is enforced by a
//! unique index created in [`MongoInvoiceStore::ensure_indexes`]; a write that
//! violates it (server error code 11000) is reported as
//! [`StoreError::DuplicateKey`].
//!
//! # Serialization strategy
//!
//! Invoices are serialized via `serde_json::Value` as an intermediate format,
//! then converted to BSON documents. The `id` field is mapped to MongoDB's
//! `_id` convention (stored as a UUID string) and the `createdAt` /
//! `updatedAt` timestamps are stored as native BSON dates so that sorting by
//! time is chronological.

use crate::core::invoice::{Invoice, InvoiceSummary};
use crate::core::query::{ListQuery, Page};
use crate::core::store::{InvoiceStore, StoreError, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, Bson, Document, doc};
use mongodb::error::{ErrorKind, WriteError, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use serde::Serialize;
use serde::de::DeserializeOwned;

const BACKEND: &str = "MongoDB";

/// Server error code for unique index violations
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Fields stored as native BSON dates
const TIMESTAMP_FIELDS: [&str; 2] = ["createdAt", "updatedAt"];

/// Field holding the encoded QR image, excluded from listings
const QR_CODE_FIELD: &str = "dynamicQRCode";

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a serde_json::Value (expected to be an Object) into a BSON Document,
/// renaming `id` → `_id` and storing RFC 3339 timestamps as BSON dates.
fn json_to_document(json: serde_json::Value) -> StoreResult<Document> {
    let bson_val = bson::to_bson(&json)
        .map_err(|e| StoreError::Serialization(format!("JSON to BSON: {}", e)))?;

    let mut doc = match bson_val {
        Bson::Document(d) => d,
        _ => {
            return Err(StoreError::Serialization(
                "expected BSON document, got non-object".to_string(),
            ));
        }
    };

    if let Some(id) = doc.remove("id") {
        doc.insert("_id", id);
    }

    for field in TIMESTAMP_FIELDS {
        if let Some(Bson::String(text)) = doc.get(field) {
            let parsed = DateTime::parse_from_rfc3339(text)
                .map_err(|e| StoreError::Serialization(format!("{}: {}", field, e)))?;
            let millis = parsed.with_timezone(&Utc).timestamp_millis();
            doc.insert(field, Bson::DateTime(bson::DateTime::from_millis(millis)));
        }
    }

    Ok(doc)
}

/// Convert a BSON Document back into a serde_json::Value,
/// renaming `_id` → `id` and rendering BSON dates as RFC 3339 strings.
fn document_to_json(mut doc: Document) -> StoreResult<serde_json::Value> {
    if let Some(id) = doc.remove("_id") {
        doc.insert("id", id);
    }

    for field in TIMESTAMP_FIELDS {
        if let Some(Bson::DateTime(date)) = doc.get(field) {
            let rendered = DateTime::<Utc>::from_timestamp_millis(date.timestamp_millis())
                .ok_or_else(|| {
                    StoreError::Serialization(format!("{} is out of range", field))
                })?
                .to_rfc3339();
            doc.insert(field, Bson::String(rendered));
        }
    }

    Ok(Bson::Document(doc).into_relaxed_extjson())
}

fn to_document<T: Serialize>(value: &T) -> StoreResult<Document> {
    let json = serde_json::to_value(value)
        .map_err(|e| StoreError::Serialization(format!("serialize invoice: {}", e)))?;
    json_to_document(json)
}

fn from_document<T: DeserializeOwned>(doc: Document) -> StoreResult<T> {
    let json = document_to_json(doc)?;
    serde_json::from_value(json)
        .map_err(|e| StoreError::Serialization(format!("deserialize invoice: {}", e)))
}

/// Whether a driver error is a unique-index violation
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(WriteError {
            code: DUPLICATE_KEY_CODE,
            ..
        }))
    )
}

/// Sort on the requested field, then on `_id` so pages never overlap
fn sort_document(query: &ListQuery) -> Document {
    let direction = query.sort_order.as_i32();
    doc! {
        query.sort_by.field_path(): direction,
        "_id": direction,
    }
}

// ---------------------------------------------------------------------------
// MongoInvoiceStore
// ---------------------------------------------------------------------------

/// Invoice store backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// let store = MongoInvoiceStore::connect("mongodb://localhost:27017", "qr-invoices", "invoices").await?;
/// store.ensure_indexes().await?;
/// let created = store.insert(invoice).await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoInvoiceStore {
    client: Client,
    database: Database,
    collection_name: String,
}

impl MongoInvoiceStore {
    /// Create a store over an existing client and database handle.
    pub fn new(client: Client, database: Database, collection_name: impl Into<String>) -> Self {
        Self {
            client,
            database,
            collection_name: collection_name.into(),
        }
    }

    /// Connect to MongoDB, verify the connection and prepare the collection.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StoreError::backend(BACKEND, "connect", e))?;
        let store = Self::new(client.clone(), client.database(database), collection);

        store.ping().await?;
        store.ensure_indexes().await?;

        tracing::info!(
            database = %database,
            collection = %collection,
            "Connected to MongoDB"
        );
        Ok(store)
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self) -> Collection<Document> {
        self.database.collection(&self.collection_name)
    }

    /// Create the indexes the store relies on.
    ///
    /// - `invoiceNumber: 1` (unique): enforces invoice-number uniqueness
    /// - `createdAt: -1`: default listing order
    ///
    /// Idempotent, runs on every startup.
    pub async fn ensure_indexes(&self) -> StoreResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "invoiceNumber": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
            IndexModel::builder().keys(doc! { "createdAt": -1 }).build(),
        ];

        self.collection()
            .create_indexes(indexes)
            .await
            .map_err(|e| StoreError::backend(BACKEND, "create indexes", e))?;

        Ok(())
    }
}

#[async_trait]
impl InvoiceStore for MongoInvoiceStore {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn ping(&self) -> StoreResult<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::backend(BACKEND, "ping", e))?;
        Ok(())
    }

    async fn exists(&self, invoice_number: &str) -> StoreResult<bool> {
        let count = self
            .collection()
            .count_documents(doc! { "invoiceNumber": invoice_number })
            .limit(1)
            .await
            .map_err(|e| StoreError::backend(BACKEND, "count", e))?;
        Ok(count > 0)
    }

    /// Insert a new invoice.
    ///
    /// The unique index is authoritative: a concurrent insert of the same
    /// number fails here even if an earlier existence check passed.
    async fn insert(&self, invoice: Invoice) -> StoreResult<Invoice> {
        let doc = to_document(&invoice)?;

        self.collection().insert_one(doc).await.map_err(|e| {
            if is_duplicate_key(&e) {
                StoreError::DuplicateKey {
                    invoice_number: invoice.invoice_number.clone(),
                }
            } else {
                StoreError::backend(BACKEND, "insert", e)
            }
        })?;

        Ok(invoice)
    }

    async fn find_by_number(&self, invoice_number: &str) -> StoreResult<Option<Invoice>> {
        let doc = self
            .collection()
            .find_one(doc! { "invoiceNumber": invoice_number })
            .await
            .map_err(|e| StoreError::backend(BACKEND, "find", e))?;

        doc.map(from_document).transpose()
    }

    async fn list(&self, query: &ListQuery) -> StoreResult<Page<InvoiceSummary>> {
        let total = self
            .collection()
            .count_documents(doc! {})
            .await
            .map_err(|e| StoreError::backend(BACKEND, "count", e))?;

        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        let cursor = self
            .collection()
            .find(doc! {})
            .projection(doc! { QR_CODE_FIELD: 0 })
            .sort(sort_document(query))
            .skip(query.skip)
            .limit(limit)
            .await
            .map_err(|e| StoreError::backend(BACKEND, "list", e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| StoreError::backend(BACKEND, "collect", e))?;

        let items = docs
            .into_iter()
            .map(from_document)
            .collect::<StoreResult<Vec<InvoiceSummary>>>()?;

        Ok(Page { items, total })
    }

    /// Find and remove in a single server-side operation.
    async fn delete_by_number(&self, invoice_number: &str) -> StoreResult<Option<Invoice>> {
        let doc = self
            .collection()
            .find_one_and_delete(doc! { "invoiceNumber": invoice_number })
            .await
            .map_err(|e| StoreError::backend(BACKEND, "delete", e))?;

        doc.map(from_document).transpose()
    }

    async fn shutdown(&self) -> StoreResult<()> {
        self.client.clone().shutdown().await;
        tracing::info!("MongoDB connection closed");
        Ok(())
    }
}
