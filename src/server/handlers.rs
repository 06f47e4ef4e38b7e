//! HTTP handlers for invoice operations
//!
//! Every handler validates its input, calls the injected store and maps the
//! outcome to a status code. Failures are rendered by [`ApiFailure`].

use axum::{
    Json,
    extract::{OriginalUri, Path, Query, State, rejection::JsonRejection, rejection::QueryRejection},
    http::{Method, StatusCode},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::config::Environment;
use crate::core::error::{ApiError, ApiFailure, ApiResult};
use crate::core::invoice::{Invoice, InvoiceSummary, timestamp_now};
use crate::core::query::{ListParams, PaginationMeta};
use crate::core::store::InvoiceStore;
use crate::core::validation::{InvoicePayload, validate_invoice};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InvoiceStore>,
    pub environment: Environment,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn InvoiceStore>, environment: Environment) -> Self {
        Self {
            store,
            environment,
            started_at: Instant::now(),
        }
    }

    /// Turn any error into a response-ready failure, logging store errors
    pub fn fail(&self, error: impl Into<ApiError>) -> ApiFailure {
        let error = error.into();
        match &error {
            ApiError::Store(e) => tracing::error!(error = %e, "Invoice store operation failed"),
            ApiError::Internal(msg) => tracing::error!(error = %msg, "Internal error"),
            _ => tracing::debug!(error = %error, "Request rejected"),
        }
        error.with_details(self.environment.exposes_error_details())
    }
}

/// Response for the create endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceResponse {
    pub success: bool,
    pub message: String,
    pub invoice_id: Uuid,
    pub invoice_number: String,
    pub created_at: DateTime<Utc>,
}

/// Response for the get endpoint
#[derive(Debug, Serialize)]
pub struct GetInvoiceResponse {
    pub success: bool,
    pub invoice: Invoice,
}

/// Response for the list endpoint
#[derive(Debug, Serialize)]
pub struct ListInvoicesResponse {
    pub success: bool,
    pub invoices: Vec<InvoiceSummary>,
    pub pagination: PaginationMeta,
}

/// Identity of a removed invoice
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedInvoice {
    pub id: Uuid,
    pub invoice_number: String,
}

/// Response for the delete endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteInvoiceResponse {
    pub success: bool,
    pub message: String,
    pub deleted_invoice: DeletedInvoice,
}

/// Create an invoice
///
/// POST /api/invoices
///
/// The existence check only avoids a pointless write; a concurrent insert of
/// the same number is still rejected by the store and reported identically.
pub async fn create_invoice(
    State(state): State<AppState>,
    payload: Result<Json<InvoicePayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreateInvoiceResponse>)> {
    let Json(payload) = payload.map_err(|rejection| {
        state.fail(ApiError::MalformedBody {
            message: rejection.body_text(),
        })
    })?;

    let new_invoice = validate_invoice(payload).map_err(|v| state.fail(ApiError::Validation(v)))?;

    if state
        .store
        .exists(&new_invoice.invoice_number)
        .await
        .map_err(|e| state.fail(e))?
    {
        tracing::warn!(invoice_number = %new_invoice.invoice_number, "Duplicate invoice number");
        return Err(state.fail(ApiError::Conflict {
            invoice_number: new_invoice.invoice_number,
        }));
    }

    let invoice = Invoice::from_new(new_invoice, timestamp_now());
    let created = state.store.insert(invoice).await.map_err(|e| {
        let error = ApiError::from(e);
        if let ApiError::Conflict { invoice_number } = &error {
            tracing::warn!(invoice_number = %invoice_number, "Duplicate invoice number rejected by store");
        }
        state.fail(error)
    })?;

    tracing::info!(
        invoice_number = %created.invoice_number,
        invoice_id = %created.id,
        "Invoice created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateInvoiceResponse {
            success: true,
            message: "Invoice saved successfully".to_string(),
            invoice_id: created.id,
            invoice_number: created.invoice_number,
            created_at: created.created_at,
        }),
    ))
}

/// Get a full invoice by its number
///
/// GET /api/invoices/{invoice_number}
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_number): Path<String>,
) -> ApiResult<Json<GetInvoiceResponse>> {
    let invoice = state
        .store
        .find_by_number(&invoice_number)
        .await
        .map_err(|e| state.fail(e))?
        .ok_or_else(|| state.fail(ApiError::NotFound { invoice_number }))?;

    Ok(Json(GetInvoiceResponse {
        success: true,
        invoice,
    }))
}

/// List invoices, one page at a time
///
/// GET /api/invoices?limit=50&skip=0&sortBy=createdAt&sortOrder=desc
///
/// Query parameters never cause an error: unusable values fall back to the
/// defaults.
pub async fn list_invoices(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<ListInvoicesResponse>> {
    let params = params.map(|Query(p)| p).unwrap_or_default();
    let query = params.resolve();

    let page = state.store.list(&query).await.map_err(|e| state.fail(e))?;

    Ok(Json(ListInvoicesResponse {
        success: true,
        invoices: page.items,
        pagination: PaginationMeta::new(&query, page.total),
    }))
}

/// Delete an invoice by its number
///
/// DELETE /api/invoices/{invoice_number}
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(invoice_number): Path<String>,
) -> ApiResult<Json<DeleteInvoiceResponse>> {
    let deleted = state
        .store
        .delete_by_number(&invoice_number)
        .await
        .map_err(|e| state.fail(e))?
        .ok_or_else(|| state.fail(ApiError::NotFound { invoice_number }))?;

    tracing::info!(invoice_number = %deleted.invoice_number, "Invoice deleted");

    Ok(Json(DeleteInvoiceResponse {
        success: true,
        message: "Invoice deleted successfully".to_string(),
        deleted_invoice: DeletedInvoice {
            id: deleted.id,
            invoice_number: deleted.invoice_number,
        },
    }))
}

/// Health check
///
/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let database = match state.store.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the store");
            "disconnected"
        }
    };

    Json(json!({
        "success": true,
        "status": "OK",
        "timestamp": Utc::now(),
        "uptime": state.started_at.elapsed().as_secs_f64(),
        "environment": state.environment.as_str(),
        "database": database,
        "storage": state.store.backend_name(),
    }))
}

/// API metadata
///
/// GET /api
pub async fn api_info() -> Json<Value> {
    Json(json!({
        "success": true,
        "name": "QR Invoice API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
        "endpoints": {
            "health": "GET /api/health",
            "createInvoice": "POST /api/invoices",
            "getInvoice": "GET /api/invoices/:invoiceNumber",
            "listInvoices": "GET /api/invoices?limit=50&skip=0&sortBy=createdAt&sortOrder=desc",
            "deleteInvoice": "DELETE /api/invoices/:invoiceNumber"
        }
    }))
}

/// Fallback for unmatched paths
pub async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::RouteNotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}

/// Fallback for known paths hit with an unsupported method
pub async fn method_not_allowed(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}
