//! Typed error handling for the invoice API
//!
//! Every failure a handler can produce is an [`ApiError`]. Each variant maps
//! to one HTTP status code and renders as the uniform JSON failure shape:
//!
//! ```json
//! { "success": false, "code": "INVOICE_NOT_FOUND", "error": "Invoice not found", "message": "..." }
//! ```
//!
//! # Error Categories
//!
//! - `Validation` / `MalformedBody`: the request payload is unusable (400)
//! - `Conflict`: the invoice number is taken (409)
//! - `NotFound` / `RouteNotFound`: nothing matches (404)
//! - `MethodNotAllowed`: known path, wrong verb (405)
//! - `RateLimited`: the client exceeded its request budget (429)
//! - `Store` / `Internal`: anything unexpected (500)
//!
//! Diagnostic `details` are only rendered when the caller asks for them,
//! which the server does outside production.

use crate::core::store::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// The main error type for the invoice API
#[derive(Debug)]
pub enum ApiError {
    /// Payload parsed but broke one or more field rules
    Validation(Vec<FieldViolation>),

    /// Body is not JSON or has the wrong JSON types
    MalformedBody { message: String },

    /// Invoice number already in use
    Conflict { invoice_number: String },

    /// No invoice with this number
    NotFound { invoice_number: String },

    /// No route matches the request path
    RouteNotFound { method: String, path: String },

    /// Route exists but not for this method
    MethodNotAllowed { method: String, path: String },

    /// Too many requests from one client in the current window
    RateLimited { retry_after_secs: u64 },

    /// Store failure
    Store(StoreError),

    /// Anything else
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(violations) => {
                let msgs: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
                write!(f, "Validation failed: {}", msgs.join("; "))
            }
            ApiError::MalformedBody { message } => {
                write!(f, "Invalid request body: {}", message)
            }
            ApiError::Conflict { invoice_number } => {
                write!(f, "Invoice '{}' already exists", invoice_number)
            }
            ApiError::NotFound { invoice_number } => {
                write!(f, "Invoice '{}' not found", invoice_number)
            }
            ApiError::RouteNotFound { method, path } => {
                write!(f, "Route {} {} not found", method, path)
            }
            ApiError::MethodNotAllowed { method, path } => {
                write!(f, "Method {} not allowed on {}", method, path)
            }
            ApiError::RateLimited { retry_after_secs } => {
                write!(
                    f,
                    "Too many requests, retry in {} seconds",
                    retry_after_secs
                )
            }
            ApiError::Store(e) => write!(f, "Store error: {}", e),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Store(e) => Some(e),
            _ => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,

    /// Error code for programmatic handling
    pub code: &'static str,

    /// Short error title
    pub error: &'static str,

    /// Human-readable explanation safe to show in any environment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Diagnostic details, only outside production
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MalformedBody { .. } => StatusCode::BAD_REQUEST,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::MalformedBody { .. } => "INVALID_BODY",
            ApiError::Conflict { .. } => "INVOICE_ALREADY_EXISTS",
            ApiError::NotFound { .. } => "INVOICE_NOT_FOUND",
            ApiError::RouteNotFound { .. } => "ROUTE_NOT_FOUND",
            ApiError::MethodNotAllowed { .. } => "METHOD_NOT_ALLOWED",
            ApiError::RateLimited { .. } => "RATE_LIMITED",
            ApiError::Store(_) => "STORE_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "Validation failed",
            ApiError::MalformedBody { .. } => "Invalid request body",
            ApiError::Conflict { .. } => "Invoice already exists",
            ApiError::NotFound { .. } => "Invoice not found",
            ApiError::RouteNotFound { .. } => "Not found",
            ApiError::MethodNotAllowed { .. } => "Method not allowed",
            ApiError::RateLimited { .. } => "Too many requests",
            ApiError::Store(_) | ApiError::Internal(_) => "Internal server error",
        }
    }

    /// Message shown in every environment
    fn public_message(&self) -> Option<String> {
        match self {
            ApiError::Store(_) | ApiError::Internal(_) => {
                Some("An unexpected error occurred".to_string())
            }
            ApiError::Validation(violations) => Some(
                violations
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            ApiError::MalformedBody { message } => Some(message.clone()),
            _ => Some(self.to_string()),
        }
    }

    /// Diagnostic details for non-production responses
    fn details(&self) -> Option<Value> {
        match self {
            ApiError::Validation(violations) => Some(json!({ "fields": violations })),
            ApiError::Store(e) => Some(json!(e.to_string())),
            ApiError::Internal(msg) => Some(json!(msg)),
            _ => None,
        }
    }

    /// Convert to an error response body
    pub fn to_response(&self, expose_details: bool) -> ErrorResponse {
        ErrorResponse {
            success: false,
            code: self.error_code(),
            error: self.title(),
            message: self.public_message(),
            details: if expose_details { self.details() } else { None },
        }
    }

    /// Attach the environment's detail policy
    pub fn with_details(self, expose_details: bool) -> ApiFailure {
        ApiFailure {
            error: self,
            expose_details,
        }
    }
}

/// Details are withheld by default
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.with_details(false).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { invoice_number } => ApiError::Conflict { invoice_number },
            other => ApiError::Store(other),
        }
    }
}

/// An [`ApiError`] together with the decision whether to show diagnostics
#[derive(Debug)]
pub struct ApiFailure {
    pub error: ApiError,
    pub expose_details: bool,
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        let body = Json(self.error.to_response(self.expose_details));
        let mut response = (status, body).into_response();

        if let ApiError::RateLimited { retry_after_secs } = self.error
            && let Ok(value) = retry_after_secs.to_string().parse()
        {
            response
                .headers_mut()
                .insert(axum::http::header::RETRY_AFTER, value);
        }

        response
    }
}

/// A specialized Result type for handlers
pub type ApiResult<T> = Result<T, ApiFailure>;
