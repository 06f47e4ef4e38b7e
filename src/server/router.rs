//! Router assembly for the invoice API

use super::handlers::{
    AppState, api_info, create_invoice, delete_invoice, get_invoice, health, list_invoices,
    method_not_allowed, not_found,
};
use super::middleware::{RateLimiter, cors_layer, panic_response, rate_limit};
use crate::config::AppConfig;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, header},
    middleware,
    routing::get,
};
use std::any::Any;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

/// Maximum accepted request body
pub const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Build the complete application router
///
/// Routes:
/// - GET /api/health - Liveness and store connectivity
/// - GET /api - API metadata
/// - POST /api/invoices - Create an invoice
/// - GET /api/invoices - List invoice summaries
/// - GET /api/invoices/{invoice_number} - Get one invoice
/// - DELETE /api/invoices/{invoice_number} - Delete one invoice
///
/// Only the invoice routes are rate limited.
pub fn build_router(state: AppState, config: &AppConfig) -> Router {
    let limiter = Arc::new(RateLimiter::new(config.rate_limit));
    let environment = config.environment;

    let invoice_routes = Router::new()
        .route("/api/invoices", get(list_invoices).post(create_invoice))
        .route(
            "/api/invoices/{invoice_number}",
            get(get_invoice).delete(delete_invoice),
        )
        .route_layer(middleware::from_fn_with_state(limiter, rate_limit));

    Router::new()
        .route("/api/health", get(health))
        .route("/api", get(api_info))
        .merge(invoice_routes)
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config.allowed_origins))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::REFERRER_POLICY,
                    HeaderValue::from_static("no-referrer"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_XSS_PROTECTION,
                    HeaderValue::from_static("0"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("cross-origin-resource-policy"),
                    HeaderValue::from_static("same-origin"),
                ))
                .layer(CatchPanicLayer::custom(
                    move |panic: Box<dyn Any + Send + 'static>| panic_response(panic, environment),
                )),
        )
        .with_state(state)
}
