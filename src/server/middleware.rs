//! Cross-cutting HTTP layers: rate limiting, CORS and panic recovery

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, Method, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::any::Any;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::{AllowedOrigins, Environment, RateLimitConfig};
use crate::core::error::ApiError;

const CORS_MAX_AGE: Duration = Duration::from_secs(3600);

/// Upper bound on tracked clients
pub const MAX_TRACKED_CLIENTS: usize = 10_000;

/// Longest accepted client address from a proxy header
const MAX_FORWARDED_LEN: usize = 64;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the client's window resets
    pub reset_after: Duration,
}

/// Fixed-window request counter keyed by client address
///
/// Each client gets `max_requests` per window. The window starts with the
/// client's first request and is replaced once it has fully elapsed.
///
/// At most `capacity` clients are tracked. When a new client arrives at a
/// full table, expired windows are dropped first, and if none have expired
/// the client whose window started earliest is evicted.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    capacity: usize,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_capacity(config, MAX_TRACKED_CLIENTS)
    }

    pub fn with_capacity(config: RateLimitConfig, capacity: usize) -> Self {
        Self {
            config,
            capacity: capacity.max(1),
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.windows.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Count one request for `key` at `now`
    pub fn check(&self, key: &str, now: Instant) -> RateDecision {
        let window_len = self.config.window;
        let limit = self.config.max_requests;

        // A poisoned map only ever holds counters; keep using it
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        if !windows.contains_key(key) && windows.len() >= self.capacity {
            windows.retain(|_, w| now.duration_since(w.started) < window_len);
            while windows.len() >= self.capacity {
                let Some(oldest) = windows
                    .iter()
                    .min_by_key(|(_, w)| w.started)
                    .map(|(k, _)| k.clone())
                else {
                    break;
                };
                windows.remove(&oldest);
            }
        }

        let window = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(window.started) >= window_len {
            *window = Window {
                started: now,
                count: 0,
            };
        }

        let reset_after = window_len.saturating_sub(now.duration_since(window.started));
        if window.count >= limit {
            return RateDecision {
                allowed: false,
                limit,
                remaining: 0,
                reset_after,
            };
        }

        window.count += 1;
        RateDecision {
            allowed: true,
            limit,
            remaining: limit - window.count,
            reset_after,
        }
    }
}

/// Identify the client: proxy headers first, then the socket peer
fn client_key(req: &Request) -> String {
    forwarded_ip(req.headers())
        .or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(normalized_address)
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .and_then(normalized_address)
        })
}

/// Accept only short values made of address characters
fn normalized_address(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() || value.len() > MAX_FORWARDED_LEN {
        return None;
    }
    value
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b':' || b == b'-')
        .then(|| value.to_string())
}

fn set_rate_headers(headers: &mut HeaderMap, decision: &RateDecision) {
    headers.insert("x-ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(decision.remaining));
    headers.insert(
        "x-ratelimit-reset",
        HeaderValue::from(decision.reset_after.as_secs()),
    );
}

/// Reject clients that exceeded their request budget with 429
pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request,
    next: Next,
) -> Response {
    let key = client_key(&req);
    let decision = limiter.check(&key, Instant::now());

    if !decision.allowed {
        tracing::warn!(client = %key, limit = decision.limit, "Rate limit exceeded");
        let mut response = ApiError::RateLimited {
            retry_after_secs: decision.reset_after.as_secs().max(1),
        }
        .into_response();
        set_rate_headers(response.headers_mut(), &decision);
        return response;
    }

    let mut response = next.run(req).await;
    set_rate_headers(response.headers_mut(), &decision);
    response
}

/// CORS layer for the configured origins
pub fn cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(CORS_MAX_AGE);

    match origins {
        AllowedOrigins::Any => layer.allow_origin(AllowOrigin::any()),
        AllowedOrigins::List(list) => {
            let values: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            layer
                .allow_origin(AllowOrigin::list(values))
                .allow_credentials(true)
        }
    }
}

/// Response for a handler that panicked
///
/// The panic message is shown as `details` unless the environment hides them.
pub fn panic_response(err: Box<dyn Any + Send + 'static>, environment: Environment) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(panic = %detail, "Request handler panicked");

    ApiError::Internal(detail)
        .with_details(environment.exposes_error_details())
        .into_response()
}
