//! Configuration loading and management
//!
//! All settings come from environment variables. The binary seeds them from a
//! `.env` file first. Parsing is done by [`AppConfig::from_lookup`] over any
//! key lookup so it can be exercised without touching the process environment.

use anyhow::{Context, Result, anyhow};
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_DATABASE: &str = "qr-invoices";
const DEFAULT_COLLECTION: &str = "invoices";
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_RATE_LIMIT_MAX: u32 = 100;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 15 * 60;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "test" => Environment::Test,
            _ => Environment::Development,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }

    /// Whether error responses may carry diagnostic details
    pub fn exposes_error_details(&self) -> bool {
        !matches!(self, Environment::Production)
    }
}

/// Origins allowed by the CORS layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

impl AllowedOrigins {
    /// Parse a comma separated list; `*` anywhere allows every origin
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if origins.iter().any(|o| o == "*") {
            AllowedOrigins::Any
        } else {
            AllowedOrigins::List(origins)
        }
    }
}

/// Connection settings for the MongoDB store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

/// Fixed-window rate limiting settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests allowed per client per window
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_RATE_LIMIT_MAX,
            window: Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,

    /// `None` runs the service on the in-memory store
    pub mongo: Option<MongoConfig>,

    pub allowed_origins: AllowedOrigins,
    pub rate_limit: RateLimitConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            environment: Environment::default(),
            mongo: None,
            allowed_origins: AllowedOrigins::parse(DEFAULT_ALLOWED_ORIGIN),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got '{}'", raw))?,
            None => defaults.port,
        };

        let environment = get("APP_ENV")
            .or_else(|| get("NODE_ENV"))
            .map(|raw| Environment::parse(&raw))
            .unwrap_or_default();

        let mongo = get("MONGODB_URI").map(|uri| MongoConfig {
            uri,
            database: get("MONGODB_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            collection: get("MONGODB_COLLECTION")
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
        });

        let max_requests = match get("RATE_LIMIT_MAX") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("RATE_LIMIT_MAX must be a number, got '{}'", raw))?,
            None => DEFAULT_RATE_LIMIT_MAX,
        };
        if max_requests == 0 {
            return Err(anyhow!("RATE_LIMIT_MAX must be at least 1"));
        }

        let window_secs = match get("RATE_LIMIT_WINDOW_SECS") {
            Some(raw) => raw.trim().parse::<u64>().with_context(|| {
                format!("RATE_LIMIT_WINDOW_SECS must be a number, got '{}'", raw)
            })?,
            None => DEFAULT_RATE_LIMIT_WINDOW_SECS,
        };
        if window_secs == 0 {
            return Err(anyhow!("RATE_LIMIT_WINDOW_SECS must be at least 1"));
        }

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            environment,
            mongo,
            allowed_origins: get("ALLOWED_ORIGINS")
                .map(|raw| AllowedOrigins::parse(&raw))
                .unwrap_or(defaults.allowed_origins),
            rate_limit: RateLimitConfig {
                max_requests,
                window: Duration::from_secs(window_secs),
            },
        })
    }

    /// Socket address the server binds to
    ///
    /// `HOST` may be an IP literal or a hostname; hostnames resolve to their
    /// first address.
    pub async fn bind_address(&self) -> Result<SocketAddr> {
        tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))?
            .next()
            .ok_or_else(|| anyhow!("{} did not resolve to any address", self.host))
    }
}
