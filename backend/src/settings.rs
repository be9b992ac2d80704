//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `FAVORITES_*` environment variables and an
//! optional config file, in increasing order of precedence for flags. Tuning
//! fields are optional and resolve to defaults through accessors; the three
//! connection strings are required.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;

use crate::domain::{
    AggregationConfig, CircuitBreakerConfig, LimiterScope, ProductRetryPolicy,
};
use crate::outbound::persistence::PoolSettings;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_IDENTITY_TIMEOUT_MS: u64 = 8_000;
const DEFAULT_PRODUCT_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_PRODUCT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_PRODUCT_RETRY_DELAY_MS: u64 = 2_000;
const DEFAULT_AGGREGATION_MAX_CONCURRENCY: usize = 2;
const DEFAULT_BREAKER_FAILURE_THRESHOLD: u32 = 3;
const DEFAULT_BREAKER_OPEN_COOLDOWN_SECS: u64 = 20;
const DEFAULT_BREAKER_HALF_OPEN_MAX_PROBES: u32 = 5;
const DEFAULT_BREAKER_CLOSED_RESET_INTERVAL_SECS: u64 = 10;
const DEFAULT_REQUEST_DEADLINE_MS: u64 = 15_000;
const DEFAULT_DB_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_DB_POOL_MIN_IDLE: u32 = 2;
const DEFAULT_DB_POOL_CHECKOUT_TIMEOUT_MS: u64 = 5_000;

/// A required setting is missing or malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("{field} is required")]
    Missing { field: &'static str },
    #[error("{field} is invalid: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// Service configuration.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FAVORITES")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Base URL of the identity service.
    pub user_service_url: Option<String>,
    /// Base URL of the product catalogue.
    pub product_service_url: Option<String>,
    /// Per-call timeout for identity lookups.
    pub identity_timeout_ms: Option<u64>,
    /// Per-attempt timeout for product lookups.
    pub product_timeout_ms: Option<u64>,
    pub product_max_attempts: Option<u32>,
    pub product_retry_delay_ms: Option<u64>,
    /// Product lookups allowed in flight at once.
    pub aggregation_max_concurrency: Option<usize>,
    /// Share one lookup limiter across every request instead of one per call.
    #[ortho_config(default = false)]
    pub aggregation_shared_limiter: bool,
    pub breaker_failure_threshold: Option<u32>,
    pub breaker_open_cooldown_secs: Option<u64>,
    pub breaker_half_open_max_probes: Option<u32>,
    /// Zero disables the periodic reset of the closed-state failure count.
    pub breaker_closed_reset_interval_secs: Option<u64>,
    /// Budget for one inbound request, shared by every call it makes.
    pub request_deadline_ms: Option<u64>,
    pub db_pool_max_size: Option<u32>,
    pub db_pool_min_idle: Option<u32>,
    /// How long a repository waits for a pooled connection.
    pub db_pool_checkout_timeout_ms: Option<u64>,
}

fn required<'a>(
    value: Option<&'a String>,
    field: &'static str,
) -> Result<&'a str, SettingsError> {
    value
        .map(String::as_str)
        .filter(|raw| !raw.trim().is_empty())
        .ok_or(SettingsError::Missing { field })
}

fn parse_url(value: Option<&String>, field: &'static str) -> Result<Url, SettingsError> {
    Url::parse(required(value, field)?).map_err(|err| SettingsError::Invalid {
        field,
        message: err.to_string(),
    })
}

impl AppSettings {
    /// Address to bind, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::Invalid {
                field: "bind_addr",
                message: err.to_string(),
            })
    }

    pub fn database_url(&self) -> Result<&str, SettingsError> {
        required(self.database_url.as_ref(), "database_url")
    }

    pub fn user_service_url(&self) -> Result<Url, SettingsError> {
        parse_url(self.user_service_url.as_ref(), "user_service_url")
    }

    pub fn product_service_url(&self) -> Result<Url, SettingsError> {
        parse_url(self.product_service_url.as_ref(), "product_service_url")
    }

    pub fn identity_timeout(&self) -> Duration {
        Duration::from_millis(
            self.identity_timeout_ms
                .unwrap_or(DEFAULT_IDENTITY_TIMEOUT_MS),
        )
    }

    pub fn product_timeout(&self) -> Duration {
        Duration::from_millis(self.product_timeout_ms.unwrap_or(DEFAULT_PRODUCT_TIMEOUT_MS))
    }

    pub fn request_deadline(&self) -> Duration {
        Duration::from_millis(
            self.request_deadline_ms
                .unwrap_or(DEFAULT_REQUEST_DEADLINE_MS),
        )
    }

    pub fn retry_policy(&self) -> ProductRetryPolicy {
        ProductRetryPolicy {
            max_attempts: self
                .product_max_attempts
                .unwrap_or(DEFAULT_PRODUCT_MAX_ATTEMPTS),
            retry_delay: Duration::from_millis(
                self.product_retry_delay_ms
                    .unwrap_or(DEFAULT_PRODUCT_RETRY_DELAY_MS),
            ),
        }
    }

    pub fn aggregation_config(&self) -> AggregationConfig {
        AggregationConfig {
            max_concurrency: self
                .aggregation_max_concurrency
                .unwrap_or(DEFAULT_AGGREGATION_MAX_CONCURRENCY),
            limiter_scope: if self.aggregation_shared_limiter {
                LimiterScope::Shared
            } else {
                LimiterScope::PerCall
            },
        }
    }

    /// Pool sizing, rejecting combinations the pool cannot be built with.
    pub fn pool_settings(&self) -> Result<PoolSettings, SettingsError> {
        let max_size = self.db_pool_max_size.unwrap_or(DEFAULT_DB_POOL_MAX_SIZE);
        let min_idle = self.db_pool_min_idle.unwrap_or(DEFAULT_DB_POOL_MIN_IDLE);
        let checkout_timeout = Duration::from_millis(
            self.db_pool_checkout_timeout_ms
                .unwrap_or(DEFAULT_DB_POOL_CHECKOUT_TIMEOUT_MS),
        );

        if max_size == 0 {
            return Err(SettingsError::Invalid {
                field: "db_pool_max_size",
                message: "must be at least 1".to_owned(),
            });
        }
        if min_idle > max_size {
            return Err(SettingsError::Invalid {
                field: "db_pool_min_idle",
                message: format!("must not exceed db_pool_max_size ({max_size})"),
            });
        }
        if checkout_timeout.is_zero() {
            return Err(SettingsError::Invalid {
                field: "db_pool_checkout_timeout_ms",
                message: "must be positive".to_owned(),
            });
        }

        Ok(PoolSettings {
            max_size,
            min_idle,
            checkout_timeout,
        })
    }

    pub fn breaker_config(&self) -> CircuitBreakerConfig {
        let reset_secs = self
            .breaker_closed_reset_interval_secs
            .unwrap_or(DEFAULT_BREAKER_CLOSED_RESET_INTERVAL_SECS);
        CircuitBreakerConfig {
            failure_threshold: self
                .breaker_failure_threshold
                .unwrap_or(DEFAULT_BREAKER_FAILURE_THRESHOLD),
            open_cooldown: Duration::from_secs(
                self.breaker_open_cooldown_secs
                    .unwrap_or(DEFAULT_BREAKER_OPEN_COOLDOWN_SECS),
            ),
            half_open_max_probes: self
                .breaker_half_open_max_probes
                .unwrap_or(DEFAULT_BREAKER_HALF_OPEN_MAX_PROBES),
            half_open_successes_to_close: 1,
            closed_reset_interval: (reset_secs > 0).then(|| Duration::from_secs(reset_secs)),
        }
    }
}
