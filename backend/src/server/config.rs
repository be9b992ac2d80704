//! HTTP server configuration object.

use std::net::SocketAddr;
use std::time::Duration;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;
use reqwest::Url;

use favorites::domain::{AggregationConfig, CircuitBreakerConfig, ProductRetryPolicy};
use favorites::outbound::persistence::DbPool;
use favorites::settings::{AppSettings, SettingsError};

/// Upstream endpoints and their per-call timeouts.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub user_service_url: Url,
    pub identity_timeout: Duration,
    pub product_service_url: Url,
    pub product_timeout: Duration,
}

/// Tuning for the resilience components wrapped around the upstreams.
#[derive(Debug, Clone, Copy)]
pub struct ResilienceConfig {
    pub breaker: CircuitBreakerConfig,
    pub retry: ProductRetryPolicy,
    pub aggregation: AggregationConfig,
    pub request_deadline: Duration,
}

/// Everything needed to start the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) upstream: UpstreamConfig,
    pub(crate) resilience: ResilienceConfig,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Resolve settings into a server configuration using `db_pool`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the bind address or an upstream URL is
    /// missing or malformed.
    pub fn from_settings(settings: &AppSettings, db_pool: DbPool) -> Result<Self, SettingsError> {
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            db_pool,
            upstream: UpstreamConfig {
                user_service_url: settings.user_service_url()?,
                identity_timeout: settings.identity_timeout(),
                product_service_url: settings.product_service_url()?,
                product_timeout: settings.product_timeout(),
            },
            resilience: ResilienceConfig {
                breaker: settings.breaker_config(),
                retry: settings.retry_policy(),
                aggregation: settings.aggregation_config(),
                request_deadline: settings.request_deadline(),
            },
            #[cfg(feature = "metrics")]
            prometheus: None,
        })
    }

    /// Attach Prometheus middleware.
    #[cfg(feature = "metrics")]
    #[must_use]
    pub fn with_metrics(mut self, prometheus: PrometheusMetrics) -> Self {
        self.prometheus = Some(prometheus);
        self
    }

    /// Socket address the server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
