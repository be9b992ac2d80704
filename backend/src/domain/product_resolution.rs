//! Product resolution with a bounded, fixed-delay retry loop.
//!
//! [`RetryingProductResolver`] turns single-attempt [`ProductSource`] lookups
//! into the [`ProductResolver`] contract used by aggregation:
//! - remote absence is returned at once, never retried;
//! - every other failure is retried after `retry_delay`, up to
//!   `max_attempts` attempts in total, with no wait after the last one;
//! - the request deadline bounds both attempts and waits, and its expiry
//!   always surfaces as a timeout.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::ports::{ProductResolutionError, ProductResolver, ProductSource, ProductSourceError};
use super::{Deadline, Product, ProductId};

/// Retry tuning for product lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductRetryPolicy {
    /// Total attempts, including the first. Values below one are treated as one.
    pub max_attempts: u32,
    /// Fixed wait between attempts.
    pub retry_delay: Duration,
}

impl Default for ProductRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(2),
        }
    }
}

/// Suspends the retry loop between attempts.
#[async_trait]
pub trait RetrySleeper: Send + Sync {
    /// Wait for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Tokio-based sleeper used outside tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl RetrySleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// [`ProductResolver`] retrying transient [`ProductSource`] failures.
pub struct RetryingProductResolver {
    source: Arc<dyn ProductSource>,
    policy: ProductRetryPolicy,
    sleeper: Arc<dyn RetrySleeper>,
}

impl RetryingProductResolver {
    /// Build a resolver that waits with Tokio timers.
    pub fn new(source: Arc<dyn ProductSource>, policy: ProductRetryPolicy) -> Self {
        Self::with_sleeper(source, policy, Arc::new(TokioSleeper))
    }

    /// Build a resolver with an injected sleeper.
    pub fn with_sleeper(
        source: Arc<dyn ProductSource>,
        policy: ProductRetryPolicy,
        sleeper: Arc<dyn RetrySleeper>,
    ) -> Self {
        Self {
            source,
            policy,
            sleeper,
        }
    }
}

fn deadline_error(product_id: ProductId) -> ProductResolutionError {
    ProductResolutionError::timeout(format!(
        "deadline exceeded while resolving product {product_id}"
    ))
}

#[async_trait]
impl ProductResolver for RetryingProductResolver {
    async fn resolve(
        &self,
        id: ProductId,
        deadline: Deadline,
    ) -> Result<Product, ProductResolutionError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0_u32;

        loop {
            attempt += 1;
            let last_error = match deadline
                .run(self.source.fetch_product(id))
                .await
                .map_err(|_| deadline_error(id))?
            {
                Ok(product) => return Ok(product),
                Err(ProductSourceError::NotFound { product_id }) => {
                    return Err(ProductResolutionError::not_found(product_id));
                }
                Err(err) => err,
            };

            if attempt >= max_attempts {
                warn!(product_id = %id, attempts = attempt, error = %last_error, "product lookup exhausted retries");
                return Err(ProductResolutionError::exhausted(id, attempt, last_error));
            }

            debug!(product_id = %id, attempt, error = %last_error, "retrying product lookup");
            deadline
                .run(self.sleeper.sleep(self.policy.retry_delay))
                .await
                .map_err(|_| deadline_error(id))?;
        }
    }
}

#[cfg(test)]
#[path = "product_resolution_tests.rs"]
mod tests;
