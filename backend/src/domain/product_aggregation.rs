//! Bounded concurrent resolution of favourite items into products.
//!
//! [`ProductAggregator::resolve_all`] fans out one lookup per item on a Tokio
//! [`JoinSet`], with a [`Semaphore`] capping how many lookups are outstanding
//! at once. The call is fail-fast: the first failed lookup is returned and
//! every product resolved so far is discarded. Lookups already running are
//! detached and left to finish, but hand their permit back straight away so a
//! shared limit is not held by work nobody will read; lookups still waiting
//! for a permit give up without calling the resolver. When the request deadline fires, every task
//! is aborted and the call returns a timeout.
//!
//! Products come back in completion order, which is unrelated to the order of
//! the input items.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::{Semaphore, watch};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, warn};

use super::ports::{ProductResolutionError, ProductResolver};
use super::{Deadline, Error, FavoriteItem, Product, TraceId};

/// Which lookups share a concurrency limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LimiterScope {
    /// Each `resolve_all` call gets its own limit.
    #[default]
    PerCall,
    /// One limit bounds every lookup in the process.
    Shared,
}

/// Aggregation tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationConfig {
    /// Maximum outstanding lookups. Values below one are treated as one.
    pub max_concurrency: usize,
    /// Scope of the limit.
    pub limiter_scope: LimiterScope,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 2,
            limiter_scope: LimiterScope::PerCall,
        }
    }
}

type Lookup = Option<Result<Product, ProductResolutionError>>;

/// Concurrency-bounded fan-out over a [`ProductResolver`].
pub struct ProductAggregator {
    resolver: Arc<dyn ProductResolver>,
    max_concurrency: usize,
    shared_limiter: Option<Arc<Semaphore>>,
}

impl ProductAggregator {
    /// Build an aggregator over `resolver`.
    pub fn new(resolver: Arc<dyn ProductResolver>, config: AggregationConfig) -> Self {
        let max_concurrency = config.max_concurrency.max(1);
        let shared_limiter = match config.limiter_scope {
            LimiterScope::PerCall => None,
            LimiterScope::Shared => Some(Arc::new(Semaphore::new(max_concurrency))),
        };
        Self {
            resolver,
            max_concurrency,
            shared_limiter,
        }
    }

    /// Resolve every item's product, or fail with the first lookup error.
    ///
    /// # Errors
    ///
    /// - `not_found` when the catalogue has no such product.
    /// - `resolution_failed` when a lookup exhausted its retries.
    /// - `timeout` when `deadline` fires first.
    /// - `internal_error` when a lookup task panicked.
    pub async fn resolve_all(
        &self,
        items: &[FavoriteItem],
        deadline: Deadline,
    ) -> Result<Vec<Product>, Error> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let limiter = self
            .shared_limiter
            .clone()
            .unwrap_or_else(|| Arc::new(Semaphore::new(self.max_concurrency)));
        let (abandon, abandoned) = watch::channel(false);
        let trace_id = TraceId::current();
        let mut tasks = JoinSet::new();

        for item in items {
            let resolver = Arc::clone(&self.resolver);
            let limiter = Arc::clone(&limiter);
            let mut abandoned = abandoned.clone();
            let product_id = item.product_id;
            let lookup = async move {
                let permit = limiter.acquire_owned().await.ok()?;
                if *abandoned.borrow() {
                    return None;
                }

                let resolution = resolver.resolve(product_id, deadline);
                tokio::pin!(resolution);
                let abandonment = async {
                    let _ = abandoned.wait_for(|gone| *gone).await;
                };
                tokio::select! {
                    outcome = &mut resolution => return Some(outcome),
                    () = abandonment => {}
                }

                drop(permit);
                let _ = resolution.await;
                None
            };
            tasks.spawn(async move {
                match trace_id {
                    Some(id) => TraceId::scope(id, lookup).await,
                    None => lookup.await,
                }
            });
        }

        let collected = deadline
            .run(collect(&mut tasks, &abandon, items.len()))
            .await;
        match collected {
            Ok(outcome) => outcome,
            Err(_) => {
                tasks.abort_all();
                warn!(items = items.len(), "product aggregation hit the request deadline");
                Err(Error::timeout("deadline exceeded while resolving products"))
            }
        }
    }
}

async fn collect(
    tasks: &mut JoinSet<Lookup>,
    abandon: &watch::Sender<bool>,
    expected: usize,
) -> Result<Vec<Product>, Error> {
    let mut products = Vec::with_capacity(expected);
    while let Some(joined) = tasks.join_next().await {
        let failure = match joined {
            Ok(Some(Ok(product))) => {
                products.push(product);
                continue;
            }
            Ok(Some(Err(err))) => map_resolution_error(err),
            Ok(None) => continue,
            Err(err) => map_join_error(&err),
        };

        abandon.send_replace(true);
        tasks.detach_all();
        debug!(
            resolved = products.len(),
            expected, "discarding partial products after a failed lookup"
        );
        return Err(failure);
    }
    Ok(products)
}

fn map_resolution_error(error: ProductResolutionError) -> Error {
    let message = error.to_string();
    match error {
        ProductResolutionError::NotFound { product_id } => {
            Error::not_found(message).with_details(json!({ "productId": product_id }))
        }
        ProductResolutionError::Exhausted {
            product_id,
            attempts,
            last_error,
        } => Error::resolution_failed(message).with_details(json!({
            "productId": product_id,
            "attempts": attempts,
            "lastError": last_error.to_string(),
        })),
        ProductResolutionError::Timeout { .. } => Error::timeout(message),
    }
}

fn map_join_error(error: &JoinError) -> Error {
    Error::internal(format!("product lookup task failed: {error}"))
}

#[cfg(test)]
#[path = "product_aggregation_tests.rs"]
mod tests;
