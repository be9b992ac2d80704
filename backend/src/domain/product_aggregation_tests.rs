//! Tests for bounded product aggregation.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rstest::rstest;

use super::*;
use crate::domain::ports::{MockProductResolver, ProductSourceError};
use crate::domain::{ErrorCode, ListId, ProductId};

fn product_id(raw: i32) -> ProductId {
    ProductId::new(raw).expect("valid product id")
}

fn product(raw: i32) -> Product {
    Product {
        id: product_id(raw),
        name: format!("product {raw}"),
        price: f64::from(raw) * 1.5,
        stock: raw,
    }
}

fn items(raw_ids: &[i32]) -> Vec<FavoriteItem> {
    let list_id = ListId::new(1).expect("valid list id");
    raw_ids
        .iter()
        .map(|raw| FavoriteItem {
            list_id,
            product_id: product_id(*raw),
            created_at: Utc::now(),
        })
        .collect()
}

fn ids(products: &[Product]) -> BTreeSet<i32> {
    products.iter().map(|product| product.id.get()).collect()
}

fn deadline() -> Deadline {
    Deadline::after(Duration::from_secs(60))
}

/// Resolver that sleeps for `delay` and tracks how many lookups overlap.
#[derive(Default)]
struct InstrumentedResolver {
    delay: Duration,
    slow: HashMap<i32, Duration>,
    failures: HashMap<i32, ProductResolutionError>,
    panics_on: Option<i32>,
    calls: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
    trace_ids: Mutex<Vec<Option<TraceId>>>,
}

impl InstrumentedResolver {
    fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    fn failing(mut self, raw: i32, error: ProductResolutionError) -> Self {
        self.failures.insert(raw, error);
        self
    }

    fn slow(mut self, raw: i32, delay: Duration) -> Self {
        self.slow.insert(raw, delay);
        self
    }

    fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductResolver for InstrumentedResolver {
    async fn resolve(
        &self,
        id: ProductId,
        _deadline: Deadline,
    ) -> Result<Product, ProductResolutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.trace_ids.lock() {
            Ok(mut seen) => seen.push(TraceId::current()),
            Err(_) => panic!("trace id mutex"),
        }
        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now_active, Ordering::SeqCst);
        let delay = self.slow.get(&id.get()).copied().unwrap_or(self.delay);
        tokio::time::sleep(delay).await;
        self.active.fetch_sub(1, Ordering::SeqCst);

        if self.panics_on == Some(id.get()) {
            panic!("resolver exploded for product {id}");
        }
        match self.failures.get(&id.get()) {
            Some(error) => Err(error.clone()),
            None => Ok(product(id.get())),
        }
    }
}

fn aggregator(resolver: &Arc<InstrumentedResolver>, config: AggregationConfig) -> ProductAggregator {
    ProductAggregator::new(resolver.clone(), config)
}

#[tokio::test]
async fn empty_input_resolves_to_empty_output() {
    let mut resolver = MockProductResolver::new();
    resolver.expect_resolve().never();
    let aggregator = ProductAggregator::new(Arc::new(resolver), AggregationConfig::default());

    let products = aggregator.resolve_all(&[], deadline()).await;

    assert_eq!(products, Ok(Vec::new()));
}

#[tokio::test(start_paused = true)]
async fn resolves_every_item_without_exceeding_the_cap() {
    let resolver = Arc::new(InstrumentedResolver::with_delay(Duration::from_millis(100)));
    let aggregator = aggregator(&resolver, AggregationConfig::default());

    let products = aggregator
        .resolve_all(&items(&[1, 2, 3, 4, 5]), deadline())
        .await
        .expect("all lookups succeed");

    assert_eq!(ids(&products), BTreeSet::from([1, 2, 3, 4, 5]));
    assert_eq!(resolver.calls(), 5);
    assert_eq!(resolver.max_active(), 2);
}

#[rstest]
#[case(1)]
#[case(3)]
#[tokio::test(start_paused = true)]
async fn honours_configured_concurrency(#[case] max_concurrency: usize) {
    let resolver = Arc::new(InstrumentedResolver::with_delay(Duration::from_millis(50)));
    let aggregator = aggregator(
        &resolver,
        AggregationConfig {
            max_concurrency,
            limiter_scope: LimiterScope::PerCall,
        },
    );

    aggregator
        .resolve_all(&items(&[1, 2, 3, 4, 5, 6]), deadline())
        .await
        .expect("all lookups succeed");

    assert_eq!(resolver.max_active(), max_concurrency);
}

#[tokio::test(start_paused = true)]
async fn repeated_resolution_yields_the_same_set() {
    let resolver = Arc::new(InstrumentedResolver::with_delay(Duration::from_millis(10)));
    let aggregator = aggregator(&resolver, AggregationConfig::default());
    let items = items(&[10, 20, 30]);

    let first = aggregator.resolve_all(&items, deadline()).await.expect("first run");
    let second = aggregator.resolve_all(&items, deadline()).await.expect("second run");

    assert_eq!(ids(&first), ids(&second));
}

#[tokio::test(start_paused = true)]
async fn first_failure_fails_the_whole_call() {
    let resolver = Arc::new(
        InstrumentedResolver::with_delay(Duration::from_millis(10))
            .failing(2, ProductResolutionError::not_found(product_id(2))),
    );
    let aggregator = aggregator(&resolver, AggregationConfig::default());

    let err = aggregator
        .resolve_all(&items(&[1, 2, 3, 4]), deadline())
        .await
        .expect_err("one lookup fails");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.details(), Some(&json!({ "productId": 2 })));
}

#[tokio::test(start_paused = true)]
async fn exhausted_lookups_surface_resolution_failures() {
    let exhausted = ProductResolutionError::exhausted(
        product_id(3),
        3_u32,
        ProductSourceError::status("502 Bad Gateway"),
    );
    let resolver = Arc::new(
        InstrumentedResolver::with_delay(Duration::from_millis(10)).failing(3, exhausted),
    );
    let aggregator = aggregator(&resolver, AggregationConfig::default());

    let err = aggregator
        .resolve_all(&items(&[3, 4]), deadline())
        .await
        .expect_err("lookup exhausted");

    assert_eq!(err.code(), ErrorCode::ResolutionFailed);
    let details = err.details().expect("details recorded");
    assert_eq!(details["productId"], 3);
    assert_eq!(details["attempts"], 3);
}

#[tokio::test(start_paused = true)]
async fn queued_lookups_are_skipped_after_a_failure() {
    let resolver = Arc::new(
        InstrumentedResolver::with_delay(Duration::from_millis(10))
            .failing(1, ProductResolutionError::timeout("stalled")),
    );
    let aggregator = aggregator(
        &resolver,
        AggregationConfig {
            max_concurrency: 1,
            limiter_scope: LimiterScope::PerCall,
        },
    );

    let err = aggregator
        .resolve_all(&items(&[1, 2, 3, 4]), deadline())
        .await
        .expect_err("first lookup fails");
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(err.code(), ErrorCode::Timeout);
    assert!(resolver.calls() <= 2, "queued lookups must not reach the resolver");
}

#[tokio::test(start_paused = true)]
async fn deadline_expiry_abandons_outstanding_lookups() {
    let resolver = Arc::new(InstrumentedResolver::with_delay(Duration::from_secs(30)));
    let aggregator = aggregator(&resolver, AggregationConfig::default());

    let err = aggregator
        .resolve_all(&items(&[1, 2, 3]), Deadline::after(Duration::from_secs(1)))
        .await
        .expect_err("deadline fires first");

    assert_eq!(err.code(), ErrorCode::Timeout);
    assert_eq!(resolver.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn panicking_lookup_is_an_internal_error() {
    let resolver = Arc::new(InstrumentedResolver {
        delay: Duration::from_millis(1),
        panics_on: Some(7),
        ..InstrumentedResolver::default()
    });
    let aggregator = aggregator(&resolver, AggregationConfig::default());

    let err = aggregator
        .resolve_all(&items(&[7]), deadline())
        .await
        .expect_err("lookup panicked");

    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[tokio::test(start_paused = true)]
async fn shared_limiter_bounds_concurrent_calls() {
    let resolver = Arc::new(InstrumentedResolver::with_delay(Duration::from_millis(100)));
    let aggregator = aggregator(
        &resolver,
        AggregationConfig {
            max_concurrency: 2,
            limiter_scope: LimiterScope::Shared,
        },
    );
    let first_items = items(&[1, 2, 3]);
    let second_items = items(&[4, 5, 6]);

    let (first, second) = tokio::join!(
        aggregator.resolve_all(&first_items, deadline()),
        aggregator.resolve_all(&second_items, deadline()),
    );

    assert!(first.is_ok() && second.is_ok());
    assert_eq!(resolver.max_active(), 2);
}

#[tokio::test(start_paused = true)]
async fn detached_lookups_give_back_shared_permits() {
    let resolver = Arc::new(
        InstrumentedResolver::with_delay(Duration::from_millis(100))
            .failing(1, ProductResolutionError::not_found(product_id(1)))
            .slow(2, Duration::from_secs(3600)),
    );
    let aggregator = aggregator(
        &resolver,
        AggregationConfig {
            max_concurrency: 2,
            limiter_scope: LimiterScope::Shared,
        },
    );

    aggregator
        .resolve_all(&items(&[1, 2]), deadline())
        .await
        .expect_err("product 1 is missing");
    assert_eq!(resolver.active(), 1, "the slow lookup keeps running");

    let products = aggregator
        .resolve_all(
            &items(&[3, 4]),
            Deadline::after(Duration::from_millis(150)),
        )
        .await
        .expect("both permits are free again");
    assert_eq!(ids(&products), BTreeSet::from([3, 4]));

    tokio::time::sleep(Duration::from_secs(3600)).await;
    assert_eq!(resolver.active(), 0);
    assert_eq!(resolver.calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn per_call_limiters_are_independent() {
    let resolver = Arc::new(InstrumentedResolver::with_delay(Duration::from_millis(100)));
    let aggregator = aggregator(&resolver, AggregationConfig::default());
    let first_items = items(&[1, 2, 3]);
    let second_items = items(&[4, 5, 6]);

    let (first, second) = tokio::join!(
        aggregator.resolve_all(&first_items, deadline()),
        aggregator.resolve_all(&second_items, deadline()),
    );

    assert!(first.is_ok() && second.is_ok());
    assert_eq!(resolver.max_active(), 4);
}

#[tokio::test(start_paused = true)]
async fn lookups_inherit_the_callers_trace_id() {
    let resolver = Arc::new(InstrumentedResolver::with_delay(Duration::from_millis(5)));
    let aggregator = aggregator(&resolver, AggregationConfig::default());
    let trace_id = TraceId::generate();

    TraceId::scope(trace_id, aggregator.resolve_all(&items(&[1, 2]), deadline()))
        .await
        .expect("lookups succeed");

    let seen = match resolver.trace_ids.lock() {
        Ok(seen) => seen.clone(),
        Err(_) => panic!("trace id mutex"),
    };
    assert_eq!(seen, vec![Some(trace_id), Some(trace_id)]);
}
