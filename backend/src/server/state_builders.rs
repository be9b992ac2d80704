//! Wiring of adapters, resilience components and the favourites service
//! into HTTP state.

use std::sync::Arc;

use favorites::domain::ports::{IdentityVerifier, ProductResolver};
use favorites::domain::{
    CircuitBreaker, CircuitBreakingIdentityVerifier, FavoritesService, FavoritesServicePorts,
    ProductAggregator, RetryingProductResolver,
};
use favorites::inbound::http::state::{HttpState, HttpStatePorts};
use favorites::outbound::catalogue::HttpProductSource;
use favorites::outbound::identity::HttpIdentityVerifier;
use favorites::outbound::persistence::{
    DbPool, DieselFavoriteItemRepository, DieselFavoriteListRepository,
};
use favorites::outbound::upstream::UpstreamClientError;
use mockable::DefaultClock;

use super::config::{ResilienceConfig, UpstreamConfig};

/// Identity verifier guarded by the process-wide circuit breaker.
fn build_identity(
    upstream: &UpstreamConfig,
    resilience: &ResilienceConfig,
) -> Result<Arc<dyn IdentityVerifier>, UpstreamClientError> {
    let http = HttpIdentityVerifier::new(&upstream.user_service_url, upstream.identity_timeout)?;
    let breaker = CircuitBreaker::new(
        "identity",
        resilience.breaker,
        Arc::new(DefaultClock),
    );
    Ok(Arc::new(CircuitBreakingIdentityVerifier::new(
        Arc::new(http),
        Arc::new(breaker),
    )))
}

/// Product resolver retrying single catalogue lookups.
fn build_resolver(
    upstream: &UpstreamConfig,
    resilience: &ResilienceConfig,
) -> Result<Arc<dyn ProductResolver>, UpstreamClientError> {
    let source = HttpProductSource::new(&upstream.product_service_url, upstream.product_timeout)?;
    Ok(Arc::new(RetryingProductResolver::new(
        Arc::new(source),
        resilience.retry,
    )))
}

/// Build the HTTP state backed by PostgreSQL and the two upstream services.
///
/// The breaker and, when configured as shared, the lookup limiter are created
/// once here and live for the whole process.
pub(crate) fn build_http_state(
    pool: &DbPool,
    upstream: &UpstreamConfig,
    resilience: &ResilienceConfig,
) -> Result<HttpState, UpstreamClientError> {
    let lists = Arc::new(DieselFavoriteListRepository::new(pool.clone()));
    let items = Arc::new(DieselFavoriteItemRepository::new(pool.clone()));
    let aggregator = Arc::new(ProductAggregator::new(
        build_resolver(upstream, resilience)?,
        resilience.aggregation,
    ));

    let service = Arc::new(FavoritesService::new(
        FavoritesServicePorts {
            identity: build_identity(upstream, resilience)?,
            ownership: lists.clone(),
            lists,
            items,
        },
        aggregator,
    ));

    Ok(HttpState::new(
        HttpStatePorts {
            lists: service.clone(),
            lists_query: service.clone(),
            items: service.clone(),
            items_query: service,
        },
        resilience.request_deadline,
    ))
}
