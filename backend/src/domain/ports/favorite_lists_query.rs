//! Driving port for reading a caller's lists together with their products.

use async_trait::async_trait;

use crate::domain::{Error, FavoriteListWithProducts, RequestContext};

/// Read side of favourite lists, consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoriteListsQuery: Send + Sync {
    /// Every list owned by the caller with its products resolved.
    ///
    /// # Errors
    ///
    /// Fails as a whole when the caller cannot be verified or when resolving
    /// the products of any single list fails.
    async fn lists_with_products(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<FavoriteListWithProducts>, Error>;
}

/// Fixture query reporting a caller without lists.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFavoriteListsQuery;

#[async_trait]
impl FavoriteListsQuery for FixtureFavoriteListsQuery {
    async fn lists_with_products(
        &self,
        _ctx: &RequestContext,
    ) -> Result<Vec<FavoriteListWithProducts>, Error> {
        Ok(Vec::new())
    }
}
