//! Driving port for reading the products held by one list.

use async_trait::async_trait;

use crate::domain::{Error, ListId, Product, RequestContext};

/// Read side of favourite items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoriteItemsQuery: Send + Sync {
    /// Products referenced by a list the caller owns, in no particular order.
    async fn list_products(
        &self,
        ctx: &RequestContext,
        list_id: ListId,
    ) -> Result<Vec<Product>, Error>;
}

/// Fixture query reporting every list as empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFavoriteItemsQuery;

#[async_trait]
impl FavoriteItemsQuery for FixtureFavoriteItemsQuery {
    async fn list_products(
        &self,
        _ctx: &RequestContext,
        _list_id: ListId,
    ) -> Result<Vec<Product>, Error> {
        Ok(Vec::new())
    }
}
