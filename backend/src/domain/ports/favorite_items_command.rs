//! Driving port for adding products to and removing them from lists.

use async_trait::async_trait;
use chrono::DateTime;

use crate::domain::{Error, FavoriteItem, ListId, NewFavoriteItem, ProductId, RequestContext};

/// Write side of favourite items. Every call is refused unless the caller
/// owns the targeted list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoriteItemsCommand: Send + Sync {
    /// Store a product reference in a list.
    async fn add_item(
        &self,
        ctx: &RequestContext,
        item: NewFavoriteItem,
    ) -> Result<FavoriteItem, Error>;

    /// Remove a product reference. Removing an absent pair is `NotFound`.
    async fn remove_item(
        &self,
        ctx: &RequestContext,
        list_id: ListId,
        product_id: ProductId,
    ) -> Result<(), Error>;
}

/// Fixture command accepting every change without storing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFavoriteItemsCommand;

#[async_trait]
impl FavoriteItemsCommand for FixtureFavoriteItemsCommand {
    async fn add_item(
        &self,
        _ctx: &RequestContext,
        item: NewFavoriteItem,
    ) -> Result<FavoriteItem, Error> {
        Ok(FavoriteItem {
            list_id: item.list_id,
            product_id: item.product_id,
            created_at: DateTime::UNIX_EPOCH,
        })
    }

    async fn remove_item(
        &self,
        _ctx: &RequestContext,
        _list_id: ListId,
        _product_id: ProductId,
    ) -> Result<(), Error> {
        Ok(())
    }
}
