//! Favourite list and item orchestration.
//!
//! [`FavoritesService`] implements every favourites driving port. Each
//! operation follows the same order: verify the caller, load the list owner,
//! refuse callers who do not own the list, and only then touch persistence or
//! the product aggregator. Every step runs under the request deadline.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use super::ports::{
    FavoriteItemRepository, FavoriteItemRepositoryError, FavoriteItemsCommand,
    FavoriteItemsQuery, FavoriteListRepository, FavoriteListRepositoryError,
    FavoriteListsCommand, FavoriteListsQuery, IdentityVerifier, IdentityVerifierError,
    OwnershipStore, OwnershipStoreError,
};
use super::{
    Deadline, Error, FavoriteItem, FavoriteList, FavoriteListWithProducts, ListId, ListName,
    NewFavoriteItem, NewFavoriteList, Product, ProductAggregator, ProductId, RequestContext, User,
};

/// Port bundle required by the favourites service.
pub struct FavoritesServicePorts {
    /// Resolves bearer tokens to callers.
    pub identity: Arc<dyn IdentityVerifier>,
    /// Answers list ownership lookups.
    pub ownership: Arc<dyn OwnershipStore>,
    /// List persistence.
    pub lists: Arc<dyn FavoriteListRepository>,
    /// Item persistence.
    pub items: Arc<dyn FavoriteItemRepository>,
}

/// Orchestration service behind the favourites HTTP endpoints.
pub struct FavoritesService {
    identity: Arc<dyn IdentityVerifier>,
    ownership: Arc<dyn OwnershipStore>,
    lists: Arc<dyn FavoriteListRepository>,
    items: Arc<dyn FavoriteItemRepository>,
    aggregator: Arc<ProductAggregator>,
}

impl FavoritesService {
    /// Build the service from its ports and product aggregator.
    pub fn new(ports: FavoritesServicePorts, aggregator: Arc<ProductAggregator>) -> Self {
        Self {
            identity: ports.identity,
            ownership: ports.ownership,
            lists: ports.lists,
            items: ports.items,
            aggregator,
        }
    }

    async fn caller(&self, ctx: &RequestContext) -> Result<User, Error> {
        self.identity
            .verify(&ctx.token, ctx.deadline)
            .await
            .map_err(map_identity_error)
    }

    /// Verify the caller and confirm they own `list_id`.
    async fn authorize(&self, ctx: &RequestContext, list_id: ListId) -> Result<User, Error> {
        let user = self.caller(ctx).await?;
        let owner = within(ctx.deadline, self.ownership.list_owner(list_id))
            .await?
            .map_err(map_ownership_error)?;

        if owner.owner != user.id {
            warn!(
                user_id = %user.id,
                list_id = %list_id,
                "caller does not own the favourite list"
            );
            return Err(Error::forbidden("favourite list belongs to another user")
                .with_details(json!({ "listId": list_id })));
        }
        Ok(user)
    }

    async fn products_of(
        &self,
        list_id: ListId,
        deadline: Deadline,
    ) -> Result<Vec<Product>, Error> {
        let items = within(deadline, self.items.items_for_list(list_id))
            .await?
            .map_err(map_item_error)?;
        self.aggregator.resolve_all(&items, deadline).await
    }
}

/// Await a persistence call, turning deadline expiry into a timeout.
async fn within<F>(deadline: Deadline, fut: F) -> Result<F::Output, Error>
where
    F: Future,
{
    deadline
        .run(fut)
        .await
        .map_err(|_| Error::timeout("deadline exceeded while waiting for storage"))
}

fn map_identity_error(error: IdentityVerifierError) -> Error {
    match error {
        IdentityVerifierError::Rejected { message } => {
            Error::unauthorized(format!("bearer token rejected: {message}"))
        }
        IdentityVerifierError::Unavailable { message } => {
            Error::unauthorized(format!("caller could not be verified: {message}"))
        }
        IdentityVerifierError::Timeout { message } => {
            Error::timeout(format!("identity verification timed out: {message}"))
        }
        IdentityVerifierError::CircuitOpen { message } => Error::circuit_open(message),
    }
}

fn map_ownership_error(error: OwnershipStoreError) -> Error {
    match error {
        OwnershipStoreError::NotFound { list_id } => {
            Error::not_found(format!("favourite list {list_id} not found"))
                .with_details(json!({ "listId": list_id }))
        }
        OwnershipStoreError::Connection { message } => {
            Error::service_unavailable(format!("ownership store unavailable: {message}"))
        }
        OwnershipStoreError::Query { message } => {
            Error::internal(format!("ownership store error: {message}"))
        }
    }
}

fn map_list_error(error: FavoriteListRepositoryError) -> Error {
    match error {
        FavoriteListRepositoryError::NotFound { list_id } => {
            Error::not_found(format!("favourite list {list_id} not found"))
                .with_details(json!({ "listId": list_id }))
        }
        FavoriteListRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("list repository unavailable: {message}"))
        }
        FavoriteListRepositoryError::Query { message } => {
            Error::internal(format!("list repository error: {message}"))
        }
    }
}

fn map_item_error(error: FavoriteItemRepositoryError) -> Error {
    let message = error.to_string();
    match error {
        FavoriteItemRepositoryError::NotFound {
            list_id,
            product_id,
        } => Error::not_found(message)
            .with_details(json!({ "listId": list_id, "itemId": product_id })),
        FavoriteItemRepositoryError::Conflict {
            list_id,
            product_id,
        } => Error::conflict(message)
            .with_details(json!({ "listId": list_id, "itemId": product_id })),
        FavoriteItemRepositoryError::Connection { .. } => Error::service_unavailable(message),
        FavoriteItemRepositoryError::Query { .. } => Error::internal(message),
    }
}

#[async_trait]
impl FavoriteListsQuery for FavoritesService {
    async fn lists_with_products(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<FavoriteListWithProducts>, Error> {
        let user = self.caller(ctx).await?;
        let lists = within(ctx.deadline, self.lists.lists_for_user(user.id))
            .await?
            .map_err(map_list_error)?;

        let mut resolved = Vec::with_capacity(lists.len());
        for list in lists {
            let products = self.products_of(list.id, ctx.deadline).await?;
            resolved.push(FavoriteListWithProducts {
                list_id: list.id,
                list_name: list.name,
                products,
            });
        }
        debug!(user_id = %user.id, lists = resolved.len(), "resolved favourite lists");
        Ok(resolved)
    }
}

#[async_trait]
impl FavoriteListsCommand for FavoritesService {
    async fn create_list(
        &self,
        ctx: &RequestContext,
        name: ListName,
    ) -> Result<FavoriteList, Error> {
        let user = self.caller(ctx).await?;
        let created = within(
            ctx.deadline,
            self.lists.create(NewFavoriteList {
                name,
                owner: user.id,
            }),
        )
        .await?
        .map_err(map_list_error)?;
        debug!(user_id = %user.id, list_id = %created.id, "created favourite list");
        Ok(created)
    }

    async fn update_list(
        &self,
        ctx: &RequestContext,
        list_id: ListId,
        name: ListName,
    ) -> Result<FavoriteList, Error> {
        let user = self.authorize(ctx, list_id).await?;
        let updated = within(ctx.deadline, self.lists.rename(list_id, name))
            .await?
            .map_err(map_list_error)?;
        debug!(user_id = %user.id, list_id = %list_id, "renamed favourite list");
        Ok(updated)
    }

    async fn delete_list(&self, ctx: &RequestContext, list_id: ListId) -> Result<(), Error> {
        let user = self.authorize(ctx, list_id).await?;

        let removed_items = match within(ctx.deadline, self.items.delete_for_list(list_id)).await? {
            Ok(count) => count,
            // Storage that reports an empty list as missing rows is still a
            // successful cleanup.
            Err(FavoriteItemRepositoryError::NotFound { .. }) => 0,
            Err(err) => return Err(map_item_error(err)),
        };
        within(ctx.deadline, self.lists.delete(list_id))
            .await?
            .map_err(map_list_error)?;

        debug!(
            user_id = %user.id,
            list_id = %list_id,
            removed_items,
            "deleted favourite list"
        );
        Ok(())
    }
}

#[async_trait]
impl FavoriteItemsQuery for FavoritesService {
    async fn list_products(
        &self,
        ctx: &RequestContext,
        list_id: ListId,
    ) -> Result<Vec<Product>, Error> {
        let user = self.authorize(ctx, list_id).await?;
        let products = self.products_of(list_id, ctx.deadline).await?;
        debug!(
            user_id = %user.id,
            list_id = %list_id,
            products = products.len(),
            "resolved favourite items"
        );
        Ok(products)
    }
}

#[async_trait]
impl FavoriteItemsCommand for FavoritesService {
    async fn add_item(
        &self,
        ctx: &RequestContext,
        item: NewFavoriteItem,
    ) -> Result<FavoriteItem, Error> {
        let user = self.authorize(ctx, item.list_id).await?;
        let created = within(ctx.deadline, self.items.create(item))
            .await?
            .map_err(map_item_error)?;
        debug!(
            user_id = %user.id,
            list_id = %created.list_id,
            product_id = %created.product_id,
            "added favourite item"
        );
        Ok(created)
    }

    async fn remove_item(
        &self,
        ctx: &RequestContext,
        list_id: ListId,
        product_id: ProductId,
    ) -> Result<(), Error> {
        let user = self.authorize(ctx, list_id).await?;
        within(ctx.deadline, self.items.delete(list_id, product_id))
            .await?
            .map_err(map_item_error)?;
        debug!(
            user_id = %user.id,
            list_id = %list_id,
            product_id = %product_id,
            "removed favourite item"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "favorites_service_tests.rs"]
mod tests;
