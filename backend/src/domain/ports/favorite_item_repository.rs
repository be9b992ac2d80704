//! Port for favourite item persistence.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{FavoriteItem, ListId, NewFavoriteItem, ProductId};

define_port_error! {
    /// Errors raised by favourite item repository adapters.
    pub enum FavoriteItemRepositoryError {
        /// No item matches the `(list_id, product_id)` pair.
        NotFound { list_id: ListId, product_id: ProductId } =>
            "product {product_id} is not in favourite list {list_id}",
        /// The product is already in the list.
        Conflict { list_id: ListId, product_id: ProductId } =>
            "product {product_id} is already in favourite list {list_id}",
        /// Repository connection could not be established.
        Connection { message: String } =>
            "favourite item repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "favourite item repository query failed: {message}",
    }
}

/// Storage contract for the items held by favourite lists.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoriteItemRepository: Send + Sync {
    /// Items stored in `list_id`. A list without items yields an empty vector.
    async fn items_for_list(
        &self,
        list_id: ListId,
    ) -> Result<Vec<FavoriteItem>, FavoriteItemRepositoryError>;

    /// Store a product reference in a list.
    async fn create(
        &self,
        item: NewFavoriteItem,
    ) -> Result<FavoriteItem, FavoriteItemRepositoryError>;

    /// Remove one item. Zero affected rows is `NotFound`.
    async fn delete(
        &self,
        list_id: ListId,
        product_id: ProductId,
    ) -> Result<(), FavoriteItemRepositoryError>;

    /// Remove every item of `list_id` and report how many went.
    ///
    /// Zero is a valid answer: the list may have been empty.
    async fn delete_for_list(&self, list_id: ListId) -> Result<usize, FavoriteItemRepositoryError>;
}
