//! Port for favourite list persistence.
//!
//! Lists are always scoped by owner on read. Ownership is checked by the
//! caller through [`super::OwnershipStore`] before any mutation reaches this
//! port, so mutations here are keyed by list id alone.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{FavoriteList, ListId, ListName, NewFavoriteList, UserId};

define_port_error! {
    /// Errors raised by favourite list repository adapters.
    pub enum FavoriteListRepositoryError {
        /// The targeted list does not exist.
        NotFound { list_id: ListId } =>
            "favourite list {list_id} not found",
        /// Repository connection could not be established.
        Connection { message: String } =>
            "favourite list repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "favourite list repository query failed: {message}",
    }
}

/// Storage contract for favourite lists.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoriteListRepository: Send + Sync {
    /// Every list owned by `owner`, oldest first. An empty result is not an
    /// error.
    async fn lists_for_user(
        &self,
        owner: UserId,
    ) -> Result<Vec<FavoriteList>, FavoriteListRepositoryError>;

    /// Persist a new list and return it with its assigned id.
    async fn create(&self, list: NewFavoriteList)
    -> Result<FavoriteList, FavoriteListRepositoryError>;

    /// Replace the name of `list_id`.
    ///
    /// Returns `NotFound` when no row was updated.
    async fn rename(
        &self,
        list_id: ListId,
        name: ListName,
    ) -> Result<FavoriteList, FavoriteListRepositoryError>;

    /// Remove `list_id`.
    ///
    /// Returns `NotFound` when no row was deleted.
    async fn delete(&self, list_id: ListId) -> Result<(), FavoriteListRepositoryError>;
}
