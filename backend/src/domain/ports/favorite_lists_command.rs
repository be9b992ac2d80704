//! Driving port for creating, renaming and deleting favourite lists.

use async_trait::async_trait;
use chrono::DateTime;

use crate::domain::{Error, FavoriteList, ListId, ListName, RequestContext, UserId};

/// Write side of favourite lists.
///
/// The owner of a new list is always the verified caller; mutations on an
/// existing list are refused unless the caller owns it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoriteListsCommand: Send + Sync {
    /// Create a list owned by the caller.
    async fn create_list(&self, ctx: &RequestContext, name: ListName)
    -> Result<FavoriteList, Error>;

    /// Rename a list the caller owns.
    async fn update_list(
        &self,
        ctx: &RequestContext,
        list_id: ListId,
        name: ListName,
    ) -> Result<FavoriteList, Error>;

    /// Delete a list the caller owns together with all of its items.
    async fn delete_list(&self, ctx: &RequestContext, list_id: ListId) -> Result<(), Error>;
}

/// Fixture command echoing its inputs back as list id 1 owned by user 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFavoriteListsCommand;

impl FixtureFavoriteListsCommand {
    fn list(id: ListId, name: ListName) -> Result<FavoriteList, Error> {
        let owner = UserId::new(1).map_err(|err| Error::internal(err.to_string()))?;
        Ok(FavoriteList {
            id,
            name,
            owner,
            created_at: DateTime::UNIX_EPOCH,
        })
    }
}

#[async_trait]
impl FavoriteListsCommand for FixtureFavoriteListsCommand {
    async fn create_list(
        &self,
        _ctx: &RequestContext,
        name: ListName,
    ) -> Result<FavoriteList, Error> {
        let id = ListId::new(1).map_err(|err| Error::internal(err.to_string()))?;
        Self::list(id, name)
    }

    async fn update_list(
        &self,
        _ctx: &RequestContext,
        list_id: ListId,
        name: ListName,
    ) -> Result<FavoriteList, Error> {
        Self::list(list_id, name)
    }

    async fn delete_list(&self, _ctx: &RequestContext, _list_id: ListId) -> Result<(), Error> {
        Ok(())
    }
}
