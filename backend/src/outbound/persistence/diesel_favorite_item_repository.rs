//! PostgreSQL-backed favourite item repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{FavoriteItemRepository, FavoriteItemRepositoryError};
use crate::domain::{FavoriteItem, ListId, NewFavoriteItem, ProductId};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{FavoriteItemRow, NewFavoriteItemRow};
use super::pool::DbPool;
use super::schema::favorite_items;

/// Diesel implementation of [`FavoriteItemRepository`].
#[derive(Clone)]
pub struct DieselFavoriteItemRepository {
    pool: DbPool,
}

impl DieselFavoriteItemRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn item_error(error: diesel::result::Error) -> FavoriteItemRepositoryError {
    map_diesel_error(
        error,
        FavoriteItemRepositoryError::query,
        FavoriteItemRepositoryError::connection,
    )
}

fn item_from_row(row: FavoriteItemRow) -> Result<FavoriteItem, FavoriteItemRepositoryError> {
    row.into_domain().map_err(FavoriteItemRepositoryError::query)
}

/// A duplicate `(list_id, item_id)` key means the product is already saved.
fn insert_error(
    error: diesel::result::Error,
    item: NewFavoriteItem,
) -> FavoriteItemRepositoryError {
    if is_unique_violation(&error) {
        FavoriteItemRepositoryError::conflict(item.list_id, item.product_id)
    } else {
        item_error(error)
    }
}

fn single_row_deleted(
    deleted: usize,
    list_id: ListId,
    product_id: ProductId,
) -> Result<(), FavoriteItemRepositoryError> {
    if deleted == 0 {
        return Err(FavoriteItemRepositoryError::not_found(list_id, product_id));
    }
    Ok(())
}

#[async_trait]
impl FavoriteItemRepository for DieselFavoriteItemRepository {
    async fn items_for_list(
        &self,
        list_id: ListId,
    ) -> Result<Vec<FavoriteItem>, FavoriteItemRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, FavoriteItemRepositoryError::connection))?;

        let rows: Vec<FavoriteItemRow> = favorite_items::table
            .filter(favorite_items::list_id.eq(list_id.get()))
            .order(favorite_items::created_at.asc())
            .select(FavoriteItemRow::as_select())
            .load(&mut conn)
            .await
            .map_err(item_error)?;

        rows.into_iter().map(item_from_row).collect()
    }

    async fn create(
        &self,
        item: NewFavoriteItem,
    ) -> Result<FavoriteItem, FavoriteItemRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, FavoriteItemRepositoryError::connection))?;

        let row: FavoriteItemRow = diesel::insert_into(favorite_items::table)
            .values(NewFavoriteItemRow {
                list_id: item.list_id.get(),
                item_id: item.product_id.get(),
            })
            .returning(FavoriteItemRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| insert_error(err, item))?;

        item_from_row(row)
    }

    async fn delete(
        &self,
        list_id: ListId,
        product_id: ProductId,
    ) -> Result<(), FavoriteItemRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, FavoriteItemRepositoryError::connection))?;

        let deleted = diesel::delete(favorite_items::table.find((list_id.get(), product_id.get())))
            .execute(&mut conn)
            .await
            .map_err(item_error)?;

        single_row_deleted(deleted, list_id, product_id)
    }

    async fn delete_for_list(&self, list_id: ListId) -> Result<usize, FavoriteItemRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, FavoriteItemRepositoryError::connection))?;

        diesel::delete(favorite_items::table.filter(favorite_items::list_id.eq(list_id.get())))
            .execute(&mut conn)
            .await
            .map_err(item_error)
    }
}
