//! PostgreSQL-backed favourite list repository and ownership store.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    FavoriteListRepository, FavoriteListRepositoryError, OwnershipStore, OwnershipStoreError,
};
use crate::domain::{FavoriteList, ListId, ListName, ListOwner, NewFavoriteList, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{FavoriteListRow, NewFavoriteListRow};
use super::pool::DbPool;
use super::schema::favorite_lists;

/// Diesel implementation of [`FavoriteListRepository`] and [`OwnershipStore`].
#[derive(Clone)]
pub struct DieselFavoriteListRepository {
    pool: DbPool,
}

impl DieselFavoriteListRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn list_error(error: diesel::result::Error) -> FavoriteListRepositoryError {
    map_diesel_error(
        error,
        FavoriteListRepositoryError::query,
        FavoriteListRepositoryError::connection,
    )
}

fn list_from_row(row: FavoriteListRow) -> Result<FavoriteList, FavoriteListRepositoryError> {
    row.into_domain().map_err(FavoriteListRepositoryError::query)
}

fn renamed(
    row: Option<FavoriteListRow>,
    list_id: ListId,
) -> Result<FavoriteList, FavoriteListRepositoryError> {
    row.map_or_else(
        || Err(FavoriteListRepositoryError::not_found(list_id)),
        list_from_row,
    )
}

fn single_row_deleted(deleted: usize, list_id: ListId) -> Result<(), FavoriteListRepositoryError> {
    if deleted == 0 {
        return Err(FavoriteListRepositoryError::not_found(list_id));
    }
    Ok(())
}

fn owner_of(owner: Option<i32>, list_id: ListId) -> Result<ListOwner, OwnershipStoreError> {
    let owner = owner.ok_or_else(|| OwnershipStoreError::not_found(list_id))?;
    Ok(ListOwner {
        list_id,
        owner: UserId::new(owner).map_err(|err| OwnershipStoreError::query(err.to_string()))?,
    })
}

#[async_trait]
impl FavoriteListRepository for DieselFavoriteListRepository {
    async fn lists_for_user(
        &self,
        owner: UserId,
    ) -> Result<Vec<FavoriteList>, FavoriteListRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, FavoriteListRepositoryError::connection))?;

        let rows: Vec<FavoriteListRow> = favorite_lists::table
            .filter(favorite_lists::user_id.eq(owner.get()))
            .order((favorite_lists::created_at.asc(), favorite_lists::id.asc()))
            .select(FavoriteListRow::as_select())
            .load(&mut conn)
            .await
            .map_err(list_error)?;

        rows.into_iter().map(list_from_row).collect()
    }

    async fn create(
        &self,
        list: NewFavoriteList,
    ) -> Result<FavoriteList, FavoriteListRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, FavoriteListRepositoryError::connection))?;

        let row: FavoriteListRow = diesel::insert_into(favorite_lists::table)
            .values(NewFavoriteListRow {
                list_name: list.name.as_str(),
                user_id: list.owner.get(),
            })
            .returning(FavoriteListRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(list_error)?;

        list_from_row(row)
    }

    async fn rename(
        &self,
        list_id: ListId,
        name: ListName,
    ) -> Result<FavoriteList, FavoriteListRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, FavoriteListRepositoryError::connection))?;

        let row: Option<FavoriteListRow> =
            diesel::update(favorite_lists::table.find(list_id.get()))
                .set(favorite_lists::list_name.eq(name.as_str()))
                .returning(FavoriteListRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(list_error)?;

        renamed(row, list_id)
    }

    async fn delete(&self, list_id: ListId) -> Result<(), FavoriteListRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, FavoriteListRepositoryError::connection))?;

        let deleted = diesel::delete(favorite_lists::table.find(list_id.get()))
            .execute(&mut conn)
            .await
            .map_err(list_error)?;

        single_row_deleted(deleted, list_id)
    }
}

#[async_trait]
impl OwnershipStore for DieselFavoriteListRepository {
    async fn list_owner(&self, list_id: ListId) -> Result<ListOwner, OwnershipStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, OwnershipStoreError::connection))?;

        let owner: Option<i32> = favorite_lists::table
            .find(list_id.get())
            .select(favorite_lists::user_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| {
                map_diesel_error(
                    err,
                    OwnershipStoreError::query,
                    OwnershipStoreError::connection,
                )
            })?;

        owner_of(owner, list_id)
    }
}

#[cfg(test)]
mod tests {
    //! Row outcome classification at the repository boundary.
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    use super::*;

    fn list_id() -> ListId {
        ListId::new(9).expect("list id")
    }

    #[rstest]
    fn renaming_a_missing_list_is_not_found() {
        assert_eq!(
            renamed(None, list_id()),
            Err(FavoriteListRepositoryError::not_found(list_id()))
        );
    }

    #[rstest]
    fn renamed_rows_become_lists() {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).single().expect("timestamp");
        let list = renamed(
            Some(FavoriteListRow {
                id: 9,
                list_name: "Birthday".to_owned(),
                user_id: 3,
                created_at,
            }),
            list_id(),
        )
        .expect("valid row");

        assert_eq!(list.name.as_str(), "Birthday");
        assert_eq!(list.owner.get(), 3);
    }

    #[rstest]
    fn corrupt_rows_are_query_failures() {
        let result = renamed(
            Some(FavoriteListRow {
                id: 9,
                list_name: " ".to_owned(),
                user_id: 3,
                created_at: Utc::now(),
            }),
            list_id(),
        );
        assert!(matches!(
            result,
            Err(FavoriteListRepositoryError::Query { .. })
        ));
    }

    #[rstest]
    #[case(0, Err(FavoriteListRepositoryError::not_found(list_id())))]
    #[case(1, Ok(()))]
    fn single_deletes_require_a_row(
        #[case] deleted: usize,
        #[case] expected: Result<(), FavoriteListRepositoryError>,
    ) {
        assert_eq!(single_row_deleted(deleted, list_id()), expected);
    }

    #[rstest]
    fn ownership_of_a_missing_list_is_not_found() {
        assert_eq!(
            owner_of(None, list_id()),
            Err(OwnershipStoreError::not_found(list_id()))
        );
    }

    #[rstest]
    fn stored_owners_must_be_valid_users() {
        assert_eq!(
            owner_of(Some(3), list_id()).map(|owner| owner.owner.get()),
            Ok(3)
        );
        assert!(matches!(
            owner_of(Some(0), list_id()),
            Err(OwnershipStoreError::Query { .. })
        ));
    }
}
