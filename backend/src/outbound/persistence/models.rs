//! Internal Diesel row structs.
//!
//! Rows never leave the persistence layer; repositories convert them into
//! domain types and reject values that break domain invariants.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{favorite_items, favorite_lists};
use crate::domain::{FavoriteItem, FavoriteList, ListId, ListName, ProductId, UserId};

/// Row read from `favorite_lists`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = favorite_lists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FavoriteListRow {
    pub id: i32,
    pub list_name: String,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
}

impl FavoriteListRow {
    /// Convert into the domain record, reporting rows that break invariants.
    pub(crate) fn into_domain(self) -> Result<FavoriteList, String> {
        let id = ListId::new(self.id).map_err(|err| err.to_string())?;
        Ok(FavoriteList {
            id,
            name: ListName::new(&self.list_name)
                .map_err(|err| format!("list {id} has an invalid stored name: {err}"))?,
            owner: UserId::new(self.user_id).map_err(|err| err.to_string())?,
            created_at: self.created_at,
        })
    }
}

/// Insertable row for `favorite_lists`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = favorite_lists)]
pub(crate) struct NewFavoriteListRow<'a> {
    pub list_name: &'a str,
    pub user_id: i32,
}

/// Row read from `favorite_items`.
#[derive(Debug, Clone, Copy, Queryable, Selectable)]
#[diesel(table_name = favorite_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FavoriteItemRow {
    pub list_id: i32,
    pub item_id: i32,
    pub created_at: DateTime<Utc>,
}

impl FavoriteItemRow {
    pub(crate) fn into_domain(self) -> Result<FavoriteItem, String> {
        Ok(FavoriteItem {
            list_id: ListId::new(self.list_id).map_err(|err| err.to_string())?,
            product_id: ProductId::new(self.item_id).map_err(|err| err.to_string())?,
            created_at: self.created_at,
        })
    }
}

/// Insertable row for `favorite_items`.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = favorite_items)]
pub(crate) struct NewFavoriteItemRow {
    pub list_id: i32,
    pub item_id: i32,
}
