//! Success envelope and payloads shared by the favourites endpoints.
//!
//! Existing clients read `{"SuccesData": ...}` (spelling included) with
//! snake_case fields, the same shape the upstream services answer with.

use actix_web::HttpResponse;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{FavoriteItem, FavoriteList, Product};

/// Successful response wrapper.
#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessEnvelope<T> {
    #[serde(rename = "SuccesData")]
    pub data: T,
}

impl<T: Serialize> SuccessEnvelope<T> {
    /// Wrap `data` in a `200 OK` response.
    pub fn ok(data: T) -> HttpResponse {
        HttpResponse::Ok().json(Self { data })
    }
}

/// Product as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProductResponse {
    #[schema(example = 10)]
    pub id: i32,
    #[schema(example = "Espresso beans")]
    pub name: String,
    #[schema(example = 12.5)]
    pub price: f64,
    #[schema(example = 40)]
    pub stock: i32,
}

impl From<Product> for ProductResponse {
    fn from(value: Product) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
            price: value.price,
            stock: value.stock,
        }
    }
}

/// Stored list as returned by create and update.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FavoriteListResponse {
    pub list_id: i32,
    pub list_name: String,
    /// RFC 3339 creation timestamp.
    pub created_date: String,
    pub user_id: i32,
}

impl From<FavoriteList> for FavoriteListResponse {
    fn from(value: FavoriteList) -> Self {
        Self {
            list_id: value.id.get(),
            list_name: value.name.as_str().to_owned(),
            created_date: value.created_at.to_rfc3339(),
            user_id: value.owner.get(),
        }
    }
}

/// Stored item as returned by create.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FavoriteItemResponse {
    pub item_id: i32,
    pub list_id: i32,
    /// RFC 3339 creation timestamp.
    pub created_date: String,
}

impl From<FavoriteItem> for FavoriteItemResponse {
    fn from(value: FavoriteItem) -> Self {
        Self {
            item_id: value.product_id.get(),
            list_id: value.list_id.get(),
            created_date: value.created_at.to_rfc3339(),
        }
    }
}
