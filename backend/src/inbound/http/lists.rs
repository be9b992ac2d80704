//! Favourite list HTTP handlers.
//!
//! ```text
//! GET    /api/v1/lists
//! POST   /api/v1/lists
//! PUT    /api/v1/lists/{listId}
//! DELETE /api/v1/lists/{listId}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{BearerToken, Error, FavoriteListWithProducts};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{FavoriteListResponse, ProductResponse, SuccessEnvelope};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_list_id, parse_list_name, require};

const LIST_NAME: FieldName = FieldName::new("list_name");
const LIST_ID: FieldName = FieldName::new("listId");

/// Body for creating or renaming a list.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ListNameRequest {
    #[schema(example = "Weekend picks")]
    pub list_name: Option<String>,
}

/// A list with its resolved products.
#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteListWithProductsResponse {
    pub list_id: i32,
    pub list_name: String,
    pub products: Vec<ProductResponse>,
}

impl From<FavoriteListWithProducts> for FavoriteListWithProductsResponse {
    fn from(value: FavoriteListWithProducts) -> Self {
        Self {
            list_id: value.list_id.get(),
            list_name: value.list_name.as_str().to_owned(),
            products: value.products.into_iter().map(Into::into).collect(),
        }
    }
}

fn parse_name(payload: ListNameRequest) -> Result<crate::domain::ListName, Error> {
    let raw = require(payload.list_name, LIST_NAME)?;
    parse_list_name(&raw, LIST_NAME)
}

/// Every list of the caller with the products it holds.
#[utoipa::path(
    get,
    path = "/api/v1/lists",
    responses(
        (status = 200, description = "Lists with products", body = SuccessEnvelope<Vec<FavoriteListWithProductsResponse>>),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "A product no longer exists", body = Error),
        (status = 502, description = "Product lookups failed", body = Error),
        (status = 504, description = "Request deadline exceeded", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["lists"],
    operation_id = "listFavoriteLists"
)]
#[get("/lists")]
pub async fn list_lists(
    state: web::Data<HttpState>,
    token: BearerToken,
) -> ApiResult<HttpResponse> {
    let ctx = state.context(token);
    let lists = state.lists_query.lists_with_products(&ctx).await?;
    let body: Vec<FavoriteListWithProductsResponse> =
        lists.into_iter().map(Into::into).collect();
    Ok(SuccessEnvelope::ok(body))
}

/// Create a list owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/lists",
    request_body = ListNameRequest,
    responses(
        (status = 200, description = "Created list", body = SuccessEnvelope<FavoriteListResponse>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["lists"],
    operation_id = "createFavoriteList"
)]
#[post("/lists")]
pub async fn create_list(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<ListNameRequest>,
) -> ApiResult<HttpResponse> {
    let name = parse_name(payload.into_inner())?;
    let ctx = state.context(token);
    let list = state.lists.create_list(&ctx, name).await?;
    info!(list_id = %list.id, user_id = %list.owner, "favourite list created");
    Ok(SuccessEnvelope::ok(FavoriteListResponse::from(list)))
}

/// Rename a list the caller owns.
#[utoipa::path(
    put,
    path = "/api/v1/lists/{listId}",
    params(("listId" = i32, Path, description = "List identifier")),
    request_body = ListNameRequest,
    responses(
        (status = 200, description = "Renamed list", body = SuccessEnvelope<FavoriteListResponse>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "List belongs to another user", body = Error),
        (status = 404, description = "List not found", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["lists"],
    operation_id = "updateFavoriteList"
)]
#[put("/lists/{listId}")]
pub async fn update_list(
    state: web::Data<HttpState>,
    token: BearerToken,
    path: web::Path<i32>,
    payload: web::Json<ListNameRequest>,
) -> ApiResult<HttpResponse> {
    let list_id = parse_list_id(path.into_inner(), LIST_ID)?;
    let name = parse_name(payload.into_inner())?;
    let ctx = state.context(token);
    let list = state.lists.update_list(&ctx, list_id, name).await?;
    Ok(SuccessEnvelope::ok(FavoriteListResponse::from(list)))
}

/// Delete a list the caller owns, with every item in it.
#[utoipa::path(
    delete,
    path = "/api/v1/lists/{listId}",
    params(("listId" = i32, Path, description = "List identifier")),
    responses(
        (status = 200, description = "List deleted"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "List belongs to another user", body = Error),
        (status = 404, description = "List not found", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["lists"],
    operation_id = "deleteFavoriteList"
)]
#[delete("/lists/{listId}")]
pub async fn delete_list(
    state: web::Data<HttpState>,
    token: BearerToken,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let list_id = parse_list_id(path.into_inner(), LIST_ID)?;
    let ctx = state.context(token);
    state.lists.delete_list(&ctx, list_id).await?;
    info!(list_id = %list_id, "favourite list deleted");
    Ok(SuccessEnvelope::ok(()))
}

#[cfg(test)]
#[path = "lists_tests.rs"]
mod tests;
