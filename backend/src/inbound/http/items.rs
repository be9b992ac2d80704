//! Favourite item HTTP handlers.
//!
//! ```text
//! GET    /api/v1/items/{listId}
//! POST   /api/v1/items
//! DELETE /api/v1/items/{listId}/item?itemId=
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{BearerToken, Error, NewFavoriteItem};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{FavoriteItemResponse, ProductResponse, SuccessEnvelope};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_list_id, parse_product_id, require};

const LIST_ID_PATH: FieldName = FieldName::new("listId");
const ITEM_ID_QUERY: FieldName = FieldName::new("itemId");
const LIST_ID: FieldName = FieldName::new("list_id");
const ITEM_ID: FieldName = FieldName::new("item_id");

/// Body for adding a product to a list.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddItemRequest {
    #[schema(example = 10)]
    pub item_id: Option<i32>,
    #[schema(example = 1)]
    pub list_id: Option<i32>,
}

/// Query string for removing a product.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RemoveItemQuery {
    /// Catalogue identifier of the product to remove.
    #[serde(rename = "itemId")]
    pub item_id: Option<i32>,
}

fn parse_new_item(payload: AddItemRequest) -> Result<NewFavoriteItem, Error> {
    let product_id = parse_product_id(require(payload.item_id, ITEM_ID)?, ITEM_ID)?;
    let list_id = parse_list_id(require(payload.list_id, LIST_ID)?, LIST_ID)?;
    Ok(NewFavoriteItem {
        list_id,
        product_id,
    })
}

/// Products held by a list the caller owns.
#[utoipa::path(
    get,
    path = "/api/v1/items/{listId}",
    params(("listId" = i32, Path, description = "List identifier")),
    responses(
        (status = 200, description = "Products in the list", body = SuccessEnvelope<Vec<ProductResponse>>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "List belongs to another user", body = Error),
        (status = 404, description = "List or product not found", body = Error),
        (status = 504, description = "Request deadline exceeded", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["items"],
    operation_id = "listFavoriteItems"
)]
#[get("/items/{listId}")]
pub async fn list_items(
    state: web::Data<HttpState>,
    token: BearerToken,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let list_id = parse_list_id(path.into_inner(), LIST_ID_PATH)?;
    let ctx = state.context(token);
    let products = state.items_query.list_products(&ctx, list_id).await?;
    let body: Vec<ProductResponse> = products.into_iter().map(Into::into).collect();
    Ok(SuccessEnvelope::ok(body))
}

/// Add a product to a list the caller owns.
#[utoipa::path(
    post,
    path = "/api/v1/items",
    request_body = AddItemRequest,
    responses(
        (status = 200, description = "Stored item", body = SuccessEnvelope<FavoriteItemResponse>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "List belongs to another user", body = Error),
        (status = 404, description = "List not found", body = Error),
        (status = 409, description = "Product already in the list", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["items"],
    operation_id = "addFavoriteItem"
)]
#[post("/items")]
pub async fn add_item(
    state: web::Data<HttpState>,
    token: BearerToken,
    payload: web::Json<AddItemRequest>,
) -> ApiResult<HttpResponse> {
    let item = parse_new_item(payload.into_inner())?;
    let ctx = state.context(token);
    let stored = state.items.add_item(&ctx, item).await?;
    Ok(SuccessEnvelope::ok(FavoriteItemResponse::from(stored)))
}

/// Remove a product from a list the caller owns.
#[utoipa::path(
    delete,
    path = "/api/v1/items/{listId}/item",
    params(
        ("listId" = i32, Path, description = "List identifier"),
        RemoveItemQuery
    ),
    responses(
        (status = 200, description = "Item removed"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "List belongs to another user", body = Error),
        (status = 404, description = "List or item not found", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["items"],
    operation_id = "removeFavoriteItem"
)]
#[delete("/items/{listId}/item")]
pub async fn remove_item(
    state: web::Data<HttpState>,
    token: BearerToken,
    path: web::Path<i32>,
    query: web::Query<RemoveItemQuery>,
) -> ApiResult<HttpResponse> {
    let list_id = parse_list_id(path.into_inner(), LIST_ID_PATH)?;
    let raw_item_id = require(query.into_inner().item_id, ITEM_ID_QUERY)?;
    let product_id = parse_product_id(raw_item_id, ITEM_ID_QUERY)?;
    let ctx = state.context(token);
    state.items.remove_item(&ctx, list_id, product_id).await?;
    Ok(SuccessEnvelope::ok(()))
}

#[cfg(test)]
#[path = "items_tests.rs"]
mod tests;
