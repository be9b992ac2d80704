//! OpenAPI documentation for the favourites REST API.
//!
//! Registers every `/api/v1` handler, the health probes, the shared error
//! schema and the bearer token security scheme. Served by Swagger UI in debug
//! builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::envelope::{FavoriteItemResponse, FavoriteListResponse, ProductResponse};
use crate::inbound::http::items::AddItemRequest;
use crate::inbound::http::lists::{FavoriteListWithProductsResponse, ListNameRequest};

/// Adds the bearer scheme; tokens are forwarded verbatim to the identity
/// service.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Token issued by the identity service."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Favourites API",
        description = "Favourite product lists for authenticated users."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::lists::list_lists,
        crate::inbound::http::lists::create_list,
        crate::inbound::http::lists::update_list,
        crate::inbound::http::lists::delete_list,
        crate::inbound::http::items::list_items,
        crate::inbound::http::items::add_item,
        crate::inbound::http::items::remove_item,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        ProductResponse,
        FavoriteListResponse,
        FavoriteItemResponse,
        FavoriteListWithProductsResponse,
        ListNameRequest,
        AddItemRequest,
    )),
    tags(
        (name = "lists", description = "Favourite lists of the caller"),
        (name = "items", description = "Products saved in a list"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
