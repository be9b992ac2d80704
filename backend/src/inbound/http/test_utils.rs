//! Test helpers for inbound HTTP components.

use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use serde_json::Value;

use crate::domain::ports::{
    FavoriteItemsCommand, FavoriteItemsQuery, FavoriteListsCommand, FavoriteListsQuery,
    FixtureFavoriteItemsCommand, FixtureFavoriteItemsQuery, FixtureFavoriteListsCommand,
    FixtureFavoriteListsQuery,
};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

pub const TOKEN: &str = "Bearer test-token";

/// Ports bundle defaulting to fixtures; tests swap in mocks where they assert.
pub struct TestPorts {
    pub lists: Arc<dyn FavoriteListsCommand>,
    pub lists_query: Arc<dyn FavoriteListsQuery>,
    pub items: Arc<dyn FavoriteItemsCommand>,
    pub items_query: Arc<dyn FavoriteItemsQuery>,
}

impl Default for TestPorts {
    fn default() -> Self {
        Self {
            lists: Arc::new(FixtureFavoriteListsCommand),
            lists_query: Arc::new(FixtureFavoriteListsQuery),
            items: Arc::new(FixtureFavoriteItemsCommand),
            items_query: Arc::new(FixtureFavoriteItemsQuery),
        }
    }
}

/// Build an app serving `/api/v1` over `ports`.
pub fn test_app(
    ports: TestPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(
        HttpStatePorts {
            lists: ports.lists,
            lists_query: ports.lists_query,
            items: ports.items,
            items_query: ports.items_query,
        },
        Duration::from_secs(5),
    );
    App::new()
        .app_data(web::Data::new(state))
        .service(web::scope("/api/v1").configure(configure_api))
}

/// Pull a string out of an error body's `details` object.
pub fn detail<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get("details")?.get(key)?.as_str()
}
