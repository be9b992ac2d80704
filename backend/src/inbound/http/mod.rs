//! HTTP inbound adapter exposing the favourites REST endpoints.

pub mod auth;
pub mod envelope;
pub mod error;
pub mod health;
pub mod items;
pub mod lists;
pub mod state;
#[cfg(test)]
pub mod test_utils;
mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` handler together with extractor configuration
/// that reports malformed input as `invalid_request` errors.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use favorites::inbound::http::configure_api;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| validation::malformed_request_error(err).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| validation::malformed_request_error(err).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| validation::malformed_request_error(err).into()),
    )
    .service(lists::list_lists)
    .service(lists::create_list)
    .service(lists::update_list)
    .service(lists::delete_list)
    .service(items::list_items)
    .service(items::add_item)
    .service(items::remove_item);
}
