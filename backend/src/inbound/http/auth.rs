//! Bearer token extraction.
//!
//! Handlers take a [`BearerToken`] argument; requests without a usable
//! `Authorization` header are answered `401` before the handler body runs, so
//! no port is ever called for them.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::domain::{BearerToken, Error};

fn token_from_request(req: &HttpRequest) -> Result<BearerToken, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("authorization header is required"))?;
    let raw = header
        .to_str()
        .map_err(|_| Error::unauthorized("authorization header must be visible ASCII"))?;
    BearerToken::new(raw).map_err(|err| Error::unauthorized(err.to_string()))
}

impl FromRequest for BearerToken {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(token_from_request(req))
    }
}
