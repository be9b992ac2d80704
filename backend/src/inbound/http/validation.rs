//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejection is an `invalid_request` error whose details name the
//! offending field, so clients can highlight it without parsing messages.

use serde_json::json;

use crate::domain::{Error, ListId, ListName, ProductId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidId,
    InvalidListName,
    MalformedRequest,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidId => "invalid_id",
            Self::InvalidListName => "invalid_list_name",
            Self::MalformedRequest => "malformed_request",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ValidationCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ValidationCode::MissingField,
        format!("{} is required", field.as_str()),
    )
}

/// Require a field that serde left as `None`.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_list_id(raw: i32, field: FieldName) -> Result<ListId, Error> {
    ListId::new(raw).map_err(|err| field_error(field, ValidationCode::InvalidId, err.to_string()))
}

pub(crate) fn parse_product_id(raw: i32, field: FieldName) -> Result<ProductId, Error> {
    ProductId::new(raw)
        .map_err(|err| field_error(field, ValidationCode::InvalidId, err.to_string()))
}

pub(crate) fn parse_list_name(raw: &str, field: FieldName) -> Result<ListName, Error> {
    ListName::new(raw)
        .map_err(|err| field_error(field, ValidationCode::InvalidListName, err.to_string()))
}

/// Map an extractor failure (bad JSON, non-numeric path segment) to a domain
/// error so the response keeps the usual error shape.
pub(crate) fn malformed_request_error(error: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("malformed request: {error}")).with_details(json!({
        "code": ValidationCode::MalformedRequest.as_str(),
    }))
}
