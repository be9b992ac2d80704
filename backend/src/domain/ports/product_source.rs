//! Driven port performing one raw product lookup against the catalogue.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Product, ProductId};

define_port_error! {
    /// Errors raised by a single catalogue lookup.
    pub enum ProductSourceError {
        /// The catalogue reported that the product does not exist.
        NotFound { product_id: ProductId } =>
            "product {product_id} not found",
        /// The catalogue answered with an unexpected status.
        Status { message: String } =>
            "catalogue returned an error status: {message}",
        /// The request never produced a response.
        Transport { message: String } =>
            "catalogue transport failed: {message}",
        /// The attempt exceeded its own timeout.
        Timeout { message: String } =>
            "catalogue lookup timed out: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "catalogue response decode failed: {message}",
    }
}

impl ProductSourceError {
    /// Whether another attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::NotFound { .. })
    }
}

/// Port for fetching a product, one attempt per call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Fetch the current catalogue record for `id`.
    async fn fetch_product(&self, id: ProductId) -> Result<Product, ProductSourceError>;
}
