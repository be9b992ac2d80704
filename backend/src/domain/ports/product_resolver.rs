//! Driven port resolving product references for the aggregation engine.

use async_trait::async_trait;

use super::{ProductSourceError, define_port_error};
use crate::domain::{Deadline, Product, ProductId};

define_port_error! {
    /// Terminal outcomes of resolving one product.
    pub enum ProductResolutionError {
        /// The catalogue has no such product. Never retried.
        NotFound { product_id: ProductId } =>
            "product {product_id} not found",
        /// Every attempt failed; carries the last underlying error.
        Exhausted { product_id: ProductId, attempts: u32, last_error: ProductSourceError } =>
            "product {product_id} unresolved after {attempts} attempts: {last_error}",
        /// The request deadline fired during an attempt or a retry wait.
        Timeout { message: String } =>
            "product resolution timed out: {message}",
    }
}

/// Port turning a product id into a product record.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductResolver: Send + Sync {
    /// Resolve `id`, abandoning work once `deadline` fires.
    async fn resolve(
        &self,
        id: ProductId,
        deadline: Deadline,
    ) -> Result<Product, ProductResolutionError>;
}
