//! Read-only product projection owned by the external catalogue.
//!
//! Products are fetched fresh on every read and never stored locally.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation failures for product references.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductValidationError {
    /// Catalogue identifiers are positive integers.
    #[error("product id must be positive, got {0}")]
    NonPositiveId(i32),
}

/// Catalogue identifier of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct ProductId(i32);

impl ProductId {
    /// Validate a raw identifier.
    pub fn new(raw: i32) -> Result<Self, ProductValidationError> {
        if raw <= 0 {
            return Err(ProductValidationError::NonPositiveId(raw));
        }
        Ok(Self(raw))
    }

    /// Raw integer value.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for ProductId {
    type Error = ProductValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductId> for i32 {
    fn from(value: ProductId) -> Self {
        value.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Product record resolved from the catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Catalogue identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price as reported by the catalogue.
    pub price: f64,
    /// Units in stock.
    pub stock: i32,
}
