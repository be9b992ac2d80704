//! DTOs for decoding catalogue responses.

use serde::Deserialize;

use crate::domain::{Product, ProductId};

#[derive(Debug, Deserialize)]
pub(super) struct ProductDto {
    pub(super) id: i32,
    pub(super) name: String,
    pub(super) price: f64,
    pub(super) stock: i32,
}

impl ProductDto {
    pub(super) fn into_domain(self) -> Result<Product, String> {
        let id = ProductId::new(self.id).map_err(|err| err.to_string())?;
        if !self.price.is_finite() {
            return Err(format!("product {id} has a non-finite price"));
        }
        Ok(Product {
            id,
            name: self.name,
            price: self.price,
            stock: self.stock,
        })
    }
}
