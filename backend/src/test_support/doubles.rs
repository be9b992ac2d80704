//! Scripted stand-ins for the identity service and the product catalogue.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::ports::{
    IdentityVerifier, IdentityVerifierError, ProductSource, ProductSourceError,
};
use crate::domain::{BearerToken, Deadline, Product, ProductId, User, UserId};

/// Build a user with predictable contact details.
pub fn user(id: i32) -> User {
    let id = match UserId::new(id) {
        Ok(id) => id,
        Err(error) => panic!("fixture user id: {error}"),
    };
    User {
        id,
        email: format!("user{id}@example.com"),
        first_name: "Test".to_owned(),
        last_name: format!("User{id}"),
        avatar_url: None,
    }
}

/// Build a product whose fields derive from its id.
pub fn product(id: i32) -> Product {
    let id = match ProductId::new(id) {
        Ok(id) => id,
        Err(error) => panic!("fixture product id: {error}"),
    };
    Product {
        id,
        name: format!("product {id}"),
        price: f64::from(id.get()) * 1.5,
        stock: id.get(),
    }
}

/// Identity service answering from a fixed token table.
///
/// Unknown tokens are rejected, as the real service would.
#[derive(Default)]
pub struct ScriptedIdentityVerifier {
    users: HashMap<String, User>,
}

impl ScriptedIdentityVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `token` to `user`.
    #[must_use]
    pub fn with_user(mut self, token: &str, user: User) -> Self {
        self.users.insert(token.to_owned(), user);
        self
    }
}

#[async_trait]
impl IdentityVerifier for ScriptedIdentityVerifier {
    async fn verify(
        &self,
        token: &BearerToken,
        _deadline: Deadline,
    ) -> Result<User, IdentityVerifierError> {
        self.users
            .get(token.as_str())
            .cloned()
            .ok_or_else(|| IdentityVerifierError::rejected("unknown token"))
    }
}

/// Catalogue answering from a fixed product table, with optional scripted
/// failures consumed before the table is consulted.
#[derive(Default)]
pub struct ScriptedProductSource {
    products: HashMap<ProductId, Product>,
    failures: Mutex<HashMap<ProductId, Vec<ProductSourceError>>>,
    calls: AtomicUsize,
}

impl ScriptedProductSource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_product(mut self, product: Product) -> Self {
        self.products.insert(product.id, product);
        self
    }

    /// Fail the next lookups of `id` with `errors`, in order.
    #[must_use]
    pub fn failing_first(self, id: ProductId, errors: Vec<ProductSourceError>) -> Self {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, errors.into_iter().rev().collect());
        self
    }

    /// Lookups performed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductSource for ScriptedProductSource {
    async fn fetch_product(&self, id: ProductId) -> Result<Product, ProductSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&id)
            .and_then(Vec::pop);
        if let Some(error) = scripted {
            return Err(error);
        }
        self.products
            .get(&id)
            .cloned()
            .ok_or_else(|| ProductSourceError::not_found(id))
    }
}
