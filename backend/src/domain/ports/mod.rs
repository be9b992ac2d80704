//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (identity, catalogue, persistence) are implemented by the
//! outbound adapters. Driving ports are implemented by the favourites service
//! and consumed by the HTTP adapter.

mod macros;
pub(crate) use macros::define_port_error;

mod favorite_item_repository;
mod favorite_items_command;
mod favorite_items_query;
mod favorite_list_repository;
mod favorite_lists_command;
mod favorite_lists_query;
mod identity_verifier;
mod ownership_store;
mod product_resolver;
mod product_source;

#[cfg(test)]
pub use favorite_item_repository::MockFavoriteItemRepository;
pub use favorite_item_repository::{FavoriteItemRepository, FavoriteItemRepositoryError};
#[cfg(test)]
pub use favorite_items_command::MockFavoriteItemsCommand;
pub use favorite_items_command::{FavoriteItemsCommand, FixtureFavoriteItemsCommand};
#[cfg(test)]
pub use favorite_items_query::MockFavoriteItemsQuery;
pub use favorite_items_query::{FavoriteItemsQuery, FixtureFavoriteItemsQuery};
#[cfg(test)]
pub use favorite_list_repository::MockFavoriteListRepository;
pub use favorite_list_repository::{FavoriteListRepository, FavoriteListRepositoryError};
#[cfg(test)]
pub use favorite_lists_command::MockFavoriteListsCommand;
pub use favorite_lists_command::{FavoriteListsCommand, FixtureFavoriteListsCommand};
#[cfg(test)]
pub use favorite_lists_query::MockFavoriteListsQuery;
pub use favorite_lists_query::{FavoriteListsQuery, FixtureFavoriteListsQuery};
#[cfg(test)]
pub use identity_verifier::MockIdentityVerifier;
pub use identity_verifier::{IdentityVerifier, IdentityVerifierError};
#[cfg(test)]
pub use ownership_store::MockOwnershipStore;
pub use ownership_store::{OwnershipStore, OwnershipStoreError};
#[cfg(test)]
pub use product_resolver::MockProductResolver;
pub use product_resolver::{ProductResolutionError, ProductResolver};
#[cfg(test)]
pub use product_source::MockProductSource;
pub use product_source::{ProductSource, ProductSourceError};
