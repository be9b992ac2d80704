//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories only translate between Diesel rows and domain types. Row
//! structs (`models.rs`) and table definitions (`schema.rs`) never leave this
//! module, and every database failure is mapped to the port's error type.
//!
//! # Example
//!
//! ```ignore
//! use favorites::outbound::persistence::{DbPool, DieselFavoriteListRepository, PoolSettings};
//!
//! let pool = DbPool::connect("postgres://localhost/favorites", PoolSettings::default()).await?;
//! let lists = DieselFavoriteListRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_favorite_item_repository;
mod diesel_favorite_list_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_favorite_item_repository::DieselFavoriteItemRepository;
pub use diesel_favorite_list_repository::DieselFavoriteListRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolError, PoolSettings};
