//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **identity**: reqwest client for the identity service
//! - **catalogue**: reqwest client for the product catalogue
//! - **persistence**: PostgreSQL-backed repositories using Diesel
//!
//! Adapters translate between domain types and wire or row representations.
//! They contain no business logic: retries, deadlines shared across calls and
//! circuit breaking live in the domain.

pub mod catalogue;
pub mod identity;
pub mod persistence;
pub mod upstream;
