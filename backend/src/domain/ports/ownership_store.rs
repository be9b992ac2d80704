//! Driven port answering "who owns this list?".

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{ListId, ListOwner};

define_port_error! {
    /// Errors raised while looking up a list owner.
    pub enum OwnershipStoreError {
        /// No list has this identifier.
        NotFound { list_id: ListId } =>
            "favourite list {list_id} not found",
        /// Store connection could not be established.
        Connection { message: String } =>
            "ownership store connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } =>
            "ownership store query failed: {message}",
    }
}

/// Read-only accessor for list ownership.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnershipStore: Send + Sync {
    /// Return the owner of `list_id`, or `NotFound` when the list is absent.
    async fn list_owner(&self, list_id: ListId) -> Result<ListOwner, OwnershipStoreError>;
}
