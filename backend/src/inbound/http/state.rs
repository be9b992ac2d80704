//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on driving ports and remain testable without I/O.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::ports::{
    FavoriteItemsCommand, FavoriteItemsQuery, FavoriteListsCommand, FavoriteListsQuery,
};
use crate::domain::{BearerToken, Deadline, RequestContext};

/// Budget applied to a request when none is configured.
pub const DEFAULT_REQUEST_DEADLINE: Duration = Duration::from_secs(15);

/// Parameter object bundling the driving ports used by HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub lists: Arc<dyn FavoriteListsCommand>,
    pub lists_query: Arc<dyn FavoriteListsQuery>,
    pub items: Arc<dyn FavoriteItemsCommand>,
    pub items_query: Arc<dyn FavoriteItemsQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub lists: Arc<dyn FavoriteListsCommand>,
    pub lists_query: Arc<dyn FavoriteListsQuery>,
    pub items: Arc<dyn FavoriteItemsCommand>,
    pub items_query: Arc<dyn FavoriteItemsQuery>,
    request_deadline: Duration,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports, DEFAULT_REQUEST_DEADLINE)
    }
}

impl HttpState {
    /// Construct state from a ports bundle and the per-request budget.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// use favorites::domain::ports::{
    ///     FixtureFavoriteItemsCommand, FixtureFavoriteItemsQuery, FixtureFavoriteListsCommand,
    ///     FixtureFavoriteListsQuery,
    /// };
    /// use favorites::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(
    ///     HttpStatePorts {
    ///         lists: Arc::new(FixtureFavoriteListsCommand),
    ///         lists_query: Arc::new(FixtureFavoriteListsQuery),
    ///         items: Arc::new(FixtureFavoriteItemsCommand),
    ///         items_query: Arc::new(FixtureFavoriteItemsQuery),
    ///     },
    ///     Duration::from_secs(3),
    /// );
    /// assert_eq!(state.request_deadline(), Duration::from_secs(3));
    /// ```
    pub fn new(ports: HttpStatePorts, request_deadline: Duration) -> Self {
        let HttpStatePorts {
            lists,
            lists_query,
            items,
            items_query,
        } = ports;
        Self {
            lists,
            lists_query,
            items,
            items_query,
            request_deadline,
        }
    }

    /// Budget granted to each request.
    pub fn request_deadline(&self) -> Duration {
        self.request_deadline
    }

    /// Start the clock for one request made with `token`.
    pub fn context(&self, token: BearerToken) -> RequestContext {
        RequestContext::new(token, Deadline::after(self.request_deadline))
    }
}
