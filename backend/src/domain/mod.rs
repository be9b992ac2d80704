//! Domain primitives, ports and services for favourite lists.
//!
//! Purpose: keep the business rules of favourite lists independent of HTTP,
//! SQL and the remote identity and catalogue services. Adapters depend on
//! this module; it depends on none of them.
//!
//! Public surface:
//! - [`Error`] and [`ErrorCode`]: the error taxonomy shared by every adapter.
//! - Value types: [`BearerToken`], [`User`], [`Product`], [`FavoriteList`],
//!   [`FavoriteItem`] and their validated identifiers.
//! - [`CircuitBreaker`], [`RetryingProductResolver`] and
//!   [`ProductAggregator`]: resilience around the remote services.
//! - [`FavoritesService`]: the orchestration behind every endpoint.

pub mod circuit_breaker;
pub mod deadline;
pub mod error;
pub mod favorites;
pub mod favorites_service;
pub mod identity;
pub mod identity_verification;
pub mod ports;
pub mod product;
pub mod product_aggregation;
pub mod product_resolution;
pub mod trace_id;

pub use self::circuit_breaker::{
    BreakerTicket, CircuitBreaker, CircuitBreakerConfig, CircuitOpen, CircuitState,
};
pub use self::deadline::{Deadline, DeadlineExceeded, RequestContext};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::favorites::{
    FavoriteItem, FavoriteList, FavoriteListWithProducts, FavoriteValidationError, ListId,
    ListName, ListOwner, NewFavoriteItem, NewFavoriteList,
};
pub use self::favorites_service::{FavoritesService, FavoritesServicePorts};
pub use self::identity::{BearerToken, IdentityValidationError, User, UserId};
pub use self::identity_verification::CircuitBreakingIdentityVerifier;
pub use self::product::{Product, ProductId, ProductValidationError};
pub use self::product_aggregation::{AggregationConfig, LimiterScope, ProductAggregator};
pub use self::product_resolution::{
    ProductRetryPolicy, RetryingProductResolver, RetrySleeper, TokioSleeper,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use favorites::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
