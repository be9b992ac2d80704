//! Favourite product lists for authenticated users.
//!
//! The crate follows a ports-and-adapters layout: [`domain`] holds the
//! orchestration service, the circuit breaker, the retrying product resolver
//! and the bounded aggregation engine; [`inbound`] and [`outbound`] adapt them
//! to HTTP, PostgreSQL and the upstream services.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
