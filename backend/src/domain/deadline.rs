//! Request deadlines and the per-request context handed to domain services.
//!
//! Every outbound wait (identity lookup, product lookup, retry delay, the
//! aggregation fan-out) runs under the deadline of the request that caused
//! it. Expiry surfaces as [`DeadlineExceeded`].

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use super::BearerToken;

/// The request deadline elapsed before the awaited work finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("request deadline exceeded")]
pub struct DeadlineExceeded;

/// Point in time after which a request's work is abandoned.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use favorites::domain::Deadline;
///
/// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
/// let deadline = Deadline::after(Duration::from_secs(5));
/// let value = deadline.run(async { 42 }).await.expect("finishes in time");
/// assert_eq!(value, 42);
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Instant);

impl Deadline {
    /// Deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self(Instant::now() + budget)
    }

    /// Deadline at an explicit instant.
    pub fn at(instant: Instant) -> Self {
        Self(instant)
    }

    /// Instant at which the deadline fires.
    pub fn instant(self) -> Instant {
        self.0
    }

    /// Time left before expiry; zero once expired.
    pub fn remaining(self) -> Duration {
        self.0.saturating_duration_since(Instant::now())
    }

    /// Whether the deadline has already passed.
    pub fn is_expired(self) -> bool {
        Instant::now() >= self.0
    }

    /// Await `fut`, giving up once the deadline fires.
    ///
    /// The future is dropped on expiry, which cancels whatever it was doing.
    pub async fn run<F>(self, fut: F) -> Result<F::Output, DeadlineExceeded>
    where
        F: Future,
    {
        tokio::time::timeout_at(self.0, fut)
            .await
            .map_err(|_| DeadlineExceeded)
    }
}

/// Caller credentials and deadline for one inbound request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Token to verify with the identity service.
    pub token: BearerToken,
    /// Deadline shared by every step of the request.
    pub deadline: Deadline,
}

impl RequestContext {
    /// Bundle a token with its deadline.
    pub fn new(token: BearerToken, deadline: Deadline) -> Self {
        Self { token, deadline }
    }
}
