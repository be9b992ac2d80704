//! Driven port resolving bearer tokens to users.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{BearerToken, Deadline, User};

define_port_error! {
    /// Errors raised while verifying a caller's identity.
    pub enum IdentityVerifierError {
        /// The identity service answered and refused the token.
        Rejected { message: String } =>
            "identity service rejected the token: {message}",
        /// The identity service could not be reached or answered nonsense.
        Unavailable { message: String } =>
            "identity service unavailable: {message}",
        /// The call did not finish before the deadline.
        Timeout { message: String } =>
            "identity lookup timed out: {message}",
        /// The circuit breaker refused the call without contacting the service.
        CircuitOpen { message: String } =>
            "identity circuit open: {message}",
    }
}

impl IdentityVerifierError {
    /// Whether this outcome says the dependency itself is unhealthy.
    ///
    /// A rejected token is a healthy answer and does not count against the
    /// circuit breaker. Overload answers (408, 429) arrive as `Unavailable`.
    pub fn counts_as_dependency_failure(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Timeout { .. })
    }
}

/// Port for resolving an opaque bearer token to the [`User`] it belongs to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Resolve `token`, giving up once `deadline` fires.
    async fn verify(
        &self,
        token: &BearerToken,
        deadline: Deadline,
    ) -> Result<User, IdentityVerifierError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(IdentityVerifierError::unavailable("connection refused"), true)]
    #[case(IdentityVerifierError::timeout("8s elapsed"), true)]
    #[case(IdentityVerifierError::rejected("401"), false)]
    #[case(IdentityVerifierError::circuit_open("identity"), false)]
    fn classifies_dependency_failures(#[case] error: IdentityVerifierError, #[case] expected: bool) {
        assert_eq!(error.counts_as_dependency_failure(), expected);
    }
}
