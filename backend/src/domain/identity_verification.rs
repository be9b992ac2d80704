//! Identity verification guarded by a process-wide circuit breaker.
//!
//! [`CircuitBreakingIdentityVerifier`] decorates any [`IdentityVerifier`]:
//! while the breaker is open, calls fail fast with
//! [`IdentityVerifierError::CircuitOpen`] and never reach the identity service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::ports::{IdentityVerifier, IdentityVerifierError};
use super::{BearerToken, CircuitBreaker, Deadline, User};

/// Identity verifier that consults a [`CircuitBreaker`] around every call.
pub struct CircuitBreakingIdentityVerifier {
    inner: Arc<dyn IdentityVerifier>,
    breaker: Arc<CircuitBreaker>,
}

impl CircuitBreakingIdentityVerifier {
    /// Wrap `inner` with `breaker`.
    pub fn new(inner: Arc<dyn IdentityVerifier>, breaker: Arc<CircuitBreaker>) -> Self {
        Self { inner, breaker }
    }
}

#[async_trait]
impl IdentityVerifier for CircuitBreakingIdentityVerifier {
    async fn verify(
        &self,
        token: &BearerToken,
        deadline: Deadline,
    ) -> Result<User, IdentityVerifierError> {
        let Ok(ticket) = self.breaker.admit() else {
            debug!("identity call refused by open circuit");
            return Err(IdentityVerifierError::circuit_open(
                "identity service is temporarily unavailable",
            ));
        };

        // Dropping this future mid-call drops the ticket, which frees its
        // probe slot.
        let outcome = self.inner.verify(token, deadline).await;
        match &outcome {
            Err(err) if err.counts_as_dependency_failure() => ticket.record_failure(),
            _ => ticket.record_success(),
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::time::Duration;

    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::MockIdentityVerifier;
    use crate::domain::{CircuitBreakerConfig, CircuitState, UserId};
    use crate::test_support::clock::MutableClock;

    fn user() -> User {
        User {
            id: UserId::new(1).expect("valid id"),
            email: "ada@example.com".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            avatar_url: None,
        }
    }

    fn token() -> BearerToken {
        BearerToken::new("Bearer t0k3n").expect("token")
    }

    fn deadline() -> Deadline {
        Deadline::after(Duration::from_secs(5))
    }

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("valid start time");
        Arc::new(MutableClock::new(start))
    }

    fn breaker(clock: &Arc<MutableClock>) -> Arc<CircuitBreaker> {
        Arc::new(CircuitBreaker::new(
            "identity",
            CircuitBreakerConfig::default(),
            clock.clone(),
        ))
    }

    #[rstest]
    #[tokio::test]
    async fn passes_successful_verifications_through(clock: Arc<MutableClock>) {
        let mut inner = MockIdentityVerifier::new();
        inner.expect_verify().times(1).return_const(Ok(user()));
        let verifier = CircuitBreakingIdentityVerifier::new(Arc::new(inner), breaker(&clock));

        let verified = verifier.verify(&token(), deadline()).await;

        assert_eq!(verified, Ok(user()));
    }

    #[rstest]
    #[tokio::test]
    async fn opens_after_repeated_unavailability(clock: Arc<MutableClock>) {
        let mut inner = MockIdentityVerifier::new();
        inner
            .expect_verify()
            .times(4)
            .return_const(Err(IdentityVerifierError::unavailable("connection refused")));
        let breaker = breaker(&clock);
        let verifier = CircuitBreakingIdentityVerifier::new(Arc::new(inner), breaker.clone());

        for _ in 0..4 {
            let err = verifier.verify(&token(), deadline()).await.expect_err("down");
            assert!(matches!(err, IdentityVerifierError::Unavailable { .. }));
        }
        assert_eq!(breaker.state(), CircuitState::Open);

        let err = verifier
            .verify(&token(), deadline())
            .await
            .expect_err("circuit open");
        assert!(matches!(err, IdentityVerifierError::CircuitOpen { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn rejected_tokens_do_not_trip_the_breaker(clock: Arc<MutableClock>) {
        let mut inner = MockIdentityVerifier::new();
        inner
            .expect_verify()
            .times(6)
            .return_const(Err(IdentityVerifierError::rejected("status 401")));
        let breaker = breaker(&clock);
        let verifier = CircuitBreakingIdentityVerifier::new(Arc::new(inner), breaker.clone());

        for _ in 0..6 {
            let err = verifier.verify(&token(), deadline()).await.expect_err("rejected");
            assert!(matches!(err, IdentityVerifierError::Rejected { .. }));
        }
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[rstest]
    #[tokio::test]
    async fn probe_success_after_cooldown_closes_the_circuit(clock: Arc<MutableClock>) {
        let mut inner = MockIdentityVerifier::new();
        let mut sequence = mockall::Sequence::new();
        inner
            .expect_verify()
            .times(4)
            .in_sequence(&mut sequence)
            .return_const(Err(IdentityVerifierError::timeout("8s")));
        inner
            .expect_verify()
            .times(1)
            .in_sequence(&mut sequence)
            .return_const(Ok(user()));
        let breaker = breaker(&clock);
        let verifier = CircuitBreakingIdentityVerifier::new(Arc::new(inner), breaker.clone());

        for _ in 0..4 {
            let _ = verifier.verify(&token(), deadline()).await;
        }
        assert_eq!(breaker.state(), CircuitState::Open);

        clock.advance(Duration::from_secs(20));
        let verified = verifier.verify(&token(), deadline()).await;

        assert_eq!(verified, Ok(user()));
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    struct HangingIdentityVerifier;

    #[async_trait]
    impl IdentityVerifier for HangingIdentityVerifier {
        async fn verify(
            &self,
            _token: &BearerToken,
            _deadline: Deadline,
        ) -> Result<User, IdentityVerifierError> {
            std::future::pending().await
        }
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn cancelled_probes_do_not_wedge_the_breaker(clock: Arc<MutableClock>) {
        let breaker = breaker(&clock);
        for _ in 0..4 {
            breaker.admit().expect("closed").record_failure();
        }
        clock.advance(Duration::from_secs(20));
        assert_eq!(breaker.state(), CircuitState::HalfOpen);

        let hanging = CircuitBreakingIdentityVerifier::new(
            Arc::new(HangingIdentityVerifier),
            breaker.clone(),
        );
        for _ in 0..5 {
            let abandoned = tokio::time::timeout(
                Duration::from_millis(10),
                hanging.verify(&token(), deadline()),
            )
            .await;
            assert!(abandoned.is_err(), "the call is cancelled mid-flight");
        }

        let mut inner = MockIdentityVerifier::new();
        inner.expect_verify().times(1).return_const(Ok(user()));
        let healthy = CircuitBreakingIdentityVerifier::new(Arc::new(inner), breaker.clone());

        assert_eq!(healthy.verify(&token(), deadline()).await, Ok(user()));
        assert_eq!(breaker.state(), CircuitState::Closed);
    }
}
