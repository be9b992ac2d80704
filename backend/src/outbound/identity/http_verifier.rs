//! Reqwest-backed identity verifier.
//!
//! Calls `GET {base}/users/me`, forwarding the caller's `Authorization` value
//! untouched. A 4xx answer means the token was refused, except 408 and 429,
//! which report an overloaded service. Everything else that is not a
//! decodable 2xx answer means the service itself is in trouble.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use reqwest::{Client, StatusCode, Url};

use super::dto::UserDto;
use crate::domain::ports::{IdentityVerifier, IdentityVerifierError};
use crate::domain::{BearerToken, Deadline, User};
use crate::outbound::upstream::{
    SuccessEnvelope, UpstreamClientError, client_with_timeout, endpoint, status_message,
};

/// Identity verifier calling the user service over HTTP.
pub struct HttpIdentityVerifier {
    client: Client,
    me_endpoint: Url,
}

impl HttpIdentityVerifier {
    /// Build a verifier for the service rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or
    /// `base_url` cannot carry a path.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, UpstreamClientError> {
        Ok(Self {
            client: client_with_timeout(timeout)?,
            me_endpoint: endpoint(base_url, &["users", "me"])?,
        })
    }

    async fn exchange(&self, token: &BearerToken) -> Result<User, IdentityVerifierError> {
        let mut authorization = HeaderValue::from_str(token.as_str()).map_err(|_| {
            IdentityVerifierError::rejected("authorization header contains invalid characters")
        })?;
        authorization.set_sensitive(true);

        let response = self
            .client
            .get(self.me_endpoint.clone())
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_user(body.as_ref())
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn verify(
        &self,
        token: &BearerToken,
        deadline: Deadline,
    ) -> Result<User, IdentityVerifierError> {
        deadline
            .run(self.exchange(token))
            .await
            .map_err(|_| IdentityVerifierError::timeout("request deadline exceeded"))?
    }
}

fn parse_user(body: &[u8]) -> Result<User, IdentityVerifierError> {
    let envelope: SuccessEnvelope<UserDto> = serde_json::from_slice(body).map_err(|error| {
        IdentityVerifierError::unavailable(format!("invalid identity payload: {error}"))
    })?;
    envelope
        .data
        .into_domain()
        .map_err(|error| IdentityVerifierError::unavailable(format!("invalid identity payload: {error}")))
}

fn map_transport_error(error: reqwest::Error) -> IdentityVerifierError {
    if error.is_timeout() {
        IdentityVerifierError::timeout(error.to_string())
    } else {
        IdentityVerifierError::unavailable(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IdentityVerifierError {
    let message = status_message(status, body);
    let overloaded = matches!(
        status,
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS
    );
    if status.is_client_error() && !overloaded {
        IdentityVerifierError::rejected(message)
    } else {
        IdentityVerifierError::unavailable(message)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network identity mapping helpers.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn decodes_the_success_envelope_and_drops_the_password() {
        let body = r#"{
            "SuccesData": {
                "id": 42,
                "email": "ada@example.com",
                "password": "$2a$10$hash",
                "isim": "Ada",
                "soyisim": "Lovelace",
                "resim": "https://cdn.example.com/ada.png"
            }
        }"#;

        let user = parse_user(body.as_bytes()).expect("payload decodes");

        assert_eq!(user.id.get(), 42);
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.last_name, "Lovelace");
        assert_eq!(user.avatar_url.as_deref(), Some("https://cdn.example.com/ada.png"));
    }

    #[rstest]
    fn blank_avatars_are_absent() {
        let body = r#"{"SuccesData":{"id":1,"email":"a@b.c","isim":"A","soyisim":"B","resim":""}}"#;
        let user = parse_user(body.as_bytes()).expect("payload decodes");
        assert_eq!(user.avatar_url, None);
    }

    #[rstest]
    #[case(r#"{"data":{"id":1}}"#)]
    #[case(r#"{"SuccesData":{"id":0,"email":"a@b.c"}}"#)]
    #[case("<html>bad gateway</html>")]
    fn undecodable_payloads_mean_the_service_is_unavailable(#[case] body: &str) {
        let error = parse_user(body.as_bytes()).expect_err("payload is rejected");
        assert!(matches!(error, IdentityVerifierError::Unavailable { .. }));
    }

    #[rstest]
    #[case(StatusCode::UNAUTHORIZED, true)]
    #[case(StatusCode::FORBIDDEN, true)]
    #[case(StatusCode::NOT_FOUND, true)]
    #[case(StatusCode::REQUEST_TIMEOUT, false)]
    #[case(StatusCode::TOO_MANY_REQUESTS, false)]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, false)]
    #[case(StatusCode::SERVICE_UNAVAILABLE, false)]
    fn client_errors_reject_the_token(#[case] status: StatusCode, #[case] rejected: bool) {
        let error = map_status_error(status, b"{\"ErrorMessage\":\"nope\"}");
        assert_eq!(
            matches!(error, IdentityVerifierError::Rejected { .. }),
            rejected
        );
        assert_eq!(error.counts_as_dependency_failure(), !rejected);
    }

    #[tokio::test]
    async fn unreachable_service_is_unavailable() {
        let base = Url::parse("http://127.0.0.1:9").expect("valid url");
        let verifier =
            HttpIdentityVerifier::new(&base, Duration::from_secs(2)).expect("client builds");
        let token = BearerToken::new("Bearer abc").expect("token");

        let error = verifier
            .verify(&token, Deadline::after(Duration::from_secs(5)))
            .await
            .expect_err("nothing listens on the discard port");

        assert!(error.counts_as_dependency_failure());
    }

    #[tokio::test]
    async fn tokens_that_are_not_header_values_are_rejected() {
        let base = Url::parse("http://127.0.0.1:9").expect("valid url");
        let verifier =
            HttpIdentityVerifier::new(&base, Duration::from_secs(2)).expect("client builds");
        let token = BearerToken::new("Bearer abc\n").expect("token");

        let error = verifier
            .verify(&token, Deadline::after(Duration::from_secs(5)))
            .await
            .expect_err("newline is not a valid header character");

        assert!(matches!(error, IdentityVerifierError::Rejected { .. }));
    }
}
