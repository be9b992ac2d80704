//! Helpers shared by the reqwest adapters for the identity and catalogue
//! services.
//!
//! Both services wrap successful payloads in the same envelope and are
//! addressed relative to a configured base URL.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

/// Failure to prepare an upstream HTTP adapter.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamClientError {
    /// The reqwest client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    /// The configured URL cannot have path segments appended.
    #[error("{0} cannot be used as a base URL")]
    InvalidBaseUrl(Url),
}

/// Success envelope used by the upstream services.
#[derive(Debug, Deserialize)]
pub(crate) struct SuccessEnvelope<T> {
    #[serde(rename = "SuccesData")]
    pub(crate) data: T,
}

/// Build a client whose every request is bounded by `timeout`.
pub(crate) fn client_with_timeout(timeout: Duration) -> Result<Client, UpstreamClientError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Append `segments` to the path of `base`, keeping any existing prefix.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, UpstreamClientError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| UpstreamClientError::InvalidBaseUrl(base.clone()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Whitespace-compacted, truncated rendering of a response body for errors.
pub(crate) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

/// `status 503` or `status 503: <body preview>`.
pub(crate) fn status_message(status: reqwest::StatusCode, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("http://users.internal:8080", "http://users.internal:8080/users/me")]
    #[case("http://users.internal:8080/", "http://users.internal:8080/users/me")]
    #[case("http://gateway.internal/identity/", "http://gateway.internal/identity/users/me")]
    #[case("http://gateway.internal/identity", "http://gateway.internal/identity/users/me")]
    fn endpoints_extend_the_base_path(#[case] base: &str, #[case] expected: &str) {
        let base = Url::parse(base).expect("valid url");
        let url = endpoint(&base, &["users", "me"]).expect("joinable base");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    fn opaque_urls_are_rejected() {
        let base = Url::parse("mailto:ops@example.com").expect("valid url");
        assert!(matches!(
            endpoint(&base, &["products"]),
            Err(UpstreamClientError::InvalidBaseUrl(_))
        ));
    }

    #[rstest]
    fn previews_are_compacted_and_truncated() {
        let body = format!("{{ \"error\":\n  \"{}\" }}", "x".repeat(300));
        let preview = body_preview(body.as_bytes());
        assert!(preview.starts_with("{ \"error\": \"x"));
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }

    #[rstest]
    fn status_messages_omit_empty_bodies() {
        assert_eq!(
            status_message(reqwest::StatusCode::BAD_GATEWAY, b"  "),
            "status 502"
        );
        assert_eq!(
            status_message(reqwest::StatusCode::NOT_FOUND, b"missing"),
            "status 404: missing"
        );
    }
}
