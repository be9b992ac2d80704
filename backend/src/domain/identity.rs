//! Caller identity primitives.
//!
//! A [`BearerToken`] is opaque to this service: it is forwarded verbatim to the
//! identity service, which answers with the [`User`] it belongs to. Users are
//! never persisted here and live for a single request.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Validation failures for identity primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityValidationError {
    /// The token was missing or blank once trimmed.
    #[error("bearer token must not be empty")]
    EmptyToken,
    /// User identifiers are positive integers.
    #[error("user id must be positive, got {0}")]
    NonPositiveUserId(i32),
}

/// Opaque bearer token presented by the caller.
///
/// ## Invariants
/// - The raw value is non-empty after trimming.
/// - The value is wiped from memory on drop and never printed by `Debug`.
///
/// # Examples
/// ```
/// use favorites::domain::BearerToken;
///
/// let token = BearerToken::new("Bearer abc").expect("non-empty token");
/// assert_eq!(token.as_str(), "Bearer abc");
/// assert_eq!(format!("{token:?}"), "BearerToken(<redacted>)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(Zeroizing<String>);

impl BearerToken {
    /// Wrap a raw `Authorization` header value.
    pub fn new(raw: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let raw = Zeroizing::new(raw.into());
        if raw.trim().is_empty() {
            return Err(IdentityValidationError::EmptyToken);
        }
        Ok(Self(raw))
    }

    /// Raw header value to forward upstream.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Identifier assigned to users by the identity service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct UserId(i32);

impl UserId {
    /// Validate a raw identifier.
    pub fn new(raw: i32) -> Result<Self, IdentityValidationError> {
        if raw <= 0 {
            return Err(IdentityValidationError::NonPositiveUserId(raw));
        }
        Ok(Self(raw))
    }

    /// Raw integer value.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for UserId {
    type Error = IdentityValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i32 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authenticated caller as described by the identity service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Stable identifier.
    pub id: UserId,
    /// Contact address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Avatar image location, when the user has one.
    pub avatar_url: Option<String>,
}
