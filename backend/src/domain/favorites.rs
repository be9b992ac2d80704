//! Favourite lists and the product references they hold.
//!
//! A [`FavoriteList`] belongs to exactly one user for its whole life and owns
//! its [`FavoriteItem`]s: removing the list removes the items with it. Items
//! only reference catalogue products by id; product details are resolved on
//! read.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Product, ProductId, UserId};

const LIST_NAME_MIN_CHARS: usize = 2;
const LIST_NAME_MAX_CHARS: usize = 100;

/// Validation failures for favourite list inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FavoriteValidationError {
    /// List identifiers are positive integers.
    #[error("list id must be positive, got {0}")]
    NonPositiveListId(i32),
    /// The name was blank once trimmed.
    #[error("list name is required")]
    EmptyListName,
    /// The trimmed name is outside the accepted length range.
    #[error("list name must be between {min} and {max} characters, got {actual}")]
    ListNameLength {
        /// Minimum accepted length.
        min: usize,
        /// Maximum accepted length.
        max: usize,
        /// Length supplied by the caller.
        actual: usize,
    },
}

/// Persistent identifier of a favourite list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct ListId(i32);

impl ListId {
    /// Validate a raw identifier.
    pub fn new(raw: i32) -> Result<Self, FavoriteValidationError> {
        if raw <= 0 {
            return Err(FavoriteValidationError::NonPositiveListId(raw));
        }
        Ok(Self(raw))
    }

    /// Raw integer value.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for ListId {
    type Error = FavoriteValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ListId> for i32 {
    fn from(value: ListId) -> Self {
        value.0
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name of a favourite list.
///
/// ## Invariants
/// - Stored trimmed.
/// - Between 2 and 100 characters long, counted as Unicode scalar values.
///
/// # Examples
/// ```
/// use favorites::domain::ListName;
///
/// let name = ListName::new("  Weekend  ").expect("valid name");
/// assert_eq!(name.as_str(), "Weekend");
/// assert!(ListName::new("x").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListName(String);

impl ListName {
    /// Validate and normalise a raw list name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, FavoriteValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(FavoriteValidationError::EmptyListName);
        }
        let actual = trimmed.chars().count();
        if !(LIST_NAME_MIN_CHARS..=LIST_NAME_MAX_CHARS).contains(&actual) {
            return Err(FavoriteValidationError::ListNameLength {
                min: LIST_NAME_MIN_CHARS,
                max: LIST_NAME_MAX_CHARS,
                actual,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ListName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted favourite list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteList {
    pub id: ListId,
    pub name: ListName,
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
}

/// Owner projection used by authorisation checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOwner {
    pub list_id: ListId,
    pub owner: UserId,
}

/// Input for creating a list. The owner always comes from the verified caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFavoriteList {
    pub name: ListName,
    pub owner: UserId,
}

/// A product reference stored in a list.
///
/// `(list_id, product_id)` is the natural key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FavoriteItem {
    pub list_id: ListId,
    pub product_id: ProductId,
    pub created_at: DateTime<Utc>,
}

/// Input for adding a product to a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewFavoriteItem {
    pub list_id: ListId,
    pub product_id: ProductId,
}

/// Read model pairing a list with its resolved products.
///
/// Products carry no positional relationship to the stored items.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteListWithProducts {
    pub list_id: ListId,
    pub list_name: ListName,
    pub products: Vec<Product>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ab")]
    #[case("  Gifts for Ada  ")]
    #[case("çé")]
    fn accepts_names_within_bounds(#[case] raw: &str) {
        let name = ListName::new(raw).expect("valid name");
        assert_eq!(name.as_str(), raw.trim());
    }

    #[rstest]
    fn accepts_exactly_one_hundred_characters() {
        let raw = "n".repeat(100);
        assert!(ListName::new(&raw).is_ok());
    }

    #[rstest]
    #[case("", FavoriteValidationError::EmptyListName)]
    #[case("   ", FavoriteValidationError::EmptyListName)]
    #[case(" a ", FavoriteValidationError::ListNameLength { min: 2, max: 100, actual: 1 })]
    fn rejects_short_names(#[case] raw: &str, #[case] expected: FavoriteValidationError) {
        assert_eq!(ListName::new(raw).expect_err("invalid name"), expected);
    }

    #[rstest]
    fn rejects_long_names() {
        let raw = "n".repeat(101);
        assert!(matches!(
            ListName::new(&raw),
            Err(FavoriteValidationError::ListNameLength { actual: 101, .. })
        ));
    }

    #[rstest]
    #[case(0)]
    #[case(-1)]
    fn rejects_non_positive_list_ids(#[case] raw: i32) {
        assert_eq!(
            ListId::new(raw).expect_err("invalid id"),
            FavoriteValidationError::NonPositiveListId(raw)
        );
    }
}
