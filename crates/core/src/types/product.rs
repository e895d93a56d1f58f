//! Product name type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ProductName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductNameError {
    /// The input is empty or whitespace only.
    #[error("product name cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("product name must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A free-text label of a product added to a cart.
///
/// There is no catalog linkage; the only guarantees are that the label is not
/// blank and has a bounded length. The text is stored exactly as submitted.
///
/// ## Examples
///
/// ```
/// use basket_core::ProductName;
///
/// assert!(ProductName::parse("Widget").is_ok());
/// assert!(ProductName::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ProductName(String);

impl ProductName {
    /// Maximum length of a product name, in characters.
    pub const MAX_LENGTH: usize = 512;

    /// Parse a `ProductName` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is blank or longer than 512 characters.
    pub fn parse(s: &str) -> Result<Self, ProductNameError> {
        if s.trim().is_empty() {
            return Err(ProductNameError::Empty);
        }

        if s.chars().count() > Self::MAX_LENGTH {
            return Err(ProductNameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the product name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ProductName` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProductName {
    type Err = ProductNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProductName {
    type Error = ProductNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProductName> for String {
    fn from(name: ProductName) -> Self {
        name.0
    }
}

impl AsRef<str> for ProductName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
