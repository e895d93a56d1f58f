//! Anonymous session identifier type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Number of random bytes behind a freshly issued session identifier (128 bits).
pub const SESSION_ID_BYTES: usize = 16;

/// Errors that can occur when parsing a [`SessionId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionIdError {
    /// The input string is empty.
    #[error("session id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("session id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains whitespace, control or non-ASCII characters.
    #[error("session id must contain only visible ASCII characters")]
    InvalidCharacter,
}

/// An opaque token correlating anonymous requests to one visitor's cart.
///
/// Identifiers issued by the server are 32 lowercase hex characters rendered
/// from [`SESSION_ID_BYTES`] random bytes. Values presented back by clients are
/// accepted unchanged as long as they look like a cookie token.
///
/// ## Constraints
///
/// - Length: 1-128 characters
/// - Visible ASCII only (no whitespace, no control characters)
///
/// ## Examples
///
/// ```
/// use basket_core::SessionId;
///
/// let issued = SessionId::from_random_bytes([0xab; 16]);
/// assert_eq!(issued.as_str().len(), 32);
///
/// assert!(SessionId::parse("3f9a0c").is_ok());
/// assert!(SessionId::parse("").is_err());
/// assert!(SessionId::parse("has space").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Maximum length of a session identifier accepted from a client.
    pub const MAX_LENGTH: usize = 128;

    /// Render a session identifier from random bytes as lowercase hex.
    #[must_use]
    pub fn from_random_bytes(bytes: [u8; SESSION_ID_BYTES]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Parse a `SessionId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 128 characters, or
    /// contains anything other than visible ASCII.
    pub fn parse(s: &str) -> Result<Self, SessionIdError> {
        if s.is_empty() {
            return Err(SessionIdError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(SessionIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !s.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(SessionIdError::InvalidCharacter);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the session identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `SessionId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SessionId {
    type Err = SessionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SessionId {
    type Error = SessionIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_random_bytes_is_fixed_length_hex() {
        let bytes = [
            0x00, 0xff, 0x10, 0x0a, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12,
        ];
        let id = SessionId::from_random_bytes(bytes);
        assert_eq!(id.as_str().len(), SESSION_ID_BYTES * 2);
        assert!(id.as_str().starts_with("00ff100a"));
        assert!(id.as_str().bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn test_distinct_bytes_give_distinct_ids() {
        let a = SessionId::from_random_bytes([1; 16]);
        let b = SessionId::from_random_bytes([2; 16]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_issued_id_parses_back() {
        let issued = SessionId::from_random_bytes([0x5c; 16]);
        let parsed = SessionId::parse(issued.as_str()).unwrap();
        assert_eq!(issued, parsed);
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(SessionId::parse(""), Err(SessionIdError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(SessionId::MAX_LENGTH + 1);
        assert!(matches!(
            SessionId::parse(&long),
            Err(SessionIdError::TooLong { .. })
        ));
        assert!(SessionId::parse(&"a".repeat(SessionId::MAX_LENGTH)).is_ok());
    }

    #[test]
    fn test_parse_rejects_whitespace_and_non_ascii() {
        assert_eq!(
            SessionId::parse("abc def"),
            Err(SessionIdError::InvalidCharacter)
        );
        assert_eq!(
            SessionId::parse("abc\tdef"),
            Err(SessionIdError::InvalidCharacter)
        );
        assert_eq!(SessionId::parse("café"), Err(SessionIdError::InvalidCharacter));
    }

    #[test]
    fn test_client_values_kept_unchanged() {
        // Non-hex tokens from older clients are accepted verbatim
        let id = SessionId::parse("Legacy-Token_01").unwrap();
        assert_eq!(id.as_str(), "Legacy-Token_01");
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let ok: Result<SessionId, _> = serde_json::from_str("\"abc\"");
        assert!(ok.is_ok());
        let err: Result<SessionId, _> = serde_json::from_str("\"\"");
        assert!(err.is_err());
    }
}
