//! Canonical username type.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::types::email::Email;

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UsernameError {
    /// The input string is empty (or whitespace only).
    #[error("username cannot be empty")]
    Empty,
    /// The canonical form is too short.
    #[error("username must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The canonical form contains characters outside `[a-z0-9_]`.
    #[error("username can only contain letters, numbers, and underscores")]
    InvalidCharacters,
}

/// A canonical username.
///
/// Parsing canonicalizes the input: surrounding whitespace is trimmed,
/// letters are lowercased, and internal whitespace is stripped. The result
/// must be at least three characters from the set `[a-z0-9_]`.
///
/// Canonicalization is idempotent: parsing an already-canonical username
/// yields the same value.
///
/// ## Examples
///
/// ```
/// use stepahead_core::Username;
///
/// let username = Username::parse("  Alice 01 ").unwrap();
/// assert_eq!(username.as_str(), "alice01");
///
/// assert!(Username::parse("ab").is_err());       // too short
/// assert!(Username::parse("no-dashes").is_err()); // invalid characters
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Minimum length of a canonical username.
    pub const MIN_LENGTH: usize = 3;

    /// Parse a `Username` from a raw user-supplied string, canonicalizing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the canonical form:
    /// - Is empty
    /// - Is shorter than three characters
    /// - Contains characters outside `[a-z0-9_]`
    pub fn parse(raw: &str) -> Result<Self, UsernameError> {
        let canonical: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        if canonical.is_empty() {
            return Err(UsernameError::Empty);
        }

        if canonical.chars().count() < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        if !canonical
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(UsernameError::InvalidCharacters);
        }

        Ok(Self(canonical))
    }

    /// Returns the canonical username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Username` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Derive the synthetic email address for this username.
    ///
    /// The result is a pure function of the canonical username and the
    /// domain: the same inputs always yield the same address. This is what
    /// lets "does this user exist" checks work without a username index.
    #[must_use]
    pub fn synthetic_email(&self, domain: &str) -> Email {
        Email::synthetic(&self.0, domain)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_usernames() {
        assert!(Username::parse("alice").is_ok());
        assert!(Username::parse("alice_01").is_ok());
        assert!(Username::parse("123").is_ok());
        assert!(Username::parse("___").is_ok());
    }

    #[test]
    fn test_parse_canonicalizes() {
        let username = Username::parse("  Alice 01 ").unwrap();
        assert_eq!(username.as_str(), "alice01");

        let username = Username::parse("BOB_THE_GREAT").unwrap();
        assert_eq!(username.as_str(), "bob_the_great");
    }

    #[test]
    fn test_parse_is_idempotent() {
        for raw in ["  Alice 01 ", "BOB", "charlie_9", "\tDan\n"] {
            let once = Username::parse(raw).unwrap();
            let twice = Username::parse(once.as_str()).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Username::parse(""), Err(UsernameError::Empty)));
        assert!(matches!(Username::parse("   "), Err(UsernameError::Empty)));
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(
            Username::parse("ab"),
            Err(UsernameError::TooShort { min: 3 })
        ));
        // Whitespace stripping happens before the length check
        assert!(matches!(
            Username::parse(" a b "),
            Err(UsernameError::TooShort { min: 3 })
        ));
    }

    #[test]
    fn test_parse_invalid_characters() {
        assert!(matches!(
            Username::parse("no-dashes"),
            Err(UsernameError::InvalidCharacters)
        ));
        assert!(matches!(
            Username::parse("dots.bad"),
            Err(UsernameError::InvalidCharacters)
        ));
        assert!(matches!(
            Username::parse("émile"),
            Err(UsernameError::InvalidCharacters)
        ));
    }

    #[test]
    fn test_synthetic_email_is_deterministic() {
        let a = Username::parse("alice_01").unwrap();
        let b = Username::parse("  ALICE_01  ").unwrap();
        assert_eq!(
            a.synthetic_email("stepahead.app"),
            b.synthetic_email("stepahead.app")
        );
        assert_eq!(
            a.synthetic_email("stepahead.app").as_str(),
            "alice_01@stepahead.app"
        );
    }

    #[test]
    fn test_serde_roundtrip() {
        let username = Username::parse("alice_01").unwrap();
        let json = serde_json::to_string(&username).unwrap();
        assert_eq!(json, "\"alice_01\"");

        let parsed: Username = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, username);
    }

    #[test]
    fn test_from_str() {
        let username: Username = "alice_01".parse().unwrap();
        assert_eq!(username.as_str(), "alice_01");
    }
}
