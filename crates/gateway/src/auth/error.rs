//! Credential gateway error types.

use thiserror::Error;

use stepahead_core::UsernameError;

/// Local input validation failures. These never reach the network.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Username or password missing.
    #[error("please enter a username and password")]
    MissingField,

    /// Password shorter than the minimum.
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum allowed length.
        min: usize,
    },

    /// Username failed canonicalization rules.
    #[error(transparent)]
    Username(#[from] UsernameError),
}

/// Errors surfaced by the credential gateway.
///
/// Provider failures are classified into these kinds; raw provider error
/// codes never escape. [`GatewayError::user_message`] gives the short,
/// non-technical rendering for direct display.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Bad username/password shape (local, pre-network).
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Wrong password for an existing identity.
    #[error("incorrect password")]
    InvalidCredential,

    /// Registration race lost: the address became registered between the
    /// sign-in probe and the registration attempt. Callers should treat this
    /// as "retry sign-in", not as a terminal failure.
    #[error("username already taken")]
    UsernameTaken,

    /// The provider rejected the password as too weak.
    #[error("password too weak: {0}")]
    WeakPassword(String),

    /// Other provider-side registration failure (including a failed profile
    /// document write).
    #[error("registration failed: {0}")]
    Registration(String),

    /// Other provider-side sign-in failure.
    #[error("sign-in failed: {0}")]
    Auth(String),

    /// The password-reset request was rejected.
    #[error("password reset unavailable: {0}")]
    ResetUnavailable(String),
}

impl GatewayError {
    /// Short, non-technical message suitable for direct display.
    ///
    /// Internal provider error text is never included.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::InvalidCredential => "Incorrect password".to_owned(),
            Self::UsernameTaken => {
                "Username already taken. Please try signing in again.".to_owned()
            }
            Self::WeakPassword(_) => {
                "Password is too weak. Use at least 6 characters.".to_owned()
            }
            Self::Registration(_) => "Registration failed. Please try again.".to_owned(),
            Self::Auth(_) => "Login failed. Please try again.".to_owned(),
            Self::ResetUnavailable(_) => {
                "Password reset not available. Contact support.".to_owned()
            }
        }
    }
}
