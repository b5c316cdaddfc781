//! Identity provider contract.
//!
//! The gateway consumes the external authentication service only through
//! this trait, so tests can substitute a stub and record invocations.

use async_trait::async_trait;
use thiserror::Error;

use stepahead_core::{Email, UserId};

/// A signed-in (or freshly registered) identity.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Provider-issued opaque user identifier.
    pub uid: UserId,
    /// Address the identity is registered under.
    pub email: Email,
    /// Display name, if one has been set.
    pub display_name: Option<String>,
    /// Short-lived session token issued by the provider. Used as the bearer
    /// credential for document-store writes made on the user's behalf.
    pub id_token: String,
}

/// Failure reasons reported by the identity provider, classified.
///
/// Callers of the gateway never see these directly; the gateway maps them
/// into its own error taxonomy.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No identity is registered for the address.
    #[error("no account for this address")]
    NoSuchIdentity,
    /// The provider rejected the credential without saying whether the
    /// account exists. Some providers report this code for both a missing
    /// account and a wrong password.
    #[error("credential not recognized")]
    CredentialNotRecognized,
    /// Wrong password for an existing identity.
    #[error("wrong password")]
    WrongPassword,
    /// The address is already registered (registration only).
    #[error("address already registered")]
    AlreadyRegistered,
    /// The provider rejected the password as too weak (registration only).
    #[error("password rejected: {0}")]
    WeakPassword(String),
    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Any other provider-reported error.
    #[error("provider error: {code}: {message}")]
    Api {
        /// Provider error code string.
        code: String,
        /// Provider error message.
        message: String,
    },
}

/// External identity provider operations used by the gateway.
#[async_trait]
pub trait IdentityProvider {
    /// Sign in with an email/password pair.
    async fn sign_in(&self, email: &Email, password: &str) -> Result<Identity, ProviderError>;

    /// Register a new identity for the address.
    async fn register(&self, email: &Email, password: &str) -> Result<Identity, ProviderError>;

    /// Set the display name on an identity.
    async fn set_display_name(
        &self,
        identity: &Identity,
        name: &str,
    ) -> Result<(), ProviderError>;

    /// List the sign-in methods registered for an address.
    ///
    /// An empty list means no identity is registered under the address.
    async fn sign_in_methods(&self, email: &Email) -> Result<Vec<String>, ProviderError>;

    /// Ask the provider to send a password-reset message to the address.
    async fn send_reset_email(&self, email: &Email) -> Result<(), ProviderError>;
}

#[async_trait]
impl<T: IdentityProvider + Send + Sync + ?Sized> IdentityProvider for std::sync::Arc<T> {
    async fn sign_in(&self, email: &Email, password: &str) -> Result<Identity, ProviderError> {
        (**self).sign_in(email, password).await
    }

    async fn register(&self, email: &Email, password: &str) -> Result<Identity, ProviderError> {
        (**self).register(email, password).await
    }

    async fn set_display_name(
        &self,
        identity: &Identity,
        name: &str,
    ) -> Result<(), ProviderError> {
        (**self).set_display_name(identity, name).await
    }

    async fn sign_in_methods(&self, email: &Email) -> Result<Vec<String>, ProviderError> {
        (**self).sign_in_methods(email).await
    }

    async fn send_reset_email(&self, email: &Email) -> Result<(), ProviderError> {
        (**self).send_reset_email(email).await
    }
}
