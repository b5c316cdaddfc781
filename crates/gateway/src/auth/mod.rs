//! Unified credential gateway.
//!
//! Collapses "login" and "register" into one [`authenticate`] call: sign in
//! first, and if the address has no identity, register it. The provider's
//! atomic uniqueness check at registration time is the source of truth for
//! username ownership; the sign-in probe is only a routing decision.
//!
//! [`authenticate`]: CredentialGateway::authenticate

mod error;

pub use error::{GatewayError, ValidationError};

use chrono::{SecondsFormat, Utc};
use serde_json::json;
use tracing::{debug, info, warn};

use stepahead_core::{Email, Profile, UserId, Username};

use crate::provider::{Identity, IdentityProvider, ProviderError};
use crate::store::{DocumentStore, MergeMode};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Profile documents live in this collection, keyed by provider uid.
const USERS_COLLECTION: &str = "users";

/// Result of a successful [`CredentialGateway::authenticate`] call.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    /// The signed-in (or freshly registered) identity.
    pub identity: Identity,
    /// Whether this call registered the account.
    pub is_new_user: bool,
    /// Canonical form of the username that was authenticated.
    pub username: Username,
}

/// Unified credential gateway.
///
/// Holds the two external collaborators plus the synthetic-email domain.
/// Construction takes explicit values so tests can pass stubs.
pub struct CredentialGateway<P, S> {
    provider: P,
    store: S,
    email_domain: String,
}

impl<P, S> CredentialGateway<P, S>
where
    P: IdentityProvider,
    S: DocumentStore,
{
    /// Create a new gateway.
    pub fn new(provider: P, store: S, email_domain: impl Into<String>) -> Self {
        Self {
            provider,
            store,
            email_domain: email_domain.into(),
        }
    }

    /// Sign in, registering the account first if it does not exist.
    ///
    /// Validation runs before any external call. On sign-in failure with a
    /// "no such identity" or "credential not recognized" reason, the gateway
    /// registers the address, sets the display name to the username as
    /// typed, and writes the profile document.
    ///
    /// Two concurrent calls for the same brand-new username can both reach
    /// the registration branch; the provider lets exactly one succeed and
    /// the other surfaces [`GatewayError::UsernameTaken`].
    ///
    /// Note: providers that report an ambiguous "invalid credential" code
    /// for both a missing account and a wrong password will route a mistyped
    /// password into the registration branch, where it then fails as
    /// `UsernameTaken`. This mirrors the production flow deliberately.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] classifying the failure; see the error
    /// type for the full taxonomy.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthOutcome, GatewayError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(ValidationError::MissingField.into());
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            }
            .into());
        }

        let canonical = Username::parse(username).map_err(ValidationError::from)?;
        let email = canonical.synthetic_email(&self.email_domain);

        debug!(username = %canonical, "attempting sign-in");
        match self.provider.sign_in(&email, password).await {
            Ok(identity) => {
                info!(username = %canonical, uid = %identity.uid, "sign-in successful");
                Ok(AuthOutcome {
                    identity,
                    is_new_user: false,
                    username: canonical,
                })
            }
            Err(ProviderError::NoSuchIdentity | ProviderError::CredentialNotRecognized) => {
                self.register_new_user(username, canonical, &email, password)
                    .await
            }
            Err(ProviderError::WrongPassword) => Err(GatewayError::InvalidCredential),
            Err(other) => Err(GatewayError::Auth(other.to_string())),
        }
    }

    /// Registration fallback for [`authenticate`](Self::authenticate).
    async fn register_new_user(
        &self,
        raw_username: &str,
        canonical: Username,
        email: &Email,
        password: &str,
    ) -> Result<AuthOutcome, GatewayError> {
        debug!(username = %canonical, "no account found, registering");

        let mut identity = match self.provider.register(email, password).await {
            Ok(identity) => identity,
            Err(ProviderError::AlreadyRegistered) => return Err(GatewayError::UsernameTaken),
            Err(ProviderError::WeakPassword(message)) => {
                return Err(GatewayError::WeakPassword(message));
            }
            Err(other) => return Err(GatewayError::Registration(other.to_string())),
        };

        // Display name is the username as the user typed it
        let display_name = raw_username.trim();
        self.provider
            .set_display_name(&identity, display_name)
            .await
            .map_err(|e| GatewayError::Registration(e.to_string()))?;
        identity.display_name = Some(display_name.to_owned());

        let profile = Profile::at_registration(display_name, email.clone(), Utc::now());
        let fields = serde_json::to_value(&profile)
            .map_err(|e| GatewayError::Registration(e.to_string()))?;
        self.store
            .upsert(
                USERS_COLLECTION,
                identity.uid.as_str(),
                &fields,
                MergeMode::Replace,
            )
            .await
            .map_err(|e| GatewayError::Registration(e.to_string()))?;

        info!(username = %canonical, uid = %identity.uid, "account created");
        Ok(AuthOutcome {
            identity,
            is_new_user: true,
            username: canonical,
        })
    }

    /// Best-effort availability check for a username.
    ///
    /// Asks the provider for the sign-in methods registered on the derived
    /// address. Fails open: any provider error counts as "available", so
    /// this must never be used as a security gate. The registration path
    /// stays the authoritative uniqueness check.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] if the username is malformed;
    /// provider errors do not surface.
    pub async fn is_username_available(&self, username: &str) -> Result<bool, GatewayError> {
        let canonical = Username::parse(username).map_err(ValidationError::from)?;
        let email = canonical.synthetic_email(&self.email_domain);

        match self.provider.sign_in_methods(&email).await {
            Ok(methods) => Ok(methods.is_empty()),
            Err(err) => {
                debug!(username = %canonical, error = %err, "availability check failed, assuming available");
                Ok(true)
            }
        }
    }

    /// Record the current time as the user's last login.
    ///
    /// Merge-upserts only the `lastLogin` field; other profile fields are
    /// untouched. Failure is logged and swallowed: this is telemetry, not
    /// correctness-critical.
    pub async fn update_last_login(&self, user_id: &UserId) {
        let fields = json!({
            "lastLogin": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        });
        if let Err(err) = self
            .store
            .upsert(USERS_COLLECTION, user_id.as_str(), &fields, MergeMode::Merge)
            .await
        {
            warn!(uid = %user_id, error = %err, "failed to update last login");
        }
    }

    /// Ask the provider to send a password-reset message to the derived
    /// address.
    ///
    /// Operational caveat: the synthetic address is not a mailbox the user
    /// controls, so the reset mail only lands if mail forwarding for the
    /// auth domain is set up out of band.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] for a malformed username, or
    /// [`GatewayError::ResetUnavailable`] on any provider error.
    pub async fn request_password_reset(&self, username: &str) -> Result<(), GatewayError> {
        let canonical = Username::parse(username).map_err(ValidationError::from)?;
        let email = canonical.synthetic_email(&self.email_domain);

        self.provider
            .send_reset_email(&email)
            .await
            .map_err(|e| GatewayError::ResetUnavailable(e.to_string()))?;
        info!(username = %canonical, "password reset email requested");
        Ok(())
    }
}
