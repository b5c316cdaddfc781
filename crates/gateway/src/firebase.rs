//! Identity Toolkit REST client.
//!
//! Implements [`IdentityProvider`] against the email/password endpoints of
//! the managed identity backend (`accounts:signInWithPassword`,
//! `accounts:signUp`, `accounts:update`, `accounts:createAuthUri`,
//! `accounts:sendOobCode`). Provider error codes are classified into
//! [`ProviderError`] here; nothing above this layer sees a raw code.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use stepahead_core::{Email, UserId};

use crate::config::GatewayConfig;
use crate::provider::{Identity, IdentityProvider, ProviderError};

/// Identity Toolkit API base URL.
const BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// REST client for the identity provider.
#[derive(Clone)]
pub struct FirebaseAuthClient {
    client: reqwest::Client,
    api_key: SecretString,
}

impl FirebaseAuthClient {
    /// Create a new client from the gateway configuration.
    #[must_use]
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
        }
    }

    /// POST a JSON body to an `accounts:*` endpoint and decode the response.
    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<T, ProviderError> {
        let url = format!("{BASE_URL}/accounts:{endpoint}");
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.expose_secret())])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_api_error(&text));
        }

        response.json().await.map_err(ProviderError::from)
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuthClient {
    async fn sign_in(&self, email: &Email, password: &str) -> Result<Identity, ProviderError> {
        let body = json!({
            "email": email.as_str(),
            "password": password,
            "returnSecureToken": true,
        });
        let response: AccountResponse = self.post("signInWithPassword", &body).await?;
        Ok(response.into_identity(email))
    }

    async fn register(&self, email: &Email, password: &str) -> Result<Identity, ProviderError> {
        let body = json!({
            "email": email.as_str(),
            "password": password,
            "returnSecureToken": true,
        });
        let response: AccountResponse = self.post("signUp", &body).await?;
        Ok(response.into_identity(email))
    }

    async fn set_display_name(
        &self,
        identity: &Identity,
        name: &str,
    ) -> Result<(), ProviderError> {
        let body = json!({
            "idToken": identity.id_token,
            "displayName": name,
            "returnSecureToken": false,
        });
        let _: serde_json::Value = self.post("update", &body).await?;
        Ok(())
    }

    async fn sign_in_methods(&self, email: &Email) -> Result<Vec<String>, ProviderError> {
        // continueUri is required by the endpoint but unused here
        let body = json!({
            "identifier": email.as_str(),
            "continueUri": "http://localhost",
        });
        let response: CreateAuthUriResponse = self.post("createAuthUri", &body).await?;
        Ok(response.signin_methods.unwrap_or_default())
    }

    async fn send_reset_email(&self, email: &Email) -> Result<(), ProviderError> {
        let body = json!({
            "requestType": "PASSWORD_RESET",
            "email": email.as_str(),
        });
        let _: serde_json::Value = self.post("sendOobCode", &body).await?;
        Ok(())
    }
}

/// Response from `signInWithPassword` and `signUp`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
    id_token: String,
}

impl AccountResponse {
    /// The provider echoes the email back; fall back to the request address
    /// if the field is omitted.
    fn into_identity(self, requested: &Email) -> Identity {
        let email = self
            .email
            .as_deref()
            .and_then(|s| Email::parse(s).ok())
            .unwrap_or_else(|| requested.clone());
        Identity {
            uid: UserId::new(self.local_id),
            email,
            display_name: self.display_name,
            id_token: self.id_token,
        }
    }
}

/// Response from `createAuthUri`.
#[derive(Debug, Deserialize)]
struct CreateAuthUriResponse {
    #[serde(rename = "signinMethods")]
    signin_methods: Option<Vec<String>>,
}

/// Error envelope returned by the provider on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Classify a provider error body into a [`ProviderError`].
///
/// Messages look like `EMAIL_NOT_FOUND` or
/// `WEAK_PASSWORD : Password should be at least 6 characters`; the leading
/// token is the stable code.
fn classify_api_error(body: &str) -> ProviderError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.to_owned());
    let code = message
        .split([' ', ':'])
        .next()
        .unwrap_or_default()
        .to_owned();

    match code.as_str() {
        "EMAIL_NOT_FOUND" => ProviderError::NoSuchIdentity,
        "INVALID_LOGIN_CREDENTIALS" => ProviderError::CredentialNotRecognized,
        "INVALID_PASSWORD" => ProviderError::WrongPassword,
        "EMAIL_EXISTS" => ProviderError::AlreadyRegistered,
        "WEAK_PASSWORD" => ProviderError::WeakPassword(message),
        _ => ProviderError::Api { code, message },
    }
}
