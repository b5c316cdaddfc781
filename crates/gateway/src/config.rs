//! Gateway configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STEPAHEAD_API_KEY` - Identity/document backend web API key
//! - `STEPAHEAD_PROJECT_ID` - Backend project identifier
//!
//! ## Optional
//! - `STEPAHEAD_AUTH_DOMAIN` - Domain suffix for generated synthetic emails
//!   (default: stepahead.app)
//!
//! The configuration is an explicit value handed to the clients and the
//! gateway at construction time, never process-wide state, so everything
//! stays testable with stub collaborators.

use secrecy::SecretString;
use thiserror::Error;

/// Default domain suffix for generated synthetic emails.
pub const DEFAULT_AUTH_DOMAIN: &str = "stepahead.app";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Gateway configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Backend web API key.
    pub api_key: SecretString,
    /// Backend project identifier (scopes the document store).
    pub project_id: String,
    /// Domain suffix for generated synthetic emails.
    pub auth_domain: String,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &"[REDACTED]")
            .field("project_id", &self.project_id)
            .field("auth_domain", &self.auth_domain)
            .finish()
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or the auth
    /// domain is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_key = get_required_env("STEPAHEAD_API_KEY").map(SecretString::from)?;
        let project_id = get_required_env("STEPAHEAD_PROJECT_ID")?;
        let auth_domain = get_env_or_default("STEPAHEAD_AUTH_DOMAIN", DEFAULT_AUTH_DOMAIN);
        validate_auth_domain(&auth_domain)?;

        Ok(Self {
            api_key,
            project_id,
            auth_domain,
        })
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// The auth domain becomes the right-hand side of every synthetic email, so
/// it must itself be a bare domain.
fn validate_auth_domain(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty()
        || domain.contains('@')
        || domain.chars().any(char::is_whitespace)
    {
        return Err(ConfigError::InvalidEnvVar(
            "STEPAHEAD_AUTH_DOMAIN".to_string(),
            format!("not a valid domain: {domain:?}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_auth_domain_accepts_bare_domain() {
        assert!(validate_auth_domain("stepahead.app").is_ok());
        assert!(validate_auth_domain("example.co.uk").is_ok());
    }

    #[test]
    fn test_validate_auth_domain_rejects_at_and_whitespace() {
        assert!(validate_auth_domain("").is_err());
        assert!(validate_auth_domain("user@stepahead.app").is_err());
        assert!(validate_auth_domain("step ahead.app").is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = GatewayConfig {
            api_key: SecretString::from("super-secret-key"),
            project_id: "stepahead-519b0".to_string(),
            auth_domain: DEFAULT_AUTH_DOMAIN.to_string(),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret-key"));
        assert!(debug_output.contains("stepahead-519b0"));
    }
}
