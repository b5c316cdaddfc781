//! Per-user profile document.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::types::email::Email;

/// Denormalized profile document stored under `users/<uid>`.
///
/// Written once at registration time. Only `lastLogin` is mutated afterwards,
/// via a merge-style upsert, so the remaining fields are effectively
/// immutable once written.
///
/// Timestamps are RFC 3339 strings, matching what the mobile app reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Display form of the username as the user typed it.
    pub username: String,
    /// Generated synthetic email address.
    pub email: Email,
    /// Display name (same as the username at registration).
    pub display_name: String,
    /// When the account was created.
    pub created_at: String,
    /// Last successful login.
    pub last_login: String,
}

impl Profile {
    /// Build the profile written at registration time.
    ///
    /// Both timestamps are set to `now`, since registration doubles as the
    /// first login.
    #[must_use]
    pub fn at_registration(username: &str, email: Email, now: DateTime<Utc>) -> Self {
        let timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        Self {
            username: username.to_owned(),
            email,
            display_name: username.to_owned(),
            created_at: timestamp.clone(),
            last_login: timestamp,
        }
    }
}
