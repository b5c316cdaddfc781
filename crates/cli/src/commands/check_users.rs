//! Diagnose whether user documents exist in the document store.
//!
//! Signups that only create identities (and never profile documents) are a
//! recurring failure mode; this command makes the difference visible. An
//! empty collection is not an error: the command exits 0 whenever the read
//! itself succeeds.

use tracing::{error, info, warn};

use stepahead_gateway::config::GatewayConfig;
use stepahead_gateway::firestore::FirestoreClient;
use stepahead_gateway::store::StoreError;

/// List the `users` collection and report what was found.
///
/// # Errors
///
/// Returns an error (exit 1) if the read fails or is blocked by security
/// rules.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = GatewayConfig::from_env()?;
    let store = FirestoreClient::new(&config);

    info!(project = %config.project_id, "Checking users collection");

    let documents = match store.list_users().await {
        Ok(documents) => documents,
        Err(StoreError::PermissionDenied) => {
            error!("Permission denied reading the users collection");
            error!("The store's security rules are blocking reads; check the rules console");
            return Err(StoreError::PermissionDenied.into());
        }
        Err(other) => {
            error!("Failed to read users collection: {other}");
            return Err(other.into());
        }
    };

    if documents.is_empty() {
        warn!("No users found in the document store");
        warn!("Possible causes:");
        warn!("  1. Users are signing up but profile writes are failing");
        warn!("  2. Security rules are blocking writes");
        warn!("  3. Users exist only in the identity provider, not the store");
        return Ok(());
    }

    info!("Found {} user(s):", documents.len());
    for document in &documents {
        info!(id = %document.id, data = %document.data, "user document");
    }

    Ok(())
}
