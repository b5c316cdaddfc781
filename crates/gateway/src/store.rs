//! Document store contract.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Write semantics for [`DocumentStore::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Only the named fields are touched; other document fields survive.
    Merge,
    /// The document is replaced wholesale.
    Replace,
}

/// Errors that can occur when talking to the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// The store rejected the request for lack of permission. Surfaced
    /// separately because the diagnostic command gives it a dedicated hint.
    #[error("permission denied by store security rules")]
    PermissionDenied,
    /// Any other store-reported error.
    #[error("store error: {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Store error message.
        message: String,
    },
    /// A response could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

/// External document store operations used by the gateway.
///
/// `fields` is a plain JSON object; implementations are responsible for any
/// wire-format encoding the store requires.
#[async_trait]
pub trait DocumentStore {
    /// Create or update a document.
    async fn upsert(
        &self,
        collection: &str,
        document_id: &str,
        fields: &Value,
        mode: MergeMode,
    ) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: DocumentStore + Send + Sync + ?Sized> DocumentStore for std::sync::Arc<T> {
    async fn upsert(
        &self,
        collection: &str,
        document_id: &str,
        fields: &Value,
        mode: MergeMode,
    ) -> Result<(), StoreError> {
        (**self).upsert(collection, document_id, fields, mode).await
    }
}
