//! Firestore REST client.
//!
//! Implements [`DocumentStore`] over the Firestore v1 REST API. Documents
//! are addressed as `<collection>/<document_id>`; merge-mode writes use
//! `updateMask.fieldPaths` so only the named fields are touched. The typed
//! wire format (`stringValue`, `integerValue`, ...) is encoded and decoded
//! here; everything above this layer works with plain JSON.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::config::GatewayConfig;
use crate::store::{DocumentStore, MergeMode, StoreError};

/// Firestore API base URL.
const BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// REST client for the document store.
#[derive(Clone)]
pub struct FirestoreClient {
    client: reqwest::Client,
    api_key: SecretString,
    project_id: String,
    id_token: Option<String>,
}

impl FirestoreClient {
    /// Create a new client from the gateway configuration.
    ///
    /// Without an ID token, requests are subject to the store's public
    /// security rules (enough for the read-only diagnostic).
    #[must_use]
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            project_id: config.project_id.clone(),
            id_token: None,
        }
    }

    /// Attach a signed-in user's ID token; writes then run as that user.
    #[must_use]
    pub fn with_id_token(mut self, id_token: impl Into<String>) -> Self {
        self.id_token = Some(id_token.into());
        self
    }

    fn documents_url(&self, path: &str) -> String {
        format!(
            "{BASE_URL}/projects/{}/databases/(default)/documents/{path}",
            self.project_id
        )
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.query(&[("key", self.api_key.expose_secret())]);
        match &self.id_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// List all documents in the `users` collection, following page tokens.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PermissionDenied`] if security rules block the
    /// read, or another [`StoreError`] on transport/decode failure.
    pub async fn list_users(&self) -> Result<Vec<UserDocument>, StoreError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(self.documents_url("users"))
                .query(&[("pageSize", "300")]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }
            let response = self.apply_auth(request).send().await?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(api_error(status.as_u16(), message));
            }

            let list: ListDocumentsResponse = response
                .json()
                .await
                .map_err(|e| StoreError::Decode(e.to_string()))?;

            documents.extend(
                list.documents
                    .unwrap_or_default()
                    .into_iter()
                    .map(RawDocument::into_user_document),
            );

            match list.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(documents)
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn upsert(
        &self,
        collection: &str,
        document_id: &str,
        fields: &Value,
        mode: MergeMode,
    ) -> Result<(), StoreError> {
        let body = json!({ "fields": encode_fields(fields)? });

        let mut request = self
            .client
            .patch(self.documents_url(&format!("{collection}/{document_id}")))
            .json(&body);

        if mode == MergeMode::Merge {
            // Repeated updateMask.fieldPaths params restrict the write to the
            // named top-level fields
            let field_names: Vec<(&str, &String)> = fields
                .as_object()
                .map(|map| {
                    map.keys()
                        .map(|name| ("updateMask.fieldPaths", name))
                        .collect()
                })
                .unwrap_or_default();
            request = request.query(&field_names);
        }

        let response = self.apply_auth(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), message));
        }

        Ok(())
    }
}

fn api_error(status: u16, message: String) -> StoreError {
    if status == 403 || message.contains("PERMISSION_DENIED") {
        StoreError::PermissionDenied
    } else {
        StoreError::Api { status, message }
    }
}

/// A document from the `users` collection, decoded to plain JSON.
#[derive(Debug, Clone)]
pub struct UserDocument {
    /// Document ID (the provider-issued uid).
    pub id: String,
    /// Decoded document fields.
    pub data: Value,
}

/// One page of the `documents/users` listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    documents: Option<Vec<RawDocument>>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    /// Full resource name; the document ID is the last path segment.
    name: String,
    fields: Option<Map<String, Value>>,
}

impl RawDocument {
    fn into_user_document(self) -> UserDocument {
        let id = self
            .name
            .rsplit('/')
            .next()
            .unwrap_or(self.name.as_str())
            .to_owned();
        let data = self
            .fields
            .map_or(Value::Null, |fields| Value::Object(decode_fields(&fields)));
        UserDocument { id, data }
    }
}

// =============================================================================
// Typed value codec
// =============================================================================

/// Encode a plain JSON object into the store's `fields` wire format.
///
/// # Errors
///
/// Returns [`StoreError::Decode`] if `fields` is not a JSON object.
pub fn encode_fields(fields: &Value) -> Result<Value, StoreError> {
    let map = fields
        .as_object()
        .ok_or_else(|| StoreError::Decode("document fields must be a JSON object".to_owned()))?;

    let encoded: Map<String, Value> = map
        .iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect();
    Ok(Value::Object(encoded))
}

/// A native timestamp field value, for callers that want the store to index
/// a field as a timestamp rather than a string. Passed through unchanged by
/// [`encode_fields`].
#[must_use]
pub fn timestamp_value(at: &DateTime<Utc>) -> Value {
    json!({ "timestampValue": at.to_rfc3339_opts(SecondsFormat::Millis, true) })
}

fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            // Integer values are strings on the wire
            n.as_i64().map_or_else(
                || json!({ "doubleValue": n }),
                |i| json!({ "integerValue": i.to_string() }),
            )
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => {
            // Already-typed timestamps (see `timestamp_value`) go out as-is
            if map.len() == 1 && map.contains_key("timestampValue") {
                return value.clone();
            }
            let fields: Map<String, Value> = map
                .iter()
                .map(|(key, value)| (key.clone(), encode_value(value)))
                .collect();
            json!({ "mapValue": { "fields": fields } })
        }
    }
}

/// Decode a `fields` map from the wire format back to plain JSON.
#[must_use]
pub fn decode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), decode_value(value)))
        .collect()
}

fn decode_value(value: &Value) -> Value {
    let Some(map) = value.as_object() else {
        return Value::Null;
    };

    if let Some(s) = map.get("stringValue").and_then(Value::as_str) {
        return Value::String(s.to_owned());
    }
    if let Some(s) = map.get("timestampValue").and_then(Value::as_str) {
        return Value::String(s.to_owned());
    }
    if let Some(b) = map.get("booleanValue").and_then(Value::as_bool) {
        return Value::Bool(b);
    }
    if let Some(s) = map.get("integerValue").and_then(Value::as_str) {
        return s.parse::<i64>().map_or(Value::Null, Value::from);
    }
    if let Some(d) = map.get("doubleValue") {
        return d.clone();
    }
    if let Some(items) = map
        .get("arrayValue")
        .and_then(|a| a.get("values"))
        .and_then(Value::as_array)
    {
        return Value::Array(items.iter().map(decode_value).collect());
    }
    if let Some(fields) = map
        .get("mapValue")
        .and_then(|m| m.get("fields"))
        .and_then(Value::as_object)
    {
        return Value::Object(decode_fields(fields));
    }
    if map.contains_key("nullValue") {
        return Value::Null;
    }

    Value::Null
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_scalars() {
        let fields = json!({
            "username": "alice_01",
            "totalScore": 95,
            "totalTime": 72.0_f64,
            "isBonus": true,
            "missing": null,
        });
        let encoded = encode_fields(&fields).unwrap();

        assert_eq!(encoded["username"], json!({ "stringValue": "alice_01" }));
        assert_eq!(encoded["totalScore"], json!({ "integerValue": "95" }));
        assert_eq!(encoded["totalTime"], json!({ "doubleValue": 72.0 }));
        assert_eq!(encoded["isBonus"], json!({ "booleanValue": true }));
        assert_eq!(encoded["missing"], json!({ "nullValue": null }));
    }

    #[test]
    fn test_encode_arrays_and_maps() {
        let fields = json!({
            "stepTimes": [28.5, 19.2],
            "meta": { "dayOfWeek": 1 },
        });
        let encoded = encode_fields(&fields).unwrap();

        assert_eq!(
            encoded["stepTimes"],
            json!({ "arrayValue": { "values": [
                { "doubleValue": 28.5 },
                { "doubleValue": 19.2 },
            ] } })
        );
        assert_eq!(
            encoded["meta"],
            json!({ "mapValue": { "fields": { "dayOfWeek": { "integerValue": "1" } } } })
        );
    }

    #[test]
    fn test_encode_rejects_non_object() {
        assert!(matches!(
            encode_fields(&json!("not an object")),
            Err(StoreError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_round_trip() {
        let fields = json!({
            "username": "alice_01",
            "dayOfWeek": 1,
            "stepTimes": [28.5, 19.2],
            "isBonus": true,
            "profile": { "displayName": "alice_01" },
        });
        let encoded = encode_fields(&fields).unwrap();
        let decoded = decode_fields(encoded.as_object().unwrap());
        assert_eq!(Value::Object(decoded), fields);
    }

    #[test]
    fn test_encode_timestamp_passthrough() {
        let at = chrono::TimeZone::with_ymd_and_hms(&Utc, 2024, 5, 1, 12, 0, 0).unwrap();
        let fields = json!({
            "completedAt": at.to_rfc3339(),
            "timestamp": timestamp_value(&at),
        });
        let encoded = encode_fields(&fields).unwrap();

        assert_eq!(
            encoded["timestamp"],
            json!({ "timestampValue": "2024-05-01T12:00:00.000Z" })
        );
        // The plain-string sibling still encodes as a string
        assert!(encoded["completedAt"].get("stringValue").is_some());

        let decoded = decode_fields(encoded.as_object().unwrap());
        assert_eq!(decoded["timestamp"], json!("2024-05-01T12:00:00.000Z"));
    }

    #[test]
    fn test_list_response_carries_page_token() {
        let body = json!({
            "documents": [
                { "name": "projects/p/databases/(default)/documents/users/uid-1" },
            ],
            "nextPageToken": "token-abc",
        });
        let list: ListDocumentsResponse = serde_json::from_value(body).unwrap();
        assert_eq!(list.next_page_token.as_deref(), Some("token-abc"));
        assert_eq!(list.documents.unwrap().len(), 1);
    }

    #[test]
    fn test_decode_timestamp_as_string() {
        let mut fields = Map::new();
        fields.insert(
            "completedAt".to_owned(),
            json!({ "timestampValue": "2024-05-01T12:00:00Z" }),
        );
        let decoded = decode_fields(&fields);
        assert_eq!(decoded["completedAt"], json!("2024-05-01T12:00:00Z"));
    }

    #[test]
    fn test_document_id_from_resource_name() {
        let raw = RawDocument {
            name: "projects/p/databases/(default)/documents/users/uid-42".to_owned(),
            fields: None,
        };
        let doc = raw.into_user_document();
        assert_eq!(doc.id, "uid-42");
        assert_eq!(doc.data, Value::Null);
    }
}
