//! Firestore REST integration.
//!
//! This module provides a thin client over the Firestore v1 REST API, covering
//! the three operations the bot needs: reading a document, atomically
//! incrementing a numeric field, and listing the documents of a collection.

use crate::error::{ArchyError, Result};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// OAuth scope covering Firestore reads and writes.
const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

/// Default time allowed for a single Firestore request.
pub const DEFAULT_FIRESTORE_TIMEOUT: Duration = Duration::from_secs(10);

/// A Firestore document as returned by the REST API.
#[derive(Deserialize, Debug, Clone)]
pub struct Document {
    /// Full resource name (`projects/{p}/databases/(default)/documents/...`)
    pub name: String,
    /// Typed field values, keyed by field name
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// The last path segment of the resource name.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Read a `booleanValue` field.
    ///
    /// Returns `None` if the field is missing or holds another type.
    pub fn boolean_field(&self, field: &str) -> Option<bool> {
        self.fields.get(field)?.get("booleanValue")?.as_bool()
    }

    /// Read an `integerValue` field. Firestore encodes 64-bit integers as
    /// decimal strings.
    pub fn integer_field(&self, field: &str) -> Option<i64> {
        match self.fields.get(field)?.get("integerValue")? {
            Value::String(raw) => raw.parse().ok(),
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

/// How requests to Firestore are authorized.
#[derive(Clone)]
pub enum FirestoreAuth {
    /// No credentials, for the local emulator.
    Anonymous,
    /// A fixed bearer token.
    Static(String),
    /// Tokens minted and refreshed from Google application credentials.
    ServiceAccount(Arc<dyn gcp_auth::TokenProvider>),
}

impl fmt::Debug for FirestoreAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "Anonymous"),
            Self::Static(_) => write!(f, "Static(<redacted>)"),
            Self::ServiceAccount(_) => write!(f, "ServiceAccount"),
        }
    }
}

/// Client for one Firestore database.
#[derive(Debug, Clone)]
pub struct FirestoreClient {
    http: reqwest::Client,
    base_url: String,
    project_id: String,
    auth: FirestoreAuth,
    timeout: Duration,
}

impl FirestoreClient {
    /// Create a client for `project_id` against `base_url`
    /// (usually `https://firestore.googleapis.com/v1`).
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        auth: FirestoreAuth,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            auth,
            timeout: DEFAULT_FIRESTORE_TIMEOUT,
        }
    }

    /// Bound every request to `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resource name of the database root, as used inside request bodies.
    fn database_path(&self) -> String {
        format!("projects/{}/databases/(default)", self.project_id)
    }

    /// Resource name of a document relative to the database root.
    fn document_name(&self, path: &str) -> String {
        format!("{}/documents/{}", self.database_path(), path.trim_matches('/'))
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    /// Apply the request timeout and credentials.
    async fn authorize(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder> {
        let request = request.timeout(self.timeout);
        match &self.auth {
            FirestoreAuth::Anonymous => Ok(request),
            FirestoreAuth::Static(token) => Ok(request.bearer_auth(token)),
            FirestoreAuth::ServiceAccount(provider) => {
                // The provider caches tokens and refreshes them before expiry
                let token = provider.token(&[DATASTORE_SCOPE]).await?;
                Ok(request.bearer_auth(token.as_str()))
            }
        }
    }

    /// Fetch a document by its path (e.g. `servers/123/functions/go`).
    ///
    /// # Returns
    ///
    /// Returns `Some(document)` if it exists, `None` if Firestore answers 404.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or returns an unexpected status code.
    pub async fn get_document(&self, path: &str) -> Result<Option<Document>> {
        let url = self.url(&self.document_name(path));
        let resp = self.authorize(self.http.get(&url)).await?.send().await
            .map_err(|e| ArchyError::FlagStore(format!("Request failed: {}", e)))?;

        if resp.status().is_success() {
            let document = resp.json::<Document>().await
                .map_err(|e| ArchyError::FlagStore(format!("Invalid document: {}", e)))?;
            Ok(Some(document))
        } else if resp.status().as_u16() == 404 {
            Ok(None)
        } else {
            Err(ArchyError::FlagStore(
                format!("GET {} returned {}", path, resp.status())
            ))
        }
    }

    /// Atomically add `by` to an integer field with a server-side transform.
    pub async fn increment_field(&self, path: &str, field: &str, by: i64) -> Result<()> {
        let body = json!({
            "writes": [{
                "transform": {
                    "document": self.document_name(path),
                    "fieldTransforms": [{
                        "fieldPath": field,
                        "increment": { "integerValue": by.to_string() },
                    }],
                },
            }],
        });

        let url = self.url(&format!("{}/documents:commit", self.database_path()));
        let resp = self.authorize(self.http.post(&url)).await?.json(&body).send().await
            .map_err(|e| ArchyError::FlagStore(format!("Request failed: {}", e)))?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ArchyError::FlagStore(
                format!("increment of {}.{} returned {}", path, field, resp.status())
            ))
        }
    }

    /// List the ids of every document in a top-level collection, following
    /// pagination until Firestore stops returning a page token.
    pub async fn list_document_ids(&self, collection: &str) -> Result<Vec<String>> {
        let url = self.url(&self.document_name(collection));
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.http.get(&url);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let resp = self.authorize(request).await?.send().await
                .map_err(|e| ArchyError::FlagStore(format!("Request failed: {}", e)))?;

            if !resp.status().is_success() {
                return Err(ArchyError::FlagStore(
                    format!("listing {} returned {}", collection, resp.status())
                ));
            }

            let page = resp.json::<ListDocumentsResponse>().await
                .map_err(|e| ArchyError::FlagStore(format!("Invalid listing: {}", e)))?;

            ids.extend(page.documents.iter().map(|doc| doc.id().to_string()));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const DOC_PATH: &str = "/projects/archy-test/databases/(default)/documents/servers/42/functions/go";

    fn client(server: &mockito::Server) -> FirestoreClient {
        FirestoreClient::new(reqwest::Client::new(), server.url(), "archy-test", FirestoreAuth::Anonymous)
    }

    #[test]
    fn test_document_fields() {
        let document: Document = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/servers/42/functions/go",
            "fields": {
                "active": { "booleanValue": true },
                "count": { "integerValue": "17" },
                "label": { "stringValue": "go" }
            }
        }))
        .unwrap();

        assert_eq!(document.id(), "go");
        assert_eq!(document.boolean_field("active"), Some(true));
        assert_eq!(document.integer_field("count"), Some(17));
        assert_eq!(document.boolean_field("label"), None);
        assert_eq!(document.boolean_field("missing"), None);
    }

    #[test]
    fn test_document_without_fields() {
        let document: Document = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/fobChallenge/123"
        }))
        .unwrap();

        assert_eq!(document.id(), "123");
        assert!(document.fields.is_empty());
    }

    #[tokio::test]
    async fn test_get_document_found() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", DOC_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name":"projects/archy-test/databases/(default)/documents/servers/42/functions/go","fields":{"active":{"booleanValue":false}}}"#)
            .create_async()
            .await;

        let document = client(&server).get_document("servers/42/functions/go").await.unwrap();
        mock.assert_async().await;

        let document = document.expect("document should exist");
        assert_eq!(document.boolean_field("active"), Some(false));
    }

    #[tokio::test]
    async fn test_get_document_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", DOC_PATH)
            .with_status(404)
            .with_body(r#"{"error":{"code":404,"status":"NOT_FOUND"}}"#)
            .create_async()
            .await;

        let document = client(&server).get_document("servers/42/functions/go").await.unwrap();
        assert!(document.is_none());
    }

    #[tokio::test]
    async fn test_get_document_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", DOC_PATH)
            .with_status(503)
            .create_async()
            .await;

        let result = client(&server).get_document("servers/42/functions/go").await;
        assert!(matches!(result, Err(ArchyError::FlagStore(_))));
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", DOC_PATH)
            .match_header("authorization", "Bearer secret")
            .with_status(404)
            .create_async()
            .await;

        let client = FirestoreClient::new(
            reqwest::Client::new(),
            server.url(),
            "archy-test",
            FirestoreAuth::Static("secret".to_string()),
        );
        client.get_document("servers/42/functions/go").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_document_times_out_on_silent_server() {
        // Accepts connections through the backlog but never answers
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let client = FirestoreClient::new(
            reqwest::Client::new(),
            base_url,
            "archy-test",
            FirestoreAuth::Anonymous,
        )
        .with_timeout(Duration::from_millis(300));

        let started = std::time::Instant::now();
        let result = client.get_document("servers/42/functions/go").await;

        assert!(matches!(result, Err(ArchyError::FlagStore(_))));
        assert!(started.elapsed() < Duration::from_secs(5));
        drop(listener);
    }

    #[test]
    fn test_debug_redacts_static_token() {
        let rendered = format!("{:?}", FirestoreAuth::Static("secret".to_string()));
        assert!(!rendered.contains("secret"));
    }

    #[tokio::test]
    async fn test_increment_field_sends_transform() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/projects/archy-test/databases/(default)/documents:commit")
            .match_body(Matcher::PartialJson(json!({
                "writes": [{
                    "transform": {
                        "document": "projects/archy-test/databases/(default)/documents/servers/42/functions/go",
                        "fieldTransforms": [{
                            "fieldPath": "count",
                            "increment": { "integerValue": "1" }
                        }]
                    }
                }]
            })))
            .with_status(200)
            .with_body(r#"{"writeResults":[{}]}"#)
            .create_async()
            .await;

        client(&server)
            .increment_field("servers/42/functions/go", "count", 1)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_document_ids_follows_pages() {
        let mut server = mockito::Server::new_async().await;
        let collection = "/projects/archy-test/databases/(default)/documents/fobChallenge";

        let first = server
            .mock("GET", collection)
            .match_query(Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"documents":[{"name":"projects/archy-test/databases/(default)/documents/fobChallenge/111"}],"nextPageToken":"page2"}"#)
            .create_async()
            .await;
        let second = server
            .mock("GET", collection)
            .match_query(Matcher::UrlEncoded("pageToken".into(), "page2".into()))
            .with_status(200)
            .with_body(r#"{"documents":[{"name":"projects/archy-test/databases/(default)/documents/fobChallenge/222"}]}"#)
            .create_async()
            .await;

        let ids = client(&server).list_document_ids("fobChallenge").await.unwrap();
        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(ids, vec!["111".to_string(), "222".to_string()]);
    }

    #[tokio::test]
    async fn test_list_document_ids_empty_collection() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/projects/archy-test/databases/(default)/documents/fobChallenge")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let ids = client(&server).list_document_ids("fobChallenge").await.unwrap();
        assert!(ids.is_empty());
    }
}
