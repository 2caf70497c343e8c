//! `TrendStoreClient` - REST client for the trend document collection.

use anyhow::{Context, Result, anyhow, bail};
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::instrument;
use url::Url;

use super::api::TrendStore;
use super::types::{DocumentList, NewTrendDocument, Query, TrendDocument, TrendingEntry, attr};
use crate::tmdb::Movie;

/// Header carrying the project ID.
const PROJECT_HEADER: &str = "X-Appwrite-Project";

/// Header carrying the server API key.
const KEY_HEADER: &str = "X-Appwrite-Key";

/// Document ID that asks the server to generate one.
const UNIQUE_ID: &str = "unique()";

/// Error body returned by the store.
#[derive(Debug, Deserialize)]
struct StoreErrorResponse {
    /// Human readable message.
    message: String,
    /// HTTP-like error code.
    #[serde(default)]
    code: u16,
    /// Machine readable error type.
    #[serde(default, rename = "type")]
    kind: String,
}

/// Client for the trend counter collection.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TrendStoreClient {
    /// HTTP client.
    http_client: Client,
    /// `.../databases/{db}/collections/{collection}/documents`
    documents_url: Url,
    /// Project ID.
    project_id: String,
    /// Optional server API key.
    api_key: Option<String>,
}

/// Builder for `TrendStoreClient`.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct TrendStoreClientBuilder {
    endpoint: Option<Url>,
    project_id: Option<String>,
    database_id: Option<String>,
    collection_id: Option<String>,
    api_key: Option<String>,
    user_agent: Option<String>,
}

impl TrendStoreClientBuilder {
    /// Sets the store endpoint, e.g. `https://cloud.appwrite.io/v1/` (required).
    #[must_use]
    pub fn endpoint(mut self, url: Url) -> Self {
        self.endpoint = Some(url);
        self
    }

    /// Sets the project ID (required).
    #[must_use]
    pub fn project_id(mut self, id: impl Into<String>) -> Self {
        self.project_id = Some(id.into());
        self
    }

    /// Sets the database ID (required).
    #[must_use]
    pub fn database_id(mut self, id: impl Into<String>) -> Self {
        self.database_id = Some(id.into());
        self
    }

    /// Sets the collection ID (required).
    #[must_use]
    pub fn collection_id(mut self, id: impl Into<String>) -> Self {
        self.collection_id = Some(id.into());
        self
    }

    /// Sets the server API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - Any required field is not set or empty.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TrendStoreClient> {
        let mut endpoint = self.endpoint.context("endpoint is required")?;
        let project_id = required(self.project_id, "project_id")?;
        let database_id = required(self.database_id, "database_id")?;
        let collection_id = required(self.collection_id, "collection_id")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }
        let documents_url = endpoint
            .join(&format!(
                "databases/{database_id}/collections/{collection_id}/documents"
            ))
            .context("failed to build documents URL")?;

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TrendStoreClient {
            http_client,
            documents_url,
            project_id,
            api_key: self.api_key.filter(|k| !k.is_empty()),
        })
    }
}

/// Unwraps a required, non-empty builder field.
fn required(value: Option<String>, name: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => bail!("{name} is required"),
    }
}

impl TrendStoreClient {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> TrendStoreClientBuilder {
        TrendStoreClientBuilder::default()
    }

    /// URL of a single document.
    fn document_url(&self, id: &str) -> Result<Url> {
        let mut url = self.documents_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("documents URL cannot be a base"))?
            .push(id);
        Ok(url)
    }

    /// Adds project/key headers, sends the request and decodes the body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        op: &str,
    ) -> Result<T> {
        let mut request = request
            .header(ACCEPT, "application/json")
            .header(PROJECT_HEADER, &self.project_id);
        if let Some(ref key) = self.api_key {
            request = request.header(KEY_HEADER, key);
        }
        let request = request
            .build()
            .with_context(|| format!("failed to build request: {op}"))?;

        tracing::debug!(method = %request.method(), url = %request.url(), "trend store request");

        let result = self.http_client.execute(request).await;
        let response = result.with_context(|| format!("request failed: {op}"))?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            if let Ok(error_response) = serde_json::from_str::<StoreErrorResponse>(&body) {
                bail!(
                    "trend store error (HTTP {}): code={}, type={}, message={}",
                    status,
                    error_response.code,
                    error_response.kind,
                    error_response.message,
                );
            }
            bail!("trend store error (HTTP {status}): {body}");
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {op}"))?;
        serde_json::from_str(&body).with_context(|| format!("failed to decode JSON response: {op}"))
    }

    /// Lists documents matching `queries`.
    async fn list_documents(&self, queries: &[Query]) -> Result<DocumentList<TrendDocument>> {
        let encoded = queries
            .iter()
            .map(|q| q.encode().map(|s| ("queries[]", s)))
            .collect::<serde_json::Result<Vec<_>>>()
            .context("failed to encode queries")?;

        let request = self
            .http_client
            .get(self.documents_url.clone())
            .query(&encoded);
        self.send_json(request, "list documents").await
    }

    /// Creates a counter document with a server generated ID.
    async fn create_document(&self, doc: &NewTrendDocument) -> Result<TrendDocument> {
        let body = json!({ "documentId": UNIQUE_ID, "data": doc });
        let request = self
            .http_client
            .post(self.documents_url.clone())
            .json(&body);
        self.send_json(request, "create document").await
    }

    /// Sets the counter of an existing document.
    async fn update_count(&self, id: &str, count: u64) -> Result<TrendDocument> {
        let body = json!({ "data": { (attr::COUNT): count } });
        let request = self.http_client.patch(self.document_url(id)?).json(&body);
        self.send_json(request, "update document").await
    }
}

impl TrendStore for TrendStoreClient {
    #[instrument(skip_all, fields(term = %term))]
    async fn record_search(&self, term: &str, movie: &Movie) -> Result<()> {
        let existing = self
            .list_documents(&[Query::equal(attr::SEARCH_TERM, term), Query::limit(1)])
            .await
            .context("failed to look up search term")?;

        if let Some(doc) = existing.documents.into_iter().next() {
            let count = doc.count.saturating_add(1);
            self.update_count(&doc.id, count)
                .await
                .context("failed to increment search count")?;
            tracing::debug!(id = %doc.id, count, "search count incremented");
        } else {
            let created = self
                .create_document(&NewTrendDocument::first_search(term, movie))
                .await
                .context("failed to create search count")?;
            tracing::debug!(id = %created.id, "search count created");
        }
        Ok(())
    }

    #[instrument(skip_all, fields(limit = limit))]
    async fn top_searches(&self, limit: u32) -> Result<Vec<TrendingEntry>> {
        let list = self
            .list_documents(&[Query::order_desc(attr::COUNT), Query::limit(limit)])
            .await
            .context("failed to list trending searches")?;
        Ok(list.documents.into_iter().map(TrendingEntry::from).collect())
    }
}
