//! `TmdbClient` - TMDB API client implementation.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use reqwest::header::ACCEPT;
use tracing::instrument;
use url::Url;

use super::api::TmdbApi;
use super::types::{DiscoverParams, MovieListResponse, SearchMovieParams, TmdbErrorResponse};
use crate::pacer::Pacer;

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Sort order applied to search and discover requests.
const POPULARITY_DESC: &str = "popularity.desc";

/// Maximum number of retries for HTTP 429 responses.
const MAX_RETRIES: u32 = 3;

/// Backoff duration between retries.
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Bearer API token.
    api_token: String,
    /// Request pacing.
    pacer: Pacer,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
    min_interval: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            user_agent: None,
            min_interval: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set or empty.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_token = self.api_token.context("api_token is required")?;
        if api_token.trim().is_empty() {
            bail!("api_token must not be empty");
        }
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let pacer = self.min_interval.map_or_else(Pacer::default, Pacer::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_token,
            pacer,
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Resolves an endpoint against the base URL.
    ///
    /// Absolute endpoints are accepted only on the base URL's origin so the
    /// bearer token is never sent elsewhere.
    fn resolve(&self, endpoint: &str) -> Result<Url> {
        let url = self
            .base_url
            .join(endpoint.trim_start_matches('/'))
            .with_context(|| format!("failed to join URL path: {endpoint}"))?;

        if url.origin() != self.base_url.origin() {
            bail!(
                "endpoint {url} is not on the TMDB origin {}",
                self.base_url.origin().ascii_serialization()
            );
        }
        Ok(url)
    }

    /// Sends a GET request with Bearer auth, query params, and pacing.
    /// Retries up to `MAX_RETRIES` times on HTTP 429.
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.pacer.wait().await;

        let path = url.path().to_owned();
        let mut retries = 0u32;
        loop {
            let request = self
                .http_client
                .get(url.clone())
                .bearer_auth(&self.api_token)
                .header(ACCEPT, "application/json")
                .query(query)
                .build()
                .with_context(|| format!("failed to build request: {path}"))?;

            tracing::debug!(url = %request.url(), "TMDB API request");

            let result = self.http_client.execute(request).await;
            let response = result.with_context(|| format!("request failed: {path}"))?;

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                retries = retries.saturating_add(1);
                if retries > MAX_RETRIES {
                    bail!("TMDB API rate limit exceeded after {MAX_RETRIES} retries: {path}");
                }
                tracing::warn!(
                    retry = retries,
                    max_retries = MAX_RETRIES,
                    "TMDB API rate limited (429). Retrying..."
                );
                tokio::time::sleep(RETRY_BACKOFF.saturating_mul(retries)).await;
                self.pacer.wait().await;
                continue;
            }

            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| String::from("<failed to read body>"));
                if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                    bail!(
                        "TMDB API error (HTTP {}): code={}, message={}",
                        status,
                        error_response.status_code,
                        error_response.status_message,
                    );
                }
                bail!("TMDB API error (HTTP {status}): {body}");
            }

            let body = response
                .text()
                .await
                .with_context(|| format!("failed to read response body: {path}"))?;
            let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
            let parsed =
                raw_result.with_context(|| format!("failed to decode JSON response: {path}"))?;
            return Ok(parsed);
        }
    }
}

impl TmdbApi for TmdbClient {
    #[instrument(skip_all, fields(query = %params.query))]
    async fn search_movies(&self, params: &SearchMovieParams) -> Result<MovieListResponse> {
        let query: Vec<(&str, String)> = vec![
            ("query", params.query.clone()),
            ("sort_by", String::from(POPULARITY_DESC)),
            ("language", params.language.clone()),
            ("page", params.page.to_string()),
            ("include_adult", params.include_adult.to_string()),
        ];

        let url = self.resolve("search/movie")?;
        self.get_json(url, &query).await
    }

    #[instrument(skip_all)]
    async fn discover_movies(&self, params: &DiscoverParams) -> Result<MovieListResponse> {
        let query: Vec<(&str, String)> = vec![
            ("sort_by", String::from(POPULARITY_DESC)),
            ("language", params.language.clone()),
            ("page", params.page.to_string()),
        ];

        let url = self.resolve("discover/movie")?;
        self.get_json(url, &query).await
    }

    #[instrument(skip_all, fields(endpoint = %endpoint))]
    async fn fetch_listing(&self, endpoint: &str) -> Result<MovieListResponse> {
        let url = self.resolve(endpoint)?;
        self.get_json(url, &[]).await
    }
}
