//! HTTP client for the LeetSearch backend.

use crate::{Error, Result};
use leetsearch_types::{
    HealthResponse, ProfileResponse, RefreshRequest, RefreshResponse, SearchResponse,
};
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use std::future::Future;

/// Anything that can answer a college search against a base URL.
pub trait SearchBackend {
    fn search(
        &self,
        base: &str,
        query: &str,
    ) -> impl Future<Output = Result<SearchResponse>> + Send;
}

/// Build `{base}/{segments...}`, keeping any path prefix already in `base`.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] if `base` is not an absolute http(s) URL.
pub fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
    let trimmed = base.trim().trim_end_matches('/');
    let mut url = Url::parse(trimmed).map_err(|e| Error::InvalidUrl(format!("{base}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidUrl(format!(
            "{base}: unsupported scheme '{}'",
            url.scheme()
        )));
    }

    url.path_segments_mut()
        .map_err(|()| Error::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// `GET {base}/search/college?query=...`
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] if `base` is not usable.
pub fn search_url(base: &str, query: &str) -> Result<Url> {
    let mut url = endpoint(base, &["search", "college"])?;
    url.query_pairs_mut().append_pair("query", query);
    Ok(url)
}

#[derive(Debug, Clone, Default)]
pub struct HttpBackend {
    client: reqwest::Client,
}

impl HttpBackend {
    /// Client with the crate user agent and no request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("leetsearch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Backend readiness and cache size.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-2xx status, or a malformed body.
    pub async fn health(&self, base: &str) -> Result<HealthResponse> {
        self.get_json(endpoint(base, &["health"])?).await
    }

    /// Fetch one profile, optionally forcing the backend to refresh it.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-2xx status (404 for unknown users),
    /// or a malformed body.
    pub async fn profile(
        &self,
        base: &str,
        username: &str,
        refresh: bool,
    ) -> Result<ProfileResponse> {
        let mut url = endpoint(base, &["profiles", username])?;
        url.query_pairs_mut()
            .append_pair("refresh", if refresh { "true" } else { "false" });
        self.get_json(url).await
    }

    /// Ask the backend to start a background scrape cycle.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-2xx status (422 for out-of-range
    /// parameters), or a malformed body.
    pub async fn refresh(&self, base: &str, request: RefreshRequest) -> Result<RefreshResponse> {
        let url = endpoint(base, &["refresh"])?;
        tracing::debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(&request)?)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl SearchBackend for HttpBackend {
    async fn search(&self, base: &str, query: &str) -> Result<SearchResponse> {
        self.get_json(search_url(base, query)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_default_base() {
        let url = search_url("http://localhost:8000", "mit").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/search/college?query=mit"
        );
    }

    #[test]
    fn test_search_url_trailing_slash() {
        let url = search_url("http://localhost:8000/", "mit").unwrap();
        assert_eq!(url.path(), "/search/college");
    }

    #[test]
    fn test_search_url_keeps_path_prefix() {
        let url = search_url("https://example.com/api/", "mit").unwrap();
        assert_eq!(url.path(), "/api/search/college");
    }

    #[test]
    fn test_search_url_encodes_query() {
        let url = search_url("http://localhost:8000", "Tsinghua & Peking/Uni").unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![("query".to_string(), "Tsinghua & Peking/Uni".to_string())]
        );
        assert!(!url.as_str().contains(" & "));
    }

    #[test]
    fn test_endpoint_rejects_garbage() {
        assert!(matches!(
            endpoint("not a url", &["health"]),
            Err(Error::InvalidUrl(_))
        ));
        assert!(matches!(
            endpoint("", &["health"]),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_endpoint_rejects_non_http_scheme() {
        assert!(matches!(
            endpoint("ftp://example.com", &["health"]),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_endpoint_escapes_segment() {
        let url = endpoint("http://localhost:8000", &["profiles", "a/b"]).unwrap();
        assert_eq!(url.path(), "/profiles/a%2Fb");
    }
}
