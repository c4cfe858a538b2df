//! HTTP client abstraction.
//!
//! The source adapter talks to the network through [`HttpClient`] so tests
//! can script responses without a server. [`ReqwestClient`] is the
//! production implementation.

use crate::error::{SourceError, SourceResult};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;

/// A raw HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response with the given status and body.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Creates a `200 OK` response.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, body)
    }
}

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual HTTP transport.
pub trait HttpClient: Send + Sync {
    /// Sends a GET request and returns the response.
    ///
    /// Only failures to obtain a response at all are errors; a non-2xx
    /// status is returned as a normal response. Failures that a later
    /// attempt cannot fix, such as a malformed URL, must be reported with
    /// [`SourceError::transport_fatal`].
    fn get(&self, url: &str) -> SourceResult<HttpResponse>;
}

/// Blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client with the given request timeout.
    pub fn new(timeout: Duration) -> SourceResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("lnstats/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SourceError::transport_fatal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> SourceResult<HttpResponse> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .send()
            .map_err(classify)?;

        let status = response.status().as_u16();
        let body = response.bytes().map_err(classify)?;
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

/// Maps a `reqwest` failure to a transport error.
///
/// Request construction errors (bad scheme, unparsable URL) are fatal.
/// Everything else happened on the wire and may succeed next time.
fn classify(error: reqwest::Error) -> SourceError {
    if error.is_builder() {
        SourceError::transport_fatal(format!("invalid request: {error}"))
    } else {
        SourceError::transport_retryable(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_constructors() {
        let response = HttpResponse::ok("[]");
        assert_eq!(response.status, 200);
        assert_eq!(response.body, b"[]");

        let response = HttpResponse::new(503, Vec::new());
        assert_eq!(response.status, 503);
        assert!(response.body.is_empty());
    }

    #[test]
    fn reqwest_client_builds() {
        assert!(ReqwestClient::new(Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn reqwest_client_reports_connection_failure() {
        let client = ReqwestClient::new(Duration::from_millis(500)).unwrap();
        // Port 9 (discard) on loopback is closed in test environments
        let err = client
            .get("http://127.0.0.1:9/api/v1/lightning/statistics/3y")
            .unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn malformed_url_is_not_retryable() {
        let client = ReqwestClient::new(Duration::from_millis(500)).unwrap();

        let err = client.get("not a url/api/v1/lightning/statistics/3y").unwrap_err();
        assert!(matches!(err, SourceError::Transport { retryable: false, .. }));

        let err = client.get("file:///tmp/statistics.json").unwrap_err();
        assert!(!err.is_retryable());
    }
}
