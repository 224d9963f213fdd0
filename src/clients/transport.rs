//! Pluggable transport backends.
//!
//! [`HttpClient`](crate::clients::HttpClient) builds requests and hands them
//! to a [`Transport`] for execution. Two backends ship with the crate:
//!
//! - [`ReqwestTransport`]: the network backend, using `reqwest` with rustls
//! - [`MockTransport`]: an in-memory backend returning queued responses and
//!   recording every request, for tests that must not touch the network

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::clients::errors::HttpError;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;

/// Maximum number of redirects followed by [`ReqwestTransport`].
pub const MAX_REDIRECTS: usize = 10;

/// Executes prepared requests.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Short backend name, reported in the `User-Agent` header.
    fn name(&self) -> &'static str;

    /// Sends the request and returns the response.
    ///
    /// Implementations return the response for every status code; status
    /// handling happens in [`HttpClient`](crate::clients::HttpClient).
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// Network transport backed by `reqwest`.
///
/// A numeric `timeout` option on the request (seconds) sets a per-request
/// timeout.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates the transport with rustls and a redirect limit of
    /// [`MAX_REDIRECTS`].
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(Self { client })
    }

    /// Wraps an existing `reqwest` client.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    const fn method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }

    fn response_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    fn name(&self) -> &'static str {
        "reqwest"
    }

    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self
            .client
            .request(Self::method(request.method), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        if let Some(seconds) = request.option("timeout").and_then(serde_json::Value::as_f64) {
            if seconds > 0.0 {
                builder = builder.timeout(Duration::from_secs_f64(seconds));
            }
        }

        let res = builder.send().await?;
        let status = res.status().as_u16();
        let headers = Self::response_headers(res.headers());

        match res.text().await {
            Ok(body) => Ok(HttpResponse::new(status, headers, body)),
            Err(e) => Err(HttpError::Transport {
                message: format!("Failed to read response body: {e}"),
                response: Some(Box::new(HttpResponse::new(status, headers, String::new()))),
            }),
        }
    }
}

/// In-memory transport for tests.
///
/// Responses are returned in the order they were queued. When the queue is
/// empty, [`execute`](Transport::execute) fails with
/// [`HttpError::Transport`].
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use econt_api::clients::{HttpClient, MockTransport, RequestData};
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let transport = Arc::new(MockTransport::new());
/// transport.push_json(200, json!({"countries": []}));
///
/// let client = HttpClient::with_transport(Some("https://example.test/services"), transport.clone());
/// let response = client
///     .request("POST", "A.b.json", RequestData::new().json(&json!({})), &[])
///     .await
///     .unwrap();
///
/// assert!(response.is_ok());
/// assert_eq!(transport.requests()[0].url, "https://example.test/services/A.b.json");
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, String>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    /// Creates a transport with an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    pub fn push_response(&self, response: HttpResponse) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(response));
    }

    /// Queues a JSON response with an `application/json` content type.
    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        let mut headers = HashMap::new();
        headers.insert(
            "content-type".to_string(),
            vec!["application/json".to_string()],
        );
        self.push_response(HttpResponse::new(status, headers, body.to_string()));
    }

    /// Queues a transport failure.
    pub fn push_error(&self, message: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(message.into()));
    }

    /// Returns every request executed so far.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the most recent request.
    #[must_use]
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Returns the number of queued responses not yet consumed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let next = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(HttpError::Transport {
                message,
                response: None,
            }),
            None => Err(HttpError::Transport {
                message: format!("No response queued for {} {}", request.method, request.url),
                response: None,
            }),
        }
    }
}

// Verify transports are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ReqwestTransport>();
    assert_send_sync::<MockTransport>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_returns_queued_responses_in_order() {
        let transport = MockTransport::new();
        transport.push_json(200, json!({"n": 1}));
        transport.push_json(201, json!({"n": 2}));

        let request = HttpRequest::new(HttpMethod::Get, "https://example.test/a");
        let first = transport.execute(&request).await.unwrap();
        let second = transport.execute(&request).await.unwrap();

        assert_eq!(first.status(), 200);
        assert_eq!(second.json().unwrap()["n"], 2);
        assert_eq!(transport.requests().len(), 2);
        assert_eq!(transport.pending(), 0);
    }

    #[tokio::test]
    async fn test_mock_fails_when_queue_is_empty() {
        let transport = MockTransport::new();
        let request = HttpRequest::new(HttpMethod::Post, "https://example.test/a");

        let error = transport.execute(&request).await.unwrap_err();
        assert!(matches!(error, HttpError::Transport { response: None, .. }));
        assert!(error.to_string().contains("POST https://example.test/a"));
    }

    #[tokio::test]
    async fn test_mock_queued_error() {
        let transport = MockTransport::new();
        transport.push_error("connection refused");
        let request = HttpRequest::new(HttpMethod::Get, "https://example.test/a");

        let error = transport.execute(&request).await.unwrap_err();
        assert!(error.to_string().contains("connection refused"));
        assert_eq!(
            transport.last_request().map(|r| r.url),
            Some("https://example.test/a".to_string())
        );
    }

    #[test]
    fn test_reqwest_transport_name() {
        let transport = ReqwestTransport::new().unwrap();
        assert_eq!(transport.name(), "reqwest");
    }
}
