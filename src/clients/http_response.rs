//! HTTP response types for the Econt API client.
//!
//! This module provides the [`HttpResponse`] type for accessing the status,
//! headers and body returned by the API.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::clients::errors::JsonDecodeError;

/// Content type assumed when the response carries no `Content-Type` header.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// An HTTP response from the Econt API.
///
/// The response is immutable after construction. The decoded JSON body is
/// computed on the first call to [`json`](Self::json) and cached, including
/// a decode failure.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use econt_api::clients::HttpResponse;
///
/// let mut headers = HashMap::new();
/// headers.insert(
///     "Content-Type".to_string(),
///     vec!["application/json; charset=utf-8".to_string()],
/// );
/// let response = HttpResponse::new(200, headers, r#"{"countries":[]}"#);
///
/// assert!(response.is_ok());
/// assert_eq!(response.content_type(), "application/json");
/// assert!(response.json().unwrap()["countries"].is_array());
/// ```
#[derive(Clone, Debug)]
pub struct HttpResponse {
    status: u16,
    headers: HashMap<String, Vec<String>>,
    content: String,
    json: OnceLock<Result<serde_json::Value, JsonDecodeError>>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`. Header names are stored lowercased.
    #[must_use]
    pub fn new(
        status: u16,
        headers: HashMap<String, Vec<String>>,
        content: impl Into<String>,
    ) -> Self {
        let mut normalized: HashMap<String, Vec<String>> = HashMap::new();
        for (name, values) in headers {
            normalized
                .entry(name.to_lowercase())
                .or_default()
                .extend(values);
        }

        Self {
            status,
            headers: normalized,
            content: content.into(),
            json: OnceLock::new(),
        }
    }

    /// Creates a response from raw `Name: value` header lines.
    ///
    /// A leading status line (`HTTP/1.1 200 OK`) and blank lines are skipped.
    #[must_use]
    pub fn from_header_lines<S: AsRef<str>>(
        status: u16,
        lines: &[S],
        content: impl Into<String>,
    ) -> Self {
        let mut headers: HashMap<String, Vec<String>> = HashMap::new();

        for (index, line) in lines.iter().enumerate() {
            let line = line.as_ref().trim();
            if line.is_empty() || (index == 0 && line.to_lowercase().starts_with("http/")) {
                continue;
            }
            if let Some((name, value)) = line.split_once(':') {
                headers
                    .entry(name.trim().to_lowercase())
                    .or_default()
                    .push(value.trim().to_string());
            }
        }

        Self::new(status, headers, content)
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Returns `true` if the status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns the raw response body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the body length in bytes.
    #[must_use]
    pub fn content_length(&self) -> usize {
        self.content.len()
    }

    /// Returns all headers, keyed by lowercased name.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, Vec<String>> {
        &self.headers
    }

    /// Returns a header value without its parameters.
    ///
    /// The lookup is case-insensitive and anything after the first `;` is
    /// dropped, so `text/html; charset=utf-8` yields `text/html`.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        let value = self.headers.get(&name.to_lowercase())?.first()?;
        Some(value.split(';').next().unwrap_or(value).trim())
    }

    /// Returns the media type of the body, `text/plain` when absent.
    #[must_use]
    pub fn content_type(&self) -> &str {
        self.header("content-type").unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    /// Decodes the body as JSON.
    ///
    /// Decoding happens at most once; later calls return the cached value or
    /// the same error.
    ///
    /// # Errors
    ///
    /// Returns [`JsonDecodeError`] if the body is not valid JSON.
    pub fn json(&self) -> Result<&serde_json::Value, JsonDecodeError> {
        self.json
            .get_or_init(|| serde_json::from_str(&self.content).map_err(JsonDecodeError::from))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Returns the error message reported by the API for a failed request.
    ///
    /// Uses the `message` field of the error body when present.
    #[must_use]
    pub fn error_message(&self) -> String {
        self.json()
            .ok()
            .and_then(|body| body.get("message"))
            .and_then(serde_json::Value::as_str)
            .filter(|message| !message.is_empty())
            .map_or_else(
                || format!("Request failed with status {}", self.status),
                String::from,
            )
    }
}

// Verify HttpResponse is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpResponse>();
};
