//! HTTP-specific error types for the Econt API client.
//!
//! This module contains error types for the transport layer: response
//! errors, request validation failures, and body decoding failures.
//!
//! # Error Handling
//!
//! - [`HttpResponseError`]: Non-2xx HTTP responses from the API
//! - [`InvalidHttpRequestError`]: When a request fails validation before sending
//! - [`JsonDecodeError`]: When a response body is not valid JSON
//! - [`HttpError`]: Unified error type encompassing all HTTP-related errors
//!
//! # Example
//!
//! ```rust,ignore
//! use econt_api::clients::{HttpClient, HttpError, RequestData};
//!
//! match client.request("POST", "Profile/ProfileService.getClientProfiles.json", RequestData::new(), None).await {
//!     Ok(response) => println!("Success: {}", response.content()),
//!     Err(HttpError::Response(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(HttpError::InvalidRequest(e)) => println!("Invalid request: {e}"),
//!     Err(e) => println!("Transport failure: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::http_response::HttpResponse;

/// Error returned when an HTTP request receives a non-successful response.
///
/// The full response is kept so callers can inspect the error body.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Error message taken from the response body, or a generic status message.
    pub message: String,
    /// The response that triggered the error.
    pub response: Box<HttpResponse>,
}

/// Error returned when an HTTP request fails validation.
///
/// # Example
///
/// ```rust
/// use econt_api::clients::InvalidHttpRequestError;
///
/// let error = InvalidHttpRequestError::UnsupportedMethod {
///     method: "TRACE".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Unsupported HTTP request method [TRACE]. Supported: GET, HEAD, POST, PUT, PATCH, DELETE"
/// );
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The HTTP method is not one of the supported methods.
    #[error("Unsupported HTTP request method [{method}]. Supported: GET, HEAD, POST, PUT, PATCH, DELETE")]
    UnsupportedMethod {
        /// The method that was provided.
        method: String,
    },

    /// The request body could not be serialized.
    #[error("Failed to encode request body: {message}")]
    BodyEncoding {
        /// The serializer's message.
        message: String,
    },

    /// A relative URI was given but no base URL is configured.
    #[error("Cannot resolve relative uri '{uri}' without a base URL.")]
    MissingBaseUrl {
        /// The relative URI.
        uri: String,
    },

    /// The URL could not be parsed.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
        /// The parser's message.
        reason: String,
    },
}

/// Error returned when a response body is not valid JSON.
///
/// The error is cloneable so that a memoized decode failure is reported
/// identically on every call to [`HttpResponse::json`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Failed to decode response body as JSON: {message} (line {line}, column {column})")]
pub struct JsonDecodeError {
    /// The decoder's message.
    pub message: String,
    /// Line of the failure.
    pub line: usize,
    /// Column of the failure.
    pub column: usize,
}

impl From<serde_json::Error> for JsonDecodeError {
    fn from(error: serde_json::Error) -> Self {
        Self {
            message: error.to_string(),
            line: error.line(),
            column: error.column(),
        }
    }
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// The response body could not be decoded.
    #[error(transparent)]
    Decode(#[from] JsonDecodeError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The transport backend reported a failure.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the failure.
        message: String,
        /// The response, if one was received before the failure.
        response: Option<Box<HttpResponse>>,
    },
}

impl HttpError {
    /// Returns the HTTP status code associated with this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::Transport {
                response: Some(response),
                ..
            } => Some(response.status()),
            _ => None,
        }
    }

    /// Returns the response associated with this error, if any.
    #[must_use]
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            Self::Response(e) => Some(&e.response),
            Self::Transport { response, .. } => response.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse::new(status, HashMap::new(), body)
    }

    #[test]
    fn test_http_response_error_uses_message() {
        let error = HttpResponseError {
            code: 404,
            message: "Not Found".to_string(),
            response: Box::new(response(404, "")),
        };
        assert_eq!(error.to_string(), "Not Found");
    }

    #[test]
    fn test_unsupported_method_lists_supported_set() {
        let error = InvalidHttpRequestError::UnsupportedMethod {
            method: "TRACE".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("[TRACE]"));
        assert!(message.contains("GET, HEAD, POST, PUT, PATCH, DELETE"));
    }

    #[test]
    fn test_status_from_response_error() {
        let error = HttpError::Response(HttpResponseError {
            code: 400,
            message: "Bad".to_string(),
            response: Box::new(response(400, r#"{"message":"Bad"}"#)),
        });
        assert_eq!(error.status(), Some(400));
        assert_eq!(error.response().map(HttpResponse::status), Some(400));
    }

    #[test]
    fn test_transport_error_carries_partial_response() {
        let error = HttpError::Transport {
            message: "connection reset".to_string(),
            response: Some(Box::new(response(502, "bad gateway"))),
        };
        assert_eq!(error.status(), Some(502));
        assert!(error.to_string().contains("connection reset"));

        let error = HttpError::Transport {
            message: "timeout".to_string(),
            response: None,
        };
        assert_eq!(error.status(), None);
        assert!(error.response().is_none());
    }

    #[test]
    fn test_json_decode_error_from_serde() {
        let serde_error = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let error = JsonDecodeError::from(serde_error);
        assert_eq!(error.line, 1);
        assert!(error.to_string().contains("Failed to decode response body"));
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let invalid: &dyn std::error::Error = &InvalidHttpRequestError::MissingBaseUrl {
            uri: "x".to_string(),
        };
        let _ = invalid;

        let decode: &dyn std::error::Error = &JsonDecodeError {
            message: "m".to_string(),
            line: 1,
            column: 1,
        };
        let _ = decode;
    }
}
