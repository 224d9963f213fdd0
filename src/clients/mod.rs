//! HTTP client types for Econt API communication.
//!
//! This module provides the transport layer and the high-level
//! [`EcontClient`] façade.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: URL resolution, body encoding and header composition
//! - [`HttpRequest`]: A prepared request, printable as a raw HTTP message
//! - [`HttpResponse`]: A response with lazily decoded JSON body
//! - [`HttpMethod`]: Supported HTTP methods (GET, HEAD, POST, PUT, PATCH, DELETE)
//! - [`RequestData`]: Query parameters and JSON, form or raw body
//! - [`Transport`]: The pluggable backend, with [`ReqwestTransport`] and [`MockTransport`]
//! - [`econt::EcontClient`]: Authenticated façade with the resource registry
//! - [`econt::EcontError`]: Façade error type
//!
//! # Example
//!
//! ```rust,ignore
//! use econt_api::{EcontClient, EcontConfig};
//!
//! let client = EcontClient::new(EcontConfig::demo())?;
//! let response = client
//!     .request("GET", "Profile/ProfileService.getClientProfiles.json", serde_json::json!({}))
//!     .await?;
//! println!("{}", response.content());
//! ```
//!
//! # Error statuses
//!
//! Every response with a status of 400 or above is returned as
//! [`HttpError::Response`], carrying the response and the API's error
//! message. Nothing is retried.

mod errors;
pub mod econt;
mod http_client;
mod http_request;
mod http_response;
pub mod query;
mod transport;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError, JsonDecodeError};
pub use http_client::{HttpClient, SDK_NAME, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, RequestData};
pub use http_response::{HttpResponse, DEFAULT_CONTENT_TYPE};
pub use transport::{MockTransport, ReqwestTransport, Transport, MAX_REDIRECTS};

// Re-export façade types at the clients module level
pub use econt::{ClientContext, EcontClient, EcontError};
