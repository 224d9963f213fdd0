//! HTTP request types for the Econt API client.
//!
//! This module provides [`HttpMethod`], the [`RequestData`] builder describing
//! query parameters and body, and the [`HttpRequest`] value object produced by
//! [`HttpClient::prepare`](crate::clients::HttpClient::prepare).

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::clients::errors::InvalidHttpRequestError;
use crate::clients::http_response::HttpResponse;

/// HTTP methods supported by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET.
    Get,
    /// HTTP HEAD.
    Head,
    /// HTTP POST.
    Post,
    /// HTTP PUT.
    Put,
    /// HTTP PATCH.
    Patch,
    /// HTTP DELETE.
    Delete,
}

impl HttpMethod {
    /// All supported methods, in the order they are reported in errors.
    pub const ALL: [Self; 6] = [
        Self::Get,
        Self::Head,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
    ];

    /// Returns the upper-case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Returns `true` if request data is sent as a body rather than a query.
    #[must_use]
    pub const fn sends_body(self) -> bool {
        !matches!(self, Self::Get | Self::Head)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = InvalidHttpRequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == upper)
            .ok_or_else(|| InvalidHttpRequestError::UnsupportedMethod {
                method: s.to_string(),
            })
    }
}

/// Query parameters and body of an outbound request.
///
/// At most one body shape is used, in priority order `json`, `form`, `body`.
/// Methods that do not send a body ignore all three.
///
/// # Example
///
/// ```rust
/// use econt_api::clients::RequestData;
/// use serde_json::json;
///
/// let data = RequestData::new()
///     .query_param("countryCode", "BGR")
///     .json(&json!({"cityID": 41}));
/// assert!(data.has_body());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestData {
    query: Map<String, Value>,
    json: Option<Result<Value, String>>,
    form: Option<Map<String, Value>>,
    body: Option<String>,
}

impl RequestData {
    /// Creates empty request data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the query parameters. Non-object values are ignored.
    #[must_use]
    pub fn query(mut self, query: Value) -> Self {
        if let Value::Object(map) = query {
            self.query = map;
        }
        self
    }

    /// Adds one query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Sets a JSON body.
    ///
    /// A value that fails to serialize is reported when the request is
    /// prepared.
    #[must_use]
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        self.json = Some(serde_json::to_value(value).map_err(|e| e.to_string()));
        self
    }

    /// Sets a url-encoded form body. Non-object values are ignored.
    #[must_use]
    pub fn form(mut self, form: Value) -> Self {
        if let Value::Object(map) = form {
            self.form = Some(map);
        }
        self
    }

    /// Sets a raw `text/plain` body.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Returns the query parameters.
    #[must_use]
    pub const fn query_params(&self) -> &Map<String, Value> {
        &self.query
    }

    /// Returns `true` if any body shape is set.
    #[must_use]
    pub const fn has_body(&self) -> bool {
        self.json.is_some() || self.form.is_some() || self.body.is_some()
    }

    /// Encodes the body, returning the content type and payload.
    pub(crate) fn encode_body(&self) -> Result<(&'static str, String), InvalidHttpRequestError> {
        if let Some(json) = &self.json {
            let value = json
                .as_ref()
                .map_err(|message| InvalidHttpRequestError::BodyEncoding {
                    message: message.clone(),
                })?;
            let encoded = serde_json::to_string(value).map_err(|e| {
                InvalidHttpRequestError::BodyEncoding {
                    message: e.to_string(),
                }
            })?;
            return Ok(("application/json", encoded));
        }

        if let Some(form) = &self.form {
            return Ok((
                "application/x-www-form-urlencoded",
                crate::clients::query::build(form),
            ));
        }

        Ok(("text/plain", self.body.clone().unwrap_or_default()))
    }
}

/// A fully prepared HTTP request.
///
/// Produced by [`HttpClient::prepare`](crate::clients::HttpClient::prepare)
/// and filled with its [`HttpResponse`] by
/// [`HttpClient::send`](crate::clients::HttpClient::send).
///
/// The `Display` implementation renders the request as a raw HTTP message:
///
/// ```rust
/// use econt_api::clients::{HttpMethod, HttpRequest};
///
/// let request = HttpRequest::new(HttpMethod::Post, "https://demo.econt.com/ee/services/A.b.json")
///     .with_header("Content-Type", "application/json")
///     .with_body("{}");
///
/// assert_eq!(
///     request.to_string(),
///     "POST /ee/services/A.b.json HTTP/1.1\nHost: demo.econt.com\nContent-Type: application/json\nContent-Length: 2\n\n{}"
/// );
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The absolute request URL.
    pub url: String,
    /// Header name/value pairs, in send order.
    pub headers: Vec<(String, String)>,
    /// The encoded body, if any.
    pub body: Option<String>,
    /// The HTTP protocol version, `1.1` by default.
    pub protocol_version: String,
    /// Free-form options for the transport backend.
    pub options: Map<String, Value>,
    /// The response, once the request has been sent.
    pub response: Option<HttpResponse>,
}

impl HttpRequest {
    /// Creates a request with no headers and no body.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            protocol_version: "1.1".to_string(),
            options: Map::new(),
            response: None,
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Returns the first header value with the given name, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns an option value.
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Sets an option value.
    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.options.insert(key.into(), value.into());
    }

    /// Consumes the request and returns its response, if it was sent.
    #[must_use]
    pub fn into_response(self) -> Option<HttpResponse> {
        self.response
    }

    /// Returns the request as a JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let headers: Map<String, Value> = self
            .headers
            .iter()
            .map(|(name, value)| (name.clone(), Value::String(value.clone())))
            .collect();

        json!({
            "protocolVersion": self.protocol_version,
            "method": self.method.as_str(),
            "url": self.url,
            "headers": headers,
            "body": self.body,
            "options": self.options,
        })
    }

    /// Returns the request as a JSON string.
    #[must_use]
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

impl fmt::Display for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (target, host) = match reqwest::Url::parse(&self.url) {
            Ok(url) => {
                let mut target = url.path().to_string();
                if let Some(query) = url.query() {
                    target.push('?');
                    target.push_str(query);
                }
                if let Some(fragment) = url.fragment() {
                    target.push('#');
                    target.push_str(fragment);
                }
                (target, url.host_str().unwrap_or_default().to_string())
            }
            Err(_) => (self.url.clone(), String::new()),
        };

        let mut lines = vec![
            format!("{} {target} HTTP/{}", self.method, self.protocol_version),
            format!("Host: {host}"),
        ];
        lines.extend(self.headers.iter().map(|(name, value)| format!("{name}: {value}")));

        if let Some(body) = &self.body {
            lines.push(format!("Content-Length: {}", body.chars().count()));
            lines.push(String::new());
            lines.push(body.clone());
        }

        f.write_str(&lines.join("\n"))
    }
}
