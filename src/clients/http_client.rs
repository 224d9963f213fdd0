//! HTTP client for Econt API communication.
//!
//! This module provides the [`HttpClient`] type, which resolves URLs against
//! a base URL, encodes request data, composes headers and hands the prepared
//! [`HttpRequest`] to a pluggable [`Transport`].

use std::fmt::Write as _;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::{Map, Value};

use crate::clients::errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
use crate::clients::http_request::{HttpMethod, HttpRequest, RequestData};
use crate::clients::http_response::HttpResponse;
use crate::clients::query;
use crate::clients::transport::{ReqwestTransport, Transport};

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name from Cargo.toml.
pub const SDK_NAME: &str = env!("CARGO_PKG_NAME");

/// HTTP client for making requests to the Econt API.
///
/// The client handles:
/// - URL resolution against an optional base URL, with query merging
/// - Body encoding as JSON, form or raw text
/// - Default headers and a generated `User-Agent`
/// - Converting error statuses (400 and above) into [`HttpError::Response`]
///
/// All setters take `&self`, so a client can be shared behind an [`Arc`].
///
/// # Example
///
/// ```rust,ignore
/// use econt_api::clients::{HttpClient, RequestData};
/// use serde_json::json;
///
/// let client = HttpClient::new(Some("https://demo.econt.com/ee/services"))?;
/// let response = client
///     .request(
///         "POST",
///         "Nomenclatures/NomenclaturesService.getCities.json",
///         RequestData::new().json(&json!({"countryCode": "BGR"})),
///         &[("Accept", "application/json")],
///     )
///     .await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    base_url: RwLock<Option<String>>,
    headers: RwLock<Vec<(String, String)>>,
    user_agent: RwLock<Option<String>>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a client using the network transport.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the transport cannot be initialized.
    pub fn new(base_url: Option<&str>) -> Result<Self, HttpError> {
        Ok(Self::with_transport(
            base_url,
            Arc::new(ReqwestTransport::new()?),
        ))
    }

    /// Creates a client using the given transport.
    #[must_use]
    pub fn with_transport(base_url: Option<&str>, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            base_url: RwLock::new(base_url.map(String::from)),
            headers: RwLock::new(Vec::new()),
            user_agent: RwLock::new(None),
        }
    }

    /// Returns the transport backend.
    #[must_use]
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Returns the base URL, if set.
    #[must_use]
    pub fn base_url(&self) -> Option<String> {
        self.base_url
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Changes the base URL. With no base URL every request needs an
    /// absolute URL.
    pub fn set_base_url(&self, url: Option<&str>) {
        *self.base_url.write().unwrap_or_else(PoisonError::into_inner) = url.map(String::from);
    }

    /// Returns the default headers sent with every request.
    #[must_use]
    pub fn headers(&self) -> Vec<(String, String)> {
        self.headers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces all default headers.
    pub fn set_headers<I, K, V>(&self, headers: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut merged = Vec::new();
        for (name, value) in headers {
            upsert(&mut merged, name.into(), value.into());
        }
        *self.headers.write().unwrap_or_else(PoisonError::into_inner) = merged;
    }

    /// Sets a default header, or removes it when `value` is `None`.
    pub fn set_header(&self, name: &str, value: Option<&str>) {
        match value {
            Some(value) => upsert(
                &mut self.headers.write().unwrap_or_else(PoisonError::into_inner),
                name.to_string(),
                value.to_string(),
            ),
            None => self.remove_header(name),
        }
    }

    /// Removes a default header. Names are compared case-insensitively.
    pub fn remove_header(&self, name: &str) {
        self.headers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(key, _)| !key.eq_ignore_ascii_case(name));
    }

    /// Returns the `User-Agent` value, generating it on first use.
    ///
    /// The generated value has the form
    /// `econt-api/<version> (<transport>) Rust/<rust-version>`.
    #[must_use]
    pub fn user_agent(&self) -> String {
        if let Some(agent) = self
            .user_agent
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return agent.clone();
        }

        let mut slot = self.user_agent.write().unwrap_or_else(PoisonError::into_inner);
        slot.get_or_insert_with(|| self.make_user_agent()).clone()
    }

    /// Overrides the `User-Agent` value.
    pub fn set_user_agent(&self, user_agent: impl Into<String>) {
        *self.user_agent.write().unwrap_or_else(PoisonError::into_inner) = Some(user_agent.into());
    }

    fn make_user_agent(&self) -> String {
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        format!(
            "{SDK_NAME}/{SDK_VERSION} ({}) Rust/{rust_version}",
            self.transport.name()
        )
    }

    /// Resolves `uri` into an absolute URL and merges `extra_query` into its
    /// query string.
    ///
    /// A `uri` starting with `http` is used as is. A `uri` starting with `/`
    /// replaces the base path; any other `uri` is appended to it. Query
    /// parameters from the base URL, the `uri` and `extra_query` are merged
    /// in that order. The fragment of `uri` wins over the base fragment.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::MissingBaseUrl`] for a relative
    /// `uri` without a base URL, or [`InvalidHttpRequestError::InvalidUrl`]
    /// if the URL cannot be parsed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use econt_api::clients::{HttpClient, MockTransport};
    /// use serde_json::json;
    /// use std::sync::Arc;
    ///
    /// let client = HttpClient::with_transport(
    ///     Some("https://demo.econt.com/ee/services"),
    ///     Arc::new(MockTransport::new()),
    /// );
    /// let query = json!({"countryCode": "BGR"});
    /// let url = client
    ///     .url("Nomenclatures/NomenclaturesService.getCities.json", query.as_object().unwrap())
    ///     .unwrap();
    /// assert_eq!(
    ///     url,
    ///     "https://demo.econt.com/ee/services/Nomenclatures/NomenclaturesService.getCities.json?countryCode=BGR"
    /// );
    /// ```
    pub fn url(
        &self,
        uri: &str,
        extra_query: &Map<String, Value>,
    ) -> Result<String, InvalidHttpRequestError> {
        let (base, uri) = if is_absolute(uri) {
            (uri.to_string(), "")
        } else {
            let base = self
                .base_url()
                .ok_or_else(|| InvalidHttpRequestError::MissingBaseUrl {
                    uri: uri.to_string(),
                })?;
            (base, uri)
        };

        let parsed = reqwest::Url::parse(&base).map_err(|e| InvalidHttpRequestError::InvalidUrl {
            url: base.clone(),
            reason: e.to_string(),
        })?;
        let host = parsed
            .host_str()
            .ok_or_else(|| InvalidHttpRequestError::InvalidUrl {
                url: base.clone(),
                reason: "missing host".to_string(),
            })?;

        let (uri_path, uri_query, uri_fragment) = split_uri(uri);

        let mut url = format!("{}://{host}", parsed.scheme());
        if let Some(port) = parsed.port() {
            let _ = write!(url, ":{port}");
        }

        if uri.starts_with('/') {
            url.push_str(uri_path);
        } else {
            let mut path = parsed.path().to_string();
            if !path.ends_with('/') && !uri.is_empty() {
                path.push('/');
            }
            path.push_str(uri_path);
            url.push_str(&path);
        }

        let mut merged = query::parse(parsed.query().unwrap_or_default());
        query::merge(&mut merged, query::parse(uri_query.unwrap_or_default()));
        query::merge(&mut merged, extra_query.clone());
        if !merged.is_empty() {
            url.push('?');
            url.push_str(&query::build(&merged));
        }

        if let Some(fragment) = uri_fragment.or_else(|| parsed.fragment()) {
            url.push('#');
            url.push_str(fragment);
        }

        Ok(url)
    }

    /// Builds the request without sending it.
    ///
    /// Default headers come first, then `headers`, then the `Content-Type`
    /// derived from the body; a later header with the same name replaces an
    /// earlier one. `User-Agent` is added unless one was supplied.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidRequest`] for an unsupported method, an
    /// unresolvable URL, or a body that cannot be encoded.
    pub fn prepare(
        &self,
        method: &str,
        uri: &str,
        data: &RequestData,
        headers: &[(&str, &str)],
    ) -> Result<HttpRequest, HttpError> {
        let method: HttpMethod = method.parse()?;
        let url = self.url(uri, data.query_params())?;

        let body = if method.sends_body() {
            Some(data.encode_body()?).filter(|(_, body)| !body.is_empty())
        } else {
            None
        };

        let mut merged = self.headers();
        for (name, value) in headers {
            upsert(&mut merged, (*name).to_string(), (*value).to_string());
        }
        if let Some((content_type, _)) = &body {
            upsert(
                &mut merged,
                "Content-Type".to_string(),
                (*content_type).to_string(),
            );
        }
        if !merged
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case("User-Agent"))
        {
            merged.push(("User-Agent".to_string(), self.user_agent()));
        }

        let mut request = HttpRequest::new(method, url);
        request.headers = merged;
        request.body = body.map(|(_, body)| body);
        Ok(request)
    }

    /// Sends a prepared request and returns it with its response attached.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Response`] for a status of 400 or above, or the
    /// transport's error if the request could not be executed.
    pub async fn send(&self, mut request: HttpRequest) -> Result<HttpRequest, HttpError> {
        tracing::debug!(method = %request.method, url = %request.url, "Sending Econt API request");

        let response = self.transport.execute(&request).await?;
        let code = response.status();

        if code >= 400 {
            let message = response.error_message();
            tracing::warn!(
                "Econt API request {} {} failed with status {}: {}",
                request.method,
                request.url,
                code,
                message
            );
            return Err(HttpError::Response(HttpResponseError {
                code,
                message,
                response: Box::new(response),
            }));
        }

        request.response = Some(response);
        Ok(request)
    }

    /// Prepares and sends a request.
    ///
    /// # Errors
    ///
    /// See [`prepare`](Self::prepare) and [`send`](Self::send).
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        data: RequestData,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, HttpError> {
        let request = self.prepare(method, uri, &data, headers)?;
        let sent = self.send(request).await?;
        sent.into_response().ok_or_else(|| HttpError::Transport {
            message: "Transport returned no response".to_string(),
            response: None,
        })
    }
}

fn upsert(headers: &mut Vec<(String, String)>, name: String, value: String) {
    if let Some(existing) = headers
        .iter_mut()
        .find(|(key, _)| key.eq_ignore_ascii_case(&name))
    {
        *existing = (name, value);
    } else {
        headers.push((name, value));
    }
}

/// Returns `true` if `uri` carries its own scheme and host.
fn is_absolute(uri: &str) -> bool {
    reqwest::Url::parse(uri).map_or(false, |url| url.has_host())
}

fn split_uri(uri: &str) -> (&str, Option<&str>, Option<&str>) {
    let (rest, fragment) = match uri.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (uri, None),
    };
    match rest.split_once('?') {
        Some((path, query)) => (path, Some(query), fragment),
        None => (rest, None, fragment),
    }
}
