//! The authenticated Econt client and its resource registry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde_json::{Map, Value};

use crate::clients::econt::EcontError;
use crate::clients::{HttpClient, HttpResponse, RequestData};
use crate::config::{Credentials, EcontConfig, Environment};
use crate::resources::{
    Addresses, Labels, Nomenclatures, PaymentReports, Profiles, Resource, ResourceKind, Shipments,
    ThreeWay,
};
use crate::utils::datetime::Timezone;

/// Shared state of an [`EcontClient`], handed to resources and models.
///
/// Cloning is cheap; all clones refer to the same client.
#[derive(Clone, Debug)]
pub struct ClientContext {
    inner: Arc<ContextInner>,
}

#[derive(Debug)]
struct ContextInner {
    credentials: Credentials,
    http: Arc<HttpClient>,
    demo: RwLock<bool>,
    timezone: Timezone,
}

impl ClientContext {
    fn new(credentials: Credentials, http: Arc<HttpClient>, demo: bool, timezone: Timezone) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                credentials,
                http,
                demo: RwLock::new(demo),
                timezone,
            }),
        }
    }

    /// Sends an authenticated request.
    ///
    /// For `GET` and `HEAD`, `data` becomes the query string; for every
    /// other method it is sent as a JSON body. `Accept: application/json`
    /// and the `Authorization` header are added.
    ///
    /// # Errors
    ///
    /// Returns [`EcontError::Http`] with the status code of a failed request.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        data: Value,
    ) -> Result<HttpResponse, EcontError> {
        let data = match data {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        let request_data = if method.eq_ignore_ascii_case("GET") || method.eq_ignore_ascii_case("HEAD")
        {
            RequestData::new().query(data)
        } else {
            RequestData::new().json(&data)
        };

        let authorization = self.inner.credentials.authorization_header();
        let headers = [
            ("Accept", "application/json"),
            ("Authorization", authorization.as_str()),
        ];

        Ok(self
            .inner
            .http
            .request(method, uri, request_data, &headers)
            .await?)
    }

    /// Returns the HTTP client.
    #[must_use]
    pub fn http(&self) -> &HttpClient {
        &self.inner.http
    }

    /// Returns the credentials.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.inner.credentials
    }

    /// Returns `true` in demo mode.
    #[must_use]
    pub fn is_demo(&self) -> bool {
        *self.inner.demo.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Switches between demo and live mode and points the HTTP client at
    /// the matching base URL.
    pub fn set_demo(&self, demo: bool) {
        let mut mode = self
            .inner
            .demo
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *mode = demo;
        self.inner
            .http
            .set_base_url(Some(Environment::from_demo(demo).base_url()));
    }

    /// Returns the zone used for naive date-times.
    #[must_use]
    pub fn timezone(&self) -> Timezone {
        self.inner.timezone
    }

    /// Returns `true` if both contexts belong to the same client.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Client for the Econt web services.
///
/// Holds the credentials, the live/demo mode and one instance of every
/// resource requested so far.
///
/// # Thread Safety
///
/// `EcontClient` is `Send + Sync`. The resource cache is guarded by a mutex
/// that is never held across an `.await`.
///
/// # Example
///
/// ```rust,ignore
/// use econt_api::{EcontClient, EcontConfig};
///
/// let client = EcontClient::new(EcontConfig::demo())?;
/// let countries = client.nomenclatures()?.get_countries().await?;
/// for country in &countries {
///     println!("{}", country["name"]);
/// }
/// ```
#[derive(Debug)]
pub struct EcontClient {
    context: ClientContext,
    resources: Mutex<HashMap<String, Resource>>,
}

// Verify EcontClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<EcontClient>();
    assert_send_sync::<ClientContext>();
};

impl EcontClient {
    /// Creates a client using the network transport, pointed at the
    /// configured environment.
    ///
    /// # Errors
    ///
    /// Returns [`EcontError::Http`] if the HTTP client cannot be created.
    pub fn new(config: EcontConfig) -> Result<Self, EcontError> {
        let http = HttpClient::new(Some(config.environment().base_url()))?;
        Ok(Self::from_parts(&config, http))
    }

    /// Creates a client using the given HTTP client.
    ///
    /// The HTTP client keeps its own base URL until [`demo`](Self::demo) or
    /// [`live`](Self::live) is called.
    #[must_use]
    pub fn with_http_client(config: EcontConfig, http: HttpClient) -> Self {
        Self::from_parts(&config, http)
    }

    fn from_parts(config: &EcontConfig, http: HttpClient) -> Self {
        if let Some(prefix) = config.user_agent_prefix() {
            let agent = format!("{prefix} | {}", http.user_agent());
            http.set_user_agent(agent);
        }

        let context = ClientContext::new(
            config.credentials().clone(),
            Arc::new(http),
            config.environment().is_demo(),
            config.timezone(),
        );

        Self {
            context,
            resources: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the shared client state.
    #[must_use]
    pub const fn context(&self) -> &ClientContext {
        &self.context
    }

    /// Returns the HTTP client.
    #[must_use]
    pub fn http(&self) -> &HttpClient {
        self.context.http()
    }

    /// Enables or disables demo mode.
    pub fn demo(&self, value: bool) -> &Self {
        self.context.set_demo(value);
        self
    }

    /// Enables or disables live mode.
    pub fn live(&self, value: bool) -> &Self {
        self.context.set_demo(!value);
        self
    }

    /// Returns `true` in demo mode.
    #[must_use]
    pub fn is_demo(&self) -> bool {
        self.context.is_demo()
    }

    /// Returns `true` in live mode.
    #[must_use]
    pub fn is_live(&self) -> bool {
        !self.context.is_demo()
    }

    /// Sends an authenticated request. See [`ClientContext::request`].
    ///
    /// # Errors
    ///
    /// Returns [`EcontError::Http`] with the status code of a failed request.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        data: Value,
    ) -> Result<HttpResponse, EcontError> {
        self.context.request(method, uri, data).await
    }

    /// Returns `true` if `name` is a registered resource alias or type name.
    #[must_use]
    pub fn is_valid_resource(&self, name: &str) -> bool {
        ResourceKind::from_name(name).is_some()
    }

    /// Returns the resource registered under `name`.
    ///
    /// The instance is cached under `name`; pass `force_create` to replace
    /// the cached instance with a new one.
    ///
    /// # Errors
    ///
    /// Returns [`EcontError::InvalidResource`] listing the registered
    /// aliases if `name` is unknown.
    pub fn make_resource(&self, name: &str, force_create: bool) -> Result<Resource, EcontError> {
        let mut resources = self
            .resources
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if !force_create {
            if let Some(resource) = resources.get(name) {
                return Ok(resource.clone());
            }
        }

        let kind = ResourceKind::from_name(name).ok_or_else(|| EcontError::InvalidResource {
            resource: name.to_string(),
            available: ResourceKind::available(),
        })?;

        tracing::debug!(resource = name, base_uri = kind.base_uri(), "Creating Econt resource");
        let resource = Resource::new(kind, self.context.clone());
        resources.insert(name.to_string(), resource.clone());
        Ok(resource)
    }

    /// Returns the address service.
    ///
    /// # Errors
    ///
    /// Never fails for a registered name; see [`make_resource`](Self::make_resource).
    pub fn addresses(&self) -> Result<Addresses, EcontError> {
        self.make_resource("addresses", false).map(Addresses::from)
    }

    /// Returns the label service.
    ///
    /// # Errors
    ///
    /// See [`make_resource`](Self::make_resource).
    pub fn labels(&self) -> Result<Labels, EcontError> {
        self.make_resource("labels", false).map(Labels::from)
    }

    /// Returns the nomenclatures service.
    ///
    /// # Errors
    ///
    /// See [`make_resource`](Self::make_resource).
    pub fn nomenclatures(&self) -> Result<Nomenclatures, EcontError> {
        self.make_resource("nomenclatures", false)
            .map(Nomenclatures::from)
    }

    /// Returns the nomenclatures service under its `locations` alias.
    ///
    /// # Errors
    ///
    /// See [`make_resource`](Self::make_resource).
    pub fn locations(&self) -> Result<Nomenclatures, EcontError> {
        self.make_resource("locations", false).map(Nomenclatures::from)
    }

    /// Returns the payment report service.
    ///
    /// # Errors
    ///
    /// See [`make_resource`](Self::make_resource).
    pub fn payment_reports(&self) -> Result<PaymentReports, EcontError> {
        self.make_resource("paymentReports", false)
            .map(PaymentReports::from)
    }

    /// Returns the profile service.
    ///
    /// # Errors
    ///
    /// See [`make_resource`](Self::make_resource).
    pub fn profiles(&self) -> Result<Profiles, EcontError> {
        self.make_resource("profiles", false).map(Profiles::from)
    }

    /// Returns the shipment service.
    ///
    /// # Errors
    ///
    /// See [`make_resource`](Self::make_resource).
    pub fn shipments(&self) -> Result<Shipments, EcontError> {
        self.make_resource("shipments", false).map(Shipments::from)
    }

    /// Returns the three way logistics service.
    ///
    /// # Errors
    ///
    /// See [`make_resource`](Self::make_resource).
    pub fn three_way(&self) -> Result<ThreeWay, EcontError> {
        self.make_resource("threeWay", false).map(ThreeWay::from)
    }
}
