//! API resources.
//!
//! Each resource groups the operations of one Econt service under a base
//! URI, e.g. `Nomenclatures/NomenclaturesService`. Operations are invoked by
//! POSTing the parameters as JSON to `<baseUri>.<method>.json`, and the JSON
//! response is hydrated into [`Model`]s or a [`ModelCollection`].
//!
//! # Overview
//!
//! - [`Resource`]: the shared request and hydration helpers
//! - [`ResourceKind`]: the registry of resource names and base URIs
//! - [`Addresses`], [`Labels`], [`Nomenclatures`], [`PaymentReports`],
//!   [`Profiles`], [`Shipments`], [`ThreeWay`]: the services
//!
//! # Example
//!
//! ```rust,ignore
//! use econt_api::{EcontClient, EcontConfig};
//!
//! let client = EcontClient::new(EcontConfig::demo())?;
//! let cities = client.nomenclatures()?.get_cities("BGR").await?;
//! println!("{} cities", cities.len());
//! ```

/// Declares a service wrapper around [`Resource`].
macro_rules! resource_wrapper {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name(crate::resources::Resource);

        impl $name {
            /// Creates the resource for `client`.
            #[must_use]
            pub fn new(client: crate::clients::ClientContext) -> Self {
                Self(crate::resources::Resource::new(
                    crate::resources::ResourceKind::$kind,
                    client,
                ))
            }

            /// Returns the generic resource.
            #[must_use]
            pub const fn resource(&self) -> &crate::resources::Resource {
                &self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = crate::resources::Resource;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl From<crate::resources::Resource> for $name {
            fn from(resource: crate::resources::Resource) -> Self {
                Self(resource)
            }
        }
    };
}

mod addresses;
mod labels;
mod nomenclatures;
mod payment_reports;
mod profiles;
mod shipments;
mod three_way;

pub use addresses::{AddressInput, Addresses};
pub use labels::Labels;
pub use nomenclatures::{Nomenclatures, OfficeFilter};
pub use payment_reports::PaymentReports;
pub use profiles::Profiles;
pub use shipments::{CourierRequest, Shipments};
pub use three_way::ThreeWay;

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::clients::{ClientContext, EcontError, HttpResponse};
use crate::models::{Model, ModelCollection, ModelError, ModelKind};

/// Registered resource names, in registry order.
const REGISTRY: &[(&str, ResourceKind)] = &[
    ("profiles", ResourceKind::Profiles),
    ("shipments", ResourceKind::Shipments),
    ("labels", ResourceKind::Labels),
    ("nomenclatures", ResourceKind::Nomenclatures),
    ("locations", ResourceKind::Nomenclatures),
    ("addresses", ResourceKind::Addresses),
    ("threeWay", ResourceKind::ThreeWay),
    ("paymentReports", ResourceKind::PaymentReports),
];

const TYPE_PATH: &str = "econt_api::resources::";

/// The registered resource types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// [`Profiles`]
    Profiles,
    /// [`Shipments`]
    Shipments,
    /// [`Labels`]
    Labels,
    /// [`Nomenclatures`]
    Nomenclatures,
    /// [`Addresses`]
    Addresses,
    /// [`ThreeWay`]
    ThreeWay,
    /// [`PaymentReports`]
    PaymentReports,
}

impl ResourceKind {
    /// Looks up a resource by alias (`locations`) or type name
    /// (`Nomenclatures`, `econt_api::resources::Nomenclatures`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some((_, kind)) = REGISTRY.iter().find(|(alias, _)| *alias == name) {
            return Some(*kind);
        }
        let type_name = name.strip_prefix(TYPE_PATH).unwrap_or(name);
        REGISTRY
            .iter()
            .map(|(_, kind)| *kind)
            .find(|kind| kind.type_name() == type_name)
    }

    /// Returns every registered alias.
    #[must_use]
    pub fn available() -> Vec<&'static str> {
        REGISTRY.iter().map(|(alias, _)| *alias).collect()
    }

    /// Returns the type name.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Profiles => "Profiles",
            Self::Shipments => "Shipments",
            Self::Labels => "Labels",
            Self::Nomenclatures => "Nomenclatures",
            Self::Addresses => "Addresses",
            Self::ThreeWay => "ThreeWay",
            Self::PaymentReports => "PaymentReports",
        }
    }

    /// Returns the service path relative to the API base URL.
    #[must_use]
    pub const fn base_uri(self) -> &'static str {
        match self {
            Self::Profiles => "Profile/ProfileService",
            Self::Shipments => "Shipments/ShipmentService",
            Self::Labels => "Shipments/LabelService",
            Self::Nomenclatures => "Nomenclatures/NomenclaturesService",
            Self::Addresses => "Nomenclatures/AddressService",
            Self::ThreeWay => "ThreeWayLogistics/ThreeWayLogisticsService",
            Self::PaymentReports => "PaymentReport/PaymentReportService",
        }
    }

    /// Returns the default model kind of the resource.
    #[must_use]
    pub const fn model_kind(self) -> ModelKind {
        match self {
            Self::Profiles => ModelKind::Profile,
            Self::Addresses => ModelKind::Address,
            Self::PaymentReports => ModelKind::PaymentReport,
            Self::Shipments
            | Self::Labels
            | Self::Nomenclatures
            | Self::ThreeWay => ModelKind::Generic,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A resource bound to a client.
///
/// Cloning is cheap; clones compare equal with [`Resource::ptr_eq`].
#[derive(Clone, Debug)]
pub struct Resource {
    inner: Arc<ResourceInner>,
}

#[derive(Debug)]
struct ResourceInner {
    kind: ResourceKind,
    client: ClientContext,
}

impl Resource {
    /// Creates a resource of `kind` for `client`.
    #[must_use]
    pub fn new(kind: ResourceKind, client: ClientContext) -> Self {
        Self {
            inner: Arc::new(ResourceInner { kind, client }),
        }
    }

    /// Returns the resource kind.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.inner.kind
    }

    /// Returns the service path.
    #[must_use]
    pub fn base_uri(&self) -> &'static str {
        self.inner.kind.base_uri()
    }

    /// Returns the client.
    #[must_use]
    pub fn client(&self) -> &ClientContext {
        &self.inner.client
    }

    /// Returns the default model kind.
    #[must_use]
    pub fn model_kind(&self) -> ModelKind {
        self.inner.kind.model_kind()
    }

    /// Returns `true` if both handles refer to the same resource instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Calls a service method: POSTs `params` to `<baseUri>.<method>.json`.
    ///
    /// # Errors
    ///
    /// Returns [`EcontError::Http`] if the request fails.
    pub async fn call(&self, method: &str, params: Value) -> Result<HttpResponse, EcontError> {
        let uri = format!("{}.{method}", self.base_uri());
        self.request("POST", &uri, params, false).await
    }

    /// Sends a request relative to this resource.
    ///
    /// With `prepend_base_uri`, a `uri` not starting with `/` is joined to
    /// the base URI. `.json` is appended when missing.
    ///
    /// # Errors
    ///
    /// Returns [`EcontError::Http`] if the request fails.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        data: Value,
        prepend_base_uri: bool,
    ) -> Result<HttpResponse, EcontError> {
        let mut uri = if prepend_base_uri && !uri.starts_with('/') {
            format!("{}/{uri}", self.base_uri().trim_end_matches('/'))
        } else {
            uri.to_string()
        };
        if !uri.ends_with(".json") {
            uri.push_str(".json");
        }

        self.client().request(method, &uri, data).await
    }

    /// Creates a model bound to this resource and its client.
    ///
    /// `kind` overrides the resource's default model kind.
    #[must_use]
    pub fn new_model(&self, attributes: Map<String, Value>, kind: Option<ModelKind>) -> Model {
        let mut model = Model::with_attributes(kind.unwrap_or_else(|| self.model_kind()), attributes);
        model.set_resource(self.clone());
        model.set_client(self.client().clone());
        model
    }

    /// Creates a collection bound to this resource's client.
    #[must_use]
    pub fn new_collection(&self, models: Vec<Model>, kind: Option<ModelKind>) -> ModelCollection {
        self.new_model(Map::new(), kind).new_collection(models)
    }

    /// Builds a collection from a response and binds it to this resource.
    ///
    /// # Errors
    ///
    /// Returns [`EcontError::Model`] if the body cannot be hydrated; see
    /// [`ModelCollection::from_response`].
    pub fn collection_from_response(
        &self,
        response: &HttpResponse,
        kind: ModelKind,
        key: Option<&str>,
    ) -> Result<ModelCollection, EcontError> {
        let mut collection = ModelCollection::from_response(response, kind, key)?;
        collection.set_client(self.client().clone());
        collection.set_resource(self.clone());
        Ok(collection)
    }

    /// Hydrates plain attribute maps into models created by this resource.
    #[must_use]
    pub fn hydrate<I>(&self, items: I, kind: Option<ModelKind>) -> ModelCollection
    where
        I: IntoIterator<Item = Map<String, Value>>,
    {
        let prototype = self.new_model(Map::new(), kind);
        let models = items
            .into_iter()
            .map(|attributes| prototype.new_from_resource(attributes, Some(self)))
            .collect();
        prototype.new_collection(models)
    }
}

/// Returns the object stored under `key` in a response body.
pub(crate) fn object_at(body: &Value, key: &str) -> Result<Map<String, Value>, ModelError> {
    match body.get(key) {
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(Value::Null) | None => Err(ModelError::MissingKey {
            key: key.to_string(),
        }),
        Some(_) => Err(ModelError::NotAnObject {
            model: "Response",
            attribute: key.to_string(),
            target: "object",
        }),
    }
}

/// Returns the list of objects stored under `key` in a response body.
pub(crate) fn objects_at(body: &Value, key: &str) -> Result<Vec<Map<String, Value>>, ModelError> {
    let items = match body.get(key) {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::Object(entries)) => entries.values().cloned().collect(),
        Some(Value::Null) => Vec::new(),
        None => {
            return Err(ModelError::MissingKey {
                key: key.to_string(),
            })
        }
        Some(_) => {
            return Err(ModelError::NotAList {
                key: key.to_string(),
            })
        }
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Ok(map),
            _ => Err(ModelError::NotAnObject {
                model: "Response",
                attribute: key.to_string(),
                target: "object",
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{HttpClient, MockTransport};
    use crate::{EcontClient, EcontConfig};
    use serde_json::json;

    pub(crate) fn client() -> (EcontClient, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new());
        let http = HttpClient::with_transport(
            Some("https://demo.econt.com/ee/services"),
            Arc::clone(&transport) as Arc<dyn crate::clients::Transport>,
        );
        (EcontClient::with_http_client(EcontConfig::demo(), http), transport)
    }

    // === Registry ===

    #[test]
    fn test_registry_lookup() {
        assert_eq!(ResourceKind::from_name("locations"), Some(ResourceKind::Nomenclatures));
        assert_eq!(ResourceKind::from_name("threeWay"), Some(ResourceKind::ThreeWay));
        assert_eq!(ResourceKind::from_name("PaymentReports"), Some(ResourceKind::PaymentReports));
        assert_eq!(
            ResourceKind::from_name("econt_api::resources::Shipments"),
            Some(ResourceKind::Shipments)
        );
        assert_eq!(ResourceKind::from_name("Resource"), None);
        assert_eq!(ResourceKind::from_name("parcels"), None);
    }

    #[test]
    fn test_available_lists_aliases_in_order() {
        assert_eq!(
            ResourceKind::available(),
            vec![
                "profiles",
                "shipments",
                "labels",
                "nomenclatures",
                "locations",
                "addresses",
                "threeWay",
                "paymentReports"
            ]
        );
    }

    // === Requests ===

    #[tokio::test]
    async fn test_call_posts_to_method_uri() {
        let (client, transport) = client();
        transport.push_json(200, json!({}));
        let resource = client.make_resource("nomenclatures", false).unwrap();

        resource.call("getCountries", json!({})).await.unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.method.as_str(), "POST");
        assert_eq!(
            request.url,
            "https://demo.econt.com/ee/services/Nomenclatures/NomenclaturesService.getCountries.json"
        );
        assert_eq!(request.body.as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_request_joins_base_uri_and_appends_json() {
        let (client, transport) = client();
        transport.push_json(200, json!({}));
        transport.push_json(200, json!({}));
        transport.push_json(200, json!({}));
        let resource = client.make_resource("labels", false).unwrap();

        resource.request("GET", "info", json!({}), true).await.unwrap();
        resource.request("GET", "/absolute/path.json", json!({}), true).await.unwrap();
        resource.request("GET", "Other/Service.x", json!({}), false).await.unwrap();

        let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "https://demo.econt.com/ee/services/Shipments/LabelService/info.json",
                "https://demo.econt.com/absolute/path.json",
                "https://demo.econt.com/ee/services/Other/Service.x.json",
            ]
        );
    }

    // === Hydration ===

    #[test]
    fn test_new_model_binds_resource_and_client() {
        let (client, _) = client();
        let resource = client.make_resource("addresses", false).unwrap();
        let model = resource.new_model(Map::new(), None);

        assert_eq!(model.kind(), ModelKind::Address);
        assert!(model.resource().unwrap().ptr_eq(&resource));
        assert!(model.client().unwrap().ptr_eq(client.context()));
    }

    #[test]
    fn test_hydrate_creates_models_from_resource() {
        let (client, _) = client();
        let resource = client.make_resource("addresses", false).unwrap();
        let items = vec![
            json!({"street": "Vitosha"}).as_object().cloned().unwrap(),
            json!({"street": "Rakovski"}).as_object().cloned().unwrap(),
        ];

        let collection = resource.hydrate(items, None);
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.model_kind(), Some(ModelKind::Address));
        assert_eq!(collection[1]["validationStatus"], "normal");
        assert!(collection[0].resource().is_some());
        assert!(collection.client().is_some());
    }

    #[test]
    fn test_collection_from_response_propagates_client() {
        let (client, _) = client();
        let resource = client.make_resource("nomenclatures", false).unwrap();
        let response = HttpResponse::new(
            200,
            std::collections::HashMap::new(),
            r#"{"cities": [{"id": 41, "name": "Sofia", "country": {"code3": "BGR"}}]}"#,
        );

        let cities = resource
            .collection_from_response(&response, ModelKind::City, Some("cities"))
            .unwrap();
        let country = cities[0].get_attribute("country").unwrap();
        let country = country.as_model().unwrap();

        assert!(country.client().unwrap().ptr_eq(client.context()));
        assert!(cities.resource().unwrap().ptr_eq(&resource));
    }

    #[test]
    fn test_objects_at() {
        let body = json!({"list": [{"a": 1}], "bad": [1], "scalar": 3});
        assert_eq!(objects_at(&body, "list").unwrap().len(), 1);
        assert!(matches!(objects_at(&body, "bad"), Err(ModelError::NotAnObject { .. })));
        assert!(matches!(objects_at(&body, "scalar"), Err(ModelError::NotAList { .. })));
        assert!(matches!(objects_at(&body, "missing"), Err(ModelError::MissingKey { .. })));
    }
}
