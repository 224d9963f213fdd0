//! The generic attribute model.

use std::collections::HashMap;
use std::fmt;
use std::ops::Index;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::clients::ClientContext;
use crate::models::{Cast, CastValue, ModelCollection, ModelError, ModelKind};
use crate::resources::Resource;

static NULL: Value = Value::Null;

/// A typed record of JSON attributes.
///
/// The attribute map is the source of truth for serialization. Reads go
/// through the kind's alias table, then through its cast table: a castable
/// attribute is converted once and the result is memoized, so repeated reads
/// of a nested-model attribute return the same [`Arc`].
///
/// # Example
///
/// ```rust
/// use econt_api::models::{Model, ModelKind};
/// use serde_json::json;
///
/// let address = Model::from_value(
///     ModelKind::Address,
///     json!({"city": {"name": "Sofia"}, "quarter": "Lozenets"}),
/// )
/// .unwrap();
///
/// // Aliases resolve before lookup.
/// assert_eq!(address["neighborhood"], "Lozenets");
///
/// // `city` is cast to a nested City model.
/// let city = address.get_attribute("city").unwrap();
/// assert_eq!(city.as_model().unwrap()["name"], "Sofia");
/// ```
pub struct Model {
    kind: ModelKind,
    attributes: Map<String, Value>,
    casts: HashMap<String, Cast>,
    casted: Mutex<HashMap<String, Arc<CastValue>>>,
    client: Option<ClientContext>,
    resource: Option<Resource>,
}

// Verify Model is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Model>();
};

impl Model {
    /// Creates an empty model of the given kind.
    #[must_use]
    pub fn new(kind: ModelKind) -> Self {
        Self {
            kind,
            attributes: Map::new(),
            casts: HashMap::new(),
            casted: Mutex::new(HashMap::new()),
            client: None,
            resource: None,
        }
    }

    /// Creates a model and fills it with `attributes`.
    #[must_use]
    pub fn with_attributes(kind: ModelKind, attributes: Map<String, Value>) -> Self {
        let mut model = Self::new(kind);
        model.fill(attributes);
        model
    }

    /// Creates a model from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotAnObject`] if `value` is not an object.
    pub fn from_value(kind: ModelKind, value: Value) -> Result<Self, ModelError> {
        match value {
            Value::Object(attributes) => Ok(Self::with_attributes(kind, attributes)),
            _ => Err(ModelError::NotAnObject {
                model: kind.name(),
                attribute: "<root>".to_string(),
                target: kind.name(),
            }),
        }
    }

    /// Creates a model from any value that serializes to a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::JsonEncoding`] if serialization fails and
    /// [`ModelError::NotAnObject`] if the result is not an object.
    pub fn from_serializable<T: Serialize + ?Sized>(
        kind: ModelKind,
        value: &T,
    ) -> Result<Self, ModelError> {
        let value = serde_json::to_value(value).map_err(|e| ModelError::JsonEncoding {
            model: kind.name(),
            message: e.to_string(),
        })?;
        Self::from_value(kind, value)
    }

    /// Returns the model kind.
    #[must_use]
    pub const fn kind(&self) -> ModelKind {
        self.kind
    }

    /// Sets every attribute in `attributes`.
    pub fn fill<I, K>(&mut self, attributes: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        for (key, value) in attributes {
            self.set_attribute(key.as_ref(), value);
        }
        self
    }

    /// Sets an attribute, resolving aliases first.
    ///
    /// Any memoized cast of the attribute is discarded.
    pub fn set_attribute(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        let key = self.kind.resolve_alias(key).to_string();
        self.forget_cast(&key);
        self.attributes.insert(key, value.into());
        self
    }

    /// Reads an attribute, casting it when the kind declares a cast for it.
    ///
    /// Attributes without a cast are returned as [`CastValue::Raw`], absent
    /// ones as `Raw(null)`.
    ///
    /// # Errors
    ///
    /// Returns the [`ModelError`] of a failed cast.
    pub fn get_attribute(&self, key: &str) -> Result<Arc<CastValue>, ModelError> {
        let key = self.kind.resolve_alias(key);
        if self.is_castable(key) {
            return self.cast_attribute(key);
        }
        Ok(Arc::new(CastValue::Raw(
            self.get_original(key).cloned().unwrap_or(Value::Null),
        )))
    }

    /// Casts an attribute and memoizes the result.
    ///
    /// The cast runs at most once per attribute until the attribute is set
    /// again.
    ///
    /// # Errors
    ///
    /// Returns the [`ModelError`] of a failed cast. Failures are not cached.
    pub fn cast_attribute(&self, key: &str) -> Result<Arc<CastValue>, ModelError> {
        let key = self.kind.resolve_alias(key);
        let mut casted = self.casted.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = casted.get(key) {
            return Ok(Arc::clone(value));
        }

        let raw = self.get_original(key).unwrap_or(&NULL);
        let value = match self.cast_of(key) {
            Some(cast) => cast.apply(raw, self.kind, key, self.client.as_ref())?,
            None => CastValue::Raw(raw.clone()),
        };

        let value = Arc::new(value);
        casted.insert(key.to_string(), Arc::clone(&value));
        Ok(value)
    }

    /// Returns the stored value of an attribute without casting.
    #[must_use]
    pub fn get_original(&self, key: &str) -> Option<&Value> {
        self.attributes.get(self.kind.resolve_alias(key))
    }

    /// Returns `true` if the attribute has a cast.
    #[must_use]
    pub fn is_castable(&self, key: &str) -> bool {
        let key = self.kind.resolve_alias(key);
        self.casts.contains_key(key) || self.kind.cast_for(key).is_some()
    }

    /// Returns `true` if the attribute is present and not `null`.
    #[must_use]
    pub fn has_attribute(&self, key: &str) -> bool {
        self.get_original(key).is_some_and(|value| !value.is_null())
    }

    /// Removes an attribute, resolving aliases first.
    pub fn remove_attribute(&mut self, key: &str) -> Option<Value> {
        let key = self.kind.resolve_alias(key).to_string();
        self.forget_cast(&key);
        self.attributes.remove(&key)
    }

    /// Declares a cast on this instance from a textual descriptor.
    ///
    /// Instance casts take precedence over the kind's table.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidCast`] for an unrecognized descriptor.
    pub fn add_cast(&mut self, key: &str, descriptor: &str) -> Result<&mut Self, ModelError> {
        let cast = Cast::parse(descriptor, self.kind)?;
        let key = self.kind.resolve_alias(key).to_string();
        self.forget_cast(&key);
        self.casts.insert(key, cast);
        Ok(self)
    }

    /// Checks that every required attribute is present and not `null`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingRequired`] listing the missing
    /// attributes in declaration order.
    pub fn validate(&self) -> Result<&Self, ModelError> {
        let missing: Vec<&'static str> = self
            .kind
            .required()
            .iter()
            .copied()
            .filter(|attribute| !self.has_attribute(attribute))
            .collect();

        if missing.is_empty() {
            Ok(self)
        } else {
            Err(ModelError::MissingRequired {
                model: self.kind.name(),
                missing,
            })
        }
    }

    /// Returns the stored attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Returns a copy of the stored attributes.
    #[must_use]
    pub fn to_array(&self) -> Map<String, Value> {
        self.attributes.clone()
    }

    /// Returns the attributes as a JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.to_array())
    }

    /// Encodes the attributes as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::JsonEncoding`] if encoding fails.
    pub fn to_json(&self) -> Result<String, ModelError> {
        serde_json::to_string(&self.attributes).map_err(|e| ModelError::JsonEncoding {
            model: self.kind.name(),
            message: e.to_string(),
        })
    }

    /// Creates a new model sharing this model's client.
    ///
    /// `kind` overrides the kind of the new model.
    #[must_use]
    pub fn new_instance(&self, attributes: Map<String, Value>, kind: Option<ModelKind>) -> Self {
        let mut model = Self::with_attributes(kind.unwrap_or(self.kind), attributes);
        model.client.clone_from(&self.client);
        model
    }

    /// Creates a new model of this kind, as returned by a resource.
    ///
    /// Addresses created this way start with `validationStatus` set to
    /// `normal`.
    #[must_use]
    pub fn new_from_resource(
        &self,
        attributes: Map<String, Value>,
        resource: Option<&Resource>,
    ) -> Self {
        let mut model = self.new_instance(attributes, None);
        if let Some(resource) = resource {
            model.set_resource(resource.clone());
        }
        if model.kind == ModelKind::Address {
            model.set_attribute("validationStatus", "normal");
        }
        model
    }

    /// Creates a collection of this kind holding `models`.
    #[must_use]
    pub fn new_collection(&self, models: Vec<Self>) -> ModelCollection {
        let mut collection = ModelCollection::new(models, Some(self.kind));
        if let Some(client) = &self.client {
            collection.set_client(client.clone());
        }
        collection
    }

    /// Returns the client this model was created through.
    #[must_use]
    pub const fn client(&self) -> Option<&ClientContext> {
        self.client.as_ref()
    }

    /// Sets the client. Memoized casts are discarded so nested models pick
    /// up the new client.
    pub fn set_client(&mut self, client: ClientContext) -> &mut Self {
        self.client = Some(client);
        self.casted
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self
    }

    /// Returns the resource that created this model.
    #[must_use]
    pub const fn resource(&self) -> Option<&Resource> {
        self.resource.as_ref()
    }

    /// Sets the resource.
    pub fn set_resource(&mut self, resource: Resource) -> &mut Self {
        self.resource = Some(resource);
        self
    }

    fn cast_of(&self, key: &str) -> Option<Cast> {
        self.casts
            .get(key)
            .cloned()
            .or_else(|| self.kind.cast_for(key))
    }

    fn forget_cast(&mut self, key: &str) {
        self.casted
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

impl Clone for Model {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            attributes: self.attributes.clone(),
            casts: self.casts.clone(),
            casted: Mutex::new(HashMap::new()),
            client: self.client.clone(),
            resource: self.resource.clone(),
        }
    }
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.attributes == other.attributes
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("kind", &self.kind)
            .field("attributes", &self.attributes)
            .field("has_client", &self.client.is_some())
            .field("resource", &self.resource.as_ref().map(Resource::kind))
            .finish()
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = self.to_json().map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.attributes.serialize(serializer)
    }
}

impl Index<&str> for Model {
    type Output = Value;

    fn index(&self, key: &str) -> &Self::Output {
        self.get_original(key).unwrap_or(&NULL)
    }
}
