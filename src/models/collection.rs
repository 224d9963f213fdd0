//! Ordered collections of models.

use std::ops::Index;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::clients::{ClientContext, HttpResponse};
use crate::models::{Model, ModelError, ModelKind};
use crate::resources::Resource;

/// An ordered, indexable list of [`Model`]s.
///
/// Collections remember the kind of model they hold, and optionally the
/// resource and response they were built from. Iteration borrows the
/// collection, so it can be iterated any number of times.
///
/// # Example
///
/// ```rust
/// use econt_api::models::{ModelCollection, ModelKind};
/// use serde_json::json;
///
/// let collection = ModelCollection::from_values(
///     vec![json!({"id": 1, "name": "Bulgaria"})],
///     ModelKind::Country,
/// )
/// .unwrap();
///
/// assert_eq!(collection.len(), 1);
/// assert_eq!(collection[0]["name"], "Bulgaria");
/// for country in &collection {
///     assert_eq!(country.kind(), ModelKind::Country);
/// }
/// ```
#[derive(Clone, Debug, Default)]
pub struct ModelCollection {
    models: Vec<Model>,
    model_kind: Option<ModelKind>,
    resource: Option<Resource>,
    response: Option<Arc<HttpResponse>>,
    client: Option<ClientContext>,
}

// Verify ModelCollection is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ModelCollection>();
};

impl ModelCollection {
    /// Creates a collection. Without `model_kind` the kind of the first
    /// model is used.
    #[must_use]
    pub fn new(models: Vec<Model>, model_kind: Option<ModelKind>) -> Self {
        let model_kind = model_kind.or_else(|| models.first().map(Model::kind));
        Self {
            models,
            model_kind,
            ..Self::default()
        }
    }

    /// Hydrates a collection of `kind` models from JSON objects.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotAnObject`] if an element is not an object.
    pub fn from_values<I>(values: I, kind: ModelKind) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = Value>,
    {
        let models = values
            .into_iter()
            .map(|value| Model::from_value(kind, value))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(models, Some(kind)))
    }

    /// Builds a collection from a response body.
    ///
    /// With `key`, the models are read from that top-level field, otherwise
    /// from the whole body. A JSON object's values are used in key order and
    /// `null` yields an empty collection.
    ///
    /// # Errors
    ///
    /// - [`ModelError::Decode`] if the body is not valid JSON
    /// - [`ModelError::MissingKey`] if `key` is absent
    /// - [`ModelError::NotAList`] if the value is not a list of objects
    pub fn from_response(
        response: &HttpResponse,
        kind: ModelKind,
        key: Option<&str>,
    ) -> Result<Self, ModelError> {
        let body = response.json()?;

        let value = match key {
            Some(key) => body.get(key).ok_or_else(|| ModelError::MissingKey {
                key: key.to_string(),
            })?,
            None => body,
        };

        let items: Vec<Value> = match value {
            Value::Array(items) => items.clone(),
            Value::Object(entries) => entries.values().cloned().collect(),
            Value::Null => Vec::new(),
            _ => {
                return Err(ModelError::NotAList {
                    key: key.unwrap_or("<root>").to_string(),
                })
            }
        };

        let mut collection = Self::from_values(items, kind)?;
        collection.set_response(Arc::new(response.clone()));
        Ok(collection)
    }

    /// Returns the number of models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns `true` if the collection holds no models.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Returns the model at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Model> {
        self.models.get(index)
    }

    /// Returns the model at `index` mutably.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Model> {
        self.models.get_mut(index)
    }

    /// Replaces the model at `index`, or appends when `index` is past the end.
    pub fn set(&mut self, index: usize, model: Model) -> &mut Self {
        match self.models.get_mut(index) {
            Some(slot) => *slot = model,
            None => self.models.push(model),
        }
        self
    }

    /// Appends a model.
    pub fn push(&mut self, model: Model) -> &mut Self {
        self.models.push(model);
        self
    }

    /// Removes and returns the model at `index`.
    pub fn remove(&mut self, index: usize) -> Option<Model> {
        (index < self.models.len()).then(|| self.models.remove(index))
    }

    /// Returns all models.
    #[must_use]
    pub fn all(&self) -> &[Model] {
        &self.models
    }

    /// Returns an iterator starting at the first model.
    pub fn iter(&self) -> std::slice::Iter<'_, Model> {
        self.models.iter()
    }

    /// Returns the attributes of every model.
    #[must_use]
    pub fn to_array(&self) -> Vec<Map<String, Value>> {
        self.models.iter().map(Model::to_array).collect()
    }

    /// Returns the collection as a JSON array.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Array(self.models.iter().map(Model::to_value).collect())
    }

    /// Encodes the collection as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::JsonEncoding`] if encoding fails.
    pub fn to_json(&self) -> Result<String, ModelError> {
        serde_json::to_string(&self.models).map_err(|e| ModelError::JsonEncoding {
            model: self.model_kind.unwrap_or(ModelKind::Generic).name(),
            message: e.to_string(),
        })
    }

    /// Returns the declared model kind.
    #[must_use]
    pub const fn model_kind(&self) -> Option<ModelKind> {
        self.model_kind
    }

    /// Returns the resource that produced the collection.
    #[must_use]
    pub const fn resource(&self) -> Option<&Resource> {
        self.resource.as_ref()
    }

    /// Sets the resource on the collection and every model in it.
    pub fn set_resource(&mut self, resource: Resource) -> &mut Self {
        for model in &mut self.models {
            model.set_resource(resource.clone());
        }
        self.resource = Some(resource);
        self
    }

    /// Returns the response the collection was built from.
    #[must_use]
    pub fn response(&self) -> Option<&HttpResponse> {
        self.response.as_deref()
    }

    /// Sets the originating response.
    pub fn set_response(&mut self, response: Arc<HttpResponse>) -> &mut Self {
        self.response = Some(response);
        self
    }

    /// Returns the client.
    #[must_use]
    pub const fn client(&self) -> Option<&ClientContext> {
        self.client.as_ref()
    }

    /// Sets the client on the collection and every model in it.
    pub fn set_client(&mut self, client: ClientContext) -> &mut Self {
        for model in &mut self.models {
            model.set_client(client.clone());
        }
        self.client = Some(client);
        self
    }

    /// Consumes the collection, returning its models.
    #[must_use]
    pub fn into_vec(self) -> Vec<Model> {
        self.models
    }
}

impl PartialEq for ModelCollection {
    fn eq(&self, other: &Self) -> bool {
        self.model_kind == other.model_kind && self.models == other.models
    }
}

impl Index<usize> for ModelCollection {
    type Output = Model;

    fn index(&self, index: usize) -> &Self::Output {
        &self.models[index]
    }
}

impl<'a> IntoIterator for &'a ModelCollection {
    type Item = &'a Model;
    type IntoIter = std::slice::Iter<'a, Model>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.iter()
    }
}

impl IntoIterator for ModelCollection {
    type Item = Model;
    type IntoIter = std::vec::IntoIter<Model>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.into_iter()
    }
}

impl Serialize for ModelCollection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.models.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn response(body: &str) -> HttpResponse {
        HttpResponse::new(200, HashMap::new(), body)
    }

    // === from_response ===

    #[test]
    fn test_from_response_with_key() {
        let response = response(r#"{"countries": [{"id": 1, "name": "Bulgaria"}]}"#);
        let collection =
            ModelCollection::from_response(&response, ModelKind::Country, Some("countries"))
                .unwrap();

        assert_eq!(collection.len(), 1);
        assert_eq!(collection[0]["name"], "Bulgaria");
        assert_eq!(collection.model_kind(), Some(ModelKind::Country));
        assert_eq!(collection.response().map(HttpResponse::status), Some(200));
    }

    #[test]
    fn test_from_response_without_key() {
        let response = response(r#"[{"id": 1}, {"id": 2}]"#);
        let collection = ModelCollection::from_response(&response, ModelKind::City, None).unwrap();
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_from_response_errors() {
        let invalid = response("not json");
        assert!(matches!(
            ModelCollection::from_response(&invalid, ModelKind::City, None),
            Err(ModelError::Decode(_))
        ));

        let body = response(r#"{"cities": []}"#);
        assert_eq!(
            ModelCollection::from_response(&body, ModelKind::City, Some("offices")).unwrap_err(),
            ModelError::MissingKey {
                key: "offices".to_string()
            }
        );

        let scalar = response(r#"{"cities": 5}"#);
        assert!(matches!(
            ModelCollection::from_response(&scalar, ModelKind::City, Some("cities")),
            Err(ModelError::NotAList { .. })
        ));
    }

    #[test]
    fn test_from_response_null_is_empty() {
        let body = response(r#"{"streets": null}"#);
        let collection =
            ModelCollection::from_response(&body, ModelKind::Street, Some("streets")).unwrap();
        assert!(collection.is_empty());
    }

    // === Access ===

    #[test]
    fn test_repeated_reads_are_stable() {
        let collection =
            ModelCollection::from_values(vec![json!({"id": 1}), json!({"id": 2})], ModelKind::City)
                .unwrap();

        let first: Vec<_> = collection.iter().map(|m| m["id"].clone()).collect();
        let second: Vec<_> = collection.iter().map(|m| m["id"].clone()).collect();
        assert_eq!(first, second);
        assert_eq!(collection.get(1), collection.get(1));
        assert!(collection.get(2).is_none());
    }

    #[test]
    fn test_set_push_remove() {
        let mut collection = ModelCollection::new(Vec::new(), Some(ModelKind::Street));
        collection.push(Model::from_value(ModelKind::Street, json!({"name": "A"})).unwrap());
        collection.set(5, Model::from_value(ModelKind::Street, json!({"name": "B"})).unwrap());
        assert_eq!(collection.len(), 2);

        collection.set(0, Model::from_value(ModelKind::Street, json!({"name": "C"})).unwrap());
        assert_eq!(collection[0]["name"], "C");

        assert!(collection.remove(3).is_none());
        assert_eq!(collection.remove(0).unwrap()["name"], "C");
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_kind_defaults_to_first_model() {
        let model = Model::new(ModelKind::Quarter);
        let collection = ModelCollection::new(vec![model], None);
        assert_eq!(collection.model_kind(), Some(ModelKind::Quarter));
        assert_eq!(ModelCollection::new(Vec::new(), None).model_kind(), None);
    }

    #[test]
    fn test_to_json() {
        let collection =
            ModelCollection::from_values(vec![json!({"id": 1})], ModelKind::City).unwrap();
        assert_eq!(collection.to_json().unwrap(), r#"[{"id":1}]"#);
        assert_eq!(collection.to_array()[0]["id"], 1);
    }
}
