//! Domain views over [`Model`] with behavior of their own.

use std::ops::{Deref, DerefMut};

use serde_json::{Map, Value};

use crate::clients::EcontError;
use crate::models::{Model, ModelKind};
use crate::resources::{AddressInput, Addresses};

/// A [`Model`] of kind [`ModelKind::Address`].
///
/// Dereferences to the underlying model for attribute access.
#[derive(Clone, Debug, PartialEq)]
pub struct Address(Model);

impl Address {
    /// Creates an address from its attributes.
    #[must_use]
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self(Model::with_attributes(ModelKind::Address, attributes))
    }

    /// Wraps a model. The model keeps its own kind.
    #[must_use]
    pub const fn from_model(model: Model) -> Self {
        Self(model)
    }

    /// Returns the underlying model.
    #[must_use]
    pub fn into_model(self) -> Model {
        self.0
    }

    /// Returns the `validationStatus` attribute.
    #[must_use]
    pub fn validation_status(&self) -> Option<&str> {
        self.0["validationStatus"].as_str()
    }

    /// Returns `true` if the address has a validation status other than
    /// `invalid`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validation_status()
            .is_some_and(|status| status != "invalid")
    }

    /// Validates the address through the Addresses resource of its client.
    ///
    /// The validation status is always copied back. With `merge`, every
    /// attribute of the validated address is filled in as well.
    ///
    /// # Errors
    ///
    /// Returns [`EcontError::InvalidArgument`] if the address has no client,
    /// or any error of [`Addresses::validate_address`].
    pub async fn validate(&mut self, merge: bool) -> Result<bool, EcontError> {
        let client = self.0.client().cloned().ok_or_else(|| {
            EcontError::InvalidArgument(
                "Address::validate requires an address created through a client.".to_string(),
            )
        })?;

        let validated = Addresses::new(client)
            .validate_address(AddressInput::Address(&self.0), None, None, None, None)
            .await?;

        self.0.set_attribute(
            "validationStatus",
            validated.get_original("validationStatus").cloned().unwrap_or(Value::Null),
        );
        if merge {
            self.0.fill(validated.to_array());
        }

        Ok(self.is_valid())
    }
}

impl Deref for Address {
    type Target = Model;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Address {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Model> for Address {
    fn from(model: Model) -> Self {
        Self(model)
    }
}

impl From<Address> for Model {
    fn from(address: Address) -> Self {
        address.0
    }
}

/// A [`Model`] of kind [`ModelKind::ClientProfile`].
#[derive(Clone, Debug, PartialEq)]
pub struct ClientProfile(Model);

impl ClientProfile {
    /// Creates a client profile from its attributes.
    #[must_use]
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self(Model::with_attributes(ModelKind::ClientProfile, attributes))
    }

    /// Returns the underlying model.
    #[must_use]
    pub fn into_model(self) -> Model {
        self.0
    }

    /// Returns `true` if the client is a judicial entity.
    #[must_use]
    pub fn is_company(&self) -> bool {
        truthy(&self.0["judicialEntity"])
    }

    /// Returns `true` if the client is a natural person.
    #[must_use]
    pub fn is_individual(&self) -> bool {
        !self.is_company()
    }
}

impl Deref for ClientProfile {
    type Target = Model;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ClientProfile {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Model> for ClientProfile {
    fn from(model: Model) -> Self {
        Self(model)
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty() && text != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_is_valid() {
        let mut address = Address::new(Map::new());
        assert!(!address.is_valid());

        address.set_attribute("validationStatus", "processed");
        assert!(address.is_valid());

        address.set_attribute("validationStatus", "invalid");
        assert!(!address.is_valid());
    }

    #[tokio::test]
    async fn test_validate_without_client_fails() {
        let mut address = Address::new(object(json!({"street": "Vitosha", "num": "1"})));
        let error = address.validate(true).await.unwrap_err();
        assert!(matches!(error, EcontError::InvalidArgument(_)));
    }

    #[test]
    fn test_client_profile_entity() {
        let company = ClientProfile::new(object(json!({"judicialEntity": true})));
        assert!(company.is_company());
        assert!(!company.is_individual());

        let person = ClientProfile::new(object(json!({"judicialEntity": false})));
        assert!(person.is_individual());

        assert!(ClientProfile::new(Map::new()).is_individual());
    }
}
