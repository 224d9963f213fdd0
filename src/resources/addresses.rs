//! Address service: validation, service times and nearby offices.

use serde_json::{json, Map, Value};

use crate::clients::EcontError;
use crate::models::{enums::ShipmentType, Address, Model, ModelCollection, ModelError, ModelKind};
use crate::resources::object_at;

resource_wrapper! {
    /// The `Nomenclatures/AddressService` resource.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let addresses = client.addresses()?;
    /// let address = addresses.validate_street("Русе", "Славянска", "16").await?;
    /// assert!(address.is_valid());
    /// ```
    Addresses => Addresses
}

/// The address to validate: a city name to build one from, or an existing
/// address model to copy.
#[derive(Clone, Copy, Debug)]
pub enum AddressInput<'a> {
    /// The name of a city.
    City(&'a str),
    /// An address model. Its attributes are copied; the model itself is
    /// left untouched.
    Address(&'a Model),
}

impl<'a> From<&'a str> for AddressInput<'a> {
    fn from(city: &'a str) -> Self {
        Self::City(city)
    }
}

impl<'a> From<&'a Model> for AddressInput<'a> {
    fn from(address: &'a Model) -> Self {
        Self::Address(address)
    }
}

impl<'a> From<&'a Address> for AddressInput<'a> {
    fn from(address: &'a Address) -> Self {
        Self::Address(address)
    }
}

impl Addresses {
    /// Validates an address.
    ///
    /// The address needs `street` and `num`, or `quarter` and `other`,
    /// either from the input model or from the given parts. Empty parts and
    /// `"0"` are ignored. The result carries the attributes returned by the
    /// service and its `validationStatus`.
    ///
    /// # Errors
    ///
    /// Returns [`EcontError::InvalidArgument`] if neither pair of attributes
    /// is present, or any error of the request.
    pub async fn validate_address(
        &self,
        input: AddressInput<'_>,
        street: Option<&str>,
        num: Option<&str>,
        quarter: Option<&str>,
        other: Option<&str>,
    ) -> Result<Address, EcontError> {
        let attributes = match input {
            AddressInput::Address(model) => model.to_array(),
            AddressInput::City(name) => {
                let mut attributes = Map::new();
                attributes.insert("city".to_string(), json!({ "name": name }));
                attributes
            }
        };
        let mut address = self.new_model(attributes, Some(ModelKind::Address));

        let params: Vec<(&str, &str)> = [
            ("street", street),
            ("num", num),
            ("quarter", quarter),
            ("other", other),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.filter(|v| !v.is_empty() && *v != "0").map(|v| (key, v)))
        .collect();
        address.fill(params.iter().map(|(key, value)| (*key, Value::from(*value))));

        let has_street = address.has_attribute("street") && address.has_attribute("num");
        let has_quarter = address.has_attribute("quarter") && address.has_attribute("other");
        if !has_street && !has_quarter {
            let provided = if params.is_empty() {
                "None provided.".to_string()
            } else {
                let keys: Vec<&str> = params.iter().map(|(key, _)| *key).collect();
                format!("Only {} provided.", keys.join(", "))
            };
            return Err(EcontError::InvalidArgument(format!(
                "Addresses::validate_address requires an address with the attributes `street` and `num` or `quarter` and `other`. {provided}"
            )));
        }

        let response = self
            .call("validateAddress", json!({ "address": address.to_value() }))
            .await?;
        let body = response.json().map_err(ModelError::from)?;

        address.fill(object_at(body, "address")?);
        address.set_attribute(
            "validationStatus",
            body.get("validationStatus").cloned().unwrap_or(Value::Null),
        );

        Ok(Address::from_model(address))
    }

    /// Validates a street address.
    ///
    /// # Errors
    ///
    /// See [`Addresses::validate_address`].
    pub async fn validate_street(
        &self,
        city: &str,
        street: &str,
        num: &str,
    ) -> Result<Address, EcontError> {
        self.validate_address(AddressInput::City(city), Some(street), Some(num), None, None)
            .await
    }

    /// Validates a quarter address.
    ///
    /// # Errors
    ///
    /// See [`Addresses::validate_address`].
    pub async fn validate_quarter(
        &self,
        city: &str,
        quarter: &str,
        other: &str,
    ) -> Result<Address, EcontError> {
        self.validate_address(AddressInput::City(city), None, None, Some(quarter), Some(other))
            .await
    }

    /// Alias of [`Addresses::validate_quarter`].
    ///
    /// # Errors
    ///
    /// See [`Addresses::validate_address`].
    pub async fn validate_neighborhood(
        &self,
        city: &str,
        neighborhood: &str,
        other: &str,
    ) -> Result<Address, EcontError> {
        self.validate_quarter(city, neighborhood, other).await
    }

    /// Geolocates an address and returns its service times on `date`.
    ///
    /// # Errors
    ///
    /// Returns any error of the request, or [`EcontError::Model`] if the
    /// body is not an object.
    pub async fn address_service_times(
        &self,
        city_id: i64,
        address: &str,
        date: &str,
        shipment_type: ShipmentType,
    ) -> Result<Model, EcontError> {
        let response = self
            .call(
                "addressServiceTimes",
                json!({
                    "city": city_id,
                    "address": address,
                    "date": date,
                    "shipmentType": shipment_type.value(),
                }),
            )
            .await?;

        let body = response.json().map_err(ModelError::from)?;
        let attributes = match body {
            Value::Object(map) => map.clone(),
            _ => {
                return Err(ModelError::NotAnObject {
                    model: "Response",
                    attribute: "<root>".to_string(),
                    target: "ServiceTimes",
                }
                .into())
            }
        };

        Ok(self.new_model(attributes, Some(ModelKind::ServiceTimes)))
    }

    /// Returns the offices nearest to `address`, optionally only those
    /// serving `shipment_type`.
    ///
    /// # Errors
    ///
    /// Returns any error of the request, or [`EcontError::Model`] if the
    /// response has no `offices`.
    pub async fn get_nearest_offices(
        &self,
        address: &Model,
        shipment_type: Option<ShipmentType>,
    ) -> Result<ModelCollection, EcontError> {
        let response = self
            .call(
                "getNearestOffices",
                json!({
                    "address": address.to_value(),
                    "shipmentType": shipment_type,
                }),
            )
            .await?;

        self.collection_from_response(&response, ModelKind::Office, Some("offices"))
    }
}
