//! Nomenclature service: countries, cities, offices, streets and quarters.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::clients::EcontError;
use crate::models::{ModelCollection, ModelError, ModelKind};

resource_wrapper! {
    /// The `Nomenclatures/NomenclaturesService` resource, also registered
    /// as `locations`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let nomenclatures = client.nomenclatures()?;
    /// let countries = nomenclatures.get_countries().await?;
    /// let offices = nomenclatures
    ///     .get_offices("BGR", &OfficeFilter::new().city_id(41))
    ///     .await?;
    /// ```
    Nomenclatures => Nomenclatures
}

/// Optional filters of [`Nomenclatures::get_offices`].
///
/// Unset filters are not sent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeFilter {
    #[serde(rename = "cityID", skip_serializing_if = "Option::is_none")]
    city_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    show_cargo_receptions: Option<bool>,
    #[serde(rename = "showLC", skip_serializing_if = "Option::is_none")]
    show_lc: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    serving_receptions: Option<bool>,
}

impl OfficeFilter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only offices in the city with this id.
    #[must_use]
    pub const fn city_id(mut self, city_id: i64) -> Self {
        self.city_id = Some(city_id);
        self
    }

    /// Include or exclude cargo reception offices.
    #[must_use]
    pub const fn show_cargo_receptions(mut self, show: bool) -> Self {
        self.show_cargo_receptions = Some(show);
        self
    }

    /// Include or exclude logistic centers.
    #[must_use]
    pub const fn show_lc(mut self, show: bool) -> Self {
        self.show_lc = Some(show);
        self
    }

    /// Include or exclude offices serving the city from a reception.
    #[must_use]
    pub const fn serving_receptions(mut self, serving: bool) -> Self {
        self.serving_receptions = Some(serving);
        self
    }
}

impl Nomenclatures {
    /// Returns every country Econt operates in.
    ///
    /// # Errors
    ///
    /// Returns any error of the request, or [`EcontError::Model`] if the
    /// response has no `countries`.
    pub async fn get_countries(&self) -> Result<ModelCollection, EcontError> {
        let response = self.call("getCountries", json!({})).await?;
        self.collection_from_response(&response, ModelKind::Country, Some("countries"))
    }

    /// Returns the cities of a country, by ISO alpha-3 code.
    ///
    /// # Errors
    ///
    /// Returns any error of the request, or [`EcontError::Model`] if the
    /// response has no `cities`.
    pub async fn get_cities(&self, country_code: &str) -> Result<ModelCollection, EcontError> {
        let response = self
            .call("getCities", json!({ "countryCode": country_code }))
            .await?;
        self.collection_from_response(&response, ModelKind::City, Some("cities"))
    }

    /// Returns the offices of a country, by ISO alpha-3 code.
    ///
    /// # Errors
    ///
    /// Returns any error of the request, or [`EcontError::Model`] if the
    /// response has no `offices`.
    pub async fn get_offices(
        &self,
        country_code: &str,
        filter: &OfficeFilter,
    ) -> Result<ModelCollection, EcontError> {
        let mut params = Map::new();
        params.insert("countryCode".to_string(), json!(country_code));
        if let Value::Object(filters) =
            serde_json::to_value(filter).map_err(|e| ModelError::JsonEncoding {
                model: "OfficeFilter",
                message: e.to_string(),
            })?
        {
            params.extend(filters);
        }

        let response = self.call("getOffices", Value::Object(params)).await?;
        self.collection_from_response(&response, ModelKind::Office, Some("offices"))
    }

    /// Returns the streets of a city.
    ///
    /// # Errors
    ///
    /// Returns any error of the request, or [`EcontError::Model`] if the
    /// response has no `streets`.
    pub async fn get_streets(&self, city_id: i64) -> Result<ModelCollection, EcontError> {
        let response = self.call("getStreets", json!({ "cityID": city_id })).await?;
        self.collection_from_response(&response, ModelKind::Street, Some("streets"))
    }

    /// Returns the quarters of a city.
    ///
    /// # Errors
    ///
    /// Returns any error of the request, or [`EcontError::Model`] if the
    /// response has no `quarters`.
    pub async fn get_quarters(&self, city_id: i64) -> Result<ModelCollection, EcontError> {
        let response = self.call("getQuarters", json!({ "cityID": city_id })).await?;
        self.collection_from_response(&response, ModelKind::Quarter, Some("quarters"))
    }

    /// Alias of [`Nomenclatures::get_quarters`].
    ///
    /// # Errors
    ///
    /// See [`Nomenclatures::get_quarters`].
    pub async fn get_neighborhoods(&self, city_id: i64) -> Result<ModelCollection, EcontError> {
        self.get_quarters(city_id).await
    }
}
