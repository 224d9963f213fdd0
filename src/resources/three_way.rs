//! Three-way logistics service.

use serde_json::Value;

use crate::clients::EcontError;
use crate::models::{Model, ModelError, ModelKind};

resource_wrapper! {
    /// The `ThreeWayLogistics/ThreeWayLogisticsService` resource.
    ThreeWay => ThreeWay
}

impl ThreeWay {
    /// Submits a three-way logistics request and returns the raw response
    /// body.
    ///
    /// `parameters` are read as [`ModelKind::ThreeWayParameters`] whatever
    /// the kind of the given model, and must carry every required
    /// attribute.
    ///
    /// # Errors
    ///
    /// Returns [`EcontError::Model`] if a required attribute is missing,
    /// before any request is made, or any error of the request.
    pub async fn three_way_logistics(&self, parameters: &Model) -> Result<Value, EcontError> {
        let parameters =
            Model::with_attributes(ModelKind::ThreeWayParameters, parameters.to_array());
        parameters.validate()?;

        let response = self
            .call("threeWayLogistics", parameters.to_value())
            .await?;

        Ok(response.json().map_err(ModelError::from)?.clone())
    }
}
