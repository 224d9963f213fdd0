//! Shipment service: statuses, courier requests and ITU codes.

use serde_json::{json, Map, Value};

use crate::clients::EcontError;
use crate::models::enums::{ShipmentSide, ShipmentType};
use crate::models::{Model, ModelCollection, ModelError, ModelKind};
use crate::resources::objects_at;
use crate::utils::datetime::DateInput;

resource_wrapper! {
    /// The `Shipments/ShipmentService` resource.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let statuses = client
    ///     .shipments()?
    ///     .get_shipment_statuses(&["1051603003551"])
    ///     .await?;
    /// for status in &statuses {
    ///     println!("{}", status["shortDeliveryStatusEn"]);
    /// }
    /// ```
    Shipments => Shipments
}

/// Parameters of [`Shipments::request_courier`].
///
/// # Example
///
/// ```rust,ignore
/// use econt_api::models::enums::ShipmentType;
/// use econt_api::resources::CourierRequest;
///
/// let request = CourierRequest::new(
///     sender,
///     address,
///     ShipmentType::Pack,
///     "2024-01-15 10:00",
///     "2024-01-15 17:00",
///     2.5,
/// )
/// .count(2);
/// let id = client.shipments()?.request_courier(&request).await?;
/// ```
#[derive(Clone, Debug)]
pub struct CourierRequest {
    client: Model,
    address: Model,
    shipment_type: ShipmentType,
    from: DateInput,
    to: DateInput,
    weight: f64,
    count: u32,
    agent: Option<Model>,
    shipments: Vec<String>,
    pack12: Option<u32>,
}

impl CourierRequest {
    /// Creates a request for one pack.
    ///
    /// `client` is the sender's client profile and `address` the pickup
    /// address. The courier is expected between `from` and `to`.
    #[must_use]
    pub fn new(
        client: Model,
        address: Model,
        shipment_type: ShipmentType,
        from: impl Into<DateInput>,
        to: impl Into<DateInput>,
        weight: f64,
    ) -> Self {
        Self {
            client,
            address,
            shipment_type,
            from: from.into(),
            to: to.into(),
            weight,
            count: 1,
            agent: None,
            shipments: Vec::new(),
            pack12: None,
        }
    }

    /// Sets the number of packs. Raised to the number of attached
    /// shipments when lower.
    #[must_use]
    pub const fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Sets the agent handing over the shipment.
    #[must_use]
    pub fn agent(mut self, agent: Model) -> Self {
        self.agent = Some(agent);
        self
    }

    /// Attaches existing shipment numbers.
    #[must_use]
    pub fn shipments<I, S>(mut self, shipments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shipments = shipments.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the number of 12-pack boxes.
    #[must_use]
    pub const fn pack12(mut self, pack12: u32) -> Self {
        self.pack12 = Some(pack12);
        self
    }

    fn pack_count(&self) -> u32 {
        let attached = u32::try_from(self.shipments.len()).unwrap_or(u32::MAX);
        self.count.max(attached)
    }
}

impl Shipments {
    /// Returns the current status of each shipment.
    ///
    /// # Errors
    ///
    /// Returns any error of the request, or [`EcontError::Model`] if the
    /// response has no `shipmentStatuses`.
    pub async fn get_shipment_statuses(
        &self,
        shipment_numbers: &[&str],
    ) -> Result<ModelCollection, EcontError> {
        let response = self
            .call(
                "getShipmentStatuses",
                json!({ "shipmentNumbers": shipment_numbers }),
            )
            .await?;
        let body = response.json().map_err(ModelError::from)?;

        self.statuses(objects_at(body, "shipmentStatuses")?, ModelKind::ShipmentStatus)
    }

    /// Returns the status of each courier request.
    ///
    /// # Errors
    ///
    /// Returns any error of the request, or [`EcontError::Model`] if the
    /// response has no `requestCourierStatus`.
    pub async fn get_request_courier_status(
        &self,
        request_ids: &[&str],
    ) -> Result<ModelCollection, EcontError> {
        let response = self
            .call(
                "getRequestCourierStatus",
                json!({ "requestCourierIds": request_ids }),
            )
            .await?;
        let body = response.json().map_err(ModelError::from)?;

        self.statuses(
            objects_at(body, "requestCourierStatus")?,
            ModelKind::CourierRequestStatus,
        )
    }

    /// Alias of [`Shipments::get_request_courier_status`].
    ///
    /// # Errors
    ///
    /// See [`Shipments::get_request_courier_status`].
    pub async fn get_courier_request_status(
        &self,
        request_ids: &[&str],
    ) -> Result<ModelCollection, EcontError> {
        self.get_request_courier_status(request_ids).await
    }

    /// Requests a courier and returns the courier request id.
    ///
    /// Naive times are read in the client's timezone. Empty values (no
    /// agent, no attached shipments, zero weight) are left out of the
    /// request.
    ///
    /// # Errors
    ///
    /// Returns [`EcontError::InvalidArgument`] if a time cannot be parsed,
    /// any error of the request, or [`EcontError::Model`] if the response
    /// has no `courierRequestID`.
    pub async fn request_courier(&self, request: &CourierRequest) -> Result<String, EcontError> {
        let timezone = self.client().timezone();
        let from = timezone
            .timestamp(&request.from)
            .map_err(|e| EcontError::InvalidArgument(e.to_string()))?;
        let to = timezone
            .timestamp(&request.to)
            .map_err(|e| EcontError::InvalidArgument(e.to_string()))?;

        let params: Map<String, Value> = [
            ("requestTimeFrom", json!(from)),
            ("requestTimeTo", json!(to)),
            ("shipmentType", json!(request.shipment_type)),
            ("shipmentPackCount", json!(request.pack_count())),
            ("shipmentWeight", json!(request.weight)),
            ("senderClient", request.client.to_value()),
            ("senderAddress", request.address.to_value()),
            (
                "senderAgent",
                request.agent.as_ref().map_or(Value::Null, Model::to_value),
            ),
            ("attachShipments", json!(request.shipments)),
            ("pack12", json!(request.pack12)),
        ]
        .into_iter()
        .filter(|(_, value)| !is_empty(value))
        .map(|(key, value)| (key.to_string(), value))
        .collect();

        let response = self.call("requestCourier", Value::Object(params)).await?;
        let body = response.json().map_err(ModelError::from)?;

        match body.get("courierRequestID") {
            Some(Value::String(id)) => Ok(id.clone()),
            Some(Value::Number(id)) => Ok(id.to_string()),
            _ => Err(ModelError::MissingKey {
                key: "courierRequestID".to_string(),
            }
            .into()),
        }
    }

    /// Lists the caller's bills of lading.
    ///
    /// # Errors
    ///
    /// Always returns [`EcontError::NotImplemented`].
    pub fn get_my_awb(
        &self,
        _date_to: &str,
        _date_from: Option<&str>,
        _page: Option<u32>,
        _side: Option<ShipmentSide>,
    ) -> Result<ModelCollection, EcontError> {
        Err(EcontError::NotImplemented("Shipments::get_my_awb"))
    }

    /// Sets the ITU code of a truck carrying a bill of lading.
    ///
    /// # Errors
    ///
    /// Returns any error of the request.
    pub async fn set_itu_code(
        &self,
        awb_barcode: &str,
        truck_reg_number: &str,
        itu_code: &str,
    ) -> Result<&Self, EcontError> {
        self.call(
            "setITUCode",
            json!({
                "awbBarcode": awb_barcode,
                "truckRegNumber": truck_reg_number,
                "ITU_code": itu_code,
            }),
        )
        .await?;

        Ok(self)
    }

    /// Flattens status entries: each entry's `status` object with the
    /// entry's `error` merged in.
    fn statuses(
        &self,
        entries: Vec<Map<String, Value>>,
        kind: ModelKind,
    ) -> Result<ModelCollection, EcontError> {
        let models = entries
            .into_iter()
            .map(|mut entry| {
                let mut attributes = match entry.remove("status") {
                    Some(Value::Object(status)) => status,
                    Some(Value::Null) | None => Map::new(),
                    Some(_) => {
                        return Err(ModelError::NotAnObject {
                            model: kind.name(),
                            attribute: "status".to_string(),
                            target: kind.name(),
                        })
                    }
                };
                attributes.insert(
                    "error".to_string(),
                    entry.remove("error").unwrap_or(Value::Null),
                );
                Ok(self.new_model(attributes, Some(kind)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.new_collection(models, Some(kind)))
    }
}

/// Values dropped from request parameters.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::tests::client;

    fn sent_body(transport: &crate::clients::MockTransport) -> Value {
        serde_json::from_str(transport.last_request().unwrap().body.as_deref().unwrap()).unwrap()
    }

    fn sender() -> (Model, Model) {
        let client = Model::from_value(
            ModelKind::ClientProfile,
            json!({"name": "Ivan Petrov", "phones": ["0888123456"]}),
        )
        .unwrap();
        let address = Model::from_value(
            ModelKind::Address,
            json!({"city": {"name": "Sofia"}, "street": "Vitosha", "num": "1"}),
        )
        .unwrap();
        (client, address)
    }

    // === Statuses ===

    #[tokio::test]
    async fn test_get_shipment_statuses_merges_error() {
        let (client, transport) = client();
        transport.push_json(
            200,
            json!({"shipmentStatuses": [
                {"status": {"shipmentNumber": "1051", "storageOfficeName": "Sofia"}, "error": null},
                {"status": null, "error": {"type": "NotFound", "message": "Unknown shipment"}}
            ]}),
        );

        let statuses = client
            .shipments()
            .unwrap()
            .get_shipment_statuses(&["1051", "9999"])
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert!(request
            .url
            .ends_with("/Shipments/ShipmentService.getShipmentStatuses.json"));
        assert_eq!(sent_body(&transport), json!({"shipmentNumbers": ["1051", "9999"]}));

        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses.model_kind(), Some(ModelKind::ShipmentStatus));
        assert_eq!(statuses[0]["shipmentNumber"], "1051");
        assert!(statuses[0]["error"].is_null());

        let error = statuses[1].get_attribute("error").unwrap();
        let error = error.as_model().unwrap();
        assert_eq!(error.kind(), ModelKind::Error);
        assert_eq!(error["message"], "Unknown shipment");
    }

    #[tokio::test]
    async fn test_courier_request_status_alias() {
        let (client, transport) = client();
        transport.push_json(
            200,
            json!({"requestCourierStatus": [{"status": {"status": "processing"}}]}),
        );

        let statuses = client
            .shipments()
            .unwrap()
            .get_courier_request_status(&["42"])
            .await
            .unwrap();

        assert_eq!(sent_body(&transport), json!({"requestCourierIds": ["42"]}));
        assert!(transport
            .last_request()
            .unwrap()
            .url
            .ends_with(".getRequestCourierStatus.json"));
        assert_eq!(statuses[0].kind(), ModelKind::CourierRequestStatus);
        assert!(statuses[0].has_attribute("status"));
        assert!(!statuses[0].has_attribute("error"));
    }

    // === request_courier ===

    #[tokio::test]
    async fn test_request_courier_builds_params() {
        let (client, transport) = client();
        transport.push_json(200, json!({"courierRequestID": 5531}));
        let (sender, address) = sender();

        let request = CourierRequest::new(
            sender,
            address,
            ShipmentType::Pack,
            "2024-01-15 10:00",
            1_705_330_800_i64,
            2.5,
        )
        .shipments(["1051", "1052", "1053"]);

        let id = client.shipments().unwrap().request_courier(&request).await.unwrap();

        assert_eq!(id, "5531");
        let body = sent_body(&transport);
        assert_eq!(body["requestTimeFrom"], 1_705_305_600);
        assert_eq!(body["requestTimeTo"], 1_705_330_800);
        assert_eq!(body["shipmentType"], "pack");
        assert_eq!(body["shipmentPackCount"], 3);
        assert_eq!(body["shipmentWeight"], 2.5);
        assert_eq!(body["senderClient"]["name"], "Ivan Petrov");
        assert_eq!(body["senderAddress"]["street"], "Vitosha");
        assert_eq!(body["attachShipments"], json!(["1051", "1052", "1053"]));
        assert!(body.get("senderAgent").is_none());
        assert!(body.get("pack12").is_none());
    }

    #[tokio::test]
    async fn test_request_courier_reads_summer_times_in_sofia() {
        let (client, transport) = client();
        transport.push_json(200, json!({"courierRequestID": 5532}));
        let (sender, address) = sender();

        let request = CourierRequest::new(
            sender,
            address,
            ShipmentType::Pack,
            "2024-07-15 10:00",
            "2024-07-15 17:00",
            1.0,
        );

        client.shipments().unwrap().request_courier(&request).await.unwrap();

        let body = sent_body(&transport);
        assert_eq!(body["requestTimeFrom"], 1_721_026_800);
        assert_eq!(body["requestTimeTo"], 1_721_052_000);
    }

    #[tokio::test]
    async fn test_request_courier_keeps_larger_count_and_agent() {
        let (client, transport) = client();
        transport.push_json(200, json!({"courierRequestID": "CR-7"}));
        let (sender, address) = sender();
        let agent = Model::from_value(ModelKind::ClientProfile, json!({"name": "Agent"})).unwrap();

        let request = CourierRequest::new(sender, address, ShipmentType::Document, 0_i64, 60_i64, 0.0)
            .count(4)
            .agent(agent)
            .pack12(2);

        let id = client.shipments().unwrap().request_courier(&request).await.unwrap();

        assert_eq!(id, "CR-7");
        let body = sent_body(&transport);
        assert_eq!(body["shipmentPackCount"], 4);
        assert_eq!(body["senderAgent"]["name"], "Agent");
        assert_eq!(body["pack12"], 2);
        assert!(body.get("requestTimeFrom").is_none());
        assert!(body.get("shipmentWeight").is_none());
        assert!(body.get("attachShipments").is_none());
    }

    #[tokio::test]
    async fn test_request_courier_rejects_bad_time() {
        let (client, transport) = client();
        let (sender, address) = sender();
        let request =
            CourierRequest::new(sender, address, ShipmentType::Pack, "soon", "later", 1.0);

        let error = client
            .shipments()
            .unwrap()
            .request_courier(&request)
            .await
            .unwrap_err();

        assert!(matches!(error, EcontError::InvalidArgument(_)));
        assert_eq!(error.to_string(), "Could not parse date 'soon'.");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_request_courier_without_id() {
        let (client, transport) = client();
        transport.push_json(200, json!({}));
        let (sender, address) = sender();
        let request = CourierRequest::new(sender, address, ShipmentType::Pack, 1_i64, 2_i64, 1.0);

        let error = client
            .shipments()
            .unwrap()
            .request_courier(&request)
            .await
            .unwrap_err();
        assert!(matches!(error, EcontError::Model(ModelError::MissingKey { .. })));
    }

    // === Other operations ===

    #[tokio::test]
    async fn test_set_itu_code() {
        let (client, transport) = client();
        transport.push_json(200, json!({}));
        let shipments = client.shipments().unwrap();

        let returned = shipments
            .set_itu_code("1051603003551", "CB1234AB", "ITU-9")
            .await
            .unwrap();

        assert!(returned.ptr_eq(&shipments));
        assert_eq!(
            sent_body(&transport),
            json!({"awbBarcode": "1051603003551", "truckRegNumber": "CB1234AB", "ITU_code": "ITU-9"})
        );
    }

    #[test]
    fn test_get_my_awb_is_not_implemented() {
        let (client, transport) = client();
        let error = client
            .shipments()
            .unwrap()
            .get_my_awb("2024-01-31", None, None, None)
            .unwrap_err();

        assert_eq!(error.to_string(), "Shipments::get_my_awb is not implemented.");
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_is_empty() {
        assert!(is_empty(&json!(0)));
        assert!(is_empty(&json!(0.0)));
        assert!(is_empty(&json!("0")));
        assert!(is_empty(&json!([])));
        assert!(!is_empty(&json!(0.5)));
        assert!(!is_empty(&json!({"a": 1})));
    }
}
