//! Payment report service.

use serde_json::json;

use crate::clients::EcontError;
use crate::models::{ModelCollection, ModelKind};

resource_wrapper! {
    /// The `PaymentReport/PaymentReportService` resource.
    PaymentReports => PaymentReports
}

impl PaymentReports {
    /// Returns the cash-on-delivery payments made between two dates
    /// (`YYYY-MM-DD`).
    ///
    /// # Errors
    ///
    /// Returns any error of the request, or [`EcontError::Model`] if the
    /// response has no `PaymentReportRows`.
    pub async fn report(
        &self,
        date_from: &str,
        date_to: &str,
    ) -> Result<ModelCollection, EcontError> {
        let response = self
            .call(
                "PaymentReport",
                json!({ "dateFrom": date_from, "dateTo": date_to }),
            )
            .await?;

        self.collection_from_response(
            &response,
            ModelKind::PaymentReport,
            Some("PaymentReportRows"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::tests::client;

    #[tokio::test]
    async fn test_report_hydrates_rows() {
        let (client, transport) = client();
        transport.push_json(
            200,
            json!({"PaymentReportRows": [
                {"shipmentNumber": "1051", "amount": 12.5, "currency": "BGN"},
                {"shipmentNumber": "1052", "amount": 3, "currency": "BGN"}
            ]}),
        );

        let rows = client
            .payment_reports()
            .unwrap()
            .report("2024-01-01", "2024-01-31")
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert!(request
            .url
            .ends_with("/PaymentReport/PaymentReportService.PaymentReport.json"));
        assert_eq!(
            request.body.as_deref(),
            Some(r#"{"dateFrom":"2024-01-01","dateTo":"2024-01-31"}"#)
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.model_kind(), Some(ModelKind::PaymentReport));
        assert_eq!(rows[0]["shipmentNumber"], "1051");
    }

    #[tokio::test]
    async fn test_report_without_rows_key() {
        let (client, transport) = client();
        transport.push_json(200, json!({}));

        let error = client
            .payment_reports()
            .unwrap()
            .report("2024-01-01", "2024-01-31")
            .await
            .unwrap_err();

        assert!(matches!(error, EcontError::Model(_)));
    }
}
