//! Profile service.

use serde_json::json;

use crate::clients::EcontError;
use crate::models::{Model, ModelCollection, ModelError, ModelKind};
use crate::resources::{object_at, objects_at};

resource_wrapper! {
    /// The `Profile/ProfileService` resource.
    Profiles => Profiles
}

impl Profiles {
    /// Returns the profiles of the authenticated client.
    ///
    /// # Errors
    ///
    /// Returns any error of the request, or [`EcontError::Model`] if the
    /// response has no `profiles`.
    pub async fn get_client_profiles(&self) -> Result<ModelCollection, EcontError> {
        let response = self.call("getClientProfiles", json!({})).await?;
        let body = response.json().map_err(ModelError::from)?;

        Ok(self.hydrate(objects_at(body, "profiles")?, None))
    }

    /// Creates a cash-on-delivery agreement and returns it as stored by
    /// Econt.
    ///
    /// # Errors
    ///
    /// Returns any error of the request, or [`EcontError::Model`] if the
    /// response has no `cdPayOptions` object.
    pub async fn create_cd_agreement(&self, cd_pay_options: &Model) -> Result<Model, EcontError> {
        let response = self
            .call(
                "createCDAgreement",
                json!({ "cdPayOptions": cd_pay_options.to_value() }),
            )
            .await?;
        let body = response.json().map_err(ModelError::from)?;

        Ok(self.new_model(
            object_at(body, "cdPayOptions")?,
            Some(ModelKind::CdPayOptions),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::tests::client;

    #[tokio::test]
    async fn test_get_client_profiles() {
        let (client, transport) = client();
        transport.push_json(
            200,
            json!({"profiles": [
                {"client": {"name": "Test Ltd", "judicialEntity": true}, "addresses": [], "cdPayOptions": []}
            ]}),
        );

        let profiles = client.profiles().unwrap().get_client_profiles().await.unwrap();

        assert!(transport
            .last_request()
            .unwrap()
            .url
            .ends_with("/Profile/ProfileService.getClientProfiles.json"));
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].kind(), ModelKind::Profile);
        assert!(profiles[0].resource().is_some());

        let client_profile = profiles[0].get_attribute("client").unwrap();
        let client_profile = client_profile.as_model().unwrap();
        assert_eq!(client_profile.kind(), ModelKind::ClientProfile);
        assert_eq!(client_profile["name"], "Test Ltd");
    }

    #[tokio::test]
    async fn test_create_cd_agreement_sends_options() {
        let (client, transport) = client();
        transport.push_json(
            200,
            json!({"cdPayOptions": {"num": "CD-1", "method": "bank", "IBAN": "BG80BNBG96611020345678"}}),
        );
        let options = Model::from_value(
            ModelKind::CdPayOptions,
            json!({"method": "bank", "IBAN": "BG80BNBG96611020345678"}),
        )
        .unwrap();

        let created = client
            .profiles()
            .unwrap()
            .create_cd_agreement(&options)
            .await
            .unwrap();

        let body: serde_json::Value =
            serde_json::from_str(transport.last_request().unwrap().body.as_deref().unwrap())
                .unwrap();
        assert_eq!(body["cdPayOptions"]["method"], "bank");
        assert_eq!(created.kind(), ModelKind::CdPayOptions);
        assert_eq!(created["num"], "CD-1");
        assert!(created.client().is_some());
    }

    #[tokio::test]
    async fn test_create_cd_agreement_missing_key() {
        let (client, transport) = client();
        transport.push_json(200, json!({"error": null}));

        let error = client
            .profiles()
            .unwrap()
            .create_cd_agreement(&Model::new(ModelKind::CdPayOptions))
            .await
            .unwrap_err();

        assert_eq!(
            error.to_string(),
            "Response does not contain the key [cdPayOptions]."
        );
    }
}
