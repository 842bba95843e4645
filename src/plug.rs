//! Smart plug control

use reqwest::Method;

use printbay_protocol::{
    api::{PlugListResponse, SetPlugStateRequest},
    SmartPlug,
};

use crate::client::ApiClient;
use crate::error::{PrintBayError, Result};

/// Smart plug operations against the farm API.
pub struct PlugService<'a, C: ApiClient> {
    client: &'a C,
}

impl<'a, C: ApiClient> PlugService<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<SmartPlug>> {
        let response = self
            .client
            .request::<(), PlugListResponse>(Method::GET, "plugs", None)
            .await?;
        Ok(response.into_data()?.plugs)
    }

    /// Switch one plug; the server confirms the resulting state.
    pub async fn set_state(&self, id: i64, on: bool) -> Result<SmartPlug> {
        let response = self
            .client
            .request::<SetPlugStateRequest, SmartPlug>(
                Method::PUT,
                &format!("plugs/{}/state", id),
                Some(&SetPlugStateRequest { on }),
            )
            .await
            .map_err(|e| PrintBayError::plug(format!("Failed to switch plug {}: {}", id, e)))?;
        response.into_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mocks::MockApiClient;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_plugs() {
        let client = MockApiClient::new();
        client.add_response(
            "plugs",
            json!({
                "plugs": [
                    { "id": 1, "name": "voron-psu", "on": true, "power_w": 118.4, "printer_id": 1 },
                    { "id": 2, "name": "chamber-light", "on": false, "power_w": null, "printer_id": null }
                ]
            }),
        );

        let service = PlugService::new(&client);
        let plugs = service.list().await.unwrap();
        assert_eq!(plugs.len(), 2);
        assert!(plugs[0].on);
        assert!(!plugs[1].on);
    }

    #[tokio::test]
    async fn test_set_state_surfaces_plug_error() {
        let client = MockApiClient::new();
        client.fail_endpoint("plugs/7/state");

        let service = PlugService::new(&client);
        let result = service.set_state(7, true).await;
        assert!(matches!(
            result,
            Err(PrintBayError::Plug { .. })
        ));
    }
}
