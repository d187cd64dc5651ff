//! Storage driver management client
//!
//! REST client for the storage drivers (backing storage configurations bound
//! to mounts) of a group.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sirius_core::{Result, SiriusError};
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Mount served by a driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverMount {
    pub id: String,
    pub name: String,
    /// e.g. `MountTypeGroup`, `MountTypeGroupCustom`
    #[serde(rename = "type")]
    pub mount_type: String,
    pub mount_location: String,
}

/// Status of a driver
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverStatus {
    #[serde(default)]
    pub indexing_in_progress: bool,
}

/// A storage driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: String,
    pub name: String,
    /// Backend kind, e.g. `GCS`
    #[serde(rename = "type")]
    pub driver_type: String,
    #[serde(default)]
    pub mounts: Vec<DriverMount>,
    #[serde(default)]
    pub statuses: Vec<DriverStatus>,
}

impl Driver {
    /// Whether the driver is currently being indexed
    pub fn is_indexing(&self) -> bool {
        self.statuses.iter().any(|s| s.indexing_in_progress)
    }
}

#[derive(Debug, Deserialize)]
struct DriverList {
    #[serde(default)]
    drivers: Vec<Driver>,
}

/// Google Cloud Storage backend settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcsDriverConfig {
    pub bucket_id: String,
    pub client_secret: String,
}

/// Body of a driver creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDriverRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub driver_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcs: Option<GcsDriverConfig>,
}

/// Creation request for a driver backed by the GCS bucket `bucket_id`
pub fn create_gcs_driver_request(
    name: impl Into<String>,
    bucket_id: impl Into<String>,
    client_secret: impl Into<String>,
) -> CreateDriverRequest {
    CreateDriverRequest {
        name: name.into(),
        driver_type: "GCS".to_string(),
        gcs: Some(GcsDriverConfig {
            bucket_id: bucket_id.into(),
            client_secret: client_secret.into(),
        }),
    }
}

/// Driver management client for one group
pub struct DriverClient {
    client: Client,
    base_url: String,
    group_id: String,
    token: String,
}

impl DriverClient {
    /// Create a new driver client
    pub fn new(
        base_url: &str,
        group_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| SiriusError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            group_id: group_id.into(),
            token: token.into(),
        })
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/storage/driver{}", self.base_url, suffix)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", self.token))
            .header("active-group", &self.group_id)
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| SiriusError::Http(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        warn!(status = status.as_u16(), what, "Driver API call failed");
        if status == StatusCode::NOT_FOUND {
            return Err(SiriusError::NotFound(what.to_string()));
        }
        Err(SiriusError::Api {
            status: status.as_u16(),
            message: response.text().await.unwrap_or_default(),
        })
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| SiriusError::Shape(format!("Unexpected driver document: {}", e)))
    }

    /// Drivers of the group and its ancestors
    #[instrument(skip(self), fields(group_id = %self.group_id))]
    pub async fn get_drivers(&self) -> Result<Vec<Driver>> {
        let response = self.send(self.client.get(self.url("")), "drivers").await?;
        let list: DriverList = Self::json(response).await?;
        debug!(count = list.drivers.len(), "Received drivers");
        Ok(list.drivers)
    }

    #[instrument(skip(self), fields(group_id = %self.group_id))]
    pub async fn get_driver(&self, driver_id: &str) -> Result<Driver> {
        let url = self.url(&format!("/{}", driver_id));
        let response = self.send(self.client.get(url), driver_id).await?;
        Self::json(response).await
    }

    /// Create a driver, returning it as stored
    #[instrument(skip(self, request), fields(group_id = %self.group_id, name = %request.name))]
    pub async fn create_driver(&self, request: &CreateDriverRequest) -> Result<Driver> {
        let response = self
            .send(self.client.post(self.url("")).json(request), &request.name)
            .await?;
        Self::json(response).await
    }

    /// Delete a driver, returning the deleted driver
    #[instrument(skip(self), fields(group_id = %self.group_id))]
    pub async fn delete_driver(&self, driver_id: &str) -> Result<Driver> {
        let url = self.url(&format!("/{}", driver_id));
        let response = self.send(self.client.delete(url), driver_id).await?;
        Self::json(response).await
    }

    /// Re-index the storage behind a driver
    #[instrument(skip(self), fields(group_id = %self.group_id))]
    pub async fn rescan_driver(&self, driver_id: &str) -> Result<()> {
        let url = self.url(&format!("/{}/rescan", driver_id));
        self.send(self.client.post(url), driver_id).await?;
        Ok(())
    }

    /// Drop the cached content of a driver
    #[instrument(skip(self), fields(group_id = %self.group_id))]
    pub async fn dropcache_driver(&self, driver_id: &str) -> Result<()> {
        let url = self.url(&format!("/{}/dropcache", driver_id));
        self.send(self.client.post(url), driver_id).await?;
        Ok(())
    }
}

impl fmt::Debug for DriverClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverClient")
            .field("base_url", &self.base_url)
            .field("group_id", &self.group_id)
            .finish_non_exhaustive()
    }
}
