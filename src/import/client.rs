use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::import::models::{GbfsFeed, GbfsRegion, GbfsStation, RegionsData, StationsData};

/// Client for a bike-share system's public GBFS feeds.
pub struct GbfsClient {
    http_client: Client,
    base_url: String,
}

impl GbfsClient {
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the HTTP client cannot be built.
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.gbfs_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, feed: &str) -> AppResult<GbfsFeed<T>> {
        let url = format!("{}/{feed}.json", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Request to {feed} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "{feed}: HTTP {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse {feed}: {e}")))
    }

    /// # Errors
    ///
    /// Returns `AppError::Upstream` if the feed cannot be fetched or parsed.
    pub async fn regions(&self) -> AppResult<Vec<GbfsRegion>> {
        Ok(self.fetch::<RegionsData>("system_regions").await?.data.regions)
    }

    /// # Errors
    ///
    /// Returns `AppError::Upstream` if the feed cannot be fetched or parsed.
    pub async fn stations(&self) -> AppResult<Vec<GbfsStation>> {
        Ok(self
            .fetch::<StationsData>("station_information")
            .await?
            .data
            .stations)
    }
}
