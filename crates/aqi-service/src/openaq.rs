//! OpenAQ v3 client: the production measurement fetcher.
//!
//! One fetch attempt resolves monitoring stations within the radius via
//! `/locations?coordinates=...&radius=...`, then pulls each station's
//! latest values from `/locations/{id}/latest`. The latest endpoint keys
//! readings by sensor id, so parameter names are recovered from the
//! station's sensor list.

use std::collections::HashMap;

use aqi_kernel::Measurement;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::fetch::{FetchBatch, FetchError, MeasurementFetcher};

/// Public OpenAQ API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openaq.org/v3";

/// Widest radius the provider accepts, in meters.
const MAX_RADIUS_METERS: u32 = 25_000;

fn radius_meters(radius_km: u32) -> u32 {
    (radius_km * 1000).min(MAX_RADIUS_METERS)
}

#[derive(Debug, Deserialize)]
struct LocationsResponse {
    results: Vec<Location>,
}

#[derive(Debug, Deserialize)]
struct Location {
    id: i64,
    sensors: Option<Vec<SensorInfo>>,
}

#[derive(Debug, Deserialize)]
struct SensorInfo {
    id: i64,
    parameter: ParameterInfo,
}

#[derive(Debug, Deserialize)]
struct ParameterInfo {
    name: String,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    results: Vec<LatestReading>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LatestReading {
    value: Option<f64>,
    sensors_id: i64,
}

/// Client for the OpenAQ measurement API.
pub struct OpenAqClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAqClient {
    /// Create a client with a per-request timeout.
    ///
    /// The timeout bounds each radius attempt individually; a timed-out
    /// attempt surfaces as a fetch error rather than an empty result.
    pub fn new(base_url: &str, api_key: Option<String>, timeout: std::time::Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        api_key: &str,
    ) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .header("X-API-Key", api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Api { status, body });
        }

        Ok(response.json().await?)
    }
}

impl MeasurementFetcher for OpenAqClient {
    async fn fetch_once(
        &self,
        lat: f64,
        lon: f64,
        radius_km: u32,
        limit: usize,
    ) -> Result<FetchBatch, FetchError> {
        let api_key = self.api_key.as_deref().ok_or(FetchError::NoApiKey)?;

        let url = format!(
            "{}/locations?coordinates={},{}&radius={}&limit={}",
            self.base_url,
            lat,
            lon,
            radius_meters(radius_km),
            limit
        );
        debug!(radius_km, %url, "querying stations");
        let locations: LocationsResponse = self.get_json(&url, api_key).await?;

        let mut batch = FetchBatch::default();
        for location in &locations.results {
            // Sensor id -> parameter name, from the station's sensor list.
            let parameters: HashMap<i64, &str> = location
                .sensors
                .iter()
                .flatten()
                .map(|s| (s.id, s.parameter.name.as_str()))
                .collect();

            let url = format!("{}/locations/{}/latest", self.base_url, location.id);
            let latest: LatestResponse = self.get_json(&url, api_key).await?;

            for reading in latest.results {
                let Some(parameter) = parameters.get(&reading.sensors_id) else {
                    continue;
                };
                let Some(value) = reading.value else {
                    continue;
                };
                batch.measurements.push(Measurement {
                    parameter: parameter.to_string(),
                    value: Some(value),
                });
                batch.sensor_count += 1;
            }
        }

        debug!(
            radius_km,
            stations = locations.results.len(),
            readings = batch.sensor_count,
            "fetch attempt complete"
        );
        Ok(batch)
    }
}
