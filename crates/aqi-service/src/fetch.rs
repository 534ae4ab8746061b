//! The measurement-fetch seam between the pipeline and the sensor data
//! provider.
//!
//! The trait is a single-shot point query; the pipeline owns the radius
//! expansion policy, so implementations never retry on their own.

use aqi_kernel::Measurement;
use thiserror::Error;

/// One fetch attempt's worth of raw readings.
#[derive(Debug, Clone, Default)]
pub struct FetchBatch {
    /// Raw readings, possibly with duplicate parameters across sensors.
    pub measurements: Vec<Measurement>,
    /// Number of sensor readings behind `measurements`.
    pub sensor_count: usize,
}

/// Failures at the provider boundary.
///
/// These are never conflated with an empty result: a fetch error aborts the
/// pipeline and is surfaced to the caller as retryable, while zero
/// measurements advance the radius ladder.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to measurement provider failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("measurement provider returned status {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("measurement provider API key not configured")]
    NoApiKey,

    #[error("invalid provider payload: {0}")]
    InvalidData(String),
}

/// A source of raw measurements around a geographic point.
#[allow(async_fn_in_trait)]
pub trait MeasurementFetcher {
    /// Fetch up to `limit` readings within `radius_km` of the point.
    ///
    /// An empty batch means no sensors reported, not a failure.
    async fn fetch_once(
        &self,
        lat: f64,
        lon: f64,
        radius_km: u32,
        limit: usize,
    ) -> Result<FetchBatch, FetchError>;
}
