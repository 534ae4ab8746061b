//! Pipeline orchestration: cache, progressive-radius fetch, and the
//! computation stages in their fixed order.

use std::collections::HashMap;
use std::sync::Arc;

use aqi_kernel::{
    aggregate, infer_reasons, normalize_measurements, score_risk, Clock, FetchMeta,
    PipelineConfig, PipelineResult, ResultCache,
};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::areas::lookup_area;
use crate::fetch::{FetchBatch, FetchError, MeasurementFetcher};

/// Terminal failures of a pipeline run.
///
/// An empty result is not a failure: it comes back as
/// [`PipelineOutcome::NoData`] so callers can render the two states
/// differently.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unknown area: {0}")]
    UnknownArea(String),

    /// Provider failure on some radius attempt. Retryable by the caller;
    /// never cached and never downgraded to an empty result.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Successful terminal states of a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    Success(PipelineResult),
    /// The radius ladder was exhausted without finding a sensor. Not
    /// cached, so an identical follow-up request retries the full ladder.
    NoData { meta: FetchMeta },
}

/// Cache key for a point query, quantized to four decimals.
pub fn point_cache_key(lat: f64, lon: f64, radius_km: u32) -> String {
    format!("point:{lat:.4},{lon:.4}:{radius_km}km")
}

/// The assessment pipeline.
///
/// Holds the measurement fetcher, the TTL cache behind a read-write lock,
/// and a per-key in-flight map so concurrent requests for the same uncached
/// key perform a single upstream fetch between them.
pub struct AirQualityPipeline<F> {
    fetcher: F,
    config: PipelineConfig,
    cache: RwLock<ResultCache>,
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<F: MeasurementFetcher> AirQualityPipeline<F> {
    pub fn new(fetcher: F, config: PipelineConfig, clock: Arc<dyn Clock>) -> Self {
        let cache = ResultCache::new(config.cache_ttl(), clock);
        Self {
            fetcher,
            config,
            cache: RwLock::new(cache),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Assess a named area, resolving its centroid from the metadata table.
    pub async fn compute_for_area(&self, area_id: &str) -> Result<PipelineOutcome, PipelineError> {
        let area =
            lookup_area(area_id).ok_or_else(|| PipelineError::UnknownArea(area_id.to_string()))?;

        self.compute(
            area_id.to_string(),
            area.lat,
            area.lon,
            self.config.start_radius_km,
        )
        .await
    }

    /// Assess a geographic point with an optional starting radius.
    pub async fn compute_for_point(
        &self,
        lat: f64,
        lon: f64,
        radius_km: Option<u32>,
    ) -> Result<PipelineOutcome, PipelineError> {
        let radius_km = radius_km.unwrap_or(self.config.start_radius_km);
        let key = point_cache_key(lat, lon, radius_km);
        self.compute(key, lat, lon, radius_km).await
    }

    async fn compute(
        &self,
        key: String,
        lat: f64,
        lon: f64,
        start_radius_km: u32,
    ) -> Result<PipelineOutcome, PipelineError> {
        let cached = self.cache.read().await.get(&key);
        if let Some(cached) = cached {
            debug!(key = %key, "cache hit");
            return Ok(PipelineOutcome::Success(cached));
        }

        // One in-flight computation per key: later arrivals queue on the
        // key's lock and find the cache populated when they get it.
        let slot = {
            let mut in_flight = self.in_flight.lock().await;
            in_flight
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let guard = slot.lock().await;

        // The guard must not be live across the cache write below, so the
        // lookup is bound before matching on it.
        let recheck = self.cache.read().await.get(&key);
        let outcome = match recheck {
            Some(cached) => {
                debug!(key = %key, "cache hit after waiting on in-flight computation");
                Ok(PipelineOutcome::Success(cached))
            }
            None => {
                let outcome = self.compute_uncached(&key, lat, lon, start_radius_km).await;
                if let Ok(PipelineOutcome::Success(result)) = &outcome {
                    self.cache.write().await.set(key.clone(), result.clone());
                }
                outcome
            }
        };

        drop(guard);
        self.in_flight.lock().await.remove(&key);
        outcome
    }

    async fn compute_uncached(
        &self,
        area_id: &str,
        lat: f64,
        lon: f64,
        start_radius_km: u32,
    ) -> Result<PipelineOutcome, PipelineError> {
        let (batch, used_radius_km) = match self.fetch_with_expansion(lat, lon, start_radius_km).await? {
            Ladder::Found { batch, radius_km } => (batch, radius_km),
            Ladder::Exhausted { last_radius_km } => {
                let used_radius_km = last_radius_km
                    .saturating_sub(self.config.step_km)
                    .max(start_radius_km);
                info!(area_id, used_radius_km, "no sensors within the maximum search radius");
                return Ok(PipelineOutcome::NoData {
                    meta: FetchMeta {
                        used_radius_km,
                        sensor_count: 0,
                    },
                });
            }
        };

        let profile = normalize_measurements(&batch.measurements);
        let aqi = aggregate(&profile);
        let reasons = infer_reasons(&profile);
        let risk = score_risk(&aqi, &profile);

        info!(
            area_id,
            index = ?aqi.index,
            used_radius_km,
            sensor_count = batch.sensor_count,
            "assessment computed"
        );

        Ok(PipelineOutcome::Success(PipelineResult {
            area_id: area_id.to_string(),
            pollutants: profile,
            aqi,
            reasons,
            risk,
            fetch: Some(FetchMeta {
                used_radius_km,
                sensor_count: batch.sensor_count,
            }),
        }))
    }

    /// Walk the radius ladder until a non-empty batch turns up.
    ///
    /// A fetch error aborts immediately: it counts against no further
    /// radius and is never treated as an empty result.
    async fn fetch_with_expansion(
        &self,
        lat: f64,
        lon: f64,
        start_radius_km: u32,
    ) -> Result<Ladder, FetchError> {
        let mut radius_km = start_radius_km;
        let mut last_radius_km = start_radius_km;

        while radius_km <= self.config.max_radius_km {
            last_radius_km = radius_km;
            let batch = self
                .fetcher
                .fetch_once(lat, lon, radius_km, self.config.fetch_limit)
                .await?;

            if !batch.measurements.is_empty() {
                return Ok(Ladder::Found { batch, radius_km });
            }

            debug!(radius_km, "no sensors found, widening search");
            radius_km += self.config.step_km.max(1);
        }

        Ok(Ladder::Exhausted { last_radius_km })
    }
}

/// Result of walking the radius ladder.
enum Ladder {
    Found { batch: FetchBatch, radius_km: u32 },
    Exhausted { last_radius_km: u32 },
}
