//! Configuration for the assessment pipeline.

use serde::Deserialize;

/// Pipeline tuning knobs: the radius ladder for sparse sensor coverage,
/// the fetch page size, cache lifetime, and the per-attempt fetch timeout.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Radius of the first fetch attempt, in kilometers.
    pub start_radius_km: u32,

    /// Widest radius attempted before giving up.
    pub max_radius_km: u32,

    /// Increment between attempts.
    pub step_km: u32,

    /// Maximum measurements requested per fetch attempt.
    pub fetch_limit: usize,

    /// Cache entry time-to-live in seconds.
    pub cache_ttl_secs: u64,

    /// Timeout for a single fetch attempt in seconds.
    pub fetch_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            start_radius_km: 5,
            max_radius_km: 25,
            step_km: 5,
            fetch_limit: 50,
            cache_ttl_secs: 3600, // one hour
            fetch_timeout_secs: 30,
        }
    }
}

impl PipelineConfig {
    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.cache_ttl_secs as i64)
    }

    pub fn fetch_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.fetch_timeout_secs)
    }
}
