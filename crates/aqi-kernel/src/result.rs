//! The assembled pipeline result: the unit stored in and served from the
//! cache.

use serde::{Deserialize, Serialize};

use crate::aggregate::AqiResult;
use crate::profile::PollutantProfile;
use crate::reasoning::ReasoningResult;
use crate::risk::RiskResult;

/// How the winning fetch went: the radius that produced data and the number
/// of sensor readings behind the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchMeta {
    pub used_radius_km: u32,
    pub sensor_count: usize,
}

/// Full air quality assessment for one area or point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Area identifier, or the canonical point key for point queries.
    pub area_id: String,
    /// Normalized pollutant profile the assessment was derived from.
    pub pollutants: PollutantProfile,
    pub aqi: AqiResult,
    pub reasons: ReasoningResult,
    pub risk: RiskResult,
    /// Absent when the result was not produced by a sensor fetch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch: Option<FetchMeta>,
}
