//! Rule-based inference of likely pollution causes.
//!
//! A deterministic decision list over the pollutant profile. Rules run in a
//! fixed order; the primary reason is assigned at most once, by the first
//! rule whose condition claims it, and contributing factors accumulate in
//! rule order without deduplication. The exact rule order, thresholds, and
//! strings are part of the observable contract.

use serde::{Deserialize, Serialize};

use crate::breakpoints::Pollutant;
use crate::profile::{PollutantProfile, WIND_SPEED};

/// Inferred primary cause plus supporting factors, in rule order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningResult {
    pub primary_reason: String,
    pub contributing_factors: Vec<String>,
}

/// Infer pollution causes from pollutant levels and wind speed.
pub fn infer_reasons(profile: &PollutantProfile) -> ReasoningResult {
    let pm25 = profile.get(Pollutant::Pm25.as_str()).copied();
    let pm10 = profile.get(Pollutant::Pm10.as_str()).copied();
    let wind_speed = profile.get(WIND_SPEED).copied();

    let mut factors = Vec::new();
    let mut primary: Option<&'static str> = None;

    // Rule 1: PM2.5 accumulation under stagnant air.
    if pm25.is_some_and(|v| v > 90.0) && wind_speed.is_some_and(|w| w < 2.0) {
        primary = Some("Low wind speed causing PM2.5 accumulation");
        factors.push("High PM2.5 concentration".to_string());
        factors.push("Poor atmospheric dispersion".to_string());
    }

    // Rule 2: dust and construction influence.
    if pm10.is_some_and(|v| v > 150.0) {
        factors.push("High PM10 levels indicate construction or road dust".to_string());
        primary.get_or_insert("Dust and construction activities");
    }

    // Rule 3: traffic-related pollution.
    if pm25.is_some_and(|v| v > 90.0) && pm10.is_some_and(|v| v > 150.0) {
        factors.push("Vehicular emissions contributing to particulate matter".to_string());
        primary.get_or_insert("Heavy vehicular emissions");
    }

    ReasoningResult {
        primary_reason: primary.unwrap_or("Multiple contributing factors").to_string(),
        contributing_factors: factors,
    }
}
