//! Composite risk scoring from the AQI and environmental conditions.

use serde::{Deserialize, Serialize};

use crate::aggregate::AqiResult;
use crate::breakpoints::Pollutant;
use crate::profile::{PollutantProfile, WIND_SPEED};

/// Qualitative risk level derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Unknown,
}

/// Risk score in `[0, 1]` with its qualitative level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    pub score: f64,
    pub level: RiskLevel,
}

/// Score the pollution risk for an assessment.
///
/// The score is a weighted sum of the normalized AQI (weight 0.6), a
/// severity bias for the dominant pollutant (PM2.5 0.2, PM10 0.15, NO2
/// 0.1), and a stagnant-air penalty (0.15 when wind speed is known and
/// below 2 m/s), rounded to two decimals and capped at 1.0. Without an
/// index there is nothing to score: the result is `0.0` / `Unknown`.
pub fn score_risk(aqi: &AqiResult, profile: &PollutantProfile) -> RiskResult {
    let Some(index) = aqi.index else {
        return RiskResult {
            score: 0.0,
            level: RiskLevel::Unknown,
        };
    };

    let aqi_factor = (f64::from(index) / 500.0).min(1.0);

    let pollutant_factor = match aqi.dominant_pollutant {
        Some(Pollutant::Pm25) => 0.2,
        Some(Pollutant::Pm10) => 0.15,
        Some(Pollutant::No2) => 0.1,
        None => 0.0,
    };

    let wind_penalty = match profile.get(WIND_SPEED) {
        Some(&w) if w < 2.0 => 0.15,
        _ => 0.0,
    };

    let raw = 0.6 * aqi_factor + pollutant_factor + wind_penalty;
    let score = ((raw * 100.0).round() / 100.0).min(1.0);

    let level = if score >= 0.8 {
        RiskLevel::High
    } else if score >= 0.5 {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    };

    RiskResult { score, level }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn aqi(index: Option<u16>, dominant: Option<Pollutant>) -> AqiResult {
        let mut sub_indices = BTreeMap::new();
        if let (Some(i), Some(p)) = (index, dominant) {
            sub_indices.insert(p, i);
        }
        AqiResult {
            index,
            category: crate::breakpoints::Category::Unknown,
            dominant_pollutant: dominant,
            sub_indices,
        }
    }

    fn profile(entries: &[(&str, f64)]) -> PollutantProfile {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    #[test]
    fn test_weighted_score_with_wind_penalty() {
        // 0.6 * 235/500 + 0.2 + 0.15 = 0.632 -> 0.63
        let result = score_risk(
            &aqi(Some(235), Some(Pollutant::Pm25)),
            &profile(&[("wind_speed", 1.5)]),
        );

        assert_eq!(result.score, 0.63);
        assert_eq!(result.level, RiskLevel::Moderate);
    }

    #[test]
    fn test_missing_index_is_unknown() {
        let result = score_risk(&AqiResult::unknown(), &PollutantProfile::new());

        assert_eq!(result.score, 0.0);
        assert_eq!(result.level, RiskLevel::Unknown);
    }

    #[test]
    fn test_pollutant_bias_without_wind_data() {
        // 0.6 * 100/500 + 0.15 = 0.27
        let result = score_risk(
            &aqi(Some(100), Some(Pollutant::Pm10)),
            &PollutantProfile::new(),
        );

        assert_eq!(result.score, 0.27);
        assert_eq!(result.level, RiskLevel::Low);
    }

    #[test]
    fn test_high_level_at_threshold() {
        // 0.6 * 500/500 + 0.2 = 0.8 exactly.
        let result = score_risk(
            &aqi(Some(500), Some(Pollutant::Pm25)),
            &PollutantProfile::new(),
        );

        assert_eq!(result.score, 0.8);
        assert_eq!(result.level, RiskLevel::High);
    }

    #[test]
    fn test_calm_wind_maximizes_score() {
        // 0.6 + 0.2 + 0.15 = 0.95; still within the cap.
        let result = score_risk(
            &aqi(Some(500), Some(Pollutant::Pm25)),
            &profile(&[("wind_speed", 0.4)]),
        );

        assert_eq!(result.score, 0.95);
        assert_eq!(result.level, RiskLevel::High);
    }
}
