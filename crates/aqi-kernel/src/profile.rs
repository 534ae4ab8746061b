//! Raw measurements and the normalized pollutant profile.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::breakpoints::Pollutant;

/// Parameter key under which wind speed (m/s) rides along in a profile.
///
/// Wind speed is not a pollutant and never contributes a sub-index, but the
/// reasoning and risk stages read it from the same map the pollutants live
/// in.
pub const WIND_SPEED: &str = "wind_speed";

/// One raw reading as reported by a sensor.
///
/// Multiple sensors reporting the same parameter produce duplicate entries;
/// normalization resolves them. A missing value is preserved as `None` so
/// the normalizer can skip it rather than the transport layer inventing a
/// number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub parameter: String,
    pub value: Option<f64>,
}

/// Map of canonical parameter name to one representative concentration.
///
/// Built once per pipeline run and treated as immutable afterwards. Never
/// contains negative or non-finite values.
pub type PollutantProfile = HashMap<String, f64>;

/// Collapse raw measurements into one representative value per parameter.
///
/// Entries with an empty parameter name, a missing value, or a negative or
/// non-finite value are skipped. The representative value is the **maximum**
/// observed across all readings for that parameter: a conservative,
/// health-protective policy (a mean or median would understate localized
/// peaks; switching policy is an observable behavior change).
///
/// Parameter names are canonicalized: supported pollutants map onto their
/// canonical spelling (`pm2.5` becomes `pm25`), everything else is
/// lower-cased and passed through for the later stages.
pub fn normalize_measurements(measurements: &[Measurement]) -> PollutantProfile {
    let mut profile = PollutantProfile::new();

    for m in measurements {
        if m.parameter.is_empty() {
            continue;
        }
        let value = match m.value {
            Some(v) if v.is_finite() && v >= 0.0 => v,
            _ => continue,
        };
        let key = match Pollutant::from_parameter(&m.parameter) {
            Some(p) => p.as_str().to_string(),
            None => m.parameter.to_lowercase(),
        };

        profile
            .entry(key)
            .and_modify(|current| *current = value.max(*current))
            .or_insert(value);
    }

    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(parameter: &str, value: f64) -> Measurement {
        Measurement {
            parameter: parameter.to_string(),
            value: Some(value),
        }
    }

    #[test]
    fn test_max_wins_across_duplicates() {
        let profile = normalize_measurements(&[
            m("pm25", 300.0),
            m("pm25", 93.0),
            m("pm10", 180.0),
        ]);

        assert_eq!(profile.get("pm25"), Some(&300.0));
        assert_eq!(profile.get("pm10"), Some(&180.0));
        assert_eq!(profile.len(), 2);
    }

    #[test]
    fn test_skips_missing_and_invalid_entries() {
        let profile = normalize_measurements(&[
            Measurement {
                parameter: "pm25".to_string(),
                value: None,
            },
            Measurement {
                parameter: String::new(),
                value: Some(12.0),
            },
            m("pm10", -4.0),
            m("no2", f64::NAN),
            m("no2", 42.0),
        ]);

        assert_eq!(profile.get("pm25"), None);
        assert_eq!(profile.get("no2"), Some(&42.0));
        assert_eq!(profile.len(), 1);
    }

    #[test]
    fn test_canonicalizes_parameter_spellings() {
        let profile = normalize_measurements(&[
            m("PM2.5", 80.0),
            m("pm25", 60.0),
            m("Wind_Speed", 1.5),
        ]);

        // Both PM2.5 spellings collapse onto one key.
        assert_eq!(profile.get("pm25"), Some(&80.0));
        assert_eq!(profile.get(WIND_SPEED), Some(&1.5));
    }

    #[test]
    fn test_idempotent_over_single_valued_input() {
        let profile = normalize_measurements(&[m("pm25", 120.0), m("no2", 42.0)]);

        let as_measurements: Vec<Measurement> = profile
            .iter()
            .map(|(parameter, value)| Measurement {
                parameter: parameter.clone(),
                value: Some(*value),
            })
            .collect();

        assert_eq!(normalize_measurements(&as_measurements), profile);
    }
}
