//! Composite AQI aggregation over a normalized pollutant profile.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::breakpoints::{sub_index, Category, Pollutant};
use crate::profile::PollutantProfile;

/// Overall AQI derived from the per-pollutant sub-indices.
///
/// `dominant_pollutant`, when present, is always a key of `sub_indices`,
/// and the overall index and category are that pollutant's own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AqiResult {
    pub index: Option<u16>,
    pub category: Category,
    pub dominant_pollutant: Option<Pollutant>,
    pub sub_indices: BTreeMap<Pollutant, u16>,
}

impl AqiResult {
    /// The empty result: no supported pollutant produced a sub-index.
    pub fn unknown() -> Self {
        Self {
            index: None,
            category: Category::Unknown,
            dominant_pollutant: None,
            sub_indices: BTreeMap::new(),
        }
    }
}

/// Compute the overall AQI for a profile.
///
/// Each supported pollutant present in the profile contributes a sub-index;
/// out-of-domain concentrations and unsupported parameters are excluded.
/// The dominant pollutant is the one with the highest sub-index. Pollutants
/// are visited in [`Pollutant::ALL`] priority order and a later pollutant
/// only takes over on a strictly greater sub-index, so ties resolve
/// PM2.5 > PM10 > NO2 regardless of map iteration order.
pub fn aggregate(profile: &PollutantProfile) -> AqiResult {
    let mut sub_indices = BTreeMap::new();
    let mut dominant: Option<(Pollutant, u16, Category)> = None;

    for pollutant in Pollutant::ALL {
        let Some(&value) = profile.get(pollutant.as_str()) else {
            continue;
        };
        let sub = sub_index(value, pollutant.table());
        let Some(index) = sub.index else {
            continue;
        };

        sub_indices.insert(pollutant, index);
        if dominant.map_or(true, |(_, best, _)| index > best) {
            dominant = Some((pollutant, index, sub.category));
        }
    }

    match dominant {
        Some((pollutant, index, category)) => AqiResult {
            index: Some(index),
            category,
            dominant_pollutant: Some(pollutant),
            sub_indices,
        },
        None => AqiResult::unknown(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(entries: &[(&str, f64)]) -> PollutantProfile {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    #[test]
    fn test_dominant_pollutant_and_bands() {
        let result = aggregate(&profile(&[
            ("pm25", 300.0),
            ("pm10", 180.0),
            ("no2", 42.0),
        ]));

        assert_eq!(result.dominant_pollutant, Some(Pollutant::Pm25));
        assert_eq!(result.index, Some(408));
        assert_eq!(result.category, Category::Severe);
        assert_eq!(result.sub_indices[&Pollutant::Pm25], 408);
        assert_eq!(result.sub_indices[&Pollutant::Pm10], 154);
        assert_eq!(result.sub_indices[&Pollutant::No2], 53);
    }

    #[test]
    fn test_empty_profile_is_unknown() {
        let result = aggregate(&PollutantProfile::new());
        assert_eq!(result, AqiResult::unknown());
    }

    #[test]
    fn test_unsupported_only_profile_is_unknown() {
        let result = aggregate(&profile(&[("wind_speed", 1.2), ("o3", 80.0)]));
        assert_eq!(result.index, None);
        assert_eq!(result.category, Category::Unknown);
        assert!(result.sub_indices.is_empty());
    }

    #[test]
    fn test_out_of_domain_pollutant_is_discarded() {
        // PM2.5 beyond the table drops out; PM10 carries the result alone.
        let result = aggregate(&profile(&[("pm25", 1500.0), ("pm10", 180.0)]));

        assert_eq!(result.dominant_pollutant, Some(Pollutant::Pm10));
        assert_eq!(result.index, Some(154));
        assert!(!result.sub_indices.contains_key(&Pollutant::Pm25));
    }

    #[test]
    fn test_tie_resolves_by_priority_order() {
        // PM2.5 at 30 and PM10 at 50 both map to sub-index 50.
        let result = aggregate(&profile(&[("pm25", 30.0), ("pm10", 50.0)]));

        assert_eq!(result.sub_indices[&Pollutant::Pm25], 50);
        assert_eq!(result.sub_indices[&Pollutant::Pm10], 50);
        assert_eq!(result.dominant_pollutant, Some(Pollutant::Pm25));
        assert_eq!(result.category, Category::Good);
    }
}
