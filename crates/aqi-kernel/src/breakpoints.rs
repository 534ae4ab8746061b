//! Breakpoint tables and the piecewise-linear index calculator.
//!
//! Each supported pollutant has a fixed table of concentration segments
//! mapping onto the 0-500 index scale. The calculator finds the segment
//! containing a concentration and linearly interpolates within it, per the
//! standard formula:
//!
//! `index = index_low + (index_high - index_low) / (conc_high - conc_low) * (value - conc_low)`

use serde::{Deserialize, Serialize};

/// A pollutant the index calculation supports.
///
/// Declaration order is the priority order used to break ties when two
/// pollutants share the maximum sub-index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    Pm25,
    Pm10,
    No2,
}

impl Pollutant {
    /// All supported pollutants, in priority order.
    pub const ALL: [Pollutant; 3] = [Pollutant::Pm25, Pollutant::Pm10, Pollutant::No2];

    /// Canonical parameter name as used in a [`crate::profile::PollutantProfile`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm25",
            Pollutant::Pm10 => "pm10",
            Pollutant::No2 => "no2",
        }
    }

    /// Map a raw provider parameter name onto a supported pollutant.
    ///
    /// Providers spell PM2.5 several ways; anything unrecognized is simply
    /// not a supported pollutant (it may still carry through a profile for
    /// the reasoning and risk stages).
    pub fn from_parameter(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "pm25" | "pm2.5" | "pm2_5" => Some(Pollutant::Pm25),
            "pm10" => Some(Pollutant::Pm10),
            "no2" => Some(Pollutant::No2),
            _ => None,
        }
    }

    /// The breakpoint table for this pollutant.
    pub fn table(&self) -> &'static [Breakpoint; 6] {
        match self {
            Pollutant::Pm25 => &PM25_BREAKPOINTS,
            Pollutant::Pm10 => &PM10_BREAKPOINTS,
            Pollutant::No2 => &NO2_BREAKPOINTS,
        }
    }
}

impl std::fmt::Display for Pollutant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative air quality category attached to an index band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Good,
    Satisfactory,
    Moderate,
    Poor,
    #[serde(rename = "Very Poor")]
    VeryPoor,
    Severe,
    Unknown,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Good => "Good",
            Category::Satisfactory => "Satisfactory",
            Category::Moderate => "Moderate",
            Category::Poor => "Poor",
            Category::VeryPoor => "Very Poor",
            Category::Severe => "Severe",
            Category::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One segment of a pollutant's piecewise-linear index curve.
#[derive(Debug, Clone, Copy)]
pub struct Breakpoint {
    pub conc_low: f64,
    pub conc_high: f64,
    pub index_low: u16,
    pub index_high: u16,
    pub category: Category,
}

const fn seg(
    conc_low: f64,
    conc_high: f64,
    index_low: u16,
    index_high: u16,
    category: Category,
) -> Breakpoint {
    Breakpoint {
        conc_low,
        conc_high,
        index_low,
        index_high,
        category,
    }
}

/// PM2.5 breakpoints, concentrations in ug/m3.
///
/// Segments are contiguous; a concentration sitting exactly on a shared
/// boundary belongs to the lower segment (first match wins).
pub const PM25_BREAKPOINTS: [Breakpoint; 6] = [
    seg(0.0, 30.0, 0, 50, Category::Good),
    seg(30.0, 60.0, 51, 100, Category::Satisfactory),
    seg(60.0, 90.0, 101, 200, Category::Moderate),
    seg(90.0, 120.0, 201, 300, Category::Poor),
    seg(120.0, 250.0, 301, 400, Category::VeryPoor),
    seg(250.0, 1000.0, 401, 500, Category::Severe),
];

/// PM10 breakpoints, concentrations in ug/m3.
pub const PM10_BREAKPOINTS: [Breakpoint; 6] = [
    seg(0.0, 50.0, 0, 50, Category::Good),
    seg(50.0, 100.0, 51, 100, Category::Satisfactory),
    seg(100.0, 250.0, 101, 200, Category::Moderate),
    seg(250.0, 350.0, 201, 300, Category::Poor),
    seg(350.0, 430.0, 301, 400, Category::VeryPoor),
    seg(430.0, 1000.0, 401, 500, Category::Severe),
];

/// NO2 breakpoints, concentrations in ug/m3.
pub const NO2_BREAKPOINTS: [Breakpoint; 6] = [
    seg(0.0, 40.0, 0, 50, Category::Good),
    seg(40.0, 80.0, 51, 100, Category::Satisfactory),
    seg(80.0, 180.0, 101, 200, Category::Moderate),
    seg(180.0, 280.0, 201, 300, Category::Poor),
    seg(280.0, 400.0, 301, 400, Category::VeryPoor),
    seg(400.0, 1000.0, 401, 500, Category::Severe),
];

/// Sub-index for a single pollutant.
///
/// `index` is `None` when the concentration falls outside the table's
/// covered domain; the category is then [`Category::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubIndex {
    pub index: Option<u16>,
    pub category: Category,
}

impl SubIndex {
    pub const UNKNOWN: SubIndex = SubIndex {
        index: None,
        category: Category::Unknown,
    };
}

/// Compute the sub-index for one concentration against one breakpoint table.
///
/// Segments are checked in ascending order with inclusive bounds; the first
/// matching segment wins, so a value on a shared boundary takes the lower
/// segment's band. Interpolated values round half away from zero
/// (`f64::round`). Concentrations outside the covered domain yield
/// [`SubIndex::UNKNOWN`]; there is no extrapolation.
pub fn sub_index(value: f64, table: &[Breakpoint]) -> SubIndex {
    for bp in table {
        if value >= bp.conc_low && value <= bp.conc_high {
            let span = f64::from(bp.index_high - bp.index_low);
            let index = f64::from(bp.index_low)
                + span / (bp.conc_high - bp.conc_low) * (value - bp.conc_low);
            return SubIndex {
                index: Some(index.round() as u16),
                category: bp.category,
            };
        }
    }

    SubIndex::UNKNOWN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pm25_band_edges() {
        assert_eq!(sub_index(0.0, &PM25_BREAKPOINTS).index, Some(0));
        assert_eq!(sub_index(60.0, &PM25_BREAKPOINTS).index, Some(100));
        assert_eq!(sub_index(1000.0, &PM25_BREAKPOINTS).index, Some(500));
    }

    #[test]
    fn test_boundary_belongs_to_lower_segment() {
        // 30 ug/m3 is the upper bound of Good, not the lower bound of
        // Satisfactory.
        let at_boundary = sub_index(30.0, &PM25_BREAKPOINTS);
        assert_eq!(at_boundary.index, Some(50));
        assert_eq!(at_boundary.category, Category::Good);

        let just_above = sub_index(30.001, &PM25_BREAKPOINTS);
        assert_eq!(just_above.category, Category::Satisfactory);
        assert_eq!(just_above.index, Some(51));
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        // PM10's first segment has slope 1, so 12.5 interpolates to exactly
        // 12.5 and must round up to 13.
        assert_eq!(sub_index(12.5, &PM10_BREAKPOINTS).index, Some(13));
    }

    #[test]
    fn test_interpolation_within_severe_segment() {
        // 300 ug/m3 PM2.5: 401 + 99/750 * 50 = 407.6 -> 408
        let sub = sub_index(300.0, &PM25_BREAKPOINTS);
        assert_eq!(sub.index, Some(408));
        assert_eq!(sub.category, Category::Severe);
    }

    #[test]
    fn test_out_of_domain_is_unknown() {
        assert_eq!(sub_index(-0.1, &PM25_BREAKPOINTS), SubIndex::UNKNOWN);
        assert_eq!(sub_index(1000.5, &PM25_BREAKPOINTS), SubIndex::UNKNOWN);
        assert_eq!(sub_index(2000.0, &NO2_BREAKPOINTS), SubIndex::UNKNOWN);
    }

    #[test]
    fn test_non_decreasing_within_segments() {
        for table in [&PM25_BREAKPOINTS, &PM10_BREAKPOINTS, &NO2_BREAKPOINTS] {
            let mut previous = 0u16;
            let mut v = 0.0;
            while v <= 1000.0 {
                let index = sub_index(v, table).index.expect("in-domain value");
                assert!(index >= previous, "index decreased at {v}");
                previous = index;
                v += 0.25;
            }
        }
    }

    #[test]
    fn test_parameter_name_mapping() {
        assert_eq!(Pollutant::from_parameter("pm25"), Some(Pollutant::Pm25));
        assert_eq!(Pollutant::from_parameter("PM2.5"), Some(Pollutant::Pm25));
        assert_eq!(Pollutant::from_parameter("pm10"), Some(Pollutant::Pm10));
        assert_eq!(Pollutant::from_parameter("no2"), Some(Pollutant::No2));
        assert_eq!(Pollutant::from_parameter("o3"), None);
        assert_eq!(Pollutant::from_parameter("wind_speed"), None);
    }

    #[test]
    fn test_category_serializes_to_display_string() {
        let json = serde_json::to_string(&Category::VeryPoor).unwrap();
        assert_eq!(json, "\"Very Poor\"");
    }
}
