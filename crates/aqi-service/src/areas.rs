//! Static area metadata: the closed set of named areas the pipeline can
//! resolve to a centroid.

use serde::Serialize;

/// Name and centroid for one named area.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AreaInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

const fn area(id: &'static str, name: &'static str, lat: f64, lon: f64) -> AreaInfo {
    AreaInfo { id, name, lat, lon }
}

/// The supported areas (Delhi districts).
pub const AREAS: [AreaInfo; 8] = [
    area("central_delhi", "Central Delhi", 28.6139, 77.2090),
    area("south_delhi", "South Delhi", 28.5244, 77.1855),
    area("south_east_delhi", "South East Delhi", 28.5441, 77.2732),
    area("north_delhi", "North Delhi", 28.7041, 77.1025),
    area("north_west_delhi", "North West Delhi", 28.7484, 77.0565),
    area("east_delhi", "East Delhi", 28.6508, 77.3152),
    area("west_delhi", "West Delhi", 28.6692, 77.0689),
    area("north_east_delhi", "North East Delhi", 28.6925, 77.2789),
];

/// Look up an area by identifier.
pub fn lookup_area(area_id: &str) -> Option<&'static AreaInfo> {
    AREAS.iter().find(|a| a.id == area_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_area_resolves() {
        let area = lookup_area("central_delhi").unwrap();
        assert_eq!(area.name, "Central Delhi");
        assert!((area.lat - 28.6139).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_area_is_absent() {
        assert!(lookup_area("gotham").is_none());
        assert!(lookup_area("").is_none());
    }
}
