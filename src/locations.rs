//! Location resolution.
//!
//! Maps a free-form location (a city name, or a `"lat,lon"` pair from the
//! browser's geolocation) to a city identifier usable with
//! `barrages::river_for_city`. Coordinates are matched against an ordered
//! table of bounding boxes; adding a city is a data change here.

use crate::model::FloodRiskError;

/// City returned when coordinates fall outside every bounding box.
pub const DEFAULT_CITY: &str = "Rawalpindi";

/// Latitude/longitude box. Lower bounds inclusive, upper bounds exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat < self.max_lat && lon >= self.min_lon && lon < self.max_lon
    }
}

pub struct CityRule {
    pub city: &'static str,
    pub bounds: BoundingBox,
}

const fn rule(city: &'static str, min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> CityRule {
    CityRule {
        city,
        bounds: BoundingBox { min_lat, max_lat, min_lon, max_lon },
    }
}

/// Evaluated in order; the first containing box wins.
pub static CITY_RULES: &[CityRule] = &[
    rule("Islamabad", 33.65, 33.80, 72.90, 73.25),
    rule("Rawalpindi", 33.50, 33.65, 72.95, 73.15),
    rule("Lahore", 31.35, 31.70, 74.15, 74.55),
    rule("Karachi", 24.75, 25.10, 66.90, 67.35),
    rule("Peshawar", 33.90, 34.10, 71.40, 71.70),
    rule("Jhelum", 32.90, 33.00, 73.65, 73.80),
    rule("Sialkot", 32.45, 32.55, 74.45, 74.60),
    rule("Mianwali", 32.50, 32.65, 71.45, 71.65),
];

/// Resolves a location string to a city identifier.
///
/// Strings without a comma are already city names and come back unchanged.
/// `"lat,lon"` strings are matched against `CITY_RULES`; coordinates outside
/// every box resolve to `DEFAULT_CITY`. A non-numeric component is an
/// `InvalidLocation` error.
pub fn resolve(location: &str) -> Result<String, FloodRiskError> {
    let Some((lat_str, lon_str)) = location.split_once(',') else {
        return Ok(location.to_string());
    };

    let parse = |s: &str| -> Result<f64, FloodRiskError> {
        s.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| FloodRiskError::InvalidLocation(location.to_string()))
    };
    let lat = parse(lat_str)?;
    let lon = parse(lon_str)?;

    Ok(city_for_coordinates(lat, lon).to_string())
}

/// First city whose box contains the point, or `DEFAULT_CITY`.
pub fn city_for_coordinates(lat: f64, lon: f64) -> &'static str {
    CITY_RULES
        .iter()
        .find(|r| r.bounds.contains(lat, lon))
        .map(|r| r.city)
        .unwrap_or(DEFAULT_CITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_name_is_returned_unchanged() {
        assert_eq!(resolve("Lahore").unwrap(), "Lahore");
        assert_eq!(resolve("Dera Ghazi Khan").unwrap(), "Dera Ghazi Khan");
    }

    #[test]
    fn test_rawalpindi_coordinates_resolve_to_rawalpindi() {
        assert_eq!(resolve("33.6131,73.0729").unwrap(), "Rawalpindi");
    }

    #[test]
    fn test_coordinates_with_spaces_are_accepted() {
        assert_eq!(resolve("31.5204, 74.3587").unwrap(), "Lahore");
    }

    #[test]
    fn test_unmatched_coordinates_fall_back_to_default_city() {
        // Quetta is not in the rule table.
        assert_eq!(resolve("30.1798,66.9750").unwrap(), DEFAULT_CITY);
        assert_eq!(resolve("0,0").unwrap(), DEFAULT_CITY);
    }

    #[test]
    fn test_box_upper_bound_is_exclusive() {
        // 33.65 is the Islamabad lower bound and the Rawalpindi upper bound.
        assert_eq!(city_for_coordinates(33.65, 73.0), "Islamabad");
        assert_eq!(city_for_coordinates(33.6499, 73.0), "Rawalpindi");
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let first = CITY_RULES
            .iter()
            .find(|r| r.bounds.contains(33.70, 73.05))
            .map(|r| r.city);
        assert_eq!(first, Some("Islamabad"));
        assert_eq!(city_for_coordinates(33.70, 73.05), "Islamabad");
    }

    #[test]
    fn test_non_numeric_component_is_an_error() {
        let result = resolve("33.6,abc");
        assert_eq!(result, Err(FloodRiskError::InvalidLocation("33.6,abc".to_string())));
        assert!(resolve("north,73.0").is_err());
        assert!(resolve(",").is_err());
    }

    #[test]
    fn test_boxes_are_well_formed() {
        for r in CITY_RULES {
            assert!(r.bounds.min_lat < r.bounds.max_lat, "{}: bad latitude range", r.city);
            assert!(r.bounds.min_lon < r.bounds.max_lon, "{}: bad longitude range", r.city);
        }
    }
}
