/// Barrage registry and city-to-river reference tables.
///
/// Defines the canonical list of barrages whose gauges feed the river risk
/// signal, along with their danger thresholds and the column names under
/// which the river dataset publishes their readings. This is the single
/// source of truth for barrage identifiers. All other modules should look
/// barrages up from here rather than hardcoding them.

use crate::model::{DangerThresholds, RiverMapping};

// ---------------------------------------------------------------------------
// Barrage metadata
// ---------------------------------------------------------------------------

/// Column names under which the river dataset reports one barrage.
///
/// Resolved here once per barrage so the lookup never synthesizes keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetFields {
    pub level: &'static str,
    pub inflow: &'static str,
    pub outflow: &'static str,
}

/// Metadata for a single barrage gauge.
pub struct Barrage {
    /// Upper-case identifier used in the dataset and the city table.
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    pub river: &'static str,
    /// Unit of the level readings and thresholds.
    pub unit: &'static str,
    /// Danger thresholds, if published for this barrage.
    pub thresholds: Option<DangerThresholds>,
    pub fields: DatasetFields,
}

/// All barrages known to the service, upstream to downstream on each river.
///
/// Thresholds are reservoir/pond levels in feet above mean sea level.
pub static BARRAGE_REGISTRY: &[Barrage] = &[
    Barrage {
        id: "TARBELA",
        name: "Tarbela Dam",
        river: "Indus",
        unit: "ft",
        thresholds: Some(DangerThresholds {
            low: 1450.0,
            moderate: 1490.0,
            high: 1510.0,
            critical: 1540.0,
        }),
        fields: DatasetFields {
            level: "TARBELA_LEVEL",
            inflow: "TARBELA_MEAN_INFLOW",
            outflow: "TARBELA_MEAN_OUTFLOW",
        },
    },
    Barrage {
        id: "MANGLA",
        name: "Mangla Dam",
        river: "Jhelum",
        unit: "ft",
        thresholds: Some(DangerThresholds {
            low: 1180.0,
            moderate: 1210.0,
            high: 1230.0,
            critical: 1242.0,
        }),
        fields: DatasetFields {
            level: "MANGLA_LEVEL",
            inflow: "MANGLA_MEAN_INFLOW",
            outflow: "MANGLA_MEAN_OUTFLOW",
        },
    },
    Barrage {
        id: "CHASHMA",
        name: "Chashma Barrage",
        river: "Indus",
        unit: "ft",
        thresholds: Some(DangerThresholds {
            low: 636.0,
            moderate: 642.0,
            high: 645.0,
            critical: 649.0,
        }),
        fields: DatasetFields {
            level: "CHASHMA_LEVEL",
            inflow: "CHASHMA_MEAN_INFLOW",
            outflow: "CHASHMA_MEAN_OUTFLOW",
        },
    },
    Barrage {
        id: "MARALA",
        name: "Marala Headworks",
        river: "Chenab",
        unit: "ft",
        thresholds: None, // headworks gauge, no published danger levels
        fields: DatasetFields {
            level: "MARALA_LEVEL",
            inflow: "MARALA_MEAN_INFLOW",
            outflow: "MARALA_MEAN_OUTFLOW",
        },
    },
];

/// Cities whose flood risk is governed by a registered barrage.
///
/// Cities absent from this table get no river signal.
pub static CITY_RIVERS: &[(&str, RiverMapping)] = &[
    (
        "Rawalpindi",
        RiverMapping { river: "Indus", barrage: "TARBELA", region: "Punjab" },
    ),
    (
        "Islamabad",
        RiverMapping { river: "Indus", barrage: "TARBELA", region: "Islamabad Capital Territory" },
    ),
    (
        "Jhelum",
        RiverMapping { river: "Jhelum", barrage: "MANGLA", region: "Punjab" },
    ),
    (
        "Mianwali",
        RiverMapping { river: "Indus", barrage: "CHASHMA", region: "Punjab" },
    ),
    (
        "Sialkot",
        RiverMapping { river: "Chenab", barrage: "MARALA", region: "Punjab" },
    ),
];

/// Looks up a barrage by identifier. Returns `None` if not registered.
pub fn find_barrage(id: &str) -> Option<&'static Barrage> {
    BARRAGE_REGISTRY.iter().find(|b| b.id == id)
}

/// Danger thresholds for a barrage, if it is registered and has them.
pub fn thresholds_for(id: &str) -> Option<DangerThresholds> {
    find_barrage(id).and_then(|b| b.thresholds)
}

/// Dataset column names for a barrage.
pub fn dataset_fields(id: &str) -> Option<DatasetFields> {
    find_barrage(id).map(|b| b.fields)
}

/// River mapping for a city. City names compare case-insensitively.
pub fn river_for_city(city: &str) -> Option<RiverMapping> {
    let city = city.trim();
    CITY_RIVERS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(city))
        .map(|(_, mapping)| *mapping)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barrage_ids_are_upper_case() {
        // Dataset columns are upper case; a lower-case id would never match.
        for barrage in BARRAGE_REGISTRY {
            assert_eq!(barrage.id, barrage.id.to_uppercase(), "{} is not upper case", barrage.id);
        }
    }

    #[test]
    fn test_no_duplicate_barrage_ids() {
        let mut ids: Vec<&str> = BARRAGE_REGISTRY.iter().map(|b| b.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), BARRAGE_REGISTRY.len(), "duplicate barrage id in registry");
    }

    #[test]
    fn test_thresholds_are_ordered_ascending_where_defined() {
        for barrage in BARRAGE_REGISTRY {
            if let Some(t) = barrage.thresholds {
                assert!(
                    t.low < t.moderate && t.moderate < t.high && t.high < t.critical,
                    "{}: thresholds must satisfy low < moderate < high < critical, got {:?}",
                    barrage.id,
                    t
                );
            }
        }
    }

    #[test]
    fn test_dataset_fields_are_prefixed_with_barrage_id() {
        for barrage in BARRAGE_REGISTRY {
            assert!(barrage.fields.level.starts_with(barrage.id));
            assert!(barrage.fields.inflow.starts_with(barrage.id));
            assert!(barrage.fields.outflow.starts_with(barrage.id));
        }
    }

    #[test]
    fn test_every_city_maps_to_a_registered_barrage() {
        for (city, mapping) in CITY_RIVERS {
            let barrage = find_barrage(mapping.barrage)
                .unwrap_or_else(|| panic!("{} maps to unregistered barrage {}", city, mapping.barrage));
            assert_eq!(barrage.river, mapping.river, "{}: river mismatch", city);
        }
    }

    #[test]
    fn test_rawalpindi_maps_to_tarbela() {
        let mapping = river_for_city("Rawalpindi").expect("Rawalpindi should be mapped");
        assert_eq!(mapping.barrage, "TARBELA");
        assert_eq!(mapping.river, "Indus");
    }

    #[test]
    fn test_city_lookup_ignores_case_and_whitespace() {
        assert_eq!(river_for_city("  jhelum "), river_for_city("Jhelum"));
        assert!(river_for_city("jhelum").is_some());
    }

    #[test]
    fn test_unmapped_city_returns_none() {
        assert!(river_for_city("Lahore").is_none());
        assert!(river_for_city("").is_none());
    }

    #[test]
    fn test_marala_has_fields_but_no_thresholds() {
        assert!(thresholds_for("MARALA").is_none());
        assert!(dataset_fields("MARALA").is_some());
        assert!(thresholds_for("NOWHERE").is_none());
    }
}
