//! Barrage danger-level checking.
//!
//! Turns a current gauge level into a risk tier, a numeric score on the same
//! 0–100 scale the analysis backend uses, and a human-readable reason.

use crate::barrages;
use crate::model::{DangerThresholds, RiskLevel, RiverRiskAssessment};

pub const CRITICAL_SCORE: f64 = 90.0;
pub const HIGH_SCORE: f64 = 70.0;
pub const MODERATE_SCORE: f64 = 50.0;
pub const LOW_SCORE: f64 = 30.0;
/// Below the `low` threshold: normal conditions.
pub const NORMAL_SCORE: f64 = 20.0;

/// Assesses a barrage reading against the registry thresholds.
///
/// Unregistered barrages, or barrages without published thresholds, yield
/// `RiskLevel::Unknown` with score 0 rather than an error.
pub fn assess(barrage: &str, current_level: f64) -> RiverRiskAssessment {
    match barrages::thresholds_for(barrage) {
        Some(thresholds) => assess_against(barrage, current_level, &thresholds),
        None => RiverRiskAssessment {
            risk_level: RiskLevel::Unknown,
            score: 0.0,
            reason: "Barrage data not available".to_string(),
            barrage: barrage.to_string(),
            level: current_level,
        },
    }
}

/// Classifies `level` by descending comparison; a reading exactly at a
/// threshold takes the higher tier. Reason text uses the barrage's
/// registered unit.
pub fn assess_against(barrage: &str, level: f64, t: &DangerThresholds) -> RiverRiskAssessment {
    let unit = barrages::find_barrage(barrage).map(|b| b.unit).unwrap_or("");
    let v = |x: f64| with_unit(x, unit);

    let (risk_level, score, reason) = if level >= t.critical {
        (
            RiskLevel::Critical,
            CRITICAL_SCORE,
            format!("Critical: level {} has reached the critical danger mark of {}", v(level), v(t.critical)),
        )
    } else if level >= t.high {
        (
            RiskLevel::High,
            HIGH_SCORE,
            format!("High: level {} is above the high flood mark of {}", v(level), v(t.high)),
        )
    } else if level >= t.moderate {
        (
            RiskLevel::Moderate,
            MODERATE_SCORE,
            format!("Moderate: level {} is above the moderate flood mark of {}", v(level), v(t.moderate)),
        )
    } else if level >= t.low {
        (
            RiskLevel::Low,
            LOW_SCORE,
            format!("Low: level {} is above the low flood mark of {}", v(level), v(t.low)),
        )
    } else {
        (
            RiskLevel::Low,
            NORMAL_SCORE,
            format!("Low: level {} is below the low flood mark of {} (normal)", v(level), v(t.low)),
        )
    };

    RiverRiskAssessment {
        risk_level,
        score,
        reason,
        barrage: barrage.to_string(),
        level,
    }
}

fn with_unit(value: f64, unit: &str) -> String {
    if unit.is_empty() {
        format!("{:.1}", value)
    } else {
        format!("{:.1} {}", value, unit)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn tarbela() -> DangerThresholds {
        barrages::thresholds_for("TARBELA").expect("TARBELA has thresholds")
    }

    // --- Boundaries ---------------------------------------------------------

    #[test]
    fn test_reading_exactly_at_each_threshold_takes_that_tier() {
        let t = tarbela();
        let cases = [
            (t.critical, RiskLevel::Critical, CRITICAL_SCORE),
            (t.high, RiskLevel::High, HIGH_SCORE),
            (t.moderate, RiskLevel::Moderate, MODERATE_SCORE),
            (t.low, RiskLevel::Low, LOW_SCORE),
        ];
        for (level, tier, score) in cases {
            let a = assess("TARBELA", level);
            assert_eq!(a.risk_level, tier, "level {} should be {:?}", level, tier);
            assert_eq!(a.score, score, "level {} should score {}", level, score);
        }
    }

    #[test]
    fn test_reading_just_below_threshold_takes_lower_tier() {
        let t = tarbela();
        assert_eq!(assess("TARBELA", t.critical - 0.01).risk_level, RiskLevel::High);
        assert_eq!(assess("TARBELA", t.high - 0.01).risk_level, RiskLevel::Moderate);
        assert_eq!(assess("TARBELA", t.moderate - 0.01).risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_below_low_is_low_with_normal_score() {
        let t = tarbela();
        let below = assess("TARBELA", t.low - 1.0);
        let at = assess("TARBELA", t.low);
        assert_eq!(below.risk_level, RiskLevel::Low);
        assert_eq!(below.score, NORMAL_SCORE);
        assert_eq!(at.score, LOW_SCORE);
        assert!(below.reason.contains("normal"));
    }

    #[test]
    fn test_tarbela_1520_is_high_70() {
        let a = assess("TARBELA", 1520.0);
        assert_eq!(a.risk_level, RiskLevel::High);
        assert_eq!(a.score, 70.0);
        assert_eq!(a.level, 1520.0);
        assert_eq!(a.barrage, "TARBELA");
    }

    // --- Reason text --------------------------------------------------------

    #[test]
    fn test_reason_names_tier_level_and_threshold() {
        let a = assess("MANGLA", 1235.0);
        assert!(a.reason.contains("High"), "reason: {}", a.reason);
        assert!(a.reason.contains("1235.0"), "reason: {}", a.reason);
        assert!(a.reason.contains("1230.0"), "reason: {}", a.reason);
    }

    #[test]
    fn test_reason_uses_registered_unit() {
        let unit = barrages::find_barrage("MANGLA").map(|b| b.unit).unwrap();
        let a = assess("MANGLA", 1235.0);
        assert!(a.reason.contains(&format!("1235.0 {}", unit)), "reason: {}", a.reason);

        // No registry entry, no unit.
        let a = assess_against("KOTRI", 80.0, &tarbela());
        assert!(a.reason.contains("level 80.0 is below"), "reason: {}", a.reason);
        assert!(!a.reason.contains(" ft"), "reason: {}", a.reason);
    }

    // --- Missing reference data ---------------------------------------------

    #[test]
    fn test_unregistered_barrage_is_unknown() {
        let a = assess("KOTRI", 50.0);
        assert_eq!(a.risk_level, RiskLevel::Unknown);
        assert_eq!(a.score, 0.0);
        assert_eq!(a.reason, "Barrage data not available");
    }

    #[test]
    fn test_barrage_without_thresholds_is_unknown() {
        assert_eq!(assess("MARALA", 800.0).risk_level, RiskLevel::Unknown);
    }
}
