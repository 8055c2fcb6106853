//! River-over-weather risk blending.
//!
//! A barrage reading above its low danger mark is a more direct flood signal
//! than a model's reading of the weather forecast. When such a reading is
//! present, the blended score is the larger of the two scores, and a blended
//! score in the moderate or high band sets the record's tier to that band
//! and rewrites its confidence and text around the river reading. The tier
//! always matches the template text it is written with.

use crate::barrages;
use crate::model::{AnalysisRecord, RiskLevel, RiverRiskAssessment, WarningLevel};

/// Blended score at or above which the record is forced to High.
pub const HIGH_BAND: f64 = 70.0;
/// Blended score at or above which the record is forced to Moderate.
pub const MODERATE_BAND: f64 = 50.0;

const HIGH_CONFIDENCE_BOOST: f64 = 20.0;
const HIGH_CONFIDENCE_CAP: f64 = 95.0;
const MODERATE_CONFIDENCE_BOOST: f64 = 15.0;
const MODERATE_CONFIDENCE_CAP: f64 = 90.0;

/// What blending did to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendOutcome {
    /// No river signal above Low, or the blended score stayed below 50.
    Unchanged,
    /// The record was rewritten at this tier.
    Overridden(WarningLevel),
}

/// Folds a river assessment into `ai` in place.
///
/// No-op when `river` is absent, `Low`, or `Unknown`.
pub fn blend(ai: &mut AnalysisRecord, river: Option<&RiverRiskAssessment>) -> BlendOutcome {
    let Some(river) = river else {
        return BlendOutcome::Unchanged;
    };
    if matches!(river.risk_level, RiskLevel::Low | RiskLevel::Unknown) {
        return BlendOutcome::Unchanged;
    }

    let blended = river.score.max(ai.risk_score);
    let confidence = ai.confidence.unwrap_or(0.0);

    if blended >= HIGH_BAND {
        ai.warning_level = WarningLevel::High;
        ai.risk_score = blended;
        ai.confidence = Some((confidence + HIGH_CONFIDENCE_BOOST).min(HIGH_CONFIDENCE_CAP));
        rewrite_high(ai, river);
        BlendOutcome::Overridden(ai.warning_level)
    } else if blended >= MODERATE_BAND {
        ai.warning_level = WarningLevel::Moderate;
        ai.risk_score = blended;
        ai.confidence = Some((confidence + MODERATE_CONFIDENCE_BOOST).min(MODERATE_CONFIDENCE_CAP));
        rewrite_moderate(ai, river);
        BlendOutcome::Overridden(ai.warning_level)
    } else {
        BlendOutcome::Unchanged
    }
}

/// By-value form of `blend` for pipeline chaining.
pub fn blended(mut ai: AnalysisRecord, river: Option<&RiverRiskAssessment>) -> AnalysisRecord {
    blend(&mut ai, river);
    ai
}

/// "Tarbela Dam (Indus)" for registered barrages, the raw id otherwise.
fn gauge_label(river: &RiverRiskAssessment) -> String {
    match barrages::find_barrage(&river.barrage) {
        Some(b) => format!("{} ({})", b.name, b.river),
        None => river.barrage.clone(),
    }
}

fn unit_of(river: &RiverRiskAssessment) -> &'static str {
    barrages::find_barrage(&river.barrage)
        .map(|b| b.unit)
        .unwrap_or("")
}

fn rewrite_high(ai: &mut AnalysisRecord, river: &RiverRiskAssessment) {
    let gauge = gauge_label(river);
    let unit = unit_of(river);

    ai.summary = format!(
        "FLOOD ALERT: {} is at {:.1} {}. {}. River conditions indicate a high risk of flooding \
         regardless of the weather outlook; prepare to act on official warnings.",
        gauge, river.level, unit, river.reason
    );
    ai.key_factors = vec![
        format!("{} level {:.1} {} ({} river risk)", gauge, river.level, unit, river.risk_level),
        river.reason.clone(),
        format!("Combined river and weather risk score: {:.0}", ai.risk_score),
    ];
    ai.recommendations = vec![
        "Move valuables and important documents to higher ground".to_string(),
        "Prepare an emergency kit and a family evacuation plan".to_string(),
        "Follow evacuation orders from district authorities without delay".to_string(),
        "Keep away from river banks, nullahs and low-lying areas".to_string(),
        "Check official flood bulletins every few hours".to_string(),
    ];
}

fn rewrite_moderate(ai: &mut AnalysisRecord, river: &RiverRiskAssessment) {
    let gauge = gauge_label(river);
    let unit = unit_of(river);

    ai.summary = format!(
        "River watch: {} is at {:.1} {}. {}. Elevated river levels combined with the weather \
         outlook indicate a moderate flood risk.",
        gauge, river.level, unit, river.reason
    );
    ai.key_factors = vec![
        format!("{} level {:.1} {} ({} river risk)", gauge, river.level, unit, river.risk_level),
        river.reason.clone(),
    ];
    ai.recommendations = vec![
        "Stay alert to rising river levels".to_string(),
        "Keep emergency supplies and medicines ready".to_string(),
        "Avoid unnecessary travel near the river".to_string(),
        "Follow official flood forecasts".to_string(),
    ];
}
