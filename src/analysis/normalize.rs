//! Analysis payload normalization.
//!
//! The backend relays free-form model output, so the payload may be a JSON
//! object, a JSON string, or markdown-fenced text. `normalize` turns any of
//! these into a canonical `AnalysisRecord` and never fails: unusable input
//! becomes the fixed fallback record with `error` set.

use crate::logging::{self, DataSource};
use crate::model::{AnalysisRecord, DailyRisk, WarningLevel};
use serde_json::Value;

/// `error` marker carried by the fallback record.
pub const FALLBACK_ERROR: &str = "Failed to parse AI response";

/// The record returned for any payload that cannot be used.
///
/// Only the summary wording depends on whether river data was sent along.
pub fn fallback_record(river_context_supplied: bool) -> AnalysisRecord {
    let summary = if river_context_supplied {
        "Unable to generate detailed analysis. Please check weather and river data manually."
    } else {
        "Unable to generate detailed analysis. Please check weather data manually."
    };

    AnalysisRecord {
        warning_level: WarningLevel::Moderate,
        risk_score: 50.0,
        confidence: Some(30.0),
        summary: summary.to_string(),
        key_factors: vec!["Analysis error occurred".to_string()],
        recommendations: vec![
            "Monitor weather updates regularly".to_string(),
            "Stay informed through official channels".to_string(),
        ],
        daily_risks: Vec::new(),
        peak_risk_days: Vec::new(),
        error: Some(FALLBACK_ERROR.to_string()),
    }
}

/// Normalizes a raw backend payload.
pub fn normalize(raw: &Value, river_context_supplied: bool) -> AnalysisRecord {
    match try_normalize(raw) {
        Ok(record) => record,
        Err(reason) => {
            logging::warn(
                DataSource::Backend,
                None,
                &format!("Error parsing AI response: {}", reason),
            );
            logging::debug(DataSource::Backend, None, &format!("Raw response: {}", raw));
            fallback_record(river_context_supplied)
        }
    }
}

/// Convenience for payloads that arrive as text.
pub fn normalize_text(raw: &str, river_context_supplied: bool) -> AnalysisRecord {
    normalize(&Value::String(raw.to_string()), river_context_supplied)
}

fn try_normalize(raw: &Value) -> Result<AnalysisRecord, String> {
    let parsed = match raw {
        Value::String(text) => serde_json::from_str::<Value>(strip_code_fence(text))
            .map_err(|e| format!("invalid JSON: {}", e))?,
        other => other.clone(),
    };
    let Value::Object(fields) = parsed else {
        return Err("payload is not an object".to_string());
    };

    let warning_level = fields
        .get("warningLevel")
        .filter(|v| is_present(v))
        .ok_or("missing warningLevel")?;
    let risk_score = fields
        .get("riskScore")
        .and_then(as_number)
        .ok_or("missing riskScore")?;
    let summary = fields
        .get("summary")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or("missing summary")?
        .to_string();

    Ok(AnalysisRecord {
        warning_level: coerce_warning_level(warning_level),
        risk_score,
        confidence: fields.get("confidence").and_then(as_number),
        summary,
        key_factors: string_list(fields.get("keyFactors")),
        recommendations: string_list(fields.get("recommendations")),
        daily_risks: daily_risk_list(fields.get("dailyRisks")),
        peak_risk_days: fields
            .get("peakRiskDays")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        error: fields.get("error").and_then(Value::as_str).map(String::from),
    })
}

// Null and blank strings count as absent.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// JSON numbers, or numeric strings such as `"72"`.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Present but not a canonical tier (wrong case, unknown word, not a string
/// at all): repaired to Moderate, not rejected.
fn coerce_warning_level(value: &Value) -> WarningLevel {
    value.as_str().and_then(WarningLevel::parse).unwrap_or_else(|| {
        logging::debug(
            DataSource::Backend,
            None,
            &format!("Coercing unknown warning level {} to Moderate", value),
        );
        WarningLevel::Moderate
    })
}

/// String items of a list field. Non-string items are dropped; a field
/// that is not a list reads as empty.
fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).map(String::from).collect())
        .unwrap_or_default()
}

/// Entries that are not objects with string fields are dropped.
fn daily_risk_list(value: Option<&Value>) -> Vec<DailyRisk> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    let risks: Vec<DailyRisk> = items
        .iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect();
    if risks.len() < items.len() {
        logging::debug(
            DataSource::Backend,
            None,
            &format!("Dropped {} malformed dailyRisks entries", items.len() - risks.len()),
        );
    }
    risks
}

/// Strips a markdown code fence (three backticks plus an optional language
/// tag, and the closing backticks) from around `text`. Unfenced text is
/// only trimmed.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(after_open) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let tag_len = after_open
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(after_open.len());
    let body = after_open[tag_len..].trim();
    body.strip_suffix("```").unwrap_or(body).trim()
}
