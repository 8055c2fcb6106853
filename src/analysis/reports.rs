//! Weekly provincial report decoding.
//!
//! The backend stores one generated report per province per week. List
//! fields are persisted as JSON-encoded strings, so each is decoded here,
//! with absent or malformed values read as empty lists.

use crate::logging::{self, DataSource};
use crate::model::{DailyRisk, WarningLevel};
use crate::presentation::{self, WarningStyle};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A report as the backend returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredWeeklyReport {
    pub province: String,
    #[serde(default)]
    pub city: String,
    pub warning_level: String,
    pub risk_score: f64,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub key_factors: Option<String>,
    #[serde(default)]
    pub recommendations: Option<String>,
    #[serde(default)]
    pub daily_risks: Option<String>,
    #[serde(default)]
    pub week_start_date: String,
    #[serde(default)]
    pub week_end_date: String,
}

/// A report with its list fields decoded and its tier canonicalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    pub province: String,
    pub city: String,
    pub warning_level: WarningLevel,
    pub risk_score: f64,
    pub confidence: Option<f64>,
    pub summary: String,
    pub key_factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub daily_risks: Vec<DailyRisk>,
    pub week_start_date: String,
    pub week_end_date: String,
}

/// Decodes a JSON-encoded list, returning an empty list on absent or
/// malformed input.
pub fn safe_parse_list<T: DeserializeOwned>(encoded: Option<&str>) -> Vec<T> {
    let Some(encoded) = encoded.filter(|s| !s.trim().is_empty()) else {
        return Vec::new();
    };
    serde_json::from_str(encoded).unwrap_or_else(|e| {
        logging::warn(DataSource::Backend, None, &format!("Error parsing JSON list: {}", e));
        Vec::new()
    })
}

impl StoredWeeklyReport {
    pub fn decode(self) -> WeeklyReport {
        WeeklyReport {
            warning_level: WarningLevel::parse(&self.warning_level).unwrap_or(WarningLevel::Moderate),
            risk_score: self.risk_score,
            confidence: self.confidence,
            summary: self
                .summary
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "No summary available".to_string()),
            key_factors: safe_parse_list(self.key_factors.as_deref()),
            recommendations: safe_parse_list(self.recommendations.as_deref()),
            daily_risks: safe_parse_list(self.daily_risks.as_deref()),
            province: self.province,
            city: self.city,
            week_start_date: self.week_start_date,
            week_end_date: self.week_end_date,
        }
    }
}

/// "Week of Aug 12 - Aug 18, 2024" from ISO week bounds; `None` if either
/// date does not parse.
pub fn format_week_range(start: &str, end: &str) -> Option<String> {
    let parse = |s: &str| chrono::NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), "%Y-%m-%d").ok();
    let (start, end) = (parse(start)?, parse(end)?);
    Some(format!(
        "Week of {} - {}, {}",
        start.format("%b %-d"),
        end.format("%b %-d"),
        start.format("%Y")
    ))
}

/// A report with the display tokens for its tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCard {
    #[serde(flatten)]
    pub report: WeeklyReport,
    pub style: WarningStyle,
    pub icon_class: String,
}

/// One batch of reports as the dashboard shows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportBatch {
    /// Taken from the first report; `None` for an empty batch.
    pub week_range: Option<String>,
    pub reports: Vec<ReportCard>,
}

pub fn report_batch(reports: Vec<WeeklyReport>) -> ReportBatch {
    let week_range = reports
        .first()
        .and_then(|r| format_week_range(&r.week_start_date, &r.week_end_date));
    let reports = reports
        .into_iter()
        .map(|report| {
            let level = report.warning_level.as_str();
            ReportCard {
                style: presentation::style_for(level),
                icon_class: presentation::warning_icon_class(level),
                report,
            }
        })
        .collect();
    ReportBatch { week_range, reports }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> StoredWeeklyReport {
        serde_json::from_str(
            r#"{
                "province": "Punjab",
                "city": "Lahore",
                "warningLevel": "High",
                "riskScore": 74,
                "confidence": 66,
                "summary": "Heavy rain across the province.",
                "keyFactors": "[\"Monsoon low\", \"Saturated soil\"]",
                "recommendations": "[\"Clear drains\"]",
                "dailyRisks": "[{\"date\": \"2024-08-12\", \"risk\": \"High\", \"reason\": \"90 mm\"}]",
                "weekStartDate": "2024-08-12T00:00:00.000Z",
                "weekEndDate": "2024-08-18T00:00:00.000Z"
            }"#,
        )
        .expect("stored report should deserialize")
    }

    #[test]
    fn test_decode_parses_encoded_lists() {
        let report = stored().decode();
        assert_eq!(report.warning_level, WarningLevel::High);
        assert_eq!(report.key_factors, vec!["Monsoon low", "Saturated soil"]);
        assert_eq!(report.recommendations, vec!["Clear drains"]);
        assert_eq!(report.daily_risks[0].reason, "90 mm");
    }

    #[test]
    fn test_malformed_or_absent_lists_are_empty() {
        let mut raw = stored();
        raw.key_factors = Some("[not json".to_string());
        raw.recommendations = None;
        raw.daily_risks = Some(String::new());
        let report = raw.decode();
        assert!(report.key_factors.is_empty());
        assert!(report.recommendations.is_empty());
        assert!(report.daily_risks.is_empty());
    }

    #[test]
    fn test_decode_canonicalizes_tier_and_summary() {
        let mut raw = stored();
        raw.warning_level = "Extreme".to_string();
        raw.summary = None;
        let report = raw.decode();
        assert_eq!(report.warning_level, WarningLevel::Moderate);
        assert_eq!(report.summary, "No summary available");
    }

    #[test]
    fn test_report_batch_carries_week_range_and_styles() {
        let batch = report_batch(vec![stored().decode()]);
        assert_eq!(batch.week_range.as_deref(), Some("Week of Aug 12 - Aug 18, 2024"));
        assert_eq!(batch.reports[0].style.color, "danger");
        assert_eq!(batch.reports[0].icon_class, "fas fa-exclamation-circle");

        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(json["reports"][0]["province"], serde_json::json!("Punjab"));
        assert_eq!(json["reports"][0]["iconClass"], serde_json::json!("fas fa-exclamation-circle"));

        assert_eq!(report_batch(Vec::new()).week_range, None);
    }

    #[test]
    fn test_week_range_formatting() {
        assert_eq!(
            format_week_range("2024-08-12T00:00:00.000Z", "2024-08-18"),
            Some("Week of Aug 12 - Aug 18, 2024".to_string())
        );
        assert_eq!(format_week_range("soon", "2024-08-18"), None);
    }
}
