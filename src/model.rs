/// Core data types for the flood risk service.
///
/// This module defines the shared domain model imported by all other modules:
/// forecast and location records from the weather provider, river gauge
/// readings and assessments, and the canonical analysis record handed to the
/// UI layer. It contains no logic beyond small conversions and no I/O.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// Weather types
// ---------------------------------------------------------------------------

/// One calendar day of forecast, flattened from the provider's `forecastday`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub date: String, // YYYY-MM-DD
    pub max_temp: f64,
    pub min_temp: f64,
    pub avg_temp: f64,
    pub total_rainfall: f64, // mm
    pub max_wind: f64,       // kph
    pub avg_humidity: f64,
    pub rain_chance: f64, // percent
    pub condition: String,
    pub uv_index: f64,
}

/// Location metadata the weather provider attaches to a forecast batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub name: String,
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

/// A government weather alert passed through from the provider untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherAlert {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub areas: String,
    #[serde(default)]
    pub effective: String,
    #[serde(default)]
    pub expires: String,
    #[serde(default)]
    pub desc: String,
}

/// Result of a single weather fetch: days are ordered by date ascending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherForecast {
    pub location: LocationInfo,
    pub forecast: Vec<ForecastDay>,
    pub alerts: Vec<WeatherAlert>,
}

// ---------------------------------------------------------------------------
// River reference and reading types
// ---------------------------------------------------------------------------

/// Which river and barrage govern flood risk for a city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiverMapping {
    pub river: &'static str,
    pub barrage: &'static str,
    pub region: &'static str,
}

/// Danger levels for a barrage gauge, in the barrage's native unit.
///
/// Levels in ascending order:
///   low < moderate < high < critical
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DangerThresholds {
    pub low: f64,
    pub moderate: f64,
    pub high: f64,
    pub critical: f64,
}

/// A flow figure that may be missing from a station record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    Available(f64),
    Unavailable,
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measurement::Available(v) => write!(f, "{}", v),
            Measurement::Unavailable => write!(f, "N/A"),
        }
    }
}

// Serialized as a bare number, or "N/A" so the UI can print it directly.
impl Serialize for Measurement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Measurement::Available(v) => serializer.serialize_f64(*v),
            Measurement::Unavailable => serializer.serialize_str("N/A"),
        }
    }
}

/// The most recent gauge reading for one barrage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiverLevelReading {
    pub date: String,
    pub level: f64,
    pub inflow: Measurement,
    pub outflow: Measurement,
    pub barrage: String,
}

// ---------------------------------------------------------------------------
// Risk tiers
// ---------------------------------------------------------------------------

/// River gauge risk tier. `Unknown` means the barrage has no thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
    Unknown,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
            RiskLevel::Unknown => "Unknown",
        };
        write!(f, "{}", s)
    }
}

/// The four canonical warning tiers, in ascending order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WarningLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl WarningLevel {
    pub const ALL: [WarningLevel; 4] = [
        WarningLevel::Low,
        WarningLevel::Moderate,
        WarningLevel::High,
        WarningLevel::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WarningLevel::Low => "Low",
            WarningLevel::Moderate => "Moderate",
            WarningLevel::High => "High",
            WarningLevel::Critical => "Critical",
        }
    }

    /// Exact, case-sensitive match against the canonical tier names.
    pub fn parse(s: &str) -> Option<WarningLevel> {
        WarningLevel::ALL.into_iter().find(|level| level.as_str() == s)
    }
}

impl fmt::Display for WarningLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of comparing a barrage reading against its danger thresholds.
///
/// Recomputed on every request; never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiverRiskAssessment {
    pub risk_level: RiskLevel,
    pub score: f64,
    pub reason: String,
    pub barrage: String,
    pub level: f64,
}

// ---------------------------------------------------------------------------
// Analysis record
// ---------------------------------------------------------------------------

/// Missing fields read as empty strings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyRisk {
    pub date: String,
    pub risk: String,
    pub reason: String,
}

/// Canonical, UI-ready risk record.
///
/// Produced by `analysis::normalize` and then mutated in place only by
/// `analysis::blend`. `warning_level` is always one of the four canonical
/// tiers; scores are passed through without range checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub warning_level: WarningLevel,
    pub risk_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub summary: String,
    #[serde(default)]
    pub key_factors: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub daily_risks: Vec<DailyRisk>,
    #[serde(default)]
    /// Passed through as sent: usually dates, sometimes `{date, risk}` objects.
    pub peak_risk_days: Vec<serde_json::Value>,
    /// Set only on the fallback record produced for an unusable payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Request outcome
// ---------------------------------------------------------------------------

/// Everything the UI layer needs to render one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub success: bool,
    pub location: LocationInfo,
    pub forecast: Vec<ForecastDay>,
    pub alerts: Vec<WeatherAlert>,
    pub analysis: AnalysisRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub river_assessment: Option<RiverRiskAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub river_mapping: Option<RiverMapping>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub river_reading: Option<RiverLevelReading>,
    pub timestamp: String,
}

/// Uniform request-level failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisFailure {
    pub success: bool,
    pub error: String,
    pub timestamp: String,
}

/// What `pipeline::FloodRiskPipeline::analyze` returns; never an `Err`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Success(Box<AnalysisReport>),
    Failure(AnalysisFailure),
}

impl AnalysisOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisOutcome::Success(_))
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise while fetching or processing data for one request.
#[derive(Debug, PartialEq)]
pub enum FloodRiskError {
    /// Non-2xx HTTP response from the weather provider or analysis backend.
    HttpError {
        service: &'static str,
        status: u16,
        body: String,
    },
    /// The request never produced a response (DNS, TLS, connection reset).
    Transport(String),
    /// A response body could not be deserialized.
    ParseError(String),
    /// A "lat,lon" location string with a non-numeric component.
    InvalidLocation(String),
    /// Missing or malformed configuration.
    Config(String),
}

impl fmt::Display for FloodRiskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FloodRiskError::HttpError { service, status, body } if body.is_empty() => {
                write!(f, "{} API error: {}", service, status)
            }
            FloodRiskError::HttpError { service, status, body } => {
                write!(f, "{} API error: {} - {}", service, status, body)
            }
            FloodRiskError::Transport(msg) => write!(f, "Transport error: {}", msg),
            FloodRiskError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            FloodRiskError::InvalidLocation(loc) => write!(f, "Invalid location: {}", loc),
            FloodRiskError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for FloodRiskError {}

impl From<reqwest::Error> for FloodRiskError {
    fn from(e: reqwest::Error) -> Self {
        FloodRiskError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for FloodRiskError {
    fn from(e: serde_json::Error) -> Self {
        FloodRiskError::ParseError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_level_parse_is_exact() {
        assert_eq!(WarningLevel::parse("High"), Some(WarningLevel::High));
        assert_eq!(WarningLevel::parse("high"), None);
        assert_eq!(WarningLevel::parse("Severe"), None);
    }

    #[test]
    fn test_warning_levels_are_ordered_by_severity() {
        assert!(WarningLevel::Low < WarningLevel::Moderate);
        assert!(WarningLevel::Moderate < WarningLevel::High);
        assert!(WarningLevel::High < WarningLevel::Critical);
    }

    #[test]
    fn test_unavailable_measurement_serializes_as_marker() {
        let json = serde_json::to_string(&Measurement::Unavailable).unwrap();
        assert_eq!(json, "\"N/A\"");
        let json = serde_json::to_string(&Measurement::Available(41200.0)).unwrap();
        assert_eq!(json, "41200.0");
    }

    #[test]
    fn test_http_error_display_includes_body_when_present() {
        let err = FloodRiskError::HttpError {
            service: "Backend",
            status: 502,
            body: "upstream timeout".to_string(),
        };
        assert_eq!(err.to_string(), "Backend API error: 502 - upstream timeout");

        let err = FloodRiskError::HttpError {
            service: "Weather",
            status: 401,
            body: String::new(),
        };
        assert_eq!(err.to_string(), "Weather API error: 401");
    }
}
