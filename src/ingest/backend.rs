/// Remote flood-risk analysis client
///
/// Posts the weekly forecast (plus, when available, a river context block)
/// to the analysis backend and returns its payload untouched. The backend
/// answers either with a structured object or with model text that may be
/// wrapped in a markdown code fence; `analysis::normalize` deals with both.

use crate::logging::{self, DataSource};
use crate::model::{
    FloodRiskError, ForecastDay, LocationInfo, Measurement, RiskLevel, RiverLevelReading, RiverMapping,
    RiverRiskAssessment, WeatherAlert, WeatherForecast,
};
use serde::Serialize;
use serde_json::Value;

/// Anything that can turn a forecast payload into a raw risk analysis.
pub trait AnalysisService: Send + Sync {
    fn analyze(&self, request: &AnalysisRequest<'_>) -> Result<Value, FloodRiskError>;
}

// ============================================================================
// Request payload
// ============================================================================

/// Body of the analysis request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest<'a> {
    pub location: &'a LocationInfo,
    pub forecast: &'a [ForecastDay],
    pub alerts: &'a [WeatherAlert],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub river_context: Option<RiverContext>,
}

impl<'a> AnalysisRequest<'a> {
    pub fn new(weather: &'a WeatherForecast, river_context: Option<RiverContext>) -> Self {
        Self {
            location: &weather.location,
            forecast: &weather.forecast,
            alerts: &weather.alerts,
            river_context,
        }
    }
}

/// Current river conditions for the location's governing barrage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiverContext {
    pub river: String,
    pub barrage: String,
    pub region: String,
    pub date: String,
    pub current_level: f64,
    pub inflow: Measurement,
    pub outflow: Measurement,
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub reason: String,
}

impl RiverContext {
    pub fn new(mapping: &RiverMapping, reading: &RiverLevelReading, assessment: &RiverRiskAssessment) -> Self {
        Self {
            river: mapping.river.to_string(),
            barrage: mapping.barrage.to_string(),
            region: mapping.region.to_string(),
            date: reading.date.clone(),
            current_level: reading.level,
            inflow: reading.inflow,
            outflow: reading.outflow,
            risk_level: assessment.risk_level,
            risk_score: assessment.score,
            reason: assessment.reason.clone(),
        }
    }
}

// ============================================================================
// HTTP client
// ============================================================================

pub struct BackendAnalysisClient {
    client: reqwest::blocking::Client,
    analyze_url: String,
}

impl BackendAnalysisClient {
    pub fn new(client: reqwest::blocking::Client, analyze_url: &str) -> Self {
        Self {
            client,
            analyze_url: analyze_url.to_string(),
        }
    }
}

impl AnalysisService for BackendAnalysisClient {
    fn analyze(&self, request: &AnalysisRequest<'_>) -> Result<Value, FloodRiskError> {
        logging::info(
            DataSource::Backend,
            Some(&request.location.name),
            "Sending data to backend for AI analysis...",
        );

        let response = self.client.post(&self.analyze_url).json(request).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FloodRiskError::HttpError {
                service: "Backend",
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text()?;
        Ok(parse_backend_body(&text))
    }
}

/// Backend bodies are normally JSON (an object, or a JSON string holding
/// model text). Anything else is handed on as raw text for the normalizer.
pub fn parse_backend_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

// ============================================================================
// Tests
// ============================================================================
