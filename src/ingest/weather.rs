/// WeatherAPI forecast client
///
/// Retrieves a multi-day forecast, location metadata, and active government
/// alerts from WeatherAPI's `forecast.json` endpoint and flattens each
/// forecast day into a `ForecastDay`.
///
/// API Documentation: https://www.weatherapi.com/docs/

use crate::logging::{self, DataSource};
use crate::model::{FloodRiskError, ForecastDay, LocationInfo, WeatherAlert, WeatherForecast};
use reqwest::Url;
use serde::Deserialize;

pub const WEATHER_API_BASE: &str = "https://api.weatherapi.com/v1";

/// Anything that can produce a forecast for a location string.
pub trait WeatherProvider: Send + Sync {
    fn fetch_forecast(&self, location: &str, days: u32) -> Result<WeatherForecast, FloodRiskError>;
}

// ============================================================================
// WeatherAPI Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub location: ApiLocation,
    pub forecast: ApiForecast,
    #[serde(default)]
    pub alerts: Option<ApiAlerts>,
}

#[derive(Debug, Deserialize)]
pub struct ApiLocation {
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct ApiForecast {
    pub forecastday: Vec<ApiForecastDay>,
}

#[derive(Debug, Deserialize)]
pub struct ApiForecastDay {
    pub date: String,
    pub day: ApiDay,
}

/// Daily aggregate block. Metric fields only.
#[derive(Debug, Deserialize)]
pub struct ApiDay {
    pub maxtemp_c: f64,
    pub mintemp_c: f64,
    pub avgtemp_c: f64,
    pub totalprecip_mm: f64,
    pub maxwind_kph: f64,
    pub avghumidity: f64,
    #[serde(default)]
    pub daily_chance_of_rain: f64,
    pub condition: ApiCondition,
    #[serde(default)]
    pub uv: f64,
}

#[derive(Debug, Deserialize)]
pub struct ApiCondition {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiAlerts {
    #[serde(default)]
    pub alert: Vec<WeatherAlert>,
}

// ============================================================================
// API Client
// ============================================================================

pub struct WeatherApiClient {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl WeatherApiClient {
    pub fn new(client: reqwest::blocking::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

impl WeatherProvider for WeatherApiClient {
    fn fetch_forecast(&self, location: &str, days: u32) -> Result<WeatherForecast, FloodRiskError> {
        let url = build_forecast_url(&self.base_url, &self.api_key, location, days)?;

        logging::info(DataSource::Weather, Some(location), "Fetching weather data...");
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()?;

        if !response.status().is_success() {
            return Err(FloodRiskError::HttpError {
                service: "Weather",
                status: response.status().as_u16(),
                body: String::new(),
            });
        }

        let body = response.text()?;
        let forecast = parse_forecast_response(&body)?;
        logging::debug(
            DataSource::Weather,
            Some(location),
            &format!(
                "Received {} forecast days ({:.1} mm total rain), {} alerts",
                forecast.forecast.len(),
                total_rainfall_mm(&forecast.forecast),
                forecast.alerts.len()
            ),
        );
        Ok(forecast)
    }
}

/// Builds the `forecast.json` URL. The location is query-encoded, so
/// `"33.6131,73.0729"` and `"Dera Ghazi Khan"` are both safe.
pub fn build_forecast_url(
    base_url: &str,
    api_key: &str,
    location: &str,
    days: u32,
) -> Result<Url, FloodRiskError> {
    let days = days.to_string();
    Url::parse_with_params(
        &format!("{}/forecast.json", base_url.trim_end_matches('/')),
        &[
            ("key", api_key),
            ("q", location),
            ("days", days.as_str()),
            ("aqi", "no"),
            ("alerts", "yes"),
        ],
    )
    .map_err(|e| FloodRiskError::Config(format!("invalid weather base URL {}: {}", base_url, e)))
}

/// Parses a `forecast.json` body. Days are sorted by date ascending.
pub fn parse_forecast_response(body: &str) -> Result<WeatherForecast, FloodRiskError> {
    let api: ForecastResponse = serde_json::from_str(body)?;

    let mut forecast: Vec<ForecastDay> = api
        .forecast
        .forecastday
        .into_iter()
        .map(|d| ForecastDay {
            date: d.date,
            max_temp: d.day.maxtemp_c,
            min_temp: d.day.mintemp_c,
            avg_temp: d.day.avgtemp_c,
            total_rainfall: d.day.totalprecip_mm,
            max_wind: d.day.maxwind_kph,
            avg_humidity: d.day.avghumidity,
            rain_chance: d.day.daily_chance_of_rain,
            condition: d.day.condition.text,
            uv_index: d.day.uv,
        })
        .collect();
    // ISO dates sort lexically
    forecast.sort_by(|a, b| a.date.cmp(&b.date));

    Ok(WeatherForecast {
        location: LocationInfo {
            name: api.location.name,
            region: api.location.region,
            country: api.location.country,
            lat: api.location.lat,
            lon: api.location.lon,
        },
        forecast,
        alerts: api.alerts.map(|a| a.alert).unwrap_or_default(),
    })
}

// ============================================================================
// Rainfall Helper
// ============================================================================

/// Total forecast rainfall across all days, in mm.
pub fn total_rainfall_mm(forecast: &[ForecastDay]) -> f64 {
    forecast.iter().map(|d| d.total_rainfall).sum()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "location": {
            "name": "Rawalpindi", "region": "Punjab", "country": "Pakistan",
            "lat": 33.6, "lon": 73.07, "tz_id": "Asia/Karachi"
        },
        "current": {"temp_c": 31.0},
        "forecast": {"forecastday": [
            {"date": "2024-08-02", "day": {
                "maxtemp_c": 33.1, "mintemp_c": 26.0, "avgtemp_c": 29.2,
                "totalprecip_mm": 41.7, "maxwind_kph": 22.3, "avghumidity": 84,
                "daily_chance_of_rain": 92, "condition": {"text": "Heavy rain", "code": 1195},
                "uv": 4.0}},
            {"date": "2024-08-01", "day": {
                "maxtemp_c": 35.0, "mintemp_c": 27.4, "avgtemp_c": 30.5,
                "totalprecip_mm": 3.2, "maxwind_kph": 15.1, "avghumidity": 70,
                "daily_chance_of_rain": 60, "condition": {"text": "Patchy rain nearby"},
                "uv": 7.0}}
        ]},
        "alerts": {"alert": [
            {"headline": "PMD flood advisory", "severity": "Moderate", "event": "Flood",
             "areas": "Rawalpindi; Islamabad", "desc": "Urban flooding likely"}
        ]}
    }"#;

    #[test]
    fn test_parse_forecast_maps_daily_fields() {
        let parsed = parse_forecast_response(SAMPLE).expect("sample should parse");
        assert_eq!(parsed.location.name, "Rawalpindi");
        assert_eq!(parsed.forecast.len(), 2);

        let wet = &parsed.forecast[1];
        assert_eq!(wet.date, "2024-08-02");
        assert_eq!(wet.total_rainfall, 41.7);
        assert_eq!(wet.avg_humidity, 84.0);
        assert_eq!(wet.rain_chance, 92.0);
        assert_eq!(wet.condition, "Heavy rain");
        assert_eq!(wet.uv_index, 4.0);
    }

    #[test]
    fn test_parse_forecast_orders_days_ascending() {
        let parsed = parse_forecast_response(SAMPLE).unwrap();
        let dates: Vec<&str> = parsed.forecast.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-08-01", "2024-08-02"]);
    }

    #[test]
    fn test_parse_forecast_carries_alerts() {
        let parsed = parse_forecast_response(SAMPLE).unwrap();
        assert_eq!(parsed.alerts.len(), 1);
        assert_eq!(parsed.alerts[0].event, "Flood");
        assert_eq!(parsed.alerts[0].expires, "");
    }

    #[test]
    fn test_missing_alerts_block_is_empty_list() {
        let body = r#"{
            "location": {"name": "Lahore", "region": "Punjab", "country": "Pakistan", "lat": 31.5, "lon": 74.3},
            "forecast": {"forecastday": []}
        }"#;
        let parsed = parse_forecast_response(body).unwrap();
        assert!(parsed.alerts.is_empty());
        assert!(parsed.forecast.is_empty());
    }

    #[test]
    fn test_malformed_body_is_parse_error() {
        let result = parse_forecast_response("{\"error\": {\"code\": 1006}}");
        assert!(matches!(result, Err(FloodRiskError::ParseError(_))));
    }

    #[test]
    fn test_forecast_url_encodes_location() {
        let url = build_forecast_url("https://api.weatherapi.com/v1/", "k3y", "Dera Ghazi Khan", 7).unwrap();
        let s = url.as_str();
        assert!(s.starts_with("https://api.weatherapi.com/v1/forecast.json?"), "url: {}", s);
        assert!(s.contains("q=Dera+Ghazi+Khan"), "url: {}", s);
        assert!(s.contains("days=7"));
        assert!(s.contains("alerts=yes"));
        assert!(s.contains("aqi=no"));
    }

    #[test]
    fn test_total_rainfall_sums_all_days() {
        let parsed = parse_forecast_response(SAMPLE).unwrap();
        assert!((total_rainfall_mm(&parsed.forecast) - 44.9).abs() < 1e-9);
        assert_eq!(total_rainfall_mm(&[]), 0.0);
    }
}
