//! Live Weather API Tests
//!
//! These tests call the real WeatherAPI `forecast.json` endpoint and need
//! `WEATHER_API_KEY` in the environment (or `.env`). They are ignored by
//! default; run them manually with:
//!
//!     cargo test --test live_api -- --ignored --nocapture

use floodrisk_service::config::ServiceConfig;
use floodrisk_service::ingest::weather::{self, WeatherApiClient, WeatherProvider};
use floodrisk_service::model::FloodRiskError;

fn live_client(api_key: &str) -> WeatherApiClient {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .unwrap();
    WeatherApiClient::new(client, weather::WEATHER_API_BASE, api_key)
}

#[test]
#[ignore] // Only run manually - makes real API calls
fn test_live_forecast_for_city() {
    let api_key = ServiceConfig::default()
        .weather_api_key()
        .expect("WEATHER_API_KEY must be set for live tests");

    let forecast = live_client(&api_key)
        .fetch_forecast("Rawalpindi", 3)
        .expect("live forecast should succeed");

    println!("\n🔍 WeatherAPI forecast for {}, {}", forecast.location.name, forecast.location.country);
    for day in &forecast.forecast {
        println!("  {}  {:>5.1} mm  {:>3.0}%  {}", day.date, day.total_rainfall, day.rain_chance, day.condition);
    }
    println!("  Alerts: {}", forecast.alerts.len());

    assert!(!forecast.forecast.is_empty(), "No forecast days returned");
    let dates: Vec<&str> = forecast.forecast.iter().map(|d| d.date.as_str()).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted, "Forecast days should be in ascending order");
}

#[test]
#[ignore] // Only run manually - makes real API calls
fn test_live_forecast_for_coordinates() {
    let api_key = ServiceConfig::default()
        .weather_api_key()
        .expect("WEATHER_API_KEY must be set for live tests");

    let forecast = live_client(&api_key)
        .fetch_forecast("33.6131,73.0729", 1)
        .expect("live forecast should succeed");

    assert!((forecast.location.lat - 33.6).abs() < 0.5);
    assert!((forecast.location.lon - 73.1).abs() < 0.5);
}

#[test]
#[ignore] // Only run manually - makes real API calls
fn test_live_bad_key_is_http_error() {
    let result = live_client("not-a-real-key").fetch_forecast("Rawalpindi", 1);
    match result {
        Err(FloodRiskError::HttpError { service, status, .. }) => {
            assert_eq!(service, "Weather");
            assert!((400..500).contains(&status), "status: {}", status);
        }
        other => panic!("expected a Weather HTTP error, got {:?}", other),
    }
}
