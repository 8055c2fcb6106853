//! End-to-end flood risk analysis for one location.
//!
//! location → resolve city → (weather fetch ∥ river dataset load) → latest
//! reading + river assessment → remote analysis → normalize → blend.
//!
//! The weather fetch and the river dataset load are independent and run
//! concurrently; the remote analysis waits for both, since its payload
//! carries the forecast and the river context. Any unrecovered error is
//! turned into `AnalysisOutcome::Failure` at the top; nothing is retried.

use crate::alert::{stalenesses, thresholds};
use crate::analysis::blend::{self, BlendOutcome};
use crate::analysis::normalize;
use crate::barrages;
use crate::config::ServiceConfig;
use crate::ingest::backend::{AnalysisRequest, AnalysisService, BackendAnalysisClient, RiverContext};
use crate::ingest::river::{self, HttpRiverDataset, RiverDatasetCache, RiverDatasetSource};
use crate::ingest::weather::{WeatherApiClient, WeatherProvider};
use crate::locations;
use crate::logging::{self, DataSource};
use crate::model::{
    AnalysisFailure, AnalysisOutcome, AnalysisReport, FloodRiskError, RiverLevelReading, RiverMapping,
    RiverRiskAssessment,
};
use chrono::{SecondsFormat, Utc};
use std::thread;

/// River inputs gathered for one request.
struct RiverSignal {
    mapping: RiverMapping,
    reading: RiverLevelReading,
    assessment: RiverRiskAssessment,
}

pub struct FloodRiskPipeline<W, A, R> {
    weather: W,
    analysis: A,
    river: RiverDatasetCache<R>,
    days: u32,
    max_reading_age_days: Option<u32>,
}

/// The pipeline wired to the real HTTP collaborators.
pub type HttpPipeline = FloodRiskPipeline<WeatherApiClient, BackendAnalysisClient, HttpRiverDataset>;

impl HttpPipeline {
    pub fn from_config(config: &ServiceConfig) -> Result<Self, FloodRiskError> {
        let api_key = config.weather_api_key()?;
        let client = config.http_client()?;

        Ok(FloodRiskPipeline::new(
            WeatherApiClient::new(client.clone(), &config.weather.base_url, &api_key),
            BackendAnalysisClient::new(client.clone(), &config.backend.analyze_url),
            HttpRiverDataset::new(client, config.river.dataset_url.clone()),
            config.weather.days,
        )
        .with_max_reading_age(config.river.max_reading_age_days))
    }
}

impl<W, A, R> FloodRiskPipeline<W, A, R>
where
    W: WeatherProvider,
    A: AnalysisService,
    R: RiverDatasetSource,
{
    pub fn new(weather: W, analysis: A, river_source: R, days: u32) -> Self {
        Self {
            weather,
            analysis,
            river: RiverDatasetCache::new(river_source),
            days,
            max_reading_age_days: None,
        }
    }

    /// Warn when the newest river reading is older than `days`.
    pub fn with_max_reading_age(mut self, days: Option<u32>) -> Self {
        self.max_reading_age_days = days;
        self
    }

    pub fn river_cache(&self) -> &RiverDatasetCache<R> {
        &self.river
    }

    /// Runs the full analysis. Never returns an error; failures come back
    /// as `AnalysisOutcome::Failure` with a message and timestamp.
    pub fn analyze(&self, location: &str) -> AnalysisOutcome {
        logging::info(DataSource::Pipeline, Some(location), "Starting weekly forecast analysis");
        match self.run(location) {
            Ok(report) => AnalysisOutcome::Success(Box::new(report)),
            Err(e) => {
                logging::log_failure(DataSource::Pipeline, Some(location), "Analysis", &e);
                AnalysisOutcome::Failure(AnalysisFailure {
                    success: false,
                    error: e.to_string(),
                    timestamp: timestamp(),
                })
            }
        }
    }

    fn run(&self, location: &str) -> Result<AnalysisReport, FloodRiskError> {
        let city = locations::resolve(location)?;
        let mapping = barrages::river_for_city(&city);
        if mapping.is_none() {
            logging::debug(DataSource::River, Some(&city), "No river mapping; skipping river signal");
        }

        let (weather, dataset) = thread::scope(|s| {
            let river_load = mapping.map(|_| s.spawn(|| self.river.get()));
            let weather = self.weather.fetch_forecast(location, self.days);
            let dataset = river_load.and_then(|handle| {
                handle.join().unwrap_or_else(|_| {
                    logging::error(DataSource::River, None, "River dataset load panicked");
                    None
                })
            });
            (weather, dataset)
        });
        let weather = weather?;

        let river = match (mapping, dataset.as_deref()) {
            (Some(mapping), Some(dataset)) => self.river_signal(mapping, dataset),
            _ => None,
        };

        let river_context = river
            .as_ref()
            .map(|r| RiverContext::new(&r.mapping, &r.reading, &r.assessment));
        let river_context_supplied = river_context.is_some();
        let raw = self
            .analysis
            .analyze(&AnalysisRequest::new(&weather, river_context))?;

        let mut record = normalize::normalize(&raw, river_context_supplied);
        if let BlendOutcome::Overridden(level) = blend::blend(&mut record, river.as_ref().map(|r| &r.assessment)) {
            logging::info(
                DataSource::Pipeline,
                Some(location),
                &format!("River signal overrode analysis: {} / {:.0}", level, record.risk_score),
            );
        }

        let (river_assessment, river_mapping, river_reading) = match river {
            Some(r) => (Some(r.assessment), Some(r.mapping), Some(r.reading)),
            None => (None, None, None),
        };

        Ok(AnalysisReport {
            success: true,
            location: weather.location,
            forecast: weather.forecast,
            alerts: weather.alerts,
            analysis: record,
            river_assessment,
            river_mapping,
            river_reading,
            timestamp: timestamp(),
        })
    }

    fn river_signal(&self, mapping: RiverMapping, dataset: &[river::StationRecord]) -> Option<RiverSignal> {
        let Some(reading) = river::latest_level(dataset, mapping.barrage) else {
            logging::info(DataSource::River, Some(mapping.barrage), "No current level in river dataset");
            return None;
        };

        if let Some(max_age) = self.max_reading_age_days {
            match stalenesses::is_stale(&reading, max_age) {
                Ok(false) => {}
                Ok(true) => logging::warn(
                    DataSource::River,
                    Some(mapping.barrage),
                    &format!("Newest reading dated {} is older than {} days", reading.date, max_age),
                ),
                Err(e) => logging::warn(
                    DataSource::River,
                    Some(mapping.barrage),
                    &format!("Cannot check reading age, treating as stale: {}", e),
                ),
            }
        }

        let assessment = thresholds::assess(mapping.barrage, reading.level);
        logging::debug(
            DataSource::River,
            Some(mapping.barrage),
            &format!("Level {} -> {} ({})", reading.level, assessment.risk_level, assessment.score),
        );
        Some(RiverSignal {
            mapping,
            reading,
            assessment,
        })
    }
}

/// ISO-8601 UTC with milliseconds, e.g. `2024-08-15T09:30:00.000Z`.
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
