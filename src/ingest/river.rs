/// River gauge dataset client and cache
///
/// The river dataset is a list of daily station records, newest first, each
/// a flat object of `<BARRAGE>_LEVEL` / `<BARRAGE>_MEAN_INFLOW` /
/// `<BARRAGE>_MEAN_OUTFLOW` columns plus a date. It is optional: when the
/// source is unconfigured or unreachable the service simply runs without a
/// river signal.
///
/// The dataset changes at most daily, so it is loaded once per process and
/// reused until `RiverDatasetCache::invalidate` is called.

use crate::barrages;
use crate::logging::{self, DataSource};
use crate::model::{FloodRiskError, Measurement, RiverLevelReading};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Anything that can supply the river dataset. Never fails: `None` means
/// the dataset is unavailable right now.
pub trait RiverDatasetSource: Send + Sync {
    fn load(&self) -> Option<Vec<StationRecord>>;
}

// ============================================================================
// Dataset records
// ============================================================================

/// One day of readings across all barrages.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct StationRecord {
    pub fields: HashMap<String, Value>,
}

impl StationRecord {
    pub fn new(fields: HashMap<String, Value>) -> Self {
        Self { fields }
    }

    /// The record's date column, whichever casing the source used.
    pub fn date(&self) -> Option<String> {
        ["DATE", "date", "Date"]
            .iter()
            .find_map(|k| self.fields.get(*k))
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
    }

    /// Numeric value of a column. Accepts JSON numbers and numeric strings
    /// with thousands separators (`"182,400"`).
    pub fn number(&self, column: &str) -> Option<f64> {
        match self.fields.get(column)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().replace(',', "").parse().ok(),
            _ => None,
        }
    }
}

/// Accepts a bare array of records or an object wrapping one under `data`.
pub fn parse_dataset(body: &str) -> Result<Vec<StationRecord>, FloodRiskError> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Envelope {
        Bare(Vec<StationRecord>),
        Wrapped { data: Vec<StationRecord> },
    }

    match serde_json::from_str::<Envelope>(body) {
        Ok(Envelope::Bare(records)) | Ok(Envelope::Wrapped { data: records }) => Ok(records),
        Err(e) => Err(FloodRiskError::ParseError(format!("river dataset: {}", e))),
    }
}

// ============================================================================
// Latest reading lookup
// ============================================================================

/// Reading for `barrage` from the first (newest) record of the dataset.
///
/// Returns `None` if the dataset is empty, the barrage has no column
/// mapping, or the newest record lacks a level. Missing inflow/outflow
/// degrade to `Measurement::Unavailable`. Record order is trusted, not
/// checked against dates.
pub fn latest_level(dataset: &[StationRecord], barrage: &str) -> Option<RiverLevelReading> {
    let fields = barrages::dataset_fields(barrage)?;
    let record = dataset.first()?;
    let level = record.number(fields.level)?;

    let measure = |column: &str| {
        record
            .number(column)
            .map(Measurement::Available)
            .unwrap_or(Measurement::Unavailable)
    };

    Some(RiverLevelReading {
        date: record.date().unwrap_or_default(),
        level,
        inflow: measure(fields.inflow),
        outflow: measure(fields.outflow),
        barrage: barrage.to_string(),
    })
}

// ============================================================================
// HTTP source
// ============================================================================

pub struct HttpRiverDataset {
    client: reqwest::blocking::Client,
    url: Option<String>,
}

impl HttpRiverDataset {
    /// `url = None` gives a source that is always unavailable.
    pub fn new(client: reqwest::blocking::Client, url: Option<String>) -> Self {
        Self { client, url }
    }

    fn fetch(&self, url: &str) -> Result<Vec<StationRecord>, FloodRiskError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()?;

        if !response.status().is_success() {
            return Err(FloodRiskError::HttpError {
                service: "River dataset",
                status: response.status().as_u16(),
                body: String::new(),
            });
        }

        parse_dataset(&response.text()?)
    }
}

impl RiverDatasetSource for HttpRiverDataset {
    fn load(&self) -> Option<Vec<StationRecord>> {
        let Some(url) = self.url.as_deref() else {
            let err = FloodRiskError::Config("River dataset not configured".to_string());
            logging::log_failure(DataSource::River, None, "Dataset load", &err);
            return None;
        };

        logging::info(DataSource::River, None, "Loading river dataset...");
        match self.fetch(url) {
            Ok(records) if records.is_empty() => {
                logging::warn(DataSource::River, None, "No data in river dataset");
                None
            }
            Ok(records) => {
                logging::info(DataSource::River, None, &format!("Loaded {} station records", records.len()));
                Some(records)
            }
            Err(e) => {
                logging::log_failure(DataSource::River, None, "Dataset load", &e);
                None
            }
        }
    }
}

// ============================================================================
// Load-once cache
// ============================================================================

/// Process-wide river dataset cache.
///
/// The first successful load is kept and shared until `invalidate`; a
/// failed load leaves the cache empty so the next request retries. The
/// lock is held across the load, so concurrent first requests trigger a
/// single fetch.
pub struct RiverDatasetCache<S> {
    source: S,
    cached: Mutex<Option<Arc<Vec<StationRecord>>>>,
}

impl<S: RiverDatasetSource> RiverDatasetCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cached: Mutex::new(None),
        }
    }

    /// Cached dataset, loading it on first use.
    pub fn get(&self) -> Option<Arc<Vec<StationRecord>>> {
        let mut guard = self.lock();
        if let Some(dataset) = guard.as_ref() {
            return Some(Arc::clone(dataset));
        }

        let loaded = Arc::new(self.source.load()?);
        *guard = Some(Arc::clone(&loaded));
        Some(loaded)
    }

    /// Drops the cached dataset; the next `get` reloads from the source.
    pub fn invalidate(&self) {
        *self.lock() = None;
        logging::debug(DataSource::River, None, "River dataset cache invalidated");
    }

    pub fn is_loaded(&self) -> bool {
        self.lock().is_some()
    }

    // A panic mid-load leaves the Option intact, so poisoning is recoverable.
    fn lock(&self) -> MutexGuard<'_, Option<Arc<Vec<StationRecord>>>> {
        self.cached.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// ============================================================================
// Tests
// ============================================================================
