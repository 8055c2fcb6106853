/// River reading staleness detection.
///
/// The river dataset is trusted to list its newest record first, and the
/// lookup never checks the record's date. During a flood a stuck upstream
/// feed would keep reporting an old, calm level, so the pipeline uses this
/// module to flag readings whose date lags too far behind today.
///
/// # Clock injection
/// `is_stale_at` takes `today` rather than reading the clock, so tests are
/// deterministic without mocking.

use crate::model::RiverLevelReading;
use chrono::NaiveDate;

/// Date formats seen in the river dataset.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];

/// Parses the leading date portion of a dataset `date` value.
pub fn parse_reading_date(date: &str) -> Result<NaiveDate, String> {
    let day = date.trim().get(..10).unwrap_or(date.trim());
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(day, fmt).ok())
        .ok_or_else(|| format!("unrecognized reading date: {:?}", date))
}

/// Returns `true` if the reading is more than `max_age_days` older than
/// `today`.
///
///   age > max_age_days  →  stale
///   age == max_age_days →  not stale
///
/// Returns an error if the reading's date cannot be parsed. Callers should
/// treat parse failures as stale.
pub fn is_stale_at(
    reading: &RiverLevelReading,
    max_age_days: u32,
    today: NaiveDate,
) -> Result<bool, String> {
    let reading_day = parse_reading_date(&reading.date)?;
    let age_days = (today - reading_day).num_days();
    Ok(age_days > i64::from(max_age_days))
}

/// Convenience wrapper that uses the current UTC date.
pub fn is_stale(reading: &RiverLevelReading, max_age_days: u32) -> Result<bool, String> {
    is_stale_at(reading, max_age_days, chrono::Utc::now().date_naive())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
