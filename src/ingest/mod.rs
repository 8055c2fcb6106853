/// Outbound data sources.
///
/// Submodules:
/// - `weather`: multi-day forecast from WeatherAPI.
/// - `river`  : daily barrage dataset, its load-once cache, and the
///               latest-reading lookup.
/// - `backend`: remote AI flood-risk analysis.
/// - `reports`: stored weekly provincial reports.

pub mod backend;
pub mod reports;
pub mod river;
pub mod weather;
