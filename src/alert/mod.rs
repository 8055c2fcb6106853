/// River gauge alerting.
///
/// Submodules:
/// - `thresholds` : classifies a barrage level into a risk tier and score.
/// - `stalenesses`: flags readings whose date lags behind today.

pub mod stalenesses;
pub mod thresholds;
