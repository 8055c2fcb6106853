/// Post-processing of the remote analysis.
///
/// The AI reasoning itself happens in the backend; this module only turns
/// its output into something the UI can trust.
///
/// Submodules:
/// - `normalize`: parses/validates the raw payload, with a fixed fallback.
/// - `blend`    : lets an elevated river reading override the record.
/// - `reports`  : decodes stored weekly provincial reports.

pub mod blend;
pub mod normalize;
pub mod reports;
