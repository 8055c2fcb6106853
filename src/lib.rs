//! Flood risk service.
//!
//! Combines a weekly weather forecast, an AI flood-risk analysis from a
//! remote backend, and barrage gauge readings into one validated, UI-ready
//! risk record. See `pipeline::FloodRiskPipeline` for the request flow.

pub mod alert;
pub mod analysis;
pub mod barrages;
pub mod config;
pub mod ingest;
pub mod locations;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod presentation;
