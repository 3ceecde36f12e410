//! La Liga match prediction.
//!
//! Chains eight pre-trained regressors (pressing intensity, expected goals,
//! shots on target, goals for each side) and a result classifier into one
//! prediction, starting from two team names and their recent form.

pub mod config;
pub mod dashboard;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod teams;

pub use models::ModelBundle;
pub use pipeline::{MatchInput, Pipeline, PipelineError, PredictionResult};
pub use teams::TeamCatalog;
