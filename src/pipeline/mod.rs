//! The sequential match-prediction pipeline.

pub mod error;
pub mod features;
pub mod input;
pub mod orchestrator;
pub mod result;

pub use error::{EncodingConsistencyWarning, PipelineError, Stage, ValidationError};
pub use features::{Feature, FeatureError, FeatureRecord};
pub use input::{validate, MatchInput, DEFAULT_FORM, FORM_RANGE};
pub use orchestrator::{Pipeline, PipelineRun};
pub use result::{round_count, MatchOutcome, PredictionResult, Probabilities};
