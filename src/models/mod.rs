//! Pre-trained predictors and the team encoder.
//!
//! The pipeline only talks to the traits in this module; the concrete
//! implementations are loaded once from JSON artifacts by [`ModelBundle`].

pub mod bundle;
pub mod encoder;
pub mod linear;
pub mod logistic;

pub use bundle::{ArtifactError, ModelBundle, StatModels};
pub use encoder::LabelEncoder;
pub use linear::LinearRegressor;
pub use logistic::SoftmaxClassifier;

use thiserror::Error;

use crate::pipeline::{Feature, FeatureRecord};

/// Failure inside a single predictor or the encoder.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("feature mismatch: model was trained on {expected:?}, record has {actual:?}")]
    FeatureMismatch {
        expected: Vec<Feature>,
        actual: Vec<Feature>,
    },

    #[error("model produced a non-finite value ({0})")]
    NonFinite(f64),

    #[error("malformed class probabilities {0:?}")]
    MalformedProbabilities(Vec<f64>),

    #[error("unknown category {0:?}")]
    UnknownCategory(String),

    #[error("{0}")]
    Other(String),
}

/// Output of the result classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassPrediction {
    /// Predicted class label as the classifier was trained with it.
    pub class_index: i64,
    /// One probability per class, ordered by class label.
    pub probabilities: Vec<f64>,
}

/// A regression stage: one scalar from the current feature row.
pub trait Regressor: Send + Sync {
    fn predict(&self, features: &FeatureRecord) -> Result<f64, ModelError>;
}

/// The result stage: a class label plus the full class distribution.
pub trait Classifier: Send + Sync {
    fn classify(&self, features: &FeatureRecord) -> Result<ClassPrediction, ModelError>;
}

/// Categorical team encoder. Must be a pure lookup.
pub trait TeamEncoder: Send + Sync {
    fn encode(&self, team: &str) -> Result<i64, ModelError>;
}

/// Check that a record carries exactly the columns a model was fitted on.
pub(crate) fn check_columns(expected: &[Feature], record: &FeatureRecord) -> Result<(), ModelError> {
    if record.columns() != expected {
        return Err(ModelError::FeatureMismatch {
            expected: expected.to_vec(),
            actual: record.columns().to_vec(),
        });
    }
    Ok(())
}
