use serde::Serialize;
use std::fmt;
use thiserror::Error;

use super::features::{Feature, FeatureError};
use crate::models::ModelError;
use crate::teams::Side;

/// A step of the pipeline, used to attribute failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Stage {
    /// Team names to numeric codes.
    Encode,
    /// A regression stage, named by the column it writes.
    Stat(Feature),
    /// The match-result classifier.
    Result,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Encode => write!(f, "encode"),
            Stage::Stat(feature) => write!(f, "{}", feature.column()),
            Stage::Result => write!(f, "result"),
        }
    }
}

impl From<Stage> for String {
    fn from(stage: Stage) -> String {
        stage.to_string()
    }
}

/// Bad request; raised before any model is invoked.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Unknown {side} team: {name:?}")]
    UnknownTeam { side: Side, name: String },

    #[error("{side} form average {value} is outside [0.0, 3.0]")]
    FormOutOfRange { side: Side, value: f64 },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid match input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Prediction stage '{stage}' failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: ModelError,
    },

    #[error("Result classifier returned unknown class index {0}")]
    UnknownClass(i64),

    #[error("Feature record error: {0}")]
    Feature(#[from] FeatureError),
}

impl PipelineError {
    /// The stage that failed, if the error came from a model.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Same team name, two different codes within one run. Never fatal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodingConsistencyWarning {
    pub side: Side,
    pub team: String,
    /// Code written into the feature record.
    pub recorded: f64,
    /// Code obtained when the name was encoded again.
    pub recomputed: f64,
}

impl fmt::Display for EncodingConsistencyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} team {:?} encoded as {} but re-encoded as {}",
            self.side, self.team, self.recorded, self.recomputed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_names_follow_columns() {
        assert_eq!(Stage::Encode.to_string(), "encode");
        assert_eq!(Stage::Stat(Feature::HomeSot).to_string(), "home_sot");
        assert_eq!(Stage::Result.to_string(), "result");
        assert_eq!(
            serde_json::to_string(&Stage::Stat(Feature::AwayXg)).unwrap(),
            r#""away_xg""#
        );
    }

    #[test]
    fn stage_error_message_names_stage_and_cause() {
        let err = PipelineError::Stage {
            stage: Stage::Stat(Feature::AwaySot),
            source: ModelError::NonFinite(f64::NAN),
        };
        let msg = err.to_string();
        assert!(msg.contains("'away_sot'"));
        assert!(msg.contains("non-finite"));
        assert_eq!(err.stage(), Some(Stage::Stat(Feature::AwaySot)));
    }

    #[test]
    fn validation_message_is_readable() {
        let err = ValidationError::FormOutOfRange {
            side: Side::Home,
            value: 3.5,
        };
        assert_eq!(err.to_string(), "home form average 3.5 is outside [0.0, 3.0]");
    }
}
