//! Loading the ten artifacts that make up a prediction model set.
//!
//! Artifacts live side by side in one directory as `<prefix>_<suffix>.json`.
//! Everything is read and validated once at startup; the resulting
//! [`ModelBundle`] is immutable and shared between requests.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use super::encoder::EncoderArtifact;
use super::linear::LinearArtifact;
use super::logistic::SoftmaxArtifact;
use super::{Classifier, LabelEncoder, LinearRegressor, Regressor, SoftmaxClassifier, TeamEncoder};
use crate::pipeline::Feature;

/// Why an artifact's contents were rejected.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{0}")]
pub struct InvalidArtifact(pub String);

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to read model artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse model artifact {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid model artifact {path}: {reason}")]
    Invalid { path: String, reason: InvalidArtifact },
}

/// The eight regression stages, one field per predicted column.
pub struct StatModels {
    pub home_ppda: Box<dyn Regressor>,
    pub away_ppda: Box<dyn Regressor>,
    pub home_xg: Box<dyn Regressor>,
    pub away_xg: Box<dyn Regressor>,
    pub home_sot: Box<dyn Regressor>,
    pub away_sot: Box<dyn Regressor>,
    pub home_goals: Box<dyn Regressor>,
    pub away_goals: Box<dyn Regressor>,
}

impl StatModels {
    /// Regressors paired with the column each one writes, in execution order.
    pub fn in_order(&self) -> [(Feature, &dyn Regressor); 8] {
        [
            (Feature::HomePpda, self.home_ppda.as_ref()),
            (Feature::AwayPpda, self.away_ppda.as_ref()),
            (Feature::HomeXg, self.home_xg.as_ref()),
            (Feature::AwayXg, self.away_xg.as_ref()),
            (Feature::HomeSot, self.home_sot.as_ref()),
            (Feature::AwaySot, self.away_sot.as_ref()),
            (Feature::HomeGoals, self.home_goals.as_ref()),
            (Feature::AwayGoals, self.away_goals.as_ref()),
        ]
    }
}

/// Every dependency the pipeline needs, constructed once and injected.
pub struct ModelBundle {
    pub encoder: Box<dyn TeamEncoder>,
    pub stats: StatModels,
    pub result: Box<dyn Classifier>,
}

impl ModelBundle {
    pub fn new(
        encoder: Box<dyn TeamEncoder>,
        stats: StatModels,
        result: Box<dyn Classifier>,
    ) -> Self {
        ModelBundle {
            encoder,
            stats,
            result,
        }
    }

    /// Load and validate all artifacts under `dir`.
    pub fn load(dir: &Path, prefix: &str) -> Result<Self, ArtifactError> {
        let path = artifact_path(dir, prefix, "le");
        let encoder = LabelEncoder::from_artifact(read_artifact::<EncoderArtifact>(&path)?)
            .map_err(|reason| invalid(&path, reason))?;
        debug!("Encoder loaded: {} classes", encoder.classes().len());

        let stats = StatModels {
            home_ppda: Box::new(load_regressor(dir, prefix, "hppda", Feature::HomePpda)?),
            away_ppda: Box::new(load_regressor(dir, prefix, "appda", Feature::AwayPpda)?),
            home_xg: Box::new(load_regressor(dir, prefix, "hxg", Feature::HomeXg)?),
            away_xg: Box::new(load_regressor(dir, prefix, "axg", Feature::AwayXg)?),
            home_sot: Box::new(load_regressor(dir, prefix, "hsot", Feature::HomeSot)?),
            away_sot: Box::new(load_regressor(dir, prefix, "asot", Feature::AwaySot)?),
            home_goals: Box::new(load_regressor(dir, prefix, "hgoals", Feature::HomeGoals)?),
            away_goals: Box::new(load_regressor(dir, prefix, "agoals", Feature::AwayGoals)?),
        };

        let path = artifact_path(dir, prefix, "res");
        let result = SoftmaxClassifier::from_artifact(read_artifact::<SoftmaxArtifact>(&path)?)
            .map_err(|reason| invalid(&path, reason))?;
        if result.features() != &Feature::ALL[..] {
            return Err(invalid(
                &path,
                InvalidArtifact(format!(
                    "result model must use all {} columns in order, found {:?}",
                    Feature::ALL.len(),
                    result.features()
                )),
            ));
        }
        if result.classes().len() != 3 {
            return Err(invalid(
                &path,
                InvalidArtifact(format!(
                    "result model must have 3 classes, found {}",
                    result.classes().len()
                )),
            ));
        }
        // Probabilities are read positionally as (away, draw, home).
        if result.classes() != RESULT_CLASSES {
            return Err(invalid(
                &path,
                InvalidArtifact(format!(
                    "result model classes must be {:?}, found {:?}",
                    RESULT_CLASSES,
                    result.classes()
                )),
            ));
        }

        info!(
            "Loaded model bundle from {} (prefix '{}', 8 regressors + result classifier)",
            dir.display(),
            prefix
        );
        Ok(ModelBundle::new(
            Box::new(encoder),
            stats,
            Box::new(result),
        ))
    }
}

/// Result labels in the order the classifier's probabilities must follow.
const RESULT_CLASSES: [i64; 3] = [0, 1, 2];

pub fn artifact_path(dir: &Path, prefix: &str, suffix: &str) -> PathBuf {
    dir.join(format!("{prefix}_{suffix}.json"))
}

/// Resolve artifact column names to features.
pub(crate) fn parse_columns(names: &[String]) -> Result<Vec<Feature>, InvalidArtifact> {
    names
        .iter()
        .map(|name| {
            Feature::from_column(name)
                .ok_or_else(|| InvalidArtifact(format!("unknown feature column {name:?}")))
        })
        .collect()
}

fn load_regressor(
    dir: &Path,
    prefix: &str,
    suffix: &str,
    output: Feature,
) -> Result<LinearRegressor, ArtifactError> {
    let path = artifact_path(dir, prefix, suffix);
    let model = LinearRegressor::from_artifact(read_artifact::<LinearArtifact>(&path)?)
        .map_err(|reason| invalid(&path, reason))?;
    // The model sees every column written before its own output.
    if model.features() != output.inputs() {
        return Err(invalid(
            &path,
            InvalidArtifact(format!(
                "{output} model must be trained on {:?}, found {:?}",
                output.inputs(),
                model.features()
            )),
        ));
    }
    debug!("Loaded {} regressor from {}", output, path.display());
    Ok(model)
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let raw = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn invalid(path: &Path, reason: InvalidArtifact) -> ArtifactError {
    ArtifactError::Invalid {
        path: path.display().to_string(),
        reason,
    }
}
