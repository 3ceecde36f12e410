//! Linear regression stages (PPDA, xG, SOT, goals).

use serde::{Deserialize, Serialize};

use super::bundle::{parse_columns, InvalidArtifact};
use super::{check_columns, ModelError, Regressor};
use crate::pipeline::{Feature, FeatureRecord};

/// On-disk form of a fitted linear model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearArtifact {
    /// Training columns, in order.
    pub features: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

/// `y = intercept + Σ coefficient_i · x_i` over a fixed column list.
#[derive(Debug, Clone)]
pub struct LinearRegressor {
    features: Vec<Feature>,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearRegressor {
    pub fn new(
        features: Vec<Feature>,
        coefficients: Vec<f64>,
        intercept: f64,
    ) -> Result<Self, InvalidArtifact> {
        if features.len() != coefficients.len() {
            return Err(InvalidArtifact(format!(
                "{} features but {} coefficients",
                features.len(),
                coefficients.len()
            )));
        }
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(InvalidArtifact("non-finite parameter".into()));
        }
        Ok(LinearRegressor {
            features,
            coefficients,
            intercept,
        })
    }

    pub fn from_artifact(artifact: LinearArtifact) -> Result<Self, InvalidArtifact> {
        let features = parse_columns(&artifact.features)?;
        Self::new(features, artifact.coefficients, artifact.intercept)
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }
}

impl Regressor for LinearRegressor {
    fn predict(&self, features: &FeatureRecord) -> Result<f64, ModelError> {
        check_columns(&self.features, features)?;
        let y = self.intercept
            + self
                .coefficients
                .iter()
                .zip(features.values())
                .map(|(c, x)| c * x)
                .sum::<f64>();
        if !y.is_finite() {
            return Err(ModelError::NonFinite(y));
        }
        Ok(y)
    }
}
