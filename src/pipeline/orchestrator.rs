//! Runs the nine predictors in their fixed order.
//!
//! encode → PPDA (home, away) → xG → SOT → goals → result. Every regressor
//! receives the whole record built so far and its output becomes the next
//! column. Any failure aborts the run; there is no partial result.

use std::sync::Arc;
use tracing::{debug, warn};

use super::error::{EncodingConsistencyWarning, PipelineError, Stage};
use super::features::{Feature, FeatureRecord};
use super::input::{check, CheckedInput, MatchInput};
use super::result::{MatchOutcome, PredictionResult, Probabilities};
use crate::models::{ModelBundle, ModelError};
use crate::teams::Side;

/// Everything a single run produced, for callers that want more than the
/// headline result.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub features: FeatureRecord,
    pub result: PredictionResult,
    pub warnings: Vec<EncodingConsistencyWarning>,
}

/// Stateless orchestrator over a shared, immutable model bundle.
#[derive(Clone)]
pub struct Pipeline {
    models: Arc<ModelBundle>,
}

impl Pipeline {
    pub fn new(models: ModelBundle) -> Self {
        Pipeline {
            models: Arc::new(models),
        }
    }

    pub fn from_shared(models: Arc<ModelBundle>) -> Self {
        Pipeline { models }
    }

    /// Predict one fixture.
    pub fn run(&self, input: &MatchInput) -> Result<PredictionResult, PipelineError> {
        self.run_detailed(input).map(|run| run.result)
    }

    /// Predict one fixture and keep the feature record and diagnostics.
    pub fn run_detailed(&self, input: &MatchInput) -> Result<PipelineRun, PipelineError> {
        let checked = check(input)?;

        let mut features = self.encode_inputs(&checked)?;
        let warnings = self.cross_check_encoding(&checked, &features)?;
        for warning in &warnings {
            warn!("Encoding consistency: {}", warning);
        }

        for (column, model) in self.models.stats.in_order() {
            let stage = Stage::Stat(column);
            let value = model
                .predict(&features)
                .and_then(finite)
                .map_err(|source| PipelineError::Stage { stage, source })?;
            debug!(stage = %stage, value, "stage complete");
            features.push(column, value)?;
        }

        let class = self
            .models
            .result
            .classify(&features)
            .map_err(|source| PipelineError::Stage {
                stage: Stage::Result,
                source,
            })?;
        let probabilities = Probabilities::from_class_probabilities(&class.probabilities)
            .map_err(|source| PipelineError::Stage {
                stage: Stage::Result,
                source,
            })?;
        let outcome = MatchOutcome::from_class_index(class.class_index)
            .ok_or(PipelineError::UnknownClass(class.class_index))?;

        let result = PredictionResult::from_record(&features, outcome, probabilities)?;
        debug!(
            "{} vs {}: {} (away {:.3}, draw {:.3}, home {:.3})",
            checked.home_team,
            checked.away_team,
            outcome,
            probabilities.away,
            probabilities.draw,
            probabilities.home
        );

        Ok(PipelineRun {
            features,
            result,
            warnings,
        })
    }

    fn encode(&self, team: &str) -> Result<f64, PipelineError> {
        self.models
            .encoder
            .encode(team)
            .map(|code| code as f64)
            .map_err(|source| PipelineError::Stage {
                stage: Stage::Encode,
                source,
            })
    }

    fn encode_inputs(&self, input: &CheckedInput) -> Result<FeatureRecord, PipelineError> {
        let mut features = FeatureRecord::new();
        features.push(Feature::HomeTeam, self.encode(input.home_team)?)?;
        features.push(Feature::AwayTeam, self.encode(input.away_team)?)?;
        features.push(Feature::HomeFormPointsAvg, input.home_form_avg)?;
        features.push(Feature::AwayFormPointsAvg, input.away_form_avg)?;
        Ok(features)
    }

    /// Encode both names a second time and compare with what was recorded.
    fn cross_check_encoding(
        &self,
        input: &CheckedInput,
        features: &FeatureRecord,
    ) -> Result<Vec<EncodingConsistencyWarning>, PipelineError> {
        let mut warnings = Vec::new();
        for (side, team, column) in [
            (Side::Home, input.home_team, Feature::HomeTeam),
            (Side::Away, input.away_team, Feature::AwayTeam),
        ] {
            let recorded = features.require(column)?;
            let recomputed = self.encode(team)?;
            if recorded != recomputed {
                warnings.push(EncodingConsistencyWarning {
                    side,
                    team: team.to_string(),
                    recorded,
                    recomputed,
                });
            }
        }
        Ok(warnings)
    }
}

fn finite(value: f64) -> Result<f64, ModelError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ModelError::NonFinite(value))
    }
}
