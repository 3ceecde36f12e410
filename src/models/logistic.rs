//! Multinomial logistic regression for the match-result stage.
//!
//! Each class gets a linear score (logit); probabilities are the softmax of
//! those scores and the predicted class is the arg-max, so the label always
//! agrees with the most likely class.

use serde::{Deserialize, Serialize};

use super::bundle::{parse_columns, InvalidArtifact};
use super::{check_columns, ClassPrediction, Classifier, ModelError};
use crate::pipeline::{Feature, FeatureRecord};

/// On-disk form of a fitted softmax classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftmaxArtifact {
    pub features: Vec<String>,
    /// Class labels, one per coefficient row.
    pub classes: Vec<i64>,
    /// `classes.len()` rows of `features.len()` weights.
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct SoftmaxClassifier {
    features: Vec<Feature>,
    classes: Vec<i64>,
    coefficients: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
}

impl SoftmaxClassifier {
    pub fn new(
        features: Vec<Feature>,
        classes: Vec<i64>,
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    ) -> Result<Self, InvalidArtifact> {
        if classes.len() < 2 {
            return Err(InvalidArtifact(format!(
                "need at least 2 classes, got {}",
                classes.len()
            )));
        }
        if coefficients.len() != classes.len() || intercepts.len() != classes.len() {
            return Err(InvalidArtifact(format!(
                "{} classes but {} coefficient rows and {} intercepts",
                classes.len(),
                coefficients.len(),
                intercepts.len()
            )));
        }
        if let Some(row) = coefficients.iter().find(|row| row.len() != features.len()) {
            return Err(InvalidArtifact(format!(
                "coefficient row has {} weights, expected {}",
                row.len(),
                features.len()
            )));
        }
        let all_finite = intercepts
            .iter()
            .chain(coefficients.iter().flatten())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(InvalidArtifact("non-finite parameter".into()));
        }
        Ok(SoftmaxClassifier {
            features,
            classes,
            coefficients,
            intercepts,
        })
    }

    pub fn from_artifact(artifact: SoftmaxArtifact) -> Result<Self, InvalidArtifact> {
        let features = parse_columns(&artifact.features)?;
        Self::new(
            features,
            artifact.classes,
            artifact.coefficients,
            artifact.intercepts,
        )
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn logits(&self, x: &[f64]) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, b)| b + row.iter().zip(x).map(|(w, v)| w * v).sum::<f64>())
            .collect()
    }
}

impl Classifier for SoftmaxClassifier {
    fn classify(&self, features: &FeatureRecord) -> Result<ClassPrediction, ModelError> {
        check_columns(&self.features, features)?;
        let logits = self.logits(features.values());
        if let Some(bad) = logits.iter().find(|z| !z.is_finite()) {
            return Err(ModelError::NonFinite(*bad));
        }
        let probabilities = softmax(&logits);
        let best = argmax(&probabilities);
        Ok(ClassPrediction {
            class_index: self.classes[best],
            probabilities,
        })
    }
}

/// Numerically stable softmax (shift by the max logit before exponentiating).
pub(crate) fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

/// Index of the largest value; the first one wins ties.
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn full_record(values: [f64; 12]) -> FeatureRecord {
        let mut r = FeatureRecord::new();
        for (f, v) in Feature::ALL.into_iter().zip(values) {
            r.push(f, v).unwrap();
        }
        r
    }

    fn goal_diff_model() -> SoftmaxClassifier {
        // Only the goals columns matter: home win rises with home_goals - away_goals.
        let mut away = vec![0.0; 12];
        let mut home = vec![0.0; 12];
        away[10] = -1.5;
        away[11] = 1.5;
        home[10] = 1.5;
        home[11] = -1.5;
        SoftmaxClassifier::new(
            Feature::ALL.to_vec(),
            vec![0, 1, 2],
            vec![away, vec![0.0; 12], home],
            vec![0.0, 0.2, 0.1],
        )
        .unwrap()
    }

    #[test]
    fn softmax_sums_to_one_and_survives_large_logits() {
        let p = softmax(&[1000.0, 999.0, 998.0]);
        assert_relative_eq!(p.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert!(p[0] > p[1] && p[1] > p[2]);
    }

    #[test]
    fn argmax_prefers_first_on_ties() {
        assert_eq!(argmax(&[0.4, 0.4, 0.2]), 0);
        assert_eq!(argmax(&[0.1, 0.3, 0.6]), 2);
    }

    #[test]
    fn home_heavy_goals_predict_home_win() {
        let mut values = [0.0; 12];
        values[10] = 2.6;
        values[11] = 0.7;
        let out = goal_diff_model().classify(&full_record(values)).unwrap();
        assert_eq!(out.class_index, 2);
        assert_eq!(out.probabilities.len(), 3);
        assert_relative_eq!(out.probabilities.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn level_goals_favour_draw_intercept() {
        let mut values = [0.0; 12];
        values[10] = 1.0;
        values[11] = 1.0;
        let out = goal_diff_model().classify(&full_record(values)).unwrap();
        assert_eq!(out.class_index, 1);
    }

    #[test]
    fn incomplete_record_is_rejected() {
        let mut r = FeatureRecord::new();
        r.push(Feature::HomeTeam, 1.0).unwrap();
        let err = goal_diff_model().classify(&r).unwrap_err();
        assert!(matches!(err, ModelError::FeatureMismatch { .. }));
    }

    #[test]
    fn mismatched_shapes_are_invalid() {
        let err = SoftmaxClassifier::new(
            Feature::ALL.to_vec(),
            vec![0, 1, 2],
            vec![vec![0.0; 12], vec![0.0; 12]],
            vec![0.0; 3],
        )
        .unwrap_err();
        assert!(err.0.contains("3 classes"));

        let err = SoftmaxClassifier::new(
            Feature::ALL.to_vec(),
            vec![0, 1],
            vec![vec![0.0; 12], vec![0.0; 11]],
            vec![0.0; 2],
        )
        .unwrap_err();
        assert!(err.0.contains("11 weights"));
    }
}
