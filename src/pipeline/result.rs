//! The prediction handed back to callers.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::features::{Feature, FeatureError, FeatureRecord};
use crate::models::ModelError;

/// Three-way match result, indexed the way the classifier was trained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    #[serde(rename = "Away Win")]
    AwayWin,
    #[serde(rename = "Draw")]
    Draw,
    #[serde(rename = "Home Win")]
    HomeWin,
}

impl MatchOutcome {
    pub fn from_class_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(MatchOutcome::AwayWin),
            1 => Some(MatchOutcome::Draw),
            2 => Some(MatchOutcome::HomeWin),
            _ => None,
        }
    }

    pub fn class_index(self) -> i64 {
        match self {
            MatchOutcome::AwayWin => 0,
            MatchOutcome::Draw => 1,
            MatchOutcome::HomeWin => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchOutcome::AwayWin => "Away Win",
            MatchOutcome::Draw => "Draw",
            MatchOutcome::HomeWin => "Home Win",
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome probabilities in (away, draw, home) order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Probabilities {
    pub away: f64,
    pub draw: f64,
    pub home: f64,
}

impl Probabilities {
    /// Allowed drift of the sum away from 1.0.
    pub const SUM_TOLERANCE: f64 = 1e-6;

    /// Accept a classifier distribution ordered by class index.
    pub fn from_class_probabilities(p: &[f64]) -> Result<Self, ModelError> {
        let malformed = || ModelError::MalformedProbabilities(p.to_vec());
        let [away, draw, home] = <[f64; 3]>::try_from(p).map_err(|_| malformed())?;
        let in_range = [away, draw, home]
            .iter()
            .all(|v| v.is_finite() && (0.0..=1.0).contains(v));
        if !in_range || (away + draw + home - 1.0).abs() > Self::SUM_TOLERANCE {
            return Err(malformed());
        }
        Ok(Probabilities { away, draw, home })
    }

    pub fn as_triple(&self) -> (f64, f64, f64) {
        (self.away, self.draw, self.home)
    }

    pub fn of(&self, outcome: MatchOutcome) -> f64 {
        match outcome {
            MatchOutcome::AwayWin => self.away,
            MatchOutcome::Draw => self.draw,
            MatchOutcome::HomeWin => self.home,
        }
    }

    /// Arg-max over (away, draw, home); earlier entries win exact ties.
    pub fn most_likely(&self) -> MatchOutcome {
        let mut best = MatchOutcome::AwayWin;
        for outcome in [MatchOutcome::Draw, MatchOutcome::HomeWin] {
            if self.of(outcome) > self.of(best) {
                best = outcome;
            }
        }
        best
    }

    pub fn sum(&self) -> f64 {
        self.away + self.draw + self.home
    }
}

/// Round to the nearest integer, ties to even (2.5 → 2, 3.5 → 4).
pub fn round_count(value: f64) -> i32 {
    value.round_ties_even() as i32
}

/// Final, read-only prediction for one fixture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub home_goals: i32,
    pub away_goals: i32,
    pub home_xg: f64,
    pub away_xg: f64,
    pub home_sot: i32,
    pub away_sot: i32,
    #[serde(rename = "result_label")]
    pub result: MatchOutcome,
    pub probabilities: Probabilities,
}

impl PredictionResult {
    /// Build the display values from a complete feature record.
    pub fn from_record(
        record: &FeatureRecord,
        result: MatchOutcome,
        probabilities: Probabilities,
    ) -> Result<Self, FeatureError> {
        Ok(PredictionResult {
            home_goals: round_count(record.require(Feature::HomeGoals)?),
            away_goals: round_count(record.require(Feature::AwayGoals)?),
            home_xg: record.require(Feature::HomeXg)?,
            away_xg: record.require(Feature::AwayXg)?,
            home_sot: round_count(record.require(Feature::HomeSot)?),
            away_sot: round_count(record.require(Feature::AwaySot)?),
            result,
            probabilities,
        })
    }

    pub fn result_label(&self) -> &'static str {
        self.result.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn class_index_lookup_is_fixed() {
        assert_eq!(MatchOutcome::from_class_index(0), Some(MatchOutcome::AwayWin));
        assert_eq!(MatchOutcome::from_class_index(1), Some(MatchOutcome::Draw));
        assert_eq!(MatchOutcome::from_class_index(2), Some(MatchOutcome::HomeWin));
        assert_eq!(MatchOutcome::from_class_index(3), None);
        assert_eq!(MatchOutcome::from_class_index(-1), None);
        for outcome in [MatchOutcome::AwayWin, MatchOutcome::Draw, MatchOutcome::HomeWin] {
            assert_eq!(MatchOutcome::from_class_index(outcome.class_index()), Some(outcome));
        }
    }

    #[test]
    fn rounding_is_half_to_even() {
        assert_eq!(round_count(0.5), 0);
        assert_eq!(round_count(1.5), 2);
        assert_eq!(round_count(2.5), 2);
        assert_eq!(round_count(3.5), 4);
        assert_eq!(round_count(2.49), 2);
        assert_eq!(round_count(2.51), 3);
        assert_eq!(round_count(-0.4), 0);
        assert_eq!(round_count(4.0), 4);
    }

    #[test]
    fn probabilities_accept_valid_distribution() {
        let p = Probabilities::from_class_probabilities(&[0.2, 0.3, 0.5]).unwrap();
        assert_eq!(p.as_triple(), (0.2, 0.3, 0.5));
        assert_relative_eq!(p.sum(), 1.0, epsilon = 1e-12);
        assert_eq!(p.most_likely(), MatchOutcome::HomeWin);
    }

    #[test]
    fn probabilities_reject_malformed_output() {
        for bad in [
            vec![0.5, 0.5],
            vec![0.2, 0.3, 0.4, 0.1],
            vec![0.2, 0.3, 0.4],
            vec![-0.1, 0.6, 0.5],
            vec![f64::NAN, 0.5, 0.5],
        ] {
            let err = Probabilities::from_class_probabilities(&bad).unwrap_err();
            assert!(matches!(err, ModelError::MalformedProbabilities(_)), "{bad:?}");
        }
    }

    #[test]
    fn most_likely_prefers_earlier_outcome_on_tie() {
        let p = Probabilities { away: 0.4, draw: 0.4, home: 0.2 };
        assert_eq!(p.most_likely(), MatchOutcome::AwayWin);
        let p = Probabilities { away: 0.2, draw: 0.4, home: 0.4 };
        assert_eq!(p.most_likely(), MatchOutcome::Draw);
    }

    #[test]
    fn result_serializes_label_text() {
        let mut record = FeatureRecord::new();
        let values = [23.0, 27.0, 2.4, 1.2, 9.0, 12.0, 1.83, 0.92, 5.5, 3.4, 2.5, 0.6];
        for (f, v) in Feature::ALL.into_iter().zip(values) {
            record.push(f, v).unwrap();
        }
        let probs = Probabilities { away: 0.2, draw: 0.25, home: 0.55 };
        let result = PredictionResult::from_record(&record, MatchOutcome::HomeWin, probs).unwrap();

        assert_eq!(result.home_goals, 2);
        assert_eq!(result.away_goals, 1);
        assert_eq!(result.home_sot, 6);
        assert_eq!(result.away_sot, 3);
        assert_relative_eq!(result.home_xg, 1.83);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["result_label"], "Home Win");
        assert_eq!(json["probabilities"]["draw"], 0.25);
    }

    #[test]
    fn incomplete_record_cannot_build_result() {
        let record = FeatureRecord::new();
        let probs = Probabilities { away: 0.3, draw: 0.3, home: 0.4 };
        let err = PredictionResult::from_record(&record, MatchOutcome::HomeWin, probs).unwrap_err();
        assert_eq!(err, FeatureError::Missing(Feature::HomeGoals));
    }
}
