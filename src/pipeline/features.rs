//! The feature row threaded through the pipeline.
//!
//! Columns can only be appended in [`Feature::ALL`] order, so a model that
//! sees a record of length `n` sees exactly the first `n` columns and nothing
//! a later stage has yet to produce.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use thiserror::Error;

/// One named column of the feature row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    HomeTeam,
    AwayTeam,
    HomeFormPointsAvg,
    AwayFormPointsAvg,
    HomePpda,
    AwayPpda,
    HomeXg,
    AwayXg,
    HomeSot,
    AwaySot,
    HomeGoals,
    AwayGoals,
}

impl Feature {
    /// Every column, in insertion order.
    pub const ALL: [Feature; 12] = [
        Feature::HomeTeam,
        Feature::AwayTeam,
        Feature::HomeFormPointsAvg,
        Feature::AwayFormPointsAvg,
        Feature::HomePpda,
        Feature::AwayPpda,
        Feature::HomeXg,
        Feature::AwayXg,
        Feature::HomeSot,
        Feature::AwaySot,
        Feature::HomeGoals,
        Feature::AwayGoals,
    ];

    /// Column name as the models were trained with it.
    pub fn column(self) -> &'static str {
        match self {
            Feature::HomeTeam => "home_team",
            Feature::AwayTeam => "away_team",
            Feature::HomeFormPointsAvg => "home_form_points_avg",
            Feature::AwayFormPointsAvg => "away_form_points_avg",
            Feature::HomePpda => "home_ppda",
            Feature::AwayPpda => "away_ppda",
            Feature::HomeXg => "home_xg",
            Feature::AwayXg => "away_xg",
            Feature::HomeSot => "home_sot",
            Feature::AwaySot => "away_sot",
            Feature::HomeGoals => "home_goals",
            Feature::AwayGoals => "away_goals",
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Feature::ALL.into_iter().find(|f| f.column() == name)
    }

    /// Position of this column in the row.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The columns present when this one is about to be written.
    pub fn inputs(self) -> &'static [Feature] {
        &Feature::ALL[..self.index()]
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("cannot append {got}: next column is {expected:?}")]
    OutOfOrder {
        expected: Option<Feature>,
        got: Feature,
    },

    #[error("column {0} has not been produced yet")]
    Missing(Feature),
}

/// Ordered, append-only feature row owned by a single pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRecord {
    values: Vec<f64>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        FeatureRecord {
            values: Vec::with_capacity(Feature::ALL.len()),
        }
    }

    /// Append the next column. Rejects anything but the next column in order.
    pub fn push(&mut self, feature: Feature, value: f64) -> Result<(), FeatureError> {
        let expected = self.next_column();
        if expected != Some(feature) {
            return Err(FeatureError::OutOfOrder {
                expected,
                got: feature,
            });
        }
        self.values.push(value);
        Ok(())
    }

    pub fn next_column(&self) -> Option<Feature> {
        Feature::ALL.get(self.values.len()).copied()
    }

    pub fn get(&self, feature: Feature) -> Option<f64> {
        self.values.get(feature.index()).copied()
    }

    pub fn require(&self, feature: Feature) -> Result<f64, FeatureError> {
        self.get(feature).ok_or(FeatureError::Missing(feature))
    }

    /// Columns written so far, in order.
    pub fn columns(&self) -> &'static [Feature] {
        &Feature::ALL[..self.values.len()]
    }

    /// Values written so far, aligned with [`columns`](Self::columns).
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        self.columns().iter().copied().zip(self.values.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.values.len() == Feature::ALL.len()
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (feature, value) in self.iter() {
            map.serialize_entry(feature.column(), &value)?;
        }
        map.end()
    }
}
