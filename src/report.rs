//! Plain-text rendering of a prediction.

use crate::pipeline::{MatchOutcome, PredictionResult};

/// Format a prediction for the terminal.
pub fn format_prediction(result: &PredictionResult, home_name: &str, away_name: &str) -> String {
    let p = &result.probabilities;
    format!(
        r#"
┌─────────────────────────────────────────────────┐
│  {} vs {}
├─────────────────────────────────────────────────┤
│  Predicted goals:   {} {} - {} {}
│  Predicted xG:      {:.2} - {:.2}
│  Shots on target:   {} - {}
│  Predicted result:  {}
├─────────────────────────────────────────────────┤
│  {:<10} {:>6.2}%
│  {:<10} {:>6.2}%
│  {:<10} {:>6.2}%
└─────────────────────────────────────────────────┘
"#,
        home_name,
        away_name,
        home_name,
        result.home_goals,
        result.away_goals,
        away_name,
        result.home_xg,
        result.away_xg,
        result.home_sot,
        result.away_sot,
        result.result,
        MatchOutcome::HomeWin.label(),
        p.home * 100.0,
        MatchOutcome::Draw.label(),
        p.draw * 100.0,
        MatchOutcome::AwayWin.label(),
        p.away * 100.0,
    )
}
