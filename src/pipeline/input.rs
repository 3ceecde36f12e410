//! Prediction request and its pre-flight validation.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use super::error::ValidationError;
use crate::teams::{Side, TeamCatalog};

/// Average points per match over the last five games lies in this range.
pub const FORM_RANGE: RangeInclusive<f64> = 0.0..=3.0;

/// Form assumed when the caller does not supply one.
pub const DEFAULT_FORM: f64 = 1.0;

fn default_form() -> f64 {
    DEFAULT_FORM
}

/// One prediction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchInput {
    pub home_team: String,
    pub away_team: String,
    #[serde(default = "default_form", alias = "home_form_points_avg")]
    pub home_form_avg: f64,
    #[serde(default = "default_form", alias = "away_form_points_avg")]
    pub away_form_avg: f64,
}

impl MatchInput {
    pub fn new(
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        home_form_avg: f64,
        away_form_avg: f64,
    ) -> Self {
        MatchInput {
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_form_avg,
            away_form_avg,
        }
    }
}

/// A request whose team names have been resolved to catalog spellings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckedInput {
    pub home_team: &'static str,
    pub away_team: &'static str,
    pub home_form_avg: f64,
    pub away_form_avg: f64,
}

/// Reject unknown teams and out-of-range form without touching any model.
pub fn validate(input: &MatchInput) -> Result<(), ValidationError> {
    check(input).map(|_| ())
}

pub(crate) fn check(input: &MatchInput) -> Result<CheckedInput, ValidationError> {
    let home_team = resolve_team(Side::Home, &input.home_team)?;
    let away_team = resolve_team(Side::Away, &input.away_team)?;
    check_form(Side::Home, input.home_form_avg)?;
    check_form(Side::Away, input.away_form_avg)?;
    Ok(CheckedInput {
        home_team,
        away_team,
        home_form_avg: input.home_form_avg,
        away_form_avg: input.away_form_avg,
    })
}

fn resolve_team(side: Side, name: &str) -> Result<&'static str, ValidationError> {
    TeamCatalog
        .resolve(name)
        .ok_or_else(|| ValidationError::UnknownTeam {
            side,
            name: name.to_string(),
        })
}

fn check_form(side: Side, value: f64) -> Result<(), ValidationError> {
    // NaN fails `contains` as well.
    if !FORM_RANGE.contains(&value) {
        return Err(ValidationError::FormOutOfRange { side, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_catalog_teams_and_boundary_form() {
        assert!(validate(&MatchInput::new("Real Madrid", "Sevilla", 0.0, 3.0)).is_ok());
        let checked = check(&MatchInput::new(" girona", "CADIZ ", 1.4, 2.2)).unwrap();
        assert_eq!(checked.home_team, "Girona");
        assert_eq!(checked.away_team, "Cadiz");
    }

    #[test]
    fn rejects_unknown_team_on_either_side() {
        assert_eq!(
            validate(&MatchInput::new("Arsenal", "Sevilla", 1.0, 1.0)),
            Err(ValidationError::UnknownTeam {
                side: Side::Home,
                name: "Arsenal".into()
            })
        );
        let err = validate(&MatchInput::new("Sevilla", "", 1.0, 1.0)).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownTeam { side: Side::Away, .. }));
    }

    #[test]
    fn rejects_form_outside_range() {
        for bad in [-0.1, 3.01, f64::NAN, f64::INFINITY] {
            let err = validate(&MatchInput::new("Getafe", "Eibar", 1.0, bad)).unwrap_err();
            assert!(
                matches!(err, ValidationError::FormOutOfRange { side: Side::Away, .. }),
                "{bad} should be rejected"
            );
        }
        let err = validate(&MatchInput::new("Getafe", "Eibar", 3.5, 1.0)).unwrap_err();
        assert!(matches!(err, ValidationError::FormOutOfRange { side: Side::Home, .. }));
    }

    #[test]
    fn form_defaults_when_omitted_in_json() {
        let input: MatchInput =
            serde_json::from_str(r#"{"home_team":"Elche","away_team":"Levante"}"#).unwrap();
        assert_eq!(input.home_form_avg, DEFAULT_FORM);
        assert_eq!(input.away_form_avg, DEFAULT_FORM);

        let input: MatchInput = serde_json::from_str(
            r#"{"home_team":"Elche","away_team":"Levante","home_form_points_avg":2.0}"#,
        )
        .unwrap();
        assert_eq!(input.home_form_avg, 2.0);
    }
}
