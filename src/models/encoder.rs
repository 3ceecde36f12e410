//! Label encoder for team names.
//!
//! Codes are fixed when the table is loaded and never refit, so the same name
//! always maps to the same code no matter which side it is on.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::bundle::InvalidArtifact;
use super::{ModelError, TeamEncoder};
use crate::teams::TeamCatalog;

/// On-disk form: code `i` belongs to `classes[i]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderArtifact {
    pub classes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
    codes: HashMap<String, i64>,
}

impl LabelEncoder {
    pub fn from_classes(classes: Vec<String>) -> Result<Self, InvalidArtifact> {
        let mut codes = HashMap::with_capacity(classes.len());
        for (code, name) in classes.iter().enumerate() {
            if codes.insert(name.clone(), code as i64).is_some() {
                return Err(InvalidArtifact(format!("duplicate class {name:?}")));
            }
        }
        Ok(LabelEncoder { classes, codes })
    }

    /// Table covering exactly the catalog, with codes in sorted-name order.
    pub fn for_catalog() -> Self {
        let classes = TeamCatalog
            .sorted()
            .into_iter()
            .map(String::from)
            .enumerate()
            .collect::<Vec<_>>();
        let codes = classes
            .iter()
            .map(|(code, name)| (name.clone(), *code as i64))
            .collect();
        LabelEncoder {
            classes: classes.into_iter().map(|(_, name)| name).collect(),
            codes,
        }
    }

    /// Load a trained table and require it to cover the catalog exactly.
    pub fn from_artifact(artifact: EncoderArtifact) -> Result<Self, InvalidArtifact> {
        let encoder = Self::from_classes(artifact.classes)?;
        if let Some(stray) = encoder.classes.iter().find(|c| !TeamCatalog.contains(c)) {
            return Err(InvalidArtifact(format!("class {stray:?} is not a catalog team")));
        }
        if let Some(missing) = TeamCatalog
            .names()
            .iter()
            .find(|team| !encoder.codes.contains_key(**team))
        {
            return Err(InvalidArtifact(format!("catalog team {missing:?} has no code")));
        }
        Ok(encoder)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn decode(&self, code: i64) -> Option<&str> {
        usize::try_from(code)
            .ok()
            .and_then(|i| self.classes.get(i))
            .map(String::as_str)
    }
}

impl TeamEncoder for LabelEncoder {
    fn encode(&self, team: &str) -> Result<i64, ModelError> {
        self.codes
            .get(team.trim())
            .copied()
            .ok_or_else(|| ModelError::UnknownCategory(team.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::teams::TEAMS;

    #[test]
    fn catalog_encoder_is_total_and_injective() {
        let encoder = LabelEncoder::for_catalog();
        let mut seen = std::collections::HashSet::new();
        for team in TEAMS {
            let code = encoder.encode(team).unwrap();
            assert!((0..31).contains(&code));
            assert!(seen.insert(code), "code {code} reused");
            assert_eq!(encoder.decode(code), Some(team));
        }
    }

    #[test]
    fn codes_follow_sorted_order() {
        let encoder = LabelEncoder::for_catalog();
        assert_eq!(encoder.encode("Alaves").unwrap(), 0);
        assert_eq!(encoder.encode("Real Madrid").unwrap(), 23);
        assert_eq!(encoder.encode("Sevilla").unwrap(), 27);
        assert_eq!(encoder.encode("Villarreal").unwrap(), 30);
    }

    #[test]
    fn encoding_is_stable_across_calls_and_sides() {
        // A refit-per-call encoder would hand every team code 0.
        let encoder = LabelEncoder::for_catalog();
        let home = encoder.encode("Real Madrid").unwrap();
        let away = encoder.encode("Sevilla").unwrap();
        assert_ne!(home, away);
        assert_eq!(encoder.encode("Real Madrid").unwrap(), home);
        assert_eq!(encoder.encode(" Sevilla ").unwrap(), away);
    }

    #[test]
    fn unknown_team_is_an_error() {
        let encoder = LabelEncoder::for_catalog();
        assert_eq!(
            encoder.encode("Manchester City"),
            Err(ModelError::UnknownCategory("Manchester City".into()))
        );
    }

    #[test]
    fn artifact_must_cover_catalog_exactly() {
        let mut classes: Vec<String> = TEAMS.iter().map(|t| t.to_string()).collect();
        assert!(LabelEncoder::from_artifact(EncoderArtifact { classes: classes.clone() }).is_ok());

        classes.pop();
        let err = LabelEncoder::from_artifact(EncoderArtifact { classes: classes.clone() }).unwrap_err();
        assert!(err.0.contains("Cadiz"));

        classes.push("Cadiz".into());
        classes.push("Cadiz".into());
        let err = LabelEncoder::from_artifact(EncoderArtifact { classes }).unwrap_err();
        assert!(err.0.contains("duplicate"));
    }

    #[test]
    fn artifact_with_foreign_team_is_rejected() {
        let mut classes: Vec<String> = TEAMS.iter().map(|t| t.to_string()).collect();
        classes.push("Chelsea".into());
        let err = LabelEncoder::from_artifact(EncoderArtifact { classes }).unwrap_err();
        assert!(err.0.contains("Chelsea"));
    }
}
