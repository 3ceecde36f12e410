//! The fixed set of La Liga clubs the models were trained on.

use serde::Serialize;
use std::fmt;

/// Club names in the order the training data listed them.
pub const TEAMS: [&str; 31] = [
    "Malaga",
    "Sevilla",
    "Granada",
    "Almeria",
    "Eibar",
    "Barcelona",
    "Celta Vigo",
    "Levante",
    "Real Madrid",
    "Rayo Vallecano",
    "Getafe",
    "Valencia",
    "Cordoba",
    "Athletic Club",
    "Atletico Madrid",
    "Espanyol",
    "Villarreal",
    "Deportivo La Coruna",
    "Real Sociedad",
    "Elche",
    "Sporting Gijon",
    "Real Betis",
    "Las Palmas",
    "Osasuna",
    "Leganes",
    "Alaves",
    "Girona",
    "Real Valladolid",
    "SD Huesca",
    "Mallorca",
    "Cadiz",
];

/// Which side of the fixture a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Home => write!(f, "home"),
            Side::Away => write!(f, "away"),
        }
    }
}

/// Read-only view over [`TEAMS`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TeamCatalog;

impl TeamCatalog {
    pub fn names(&self) -> &'static [&'static str] {
        &TEAMS
    }

    pub fn len(&self) -> usize {
        TEAMS.len()
    }

    /// Map user input onto the canonical catalog spelling.
    ///
    /// Surrounding whitespace is ignored and the comparison is
    /// case-insensitive, so `" real madrid "` resolves to `"Real Madrid"`.
    pub fn resolve(&self, name: &str) -> Option<&'static str> {
        let wanted = name.trim();
        TEAMS
            .iter()
            .copied()
            .find(|team| team.eq_ignore_ascii_case(wanted))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Names in byte order, which is the order a label encoder assigns codes in.
    pub fn sorted(&self) -> Vec<&'static str> {
        let mut names = TEAMS.to_vec();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_31_distinct_teams() {
        let unique: HashSet<_> = TEAMS.iter().collect();
        assert_eq!(TeamCatalog.len(), 31);
        assert_eq!(unique.len(), 31);
    }

    #[test]
    fn resolve_trims_and_ignores_case() {
        assert_eq!(TeamCatalog.resolve("  real madrid "), Some("Real Madrid"));
        assert_eq!(TeamCatalog.resolve("SD HUESCA"), Some("SD Huesca"));
        assert_eq!(TeamCatalog.resolve("Real"), None);
        assert_eq!(TeamCatalog.resolve(""), None);
    }

    #[test]
    fn sorted_matches_label_encoder_order() {
        let sorted = TeamCatalog.sorted();
        assert_eq!(sorted.first(), Some(&"Alaves"));
        assert_eq!(sorted.last(), Some(&"Villarreal"));
        let huesca = sorted.iter().position(|t| *t == "SD Huesca");
        let sevilla = sorted.iter().position(|t| *t == "Sevilla");
        assert!(huesca < sevilla);
    }
}
