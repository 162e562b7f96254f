//! Races catalog seeding: the six playable races and their position tables
//! are data, not code. `races.yaml` holds that table; this module only
//! knows how to parse it.

use once_cell::sync::OnceCell;

use crate::models::race::Race;

/// `races.yaml` embedded at compile time for zero-file-IO loading.
const RACES_YAML: &str = include_str!("../../data/races.yaml");

static PARSED_EMBEDDED_RACES: OnceCell<Vec<Race>> = OnceCell::new();

/// Parses the embedded catalog, caching the result after the first call.
/// Fails only if `races.yaml` itself is malformed — this is fixed seed data,
/// not user input.
pub fn load_embedded_races() -> Result<Vec<Race>, serde_yaml::Error> {
    if let Some(cached) = PARSED_EMBEDDED_RACES.get() {
        return Ok(cached.clone());
    }
    let races: Vec<Race> = serde_yaml::from_str(RACES_YAML)?;
    Ok(PARSED_EMBEDDED_RACES.get_or_init(|| races).clone())
}

/// Parses an arbitrary YAML source in the same shape, for a `cache_builder`-style
/// pipeline that regenerates the catalog from an external file.
pub fn parse_races_yaml(source: &str) -> Result<Vec<Race>, serde_yaml::Error> {
    serde_yaml::from_str(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_has_the_six_source_races() {
        let races = load_embedded_races().expect("races.yaml parses");
        let names: Vec<&str> = races.iter().map(|r| r.singular.as_str()).collect();
        for expected in ["amazon", "high-elf", "human", "khemri", "orc", "undead"] {
            assert!(names.contains(&expected), "missing race {expected}");
        }
    }

    #[test]
    fn every_position_has_a_non_empty_title_and_positive_cost() {
        let races = load_embedded_races().unwrap();
        for race in &races {
            assert!(!race.positions.is_empty());
            for position in &race.positions {
                assert!(!position.title.is_empty());
                assert!(position.cost > 0);
                assert!(position.max_quantity > 0);
            }
        }
    }

    #[test]
    fn human_lineman_matches_source_stats() {
        let races = load_embedded_races().unwrap();
        let human = races.iter().find(|r| r.singular == "human").unwrap();
        let lineman = human.position("Lineman").unwrap();
        assert_eq!(lineman.stats.ma, 6);
        assert_eq!(lineman.stats.st, 3);
        assert_eq!(lineman.stats.ag, 3);
        assert_eq!(lineman.stats.av, 8);
        assert_eq!(lineman.cost, 50);
    }
}
