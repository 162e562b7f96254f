//! Races catalog: `Race` and its `Position` roster slots.
//!
//! Catalog entities are immutable after seeding (see `cache_builder` and
//! `data/races.yaml`) — no `validate` method here, since nothing a client
//! submits can mutate them.

use serde::{Deserialize, Serialize};

/// A playable race. Attributes are catalog data, not gameplay state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Race {
    /// Unique singular name, e.g. "Orc".
    pub singular: String,
    /// Plural name, e.g. "Orcs".
    pub plural: String,
    /// Currency cost of one team reroll for this race.
    pub reroll_cost: u32,
    pub positions: Vec<Position>,
}

impl Race {
    pub fn position(&self, title: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.title == title)
    }
}

/// Base stat block shared by `Position` and `Player`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub ma: u8,
    pub st: u8,
    pub ag: u8,
    pub av: u8,
}

/// A roster slot belonging to one `Race`, e.g. "Blitzer" or "Lineman".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub title: String,
    /// Informational tag naming the owning race; redundant with the
    /// enclosing `Race.singular` but kept since a `Player` snapshots it
    /// independently of its `Race`.
    pub race: String,
    pub max_quantity: u32,
    pub cost: u32,
    pub stats: BaseStats,
    /// Comma-delimited starting skill list, parsed via `SkillSet::from_comma_list`.
    pub skills: String,
    /// Subset of `{G,A,S,P}` categories rollable on a normal skill-up.
    pub normal_skills: String,
    /// Subset of `{G,A,S,P}` categories rollable on a double skill-up.
    pub double_skills: String,
}
