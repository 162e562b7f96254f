//! `Team`: a coach-owned roster plus the starting-team validity check.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::player::Player;
use super::race::Race;
use crate::error::{MatchError, Result};

/// Coach identity, opaque to the core. Real identity/auth is an external
/// collaborator; the core only needs something hashable/comparable to gate
/// step authority against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoachId(pub uuid::Uuid);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamColours {
    pub home_primary: String,
    pub home_secondary: String,
    pub away_primary: String,
    pub away_secondary: String,
}

#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct Team {
    #[validate(length(min = 1))]
    pub name: String,
    /// URL-safe, unique among all teams. See `Team::create`.
    pub slug: String,
    pub race: String,
    #[validate(range(min = 0))]
    pub cash: i64,
    pub rerolls: u32,
    pub colours: TeamColours,
    pub coach: CoachId,
    pub players: Vec<Player>,
    /// Derived by `update_value`; not independently settable by a client.
    pub value: i64,
}

impl Team {
    /// Recomputes `value` from the roster, reroll count and cash, mirroring
    /// the source's `Team.update_value`. Requires the owning `Race` for its
    /// reroll cost.
    pub fn update_value(&mut self, race: &Race) {
        self.value = Self::compute_value(&self.players, self.rerolls, self.cash, race);
    }

    pub fn compute_value(players: &[Player], rerolls: u32, cash: i64, race: &Race) -> i64 {
        let player_value: i64 = players.iter().map(|p| p.value as i64).sum();
        player_value + rerolls as i64 * race.reroll_cost as i64 + cash
    }

    /// Slugifies `name`, appending `-1`, `-2`, ... on collision against
    /// `existing` — a pure reimplementation of the source's `create_team`
    /// slug loop, driven by a lookup the `Store` supplies instead of a
    /// live query.
    pub fn unique_slug(name: &str, existing: &dyn Fn(&str) -> bool) -> String {
        let base = slugify(name);
        if !existing(&base) {
            return base;
        }
        let mut i = 1u32;
        loop {
            let candidate = format!("{base}-{i}");
            if !existing(&candidate) {
                return candidate;
            }
            i += 1;
        }
    }

    /// A *valid starting team*: at least 11 players, non-negative
    /// cash, value exactly 1000, distinct colours, non-empty and unique
    /// player names, and per-position rosters within `max_quantity`.
    pub fn validate_starting_team(&self, race: &Race) -> Result<()> {
        self.validate()
            .map_err(|e| MatchError::InvalidStep(e.to_string()))?;

        if self.players.len() < 11 {
            return Err(MatchError::InvalidStep(format!(
                "starting team needs at least 11 players, found {}",
                self.players.len()
            )));
        }
        if self.value != 1000 {
            return Err(MatchError::InvalidStep(format!(
                "starting team value must be 1000, got {}",
                self.value
            )));
        }
        let c = &self.colours;
        if c.home_primary == c.away_primary
            || c.home_primary == c.home_secondary
            || c.away_primary == c.away_secondary
        {
            return Err(MatchError::InvalidStep(
                "home/away primary colours must be distinct from each other and their own secondary".into(),
            ));
        }

        let mut seen_names: Vec<&str> = Vec::with_capacity(self.players.len());
        let mut position_tally: HashMap<&str, u32> = HashMap::new();
        for player in &self.players {
            if player.name.is_empty() {
                return Err(MatchError::InvalidStep("player name must not be empty".into()));
            }
            if seen_names.contains(&player.name.as_str()) {
                return Err(MatchError::InvalidStep(format!(
                    "duplicate player name '{}'",
                    player.name
                )));
            }
            seen_names.push(&player.name);

            let tally = position_tally.entry(player.position_title.as_str()).or_insert(0);
            *tally += 1;
            if let Some(position) = race.position(&player.position_title) {
                if *tally > position.max_quantity {
                    return Err(MatchError::InvalidStep(format!(
                        "too many players at position '{}': max {}",
                        player.position_title, position.max_quantity
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Minimal ASCII slugifier matching Django's `slugify` closely enough for
/// the inputs this core accepts (team names): lowercase, non-alphanumerics
/// collapsed to single hyphens, no leading/trailing hyphens.
fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_was_hyphen = true; // suppresses a leading hyphen
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            out.push('-');
            last_was_hyphen = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}
