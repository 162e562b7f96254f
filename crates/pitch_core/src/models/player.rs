//! `Player`: a persistent roster member, snapshotted from a `Position` at
//! creation. Stats are immutable during a match — `PlayerInGame` (see
//! `models::pig`) is the mutable per-match instance.

use serde::{Deserialize, Serialize};

use super::race::{BaseStats, Position, Race};
use super::skill::SkillSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Informational race tag, copied from the position at creation.
    pub race: String,
    pub position_title: String,
    pub number: i32,
    pub value: u32,
    pub stats: BaseStats,
    pub skills: SkillSet,
    pub normal_skills: String,
    pub double_skills: String,

    pub games: u32,
    pub spps: u32,
    pub completions: u32,
    pub casualties: u32,
    pub interceptions: u32,
    pub touchdowns: u32,
    pub mvps: u32,
    pub niggles: u32,
    pub dead: bool,
}

impl Player {
    /// Snapshots a `Position` into a new roster `Player`, mirroring the
    /// source's `create_player`.
    pub fn from_position(race: &Race, position: &Position, name: String, number: i32) -> Self {
        Player {
            name,
            race: race.singular.clone(),
            position_title: position.title.clone(),
            number,
            value: position.cost,
            stats: position.stats,
            skills: SkillSet::from_comma_list(&position.skills),
            normal_skills: position.normal_skills.clone(),
            double_skills: position.double_skills.clone(),
            games: 0,
            spps: 0,
            completions: 0,
            casualties: 0,
            interceptions: 0,
            touchdowns: 0,
            mvps: 0,
            niggles: 0,
            dead: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_position_copies_base_stats_and_skills() {
        let race = Race {
            singular: "Human".into(),
            plural: "Humans".into(),
            reroll_cost: 50_000,
            positions: vec![Position {
                title: "Blitzer".into(),
                race: "Human".into(),
                max_quantity: 4,
                cost: 90_000,
                stats: BaseStats { ma: 7, st: 3, ag: 3, av: 8 },
                skills: "Block".into(),
                normal_skills: "GS".into(),
                double_skills: "AP".into(),
            }],
        };
        let position = race.position("Blitzer").unwrap();
        let player = Player::from_position(&race, position, "Rock".into(), 4);
        assert_eq!(player.stats.st, 3);
        assert!(player.skills.has(&super::super::skill::Skill::Block));
        assert_eq!(player.value, 90_000);
    }
}
