//! `Match`: the central mutable aggregate, plus its small enums.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique match identity. Distinct from any eventual database primary key —
/// the core is storage-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchId(pub Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn other(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Kickoff-lifecycle phase. `Normal` is the bulk of a turn; the others are
/// the kickoff sub-machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TurnType {
    PlacePlayers,
    PlaceBall,
    Touchback,
    Normal,
    End,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub home_team_slug: String,
    pub away_team_slug: String,

    pub home_score: u32,
    pub away_score: u32,

    /// 1..=17; 17 is a terminal sentinel (`turn_type` becomes `End`).
    pub turn_number: u8,
    pub turn_type: TurnType,
    pub current_side: Side,
    pub first_kicking_team: Side,
    pub home_first_direction: Direction,

    pub x_ball: Option<i32>,
    pub y_ball: Option<i32>,

    pub home_rerolls: u32,
    pub away_rerolls: u32,
    pub home_rerolls_total: u32,
    pub away_rerolls_total: u32,
    pub home_reroll_used_this_turn: bool,
    pub away_reroll_used_this_turn: bool,

    /// Kickoff placement progression counter (2 -> 1 -> 0).
    pub n_to_place: u8,
    pub kicking_team: Side,
}

impl Match {
    pub fn rerolls(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home_rerolls,
            Side::Away => self.away_rerolls,
        }
    }

    pub fn rerolls_mut(&mut self, side: Side) -> &mut u32 {
        match side {
            Side::Home => &mut self.home_rerolls,
            Side::Away => &mut self.away_rerolls,
        }
    }

    pub fn rerolls_total(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home_rerolls_total,
            Side::Away => self.away_rerolls_total,
        }
    }

    pub fn reroll_used_this_turn(&self, side: Side) -> bool {
        match side {
            Side::Home => self.home_reroll_used_this_turn,
            Side::Away => self.away_reroll_used_this_turn,
        }
    }

    pub fn set_reroll_used_this_turn(&mut self, side: Side, used: bool) {
        match side {
            Side::Home => self.home_reroll_used_this_turn = used,
            Side::Away => self.away_reroll_used_this_turn = used,
        }
    }

    pub fn score_mut(&mut self, side: Side) -> &mut u32 {
        match side {
            Side::Home => &mut self.home_score,
            Side::Away => &mut self.away_score,
        }
    }

    /// Which end `side` defends given the current half, per the kickoff
    /// x-band rule restated as a direction query.
    pub fn defends_direction(&self, side: Side, turn_number: u8) -> Direction {
        let home_defends_right = (self.home_first_direction == Direction::Right && turn_number <= 8)
            || (self.home_first_direction == Direction::Left && turn_number >= 9);
        let home_direction = if home_defends_right { Direction::Right } else { Direction::Left };
        match side {
            Side::Home => home_direction,
            Side::Away => home_direction.other(),
        }
    }
}
