//! `Step`: the append-only history record, and the tagged-variant model of
//! its `properties`.
//!
//! The source stores `step_type` as a free string and `properties`/`result`
//! as JSON blobs, dispatching on the string at resolve time. This crate
//! instead represents the submitted body as `StepProperties`, a tagged enum
//! with one payload shape per step kind — the variant enumerates the legal
//! step space and the resolver's `match` over it is exhaustiveness-checked
//! by the compiler (see `resolver::mod`).
//!
//! `result` stays close to the source's free-form dict: the resolver
//! produces different fields per kind and the fields overlap heavily
//! (`success`, dice outcomes, positions), so `StepResult` is a flattened
//! struct of optional fields plus a catch-all map, the way `EventMeta`
//! carries `#[serde(flatten)] additional: HashMap<...>`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::match_state::{MatchId, Side};
use super::pig::PlayerAction;

/// Identifies a PIG by its match-scoped coordinates, used throughout
/// `properties` wherever the source looked a player up via `(side, num)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub side: Side,
    pub num: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockDiceFace {
    AttackerDown,
    BothDown,
    Pushed,
    DefenderStumbles,
    DefenderDown,
}

/// The tagged body of a submitted step. The `action` grouping tag used by
/// `finish_previous_action` lives alongside this on `Step`/
/// `SubmittedStep`, not inside each variant, since it is cross-cutting.
#[derive(Debug, Clone, Serialize, Deserialize, strum_macros::AsRefStr)]
#[serde(tag = "stepType", rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum StepProperties {
    Move { player: PlayerRef, action: PlayerAction, x1: i32, y1: i32, dodge: bool },
    Push { player: PlayerRef, x1: i32, y1: i32, off_pitch: bool },
    FollowUp { player: PlayerRef, choice: bool },
    Block { attacker: PlayerRef, defender: PlayerRef, action: PlayerAction },
    SelectBlockDice { attacker: PlayerRef, defender: PlayerRef, selected_dice: BlockDiceFace },
    Foul { attacker: PlayerRef, defender: PlayerRef },
    KnockDown { player: PlayerRef, mighty_blow: Option<MightyBlowMode> },
    StandUp { player: PlayerRef },
    PickUp { player: PlayerRef },
    Scatter { n_scatter: u32 },
    Catch { player: PlayerRef, accurate: bool },
    Pass { thrower: PlayerRef, x1: i32, y1: i32 },
    HandOff { thrower: PlayerRef, target: PlayerRef, x1: i32, y1: i32 },
    Throwin,
    GoForIt { player: PlayerRef },
    EndTurn { touchdown: bool, scoring_side: Option<Side> },
    SetKickoff,
    PlaceBall { x1: i32, y1: i32 },
    PlacePlayer { player: PlayerRef, x1: Option<i32>, y1: Option<i32>, subs: bool },
    SubmitPlayers,
    SubmitBall,
    Touchback { player: PlayerRef },
    SubmitTouchback,
    EndKickoff,
    Bonehead { player: PlayerRef },
    ReallyStupid { player: PlayerRef },
    Reroll {
        side: Side,
        is_team_reroll: bool,
        player: PlayerRef,
        reroll_step_type: Box<StepProperties>,
    },
}

impl StepProperties {
    /// The step kinds that carry an acting player whose `action` tag is set
    /// on resolution, triggering `finish_previous_action`. Returns
    /// the acting PIG and the `PlayerAction` to assign it.
    pub fn active_action(&self) -> Option<(PlayerRef, PlayerAction)> {
        match *self {
            StepProperties::Move { player, action, .. } => Some((player, action)),
            StepProperties::Block { attacker, action, .. } => Some((attacker, action)),
            StepProperties::StandUp { player } => Some((player, PlayerAction::StandUp)),
            StepProperties::Pass { thrower, .. } => Some((thrower, PlayerAction::Pass)),
            StepProperties::Foul { attacker, .. } => Some((attacker, PlayerAction::Foul)),
            StepProperties::HandOff { thrower, .. } => Some((thrower, PlayerAction::HandOff)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MightyBlowMode {
    Armour,
    Injury,
    Flat,
}

/// The resolver's computed output, merged into the persisted step. Optional
/// fields are populated per step kind; unrecognised/forward-compatible
/// extras flow through `extra` untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_result: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_result: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_result: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_dice: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dice: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_dice: Option<Vec<BlockDiceFace>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_attack_st: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_defence_st: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack_st: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defence_st: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub injury_roll: Option<InjuryOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_off: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_x: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_y: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x1: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y1: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_class: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next_step: Vec<StepProperties>,

    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InjuryOutcome {
    Stunned,
    KnockedOut,
    Casualty,
    Regenerated,
}

/// A persisted history record: `(match_id, history_position)` unique,
/// `history_position` dense and zero-based.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub match_id: MatchId,
    pub history_position: u32,
    /// Groups steps belonging to one player "action" for
    /// `finish_previous_action`; `None` for steps with no acting
    /// player (e.g. `endTurn`).
    pub action_player: Option<PlayerRef>,
    pub properties: StepProperties,
    pub result: StepResult,
}

/// What a client submits, before a `history_position` has necessarily been
/// accepted (it may be rejected as duplicate/resend — see `history.rs`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedStep {
    pub match_id: MatchId,
    pub history_position: u32,
    pub properties: StepProperties,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_properties_round_trip_through_json() {
        let props = StepProperties::Move {
            player: PlayerRef { side: Side::Home, num: 4 },
            action: PlayerAction::Move,
            x1: 10,
            y1: 5,
            dodge: true,
        };
        let json = serde_json::to_string(&props).unwrap();
        assert!(json.contains("\"stepType\":\"move\""));
        let back: StepProperties = serde_json::from_str(&json).unwrap();
        matches!(back, StepProperties::Move { .. });
    }

    #[test]
    fn step_result_omits_unset_optional_fields() {
        let result = StepResult { success: Some(true), ..Default::default() };
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("nDice"));
        assert!(json.contains("\"success\":true"));
    }
}
