//! `PlayerInGame` (PIG): the mutable, per-match instance of a `Player`.
//!
//! The source tracks remaining movement as a single integer that is driven
//! negative as an implicit "no go-for-it attempts left" sentinel
//! (`move_left == -2`). This model keeps the counter itself non-negative —
//! `moves_remaining: u32` — and tracks overdraft ("go for it" attempts
//! taken after normal movement is exhausted) in a separate, explicitly
//! bounded `go_for_it_overrun` field. `finished_action` is still set
//! explicitly at each mutation site per each step kind's rules, never
//! inferred from the counters elsewhere.

use serde::{Deserialize, Serialize};

use super::match_state::Side;
use super::race::BaseStats;
use super::skill::SkillSet;

/// A PIG's current action, mirroring the source's free-text `action` field
/// but restricted to the tags the resolver actually assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayerAction {
    Move,
    Blitz,
    Block,
    Pass,
    HandOff,
    Foul,
    StandUp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInGame {
    pub side: Side,
    pub number: i32,

    pub xpos: Option<i32>,
    pub ypos: Option<i32>,

    pub stats: BaseStats,
    pub skills: SkillSet,
    /// Runtime effects (e.g. `Bone-head`), distinct from permanent `skills`.
    pub effects: SkillSet,

    pub action: Option<PlayerAction>,
    moves_remaining: u32,
    /// "Go for it" attempts taken with no movement left, 0..=2. Reaching 2
    /// is the non-sentinel equivalent of the source's `move_left == -2`.
    go_for_it_overrun: u8,

    pub finished_action: bool,
    pub down: bool,
    pub stunned: bool,
    pub stunned_this_turn: bool,
    pub has_ball: bool,
    pub on_pitch: bool,
    pub knocked_out: bool,
    pub casualty: bool,
    pub sent_off: bool,
    pub tackle_zones: bool,
}

impl PlayerInGame {
    pub fn fresh(side: Side, number: i32, stats: BaseStats, skills: SkillSet) -> Self {
        PlayerInGame {
            side,
            number,
            xpos: None,
            ypos: None,
            stats,
            skills,
            effects: SkillSet::new(),
            action: None,
            moves_remaining: stats.ma as u32,
            go_for_it_overrun: 0,
            finished_action: false,
            down: false,
            stunned: false,
            stunned_this_turn: false,
            has_ball: false,
            on_pitch: false,
            knocked_out: false,
            casualty: false,
            sent_off: false,
            tackle_zones: false,
        }
    }

    pub fn moves_remaining(&self) -> u32 {
        self.moves_remaining
    }

    pub fn go_for_it_overrun(&self) -> u8 {
        self.go_for_it_overrun
    }

    /// Reset movement for a fresh turn (endTurn / kickoff reset): full
    /// allowance restored, no overrun recorded, action cleared.
    pub fn reset_for_turn(&mut self) {
        self.moves_remaining = self.stats.ma as u32;
        self.go_for_it_overrun = 0;
        self.action = None;
        self.finished_action = false;
    }

    /// Consumes `n` movement points, capping overdraft at 2 — the same
    /// point at which the source's `move_left` arithmetic reaches -2.
    /// Returns the resulting overrun so callers can apply their own
    /// per-step-kind `finished_action` rule (a single `move`
    /// checks `== -2`-equivalent i.e. overrun reaching exactly 2 on this
    /// call; `standUp`'s 3-point consumption checks `<= -2`-equivalent,
    /// i.e. overrun reaching at least 2).
    pub fn consume_move_points(&mut self, n: u32) -> u8 {
        let deficit = n.saturating_sub(self.moves_remaining);
        self.moves_remaining = self.moves_remaining.saturating_sub(n);
        self.go_for_it_overrun = (self.go_for_it_overrun + deficit as u8).min(2);
        self.go_for_it_overrun
    }

    /// Tackle-zone-less, ball-less, grounded. Invariant:
    /// `down ⇒ ¬tackle_zones ∧ ¬has_ball`.
    pub fn knock_down(&mut self) {
        self.down = true;
        self.tackle_zones = false;
        self.has_ball = false;
    }
}
