//! Named constants the rules actually use, kept out of the resolver body.

/// Pitch width in columns (x ranges over `0..PITCH_WIDTH`).
pub const PITCH_WIDTH: i32 = 26;
/// Pitch height in rows (y ranges over `0..PITCH_HEIGHT`).
pub const PITCH_HEIGHT: i32 = 15;

/// Turn number at which a half ends and rerolls refresh.
pub const HALF_BOUNDARY_TURN: u8 = 9;
/// Turn number at which the match ends.
pub const MATCH_END_TURN: u8 = 17;

/// Minimum 1d6 roll that revives a knocked-out player at kickoff.
pub const KNOCK_OUT_REVIVAL_THRESHOLD: u32 = 4;

/// A reroll granted to a player with Loner only takes effect on a 1d6 roll
/// of 4 or higher.
pub const LONER_THRESHOLD: u32 = 4;
