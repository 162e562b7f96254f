//! Entity definitions for the match simulation core: `Race`/`Position`
//! (catalog), `Team`/`Player` (roster), `Match`/`PlayerInGame`/`Step`
//! (per-match state), `Challenge` (external input).

pub mod challenge;
pub mod match_state;
pub mod pig;
pub mod player;
pub mod race;
pub mod skill;
pub mod step;
pub mod team;

pub use challenge::Challenge;
pub use match_state::{Direction, Match, MatchId, Side, TurnType};
pub use pig::{PlayerAction, PlayerInGame};
pub use player::Player;
pub use race::{BaseStats, Position, Race};
pub use skill::{Skill, SkillSet};
pub use step::{
    BlockDiceFace, InjuryOutcome, MightyBlowMode, PlayerRef, Step, StepProperties, StepResult,
    SubmittedStep,
};
pub use team::{CoachId, Team, TeamColours};
