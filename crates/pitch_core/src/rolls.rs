//! Block/armour/injury/agility/scatter roll primitives.

use crate::dice::DiceSource;
use crate::models::skill::Skill;
use crate::models::step::{BlockDiceFace, InjuryOutcome};

pub struct BlockRoll {
    pub n_dice: u32,
    pub dice: Vec<BlockDiceFace>,
}

/// Rolls `n` block dice, each `1d6` mapped to a face.
pub fn roll_block_dice(dice: &mut impl DiceSource, n_dice: u32) -> BlockRoll {
    let faces = dice
        .roll(6, n_dice)
        .into_iter()
        .map(|v| match v {
            1 => BlockDiceFace::AttackerDown,
            2 => BlockDiceFace::BothDown,
            3 | 4 => BlockDiceFace::Pushed,
            5 => BlockDiceFace::DefenderStumbles,
            6 => BlockDiceFace::DefenderDown,
            _ => unreachable!("d6 roll out of range"),
        })
        .collect();
    BlockRoll { n_dice, dice: faces }
}

pub struct ArmourRoll {
    pub dice: Vec<u32>,
    pub raw_result: i32,
    pub modified_result: i32,
    pub success: bool,
}

/// `2d6 + modifier`; success iff it exceeds the target's armour value.
pub fn roll_armour(dice: &mut impl DiceSource, av: u8, modifier: i32) -> ArmourRoll {
    let rolled = dice.roll(6, 2);
    let raw_result: i32 = rolled.iter().map(|&v| v as i32).sum();
    let modified_result = raw_result + modifier;
    ArmourRoll { dice: rolled, raw_result, modified_result, success: modified_result > av as i32 }
}

pub struct InjuryRoll {
    pub dice: Vec<u32>,
    pub raw_result: i32,
    pub modified_result: i32,
    pub outcome: InjuryOutcome,
    pub regeneration_roll: Option<(u32, bool)>,
}

/// `2d6 + modifier`, consulting the victim's skills. Regeneration
/// may upgrade a `casualty` outcome to `regenerated` on a 1d6 of 4+.
pub fn roll_injury(dice: &mut impl DiceSource, has_skill: impl Fn(&Skill) -> bool, modifier: i32) -> InjuryRoll {
    let rolled = dice.roll(6, 2);
    let raw_result: i32 = rolled.iter().map(|&v| v as i32).sum();
    let modified_result = raw_result + modifier;
    let thick_skull = has_skill(&Skill::ThickSkull);
    let regeneration = has_skill(&Skill::Regeneration);

    let mut outcome = if modified_result <= 7 || (modified_result == 8 && thick_skull) {
        InjuryOutcome::Stunned
    } else if modified_result <= 9 {
        InjuryOutcome::KnockedOut
    } else {
        InjuryOutcome::Casualty
    };

    let mut regeneration_roll = None;
    if outcome == InjuryOutcome::Casualty && regeneration {
        let roll = dice.roll_one(6);
        let success = roll >= 4;
        regeneration_roll = Some((roll, success));
        if success {
            outcome = InjuryOutcome::Regenerated;
        }
    }

    InjuryRoll { dice: rolled, raw_result, modified_result, outcome, regeneration_roll }
}

pub struct AgilityRoll {
    pub dice: Vec<u32>,
    pub raw_result: i32,
    pub modified_result: i32,
    pub required_result: i32,
    pub success: bool,
}

/// `1d6 + modifier`; raw 1 always fails, raw 6 always succeeds, otherwise
/// success requires `modified_result >= required_result` where
/// `required_result = 7 - min(ag, 6)`.
pub fn roll_agility(dice: &mut impl DiceSource, ag: u8, modifier: i32) -> AgilityRoll {
    let required_result = 7 - ag.min(6) as i32;
    let rolled = dice.roll(6, 1);
    let raw_result = rolled[0] as i32;
    let modified_result = raw_result + modifier;
    let success = if raw_result == 1 {
        false
    } else if raw_result == 6 {
        true
    } else {
        modified_result >= required_result
    };
    AgilityRoll { dice: rolled, raw_result, modified_result, required_result, success }
}

pub struct ScatterRoll {
    pub dice: Vec<u32>,
    pub last_on_pitch: (i32, i32),
    pub final_pos: (i32, i32),
}

/// Runs `n` independent 1d8 scatter steps from `(x0, y0)`, stopping early
/// the moment the point leaves the pitch.
pub fn roll_scatter(dice: &mut impl DiceSource, n: u32, x0: i32, y0: i32) -> ScatterRoll {
    use crate::geometry::{compass_delta, on_pitch};

    let rolled = dice.roll(8, n);
    let mut x = x0;
    let mut y = y0;
    let mut last = (x0, y0);
    for &d in &rolled {
        let prior = (x, y);
        let (dx, dy) = compass_delta(d);
        x += dx;
        y += dy;
        if !on_pitch(x, y) {
            last = prior;
            break;
        }
        last = prior;
    }
    ScatterRoll { dice: rolled, last_on_pitch: last, final_pos: (x, y) }
}
