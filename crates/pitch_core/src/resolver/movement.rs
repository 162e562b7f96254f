//! `move`, `push`, `followUp`, `standUp`, `pickUp`, `goForIt`.

use crate::dice::DiceSource;
use crate::error::Result;
use crate::models::pig::PlayerAction;
use crate::models::step::{InjuryOutcome, PlayerRef, StepResult};
use crate::rolls::{roll_agility, roll_injury, InjuryRoll};
use crate::spatial::tackle_zones_on;
use crate::store::MatchContext;

pub fn resolve_move(
    ctx: &mut MatchContext,
    dice: &mut impl DiceSource,
    player: PlayerRef,
    action: PlayerAction,
    x1: i32,
    y1: i32,
    dodge: bool,
) -> Result<StepResult> {
    let mut result = StepResult::default();

    if dodge {
        let all = ctx.pigs.clone();
        let p = ctx.find_pig(player.side, player.num)?;
        let tz = tackle_zones_on(p, all.iter(), None);
        let ag = p.stats.ag;
        let roll = roll_agility(dice, ag, 1 - tz as i32);
        result.raw_result = Some(roll.raw_result);
        result.modified_result = Some(roll.modified_result);
        result.required_result = Some(roll.required_result);
        result.success = Some(roll.success);
    } else {
        result.success = Some(true);
    }

    let had_ball = {
        let pig = ctx.find_ref_mut(player)?;
        pig.xpos = Some(x1);
        pig.ypos = Some(y1);
        let overrun = pig.consume_move_points(1);
        if overrun == 2 && matches!(action, PlayerAction::Move | PlayerAction::Blitz) {
            pig.finished_action = true;
        }
        pig.has_ball
    };
    if had_ball {
        ctx.match_.x_ball = Some(x1);
        ctx.match_.y_ball = Some(y1);
    }

    Ok(result)
}

pub fn resolve_push(
    ctx: &mut MatchContext,
    dice: &mut impl DiceSource,
    player: PlayerRef,
    x1: i32,
    y1: i32,
    off_pitch: bool,
) -> Result<StepResult> {
    let mut result = StepResult::default();
    let had_ball = {
        let pig = ctx.find_ref_mut(player)?;
        pig.xpos = Some(x1);
        pig.ypos = Some(y1);
        pig.has_ball
    };
    if had_ball {
        ctx.match_.x_ball = Some(x1);
        ctx.match_.y_ball = Some(y1);
    }
    if off_pitch {
        let (skills, effects) = {
            let pig = ctx.find_pig(player.side, player.num)?;
            (pig.skills.clone(), pig.effects.clone())
        };
        let roll = roll_injury(dice, |s| skills.has(s) || effects.has(s), 0);
        apply_injury_outcome(ctx, player, &roll)?;
        result.injury_roll = Some(roll.outcome);
        ctx.find_ref_mut(player)?.on_pitch = false;
    }
    Ok(result)
}

pub fn apply_injury_outcome(ctx: &mut MatchContext, player: PlayerRef, roll: &InjuryRoll) -> Result<()> {
    let pig = ctx.find_ref_mut(player)?;
    match roll.outcome {
        InjuryOutcome::Stunned => {
            pig.stunned = true;
            pig.stunned_this_turn = true;
        }
        InjuryOutcome::KnockedOut => {
            pig.knocked_out = true;
            pig.on_pitch = false;
        }
        InjuryOutcome::Casualty => {
            pig.casualty = true;
            pig.on_pitch = false;
        }
        InjuryOutcome::Regenerated => {
            pig.casualty = false;
            pig.on_pitch = false;
        }
    }
    Ok(())
}

pub fn resolve_follow_up(ctx: &mut MatchContext, player: PlayerRef, target_square: (i32, i32), choice: bool) -> Result<StepResult> {
    if choice {
        let had_ball = {
            let pig = ctx.find_ref_mut(player)?;
            pig.xpos = Some(target_square.0);
            pig.ypos = Some(target_square.1);
            pig.has_ball
        };
        if had_ball {
            ctx.match_.x_ball = Some(target_square.0);
            ctx.match_.y_ball = Some(target_square.1);
        }
    }
    Ok(StepResult::default())
}

pub fn resolve_stand_up(ctx: &mut MatchContext, dice: &mut impl DiceSource, player: PlayerRef) -> Result<StepResult> {
    let mut result = StepResult::default();
    let (ma, overrun) = {
        let pig = ctx.find_ref_mut(player)?;
        let overrun = pig.consume_move_points(3);
        (pig.stats.ma, overrun)
    };
    if overrun >= 2 {
        ctx.find_ref_mut(player)?.finished_action = true;
    }

    let success = if ma < 3 {
        let roll = dice.roll_one(6);
        result.raw_result = Some(roll as i32);
        roll >= 4
    } else {
        true
    };
    result.success = Some(success);
    if success {
        let pig = ctx.find_ref_mut(player)?;
        pig.down = false;
        pig.tackle_zones = true;
    }
    Ok(result)
}

pub fn resolve_pick_up(ctx: &mut MatchContext, dice: &mut impl DiceSource, player: PlayerRef) -> Result<StepResult> {
    let mut result = StepResult::default();
    let all = ctx.pigs.clone();
    let (tz, ag) = {
        let p = ctx.find_pig(player.side, player.num)?;
        (tackle_zones_on(p, all.iter(), None), p.stats.ag)
    };
    let roll = roll_agility(dice, ag, 1 - tz as i32);
    result.raw_result = Some(roll.raw_result);
    result.modified_result = Some(roll.modified_result);
    result.required_result = Some(roll.required_result);
    result.success = Some(roll.success);
    if roll.success {
        ctx.find_ref_mut(player)?.has_ball = true;
    }
    Ok(result)
}

pub fn resolve_go_for_it(dice: &mut impl DiceSource) -> StepResult {
    let mut result = StepResult::default();
    let roll = dice.roll_one(6);
    result.raw_result = Some(roll as i32);
    result.success = Some(roll != 1);
    result
}
