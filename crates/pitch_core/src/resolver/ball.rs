//! `scatter`, `catch`, `pass`, `handOff`, `throwin`.

use crate::dice::DiceSource;
use crate::error::Result;
use crate::geometry::{find_pass_range, on_pitch, throwin_compass_delta, Edge};
use crate::models::skill::Skill;
use crate::models::step::{PlayerRef, StepResult};
use crate::rolls::{roll_agility, roll_scatter};
use crate::spatial::tackle_zones_on;
use crate::store::MatchContext;

pub fn resolve_scatter(ctx: &mut MatchContext, dice: &mut impl DiceSource, n_scatter: u32) -> Result<StepResult> {
    let (x0, y0) = (ctx.match_.x_ball.unwrap_or(0), ctx.match_.y_ball.unwrap_or(0));
    let roll = roll_scatter(dice, n_scatter, x0, y0);
    let mut result = StepResult::default();
    result.dice = Some(roll.dice);
    result.last_x = Some(roll.last_on_pitch.0);
    result.last_y = Some(roll.last_on_pitch.1);
    result.x1 = Some(roll.final_pos.0);
    result.y1 = Some(roll.final_pos.1);
    ctx.match_.x_ball = Some(roll.final_pos.0);
    ctx.match_.y_ball = Some(roll.final_pos.1);
    Ok(result)
}

pub fn resolve_catch(ctx: &mut MatchContext, dice: &mut impl DiceSource, player: PlayerRef, accurate: bool) -> Result<StepResult> {
    let mut result = StepResult::default();
    let all = ctx.pigs.clone();
    let p = ctx.find_pig(player.side, player.num)?;

    if p.down || p.effects.has(&Skill::BoneHead) || p.effects.has(&Skill::ReallyStupid) {
        result.success = Some(false);
        return Ok(result);
    }

    let tz = tackle_zones_on(p, all.iter(), None);
    let modifier = if accurate { 1 } else { 0 } - tz as i32;
    let roll = roll_agility(dice, p.stats.ag, modifier);
    result.raw_result = Some(roll.raw_result);
    result.modified_result = Some(roll.modified_result);
    result.required_result = Some(roll.required_result);
    result.success = Some(roll.success);
    if roll.success {
        ctx.find_ref_mut(player)?.has_ball = true;
    }
    Ok(result)
}

pub fn resolve_pass(ctx: &mut MatchContext, dice: &mut impl DiceSource, thrower: PlayerRef, x1: i32, y1: i32) -> Result<StepResult> {
    let mut result = StepResult::default();
    let all = ctx.pigs.clone();
    let p = ctx.find_pig(thrower.side, thrower.num)?;
    let (x0, y0) = (p.xpos.unwrap_or(0), p.ypos.unwrap_or(0));

    let range = find_pass_range(dx_abs(x0, x1), dy_abs(y0, y1));
    result.range_class = Some(format!("{range:?}"));

    let tz = tackle_zones_on(p, all.iter(), None);
    let modifier = range.modifier() - tz as i32;
    let roll = roll_agility(dice, p.stats.ag, modifier);
    result.raw_result = Some(roll.raw_result);
    result.modified_result = Some(roll.modified_result);
    result.required_result = Some(roll.required_result);
    result.success = Some(roll.success);

    // A raw roll of 1, or any modified result of 1 or less, is a hard fumble
    // rather than a scatter from the target square — the ball stays put.
    let fumble = roll.raw_result == 1 || roll.modified_result <= 1;
    result.extra.insert("fumble".into(), serde_json::Value::Bool(fumble));

    if !fumble {
        ctx.match_.x_ball = Some(x1);
        ctx.match_.y_ball = Some(y1);
    }

    let pig = ctx.find_ref_mut(thrower)?;
    pig.has_ball = false;
    pig.finished_action = true;
    Ok(result)
}

pub fn resolve_hand_off(ctx: &mut MatchContext, thrower: PlayerRef, target: PlayerRef, x1: i32, y1: i32) -> Result<StepResult> {
    ctx.find_ref_mut(thrower)?.has_ball = false;
    ctx.find_ref_mut(target)?.has_ball = true;
    ctx.match_.x_ball = Some(x1);
    ctx.match_.y_ball = Some(y1);
    ctx.find_ref_mut(thrower)?.finished_action = true;
    Ok(StepResult::default())
}

/// A throw-in happens whenever the ball's last on-pitch square and the
/// off-pitch destination agree on which edge was crossed; the client is
/// expected to have supplied a `scatter` beforehand to determine that edge.
pub fn resolve_throwin(ctx: &mut MatchContext, dice: &mut impl DiceSource) -> Result<StepResult> {
    let (x0, y0) = (ctx.match_.x_ball.unwrap_or(0), ctx.match_.y_ball.unwrap_or(0));
    let edge = Edge::from_point(x0, y0).unwrap_or(Edge::Top);

    let direction = dice.roll_one(3);
    let (dx, dy) = throwin_compass_delta(direction, edge);
    let distance_dice = dice.roll(6, 2);
    let distance: i32 = distance_dice.iter().map(|&v| v as i32).sum();

    let mut x = x0 + dx * distance;
    let mut y = y0 + dy * distance;
    while !on_pitch(x, y) {
        x -= dx;
        y -= dy;
    }

    ctx.match_.x_ball = Some(x);
    ctx.match_.y_ball = Some(y);

    let mut result = StepResult::default();
    result.raw_result = Some(direction as i32);
    result.dice = Some(distance_dice);
    result.x1 = Some(x);
    result.y1 = Some(y);
    Ok(result)
}

fn dx_abs(x0: i32, x1: i32) -> i32 {
    (x1 - x0).abs()
}

fn dy_abs(y0: i32, y1: i32) -> i32 {
    (y1 - y0).abs()
}
