//! `block`, `selectBlockDice`, `knockDown`, `foul`.

use crate::dice::DiceSource;
use crate::error::Result;
use crate::models::pig::PlayerAction;
use crate::models::skill::Skill;
use crate::models::step::{BlockDiceFace, MightyBlowMode, PlayerRef, StepProperties, StepResult};
use crate::rolls::{roll_armour, roll_block_dice, roll_injury};
use crate::spatial::count_assists;
use crate::store::MatchContext;

use super::movement::apply_injury_outcome;

fn dice_count(attack_st: i32, defence_st: i32) -> u32 {
    if attack_st >= 2 * defence_st {
        3
    } else if attack_st > defence_st {
        2
    } else if defence_st >= 2 * attack_st {
        3
    } else if defence_st > attack_st {
        2
    } else {
        1
    }
}

pub fn resolve_block(
    ctx: &mut MatchContext,
    dice: &mut impl DiceSource,
    attacker: PlayerRef,
    defender: PlayerRef,
    action: PlayerAction,
) -> Result<StepResult> {
    let all = ctx.pigs.clone();
    let attacker_pig = ctx.find_pig(attacker.side, attacker.num)?;
    let defender_pig = ctx.find_pig(defender.side, defender.num)?;

    let raw_attack_st = attacker_pig.stats.st as i32;
    let raw_defence_st = defender_pig.stats.st as i32;
    let attack_st = raw_attack_st + count_assists(all.iter(), attacker_pig, defender_pig) as i32;
    let defence_st = raw_defence_st + count_assists(all.iter(), defender_pig, attacker_pig) as i32;

    let n_dice = dice_count(attack_st, defence_st);
    let roll = roll_block_dice(dice, n_dice);

    let mut result = StepResult::default();
    result.raw_attack_st = Some(raw_attack_st);
    result.raw_defence_st = Some(raw_defence_st);
    result.attack_st = Some(attack_st);
    result.defence_st = Some(defence_st);
    result.n_dice = Some(roll.n_dice);
    result.block_dice = Some(roll.dice);

    let pig = ctx.find_ref_mut(attacker)?;
    if matches!(action, PlayerAction::Blitz) {
        pig.consume_move_points(1);
    }
    let overrun = pig.go_for_it_overrun();
    if overrun == 2 || !matches!(action, PlayerAction::Blitz) {
        pig.finished_action = true;
    }

    Ok(result)
}

/// `perpetrator_is_defender` is true when the Mighty Blow holder is acting
/// in the defender's role of the original block (i.e. the attacker is the
/// one falling down) — the source records `mightyBlow = 'armour'` only in
/// that inverted case, and `mightyBlow = true` (here: the `Injury`
/// modifier) for the ordinary attacker-knocks-down-defender case. See
/// `define_knock_down`.
fn mighty_blow_mode(ctx: &MatchContext, perpetrator: PlayerRef, perpetrator_is_defender: bool) -> Result<Option<MightyBlowMode>> {
    let has_mighty_blow = {
        let p = ctx.find_pig(perpetrator.side, perpetrator.num)?;
        p.skills.has(&Skill::MightyBlow) || p.effects.has(&Skill::MightyBlow)
    };
    if !has_mighty_blow {
        return Ok(None);
    }
    if perpetrator_is_defender {
        Ok(Some(MightyBlowMode::Armour))
    } else {
        Ok(Some(MightyBlowMode::Injury))
    }
}

/// Expands a selected block-dice face into the `nextStep` list.
pub fn resolve_select_block_dice(
    ctx: &mut MatchContext,
    attacker: PlayerRef,
    defender: PlayerRef,
    selected: BlockDiceFace,
) -> Result<StepResult> {
    let mut result = StepResult::default();
    let attacker_has_block = {
        let p = ctx.find_pig(attacker.side, attacker.num)?;
        p.skills.has(&Skill::Block) || p.effects.has(&Skill::Block)
    };
    let defender_has_block = {
        let p = ctx.find_pig(defender.side, defender.num)?;
        p.skills.has(&Skill::Block) || p.effects.has(&Skill::Block)
    };
    let defender_has_dodge = {
        let p = ctx.find_pig(defender.side, defender.num)?;
        p.skills.has(&Skill::Dodge) || p.effects.has(&Skill::Dodge)
    };

    match selected {
        BlockDiceFace::AttackerDown => {
            let mighty_blow = mighty_blow_mode(ctx, defender, true)?;
            result.next_step.push(StepProperties::KnockDown { player: attacker, mighty_blow });
        }
        BlockDiceFace::BothDown => {
            if !defender_has_block {
                let mighty_blow = mighty_blow_mode(ctx, attacker, false)?;
                result.next_step.push(StepProperties::KnockDown { player: defender, mighty_blow });
            }
            if !attacker_has_block {
                let mighty_blow = mighty_blow_mode(ctx, defender, true)?;
                result.next_step.push(StepProperties::KnockDown { player: attacker, mighty_blow });
            }
        }
        BlockDiceFace::Pushed => {
            result.next_step.push(push_step(ctx, defender)?);
            result.next_step.push(StepProperties::FollowUp { player: attacker, choice: false });
        }
        BlockDiceFace::DefenderStumbles => {
            result.next_step.push(push_step(ctx, defender)?);
            result.next_step.push(StepProperties::FollowUp { player: attacker, choice: false });
            if !defender_has_dodge {
                let mighty_blow = mighty_blow_mode(ctx, attacker, false)?;
                result.next_step.push(StepProperties::KnockDown { player: defender, mighty_blow });
            }
        }
        BlockDiceFace::DefenderDown => {
            result.next_step.push(push_step(ctx, defender)?);
            result.next_step.push(StepProperties::FollowUp { player: attacker, choice: false });
            let mighty_blow = mighty_blow_mode(ctx, attacker, false)?;
            result.next_step.push(StepProperties::KnockDown { player: defender, mighty_blow });
        }
    }
    Ok(result)
}

fn push_step(ctx: &MatchContext, defender: PlayerRef) -> Result<StepProperties> {
    let p = ctx.find_pig(defender.side, defender.num)?;
    let (x0, y0) = (p.xpos.unwrap_or(0), p.ypos.unwrap_or(0));
    // The server trusts the client's chosen push square but re-validates
    // adjacency at the authority/history layer; here we echo the current
    // square as a placeholder the client overwrites with the actual choice
    // before submission as its own `push` step.
    Ok(StepProperties::Push { player: defender, x1: x0, y1: y0, off_pitch: false })
}

pub fn resolve_knock_down(ctx: &mut MatchContext, dice: &mut impl DiceSource, player: PlayerRef, mighty_blow: Option<MightyBlowMode>) -> Result<StepResult> {
    let mut result = StepResult::default();
    let av = {
        let pig = ctx.find_ref_mut(player)?;
        pig.knock_down();
        pig.stats.av
    };

    let armour_modifier = if matches!(mighty_blow, Some(MightyBlowMode::Armour)) { 1 } else { 0 };
    let armour = roll_armour(dice, av, armour_modifier);
    result.raw_result = Some(armour.raw_result);
    result.modified_result = Some(armour.modified_result);
    result.success = Some(armour.success);

    if armour.success {
        let (skills, effects) = {
            let p = ctx.find_pig(player.side, player.num)?;
            (p.skills.clone(), p.effects.clone())
        };
        let injury_modifier = if matches!(mighty_blow, Some(MightyBlowMode::Injury)) { 1 } else { 0 };
        let injury = roll_injury(dice, |s| skills.has(s) || effects.has(s), injury_modifier);
        result.injury_roll = Some(injury.outcome);
        apply_injury_outcome(ctx, player, &injury)?;
    }

    Ok(result)
}

pub fn resolve_foul(
    ctx: &mut MatchContext,
    dice: &mut impl DiceSource,
    attacker: PlayerRef,
    defender: PlayerRef,
) -> Result<StepResult> {
    let all = ctx.pigs.clone();
    let attacker_pig = ctx.find_pig(attacker.side, attacker.num)?;
    let defender_pig = ctx.find_pig(defender.side, defender.num)?;
    let modifier =
        count_assists(all.iter(), attacker_pig, defender_pig) as i32 - count_assists(all.iter(), defender_pig, attacker_pig) as i32;
    let av = defender_pig.stats.av;

    let armour = roll_armour(dice, av, modifier);
    let mut result = StepResult::default();
    result.raw_result = Some(armour.raw_result);
    result.modified_result = Some(armour.modified_result);
    result.success = Some(armour.success);
    // A ref catches a foul whenever either the armour dice or (if rolled)
    // the injury dice come up a double, independent of whether armour
    // actually broke (S5).
    let armour_double = armour.dice.len() == 2 && armour.dice[0] == armour.dice[1];
    let mut injury_double = false;

    if armour.success {
        let (skills, effects) = {
            let p = ctx.find_pig(defender.side, defender.num)?;
            (p.skills.clone(), p.effects.clone())
        };
        let injury = roll_injury(dice, |s| skills.has(s) || effects.has(s), 0);
        injury_double = injury.dice.len() == 2 && injury.dice[0] == injury.dice[1];
        result.injury_roll = Some(injury.outcome);
        apply_injury_outcome(ctx, defender, &injury)?;
    }

    result.sent_off = Some(armour_double || injury_double);

    if result.sent_off == Some(true) {
        ctx.find_ref_mut(attacker)?.sent_off = true;
        ctx.find_ref_mut(attacker)?.on_pitch = false;
    }

    Ok(result)
}
