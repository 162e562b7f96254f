//! `endTurn`, `bonehead`, `reallyStupid`, and kickoff boundary handling.

use crate::config::{HALF_BOUNDARY_TURN, KNOCK_OUT_REVIVAL_THRESHOLD, MATCH_END_TURN};
use crate::dice::DiceSource;
use crate::error::Result;
use crate::kickoff::set_kickoff;
use crate::models::match_state::{Side, TurnType};
use crate::models::skill::Skill;
use crate::models::step::{PlayerRef, StepResult};
use crate::spatial::adjacent_any_ally;
use crate::store::MatchContext;

/// Resets the finishing side's PIGs, advances the turn counter, scores a
/// touchdown if one occurred, and drives the kickoff sub-machine at a
/// half/match boundary or after a score.
pub fn resolve_end_turn(
    ctx: &mut MatchContext,
    dice: &mut impl DiceSource,
    touchdown: bool,
    scoring_side: Option<Side>,
) -> Result<StepResult> {
    let finishing_side = ctx.match_.current_side;

    if touchdown {
        if let Some(side) = scoring_side {
            *ctx.match_.score_mut(side) += 1;
        }
    }

    for pig in ctx.pigs.iter_mut().filter(|p| p.side == finishing_side) {
        pig.reset_for_turn();
        pig.stunned_this_turn = false;
    }
    ctx.match_.set_reroll_used_this_turn(finishing_side, false);

    // Revive knocked-out players on both sides on a 1d6 of 4+ whenever a
    // kickoff is about to follow (touchdown, or the half boundary). The
    // match-end boundary (turn_number reaching MATCH_END_TURN) ends the
    // match instead of kicking off, so it does not trigger revival.
    let will_kick_off = touchdown || ctx.match_.turn_number == HALF_BOUNDARY_TURN - 1;
    if will_kick_off {
        for pig in ctx.pigs.iter_mut().filter(|p| p.knocked_out) {
            let roll = dice.roll_one(6);
            if roll >= KNOCK_OUT_REVIVAL_THRESHOLD {
                pig.knocked_out = false;
                pig.on_pitch = true;
            }
        }
    }

    ctx.match_.turn_number += 1;
    ctx.match_.current_side = finishing_side.other();

    let mut result = StepResult::default();
    if ctx.match_.turn_number >= MATCH_END_TURN {
        tracing::info!(match_id = %ctx.match_.id.0, "match end reached");
        ctx.match_.turn_type = TurnType::End;
    } else if touchdown {
        tracing::info!(match_id = %ctx.match_.id.0, ?scoring_side, "touchdown, kicking off again");
        // §4.8's state diagram: "kicker = scoring side" — the team that
        // just scored kicks the restart.
        let kicking_team = scoring_side.unwrap_or(finishing_side);
        set_kickoff(&mut ctx.match_, &mut ctx.pigs, kicking_team);
    } else if ctx.match_.turn_number == HALF_BOUNDARY_TURN {
        tracing::info!(match_id = %ctx.match_.id.0, "half boundary reached, rerolls refreshed");
        ctx.match_.home_rerolls = ctx.match_.home_rerolls_total;
        ctx.match_.away_rerolls = ctx.match_.away_rerolls_total;
        set_kickoff(&mut ctx.match_, &mut ctx.pigs, ctx.match_.first_kicking_team.other());
    }
    result.success = Some(true);
    Ok(result)
}

pub fn resolve_bonehead(ctx: &mut MatchContext, dice: &mut impl DiceSource, player: PlayerRef) -> Result<StepResult> {
    let mut result = StepResult::default();
    let roll = dice.roll_one(6);
    result.raw_result = Some(roll as i32);
    let success = roll >= 2;
    result.success = Some(success);
    let pig = ctx.find_ref_mut(player)?;
    if success {
        pig.tackle_zones = true;
        pig.effects.remove(&Skill::BoneHead);
    } else {
        pig.tackle_zones = false;
        pig.effects.insert(Skill::BoneHead);
        pig.finished_action = true;
    }
    Ok(result)
}

/// Really Stupid requires a 2+ with an adjacent standing ally lending
/// support, else a 4+.
pub fn resolve_really_stupid(ctx: &mut MatchContext, dice: &mut impl DiceSource, player: PlayerRef) -> Result<StepResult> {
    let all = ctx.pigs.clone();
    let has_ally = {
        let p = ctx.find_pig(player.side, player.num)?;
        adjacent_any_ally(p, all.iter())
    };
    let required = if has_ally { 2 } else { 4 };

    let mut result = StepResult::default();
    let roll = dice.roll_one(6);
    result.raw_result = Some(roll as i32);
    result.required_result = Some(required);
    let success = roll as i32 >= required;
    result.success = Some(success);
    let pig = ctx.find_ref_mut(player)?;
    if success {
        pig.tackle_zones = true;
        pig.effects.remove(&Skill::ReallyStupid);
    } else {
        pig.tackle_zones = false;
        pig.effects.insert(Skill::ReallyStupid);
        pig.finished_action = true;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDiceSource;
    use crate::models::match_state::{Direction, Match, MatchId, TurnType};
    use crate::models::pig::PlayerInGame;
    use crate::models::race::BaseStats;
    use crate::models::skill::SkillSet;
    use crate::store::MatchContext;
    use uuid::Uuid;

    fn sample_match(turn_number: u8, current_side: Side) -> Match {
        Match {
            id: MatchId(Uuid::nil()),
            home_team_slug: "a".into(),
            away_team_slug: "b".into(),
            home_score: 0,
            away_score: 0,
            turn_number,
            turn_type: TurnType::Normal,
            current_side,
            first_kicking_team: Side::Home,
            home_first_direction: Direction::Right,
            x_ball: Some(10),
            y_ball: Some(7),
            home_rerolls: 0,
            away_rerolls: 0,
            home_rerolls_total: 2,
            away_rerolls_total: 2,
            home_reroll_used_this_turn: true,
            away_reroll_used_this_turn: false,
            n_to_place: 0,
            kicking_team: Side::Home,
        }
    }

    // S6 — end-of-half refresh: turn_number 8 -> 9, both teams' rerolls
    // reset to their totals, a fresh kickoff follows with kicking_team the
    // opposite of first_kicking_team.
    #[test]
    fn end_turn_at_half_boundary_refreshes_rerolls_and_kicks_off() {
        let mut ctx = MatchContext { match_: sample_match(8, Side::Home), pigs: Vec::new(), history: Vec::new() };
        let mut dice = ScriptedDiceSource::new(vec![6]);
        resolve_end_turn(&mut ctx, &mut dice, false, None).unwrap();

        assert_eq!(ctx.match_.turn_number, 9);
        assert_eq!(ctx.match_.home_rerolls, ctx.match_.home_rerolls_total);
        assert_eq!(ctx.match_.away_rerolls, ctx.match_.away_rerolls_total);
        assert_eq!(ctx.match_.kicking_team, Side::Away);
        assert_eq!(ctx.match_.turn_type, TurnType::PlacePlayers);
    }

    #[test]
    fn end_turn_on_touchdown_scores_and_kicks_off_from_the_scoring_side() {
        let mut ctx = MatchContext { match_: sample_match(5, Side::Home), pigs: Vec::new(), history: Vec::new() };
        let mut dice = ScriptedDiceSource::new(vec![6]);
        resolve_end_turn(&mut ctx, &mut dice, true, Some(Side::Home)).unwrap();

        assert_eq!(ctx.match_.home_score, 1);
        assert_eq!(ctx.match_.kicking_team, Side::Home);
        assert_eq!(ctx.match_.turn_type, TurnType::PlacePlayers);
    }

    #[test]
    fn end_turn_at_match_end_sets_turn_type_end() {
        let mut ctx = MatchContext { match_: sample_match(16, Side::Home), pigs: Vec::new(), history: Vec::new() };
        let mut dice = ScriptedDiceSource::new(vec![6]);
        resolve_end_turn(&mut ctx, &mut dice, false, None).unwrap();
        assert_eq!(ctx.match_.turn_number, 17);
        assert_eq!(ctx.match_.turn_type, TurnType::End);
    }

    #[test]
    fn bonehead_failure_sets_effect_and_finishes_action() {
        let pig = PlayerInGame::fresh(Side::Home, 1, BaseStats { ma: 6, st: 3, ag: 3, av: 8 }, SkillSet::new());
        let player = PlayerRef { side: Side::Home, num: 1 };
        let mut ctx = MatchContext { match_: sample_match(1, Side::Home), pigs: vec![pig], history: Vec::new() };
        let mut dice = ScriptedDiceSource::new(vec![1]);
        let result = resolve_bonehead(&mut ctx, &mut dice, player).unwrap();
        assert_eq!(result.success, Some(false));
        let pig = ctx.find_pig(Side::Home, 1).unwrap();
        assert!(!pig.tackle_zones);
        assert!(pig.effects.has(&Skill::BoneHead));
        assert!(pig.finished_action);
    }

    #[test]
    fn really_stupid_needs_only_two_plus_with_an_adjacent_ally() {
        let mut player_pig = PlayerInGame::fresh(Side::Home, 1, BaseStats { ma: 6, st: 3, ag: 3, av: 8 }, SkillSet::new());
        player_pig.xpos = Some(5);
        player_pig.ypos = Some(5);
        player_pig.on_pitch = true;
        let mut ally = PlayerInGame::fresh(Side::Home, 2, BaseStats { ma: 6, st: 3, ag: 3, av: 8 }, SkillSet::new());
        ally.xpos = Some(5);
        ally.ypos = Some(6);
        ally.on_pitch = true;
        let player = PlayerRef { side: Side::Home, num: 1 };
        let mut ctx = MatchContext { match_: sample_match(1, Side::Home), pigs: vec![player_pig, ally], history: Vec::new() };
        let mut dice = ScriptedDiceSource::new(vec![2]);
        let result = resolve_really_stupid(&mut ctx, &mut dice, player).unwrap();
        assert_eq!(result.required_result, Some(2));
        assert_eq!(result.success, Some(true));
    }
}
