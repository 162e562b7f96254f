//! Top-level step resolution: dispatches a submitted step's
//! `properties` to the submodule that knows how to resolve it, wrapping the
//! cross-cutting reroll and `finish_previous_action`
//! behaviours once here rather than duplicating them per step kind.

mod ball;
mod block;
mod kickoff_steps;
mod movement;
mod turn;

use crate::config::LONER_THRESHOLD;
use crate::dice::DiceSource;
use crate::error::{MatchError, Result};
use crate::models::skill::Skill;
use crate::models::step::{PlayerRef, StepProperties, StepResult};
use crate::store::MatchContext;

/// Resolves one submitted step's `properties` against `ctx`, returning the
/// `result` to persist alongside it. Does not itself append to history —
/// callers own the `(match_id, history_position)` bookkeeping.
pub fn resolve(ctx: &mut MatchContext, dice: &mut impl DiceSource, properties: &StepProperties) -> Result<StepResult> {
    let _span = tracing::debug_span!(
        "resolve",
        match_id = %ctx.match_.id.0,
        step_type = properties.as_ref(),
    )
    .entered();

    if let StepProperties::Reroll { side, is_team_reroll, player, reroll_step_type } = properties {
        return resolve_reroll(ctx, dice, *side, *is_team_reroll, *player, reroll_step_type);
    }

    let result = resolve_properties(ctx, dice, properties)?;
    if let Some((acting, action)) = properties.active_action() {
        set_action(ctx, acting, action);
        finish_previous_action(ctx, acting);
    }
    tracing::debug!(success = ?result.success, "resolved");
    Ok(result)
}

/// Records which action `acting` is now performing, per §3's PIG `action`
/// tag — set before `finish_previous_action` walks history looking for
/// other players whose own open action this one implicitly closes.
fn set_action(ctx: &mut MatchContext, acting: PlayerRef, action: crate::models::pig::PlayerAction) {
    if let Ok(pig) = ctx.find_pig_mut(acting.side, acting.num) {
        pig.action = Some(action);
    }
}

/// A team reroll spends one of the side's remaining rerolls (once
/// per turn); a player reroll requires Loner and only takes effect on a 1d6
/// of `LONER_THRESHOLD` or higher — on a lower roll the wrapped step's
/// outcome does not change, so the result returned is the *wrapped* step's
/// own failing result, computed by resolving it once either way. Unlike the
/// source, which on a failed Loner roll copies the previous history entry's
/// result verbatim (relying on the wrapped step already having been
/// submitted and persisted as its own, separately-failing step), this crate
/// always resolves `reroll_step_type` itself exactly once: the wrapped
/// properties describe the *same* action being retried, not a reference to
/// an already-persisted step, so there is no `previous()` entry to copy —
/// seeDESIGN.md.
fn resolve_reroll(
    ctx: &mut MatchContext,
    dice: &mut impl DiceSource,
    side: crate::models::match_state::Side,
    is_team_reroll: bool,
    player: PlayerRef,
    reroll_step_type: &StepProperties,
) -> Result<StepResult> {
    if is_team_reroll {
        if ctx.match_.reroll_used_this_turn(side) {
            return Err(MatchError::InvalidStep("reroll already used this turn".into()));
        }
        if ctx.match_.rerolls(side) == 0 {
            return Err(MatchError::InvalidStep("no rerolls remaining".into()));
        }
        *ctx.match_.rerolls_mut(side) -= 1;
        ctx.match_.set_reroll_used_this_turn(side, true);
    } else {
        let has_loner = {
            let pig = ctx.find_pig(player.side, player.num)?;
            pig.skills.has(&Skill::Loner) || pig.effects.has(&Skill::Loner)
        };
        if !has_loner {
            return Err(MatchError::InvalidStep("player reroll requires Loner".into()));
        }
        let roll = dice.roll_one(6);
        if roll < LONER_THRESHOLD {
            let mut result = resolve_properties(ctx, dice, reroll_step_type)?;
            if let Some((acting, action)) = reroll_step_type.active_action() {
                set_action(ctx, acting, action);
            }
            result.extra.insert("lonerRoll".into(), serde_json::Value::from(roll));
            result.extra.insert("lonerFailed".into(), serde_json::Value::Bool(true));
            return Ok(result);
        }
    }

    let result = resolve_properties(ctx, dice, reroll_step_type)?;
    if let Some((acting, action)) = reroll_step_type.active_action() {
        set_action(ctx, acting, action);
        finish_previous_action(ctx, acting);
    }
    Ok(result)
}

fn resolve_properties(ctx: &mut MatchContext, dice: &mut impl DiceSource, properties: &StepProperties) -> Result<StepResult> {
    use StepProperties::*;
    match *properties {
        Move { player, action, x1, y1, dodge } => movement::resolve_move(ctx, dice, player, action, x1, y1, dodge),
        Push { player, x1, y1, off_pitch } => movement::resolve_push(ctx, dice, player, x1, y1, off_pitch),
        FollowUp { player, choice } => {
            let square = (ctx.find_pig(player.side, player.num)?.xpos.unwrap_or(0), ctx.find_pig(player.side, player.num)?.ypos.unwrap_or(0));
            movement::resolve_follow_up(ctx, player, square, choice)
        }
        Block { attacker, defender, action } => block::resolve_block(ctx, dice, attacker, defender, action),
        SelectBlockDice { attacker, defender, selected_dice } => block::resolve_select_block_dice(ctx, attacker, defender, selected_dice),
        Foul { attacker, defender } => block::resolve_foul(ctx, dice, attacker, defender),
        KnockDown { player, mighty_blow } => block::resolve_knock_down(ctx, dice, player, mighty_blow),
        StandUp { player } => movement::resolve_stand_up(ctx, dice, player),
        PickUp { player } => movement::resolve_pick_up(ctx, dice, player),
        Scatter { n_scatter } => ball::resolve_scatter(ctx, dice, n_scatter),
        Catch { player, accurate } => ball::resolve_catch(ctx, dice, player, accurate),
        Pass { thrower, x1, y1 } => ball::resolve_pass(ctx, dice, thrower, x1, y1),
        HandOff { thrower, target, x1, y1 } => ball::resolve_hand_off(ctx, thrower, target, x1, y1),
        Throwin => ball::resolve_throwin(ctx, dice),
        GoForIt { player } => {
            let result = movement::resolve_go_for_it(dice);
            if result.success != Some(true) {
                let pig = ctx.find_ref_mut(player)?;
                pig.down = true;
                pig.finished_action = true;
            }
            Ok(result)
        }
        EndTurn { touchdown, scoring_side } => turn::resolve_end_turn(ctx, dice, touchdown, scoring_side),
        SetKickoff => kickoff_steps::resolve_set_kickoff(ctx, dice),
        PlaceBall { x1, y1 } => kickoff_steps::resolve_place_ball(ctx, x1, y1),
        PlacePlayer { player, x1, y1, subs } => kickoff_steps::resolve_place_player(ctx, player, x1, y1, subs),
        SubmitPlayers => kickoff_steps::resolve_submit_players(ctx),
        SubmitBall => kickoff_steps::resolve_submit_ball(ctx, dice),
        Touchback { player } => kickoff_steps::resolve_touchback(ctx, player),
        SubmitTouchback => kickoff_steps::resolve_submit_touchback(ctx),
        EndKickoff => kickoff_steps::resolve_end_kickoff(ctx),
        Bonehead { player } => turn::resolve_bonehead(ctx, dice, player),
        ReallyStupid { player } => turn::resolve_really_stupid(ctx, dice, player),
        Reroll { .. } => unreachable!("handled by resolve() before dispatch"),
    }
}

/// When a new action-starting step is submitted for a player other
/// than whoever's action was still open, that previous action is implicitly
/// over. Walks history newest-first, stopping at the first `endTurn`
/// (actions never carry across a turn boundary), and marks the first
/// still-open action belonging to a different player as finished.
fn finish_previous_action(ctx: &mut MatchContext, current: PlayerRef) {
    for step in ctx.history.iter().rev() {
        if matches!(step.properties, StepProperties::EndTurn { .. }) {
            break;
        }
        if let Some((acting, _)) = step.properties.active_action() {
            if acting.side != current.side || acting.num != current.num {
                if let Ok(pig) = ctx.find_pig_mut(acting.side, acting.num) {
                    if !pig.finished_action {
                        pig.finished_action = true;
                    }
                }
            }
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDiceSource;
    use crate::models::match_state::{Direction, Match, MatchId, Side, TurnType};
    use crate::models::pig::PlayerInGame;
    use crate::models::race::BaseStats;
    use crate::models::skill::SkillSet;
    use uuid::Uuid;

    fn sample_match() -> Match {
        Match {
            id: MatchId(Uuid::nil()),
            home_team_slug: "a".into(),
            away_team_slug: "b".into(),
            home_score: 0,
            away_score: 0,
            turn_number: 1,
            turn_type: TurnType::Normal,
            current_side: Side::Home,
            first_kicking_team: Side::Home,
            home_first_direction: Direction::Right,
            x_ball: Some(10),
            y_ball: Some(7),
            home_rerolls: 1,
            away_rerolls: 1,
            home_rerolls_total: 1,
            away_rerolls_total: 1,
            home_reroll_used_this_turn: false,
            away_reroll_used_this_turn: false,
            n_to_place: 0,
            kicking_team: Side::Home,
        }
    }

    fn ctx_with_one_pig() -> MatchContext {
        let mut pig = PlayerInGame::fresh(Side::Home, 1, BaseStats { ma: 6, st: 3, ag: 3, av: 8 }, SkillSet::new());
        pig.xpos = Some(5);
        pig.ypos = Some(5);
        pig.on_pitch = true;
        pig.tackle_zones = true;
        MatchContext { match_: sample_match(), pigs: vec![pig], history: Vec::new() }
    }

    #[test]
    fn team_reroll_spends_a_reroll_and_sets_used_flag() {
        let mut ctx = ctx_with_one_pig();
        let mut dice = ScriptedDiceSource::new(vec![6]);
        let inner = StepProperties::GoForIt { player: PlayerRef { side: Side::Home, num: 1 } };
        let props = StepProperties::Reroll { side: Side::Home, is_team_reroll: true, player: PlayerRef { side: Side::Home, num: 1 }, reroll_step_type: Box::new(inner) };
        let result = resolve(&mut ctx, &mut dice, &props).unwrap();
        assert_eq!(result.success, Some(true));
        assert_eq!(ctx.match_.home_rerolls, 0);
        assert!(ctx.match_.home_reroll_used_this_turn);
    }

    #[test]
    fn second_team_reroll_in_same_turn_is_rejected() {
        let mut ctx = ctx_with_one_pig();
        ctx.match_.home_reroll_used_this_turn = true;
        let mut dice = ScriptedDiceSource::new(vec![6]);
        let inner = StepProperties::GoForIt { player: PlayerRef { side: Side::Home, num: 1 } };
        let props = StepProperties::Reroll { side: Side::Home, is_team_reroll: true, player: PlayerRef { side: Side::Home, num: 1 }, reroll_step_type: Box::new(inner) };
        assert!(resolve(&mut ctx, &mut dice, &props).is_err());
    }

    #[test]
    fn loner_reroll_below_threshold_does_not_waive_the_wrapped_failure() {
        let mut ctx = ctx_with_one_pig();
        ctx.pigs[0].skills.insert(Skill::Loner);
        let mut dice = ScriptedDiceSource::new(vec![3, 1]); // loner roll=3 (<4 fails), wrapped goForIt rolls 1 (fails)
        let inner = StepProperties::GoForIt { player: PlayerRef { side: Side::Home, num: 1 } };
        let props = StepProperties::Reroll { side: Side::Home, is_team_reroll: false, player: PlayerRef { side: Side::Home, num: 1 }, reroll_step_type: Box::new(inner) };
        let result = resolve(&mut ctx, &mut dice, &props).unwrap();
        assert_eq!(result.extra.get("lonerFailed"), Some(&serde_json::Value::Bool(true)));
        assert_eq!(result.success, Some(false));
    }

    #[test]
    fn move_step_records_the_acting_players_action_tag() {
        let mut ctx = ctx_with_one_pig();
        let mut dice = ScriptedDiceSource::new(vec![3]);
        let props = StepProperties::Move {
            player: PlayerRef { side: Side::Home, num: 1 },
            action: crate::models::pig::PlayerAction::Move,
            x1: 6,
            y1: 5,
            dodge: false,
        };
        resolve(&mut ctx, &mut dice, &props).unwrap();
        assert_eq!(ctx.find_pig(Side::Home, 1).unwrap().action, Some(crate::models::pig::PlayerAction::Move));
    }

    #[test]
    fn finish_previous_action_marks_prior_player_on_new_actor() {
        let mut ctx = ctx_with_one_pig();
        let mut other = PlayerInGame::fresh(Side::Home, 2, BaseStats { ma: 6, st: 3, ag: 3, av: 8 }, SkillSet::new());
        other.xpos = Some(6);
        other.ypos = Some(6);
        other.on_pitch = true;
        ctx.pigs.push(other);

        let step1 = crate::models::step::Step {
            match_id: ctx.match_.id,
            history_position: 0,
            action_player: Some(PlayerRef { side: Side::Home, num: 1 }),
            properties: StepProperties::Move { player: PlayerRef { side: Side::Home, num: 1 }, action: crate::models::pig::PlayerAction::Move, x1: 5, y1: 5, dodge: false },
            result: StepResult::default(),
        };
        ctx.history.push(step1);

        let mut dice = ScriptedDiceSource::new(vec![3]);
        let props = StepProperties::Move { player: PlayerRef { side: Side::Home, num: 2 }, action: crate::models::pig::PlayerAction::Move, x1: 6, y1: 6, dodge: false };
        resolve(&mut ctx, &mut dice, &props).unwrap();

        assert!(ctx.find_pig(Side::Home, 1).unwrap().finished_action);
    }
}

/// Universal invariants checked after arbitrary sequences of `move`
/// steps against a fixed single-PIG roster, rather than only the literal
/// scenarios above.
#[cfg(test)]
mod proptests {
    use super::*;
    use crate::config::{PITCH_HEIGHT, PITCH_WIDTH};
    use crate::dice::ScriptedDiceSource;
    use crate::models::match_state::{Direction, Match, MatchId, Side, TurnType};
    use crate::models::pig::{PlayerAction, PlayerInGame};
    use crate::models::race::BaseStats;
    use crate::models::skill::SkillSet;
    use crate::store::MatchContext;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn one_pig_ctx() -> MatchContext {
        let mut pig = PlayerInGame::fresh(Side::Home, 1, BaseStats { ma: 6, st: 3, ag: 3, av: 8 }, SkillSet::new());
        pig.xpos = Some(10);
        pig.ypos = Some(7);
        pig.on_pitch = true;
        pig.has_ball = true;
        let match_ = Match {
            id: MatchId(Uuid::nil()),
            home_team_slug: "a".into(),
            away_team_slug: "b".into(),
            home_score: 0,
            away_score: 0,
            turn_number: 1,
            turn_type: TurnType::Normal,
            current_side: Side::Home,
            first_kicking_team: Side::Home,
            home_first_direction: Direction::Right,
            x_ball: Some(10),
            y_ball: Some(7),
            home_rerolls: 3,
            away_rerolls: 3,
            home_rerolls_total: 3,
            away_rerolls_total: 3,
            home_reroll_used_this_turn: false,
            away_reroll_used_this_turn: false,
            n_to_place: 0,
            kicking_team: Side::Home,
        };
        MatchContext { match_, pigs: vec![pig], history: Vec::new() }
    }

    fn assert_universal_invariants(ctx: &MatchContext) {
        let ball_holders = ctx.pigs.iter().filter(|p| p.has_ball).count();
        assert!(ball_holders <= 1, "at most one PIG may hold the ball");
        assert_eq!(ctx.match_.x_ball.is_none(), ball_holders == 0, "x_ball is null iff no PIG has the ball");
        for p in &ctx.pigs {
            if p.down {
                assert!(!p.tackle_zones, "a downed PIG casts no tackle zones");
                assert!(!p.has_ball, "a downed PIG cannot be holding the ball");
            }
            if p.on_pitch {
                let x = p.xpos.expect("on-pitch PIG has xpos");
                let y = p.ypos.expect("on-pitch PIG has ypos");
                assert!((0..PITCH_WIDTH).contains(&x));
                assert!((0..PITCH_HEIGHT).contains(&y));
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn invariants_hold_after_arbitrary_move_sequences(
            moves in proptest::collection::vec((0..PITCH_WIDTH, 0..PITCH_HEIGHT, any::<bool>(), 1u32..=6), 1..20),
        ) {
            let mut ctx = one_pig_ctx();
            for (x1, y1, dodge, die) in moves {
                let mut dice = ScriptedDiceSource::new(vec![die]);
                let props = StepProperties::Move {
                    player: PlayerRef { side: Side::Home, num: 1 },
                    action: PlayerAction::Move,
                    x1,
                    y1,
                    dodge,
                };
                let _ = resolve(&mut ctx, &mut dice, &props);
                assert_universal_invariants(&ctx);
            }
        }
    }
}
