//! `setKickoff`, `placeBall`, `placePlayer`, `submitPlayers`, `submitBall`,
//! `touchback`, `submitTouchback`, `endKickoff`.

use crate::config::{KNOCK_OUT_REVIVAL_THRESHOLD, PITCH_HEIGHT, PITCH_WIDTH};
use crate::dice::DiceSource;
use crate::error::{MatchError, Result};
use crate::kickoff::set_kickoff;
use crate::models::match_state::TurnType;
use crate::models::step::{PlayerRef, StepResult};
use crate::store::MatchContext;

pub fn resolve_set_kickoff(ctx: &mut MatchContext, dice: &mut impl DiceSource) -> Result<StepResult> {
    for pig in ctx.pigs.iter_mut().filter(|p| p.knocked_out) {
        let roll = dice.roll_one(6);
        if roll >= KNOCK_OUT_REVIVAL_THRESHOLD {
            pig.knocked_out = false;
            pig.on_pitch = true;
        }
    }
    let kicking_team = ctx.match_.kicking_team;
    set_kickoff(&mut ctx.match_, &mut ctx.pigs, kicking_team);
    Ok(StepResult::default())
}

pub fn resolve_place_ball(ctx: &mut MatchContext, x1: i32, y1: i32) -> Result<StepResult> {
    ctx.match_.x_ball = Some(x1);
    ctx.match_.y_ball = Some(y1);
    ctx.match_.turn_type = TurnType::PlaceBall;
    Ok(StepResult::default())
}

pub fn resolve_place_player(ctx: &mut MatchContext, player: PlayerRef, x1: Option<i32>, y1: Option<i32>, subs: bool) -> Result<StepResult> {
    let pig = ctx.find_ref_mut(player)?;
    if subs {
        pig.on_pitch = false;
        pig.xpos = None;
        pig.ypos = None;
    } else {
        pig.on_pitch = true;
        pig.xpos = x1;
        pig.ypos = y1;
    }
    Ok(StepResult::default())
}

pub fn resolve_submit_players(ctx: &mut MatchContext) -> Result<StepResult> {
    if ctx.match_.n_to_place == 0 {
        return Err(MatchError::InvalidStep("submitPlayers with nothing left to place".into()));
    }
    ctx.match_.n_to_place -= 1;
    ctx.match_.current_side = ctx.match_.current_side.other();
    if ctx.match_.n_to_place == 0 {
        ctx.match_.turn_type = TurnType::PlaceBall;
    }
    Ok(StepResult::default())
}

pub fn resolve_submit_ball(ctx: &mut MatchContext, dice: &mut impl DiceSource) -> Result<StepResult> {
    use crate::geometry::{compass_delta, on_pitch};

    let (x0, y0) = (ctx.match_.x_ball.unwrap_or(PITCH_WIDTH / 2), ctx.match_.y_ball.unwrap_or(PITCH_HEIGHT / 2));
    let distance = dice.roll_one(6) as i32;
    let direction = dice.roll_one(8);
    let (dx, dy) = compass_delta(direction);
    let x = x0 + dx * distance;
    let y = y0 + dy * distance;

    let mut result = StepResult::default();
    result.raw_result = Some(distance);
    result.x1 = Some(x);
    result.y1 = Some(y);

    if on_pitch(x, y) {
        ctx.match_.x_ball = Some(x);
        ctx.match_.y_ball = Some(y);
    } else {
        ctx.match_.x_ball = None;
        ctx.match_.y_ball = None;
        ctx.match_.turn_type = TurnType::Touchback;
        // The touchback path does its one kickoff-exit flip here; the
        // matching `submitTouchback` step that later closes out this
        // kickoff does not flip again. The on-pitch path
        // flips once, later, in `endKickoff`.
        ctx.match_.current_side = ctx.match_.current_side.other();
    }
    Ok(result)
}

pub fn resolve_touchback(ctx: &mut MatchContext, player: PlayerRef) -> Result<StepResult> {
    for pig in ctx.pigs.iter_mut() {
        pig.has_ball = false;
    }
    let pig = ctx.find_ref_mut(player)?;
    pig.has_ball = true;
    ctx.match_.x_ball = pig.xpos;
    ctx.match_.y_ball = pig.ypos;
    Ok(StepResult::default())
}

pub fn resolve_submit_touchback(ctx: &mut MatchContext) -> Result<StepResult> {
    ctx.match_.turn_type = TurnType::Normal;
    Ok(StepResult::default())
}

pub fn resolve_end_kickoff(ctx: &mut MatchContext) -> Result<StepResult> {
    ctx.match_.turn_type = TurnType::Normal;
    ctx.match_.current_side = ctx.match_.kicking_team.other();
    Ok(StepResult::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDiceSource;
    use crate::models::match_state::{Direction, Match, MatchId, Side};
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
            turn_type: TurnType::PlaceBall,
            current_side: Side::Home,
            first_kicking_team: Side::Home,
            home_first_direction: Direction::Right,
            x_ball: Some(13),
            y_ball: Some(7),
            home_rerolls: 0,
            away_rerolls: 0,
            home_rerolls_total: 0,
            away_rerolls_total: 0,
            home_reroll_used_this_turn: false,
            away_reroll_used_this_turn: false,
            n_to_place: 0,
            kicking_team: Side::Home,
        }
    }

    // submitBall landing off-pitch sends the match into touchback and
    // flips current_side once; the on-pitch path leaves the flip to
    // endKickoff instead.
    #[test]
    fn submit_ball_off_pitch_triggers_touchback_and_flips_side() {
        let mut ctx = MatchContext { match_: sample_match(), pigs: Vec::new(), history: Vec::new() };
        ctx.match_.x_ball = Some(0);
        ctx.match_.y_ball = Some(0);
        // distance=6, direction=1 (dx=-1,dy=-1) drives the ball off both edges.
        let mut dice = ScriptedDiceSource::new(vec![6, 1]);
        resolve_submit_ball(&mut ctx, &mut dice).unwrap();
        assert_eq!(ctx.match_.x_ball, None);
        assert_eq!(ctx.match_.y_ball, None);
        assert_eq!(ctx.match_.turn_type, TurnType::Touchback);
        assert_eq!(ctx.match_.current_side, Side::Away);
    }

    #[test]
    fn submit_ball_on_pitch_keeps_ball_and_does_not_flip_side() {
        let mut ctx = MatchContext { match_: sample_match(), pigs: Vec::new(), history: Vec::new() };
        // distance=1, direction=2 (dx=0,dy=-1): stays comfortably on pitch.
        let mut dice = ScriptedDiceSource::new(vec![1, 2]);
        resolve_submit_ball(&mut ctx, &mut dice).unwrap();
        assert_eq!(ctx.match_.x_ball, Some(13));
        assert_eq!(ctx.match_.y_ball, Some(6));
        assert_eq!(ctx.match_.current_side, Side::Home);
    }

    #[test]
    fn touchback_assigns_the_ball_to_the_chosen_player_and_clears_others() {
        let mut carrier = PlayerInGame::fresh(Side::Away, 1, BaseStats { ma: 6, st: 3, ag: 3, av: 8 }, SkillSet::new());
        carrier.xpos = Some(5);
        carrier.ypos = Some(5);
        let mut other = PlayerInGame::fresh(Side::Away, 2, BaseStats { ma: 6, st: 3, ag: 3, av: 8 }, SkillSet::new());
        other.has_ball = true;
        let mut ctx = MatchContext { match_: sample_match(), pigs: vec![carrier, other], history: Vec::new() };
        let player = PlayerRef { side: Side::Away, num: 1 };
        resolve_touchback(&mut ctx, player).unwrap();
        assert!(ctx.find_pig(Side::Away, 1).unwrap().has_ball);
        assert!(!ctx.find_pig(Side::Away, 2).unwrap().has_ball);
        assert_eq!((ctx.match_.x_ball, ctx.match_.y_ball), (Some(5), Some(5)));
    }

    #[test]
    fn submit_players_decrements_counter_and_advances_to_place_ball() {
        let mut ctx = MatchContext { match_: sample_match(), pigs: Vec::new(), history: Vec::new() };
        ctx.match_.n_to_place = 2;
        ctx.match_.turn_type = TurnType::PlacePlayers;
        resolve_submit_players(&mut ctx).unwrap();
        assert_eq!(ctx.match_.n_to_place, 1);
        assert_eq!(ctx.match_.turn_type, TurnType::PlacePlayers);
        resolve_submit_players(&mut ctx).unwrap();
        assert_eq!(ctx.match_.n_to_place, 0);
        assert_eq!(ctx.match_.turn_type, TurnType::PlaceBall);
    }

    #[test]
    fn set_kickoff_revives_knocked_out_pigs_on_a_four_plus() {
        let mut pig = PlayerInGame::fresh(Side::Home, 1, BaseStats { ma: 6, st: 3, ag: 3, av: 8 }, SkillSet::new());
        pig.knocked_out = true;
        pig.on_pitch = false;
        let mut ctx = MatchContext { match_: sample_match(), pigs: vec![pig], history: Vec::new() };
        let mut dice = ScriptedDiceSource::new(vec![4]);
        resolve_set_kickoff(&mut ctx, &mut dice).unwrap();
        assert!(!ctx.find_pig(Side::Home, 1).unwrap().knocked_out);
    }
}
