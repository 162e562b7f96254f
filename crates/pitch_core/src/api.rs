//! The boundary a transport layer calls through — authority gate,
//! history gate, resolver, in that order, all inside one per-match lock.

use serde::{Deserialize, Serialize};

use crate::authority::is_authorised;
use crate::dice::DiceSource;
use crate::error::Result;
use crate::history::{classify, HistoryDecision};
use crate::models::match_state::{Match, MatchId};
use crate::models::pig::PlayerInGame;
use crate::models::step::{Step, StepProperties};
use crate::models::team::CoachId;
use crate::resolver;
use crate::store::Store;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitStepRequest {
    pub match_id: MatchId,
    pub coach: CoachId,
    pub history_position: u32,
    pub properties: StepProperties,
}

/// The four outcomes a client can receive for a submitted step.
/// Only `Resolved` persists anything; the other three are answered without
/// mutating the match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum StepResponse {
    Resolved { step: Step },
    Duplicate,
    Resend { start: u32 },
    Unauthorised,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchView {
    pub match_state: Match,
    pub pigs: Vec<PlayerInGame>,
    pub history_length: u32,
}

/// Submits one step against `request.match_id` under that match's exclusive
/// lock: classify the history position, check authority, resolve, and
/// (only on the `Next` path) append to history.
#[tracing::instrument(
    skip(store, dice, home_coach, away_coach, request),
    fields(
        match_id = %request.match_id.0,
        history_position = request.history_position,
        step_type = request.properties.as_ref(),
    )
)]
pub fn submit_step(
    store: &impl Store,
    dice: &mut impl DiceSource,
    home_coach: CoachId,
    away_coach: CoachId,
    request: SubmitStepRequest,
) -> Result<StepResponse> {
    store.with_match_lock(request.match_id, |ctx| {
        let highest = ctx.history.last().map(|s| s.history_position);
        match classify(highest, request.history_position) {
            HistoryDecision::Duplicate => return Ok(StepResponse::Duplicate),
            HistoryDecision::Resend { start } => return Ok(StepResponse::Resend { start }),
            HistoryDecision::Next => {}
        }

        if !is_authorised(&ctx.match_, request.coach, home_coach, away_coach, &request.properties) {
            return Ok(StepResponse::Unauthorised);
        }

        let action_player = request.properties.active_action().map(|(player, _)| player);
        let result = resolver::resolve(ctx, dice, &request.properties)?;
        let step = Step {
            match_id: request.match_id,
            history_position: request.history_position,
            action_player,
            properties: request.properties.clone(),
            result,
        };
        ctx.history.push(step.clone());
        Ok(StepResponse::Resolved { step })
    })
}

/// A read-only snapshot for rendering a match's current state.
pub fn match_view(store: &impl Store, match_id: MatchId) -> Result<MatchView> {
    let ctx = store.load_match(match_id)?;
    Ok(MatchView { match_state: ctx.match_, pigs: ctx.pigs, history_length: ctx.history.len() as u32 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDiceSource;
    use crate::models::match_state::{Direction, Side, TurnType};
    use crate::models::pig::PlayerAction;
    use crate::models::race::BaseStats;
    use crate::models::skill::SkillSet;
    use crate::models::step::PlayerRef;
    use crate::store::InMemoryStore;
    use uuid::Uuid;

    fn sample_match(id: MatchId) -> Match {
        Match {
            id,
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

    #[test]
    fn unauthorised_coach_is_rejected_without_mutating_history() {
        let store = InMemoryStore::new();
        let match_id = MatchId(Uuid::from_u128(1));
        let mut pig = PlayerInGame::fresh(Side::Home, 1, BaseStats { ma: 6, st: 3, ag: 3, av: 8 }, SkillSet::new());
        pig.xpos = Some(5);
        pig.ypos = Some(5);
        pig.on_pitch = true;
        store.insert_match(sample_match(match_id), vec![pig]);

        let home = CoachId(Uuid::from_u128(10));
        let away = CoachId(Uuid::from_u128(11));
        let mut dice = ScriptedDiceSource::new(vec![3]);

        let request = SubmitStepRequest {
            match_id,
            coach: away,
            history_position: 0,
            properties: StepProperties::Move {
                player: PlayerRef { side: Side::Home, num: 1 },
                action: PlayerAction::Move,
                x1: 6,
                y1: 5,
                dodge: false,
            },
        };
        let response = submit_step(&store, &mut dice, home, away, request).unwrap();
        assert!(matches!(response, StepResponse::Unauthorised));
        assert_eq!(match_view(&store, match_id).unwrap().history_length, 0);
    }

    #[test]
    fn resolved_step_is_appended_and_duplicate_is_rejected_on_resubmit() {
        let store = InMemoryStore::new();
        let match_id = MatchId(Uuid::from_u128(2));
        let mut pig = PlayerInGame::fresh(Side::Home, 1, BaseStats { ma: 6, st: 3, ag: 3, av: 8 }, SkillSet::new());
        pig.xpos = Some(5);
        pig.ypos = Some(5);
        pig.on_pitch = true;
        store.insert_match(sample_match(match_id), vec![pig]);

        let home = CoachId(Uuid::from_u128(10));
        let away = CoachId(Uuid::from_u128(11));
        let mut dice = ScriptedDiceSource::new(vec![3]);

        let request = SubmitStepRequest {
            match_id,
            coach: home,
            history_position: 0,
            properties: StepProperties::Move {
                player: PlayerRef { side: Side::Home, num: 1 },
                action: PlayerAction::Move,
                x1: 6,
                y1: 5,
                dodge: false,
            },
        };
        let response = submit_step(&store, &mut dice, home, away, request.clone()).unwrap();
        assert!(matches!(response, StepResponse::Resolved { .. }));
        assert_eq!(match_view(&store, match_id).unwrap().history_length, 1);

        let replay = submit_step(&store, &mut dice, home, away, request).unwrap();
        assert!(matches!(replay, StepResponse::Duplicate));
    }
}
