//! Kickoff reset. `set_kickoff` is the one routine shared by the
//! `setKickoff` step and the `endTurn` handler's implicit kickoff at a
//! half/match boundary or after a touchdown.

use crate::config::PITCH_WIDTH;
use crate::models::match_state::{Match, Side, TurnType};
use crate::models::pig::PlayerInGame;

/// Walks every PIG on `side`'s team top-to-bottom in its x-band, wrapping
/// to `ypos=0` and shifting the band one column inward (toward the centre)
/// at `ypos=14`. See DESIGN.md for the single- vs double-increment open
/// question: this implements the single-increment variant only.
fn place_band(pigs: &mut [&mut PlayerInGame], mut xpos: i32) {
    let mut ypos = 0;
    for pig in pigs.iter_mut() {
        pig.xpos = Some(xpos);
        pig.ypos = Some(ypos);
        if ypos == 14 {
            ypos = 0;
            if xpos < 13 {
                xpos += 1;
            } else {
                xpos -= 1;
            }
        } else {
            ypos += 1;
        }
    }
}

/// Resets `match_` and every PIG for a new kickoff with `kicking_team`
/// receiving... no — kicking. Mirrors the source's module-level
/// `set_kickoff(match, kicking_team)`.
pub fn set_kickoff(match_: &mut Match, pigs: &mut [PlayerInGame], kicking_team: Side) {
    tracing::info!(match_id = %match_.id.0, turn_number = match_.turn_number, ?kicking_team, "set_kickoff");
    let home_gets_zero = match_.defends_direction(Side::Home, match_.turn_number)
        == crate::models::match_state::Direction::Right;
    let xpos_home = if home_gets_zero { 0 } else { PITCH_WIDTH - 1 };
    let xpos_away = if home_gets_zero { PITCH_WIDTH - 1 } else { 0 };

    let mut home_pigs: Vec<&mut PlayerInGame> = pigs.iter_mut().filter(|p| p.side == Side::Home).collect();
    place_band(&mut home_pigs, xpos_home);
    let mut away_pigs: Vec<&mut PlayerInGame> = pigs.iter_mut().filter(|p| p.side == Side::Away).collect();
    place_band(&mut away_pigs, xpos_away);

    for pig in pigs.iter_mut() {
        pig.down = false;
        pig.stunned = false;
        pig.stunned_this_turn = false;
        pig.tackle_zones = true;
        pig.has_ball = false;
        pig.reset_for_turn();
    }

    match_.n_to_place = 2;
    match_.kicking_team = kicking_team;
    match_.current_side = kicking_team;
    match_.x_ball = None;
    match_.y_ball = None;
    match_.turn_type = TurnType::PlacePlayers;
}
