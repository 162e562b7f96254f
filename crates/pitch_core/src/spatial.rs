//! Tackle-zone counting and block-assist counting.

use crate::models::pig::PlayerInGame;
use crate::models::skill::Skill;

fn adjacent(a: &PlayerInGame, b: &PlayerInGame) -> bool {
    match (a.xpos, a.ypos, b.xpos, b.ypos) {
        (Some(ax), Some(ay), Some(bx), Some(by)) => (ax - bx).abs() <= 1 && (ay - by).abs() <= 1,
        _ => false,
    }
}

/// Counts tackle zones imposed on `player` by standing, on-pitch enemies in
/// its 8-square neighbourhood, optionally excluding one player (e.g. the
/// other participant in a block, per `n_tackle_zones(exclude=...)`).
pub fn tackle_zones_on<'a>(
    player: &PlayerInGame,
    all: impl Iterator<Item = &'a PlayerInGame>,
    exclude: Option<&PlayerInGame>,
) -> u32 {
    all.filter(|o| {
        o.on_pitch
            && o.tackle_zones
            && o.side != player.side
            && !std::ptr::eq(*o, player)
            && exclude.map_or(true, |ex| !std::ptr::eq(*o, ex))
            && adjacent(o, player)
    })
    .count() as u32
}

/// Sums +1 per qualifying same-side assister adjacent to `target`, per
/// An assister must be a standing, on-pitch, tackle-zone-imposing
/// teammate of `attacker_side` other than `attacker`, with zero enemy
/// tackle zones on it (excluding `target`).
pub fn count_assists<'a>(
    all: impl Iterator<Item = &'a PlayerInGame> + Clone,
    attacker: &PlayerInGame,
    target: &PlayerInGame,
) -> u32 {
    all.clone()
        .filter(|candidate| {
            candidate.side == attacker.side
                && !std::ptr::eq(*candidate, attacker)
                && candidate.on_pitch
                && !candidate.down
                && candidate.tackle_zones
                && adjacent(candidate, target)
                && tackle_zones_on(candidate, all.clone(), Some(target)) == 0
        })
        .count() as u32
}

/// Whether any standing, on-pitch teammate of `player` occupies an adjacent
/// square — the "supporting friend" condition for Really Stupid.
pub fn adjacent_any_ally<'a>(player: &PlayerInGame, all: impl Iterator<Item = &'a PlayerInGame>) -> bool {
    all.any(|o| {
        o.side == player.side && !std::ptr::eq(o, player) && o.on_pitch && !o.down && adjacent(o, player)
    })
}

/// A player has a usable assist-blocking skill if `Block` lets it ignore
/// the "both down" double-KO rule (used by the resolver's `selectBlockDice`
/// handling, not by this module directly, but kept here since it is a
/// spatial-adjacent query over the same skill set).
pub fn has_skill(player: &PlayerInGame, skill: &Skill) -> bool {
    player.skills.has(skill) || player.effects.has(skill)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::match_state::Side;
    use crate::models::race::BaseStats;
    use crate::models::skill::SkillSet;

    fn pig(side: Side, x: i32, y: i32) -> PlayerInGame {
        let mut p = PlayerInGame::fresh(side, 1, BaseStats { ma: 6, st: 3, ag: 3, av: 8 }, SkillSet::new());
        p.xpos = Some(x);
        p.ypos = Some(y);
        p.on_pitch = true;
        p.tackle_zones = true;
        p
    }

    #[test]
    fn counts_enemy_tackle_zones_only() {
        let attacker = pig(Side::Home, 10, 5);
        let enemy = pig(Side::Away, 10, 6);
        let ally = pig(Side::Home, 11, 5);
        let all = vec![attacker.clone(), enemy, ally];
        let n = tackle_zones_on(&attacker, all.iter(), None);
        assert_eq!(n, 1);
    }

    #[test]
    fn assist_requires_no_enemy_tackle_zone_on_assister() {
        let attacker = pig(Side::Home, 10, 5);
        let defender = pig(Side::Away, 10, 6);
        let mut ally = pig(Side::Home, 10, 7); // adjacent to defender
        ally.number = 2;
        let all = vec![attacker.clone(), defender.clone(), ally];
        assert_eq!(count_assists(all.iter(), &attacker, &defender), 1);

        let mut enemy2 = pig(Side::Away, 9, 7); // gives the ally a tackle zone
        enemy2.number = 3;
        let all2 = vec![attacker.clone(), defender.clone(), all[2].clone(), enemy2];
        assert_eq!(count_assists(all2.iter(), &attacker, &defender), 0);
    }
}
