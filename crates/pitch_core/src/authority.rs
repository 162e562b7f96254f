//! Authority gate. Cross-cutting — wrapped once at the `submit_step`
//! boundary, never duplicated per step kind.

use crate::models::match_state::{Match, Side};
use crate::models::step::StepProperties;
use crate::models::team::CoachId;

/// Returns `true` when `coach` may submit `properties` against `match_`'s
/// current state: either they coach the team indicated by
/// `match_.current_side`, or the step is `setKickoff`, which either coach
/// may drive (enabling the non-acting coach to push the between-half /
/// between-touchdown reset).
pub fn is_authorised(
    match_: &Match,
    coach: CoachId,
    home_coach: CoachId,
    away_coach: CoachId,
    properties: &StepProperties,
) -> bool {
    if matches!(properties, StepProperties::SetKickoff) {
        let ok = coach == home_coach || coach == away_coach;
        tracing::debug!(match_id = %match_.id.0, ok, "authority check: setKickoff");
        return ok;
    }
    let acting_coach = match match_.current_side {
        Side::Home => home_coach,
        Side::Away => away_coach,
    };
    let ok = coach == acting_coach;
    tracing::debug!(match_id = %match_.id.0, ok, current_side = ?match_.current_side, "authority check");
    ok
}
