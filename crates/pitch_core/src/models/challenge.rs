//! `Challenge`: a pending match invitation. Consumed by match creation,
//! which is external to this core — modeled here only as the external
//! input the core's `Match` constructor takes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub id: Uuid,
    pub challenger_team_slug: String,
    pub challengee_team_slug: String,
    pub time_issued: DateTime<Utc>,
}
