//! `Store` trait plus an in-memory reference implementation used by this
//! crate's own tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::error::{MatchError, Result};
use crate::models::match_state::{Match, MatchId, Side};
use crate::models::pig::PlayerInGame;
use crate::models::step::{PlayerRef, Step};

/// The unit a single step mutates: the `Match` plus all its `PlayerInGame`s.
pub struct MatchContext {
    pub match_: Match,
    pub pigs: Vec<PlayerInGame>,
    pub history: Vec<Step>,
}

impl MatchContext {
    pub fn find_pig(&self, side: Side, number: i32) -> Result<&PlayerInGame> {
        self.pigs.iter().find(|p| p.side == side && p.number == number).ok_or_else(|| {
            let msg = format!("no PIG at {side:?}#{number}");
            tracing::error!(%msg, "programmer error");
            MatchError::ProgrammerError(msg)
        })
    }

    pub fn find_pig_mut(&mut self, side: Side, number: i32) -> Result<&mut PlayerInGame> {
        self.pigs.iter_mut().find(|p| p.side == side && p.number == number).ok_or_else(|| {
            let msg = format!("no PIG at {side:?}#{number}");
            tracing::error!(%msg, "programmer error");
            MatchError::ProgrammerError(msg)
        })
    }

    pub fn find_ref_mut(&mut self, r: PlayerRef) -> Result<&mut PlayerInGame> {
        self.find_pig_mut(r.side, r.num)
    }
}

/// What the core requires of persistence: atomic
/// per-step transactions under a per-match exclusive lock, a uniqueness
/// constraint on `(match_id, history_position)`, and indexed player
/// lookups by `(match, side, number)`.
pub trait Store {
    fn with_match_lock<R>(&self, match_id: MatchId, f: impl FnOnce(&mut MatchContext) -> Result<R>) -> Result<R>;
    fn load_match(&self, match_id: MatchId) -> Result<MatchContext>;
    fn highest_history_position(&self, match_id: MatchId) -> Result<Option<u32>>;
    fn append_step(&self, match_id: MatchId, step: Step) -> Result<()>;
}

/// Reference `Store` implementation: one coarse-grained mutex per match,
/// matching the "per-match exclusive lock held for the entire duration of
/// one submitted step". Adequate for tests and as a starting adapter; a
/// real persistence layer swaps this out for a transactional database.
#[derive(Default)]
pub struct InMemoryStore {
    matches: RwLock<HashMap<MatchId, Arc<Mutex<MatchContext>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore::default()
    }

    pub fn insert_match(&self, match_: Match, pigs: Vec<PlayerInGame>) {
        let id = match_.id;
        let ctx = MatchContext { match_, pigs, history: Vec::new() };
        self.matches.write().unwrap().insert(id, Arc::new(Mutex::new(ctx)));
    }

    fn handle(&self, match_id: MatchId) -> Result<Arc<Mutex<MatchContext>>> {
        self.matches
            .read()
            .unwrap()
            .get(&match_id)
            .cloned()
            .ok_or_else(|| MatchError::StoreFailure(format!("unknown match {match_id:?}")))
    }
}

impl Store for InMemoryStore {
    fn with_match_lock<R>(&self, match_id: MatchId, f: impl FnOnce(&mut MatchContext) -> Result<R>) -> Result<R> {
        let handle = self.handle(match_id)?;
        let mut guard = handle.lock().map_err(|_| MatchError::StoreFailure("poisoned match lock".into()))?;
        f(&mut guard)
    }

    fn load_match(&self, match_id: MatchId) -> Result<MatchContext> {
        let handle = self.handle(match_id)?;
        let guard = handle.lock().map_err(|_| MatchError::StoreFailure("poisoned match lock".into()))?;
        Ok(MatchContext {
            match_: guard.match_.clone(),
            pigs: guard.pigs.clone(),
            history: guard.history.clone(),
        })
    }

    fn highest_history_position(&self, match_id: MatchId) -> Result<Option<u32>> {
        let handle = self.handle(match_id)?;
        let guard = handle.lock().map_err(|_| MatchError::StoreFailure("poisoned match lock".into()))?;
        Ok(guard.history.last().map(|s| s.history_position))
    }

    fn append_step(&self, match_id: MatchId, step: Step) -> Result<()> {
        let handle = self.handle(match_id)?;
        let mut guard = handle.lock().map_err(|_| MatchError::StoreFailure("poisoned match lock".into()))?;
        if guard.history.iter().any(|s| s.history_position == step.history_position) {
            return Err(MatchError::HistoryDuplicate);
        }
        guard.history.push(step);
        Ok(())
    }
}
