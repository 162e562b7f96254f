//! # pitch_core — deterministic match simulation core
//!
//! A storage-agnostic, turn-based resolver for a two-player dice-driven
//! tabletop match: given a `Store` of match/roster state and a seeded
//! `DiceSource`, `submit_step` resolves one client-submitted action at a
//! time under a per-match exclusive lock, appending it to that match's
//! append-only history.
//!
//! ## Layout
//! - [`models`] — the catalog and per-match entities (`Race`, `Team`,
//!   `Player`, `Match`, `PlayerInGame`, `Step`).
//! - [`geometry`], [`dice`], [`rolls`], [`spatial`] — pure rule primitives.
//! - [`history`], [`authority`] — the two cross-cutting gates `submit_step`
//!   wraps every step in.
//! - [`kickoff`] — the shared kickoff-reset routine.
//! - [`resolver`] — per-step-kind resolution, dispatched from [`api`].
//! - [`store`] — the persistence seam (`Store` trait) plus an in-memory
//!   reference implementation.
//! - [`data`] — parses the embedded races catalog (`data/races.yaml`); see
//!   `cache_builder` for the binary-cache pipeline built on top of it.
//! - [`config`], [`error`] — named rule constants and the error-kind enum.

#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]

pub mod api;
pub mod authority;
pub mod config;
pub mod data;
pub mod dice;
pub mod error;
pub mod geometry;
pub mod history;
pub mod kickoff;
pub mod models;
pub mod resolver;
pub mod rolls;
pub mod spatial;
pub mod store;

pub use error::{MatchError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
