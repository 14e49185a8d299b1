//! shopsim-core — the deterministic simulation core of a tick-based
//! shop-tycoon game.
//!
//! The engine owns the world state and advances it one simulated hour
//! per tick; the market engine evolves stock prices once per simulated
//! day; the session synchronizer mirrors one world across the
//! participants of a shared session. Presentation, transport, and
//! rendering live outside this crate and talk to it only through
//! [`action::PlayerAction`] and read-only snapshots.

pub mod action;
pub(crate) mod actions;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod event;
pub mod market;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod types;
