//! Shared primitive types used across the entire simulation.

/// Liquid currency. Close-enough floating point, not ledger-grade.
pub type Money = f64;

/// A stable, unique identifier for any catalog entity (product, room,
/// vehicle, personal item, recipe, stock instrument).
pub type EntityId = String;

/// Identifies one shared session (one world, N participants).
pub type SessionId = String;

/// Simulated day counter, starts at 1.
pub type Day = u32;

/// Simulated hour of day, 0..=23.
pub type Hour = u8;
