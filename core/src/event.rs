//! Tick observability events.
//!
//! The tick path reports what happened through these instead of log
//! lines alone; tests compare serialized event streams to prove two
//! identically seeded engines stay in lockstep.
//! Variants are added per feature — never removed or reordered.

use crate::types::{Day, EntityId, Hour, Money};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// An inventory line sold units this hour.
    SaleClosed {
        day: Day,
        hour: Hour,
        product_id: EntityId,
        quantity: u32,
        revenue: Money,
    },

    /// Energy hit zero; forced recovery plus hospital bill.
    PassedOut { day: Day, penalty: Money },

    /// Day rollover: interest applied, market advanced.
    DayEnded {
        day: Day,
        bank_interest: Money,
        loan_interest: Money,
    },

    /// One instrument's daily price move.
    StockPriceMoved { stock_id: EntityId, price: Money },

    /// Marks the end of one tick's mutations.
    TickCompleted { day: Day, hour: Hour },
}
