//! Read model — the immutable full-state view handed to presentation
//! and tooling. Rendered, never mutated in place.

use crate::market::MarketStock;
use crate::state::WorldState;
use crate::types::SessionId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub session_id: SessionId,
    pub state: WorldState,
    pub market: Vec<MarketStock>,
}
