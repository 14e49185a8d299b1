//! The market engine — daily stock-price evolution.
//!
//! Prices follow an uncorrelated random walk: once per simulated day
//! each instrument moves by a uniform percentage in [-5%, +5%],
//! floored at 1.0. No mean reversion, no cross-instrument coupling.
//!
//! The market's lifecycle is independent of the world state: resetting
//! a world does not reset prices, and all consumers read it as an
//! immutable listing.

use crate::catalog::Catalog;
use crate::event::GameEvent;
use crate::rng::StreamRng;
use crate::types::{EntityId, Money};
use serde::{Deserialize, Serialize};

/// Price history keeps the most recent samples only.
pub const HISTORY_CAP: usize = 30;

/// Daily move is uniform in [-MAX_DAILY_MOVE, +MAX_DAILY_MOVE].
pub const MAX_DAILY_MOVE: f64 = 0.05;

/// Prices never fall below this floor.
pub const PRICE_FLOOR: Money = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketStock {
    pub id: EntityId,
    pub name: String,
    pub current_price: Money,
    pub history: Vec<Money>,
}

#[derive(Debug, Clone)]
pub struct MarketEngine {
    stocks: Vec<MarketStock>,
}

impl MarketEngine {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let stocks = catalog
            .stock_listings()
            .iter()
            .map(|l| MarketStock {
                id: l.id.clone(),
                name: l.name.clone(),
                current_price: l.initial_price,
                history: vec![l.initial_price],
            })
            .collect();
        Self { stocks }
    }

    /// Read-only instrument listing for dashboards and snapshots.
    pub fn stocks(&self) -> &[MarketStock] {
        &self.stocks
    }

    pub fn price(&self, stock_id: &str) -> Option<Money> {
        self.stocks
            .iter()
            .find(|s| s.id == stock_id)
            .map(|s| s.current_price)
    }

    /// Advance every instrument by one simulated day.
    pub fn advance_day(&mut self, rng: &mut StreamRng) -> Vec<GameEvent> {
        let mut events = Vec::with_capacity(self.stocks.len());
        for stock in &mut self.stocks {
            let change = rng.symmetric(MAX_DAILY_MOVE);
            let new_price = (stock.current_price * (1.0 + change)).max(PRICE_FLOOR);
            stock.current_price = new_price;
            stock.history.push(new_price);
            if stock.history.len() > HISTORY_CAP {
                let drop = stock.history.len() - HISTORY_CAP;
                stock.history.drain(..drop);
            }
            log::debug!("market: {} moved {:+.2}% to {:.2}", stock.id, change * 100.0, new_price);
            events.push(GameEvent::StockPriceMoved {
                stock_id: stock.id.clone(),
                price: new_price,
            });
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::StreamRng;

    #[test]
    fn moves_stay_within_band() {
        let catalog = Catalog::builtin();
        let mut market = MarketEngine::from_catalog(&catalog);
        let mut rng = StreamRng::new(99, 1);
        let before: Vec<f64> = market.stocks().iter().map(|s| s.current_price).collect();
        market.advance_day(&mut rng);
        for (prev, stock) in before.iter().zip(market.stocks()) {
            let ratio = stock.current_price / prev;
            assert!(
                (1.0 - MAX_DAILY_MOVE - 1e-9..=1.0 + MAX_DAILY_MOVE + 1e-9).contains(&ratio),
                "{} moved out of band: {ratio}",
                stock.id
            );
        }
    }

    #[test]
    fn history_truncates_to_cap() {
        let catalog = Catalog::builtin();
        let mut market = MarketEngine::from_catalog(&catalog);
        let mut rng = StreamRng::new(5, 1);
        for _ in 0..100 {
            market.advance_day(&mut rng);
        }
        for stock in market.stocks() {
            assert_eq!(stock.history.len(), HISTORY_CAP);
            assert_eq!(*stock.history.last().unwrap(), stock.current_price);
        }
    }
}
