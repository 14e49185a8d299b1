//! The simulation engine — owns one world and advances it.
//!
//! TICK ORDER (fixed, documented, never reordered):
//!   1. Hour advance
//!   2. Vitals decay (hunger first; the post-decay hunger sets the
//!      energy drain rate)
//!   3. Exhaustion clause (forced recovery + hospital bill; overrides
//!      the hour advance for this tick)
//!   4. Sales resolution, only while the shop is open
//!   5. Day rollover: bank/loan interest, market advance
//!
//! RULES:
//!   - Every mutation (action or tick) is computed on a working copy of
//!     the state and committed whole; callers never observe a partial
//!     tick.
//!   - All randomness flows through the RngBank streams.
//!   - tick() must not be called while paused or for a session with no
//!     members; the driver checks both.

use crate::action::PlayerAction;
use crate::actions;
use crate::catalog::Catalog;
use crate::event::GameEvent;
use crate::market::MarketEngine;
use crate::rng::{RngBank, StreamSlot};
use crate::snapshot::SimSnapshot;
use crate::state::WorldState;
use crate::types::{Money, SessionId};
use std::sync::Arc;

/// Flat fee charged when the player passes out from exhaustion.
pub const HOSPITAL_BILL: Money = 500.0;

/// Hunger lost per tick.
pub const HUNGER_DECAY: f64 = 2.0;
/// Energy lost per tick, normally / while starving (hunger < 20).
pub const ENERGY_DECAY: f64 = 5.0;
pub const ENERGY_DECAY_STARVING: f64 = 10.0;
pub const STARVING_THRESHOLD: f64 = 20.0;

/// Synthetic demand model: base sale probability per line per open
/// hour, shifted by markup band and reputation.
pub const BASE_SALE_CHANCE: f64 = 0.5;
pub const HIGH_MARKUP: f64 = 2.0;
pub const LOW_MARKUP: f64 = 1.2;

/// Simple daily interest: credited on deposits, charged on loans.
pub const BANK_INTEREST_RATE: f64 = 0.01;
pub const LOAN_INTEREST_RATE: f64 = 0.02;

/// Probability a cook attempt succeeds; rolled by the caller via
/// roll_cook_success() and passed into PlayerAction::Cook.
pub const COOK_SUCCESS_CHANCE: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Single,
    Shared,
}

pub struct SimEngine {
    pub session_id: SessionId,
    catalog: Arc<Catalog>,
    state: WorldState,
    market: MarketEngine,
    rng_bank: RngBank,
    pub paused: bool,
}

impl SimEngine {
    pub fn new(session_id: SessionId, seed: u64, catalog: Arc<Catalog>, mode: SessionMode) -> Self {
        let state = match mode {
            SessionMode::Single => WorldState::new_single(&catalog),
            SessionMode::Shared => WorldState::new_shared(&catalog),
        };
        let market = MarketEngine::from_catalog(&catalog);
        Self {
            session_id,
            catalog,
            state,
            market,
            rng_bank: RngBank::new(seed),
            paused: false,
        }
    }

    /// The current committed world state. Read-only; callers that need
    /// a broadcastable copy should clone it (it is the snapshot).
    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn market(&self) -> &MarketEngine {
        &self.market
    }

    /// Full read model for rendering and tooling.
    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            session_id: self.session_id.clone(),
            state: self.state.clone(),
            market: self.market.stocks().to_vec(),
        }
    }

    /// Replace the local world wholesale with a snapshot received from
    /// the session synchronizer (last writer wins).
    pub fn replace_state(&mut self, snapshot: WorldState) {
        self.state = snapshot;
    }

    /// Roll the stochastic cook outcome on the kitchen stream. The
    /// result feeds PlayerAction::Cook { success }.
    pub fn roll_cook_success(&mut self) -> bool {
        self.rng_bank
            .stream(StreamSlot::Kitchen)
            .chance(COOK_SUCCESS_CHANCE)
    }

    /// Apply one player action. Computes the next state on a working
    /// copy and commits it atomically; precondition failures leave the
    /// committed state identical to the previous one.
    pub fn apply(&mut self, action: PlayerAction) {
        log::debug!("apply action={}", action.kind());
        match action {
            PlayerAction::Pause => {
                self.paused = true;
                return;
            }
            PlayerAction::Resume => {
                self.paused = false;
                return;
            }
            _ => {}
        }

        let mut next = self.state.clone();
        match action {
            PlayerAction::Pause | PlayerAction::Resume => unreachable!("handled above"),
            PlayerAction::BuyProduct { product_id, quantity } => {
                actions::buy_product(&mut next, &self.catalog, &product_id, quantity)
            }
            PlayerAction::SetSellPrice { product_id, price } => {
                actions::set_sell_price(&mut next, &product_id, price)
            }
            PlayerAction::UpgradeShop => actions::upgrade_shop(&mut next, &self.catalog),
            PlayerAction::BuildRoom { room_id } => {
                actions::build_room(&mut next, &self.catalog, &room_id)
            }
            PlayerAction::DemolishRoom { room_id } => {
                actions::demolish_room(&mut next, &self.catalog, &room_id)
            }
            PlayerAction::BuyVehicle { vehicle_id } => {
                actions::buy_vehicle(&mut next, &self.catalog, &vehicle_id)
            }
            PlayerAction::BankDeposit { amount } => actions::bank_deposit(&mut next, amount),
            PlayerAction::BankWithdraw { amount } => actions::bank_withdraw(&mut next, amount),
            PlayerAction::TakeLoan { amount } => actions::take_loan(&mut next, amount),
            PlayerAction::RepayLoan { amount } => actions::repay_loan(&mut next, amount),
            PlayerAction::BuyStock { stock_id, quantity } => {
                actions::buy_stock(&mut next, &self.market, &stock_id, quantity)
            }
            PlayerAction::SellStock { stock_id, quantity } => {
                actions::sell_stock(&mut next, &self.market, &stock_id, quantity)
            }
            PlayerAction::Sleep => actions::sleep(&mut next),
            PlayerAction::BuyPersonalItem { item_id, quantity } => {
                actions::buy_personal_item(&mut next, &self.catalog, &item_id, quantity)
            }
            PlayerAction::Eat { item_id } => actions::eat(&mut next, &self.catalog, &item_id),
            PlayerAction::Cook { recipe_id, success } => {
                actions::cook(&mut next, &self.catalog, &recipe_id, success)
            }
            PlayerAction::CreateRecipe { recipe } => actions::create_recipe(&mut next, recipe),
            PlayerAction::Travel { destination } => actions::travel(&mut next, destination),
        }
        self.state = next;
    }

    /// Advance one simulated hour. This is the core simulation step.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        assert!(!self.paused, "tick() called on paused engine");

        let mut next = self.state.clone();
        let mut events = Vec::new();

        // Messages written during the tick carry the pre-advance time,
        // which next.day/next.hour still hold until the final commit.
        let mut next_hour = next.hour as u32 + 1;
        let mut next_day = next.day;

        next.hunger = (next.hunger - HUNGER_DECAY).max(0.0);
        let drain = if next.hunger < STARVING_THRESHOLD {
            ENERGY_DECAY_STARVING
        } else {
            ENERGY_DECAY
        };
        next.energy = (next.energy - drain).max(0.0);

        if next.energy <= 0.0 {
            next.energy = 50.0;
            next.hunger = 50.0;
            next_hour = 8;
            next_day += 1;
            next.money = (next.money - HOSPITAL_BILL).max(0.0);
            next.push_stamped(format!(
                "You passed out from exhaustion! Paid {HOSPITAL_BILL} hospital bill."
            ));
            log::info!("day {next_day}: passed out, hospital bill charged");
            events.push(GameEvent::PassedOut { day: next_day, penalty: HOSPITAL_BILL });
        }

        if WorldState::is_shop_open(next_hour as u8) {
            events.extend(self.resolve_sales(&mut next, next_day, next_hour as u8));
        }

        if next_hour >= 24 {
            next_hour = 0;
            next_day += 1;

            let mut bank_interest = 0.0;
            let mut loan_interest = 0.0;
            if next.bank_balance > 0.0 {
                bank_interest = next.bank_balance * BANK_INTEREST_RATE;
                next.bank_balance += bank_interest;
                next.push_stamped(format!("Earned ${bank_interest:.2} in bank interest."));
            }
            if next.loan_amount > 0.0 {
                loan_interest = next.loan_amount * LOAN_INTEREST_RATE;
                next.loan_amount += loan_interest;
                next.push_stamped(format!("Charged ${loan_interest:.2} in loan interest."));
            }
            events.push(GameEvent::DayEnded { day: next_day, bank_interest, loan_interest });

            let market_rng = self.rng_bank.stream(StreamSlot::Market);
            events.extend(self.market.advance_day(market_rng));
        }

        next.hour = next_hour as u8;
        next.day = next_day;
        events.push(GameEvent::TickCompleted { day: next.day, hour: next.hour });

        self.state = next;
        events
    }

    /// Run n ticks in a loop. Used for testing and fast-forward.
    pub fn run_ticks(&mut self, n: u64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..n {
            events.extend(self.tick());
        }
        events
    }

    /// Hourly synthetic-demand resolution over every stocked line.
    /// Lines are visited in id order so identically seeded engines
    /// draw in the same sequence.
    fn resolve_sales(&mut self, next: &mut WorldState, day: u32, hour: u8) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let mut product_ids: Vec<String> = next.inventory.keys().cloned().collect();
        product_ids.sort();

        let reputation = next.reputation;
        let rng = self.rng_bank.stream(StreamSlot::Sales);
        let mut revenue_total = 0.0;

        for product_id in product_ids {
            let Some(product) = self.catalog.product(&product_id) else { continue };
            let line = next.inventory.get_mut(&product_id).expect("key from map");
            if line.quantity == 0 {
                continue;
            }

            let markup = line.sell_price / product.base_cost;
            let mut demand_chance = BASE_SALE_CHANCE;
            if markup > HIGH_MARKUP {
                demand_chance -= 0.3;
            } else if markup < LOW_MARKUP {
                demand_chance += 0.3;
            }
            demand_chance += (reputation - 50.0) / 200.0;

            if rng.chance(demand_chance) {
                let amount = rng.next_in_range(1, 5).min(line.quantity);
                line.quantity -= amount;
                let revenue = amount as Money * line.sell_price;
                revenue_total += revenue;
                events.push(GameEvent::SaleClosed {
                    day,
                    hour,
                    product_id: product_id.clone(),
                    quantity: amount,
                    revenue,
                });
            }
        }

        if revenue_total > 0.0 {
            next.money += revenue_total;
            log::debug!("day {day} {hour:02}:00 sales revenue {revenue_total:.2}");
        }
        events
    }
}
