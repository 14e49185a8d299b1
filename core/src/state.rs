//! The world state — the single mutable aggregate for one session.
//!
//! RULES:
//!   - Only the engine's action transitions and the tick path mutate it.
//!   - Every mutation is computed on a working copy and committed whole;
//!     no partially applied state is ever observable.
//!   - `max_inventory` is derived from shop level + rooms + vehicles and
//!     is recomputed through max_inventory_for(), never set directly.

use crate::catalog::{Catalog, RoomKind, Recipe, VehicleKind};
use crate::types::{Day, EntityId, Hour, Money};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The message log never holds more than this many entries;
/// the oldest entry is evicted first.
pub const MESSAGE_CAP: usize = 50;

/// Shop is open (and sales resolve) for hours in OPEN_FROM..=OPEN_UNTIL.
pub const OPEN_FROM: Hour = 8;
pub const OPEN_UNTIL: Hour = 22;

/// Seed cash for a solo world / a shared-session world.
pub const SINGLE_SEED_CASH: Money = 10_000.0;
pub const SHARED_SEED_CASH: Money = 40_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Village,
    City,
    Downtown,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Location::Village => "village",
            Location::City => "city",
            Location::Downtown => "downtown",
        };
        f.write_str(s)
    }
}

/// One shop-inventory line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryLine {
    pub quantity: u32,
    pub sell_price: Money,
}

/// One stock-portfolio position. Removed from the map when owned hits 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockHolding {
    pub owned: u32,
    pub avg_price: Money,
}

/// A room the player owns, copied from the catalog at build time so the
/// refund on demolish uses the price that was actually paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedRoom {
    pub name: String,
    pub kind: RoomKind,
    pub capacity_bonus: u32,
    pub cost: Money,
    pub built: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedVehicle {
    pub name: String,
    pub kind: VehicleKind,
    pub capacity_bonus: u32,
    pub cost: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    pub money: Money,
    pub day: Day,
    pub hour: Hour,
    pub shop_name: String,
    pub shop_level: u32,
    pub max_inventory: u32,
    pub inventory: HashMap<EntityId, InventoryLine>,
    pub bank_balance: Money,
    pub loan_amount: Money,
    pub stocks: HashMap<EntityId, StockHolding>,
    /// 0..=100, shifts synthetic demand.
    pub reputation: f64,
    pub messages: Vec<String>,
    pub rooms: HashMap<EntityId, OwnedRoom>,
    pub vehicles: HashMap<EntityId, OwnedVehicle>,
    /// 0..=100 player vitals.
    pub energy: f64,
    pub hunger: f64,
    pub personal_inventory: HashMap<EntityId, u32>,
    pub custom_recipes: Vec<Recipe>,
    pub location: Location,
}

impl WorldState {
    fn new(catalog: &Catalog, seed_cash: Money) -> Self {
        Self {
            money: seed_cash,
            day: 1,
            hour: 8,
            shop_name: "Fury Supermarket".into(),
            shop_level: 1,
            max_inventory: catalog.tier_capacity(1),
            inventory: HashMap::new(),
            bank_balance: 0.0,
            loan_amount: 0.0,
            stocks: HashMap::new(),
            reputation: 50.0,
            messages: vec!["Welcome to Fury Supermarket Sim!".into()],
            rooms: HashMap::new(),
            vehicles: HashMap::new(),
            energy: 100.0,
            hunger: 100.0,
            personal_inventory: HashMap::new(),
            custom_recipes: Vec::new(),
            location: Location::Village,
        }
    }

    /// Initial state for a solo world.
    pub fn new_single(catalog: &Catalog) -> Self {
        Self::new(catalog, SINGLE_SEED_CASH)
    }

    /// Initial state for a shared session (higher seed cash).
    pub fn new_shared(catalog: &Catalog) -> Self {
        Self::new(catalog, SHARED_SEED_CASH)
    }

    /// Append to the bounded message log, evicting the oldest entry
    /// once the cap is reached.
    pub fn push_message(&mut self, text: impl Into<String>) {
        self.messages.push(text.into());
        if self.messages.len() > MESSAGE_CAP {
            self.messages.remove(0);
        }
    }

    /// Append a message stamped with the current simulated time,
    /// e.g. "[Day 3 07:00] ...".
    pub fn push_stamped(&mut self, text: impl AsRef<str>) {
        let stamped = format!("[Day {} {:02}:00] {}", self.day, self.hour, text.as_ref());
        self.push_message(stamped);
    }

    /// Total units across all shop-inventory lines.
    pub fn total_stock(&self) -> u32 {
        self.inventory.values().map(|l| l.quantity).sum()
    }

    pub fn is_shop_open(hour: Hour) -> bool {
        (OPEN_FROM..=OPEN_UNTIL).contains(&hour)
    }

    /// Recompute the derived storage capacity from its inputs.
    pub fn recompute_max_inventory(&mut self, catalog: &Catalog) {
        self.max_inventory =
            max_inventory_for(catalog, self.shop_level, &self.rooms, &self.vehicles);
    }

    /// Find a recipe by id in the catalog first, then in the
    /// player-authored list. Catalog wins on id collision.
    pub fn find_recipe<'a>(&'a self, catalog: &'a Catalog, id: &str) -> Option<&'a Recipe> {
        catalog
            .recipe(id)
            .or_else(|| self.custom_recipes.iter().find(|r| r.id == id))
    }
}

/// Pure derived-capacity function: tier base + built rooms + vehicles.
pub fn max_inventory_for(
    catalog: &Catalog,
    shop_level: u32,
    rooms: &HashMap<EntityId, OwnedRoom>,
    vehicles: &HashMap<EntityId, OwnedVehicle>,
) -> u32 {
    let base = catalog.tier_capacity(shop_level);
    let room_bonus: u32 = rooms
        .values()
        .filter(|r| r.built)
        .map(|r| r.capacity_bonus)
        .sum();
    let vehicle_bonus: u32 = vehicles.values().map(|v| v.capacity_bonus).sum();
    base + room_bonus + vehicle_bonus
}
