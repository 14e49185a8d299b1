//! Player-action state transitions.
//!
//! RULES:
//!   - Every function is a total transition on the working copy of the
//!     world: it either applies its effect (usually appending a message)
//!     or leaves the state untouched. Nothing here returns an error.
//!   - A rejected action is either a silent no-op (missing entity,
//!     unaffordable, nothing to do) or an explicit rejection message
//!     when the player needs to know why (capacity guard, travel
//!     without energy, missing utensil or ingredient).
//!   - Any transition that changes shop level, rooms, or vehicles must
//!     recompute max_inventory before returning.

use crate::catalog::{Catalog, ItemKind, Recipe};
use crate::market::MarketEngine;
use crate::state::{
    InventoryLine, Location, OwnedRoom, OwnedVehicle, StockHolding, WorldState,
    max_inventory_for,
};
use crate::types::Money;

/// Default markup applied when a product first enters the inventory.
pub const DEFAULT_MARKUP: f64 = 1.5;

/// Refunded fraction of a demolished room's build cost.
pub const DEMOLISH_REFUND: f64 = 0.5;

/// Energy cost of travelling between locations.
pub const TRAVEL_ENERGY_COST: f64 = 10.0;

pub(crate) fn buy_product(state: &mut WorldState, catalog: &Catalog, product_id: &str, quantity: u32) {
    let Some(product) = catalog.product(product_id) else { return };
    if quantity == 0 {
        return;
    }
    let cost = product.base_cost * quantity as Money;
    if state.money < cost {
        log::debug!("buy_product rejected: {product_id} x{quantity} unaffordable");
        return;
    }
    // checked_add: an overflowing quantity is just another over-capacity
    // request.
    if state
        .total_stock()
        .checked_add(quantity)
        .map_or(true, |total| total > state.max_inventory)
    {
        log::debug!("buy_product rejected: {product_id} x{quantity} over capacity");
        return;
    }
    state.money -= cost;
    let line = state
        .inventory
        .entry(product_id.to_string())
        .or_insert(InventoryLine {
            quantity: 0,
            sell_price: product.base_cost * DEFAULT_MARKUP,
        });
    line.quantity += quantity;
    state.push_message(format!("Bought {quantity}x {} for ${cost:.2}", product.name));
}

pub(crate) fn set_sell_price(state: &mut WorldState, product_id: &str, price: Money) {
    if price < 0.0 {
        return;
    }
    if let Some(line) = state.inventory.get_mut(product_id) {
        line.sell_price = price;
    }
}

pub(crate) fn upgrade_shop(state: &mut WorldState, catalog: &Catalog) {
    let Some(next) = catalog.tier(state.shop_level + 1) else { return };
    if state.money < next.cost {
        return;
    }
    state.money -= next.cost;
    state.shop_level = next.level;
    state.recompute_max_inventory(catalog);
    state.push_message(format!("Upgraded shop to level {}!", next.level));
}

pub(crate) fn build_room(state: &mut WorldState, catalog: &Catalog, room_id: &str) {
    let Some(spec) = catalog.room(room_id) else { return };
    let already_built = state.rooms.get(room_id).map(|r| r.built).unwrap_or(false);
    if already_built || state.money < spec.cost {
        return;
    }
    state.money -= spec.cost;
    state.rooms.insert(
        room_id.to_string(),
        OwnedRoom {
            name: spec.name.clone(),
            kind: spec.kind,
            capacity_bonus: spec.capacity_bonus,
            cost: spec.cost,
            built: true,
        },
    );
    state.recompute_max_inventory(catalog);
    state.push_message(format!("Built {} for ${:.2}", spec.name, spec.cost));
}

pub(crate) fn demolish_room(state: &mut WorldState, catalog: &Catalog, room_id: &str) {
    let Some(room) = state.rooms.get(room_id) else { return };
    if !room.built {
        return;
    }
    let room_name = room.name.clone();
    let refund = room.cost * DEMOLISH_REFUND;

    // Guard: the remaining capacity must still hold current stock.
    let mut remaining = state.rooms.clone();
    remaining.remove(room_id);
    let new_max = max_inventory_for(catalog, state.shop_level, &remaining, &state.vehicles);
    if state.total_stock() > new_max {
        state.push_message(format!(
            "Cannot demolish {room_name}: Not enough capacity for current inventory!"
        ));
        log::warn!("demolish_room rejected: {room_id} would overflow capacity");
        return;
    }

    state.rooms.remove(room_id);
    state.money += refund;
    state.recompute_max_inventory(catalog);
    state.push_message(format!("Demolished {room_name} and refunded ${refund:.2}"));
}

pub(crate) fn buy_vehicle(state: &mut WorldState, catalog: &Catalog, vehicle_id: &str) {
    let Some(spec) = catalog.vehicle(vehicle_id) else { return };
    if state.vehicles.contains_key(vehicle_id) || state.money < spec.cost {
        return;
    }
    state.money -= spec.cost;
    state.vehicles.insert(
        vehicle_id.to_string(),
        OwnedVehicle {
            name: spec.name.clone(),
            kind: spec.kind,
            capacity_bonus: spec.capacity_bonus,
            cost: spec.cost,
        },
    );
    state.recompute_max_inventory(catalog);
    state.push_message(format!("Bought {} for ${:.2}", spec.name, spec.cost));
}

pub(crate) fn bank_deposit(state: &mut WorldState, amount: Money) {
    if amount <= 0.0 || state.money < amount {
        return;
    }
    state.money -= amount;
    state.bank_balance += amount;
}

pub(crate) fn bank_withdraw(state: &mut WorldState, amount: Money) {
    if amount <= 0.0 || state.bank_balance < amount {
        return;
    }
    state.bank_balance -= amount;
    state.money += amount;
}

pub(crate) fn take_loan(state: &mut WorldState, amount: Money) {
    if amount <= 0.0 {
        return;
    }
    state.money += amount;
    state.loan_amount += amount;
}

pub(crate) fn repay_loan(state: &mut WorldState, amount: Money) {
    if amount <= 0.0 || state.loan_amount <= 0.0 || state.money < amount {
        return;
    }
    let actual = amount.min(state.loan_amount);
    state.money -= actual;
    state.loan_amount -= actual;
}

pub(crate) fn buy_stock(state: &mut WorldState, market: &MarketEngine, stock_id: &str, quantity: u32) {
    if quantity == 0 {
        return;
    }
    let Some(price) = market.price(stock_id) else { return };
    let name = market
        .stocks()
        .iter()
        .find(|s| s.id == stock_id)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| stock_id.to_string());
    let cost = price * quantity as Money;
    if state.money < cost {
        return;
    }
    let owned_old = state.stocks.get(stock_id).map(|h| h.owned).unwrap_or(0);
    let Some(owned_new) = owned_old.checked_add(quantity) else { return };
    let holding = state
        .stocks
        .entry(stock_id.to_string())
        .or_insert(StockHolding { owned: 0, avg_price: 0.0 });
    // Weighted-average cost basis across the old position and this buy.
    let owned_old = owned_old as Money;
    holding.avg_price = (owned_old * holding.avg_price + cost) / (owned_old + quantity as Money);
    holding.owned = owned_new;
    state.money -= cost;
    state.push_message(format!("Bought {quantity} shares of {name} for ${cost:.2}"));
}

pub(crate) fn sell_stock(state: &mut WorldState, market: &MarketEngine, stock_id: &str, quantity: u32) {
    if quantity == 0 {
        return;
    }
    let Some(price) = market.price(stock_id) else { return };
    let name = market
        .stocks()
        .iter()
        .find(|s| s.id == stock_id)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| stock_id.to_string());
    let owned = state.stocks.get(stock_id).map(|h| h.owned).unwrap_or(0);
    if owned < quantity {
        return;
    }
    let revenue = price * quantity as Money;
    let holding = state.stocks.get_mut(stock_id).expect("checked above");
    holding.owned -= quantity;
    if holding.owned == 0 {
        state.stocks.remove(stock_id);
    }
    state.money += revenue;
    state.push_message(format!("Sold {quantity} shares of {name} for ${revenue:.2}"));
}

pub(crate) fn sleep(state: &mut WorldState) {
    state.hour = 8;
    state.day += 1;
    // Restores energy only; hunger is deliberately untouched.
    state.energy = 100.0;
    state.push_message("You slept well. Energy restored to 100.");
}

pub(crate) fn buy_personal_item(state: &mut WorldState, catalog: &Catalog, item_id: &str, quantity: u32) {
    let Some(item) = catalog.personal_item(item_id) else { return };
    if quantity == 0 {
        return;
    }
    let cost = item.cost * quantity as Money;
    if state.money < cost {
        return;
    }
    let owned = state.personal_inventory.get(item_id).copied().unwrap_or(0);
    let Some(owned_new) = owned.checked_add(quantity) else { return };
    state.money -= cost;
    state.personal_inventory.insert(item_id.to_string(), owned_new);
    state.push_message(format!("Bought {quantity}x {} for {cost:.2}", item.name));
}

pub(crate) fn eat(state: &mut WorldState, catalog: &Catalog, item_id: &str) {
    let Some(item) = catalog.personal_item(item_id) else { return };
    let owned = state.personal_inventory.get(item_id).copied().unwrap_or(0);
    if owned == 0 || item.kind != ItemKind::Food {
        return;
    }
    state.energy = (state.energy + item.energy_restore).min(100.0);
    state.hunger = (state.hunger + item.hunger_restore).min(100.0);
    if owned == 1 {
        state.personal_inventory.remove(item_id);
    } else {
        state.personal_inventory.insert(item_id.to_string(), owned - 1);
    }
    state.push_message(format!(
        "Ate {}. Hunger +{}, Energy +{}",
        item.name, item.hunger_restore, item.energy_restore
    ));
}

pub(crate) fn cook(state: &mut WorldState, catalog: &Catalog, recipe_id: &str, success: bool) {
    let Some(recipe) = state.find_recipe(catalog, recipe_id).cloned() else { return };

    if state.personal_inventory.get(&recipe.utensil).copied().unwrap_or(0) == 0 {
        let utensil = catalog.item_name(&recipe.utensil).to_string();
        state.push_message(format!("You need a {utensil} to cook this!"));
        return;
    }

    for (ingredient, required) in &recipe.requires {
        if state.personal_inventory.get(ingredient).copied().unwrap_or(0) < *required {
            let name = catalog.item_name(ingredient).to_string();
            state.push_message(format!("Not enough {name} to cook {}!", recipe.name));
            return;
        }
    }

    // Past the precondition the ingredients are spent either way.
    for (ingredient, required) in &recipe.requires {
        let left = state.personal_inventory.get(ingredient).copied().unwrap_or(0) - required;
        if left == 0 {
            state.personal_inventory.remove(ingredient);
        } else {
            state.personal_inventory.insert(ingredient.clone(), left);
        }
    }

    if !success {
        state.push_message(format!("Failed to cook {}. Ingredients were lost!", recipe.name));
        return;
    }

    *state.personal_inventory.entry(recipe.produces.clone()).or_insert(0) += 1;
    state.push_message(format!("Cooked {} successfully!", recipe.name));
}

pub(crate) fn create_recipe(state: &mut WorldState, recipe: Recipe) {
    // Deliberately unvalidated: duplicate ids and unknown ingredient ids
    // are accepted as-is.
    let name = recipe.name.clone();
    state.custom_recipes.push(recipe);
    state.push_message(format!("Created new recipe: {name}!"));
}

pub(crate) fn travel(state: &mut WorldState, destination: Location) {
    if state.location == destination {
        return;
    }
    if state.energy < TRAVEL_ENERGY_COST {
        state.push_message("Not enough energy to travel!");
        return;
    }
    state.location = destination;
    // Plain hour advance; a travel rollover triggers no day-end processing.
    if state.hour + 1 >= 24 {
        state.hour = 0;
        state.day += 1;
    } else {
        state.hour += 1;
    }
    state.energy -= TRAVEL_ENERGY_COST;
    state.push_message(format!("Traveled to {destination}."));
}
