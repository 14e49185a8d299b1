//! Cooking: utensil and ingredient gates, failure semantics, custom recipes.

use shopsim_core::{
    action::PlayerAction,
    catalog::{Catalog, Recipe},
    engine::{SessionMode, SimEngine},
};
use std::{collections::BTreeMap, sync::Arc};

fn build(seed: u64) -> SimEngine {
    SimEngine::new(
        "kitchen-test".into(),
        seed,
        Arc::new(Catalog::builtin()),
        SessionMode::Single,
    )
}

fn stock_up(engine: &mut SimEngine, items: &[(&str, u32)]) {
    for (id, qty) in items {
        engine.apply(PlayerAction::BuyPersonalItem { item_id: (*id).into(), quantity: *qty });
    }
}

/// Pan + raw meat, a successful roll yields a cooked steak.
#[test]
fn successful_cook_consumes_ingredients_and_produces() {
    let mut engine = build(1);
    stock_up(&mut engine, &[("pan", 1), ("raw_meat", 1)]);

    engine.apply(PlayerAction::Cook { recipe_id: "cook_steak".into(), success: true });

    let state = engine.state();
    assert!(!state.personal_inventory.contains_key("raw_meat"));
    assert_eq!(state.personal_inventory.get("pan"), Some(&1), "utensils are not consumed");
    assert_eq!(state.personal_inventory.get("cooked_steak"), Some(&1));
    assert!(state.messages.last().unwrap().contains("Cooked Cook Steak successfully"));
}

#[test]
fn failed_cook_still_consumes_the_ingredients() {
    let mut engine = build(1);
    stock_up(&mut engine, &[("pan", 1), ("raw_meat", 2)]);

    engine.apply(PlayerAction::Cook { recipe_id: "cook_steak".into(), success: false });

    let state = engine.state();
    assert_eq!(state.personal_inventory.get("raw_meat"), Some(&1), "one unit lost");
    assert!(!state.personal_inventory.contains_key("cooked_steak"));
    assert!(
        state.messages.last().unwrap().contains("Ingredients were lost"),
        "failure must be reported: {:?}",
        state.messages.last()
    );
}

#[test]
fn cook_requires_the_utensil() {
    let mut engine = build(1);
    stock_up(&mut engine, &[("raw_meat", 1)]);

    engine.apply(PlayerAction::Cook { recipe_id: "cook_steak".into(), success: true });

    let state = engine.state();
    assert_eq!(state.personal_inventory.get("raw_meat"), Some(&1), "nothing consumed");
    assert!(state.messages.last().unwrap().contains("You need a Frying Pan"));
}

#[test]
fn cook_requires_every_ingredient() {
    let mut engine = build(1);
    // Pot but only one of the two soup ingredients.
    stock_up(&mut engine, &[("pot", 1), ("raw_fish", 1)]);

    engine.apply(PlayerAction::Cook { recipe_id: "make_soup".into(), success: true });

    let state = engine.state();
    assert_eq!(state.personal_inventory.get("raw_fish"), Some(&1), "nothing consumed");
    assert!(state.messages.last().unwrap().contains("Not enough Vegetables to cook Fish Soup"));
}

#[test]
fn multi_unit_requirement_is_enforced() {
    let mut engine = build(1);
    stock_up(&mut engine, &[("knife", 1), ("vegetables", 1)]); // salad needs 2

    engine.apply(PlayerAction::Cook { recipe_id: "make_salad".into(), success: true });
    assert_eq!(engine.state().personal_inventory.get("vegetables"), Some(&1));

    stock_up(&mut engine, &[("vegetables", 1)]);
    engine.apply(PlayerAction::Cook { recipe_id: "make_salad".into(), success: true });
    assert!(!engine.state().personal_inventory.contains_key("vegetables"));
    assert_eq!(engine.state().personal_inventory.get("salad"), Some(&1));
}

#[test]
fn unknown_recipe_is_silent_noop() {
    let mut engine = build(1);
    let before = engine.state().clone();
    engine.apply(PlayerAction::Cook { recipe_id: "nope".into(), success: true });
    assert_eq!(*engine.state(), before);
}

#[test]
fn custom_recipes_are_stored_unvalidated_and_cookable() {
    let mut engine = build(1);
    let recipe = Recipe {
        id: "toast".into(),
        name: "Toast".into(),
        requires: BTreeMap::from([("bread".into(), 1)]),
        utensil: "pan".into(),
        produces: "apple".into(),
    };
    engine.apply(PlayerAction::CreateRecipe { recipe: recipe.clone() });

    let state = engine.state();
    assert_eq!(state.custom_recipes.len(), 1);
    assert!(state.messages.last().unwrap().contains("Created new recipe: Toast"));

    stock_up(&mut engine, &[("pan", 1), ("bread", 1)]);
    engine.apply(PlayerAction::Cook { recipe_id: "toast".into(), success: true });
    assert_eq!(engine.state().personal_inventory.get("apple"), Some(&1));
}

/// On an id collision the catalog recipe shadows the custom one.
#[test]
fn catalog_recipe_wins_on_id_collision() {
    let mut engine = build(1);
    let shadowed = Recipe {
        id: "cook_steak".into(),
        name: "Free Steak".into(),
        requires: BTreeMap::new(),
        utensil: "knife".into(),
        produces: "cooked_steak".into(),
    };
    engine.apply(PlayerAction::CreateRecipe { recipe: shadowed });

    // Without a pan the catalog version refuses; the custom one would not.
    engine.apply(PlayerAction::Cook { recipe_id: "cook_steak".into(), success: true });
    assert!(engine.state().messages.last().unwrap().contains("You need a Frying Pan"));
}

#[test]
fn cook_success_chance_is_eighty_percent() {
    let mut engine = build(7);
    let rolls: Vec<bool> = (0..1_000).map(|_| engine.roll_cook_success()).collect();
    let hits = rolls.iter().filter(|&&b| b).count();
    // 1 000 draws at p = 0.8: far outside these bounds would mean a
    // broken distribution, not bad luck.
    assert!((700..=900).contains(&hits), "suspicious hit count: {hits}");
}
