//! Static reference data: products, stock listings, shop tiers, rooms,
//! vehicles, personal items, recipes.
//!
//! RULE: the catalog is immutable once built. The engine only ever reads
//! it for cost and capacity lookups; nothing in the simulation writes to
//! it. All entities are identified by stable string ids.

use crate::error::{SimError, SimResult};
use crate::types::{EntityId, Money};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Clothes,
    Electronics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    pub base_cost: Money,
    pub category: Category,
    pub description: String,
}

/// A tradable instrument as listed, with its opening price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockListing {
    pub id: EntityId,
    pub name: String,
    pub initial_price: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopTier {
    pub level: u32,
    pub cost: Money,
    pub capacity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomKind {
    Storage,
    Sales,
    Office,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSpec {
    pub id: EntityId,
    pub name: String,
    pub kind: RoomKind,
    pub capacity_bonus: u32,
    pub cost: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleKind {
    Bike,
    Van,
    Truck,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleSpec {
    pub id: EntityId,
    pub name: String,
    pub kind: VehicleKind,
    pub capacity_bonus: u32,
    pub cost: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Food,
    Utensil,
    Ingredient,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalItem {
    pub id: EntityId,
    pub name: String,
    pub kind: ItemKind,
    pub cost: Money,
    #[serde(default)]
    pub hunger_restore: f64,
    #[serde(default)]
    pub energy_restore: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: EntityId,
    pub name: String,
    /// ingredient id -> required quantity
    pub requires: BTreeMap<EntityId, u32>,
    pub utensil: EntityId,
    pub produces: EntityId,
}

/// On-disk shape of catalog.json. Kept separate from the runtime struct
/// so the file stays a flat set of lists.
#[derive(Debug, Clone, Deserialize)]
struct CatalogFile {
    products: Vec<Product>,
    stocks: Vec<StockListing>,
    shop_tiers: Vec<ShopTier>,
    rooms: Vec<RoomSpec>,
    vehicles: Vec<VehicleSpec>,
    personal_items: Vec<PersonalItem>,
    recipes: Vec<Recipe>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    products: HashMap<EntityId, Product>,
    stocks: Vec<StockListing>,
    shop_tiers: Vec<ShopTier>,
    rooms: HashMap<EntityId, RoomSpec>,
    vehicles: HashMap<EntityId, VehicleSpec>,
    personal_items: HashMap<EntityId, PersonalItem>,
    recipes: HashMap<EntityId, Recipe>,
}

impl Catalog {
    /// Load from `{data_dir}/catalog.json`.
    /// In tests and the default runner, use Catalog::builtin().
    pub fn load(data_dir: &str) -> SimResult<Self> {
        let path = format!("{data_dir}/catalog.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let file: CatalogFile = serde_json::from_str(&content)?;
        let catalog = Self::from_parts(file);
        catalog.validate()?;
        Ok(catalog)
    }

    /// Every id a recipe mentions must resolve to a personal item.
    fn validate(&self) -> SimResult<()> {
        for recipe in self.recipes.values() {
            for id in recipe
                .requires
                .keys()
                .chain([&recipe.utensil, &recipe.produces])
            {
                if !self.personal_items.contains_key(id) {
                    return Err(SimError::UnknownCatalogId { id: id.clone() });
                }
            }
        }
        Ok(())
    }

    fn from_parts(file: CatalogFile) -> Self {
        let mut shop_tiers = file.shop_tiers;
        shop_tiers.sort_by_key(|t| t.level);
        Self {
            products: file.products.into_iter().map(|p| (p.id.clone(), p)).collect(),
            stocks: file.stocks,
            shop_tiers,
            rooms: file.rooms.into_iter().map(|r| (r.id.clone(), r)).collect(),
            vehicles: file.vehicles.into_iter().map(|v| (v.id.clone(), v)).collect(),
            personal_items: file
                .personal_items
                .into_iter()
                .map(|i| (i.id.clone(), i))
                .collect(),
            recipes: file.recipes.into_iter().map(|r| (r.id.clone(), r)).collect(),
        }
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    pub fn stock_listings(&self) -> &[StockListing] {
        &self.stocks
    }

    pub fn tier(&self, level: u32) -> Option<&ShopTier> {
        self.shop_tiers.iter().find(|t| t.level == level)
    }

    /// Base capacity of a shop tier. Falls back to the first tier's
    /// capacity for an unknown level.
    pub fn tier_capacity(&self, level: u32) -> u32 {
        self.tier(level)
            .or_else(|| self.shop_tiers.first())
            .map(|t| t.capacity)
            .unwrap_or(0)
    }

    pub fn room(&self, id: &str) -> Option<&RoomSpec> {
        self.rooms.get(id)
    }

    pub fn vehicle(&self, id: &str) -> Option<&VehicleSpec> {
        self.vehicles.get(id)
    }

    pub fn personal_item(&self, id: &str) -> Option<&PersonalItem> {
        self.personal_items.get(id)
    }

    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.get(id)
    }

    /// Friendly name for a personal item, falling back to the raw id.
    pub fn item_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.personal_items.get(id).map(|i| i.name.as_str()).unwrap_or(id)
    }

    /// The canonical built-in data set.
    pub fn builtin() -> Self {
        fn item(
            id: &str,
            name: &str,
            kind: ItemKind,
            cost: Money,
            hunger_restore: f64,
            energy_restore: f64,
        ) -> PersonalItem {
            PersonalItem {
                id: id.into(),
                name: name.into(),
                kind,
                cost,
                hunger_restore,
                energy_restore,
            }
        }

        let products = vec![
            Product { id: "p1".into(), name: "Bread".into(), base_cost: 2.0, category: Category::Food, description: "Freshly baked daily.".into() },
            Product { id: "p2".into(), name: "Milk".into(), base_cost: 3.0, category: Category::Food, description: "Whole milk from local farms.".into() },
            Product { id: "p3".into(), name: "Eggs".into(), base_cost: 4.0, category: Category::Food, description: "A dozen free-range eggs.".into() },
            Product { id: "p4".into(), name: "T-Shirt".into(), base_cost: 15.0, category: Category::Clothes, description: "Comfortable cotton t-shirt.".into() },
            Product { id: "p5".into(), name: "Jeans".into(), base_cost: 30.0, category: Category::Clothes, description: "Durable blue denim jeans.".into() },
            Product { id: "p6".into(), name: "Smartphone".into(), base_cost: 300.0, category: Category::Electronics, description: "Latest model with high-res camera.".into() },
            Product { id: "p7".into(), name: "Headphones".into(), base_cost: 50.0, category: Category::Electronics, description: "Noise-cancelling wireless headphones.".into() },
        ];

        let stocks = vec![
            StockListing { id: "s1".into(), name: "TechCorp".into(), initial_price: 150.0 },
            StockListing { id: "s2".into(), name: "FoodInc".into(), initial_price: 40.0 },
            StockListing { id: "s3".into(), name: "RetailGroup".into(), initial_price: 80.0 },
        ];

        let shop_tiers = vec![
            ShopTier { level: 1, cost: 0.0, capacity: 100 },
            ShopTier { level: 2, cost: 5_000.0, capacity: 300 },
            ShopTier { level: 3, cost: 15_000.0, capacity: 1_000 },
            ShopTier { level: 4, cost: 50_000.0, capacity: 5_000 },
        ];

        let rooms = vec![
            RoomSpec { id: "r1".into(), name: "Backroom Storage".into(), kind: RoomKind::Storage, capacity_bonus: 500, cost: 2_000.0 },
            RoomSpec { id: "r2".into(), name: "Warehouse Expansion".into(), kind: RoomKind::Storage, capacity_bonus: 2_000, cost: 10_000.0 },
            RoomSpec { id: "r3".into(), name: "Sales Floor Expansion 1".into(), kind: RoomKind::Sales, capacity_bonus: 200, cost: 5_000.0 },
            RoomSpec { id: "r4".into(), name: "Sales Floor Expansion 2".into(), kind: RoomKind::Sales, capacity_bonus: 500, cost: 15_000.0 },
            RoomSpec { id: "r5".into(), name: "Manager Office".into(), kind: RoomKind::Office, capacity_bonus: 0, cost: 8_000.0 },
        ];

        let vehicles = vec![
            VehicleSpec { id: "v1".into(), name: "Delivery Bike".into(), kind: VehicleKind::Bike, capacity_bonus: 50, cost: 500.0 },
            VehicleSpec { id: "v2".into(), name: "Cargo Van".into(), kind: VehicleKind::Van, capacity_bonus: 300, cost: 4_000.0 },
            VehicleSpec { id: "v3".into(), name: "Heavy Truck".into(), kind: VehicleKind::Truck, capacity_bonus: 1_000, cost: 12_000.0 },
        ];

        let personal_items = vec![
            item("apple", "Apple", ItemKind::Food, 5.0, 15.0, 5.0),
            item("bread", "Bread Loaf", ItemKind::Food, 8.0, 25.0, 10.0),
            item("raw_meat", "Raw Meat", ItemKind::Ingredient, 15.0, 0.0, 0.0),
            item("raw_fish", "Raw Fish", ItemKind::Ingredient, 12.0, 0.0, 0.0),
            item("vegetables", "Vegetables", ItemKind::Ingredient, 6.0, 0.0, 0.0),
            item("pan", "Frying Pan", ItemKind::Utensil, 50.0, 0.0, 0.0),
            item("pot", "Cooking Pot", ItemKind::Utensil, 60.0, 0.0, 0.0),
            item("knife", "Chef Knife", ItemKind::Utensil, 40.0, 0.0, 0.0),
            item("cooked_steak", "Cooked Steak", ItemKind::Food, 0.0, 60.0, 30.0),
            item("fish_soup", "Fish Soup", ItemKind::Food, 0.0, 50.0, 40.0),
            item("salad", "Fresh Salad", ItemKind::Food, 0.0, 30.0, 20.0),
        ];

        let recipes = vec![
            Recipe {
                id: "cook_steak".into(),
                name: "Cook Steak".into(),
                requires: BTreeMap::from([("raw_meat".into(), 1)]),
                utensil: "pan".into(),
                produces: "cooked_steak".into(),
            },
            Recipe {
                id: "make_soup".into(),
                name: "Fish Soup".into(),
                requires: BTreeMap::from([("raw_fish".into(), 1), ("vegetables".into(), 1)]),
                utensil: "pot".into(),
                produces: "fish_soup".into(),
            },
            Recipe {
                id: "make_salad".into(),
                name: "Fresh Salad".into(),
                requires: BTreeMap::from([("vegetables".into(), 2)]),
                utensil: "knife".into(),
                produces: "salad".into(),
            },
        ];

        Self::from_parts(CatalogFile {
            products,
            stocks,
            shop_tiers,
            rooms,
            vehicles,
            personal_items,
            recipes,
        })
    }
}
