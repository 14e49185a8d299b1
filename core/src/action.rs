use crate::catalog::Recipe;
use crate::state::Location;
use crate::types::{EntityId, Money};
use serde::{Deserialize, Serialize};

/// All player-issued actions.
/// Variants added per feature — never removed or reordered.
///
/// Every action is a total state transition: when its preconditions
/// fail the world is left unchanged (silently, or with an explanatory
/// message in the log). No action ever raises an error to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlayerAction {
    // ── Clock control ─────────────────────────────
    Pause,
    Resume,

    // ── Shop ──────────────────────────────────────
    BuyProduct { product_id: EntityId, quantity: u32 },
    SetSellPrice { product_id: EntityId, price: Money },
    UpgradeShop,

    // ── Construction & fleet ──────────────────────
    BuildRoom { room_id: EntityId },
    DemolishRoom { room_id: EntityId },
    BuyVehicle { vehicle_id: EntityId },

    // ── Bank ──────────────────────────────────────
    BankDeposit { amount: Money },
    BankWithdraw { amount: Money },
    TakeLoan { amount: Money },
    RepayLoan { amount: Money },

    // ── Stock market ──────────────────────────────
    BuyStock { stock_id: EntityId, quantity: u32 },
    SellStock { stock_id: EntityId, quantity: u32 },

    // ── Personal life ─────────────────────────────
    Sleep,
    BuyPersonalItem { item_id: EntityId, quantity: u32 },
    Eat { item_id: EntityId },
    /// `success` is rolled by the caller (see SimEngine::roll_cook_success);
    /// the engine itself applies the outcome deterministically.
    Cook { recipe_id: EntityId, success: bool },
    CreateRecipe { recipe: Recipe },
    Travel { destination: Location },
}

impl PlayerAction {
    /// Stable short name, used for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::BuyProduct { .. } => "buy_product",
            Self::SetSellPrice { .. } => "set_sell_price",
            Self::UpgradeShop => "upgrade_shop",
            Self::BuildRoom { .. } => "build_room",
            Self::DemolishRoom { .. } => "demolish_room",
            Self::BuyVehicle { .. } => "buy_vehicle",
            Self::BankDeposit { .. } => "bank_deposit",
            Self::BankWithdraw { .. } => "bank_withdraw",
            Self::TakeLoan { .. } => "take_loan",
            Self::RepayLoan { .. } => "repay_loan",
            Self::BuyStock { .. } => "buy_stock",
            Self::SellStock { .. } => "sell_stock",
            Self::Sleep => "sleep",
            Self::BuyPersonalItem { .. } => "buy_personal_item",
            Self::Eat { .. } => "eat",
            Self::Cook { .. } => "cook",
            Self::CreateRecipe { .. } => "create_recipe",
            Self::Travel { .. } => "travel",
        }
    }
}
