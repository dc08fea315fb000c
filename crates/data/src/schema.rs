use serde::{Deserialize, Serialize};

pub use gachasim_core::{
    Content, DrawConfig, DrawRules, GateRule, HistoryEntry, Item, PickupRule, PromotionChances,
    Tier, TierWeights,
};

/// Shape of `rates.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesFile {
    pub rates: TierWeights,
    pub guaranteed_rates: TierWeights,
}

/// Roster file name per tier, under `content/`.
pub const ROSTER_FILES: [(Tier, &str); 4] = [
    (Tier::Top, "top.json"),
    (Tier::MidUpper, "mid_upper.json"),
    (Tier::Mid, "mid.json"),
    (Tier::Floor, "floor.json"),
];
