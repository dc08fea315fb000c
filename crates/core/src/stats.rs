use crate::{Content, DrawRules, Item, Tier};
use serde::Serialize;

/// Read-only row for the rates/roster overview.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TierStats {
    pub label: String,
    pub tier: Tier,
    pub weight: f64,
    pub items: Vec<Item>,
}

pub fn tier_stats(rules: &DrawRules, content: &Content) -> Vec<TierStats> {
    let mut rows = Vec::new();
    let pickup = &rules.pickup;
    if pickup.is_active() {
        rows.push(TierStats {
            label: format!("PICKUP ({})", pickup.featured_tier.short_label()),
            tier: pickup.featured_tier,
            weight: pickup.total_weight(),
            items: pickup
                .ids
                .iter()
                .map(|id| content.resolve_by_id(id))
                .collect(),
        });
    }
    for tier in crate::ROSTER_TIERS {
        let weight = rules.rates.weight(tier);
        if tier == Tier::Top && weight <= 0.0 {
            continue;
        }
        rows.push(TierStats {
            label: tier.short_label(),
            tier,
            weight,
            items: content.roster(tier).to_vec(),
        });
    }
    rows
}
