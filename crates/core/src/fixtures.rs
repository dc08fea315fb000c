use crate::{
    Content, DrawConfig, GateOdds, GateRule, GateTexts, Item, PickupRule, PromotionChances, Tier,
    TierWeights,
};

pub(crate) fn sample_config() -> DrawConfig {
    DrawConfig {
        rates: TierWeights {
            jackpot: None,
            top: Some(1.0),
            mid_upper: 5.0,
            mid: 13.0,
        },
        guaranteed_rates: TierWeights {
            jackpot: None,
            top: Some(1.0),
            mid_upper: 5.0,
            mid: 92.0,
        },
        pickup: PickupRule {
            featured_tier: Tier::MidUpper,
            ids: vec!["301".to_string(), "302".to_string()],
            weight_per_item: 1.0,
        },
        promotion: PromotionChances {
            top_from_mid_upper: 40,
            mid_upper_hide_strong: 10,
            mid_upper_hide_weak: 20,
            mid_hide: 15,
        },
        gate: GateRule {
            texts: GateTexts {
                low: "low".to_string(),
                middle: "middle".to_string(),
                high: "high".to_string(),
            },
            with_top: GateOdds {
                high: 0.6,
                middle: 0.3,
            },
            with_mid_upper: GateOdds {
                high: 0.3,
                middle: 0.4,
            },
            with_many_mid: 0.3,
            many_mid_min: 2,
        },
    }
}

pub(crate) fn sample_content() -> Content {
    Content {
        top: vec![Item::new("401", "[Chairwoman]Akikawa", "Welcome.")],
        mid_upper: vec![
            Item::new("301", "Special Week", "I'll do my best!"),
            Item::new("302", "Silence Suzuka", ""),
            Item::new("303", "Tokai Teio", "Watch me!"),
        ],
        mid: vec![
            Item::new("201", "Haru Urara", ""),
            Item::new("202", "Nice Nature", ""),
        ],
        floor: vec![
            Item::new("101", "Trainee A", ""),
            Item::new("102", "Trainee B", ""),
        ],
    }
}
