use crate::Tier;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const RATE_TOTAL: f64 = 100.0;
const RATE_EPSILON: f64 = 1e-9;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{table}: weight for {tier:?} must be a non-negative number, got {value}")]
    InvalidWeight {
        table: &'static str,
        tier: Tier,
        value: f64,
    },
    #[error("{table}: configured weights plus pickup total {total} exceed 100")]
    WeightOverflow { table: &'static str, total: f64 },
    #[error("pickup weight per item must be a non-negative number, got {0}")]
    InvalidPickupWeight(f64),
    #[error("pickup featured tier must be between Mid and Top, got {0:?}")]
    InvalidFeaturedTier(Tier),
    #[error("promotion {rule}: chance total {total} exceeds 100")]
    PromotionOverflow { rule: &'static str, total: u32 },
    #[error("gate odds {rule}: probabilities must lie in [0, 1] and sum to at most 1")]
    InvalidGateOdds { rule: &'static str },
}

/// Configured per-tier percentages. The floor tier is never configured; it
/// is derived by [`RateTable::derive`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TierWeights {
    #[serde(default)]
    pub jackpot: Option<f64>,
    #[serde(default)]
    pub top: Option<f64>,
    pub mid_upper: f64,
    pub mid: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PickupRule {
    #[serde(default = "default_featured_tier")]
    pub featured_tier: Tier,
    #[serde(default)]
    pub ids: Vec<String>,
    #[serde(default)]
    pub weight_per_item: f64,
}

fn default_featured_tier() -> Tier {
    Tier::MidUpper
}

impl Default for PickupRule {
    fn default() -> Self {
        Self {
            featured_tier: default_featured_tier(),
            ids: Vec::new(),
            weight_per_item: 0.0,
        }
    }
}

/// Promotion trigger chances, in whole percent, compared against a roll in
/// `1..=100`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromotionChances {
    pub top_from_mid_upper: u32,
    pub mid_upper_hide_strong: u32,
    pub mid_upper_hide_weak: u32,
    pub mid_hide: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GateTexts {
    pub low: String,
    pub middle: String,
    pub high: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GateOdds {
    #[serde(default)]
    pub high: f64,
    #[serde(default)]
    pub middle: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GateRule {
    pub texts: GateTexts,
    pub with_top: GateOdds,
    pub with_mid_upper: GateOdds,
    /// Chance of the middle text when the batch holds several mid results.
    pub with_many_mid: f64,
    #[serde(default = "default_many_mid_min")]
    pub many_mid_min: usize,
}

fn default_many_mid_min() -> usize {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrawConfig {
    pub rates: TierWeights,
    pub guaranteed_rates: TierWeights,
    #[serde(default)]
    pub pickup: PickupRule,
    pub promotion: PromotionChances,
    pub gate: GateRule,
}

impl DrawConfig {
    /// Validates the configuration and derives the immutable rule set.
    pub fn resolve(&self) -> Result<DrawRules, ConfigError> {
        let pickup = PickupSet::from_rule(&self.pickup)?;
        let reserved = pickup.total_weight();
        let rates = RateTable::derive("rates", &self.rates, reserved, Tier::Floor)?;
        let guaranteed =
            RateTable::derive("guaranteed_rates", &self.guaranteed_rates, reserved, Tier::Mid)?;
        validate_promotion(&self.promotion)?;
        validate_gate(&self.gate)?;
        Ok(DrawRules {
            rates,
            guaranteed,
            pickup,
            promotion: self.promotion,
            gate: self.gate.clone(),
        })
    }
}

/// A resolved rate table. `remainder` is the derived `100 - sum` slice, and
/// `residual` is the tier that slice (and any rounding leftovers) resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateTable {
    pub jackpot: f64,
    pub top: f64,
    pub mid_upper: f64,
    pub mid: f64,
    pub remainder: f64,
    pub residual: Tier,
}

impl RateTable {
    pub fn derive(
        table: &'static str,
        weights: &TierWeights,
        reserved: f64,
        residual: Tier,
    ) -> Result<Self, ConfigError> {
        let jackpot = checked_weight(table, Tier::Jackpot, weights.jackpot.unwrap_or(0.0))?;
        let top = checked_weight(table, Tier::Top, weights.top.unwrap_or(0.0))?;
        let mid_upper = checked_weight(table, Tier::MidUpper, weights.mid_upper)?;
        let mid = checked_weight(table, Tier::Mid, weights.mid)?;
        let total = jackpot + top + mid_upper + mid + reserved;
        if total > RATE_TOTAL + RATE_EPSILON {
            return Err(ConfigError::WeightOverflow { table, total });
        }
        let remainder = round_rate(RATE_TOTAL - total).max(0.0);
        Ok(Self {
            jackpot,
            top,
            mid_upper,
            mid,
            remainder,
            residual,
        })
    }

    /// Configured slices in sampling priority order.
    pub fn slices(&self) -> [(Tier, f64); 4] {
        [
            (Tier::Jackpot, self.jackpot),
            (Tier::Top, self.top),
            (Tier::MidUpper, self.mid_upper),
            (Tier::Mid, self.mid),
        ]
    }

    /// Effective weight of a tier, with the remainder folded into `residual`.
    pub fn weight(&self, tier: Tier) -> f64 {
        let base = match tier {
            Tier::Jackpot => self.jackpot,
            Tier::Top => self.top,
            Tier::MidUpper => self.mid_upper,
            Tier::Mid => self.mid,
            Tier::Floor => 0.0,
        };
        if tier == self.residual {
            round_rate(base + self.remainder)
        } else {
            base
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickupSet {
    pub featured_tier: Tier,
    pub ids: Vec<String>,
    pub weight_per_item: f64,
}

impl PickupSet {
    fn from_rule(rule: &PickupRule) -> Result<Self, ConfigError> {
        if !(Tier::Mid..=Tier::Top).contains(&rule.featured_tier) {
            return Err(ConfigError::InvalidFeaturedTier(rule.featured_tier));
        }
        if !(rule.weight_per_item.is_finite() && rule.weight_per_item >= 0.0) {
            return Err(ConfigError::InvalidPickupWeight(rule.weight_per_item));
        }
        Ok(Self {
            featured_tier: rule.featured_tier,
            ids: rule.ids.clone(),
            weight_per_item: rule.weight_per_item,
        })
    }

    pub fn total_weight(&self) -> f64 {
        round_rate(self.ids.len() as f64 * self.weight_per_item)
    }

    pub fn is_active(&self) -> bool {
        self.total_weight() > 0.0
    }
}

/// Frozen rule set consumed by the draw engine.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRules {
    pub rates: RateTable,
    pub guaranteed: RateTable,
    pub pickup: PickupSet,
    pub promotion: PromotionChances,
    pub gate: GateRule,
}

fn checked_weight(table: &'static str, tier: Tier, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidWeight { table, tier, value })
    }
}

fn round_rate(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn validate_promotion(chances: &PromotionChances) -> Result<(), ConfigError> {
    let checks = [
        ("top_from_mid_upper", chances.top_from_mid_upper),
        ("mid_upper_hide_strong", chances.mid_upper_hide_strong),
        ("mid_upper_hide_weak", chances.mid_upper_hide_weak),
        (
            "mid_upper_hide",
            chances
                .mid_upper_hide_strong
                .saturating_add(chances.mid_upper_hide_weak),
        ),
        ("mid_hide", chances.mid_hide),
    ];
    for (rule, total) in checks {
        if total > 100 {
            return Err(ConfigError::PromotionOverflow { rule, total });
        }
    }
    Ok(())
}

fn validate_gate(gate: &GateRule) -> Result<(), ConfigError> {
    let in_unit = |value: f64| value.is_finite() && (0.0..=1.0).contains(&value);
    let odds = [
        ("with_top", gate.with_top),
        ("with_mid_upper", gate.with_mid_upper),
        (
            "with_many_mid",
            GateOdds {
                high: 0.0,
                middle: gate.with_many_mid,
            },
        ),
    ];
    for (rule, odds) in odds {
        if !in_unit(odds.high) || !in_unit(odds.middle) || odds.high + odds.middle > 1.0 {
            return Err(ConfigError::InvalidGateOdds { rule });
        }
    }
    Ok(())
}
