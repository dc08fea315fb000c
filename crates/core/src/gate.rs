use crate::{DrawResult, GateOdds, GateRule, RandomSource, Tier};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GateLevel {
    Low,
    Middle,
    High,
}

impl GateRule {
    pub fn text(&self, level: GateLevel) -> &str {
        match level {
            GateLevel::Low => &self.texts.low,
            GateLevel::Middle => &self.texts.middle,
            GateLevel::High => &self.texts.high,
        }
    }
}

/// Picks the summary level for a finished batch. Single draws are always
/// `Low` and consume no randomness.
pub fn decide_gate<R: RandomSource + ?Sized>(
    results: &[DrawResult],
    rule: &GateRule,
    rng: &mut R,
) -> GateLevel {
    if results.len() <= 1 {
        return GateLevel::Low;
    }
    let has_top = results.iter().any(|r| r.true_tier >= Tier::Top);
    let has_mid_upper = results.iter().any(|r| r.true_tier == Tier::MidUpper);
    let mid_count = results.iter().filter(|r| r.true_tier == Tier::Mid).count();
    let roll = rng.next_f64();

    if has_top {
        return pick_level(&rule.with_top, roll);
    }
    if has_mid_upper {
        return pick_level(&rule.with_mid_upper, roll);
    }
    if mid_count >= rule.many_mid_min {
        let odds = GateOdds {
            high: 0.0,
            middle: rule.with_many_mid,
        };
        return pick_level(&odds, roll);
    }
    GateLevel::Low
}

fn pick_level(odds: &GateOdds, roll: f64) -> GateLevel {
    if roll < odds.high {
        GateLevel::High
    } else if roll < odds.high + odds.middle {
        GateLevel::Middle
    } else {
        GateLevel::Low
    }
}
