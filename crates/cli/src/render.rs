use gachasim_core::{DrawCount, DrawResult, DrawRules, HistoryEntry, Item, Tier, TierStats};
use std::collections::HashMap;

pub fn item_name(item: &Item) -> String {
    match item.split_title() {
        (Some(title), name) => format!("{title} {name}"),
        (None, name) => name.to_string(),
    }
}

pub fn result_line(slot: usize, result: &DrawResult) -> String {
    let mut line = format!(
        "{:>2}. {:<6} {}",
        slot + 1,
        result.true_tier.label(),
        item_name(&result.item)
    );
    if result.is_pickup {
        line.push_str("  [PICKUP]");
    }
    if result.is_promotion() {
        line.push_str(&format!("  (from {})", result.display_tier.label()));
    }
    line
}

pub fn pending_line(slot: usize, tier: Tier) -> String {
    format!("{:>2}. {:<6} ???", slot + 1, tier.label())
}

pub fn quote_line(item: &Item) -> Option<String> {
    if item.quote.is_empty() {
        None
    } else {
        Some(format!("      \"{}\"", item.quote))
    }
}

pub fn stats_table(rows: &[TierStats]) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(&format!(
            "{:<12} {:>7.3}%  {} item(s)\n",
            row.label,
            row.weight,
            row.items.len()
        ));
        for item in &row.items {
            out.push_str(&format!("    {} {}\n", item.id, item_name(item)));
        }
    }
    out
}

pub fn history_table(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "no history\n".to_string();
    }
    let mut out = String::new();
    for entry in entries {
        let mut line = format!("{:<11} {:<6} {}", entry.date, entry.rarity.short_label(), entry.name);
        if entry.is_pickup {
            line.push_str("  [PICKUP]");
        }
        if entry.is_promotion {
            line.push_str("  [promoted]");
        }
        out.push_str(&line);
        out.push('\n');
    }
    out
}

#[derive(Debug, Default)]
pub struct Tally {
    pub slots: u64,
    pub pickups: u64,
    pub promotions: u64,
    pub tiers: HashMap<Tier, u64>,
}

impl Tally {
    pub fn add(&mut self, result: &DrawResult) {
        self.slots += 1;
        if result.is_promotion() {
            self.promotions += 1;
        }
        if result.is_pickup {
            self.pickups += 1;
        } else {
            *self.tiers.entry(result.true_tier).or_default() += 1;
        }
    }

    fn percent(&self, count: u64) -> f64 {
        if self.slots == 0 {
            0.0
        } else {
            count as f64 * 100.0 / self.slots as f64
        }
    }

    /// Observed share per tier next to the expected weight for `count`.
    /// Pickup hits are counted on their own row.
    pub fn report(&self, rules: &DrawRules, count: DrawCount) -> String {
        let mut out = format!("{} slot(s)\n", self.slots);
        out.push_str(&format!(
            "{:<8} observed {:>7.3}%  expected {:>7.3}%\n",
            "PICKUP",
            self.percent(self.pickups),
            rules.pickup.total_weight()
        ));
        for tier in [Tier::Jackpot, Tier::Top, Tier::MidUpper, Tier::Mid, Tier::Floor] {
            let hits = self.tiers.get(&tier).copied().unwrap_or(0);
            let weight = expected_weight(rules, count, tier);
            if hits == 0 && weight <= 0.0 {
                continue;
            }
            out.push_str(&format!(
                "{:<8} observed {:>7.3}%  expected {:>7.3}%\n",
                tier.short_label(),
                self.percent(hits),
                weight
            ));
        }
        out.push_str(&format!(
            "promotions {:.3}%\n",
            self.percent(self.promotions)
        ));
        out
    }
}

/// Per-slot weight of `tier` averaged over a batch, the guaranteed slot
/// weighed by its share of the slots.
pub fn expected_weight(rules: &DrawRules, count: DrawCount, tier: Tier) -> f64 {
    let slots = count.slots() as f64;
    let guaranteed = if count.guaranteed_slot().is_some() { 1.0 } else { 0.0 };
    let open = slots - guaranteed;
    (rules.rates.weight(tier) * open + rules.guaranteed.weight(tier) * guaranteed) / slots
}
