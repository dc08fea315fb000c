use crate::{
    date_label, decide_gate, partition, resolve_promotion, tier_stats, ConfigError, Content,
    DrawConfig, DrawRules, GateLevel, HistoryEntry, HistoryError, HistoryStore, Item,
    MemoryHistory, PromotionPath, RandomSource, RngState, Tier, TierStats,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DrawCount {
    Single,
    Ten,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("draw count must be 1 or 10, got {0}")]
pub struct DrawCountError(pub u32);

impl DrawCount {
    pub fn slots(self) -> usize {
        match self {
            DrawCount::Single => 1,
            DrawCount::Ten => 10,
        }
    }

    /// Index of the slot that draws from the guaranteed table.
    pub fn guaranteed_slot(self) -> Option<usize> {
        match self {
            DrawCount::Single => None,
            DrawCount::Ten => Some(9),
        }
    }
}

impl TryFrom<u32> for DrawCount {
    type Error = DrawCountError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(DrawCount::Single),
            10 => Ok(DrawCount::Ten),
            other => Err(DrawCountError(other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DrawResult {
    pub true_tier: Tier,
    pub display_tier: Tier,
    pub item: Item,
    pub promotion: Option<PromotionPath>,
    pub is_pickup: bool,
    pub guaranteed: bool,
    /// Whether an in-progress skip should pause on this slot.
    pub stop_auto_skip: bool,
}

impl DrawResult {
    pub fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DrawBatch {
    pub results: Vec<DrawResult>,
    pub gate: GateLevel,
    pub gate_text: String,
}

impl DrawBatch {
    pub fn best_tier(&self) -> Option<Tier> {
        self.results.iter().map(|result| result.true_tier).max()
    }
}

pub struct DrawEngine<R = RngState, H = MemoryHistory> {
    rules: DrawRules,
    content: Content,
    rng: R,
    history: H,
}

impl<R: RandomSource, H: HistoryStore> DrawEngine<R, H> {
    pub fn new(rules: DrawRules, content: Content, rng: R, history: H) -> Self {
        Self {
            rules,
            content,
            rng,
            history,
        }
    }

    pub fn from_config(
        config: &DrawConfig,
        content: Content,
        rng: R,
        history: H,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(config.resolve()?, content, rng, history))
    }

    pub fn rules(&self) -> &DrawRules {
        &self.rules
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    pub fn into_history(self) -> H {
        self.history
    }

    pub fn history_entries(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        self.history.entries()
    }

    pub fn clear_history(&mut self) -> Result<(), HistoryError> {
        self.history.clear()
    }

    pub fn stats(&self) -> Vec<TierStats> {
        tier_stats(&self.rules, &self.content)
    }

    /// Rolls a batch, records it to history and returns it. A history
    /// failure is logged; the batch is still returned.
    pub fn draw(&mut self, count: DrawCount) -> DrawBatch {
        let results = self.roll(count);
        let batch = self.finish(results);
        let date = date_label(&Local::now());
        if let Err(err) = self.history.record(&batch.results, &date) {
            warn!(%err, "failed to record draw history");
        }
        batch
    }

    /// Same as [`DrawEngine::draw`] without touching history.
    pub fn draw_unrecorded(&mut self, count: DrawCount) -> DrawBatch {
        let results = self.roll(count);
        self.finish(results)
    }

    fn roll(&mut self, count: DrawCount) -> Vec<DrawResult> {
        let guaranteed_slot = count.guaranteed_slot();
        (0..count.slots())
            .map(|slot| self.draw_slot(guaranteed_slot == Some(slot)))
            .collect()
    }

    fn finish(&mut self, results: Vec<DrawResult>) -> DrawBatch {
        let gate = decide_gate(&results, &self.rules.gate, &mut self.rng);
        let batch = DrawBatch {
            gate_text: self.rules.gate.text(gate).to_string(),
            gate,
            results,
        };
        info!(
            slots = batch.results.len(),
            best = ?batch.best_tier(),
            ?gate,
            "draw finished"
        );
        batch
    }

    /// One slot. The pickup band `[0, pickup_total)` is checked first in
    /// every slot, the guaranteed one included; a miss reuses the same roll
    /// against the rest of the table.
    pub fn draw_slot(&mut self, guaranteed: bool) -> DrawResult {
        let rates = if guaranteed {
            &self.rules.guaranteed
        } else {
            &self.rules.rates
        };
        let pickup = &self.rules.pickup;
        let reserved = pickup.total_weight();
        let roll = self.rng.percent();

        let (true_tier, item, is_pickup) = if roll < reserved {
            let item = self.content.pick_pickup(pickup, &mut self.rng);
            (pickup.featured_tier, item, true)
        } else {
            let tier = partition(rates, reserved, roll);
            (tier, self.content.pick_random(tier, &mut self.rng), false)
        };

        let promotion = resolve_promotion(
            true_tier,
            guaranteed,
            &self.rules.promotion,
            &mut self.rng,
        );
        let stop_auto_skip = true_tier >= Tier::MidUpper || promotion.is_promotion();
        debug!(
            roll,
            ?true_tier,
            display = ?promotion.initial,
            path = ?promotion.path,
            is_pickup,
            guaranteed,
            item = %item.id,
            "slot rolled"
        );

        DrawResult {
            true_tier,
            display_tier: promotion.initial,
            item,
            promotion: promotion.path,
            is_pickup,
            guaranteed,
            stop_auto_skip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_config;
    use crate::fixtures::sample_content;
    use crate::ScriptedRng;
    use proptest::prelude::*;

    fn engine(values: Vec<f64>) -> DrawEngine<ScriptedRng, MemoryHistory> {
        DrawEngine::from_config(
            &sample_config(),
            sample_content(),
            ScriptedRng::new(values),
            MemoryHistory::new(),
        )
        .expect("engine")
    }

    #[test]
    fn draw_count_from_number() {
        assert_eq!(DrawCount::try_from(1), Ok(DrawCount::Single));
        assert_eq!(DrawCount::try_from(10), Ok(DrawCount::Ten));
        assert_eq!(DrawCount::try_from(5), Err(DrawCountError(5)));
    }

    #[test]
    fn zero_roll_hits_pickup() {
        let mut engine = engine(vec![0.0]);
        let batch = engine.draw(DrawCount::Single);
        let result = &batch.results[0];
        assert!(result.is_pickup);
        assert_eq!(result.true_tier, Tier::MidUpper);
        assert!(["301", "302"].contains(&result.item.id.as_str()));
        assert_eq!(batch.gate, GateLevel::Low);
    }

    #[test]
    fn high_roll_lands_on_floor() {
        let mut engine = engine(vec![0.999, 0.0, 0.5]);
        let batch = engine.draw(DrawCount::Single);
        let result = &batch.results[0];
        assert!(!result.is_pickup);
        assert_eq!(result.true_tier, Tier::Floor);
        assert_eq!(result.display_tier, Tier::Floor);
        assert!(!result.stop_auto_skip);
        assert_eq!(result.item.id, "101");
    }

    #[test]
    fn roll_just_past_pickup_band_reuses_offset() {
        // 2.5 sits in [2, 3): the top slice right after the pickup band.
        let mut engine = engine(vec![0.025, 0.0, 0.99]);
        let result = engine.draw_slot(false);
        assert!(!result.is_pickup);
        assert_eq!(result.true_tier, Tier::Top);
        assert_eq!(result.display_tier, Tier::Mid);
        assert_eq!(result.promotion, Some(PromotionPath::TopFromMid));
        assert!(result.stop_auto_skip);
    }

    #[test]
    fn promotion_on_mid_stops_auto_skip() {
        // roll 10 -> mid; index 0; promotion roll 1 -> hide as floor
        let mut engine = engine(vec![0.10, 0.0, 0.0]);
        let result = engine.draw_slot(false);
        assert_eq!(result.true_tier, Tier::Mid);
        assert_eq!(result.display_tier, Tier::Floor);
        assert!(result.stop_auto_skip);
    }

    #[test]
    fn ten_draw_guarantees_last_slot() {
        let mut values = Vec::new();
        for _ in 0..9 {
            values.extend([0.99, 0.0, 0.5]);
        }
        // guaranteed slot: roll 50 -> mid, item 0, promotion roll 1, gate roll
        values.extend([0.5, 0.0, 0.0, 0.99]);
        let mut engine = engine(values);
        let batch = engine.draw(DrawCount::Ten);
        assert_eq!(batch.results.len(), 10);
        let non_floor: Vec<usize> = batch
            .results
            .iter()
            .enumerate()
            .filter(|(_, r)| r.true_tier != Tier::Floor)
            .map(|(idx, _)| idx)
            .collect();
        assert_eq!(non_floor, vec![9]);
        let last = &batch.results[9];
        assert!(last.guaranteed);
        assert_eq!(last.true_tier, Tier::Mid);
        assert_eq!(last.display_tier, Tier::Mid);
        assert!(!last.is_promotion());
        assert!(batch.results[..9].iter().all(|r| !r.guaranteed));
    }

    #[test]
    fn pickup_applies_in_guaranteed_slot() {
        let mut values = Vec::new();
        for _ in 0..9 {
            values.extend([0.99, 0.0, 0.5]);
        }
        values.extend([0.01, 0.0, 0.5, 0.99]);
        let mut engine = engine(values);
        let batch = engine.draw(DrawCount::Ten);
        let last = &batch.results[9];
        assert!(last.is_pickup);
        assert_eq!(last.item.id, "301");
    }

    #[test]
    fn draw_records_history_newest_first() {
        let mut values = Vec::new();
        for _ in 0..9 {
            values.extend([0.99, 0.0, 0.5]);
        }
        values.extend([0.5, 0.0, 0.99, 0.99]);
        let mut engine = engine(values);
        engine.draw(DrawCount::Ten);
        let entries = engine.history_entries().expect("entries");
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[0].rarity, Tier::Mid);
        assert_eq!(entries[0].name, "Haru Urara");
        assert!(entries[1..].iter().all(|e| e.rarity == Tier::Floor));
    }

    struct BrokenHistory;

    impl HistoryStore for BrokenHistory {
        fn entries(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
            Ok(Vec::new())
        }

        fn replace(&mut self, _entries: Vec<HistoryEntry>) -> Result<(), HistoryError> {
            Err(HistoryError::Storage("disk full".to_string()))
        }

        fn clear(&mut self) -> Result<(), HistoryError> {
            Err(HistoryError::Storage("disk full".to_string()))
        }
    }

    #[test]
    fn history_failure_still_returns_batch() {
        let mut values = Vec::new();
        for _ in 0..9 {
            values.extend([0.99, 0.0, 0.5]);
        }
        values.extend([0.5, 0.0, 0.99, 0.99]);
        let mut engine = DrawEngine::from_config(
            &sample_config(),
            sample_content(),
            ScriptedRng::new(values),
            BrokenHistory,
        )
        .expect("engine");
        let batch = engine.draw(DrawCount::Ten);
        assert_eq!(batch.results.len(), 10);
        assert_eq!(batch.results[9].true_tier, Tier::Mid);
        assert_eq!(batch.gate, GateLevel::Low);
        assert_eq!(batch.gate_text, "low");
        assert!(engine.history_entries().expect("entries").is_empty());
    }

    #[test]
    fn unrecorded_draw_leaves_history_alone() {
        let mut engine = engine(vec![0.99, 0.0, 0.5]);
        engine.draw_unrecorded(DrawCount::Single);
        assert!(!engine.history().is_present());
    }

    #[test]
    fn empty_rosters_still_resolve() {
        let mut engine = DrawEngine::from_config(
            &sample_config(),
            Content::default(),
            ScriptedRng::new(vec![0.5, 0.0, 0.5]),
            MemoryHistory::new(),
        )
        .expect("engine");
        let result = engine.draw_slot(false);
        assert_eq!(result.item, Item::no_data());
        let pickup = engine.rules().pickup.clone();
        let content = engine.content().clone();
        assert_eq!(content.pick_pickup(&pickup, engine.rng_mut()).name, "Unknown");
    }

    proptest! {
        #[test]
        fn guaranteed_slot_never_displays_floor(values in prop::collection::vec(0.0f64..1.0, 4)) {
            let mut engine = engine(values);
            let result = engine.draw_slot(true);
            prop_assert!(result.display_tier >= Tier::Mid);
            prop_assert!(result.true_tier >= Tier::Mid);
        }

        #[test]
        fn pickup_band_is_identical_in_both_slot_kinds(value in 0.0f64..1.0) {
            let mut open = engine(vec![value, 0.0, 0.5]);
            let mut guaranteed = engine(vec![value, 0.0, 0.5]);
            let open = open.draw_slot(false);
            let guaranteed = guaranteed.draw_slot(true);
            prop_assert_eq!(open.is_pickup, guaranteed.is_pickup);
            prop_assert_eq!(open.is_pickup, value * 100.0 < 2.0);
        }
    }
}
