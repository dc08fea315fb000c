use crate::{PickupSet, RandomSource, Tier};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub quote: String,
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quote: quote.into(),
        }
    }

    /// Stand-in for a draw that landed on an empty roster.
    pub fn no_data() -> Self {
        Self::new("000", "no data", "")
    }

    /// Stand-in for a pickup id that no roster contains.
    pub fn unknown(id: &str) -> Self {
        Self::new(id, "Unknown", "")
    }

    pub fn jackpot() -> Self {
        Self::new("999", "GOD PACK", "GOD PACK!!")
    }

    /// Splits a leading `[title]` (or full-width `［title］`) off the name.
    /// Returns `(None, name)` when there is no well-formed title.
    pub fn split_title(&self) -> (Option<&str>, &str) {
        let name = self.name.as_str();
        let Some(open) = name.chars().next().filter(|c| matches!(c, '[' | '［')) else {
            return (None, name);
        };
        let body_start = open.len_utf8();
        let close = name[body_start..]
            .char_indices()
            .skip(1)
            .find(|(_, c)| matches!(c, ']' | '］'));
        match close {
            Some((offset, c)) => {
                let end = body_start + offset + c.len_utf8();
                (Some(&name[..end]), &name[end..])
            }
            None => (None, name),
        }
    }
}

/// One roster per tier. Ids are unique within a roster.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Content {
    #[serde(default)]
    pub top: Vec<Item>,
    #[serde(default)]
    pub mid_upper: Vec<Item>,
    #[serde(default)]
    pub mid: Vec<Item>,
    #[serde(default)]
    pub floor: Vec<Item>,
}

impl Content {
    pub fn roster(&self, tier: Tier) -> &[Item] {
        match tier {
            Tier::Top => &self.top,
            Tier::MidUpper => &self.mid_upper,
            Tier::Mid => &self.mid,
            Tier::Floor => &self.floor,
            Tier::Jackpot => &[],
        }
    }

    pub fn roster_mut(&mut self, tier: Tier) -> Option<&mut Vec<Item>> {
        match tier {
            Tier::Top => Some(&mut self.top),
            Tier::MidUpper => Some(&mut self.mid_upper),
            Tier::Mid => Some(&mut self.mid),
            Tier::Floor => Some(&mut self.floor),
            Tier::Jackpot => None,
        }
    }

    pub fn pick_random<R: RandomSource + ?Sized>(&self, tier: Tier, rng: &mut R) -> Item {
        if tier == Tier::Jackpot {
            return Item::jackpot();
        }
        let roster = self.roster(tier);
        if roster.is_empty() {
            warn!(?tier, "empty roster, using placeholder item");
            return Item::no_data();
        }
        roster[rng.index(roster.len())].clone()
    }

    pub fn pick_pickup<R: RandomSource + ?Sized>(&self, pickup: &PickupSet, rng: &mut R) -> Item {
        if pickup.ids.is_empty() {
            return self.pick_random(pickup.featured_tier, rng);
        }
        let id = &pickup.ids[rng.index(pickup.ids.len())];
        self.resolve_by_id(id)
    }

    /// Finds an item by id, searching rosters best tier first.
    pub fn locate(&self, id: &str) -> Option<(Tier, &Item)> {
        crate::ROSTER_TIERS.iter().find_map(|&tier| {
            self.roster(tier)
                .iter()
                .find(|item| item.id == id)
                .map(|item| (tier, item))
        })
    }

    pub fn resolve_by_id(&self, id: &str) -> Item {
        match self.locate(id) {
            Some((_, item)) => item.clone(),
            None => {
                warn!(id, "pickup id not found in any roster");
                Item::unknown(id)
            }
        }
    }

    pub fn len(&self) -> usize {
        crate::ROSTER_TIERS
            .iter()
            .map(|&tier| self.roster(tier).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
