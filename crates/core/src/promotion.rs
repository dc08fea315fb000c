use crate::{PromotionChances, RandomSource, Tier};
use serde::{Deserialize, Serialize};

/// Staged reveal path from the initially shown tier up to the rolled one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PromotionPath {
    #[serde(rename = "topFromMidUpper")]
    TopFromMidUpper,
    #[serde(rename = "topFromMid")]
    TopFromMid,
    /// floor -> mid -> mid-upper
    #[serde(rename = "C")]
    MidUpperFromFloor,
    /// mid -> mid-upper
    #[serde(rename = "B")]
    MidUpperFromMid,
    /// floor -> mid
    #[serde(rename = "A")]
    MidFromFloor,
}

impl PromotionPath {
    pub fn initial(self) -> Tier {
        match self {
            PromotionPath::TopFromMidUpper => Tier::MidUpper,
            PromotionPath::TopFromMid | PromotionPath::MidUpperFromMid => Tier::Mid,
            PromotionPath::MidUpperFromFloor | PromotionPath::MidFromFloor => Tier::Floor,
        }
    }

    /// Tiers shown after the initial one, ending at the rolled tier.
    pub fn stages(self) -> &'static [Tier] {
        match self {
            PromotionPath::TopFromMidUpper => &[Tier::Top],
            PromotionPath::TopFromMid => &[Tier::MidUpper, Tier::Top],
            PromotionPath::MidUpperFromFloor => &[Tier::Mid, Tier::MidUpper],
            PromotionPath::MidUpperFromMid => &[Tier::MidUpper],
            PromotionPath::MidFromFloor => &[Tier::Mid],
        }
    }

    pub fn target(self) -> Tier {
        match self {
            PromotionPath::TopFromMidUpper | PromotionPath::TopFromMid => Tier::Top,
            PromotionPath::MidUpperFromFloor | PromotionPath::MidUpperFromMid => Tier::MidUpper,
            PromotionPath::MidFromFloor => Tier::Mid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Promotion {
    pub initial: Tier,
    pub path: Option<PromotionPath>,
}

impl Promotion {
    fn none(tier: Tier) -> Self {
        Self {
            initial: tier,
            path: None,
        }
    }

    fn via(path: PromotionPath) -> Self {
        Self {
            initial: path.initial(),
            path: Some(path),
        }
    }

    pub fn is_promotion(&self) -> bool {
        self.path.is_some()
    }
}

pub fn resolve_promotion<R: RandomSource + ?Sized>(
    rolled: Tier,
    guaranteed: bool,
    chances: &PromotionChances,
    rng: &mut R,
) -> Promotion {
    let roll = rng.percent_roll();
    resolve_with_roll(rolled, guaranteed, chances, roll)
}

/// Decides what a slot shows first. `roll` is in `1..=100`. A guaranteed slot
/// never starts below `Mid`: strong mid-upper hides fall back to the mid
/// start, and mid hides are dropped entirely.
pub fn resolve_with_roll(
    rolled: Tier,
    guaranteed: bool,
    chances: &PromotionChances,
    roll: u32,
) -> Promotion {
    match rolled {
        Tier::Top => {
            if roll <= chances.top_from_mid_upper {
                Promotion::via(PromotionPath::TopFromMidUpper)
            } else {
                Promotion::via(PromotionPath::TopFromMid)
            }
        }
        Tier::MidUpper if roll <= chances.mid_upper_hide_strong => {
            if guaranteed {
                Promotion::via(PromotionPath::MidUpperFromMid)
            } else {
                Promotion::via(PromotionPath::MidUpperFromFloor)
            }
        }
        Tier::MidUpper
            if roll
                <= chances
                    .mid_upper_hide_strong
                    .saturating_add(chances.mid_upper_hide_weak) =>
        {
            Promotion::via(PromotionPath::MidUpperFromMid)
        }
        Tier::Mid if roll <= chances.mid_hide => {
            if guaranteed {
                Promotion::none(Tier::Mid)
            } else {
                Promotion::via(PromotionPath::MidFromFloor)
            }
        }
        other => Promotion::none(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chances() -> PromotionChances {
        PromotionChances {
            top_from_mid_upper: 40,
            mid_upper_hide_strong: 10,
            mid_upper_hide_weak: 20,
            mid_hide: 15,
        }
    }

    #[test]
    fn top_always_promotes() {
        let low = resolve_with_roll(Tier::Top, false, &chances(), 40);
        assert_eq!(low.path, Some(PromotionPath::TopFromMidUpper));
        assert_eq!(low.initial, Tier::MidUpper);
        let high = resolve_with_roll(Tier::Top, false, &chances(), 41);
        assert_eq!(high.path, Some(PromotionPath::TopFromMid));
        assert_eq!(high.initial, Tier::Mid);
    }

    #[test]
    fn mid_upper_strong_hide_starts_at_floor() {
        let promotion = resolve_with_roll(Tier::MidUpper, false, &chances(), 10);
        assert_eq!(promotion.path, Some(PromotionPath::MidUpperFromFloor));
        assert_eq!(promotion.initial, Tier::Floor);
    }

    #[test]
    fn mid_upper_strong_hide_falls_back_when_guaranteed() {
        let promotion = resolve_with_roll(Tier::MidUpper, true, &chances(), 1);
        assert_eq!(promotion.path, Some(PromotionPath::MidUpperFromMid));
        assert_eq!(promotion.initial, Tier::Mid);
    }

    #[test]
    fn mid_upper_weak_hide_and_miss() {
        let weak = resolve_with_roll(Tier::MidUpper, false, &chances(), 30);
        assert_eq!(weak.path, Some(PromotionPath::MidUpperFromMid));
        let miss = resolve_with_roll(Tier::MidUpper, false, &chances(), 31);
        assert_eq!(miss, Promotion::none(Tier::MidUpper));
    }

    #[test]
    fn huge_hide_chances_do_not_wrap() {
        let chances = PromotionChances {
            mid_upper_hide_strong: u32::MAX,
            mid_upper_hide_weak: 1,
            ..chances()
        };
        let promotion = resolve_with_roll(Tier::MidUpper, false, &chances, 100);
        assert_eq!(promotion.path, Some(PromotionPath::MidUpperFromFloor));
        let chances = PromotionChances {
            mid_upper_hide_strong: 0,
            mid_upper_hide_weak: u32::MAX,
            ..chances
        };
        let promotion = resolve_with_roll(Tier::MidUpper, false, &chances, 100);
        assert_eq!(promotion.path, Some(PromotionPath::MidUpperFromMid));
    }

    #[test]
    fn mid_hide_is_suppressed_when_guaranteed() {
        let open = resolve_with_roll(Tier::Mid, false, &chances(), 15);
        assert_eq!(open.path, Some(PromotionPath::MidFromFloor));
        assert_eq!(open.initial, Tier::Floor);
        let guaranteed = resolve_with_roll(Tier::Mid, true, &chances(), 15);
        assert!(!guaranteed.is_promotion());
        assert_eq!(guaranteed.initial, Tier::Mid);
    }

    #[test]
    fn floor_and_jackpot_never_promote() {
        for roll in [1, 50, 100] {
            assert_eq!(
                resolve_with_roll(Tier::Floor, false, &chances(), roll),
                Promotion::none(Tier::Floor)
            );
            assert_eq!(
                resolve_with_roll(Tier::Jackpot, true, &chances(), roll),
                Promotion::none(Tier::Jackpot)
            );
        }
    }

    #[test]
    fn stages_end_at_target() {
        let paths = [
            PromotionPath::TopFromMidUpper,
            PromotionPath::TopFromMid,
            PromotionPath::MidUpperFromFloor,
            PromotionPath::MidUpperFromMid,
            PromotionPath::MidFromFloor,
        ];
        for path in paths {
            assert_eq!(path.stages().last().copied(), Some(path.target()));
            assert!(path.stages().iter().all(|tier| *tier > path.initial()));
        }
    }

    proptest! {
        #[test]
        fn guaranteed_never_starts_below_mid(
            tier in prop::sample::select(vec![Tier::Mid, Tier::MidUpper, Tier::Top]),
            roll in 1u32..=100,
            strong in 0u32..=50,
            weak in 0u32..=50,
            mid_hide in 0u32..=100,
            top_from_mid_upper in 0u32..=100,
        ) {
            let chances = PromotionChances {
                top_from_mid_upper,
                mid_upper_hide_strong: strong,
                mid_upper_hide_weak: weak,
                mid_hide,
            };
            let promotion = resolve_with_roll(tier, true, &chances, roll);
            prop_assert!(promotion.initial >= Tier::Mid);
            prop_assert!(promotion.initial <= tier);
        }

        #[test]
        fn initial_never_exceeds_rolled(
            tier in prop::sample::select(crate::ROSTER_TIERS.to_vec()),
            roll in 1u32..=100,
            guaranteed in any::<bool>(),
        ) {
            let promotion = resolve_with_roll(tier, guaranteed, &chances(), roll);
            prop_assert!(promotion.initial <= tier);
            prop_assert_eq!(promotion.is_promotion(), promotion.initial < tier);
        }
    }
}
