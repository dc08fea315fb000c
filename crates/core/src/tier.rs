use serde::{Deserialize, Serialize};

/// Rarity tiers in reveal order. `Jackpot` sits above every roster tier and
/// is never roster-backed.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Floor,
    Mid,
    MidUpper,
    Top,
    Jackpot,
}

/// Roster tiers in lookup order, best first.
pub const ROSTER_TIERS: [Tier; 4] = [Tier::Top, Tier::MidUpper, Tier::Mid, Tier::Floor];

const JACKPOT_CODE: u32 = 999;

impl Tier {
    pub fn stars(self) -> Option<u8> {
        match self {
            Tier::Floor => Some(1),
            Tier::Mid => Some(2),
            Tier::MidUpper => Some(3),
            Tier::Top => Some(4),
            Tier::Jackpot => None,
        }
    }

    pub fn label(self) -> String {
        match self.stars() {
            Some(stars) => "★".repeat(stars as usize),
            None => "★GOD★".to_string(),
        }
    }

    pub fn short_label(self) -> String {
        match self.stars() {
            Some(stars) => format!("★{stars}"),
            None => "GOD".to_string(),
        }
    }

    pub fn is_roster_tier(self) -> bool {
        self != Tier::Jackpot
    }

    /// Numeric code used by the persisted history layout.
    pub fn storage_code(self) -> u32 {
        match self.stars() {
            Some(stars) => u32::from(stars),
            None => JACKPOT_CODE,
        }
    }

    pub fn from_storage_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Tier::Floor),
            2 => Some(Tier::Mid),
            3 => Some(Tier::MidUpper),
            4 => Some(Tier::Top),
            JACKPOT_CODE => Some(Tier::Jackpot),
            _ => None,
        }
    }
}

/// Serde adapter writing a tier as its storage code.
pub mod tier_code {
    use super::Tier;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(tier: &Tier, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(tier.storage_code())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Tier, D::Error> {
        let code = u32::deserialize(deserializer)?;
        Tier::from_storage_code(code)
            .ok_or_else(|| de::Error::custom(format!("unknown rarity code {code}")))
    }
}
