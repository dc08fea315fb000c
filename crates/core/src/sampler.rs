use crate::{RandomSource, RateTable, Tier};

/// Partitions `[offset, 100)` by the table's slices in priority order and
/// returns the tier whose slice holds `roll`. The band below `offset` belongs
/// to the caller (the pickup reservation), so a roll that missed it is reused
/// here instead of drawing again. Zero-weight slices never match.
pub fn partition(rates: &RateTable, offset: f64, roll: f64) -> Tier {
    let mut threshold = offset;
    for (tier, weight) in rates.slices() {
        if weight <= 0.0 {
            continue;
        }
        threshold += weight;
        if roll < threshold {
            return tier;
        }
    }
    rates.residual
}

/// Draws a fresh roll and samples a tier with no reserved band.
pub fn sample<R: RandomSource + ?Sized>(rates: &RateTable, rng: &mut R) -> Tier {
    let roll = rng.percent();
    partition(rates, 0.0, roll)
}
