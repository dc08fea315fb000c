//! Draw engine for the gacha simulator. Keep this crate free of IO and
//! platform concerns.

pub mod config;
pub mod content;
pub mod engine;
#[cfg(test)]
mod fixtures;
pub mod gate;
pub mod history;
pub mod promotion;
pub mod reveal;
pub mod rng;
pub mod sampler;
pub mod stats;
pub mod tier;

pub use config::*;
pub use content::*;
pub use engine::*;
pub use gate::*;
pub use history::*;
pub use promotion::*;
pub use reveal::*;
pub use rng::*;
pub use sampler::*;
pub use stats::*;
pub use tier::*;
