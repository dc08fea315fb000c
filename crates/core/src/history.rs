use crate::{tier_code, DrawResult, Tier};
use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const HISTORY_CAPACITY: usize = 100;
pub const HISTORY_KEY: &str = "oriuma_gacha_history_v1";

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history storage error: {0}")]
    Storage(String),
    #[error("history format error: {0}")]
    Format(String),
}

/// Flat persisted record, newest first in the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub date: String,
    pub name: String,
    #[serde(with = "tier_code")]
    pub rarity: Tier,
    pub is_promotion: bool,
    #[serde(default)]
    pub is_pickup: bool,
}

impl HistoryEntry {
    pub fn from_result(result: &DrawResult, date: &str) -> Self {
        Self {
            date: date.to_string(),
            name: result.item.name.clone(),
            rarity: result.true_tier,
            is_promotion: result.is_promotion(),
            is_pickup: result.is_pickup,
        }
    }
}

/// Key-value style log of past pulls. Implementations only store and load;
/// capping and ordering live in [`HistoryStore::record`].
pub trait HistoryStore {
    fn entries(&self) -> Result<Vec<HistoryEntry>, HistoryError>;

    fn replace(&mut self, entries: Vec<HistoryEntry>) -> Result<(), HistoryError>;

    fn clear(&mut self) -> Result<(), HistoryError>;

    fn record(&mut self, results: &[DrawResult], date: &str) -> Result<(), HistoryError> {
        let fresh = results
            .iter()
            .map(|result| HistoryEntry::from_result(result, date))
            .collect();
        self.prepend(fresh)
    }

    /// Prepends `fresh` (oldest first) so the last one ends up at the front,
    /// then drops whatever falls past the capacity.
    fn prepend(&mut self, fresh: Vec<HistoryEntry>) -> Result<(), HistoryError> {
        let existing = self.entries()?;
        self.replace(prepend_capped(existing, fresh))
    }
}

pub fn prepend_capped(existing: Vec<HistoryEntry>, fresh: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
    let mut merged: Vec<HistoryEntry> = fresh.into_iter().rev().collect();
    merged.extend(existing);
    merged.truncate(HISTORY_CAPACITY);
    merged
}

/// `M/D H:MM`, no zero padding except minutes.
pub fn date_label<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    format!(
        "{}/{} {}:{:02}",
        at.month(),
        at.day(),
        at.hour(),
        at.minute()
    )
}

#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    entries: Option<Vec<HistoryEntry>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_present(&self) -> bool {
        self.entries.is_some()
    }
}

impl HistoryStore for MemoryHistory {
    fn entries(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        Ok(self.entries.clone().unwrap_or_default())
    }

    fn replace(&mut self, entries: Vec<HistoryEntry>) -> Result<(), HistoryError> {
        self.entries = Some(entries);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), HistoryError> {
        self.entries = None;
        Ok(())
    }
}
