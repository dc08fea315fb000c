use crate::schema::{
    Content, DrawConfig, DrawRules, GateRule, Item, PickupRule, PromotionChances, RatesFile,
    ROSTER_FILES,
};
use anyhow::{bail, Context};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const RATES_FILE: &str = "rates.json";
const PICKUP_FILE: &str = "pickup.json";
const PROMOTION_FILE: &str = "promotion.json";
const GATE_FILE: &str = "gate.json";
const CONTENT_DIR: &str = "content";

#[derive(Debug)]
pub struct LoadReport {
    pub config: DrawConfig,
    pub rules: DrawRules,
    pub content: Content,
    pub warnings: Vec<String>,
}

pub fn load_draw_config(dir: &Path) -> anyhow::Result<DrawConfig> {
    let rates: RatesFile = load_json(dir.join(RATES_FILE))?;
    let pickup_path = dir.join(PICKUP_FILE);
    let pickup: PickupRule = if pickup_path.exists() {
        load_json(pickup_path)?
    } else {
        PickupRule::default()
    };
    let promotion: PromotionChances = load_json(dir.join(PROMOTION_FILE))?;
    let gate: GateRule = load_json(dir.join(GATE_FILE))?;

    Ok(DrawConfig {
        rates: rates.rates,
        guaranteed_rates: rates.guaranteed_rates,
        pickup,
        promotion,
        gate,
    })
}

/// Loads one roster per tier from `content/`. A missing file is an empty
/// roster and is reported as a warning; a duplicate id is an error.
pub fn load_content(dir: &Path) -> anyhow::Result<(Content, Vec<String>)> {
    let base = dir.join(CONTENT_DIR);
    let mut content = Content::default();
    let mut warnings = Vec::new();
    for (tier, file) in ROSTER_FILES {
        let path = base.join(file);
        let items: Vec<Item> = if path.exists() {
            load_json(&path)?
        } else {
            warnings.push(format!("missing roster {}, tier {tier:?} is empty", path.display()));
            Vec::new()
        };
        if let Some(duplicate) = first_duplicate_id(&items) {
            bail!("duplicate id {duplicate} in {}", path.display());
        }
        debug!(?tier, count = items.len(), "roster loaded");
        if let Some(roster) = content.roster_mut(tier) {
            *roster = items;
        }
    }
    Ok((content, warnings))
}

/// Loads and validates everything the engine needs. Any configuration
/// inconsistency fails here, never at draw time.
pub fn load_bundle(dir: &Path) -> anyhow::Result<LoadReport> {
    let config = load_draw_config(dir)?;
    let rules = config
        .resolve()
        .with_context(|| format!("invalid draw config in {}", dir.display()))?;
    let (content, mut warnings) = load_content(dir)?;
    warnings.extend(pickup_warnings(&rules, &content));
    for tier in gachasim_core::ROSTER_TIERS {
        if content.roster(tier).is_empty() && rules.rates.weight(tier) > 0.0 {
            warnings.push(format!("tier {tier:?} has weight but no items"));
        }
    }
    for warning in &warnings {
        warn!("{warning}");
    }
    Ok(LoadReport {
        config,
        rules,
        content,
        warnings,
    })
}

pub fn pickup_warnings(rules: &DrawRules, content: &Content) -> Vec<String> {
    let pickup = &rules.pickup;
    let mut warnings = Vec::new();
    if pickup.ids.is_empty() && pickup.weight_per_item > 0.0 {
        warnings.push("pickup weight configured without pickup ids".to_string());
    }
    for id in &pickup.ids {
        match content.locate(id) {
            None => warnings.push(format!("pickup id {id} not found in any roster")),
            Some((tier, _)) if tier != pickup.featured_tier => warnings.push(format!(
                "pickup id {id} is in tier {tier:?}, drawn as {:?}",
                pickup.featured_tier
            )),
            Some(_) => {}
        }
    }
    warnings
}

fn first_duplicate_id(items: &[Item]) -> Option<&str> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(|item| item.id.as_str())
        .find(|id| !seen.insert(*id))
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
