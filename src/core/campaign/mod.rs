//! Campaign Module
//!
//! The four-level content hierarchy (campaign → adventure → session →
//! encounter), the campaign-scoped catalogs encounters point into, and the
//! party roster consumed when combat starts.
//!
//! Catalog references are plain ids. A reference whose target has been deleted
//! is not an error: consumers treat the missing lookup as "unknown".

pub mod catalog;
pub mod model;

use std::path::Path;

use thiserror::Error;

pub use catalog::{
    CampaignObject, CardType, Character, Creature, DrawnCard, Npc, NpcVersion, StatBlock,
};
pub use model::{
    Adventure, Campaign, Encounter, EncounterEnemy, EncounterNpc, EncounterObject,
    EncounterStatus, Reward, RewardType, Session,
};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum CampaignError {
    #[error("Failed to read campaign snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid campaign snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CampaignError>;

/// Load a campaign snapshot from a JSON file.
pub fn load_campaign(path: impl AsRef<Path>) -> Result<Campaign> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let campaign = Campaign::from_json(&contents)?;
    tracing::debug!(
        campaign_id = %campaign.id,
        adventures = campaign.adventures.len(),
        "Loaded campaign snapshot from {}",
        path.as_ref().display()
    );
    Ok(campaign)
}

/// Load a party roster (a JSON array of characters).
pub fn load_party(path: impl AsRef<Path>) -> Result<Vec<Character>> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&contents)?)
}
