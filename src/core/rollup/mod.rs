//! Rollup Module
//!
//! Summaries of everything that appears beneath a campaign, adventure or
//! session: enemies, NPCs, objects, narrative cards and rewards, each with a
//! way back to the encounters they came from.

pub mod aggregate;
pub mod path;

use serde::{Deserialize, Serialize};

use crate::core::campaign::{Adventure, Campaign};

pub use aggregate::{
    aggregate, AggregatedCard, AggregatedData, AggregatedEnemy, AggregatedNpc, AggregatedObject,
    CardSection, ItemReward, RewardSummary, RollupCounts, UNKNOWN_NPC_NAME, UNKNOWN_OBJECT_NAME,
};
pub use path::{collect_encounters, CollectedEncounter, EncounterPath};

/// The subtree a rollup covers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum RollupScope {
    Campaign,
    Adventure {
        adventure_id: String,
    },
    Session {
        adventure_id: String,
        session_id: String,
    },
}

/// Collect and aggregate one scope of `campaign`.
///
/// Cards belong to adventures, so a session-level rollup carries none. An
/// adventure id that does not exist yields an empty rollup.
pub fn rollup(campaign: &Campaign, scope: &RollupScope) -> AggregatedData {
    let (adventure_filter, session_filter) = match scope {
        RollupScope::Campaign => (None, None),
        RollupScope::Adventure { adventure_id } => (Some(adventure_id.as_str()), None),
        RollupScope::Session {
            adventure_id,
            session_id,
        } => (Some(adventure_id.as_str()), Some(session_id.as_str())),
    };

    let adventures: &[Adventure] = match scope {
        RollupScope::Campaign => &campaign.adventures,
        RollupScope::Adventure { adventure_id } => campaign
            .adventures
            .iter()
            .position(|a| &a.id == adventure_id)
            .map(|i| std::slice::from_ref(&campaign.adventures[i]))
            .unwrap_or(&[]),
        RollupScope::Session { .. } => &[],
    };

    let collected = collect_encounters(campaign, adventure_filter, session_filter);
    aggregate(&collected, Some(campaign), adventures)
}
