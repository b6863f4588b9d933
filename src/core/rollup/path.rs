//! Path Collector
//!
//! Flattens a campaign subtree into its encounters, each tagged with the
//! breadcrumb needed to navigate back to it.

use serde::{Deserialize, Serialize};

use crate::core::campaign::{Campaign, Encounter};

/// Breadcrumb from the campaign root down to one encounter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct EncounterPath {
    pub adventure_id: String,
    pub session_id: String,
    pub encounter_id: String,
    pub encounter_name: String,
}

/// An encounter borrowed from the hierarchy together with its breadcrumb.
#[derive(Debug, Clone)]
pub struct CollectedEncounter<'a> {
    pub encounter: &'a Encounter,
    pub path: EncounterPath,
}

/// Walk every encounter under `campaign`, optionally narrowed to one adventure
/// and/or one session.
///
/// Results follow traversal order: adventures, then sessions, then encounters,
/// exactly as stored.
pub fn collect_encounters<'a>(
    campaign: &'a Campaign,
    adventure_filter: Option<&str>,
    session_filter: Option<&str>,
) -> Vec<CollectedEncounter<'a>> {
    let mut collected = Vec::new();

    for adventure in &campaign.adventures {
        if adventure_filter.is_some_and(|id| id != adventure.id) {
            continue;
        }
        for session in &adventure.sessions {
            if session_filter.is_some_and(|id| id != session.id) {
                continue;
            }
            for encounter in &session.encounters {
                collected.push(CollectedEncounter {
                    encounter,
                    path: EncounterPath {
                        adventure_id: adventure.id.clone(),
                        session_id: session.id.clone(),
                        encounter_id: encounter.id.clone(),
                        encounter_name: encounter.name.clone(),
                    },
                });
            }
        }
    }

    collected
}
