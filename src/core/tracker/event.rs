//! Tracker Events
//!
//! Side effects a command produces for the transport layer to forward to
//! other participants.

use serde::{Deserialize, Serialize};

use crate::core::combat::InitiativeEntry;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum TrackerEvent {
    /// Combat opened: ask participants to report their initiative
    InitiativeBroadcastRequested {
        encounter_id: String,
        entries: Vec<InitiativeEntry>,
    },
    /// A player's own entry changed; forward to that player
    PlayerEntryUpdated {
        character_id: String,
        entry: InitiativeEntry,
    },
    TurnChanged {
        round: u32,
        entry_id: Option<String>,
    },
    CombatEnded {
        encounter_id: String,
    },
}
