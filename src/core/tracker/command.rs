//! Tracker Commands
//!
//! Every state change arrives as one of these, applied in receipt order.

use serde::{Deserialize, Serialize};

use crate::core::campaign::{
    Adventure, Campaign, CampaignObject, DrawnCard, Encounter, EncounterEnemy, EncounterNpc,
    EncounterObject, Npc, Reward, Session,
};
use crate::core::combat::{ActionKind, CombatState, EntryUpdate, InitiativeEntry};

/// Partial update of an enemy placed in an encounter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct EnemyUpdate {
    pub nickname: Option<String>,
    pub current_pv: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct NpcLinkUpdate {
    pub version_id: Option<String>,
    pub current_pv: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectLinkUpdate {
    pub quantity: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Command {
    // Hierarchy
    CreateCampaign {
        campaign: Campaign,
    },
    CreateAdventure {
        campaign_id: String,
        adventure: Adventure,
    },
    CreateSession {
        campaign_id: String,
        adventure_id: String,
        session: Session,
    },
    CreateEncounter {
        campaign_id: String,
        adventure_id: String,
        session_id: String,
        encounter: Encounter,
    },

    // Navigation
    SetActiveCampaign {
        campaign_id: Option<String>,
    },
    SetActiveAdventure {
        adventure_id: Option<String>,
    },
    SetActiveSession {
        session_id: Option<String>,
    },
    SetActiveEncounter {
        encounter_id: Option<String>,
    },

    // Catalogs
    AddCampaignNpc {
        campaign_id: String,
        npc: Npc,
    },
    RemoveCampaignNpc {
        campaign_id: String,
        npc_id: String,
    },
    AddCampaignObject {
        campaign_id: String,
        object: CampaignObject,
    },
    RemoveCampaignObject {
        campaign_id: String,
        object_id: String,
    },
    DrawCard {
        adventure_id: String,
        card: DrawnCard,
    },

    // Encounter contents
    AddEnemyToEncounter {
        encounter_id: String,
        enemy: EncounterEnemy,
    },
    RemoveEnemyFromEncounter {
        encounter_id: String,
        enemy_id: String,
    },
    UpdateEnemyInEncounter {
        encounter_id: String,
        enemy_id: String,
        updates: EnemyUpdate,
    },
    AddNpcToEncounter {
        encounter_id: String,
        npc: EncounterNpc,
    },
    RemoveNpcFromEncounter {
        encounter_id: String,
        link_id: String,
    },
    UpdateNpcInEncounter {
        encounter_id: String,
        link_id: String,
        updates: NpcLinkUpdate,
    },
    AddObjectToEncounter {
        encounter_id: String,
        object: EncounterObject,
    },
    RemoveObjectFromEncounter {
        encounter_id: String,
        link_id: String,
    },
    UpdateObjectInEncounter {
        encounter_id: String,
        link_id: String,
        updates: ObjectLinkUpdate,
    },
    AddReward {
        encounter_id: String,
        reward: Reward,
    },
    RemoveReward {
        encounter_id: String,
        reward_id: String,
    },
    ToggleReward {
        encounter_id: String,
        reward_id: String,
    },

    // Combat
    StartCombat {
        encounter_id: String,
        initiative_order: Vec<InitiativeEntry>,
    },
    SetInitiative {
        entry_id: String,
        value: i32,
    },
    ResolveInitiative,
    /// Reapply initiative order to a running combat after corrections.
    ResortInitiative,
    RestoreCombat {
        combat: CombatState,
    },
    UpdateCombatEntry {
        entry_id: String,
        updates: EntryUpdate,
    },
    DamageCombatant {
        entry_id: String,
        amount: i32,
    },
    HealCombatant {
        entry_id: String,
        amount: i32,
    },
    AddCondition {
        entry_id: String,
        condition: String,
    },
    RemoveCondition {
        entry_id: String,
        condition: String,
    },
    UseAction {
        entry_id: String,
        action: ActionKind,
    },
    NextTurn,
    PreviousTurn,
    EndCombat,
}

impl Command {
    /// Wire name, as used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateCampaign { .. } => "CREATE_CAMPAIGN",
            Self::CreateAdventure { .. } => "CREATE_ADVENTURE",
            Self::CreateSession { .. } => "CREATE_SESSION",
            Self::CreateEncounter { .. } => "CREATE_ENCOUNTER",
            Self::SetActiveCampaign { .. } => "SET_ACTIVE_CAMPAIGN",
            Self::SetActiveAdventure { .. } => "SET_ACTIVE_ADVENTURE",
            Self::SetActiveSession { .. } => "SET_ACTIVE_SESSION",
            Self::SetActiveEncounter { .. } => "SET_ACTIVE_ENCOUNTER",
            Self::AddCampaignNpc { .. } => "ADD_CAMPAIGN_NPC",
            Self::RemoveCampaignNpc { .. } => "REMOVE_CAMPAIGN_NPC",
            Self::AddCampaignObject { .. } => "ADD_CAMPAIGN_OBJECT",
            Self::RemoveCampaignObject { .. } => "REMOVE_CAMPAIGN_OBJECT",
            Self::DrawCard { .. } => "DRAW_CARD",
            Self::AddEnemyToEncounter { .. } => "ADD_ENEMY_TO_ENCOUNTER",
            Self::RemoveEnemyFromEncounter { .. } => "REMOVE_ENEMY_FROM_ENCOUNTER",
            Self::UpdateEnemyInEncounter { .. } => "UPDATE_ENEMY_IN_ENCOUNTER",
            Self::AddNpcToEncounter { .. } => "ADD_NPC_TO_ENCOUNTER",
            Self::RemoveNpcFromEncounter { .. } => "REMOVE_NPC_FROM_ENCOUNTER",
            Self::UpdateNpcInEncounter { .. } => "UPDATE_NPC_IN_ENCOUNTER",
            Self::AddObjectToEncounter { .. } => "ADD_OBJECT_TO_ENCOUNTER",
            Self::RemoveObjectFromEncounter { .. } => "REMOVE_OBJECT_FROM_ENCOUNTER",
            Self::UpdateObjectInEncounter { .. } => "UPDATE_OBJECT_IN_ENCOUNTER",
            Self::AddReward { .. } => "ADD_REWARD",
            Self::RemoveReward { .. } => "REMOVE_REWARD",
            Self::ToggleReward { .. } => "TOGGLE_REWARD",
            Self::StartCombat { .. } => "START_COMBAT",
            Self::SetInitiative { .. } => "SET_INITIATIVE",
            Self::ResolveInitiative => "RESOLVE_INITIATIVE",
            Self::ResortInitiative => "RESORT_INITIATIVE",
            Self::RestoreCombat { .. } => "RESTORE_COMBAT",
            Self::UpdateCombatEntry { .. } => "UPDATE_COMBAT_ENTRY",
            Self::DamageCombatant { .. } => "DAMAGE_COMBATANT",
            Self::HealCombatant { .. } => "HEAL_COMBATANT",
            Self::AddCondition { .. } => "ADD_CONDITION",
            Self::RemoveCondition { .. } => "REMOVE_CONDITION",
            Self::UseAction { .. } => "USE_ACTION",
            Self::NextTurn => "NEXT_TURN",
            Self::PreviousTurn => "PREVIOUS_TURN",
            Self::EndCombat => "END_COMBAT",
        }
    }
}
