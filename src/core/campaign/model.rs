//! Campaign Hierarchy
//!
//! Campaign → adventure → session → encounter, owned top-down, plus the
//! linking entities that place catalog entries inside an encounter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::{CampaignObject, Creature, DrawnCard, Npc};
use super::{CampaignError, Result};

// ============================================================================
// Hierarchy
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub adventures: Vec<Adventure>,
    #[serde(default)]
    pub npcs: Vec<Npc>,
    #[serde(default)]
    pub objects: Vec<CampaignObject>,
}

impl Campaign {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            adventures: Vec::new(),
            npcs: Vec::new(),
            objects: Vec::new(),
        }
    }

    /// Parse a campaign snapshot exported by the host application.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(CampaignError::from)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(CampaignError::from)
    }

    pub fn npc(&self, npc_id: &str) -> Option<&Npc> {
        self.npcs.iter().find(|n| n.id == npc_id)
    }

    pub fn object(&self, object_id: &str) -> Option<&CampaignObject> {
        self.objects.iter().find(|o| o.id == object_id)
    }

    pub fn adventure(&self, adventure_id: &str) -> Option<&Adventure> {
        self.adventures.iter().find(|a| a.id == adventure_id)
    }

    pub fn adventure_mut(&mut self, adventure_id: &str) -> Option<&mut Adventure> {
        self.adventures.iter_mut().find(|a| a.id == adventure_id)
    }

    pub fn encounters(&self) -> impl Iterator<Item = &Encounter> {
        self.adventures
            .iter()
            .flat_map(|a| a.sessions.iter())
            .flat_map(|s| s.encounters.iter())
    }

    pub fn encounter(&self, encounter_id: &str) -> Option<&Encounter> {
        self.encounters().find(|e| e.id == encounter_id)
    }

    pub fn encounter_mut(&mut self, encounter_id: &str) -> Option<&mut Encounter> {
        self.adventures
            .iter_mut()
            .flat_map(|a| a.sessions.iter_mut())
            .flat_map(|s| s.encounters.iter_mut())
            .find(|e| e.id == encounter_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Adventure {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sessions: Vec<Session>,
    /// Cards drawn for the adventure as a whole, not for any one encounter
    #[serde(default)]
    pub drawn_cards: Vec<DrawnCard>,
}

impl Adventure {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            sessions: Vec::new(),
            drawn_cards: Vec::new(),
        }
    }

    pub fn session(&self, session_id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == session_id)
    }

    pub fn session_mut(&mut self, session_id: &str) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.id == session_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub name: String,
    pub number: u32,
    #[serde(default)]
    pub encounters: Vec<Encounter>,
}

impl Session {
    pub fn new(name: impl Into<String>, number: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            number,
            encounters: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EncounterStatus {
    #[default]
    Draft,
    Ready,
    Active,
    Done,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: EncounterStatus,
    #[serde(default)]
    pub enemies: Vec<EncounterEnemy>,
    #[serde(default)]
    pub encounter_npcs: Vec<EncounterNpc>,
    #[serde(default)]
    pub encounter_objects: Vec<EncounterObject>,
    #[serde(default)]
    pub rewards: Vec<Reward>,
}

impl Encounter {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            status: EncounterStatus::Draft,
            enemies: Vec::new(),
            encounter_npcs: Vec::new(),
            encounter_objects: Vec::new(),
            rewards: Vec::new(),
        }
    }

    pub fn enemy_mut(&mut self, enemy_id: &str) -> Option<&mut EncounterEnemy> {
        self.enemies.iter_mut().find(|e| e.id == enemy_id)
    }

    pub fn npc_mut(&mut self, link_id: &str) -> Option<&mut EncounterNpc> {
        self.encounter_npcs.iter_mut().find(|n| n.id == link_id)
    }

    pub fn object_mut(&mut self, link_id: &str) -> Option<&mut EncounterObject> {
        self.encounter_objects.iter_mut().find(|o| o.id == link_id)
    }

    pub fn reward_mut(&mut self, reward_id: &str) -> Option<&mut Reward> {
        self.rewards.iter_mut().find(|r| r.id == reward_id)
    }
}

// ============================================================================
// Linking Entities
// ============================================================================

/// An enemy placed in an encounter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EncounterEnemy {
    pub id: String,
    pub creature_id: String,
    /// Stat block as it was when the enemy was placed
    pub creature: Creature,
    #[serde(default)]
    pub nickname: Option<String>,
    pub current_pv: i32,
    pub added_at: DateTime<Utc>,
}

impl EncounterEnemy {
    /// Place a creature, deep-copying its stat block so later template edits
    /// never reach this enemy.
    pub fn from_creature(creature: &Creature) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            creature_id: creature.id.clone(),
            creature: creature.clone(),
            nickname: None,
            current_pv: creature.pv,
            added_at: Utc::now(),
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.creature.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EncounterNpc {
    pub id: String,
    pub npc_id: String,
    #[serde(default)]
    pub version_id: Option<String>,
    #[serde(default)]
    pub current_pv: Option<i32>,
}

impl EncounterNpc {
    pub fn new(npc_id: impl Into<String>, version_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            npc_id: npc_id.into(),
            version_id,
            current_pv: None,
        }
    }

    /// Place an NPC in the given version, starting at that version's full PV.
    pub fn from_npc(npc: &Npc, version_id: Option<&str>) -> Self {
        let version = version_id
            .and_then(|id| npc.version(id))
            .or_else(|| npc.versions.first());
        Self {
            id: Uuid::new_v4().to_string(),
            npc_id: npc.id.clone(),
            version_id: version.map(|v| v.id.clone()),
            current_pv: version.and_then(|v| v.stats.as_ref()).map(|s| s.pv),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EncounterObject {
    pub id: String,
    pub object_id: String,
    pub quantity: u32,
}

impl EncounterObject {
    pub fn new(object_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            object_id: object_id.into(),
            quantity,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RewardType {
    Gold,
    Xp,
    Item,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: String,
    #[serde(rename = "type")]
    pub reward_type: RewardType,
    pub name: String,
    #[serde(default)]
    pub value: Option<i64>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub object_id: Option<String>,
    #[serde(default)]
    pub distributed: bool,
}

impl Reward {
    pub fn new(reward_type: RewardType, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            reward_type,
            name: name.into(),
            value: None,
            quantity: None,
            object_id: None,
            distributed: false,
        }
    }

    pub fn gold(amount: i64) -> Self {
        Self::new(RewardType::Gold, "Gold").with_value(amount)
    }

    pub fn xp(amount: i64) -> Self {
        Self::new(RewardType::Xp, "Experience").with_value(amount)
    }

    pub fn item(name: impl Into<String>) -> Self {
        Self::new(RewardType::Item, name)
    }

    pub fn with_value(mut self, value: i64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn linked_to(mut self, object_id: impl Into<String>) -> Self {
        self.object_id = Some(object_id.into());
        self
    }
}
