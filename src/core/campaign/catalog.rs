//! Campaign Catalogs
//!
//! Shared definitions referenced by id from encounters: creature stat blocks,
//! NPCs with their alternate versions, campaign objects, party characters and
//! narrative cards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Creatures
// ============================================================================

/// A creature stat block.
///
/// Encounters never hold a live reference to one of these; they embed a copy
/// taken when the enemy was placed (see [`super::EncounterEnemy::from_creature`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Creature {
    pub id: String,
    pub name: String,
    /// Challenge rating. Fractional for weak creatures (1/2, 1/4...).
    pub nd: f64,
    pub creature_type: String,
    pub pv: i32,
    #[serde(default)]
    pub pm: Option<i32>,
    #[serde(default)]
    pub ca: Option<i32>,
}

impl Creature {
    pub fn new(name: impl Into<String>, nd: f64, creature_type: impl Into<String>, pv: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            nd,
            creature_type: creature_type.into(),
            pv,
            pm: None,
            ca: None,
        }
    }

    pub fn with_pm(mut self, pm: i32) -> Self {
        self.pm = Some(pm);
        self
    }

    pub fn with_ca(mut self, ca: i32) -> Self {
        self.ca = Some(ca);
        self
    }
}

/// Combat numbers shared by NPC versions and party characters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatBlock {
    pub pv: i32,
    #[serde(default)]
    pub pm: Option<i32>,
    #[serde(default)]
    pub ca: Option<i32>,
}

// ============================================================================
// NPCs
// ============================================================================

/// A named form of an NPC (e.g. "human" and "werewolf"), each with its own stats.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NpcVersion {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub stats: Option<StatBlock>,
}

impl NpcVersion {
    pub fn new(name: impl Into<String>, stats: Option<StatBlock>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            stats,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Npc {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub alignment: Option<String>,
    /// Whether this NPC takes part in combat when placed in an encounter
    #[serde(default)]
    pub is_combatant: bool,
    #[serde(default)]
    pub versions: Vec<NpcVersion>,
}

impl Npc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            title: None,
            alignment: None,
            is_combatant: false,
            versions: Vec::new(),
        }
    }

    pub fn combatant(mut self) -> Self {
        self.is_combatant = true;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_alignment(mut self, alignment: impl Into<String>) -> Self {
        self.alignment = Some(alignment.into());
        self
    }

    pub fn with_version(mut self, version: NpcVersion) -> Self {
        self.versions.push(version);
        self
    }

    pub fn version(&self, version_id: &str) -> Option<&NpcVersion> {
        self.versions.iter().find(|v| v.id == version_id)
    }
}

// ============================================================================
// Objects
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CampaignObject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl CampaignObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            category: None,
            description: String::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

// ============================================================================
// Party
// ============================================================================

/// A player character as handed over by the character-sheet collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    pub name: String,
    pub max_pv: i32,
    pub current_pv: i32,
    #[serde(default)]
    pub max_pm: Option<i32>,
    #[serde(default)]
    pub current_pm: Option<i32>,
    #[serde(default)]
    pub ca: Option<i32>,
    /// Benched characters stay in the party but sit out combat
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Character {
    pub fn new(name: impl Into<String>, max_pv: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            max_pv,
            current_pv: max_pv,
            max_pm: None,
            current_pm: None,
            ca: None,
            is_active: true,
        }
    }

    pub fn with_mana(mut self, max_pm: i32) -> Self {
        self.max_pm = Some(max_pm);
        self.current_pm = Some(max_pm);
        self
    }

    pub fn with_ca(mut self, ca: i32) -> Self {
        self.ca = Some(ca);
        self
    }
}

// ============================================================================
// Narrative Cards
// ============================================================================

/// Card families, in the order sections are presented.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Character,
    Object,
    Threat,
    Plot,
    Location,
    Event,
}

impl CardType {
    pub const ORDER: [CardType; 6] = [
        CardType::Character,
        CardType::Object,
        CardType::Threat,
        CardType::Plot,
        CardType::Location,
        CardType::Event,
    ];
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Character => write!(f, "Character"),
            Self::Object => write!(f, "Object"),
            Self::Threat => write!(f, "Threat"),
            Self::Plot => write!(f, "Plot"),
            Self::Location => write!(f, "Location"),
            Self::Event => write!(f, "Event"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrawnCard {
    pub id: String,
    pub card_type: CardType,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub drawn_at: DateTime<Utc>,
}

impl DrawnCard {
    pub fn new(card_type: CardType, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            card_type,
            title: title.into(),
            description: String::new(),
            drawn_at: Utc::now(),
        }
    }
}
