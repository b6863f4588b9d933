//! Initiative Entries
//!
//! One combatant's row in the turn order, with the combat resources the
//! facilitator tracks while the fight is running.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Player,
    Npc,
    Enemy,
}

impl EntryType {
    /// Tie-break rank on equal initiative: players act first, enemies last.
    pub fn turn_priority(self) -> u8 {
        match self {
            Self::Player => 0,
            Self::Npc => 1,
            Self::Enemy => 2,
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Npc => write!(f, "npc"),
            Self::Enemy => write!(f, "enemy"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Standard,
    Movement,
    Free,
}

/// Actions left to a combatant for its current turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionBudget {
    pub standard: u8,
    pub movement: u8,
    pub free: u8,
}

impl Default for ActionBudget {
    fn default() -> Self {
        Self {
            standard: 1,
            movement: 1,
            free: 1,
        }
    }
}

impl ActionBudget {
    /// Spend one action of `kind`. Returns false if none was left.
    pub fn spend(&mut self, kind: ActionKind) -> bool {
        let slot = match kind {
            ActionKind::Standard => &mut self.standard,
            ActionKind::Movement => &mut self.movement,
            ActionKind::Free => &mut self.free,
        };
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    pub fn remaining(&self, kind: ActionKind) -> u8 {
        match kind {
            ActionKind::Standard => self.standard,
            ActionKind::Movement => self.movement,
            ActionKind::Free => self.free,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InitiativeEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Character, encounter-enemy or encounter-NPC id this entry stands for
    pub source_id: String,
    pub name: String,
    /// `None` until the initiative roll is reported
    pub initiative: Option<i32>,
    #[serde(default)]
    pub is_defeated: bool,
    #[serde(default)]
    pub current_pv: Option<i32>,
    #[serde(default)]
    pub max_pv: Option<i32>,
    #[serde(default)]
    pub current_pm: Option<i32>,
    #[serde(default)]
    pub max_pm: Option<i32>,
    #[serde(default)]
    pub ca: Option<i32>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub available_actions: Option<ActionBudget>,
}

impl InitiativeEntry {
    pub fn new(entry_type: EntryType, source_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            entry_type,
            source_id: source_id.into(),
            name: name.into(),
            initiative: None,
            is_defeated: false,
            current_pv: None,
            max_pv: None,
            current_pm: None,
            max_pm: None,
            ca: None,
            conditions: Vec::new(),
            available_actions: None,
        }
    }

    pub fn with_pv(mut self, current: i32, max: i32) -> Self {
        self.max_pv = Some(max);
        self.current_pv = Some(current);
        self.clamp_resources();
        self
    }

    pub fn with_pm(mut self, current: i32, max: i32) -> Self {
        self.max_pm = Some(max);
        self.current_pm = Some(current);
        self.clamp_resources();
        self
    }

    pub fn with_initiative(mut self, initiative: i32) -> Self {
        self.initiative = Some(initiative);
        self
    }

    /// Whether PV has reached zero. Tracked apart from `is_defeated`.
    pub fn is_down(&self) -> bool {
        self.current_pv.is_some_and(|pv| pv <= 0)
    }

    pub fn has_condition(&self, condition: &str) -> bool {
        self.conditions
            .iter()
            .any(|c| c.eq_ignore_ascii_case(condition))
    }

    /// Keep PV and PM inside `[0, max]`.
    pub(crate) fn clamp_resources(&mut self) {
        self.current_pv = clamp_resource(self.current_pv, self.max_pv);
        self.current_pm = clamp_resource(self.current_pm, self.max_pm);
    }

    /// Apply a partial update, then clamp.
    pub fn apply_update(&mut self, update: &EntryUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(initiative) = update.initiative {
            self.initiative = Some(initiative);
        }
        if let Some(max) = update.max_pv {
            self.max_pv = Some(max);
        }
        if let Some(current) = update.current_pv {
            self.current_pv = Some(current);
        }
        if let Some(max) = update.max_pm {
            self.max_pm = Some(max);
        }
        if let Some(current) = update.current_pm {
            self.current_pm = Some(current);
        }
        if let Some(ca) = update.ca {
            self.ca = Some(ca);
        }
        if let Some(conditions) = &update.conditions {
            self.conditions = conditions.clone();
        }
        if let Some(defeated) = update.is_defeated {
            self.is_defeated = defeated;
        }
        if let Some(actions) = update.available_actions {
            self.available_actions = Some(actions);
        }
        self.clamp_resources();
    }
}

fn clamp_resource(current: Option<i32>, max: Option<i32>) -> Option<i32> {
    current.map(|value| match max {
        Some(max) => value.clamp(0, max.max(0)),
        None => value.max(0),
    })
}

/// Fields to overwrite on an entry; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initiative: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_pv: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pv: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_pm: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pm: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_defeated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_actions: Option<ActionBudget>,
}

impl EntryUpdate {
    pub fn pv(current: i32) -> Self {
        Self {
            current_pv: Some(current),
            ..Self::default()
        }
    }

    pub fn defeated(is_defeated: bool) -> Self {
        Self {
            is_defeated: Some(is_defeated),
            ..Self::default()
        }
    }

    /// Whether this update touches anything a participant sees on their sheet.
    pub fn touches_participant_view(&self) -> bool {
        self.initiative.is_some()
            || self.current_pv.is_some()
            || self.current_pm.is_some()
            || self.conditions.is_some()
    }
}
