//! Combat Turn Engine
//!
//! Owns the mutable [`CombatState`] of one encounter: initiative collection,
//! turn order, turn/round progression and per-entry resource mutation.
//!
//! Commands aimed at an entry id that is not in the roster are no-ops; the
//! caller most likely acted on a stale view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entry::{ActionBudget, ActionKind, EntryUpdate, InitiativeEntry};

// ============================================================================
// Combat Types
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CombatStatus {
    #[default]
    RollingInitiative,
    InProgress,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CombatLogKind {
    InitiativeSet,
    CombatStarted,
    TurnStarted,
    RoundStarted,
    Damage,
    Healing,
    ManaSpent,
    ManaRestored,
    ConditionApplied,
    ConditionRemoved,
    ActionUsed,
    Defeated,
    Revived,
    EntryUpdated,
    EntryAdded,
    EntryRemoved,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CombatLogEntry {
    pub round: u32,
    pub turn: usize,
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub kind: CombatLogKind,
    pub description: String,
}

/// Knobs for the turn-advance behaviors facilitators disagree on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TurnOptions {
    /// Step over entries flagged defeated when advancing or rewinding
    pub skip_defeated: bool,
    /// Rewinding from the first turn goes to the last turn of the previous round
    pub previous_wraps_round: bool,
    /// Refill the action budget of the entry whose turn begins
    pub reset_actions_on_turn: bool,
    pub action_budget: ActionBudget,
}

impl Default for TurnOptions {
    fn default() -> Self {
        Self {
            skip_defeated: false,
            previous_wraps_round: true,
            reset_actions_on_turn: true,
            action_budget: ActionBudget::default(),
        }
    }
}

/// Where the turn pointer landed after advancing or rewinding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub current_entry_id: Option<String>,
    pub round: u32,
    pub round_changed: bool,
}

// ============================================================================
// Combat State
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CombatState {
    pub id: String,
    pub encounter_id: String,
    pub status: CombatStatus,
    pub round: u32,
    pub current_turn_index: usize,
    pub initiative_order: Vec<InitiativeEntry>,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub log: Vec<CombatLogEntry>,
}

impl CombatState {
    /// Open a combat in the initiative-rolling phase.
    ///
    /// Resources on incoming entries are clamped into `[0, max]`.
    pub fn start(encounter_id: impl Into<String>, mut initiative_order: Vec<InitiativeEntry>) -> Self {
        initiative_order.iter_mut().for_each(InitiativeEntry::clamp_resources);
        Self {
            id: Uuid::new_v4().to_string(),
            encounter_id: encounter_id.into(),
            status: CombatStatus::RollingInitiative,
            round: 1,
            current_turn_index: 0,
            initiative_order,
            started_at: Utc::now(),
            log: Vec::new(),
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == CombatStatus::InProgress
    }

    pub fn entry(&self, entry_id: &str) -> Option<&InitiativeEntry> {
        self.initiative_order.iter().find(|e| e.id == entry_id)
    }

    pub fn entry_mut(&mut self, entry_id: &str) -> Option<&mut InitiativeEntry> {
        self.initiative_order.iter_mut().find(|e| e.id == entry_id)
    }

    pub fn entry_by_source(&self, source_id: &str) -> Option<&InitiativeEntry> {
        self.initiative_order.iter().find(|e| e.source_id == source_id)
    }

    pub fn current_entry(&self) -> Option<&InitiativeEntry> {
        if !self.is_in_progress() {
            return None;
        }
        self.initiative_order.get(self.current_turn_index)
    }

    /// Entries still waiting for an initiative value.
    pub fn pending_entries(&self) -> Vec<&InitiativeEntry> {
        self.initiative_order
            .iter()
            .filter(|e| e.initiative.is_none())
            .collect()
    }

    pub fn log_event(
        &mut self,
        actor: impl Into<String>,
        kind: CombatLogKind,
        description: impl Into<String>,
    ) {
        self.log.push(CombatLogEntry {
            round: self.round,
            turn: self.current_turn_index,
            timestamp: Utc::now(),
            actor: actor.into(),
            kind,
            description: description.into(),
        });
    }

    // ========================================================================
    // Initiative
    // ========================================================================

    /// Record an initiative value.
    ///
    /// Allowed in either phase. Once combat is running the order only changes
    /// on the next [`CombatState::resort`].
    pub fn set_initiative(&mut self, entry_id: &str, value: i32) -> bool {
        let Some(entry) = self.entry_mut(entry_id) else {
            tracing::debug!(entry_id, "set_initiative on unknown entry ignored");
            return false;
        };
        entry.initiative = Some(value);
        let name = entry.name.clone();
        self.log_event(&name, CombatLogKind::InitiativeSet, format!("{name} rolls {value} for initiative"));
        true
    }

    /// Leave the rolling phase and start the fight.
    ///
    /// Entries that never rolled are dropped from the turn order and returned
    /// so the caller can tell who was left out. Outside the rolling phase this
    /// does nothing and returns an empty list.
    pub fn resolve(&mut self) -> Vec<InitiativeEntry> {
        if self.status != CombatStatus::RollingInitiative {
            tracing::debug!(combat_id = %self.id, "resolve called outside initiative phase");
            return Vec::new();
        }

        let (ready, excluded): (Vec<_>, Vec<_>) = std::mem::take(&mut self.initiative_order)
            .into_iter()
            .partition(|e| e.initiative.is_some());

        self.initiative_order = ready;
        self.sort_order();
        self.status = CombatStatus::InProgress;
        self.current_turn_index = 0;

        let first = self
            .initiative_order
            .first()
            .map(|e| e.name.clone())
            .unwrap_or_default();
        self.log_event(
            first,
            CombatLogKind::CombatStarted,
            format!(
                "Combat begins with {} combatant(s), {} without initiative",
                self.initiative_order.len(),
                excluded.len()
            ),
        );
        tracing::info!(
            combat_id = %self.id,
            encounter_id = %self.encounter_id,
            combatants = self.initiative_order.len(),
            excluded = excluded.len(),
            "Initiative resolved"
        );

        excluded
    }

    /// Initiative descending; on ties players, then NPCs, then enemies.
    /// Unrolled entries sink to the bottom. The sort is stable.
    fn sort_order(&mut self) {
        self.initiative_order.sort_by(|a, b| {
            b.initiative
                .cmp(&a.initiative)
                .then_with(|| a.entry_type.turn_priority().cmp(&b.entry_type.turn_priority()))
        });
    }

    /// Re-sort a running combat after initiative corrections, keeping the turn
    /// pointer on the same combatant.
    pub fn resort(&mut self) {
        let current_id = self
            .initiative_order
            .get(self.current_turn_index)
            .map(|e| e.id.clone());
        self.sort_order();
        if let Some(id) = current_id {
            if let Some(pos) = self.initiative_order.iter().position(|e| e.id == id) {
                self.current_turn_index = pos;
            }
        }
    }

    // ========================================================================
    // Turn Progression
    // ========================================================================

    fn outcome(&self, round_changed: bool) -> TurnOutcome {
        TurnOutcome {
            current_entry_id: self.current_entry().map(|e| e.id.clone()),
            round: self.round,
            round_changed,
        }
    }

    fn should_skip(&self, options: &TurnOptions) -> bool {
        options.skip_defeated && self.initiative_order.iter().any(|e| !e.is_defeated)
    }

    /// Advance to the next turn, wrapping into a new round past the last entry.
    pub fn next_turn(&mut self, options: &TurnOptions) -> TurnOutcome {
        if !self.is_in_progress() || self.initiative_order.is_empty() {
            return self.outcome(false);
        }

        let len = self.initiative_order.len();
        self.current_turn_index = self.current_turn_index.min(len - 1);
        let skip = self.should_skip(options);
        let mut round_changed = false;

        loop {
            self.current_turn_index += 1;
            if self.current_turn_index >= len {
                self.current_turn_index = 0;
                self.round += 1;
                round_changed = true;
            }
            if !skip || !self.initiative_order[self.current_turn_index].is_defeated {
                break;
            }
        }

        if round_changed {
            let round = self.round;
            self.log_event("", CombatLogKind::RoundStarted, format!("Round {round} begins"));
        }

        let index = self.current_turn_index;
        let entry = &mut self.initiative_order[index];
        if options.reset_actions_on_turn {
            entry.available_actions = Some(options.action_budget);
        }
        let name = entry.name.clone();
        self.log_event(&name, CombatLogKind::TurnStarted, format!("{name}'s turn"));

        self.outcome(round_changed)
    }

    /// Step back one turn.
    ///
    /// From the first turn this wraps to the last turn of the previous round
    /// when `previous_wraps_round` is set and a previous round exists;
    /// otherwise the pointer stays put.
    pub fn previous_turn(&mut self, options: &TurnOptions) -> TurnOutcome {
        if !self.is_in_progress() || self.initiative_order.is_empty() {
            return self.outcome(false);
        }

        let len = self.initiative_order.len();
        self.current_turn_index = self.current_turn_index.min(len - 1);
        let skip = self.should_skip(options);
        let start = (self.round, self.current_turn_index);

        loop {
            if self.current_turn_index == 0 {
                if options.previous_wraps_round && self.round > 1 {
                    self.round -= 1;
                    self.current_turn_index = len - 1;
                } else {
                    // Nowhere live to go back to
                    (self.round, self.current_turn_index) = start;
                    break;
                }
            } else {
                self.current_turn_index -= 1;
            }
            if !skip || !self.initiative_order[self.current_turn_index].is_defeated {
                break;
            }
        }

        self.outcome(self.round != start.0)
    }

    // ========================================================================
    // Entry Mutation
    // ========================================================================

    /// Overwrite fields of one entry. Returns the updated entry.
    pub fn update_entry(&mut self, entry_id: &str, update: &EntryUpdate) -> Option<&InitiativeEntry> {
        let Some(entry) = self.entry_mut(entry_id) else {
            tracing::debug!(entry_id, "update on unknown entry ignored");
            return None;
        };
        entry.apply_update(update);
        let name = entry.name.clone();
        self.log_event(&name, CombatLogKind::EntryUpdated, format!("{name} updated"));
        self.entry(entry_id)
    }

    /// Subtract PV, never below zero. Non-positive amounts are ignored.
    ///
    /// Reaching zero does not mark the entry defeated.
    pub fn apply_damage(&mut self, entry_id: &str, amount: i32) -> Option<i32> {
        let entry = self.entry_mut(entry_id)?;
        if amount <= 0 {
            return entry.current_pv;
        }
        let current = entry.current_pv?;
        entry.current_pv = Some(current.saturating_sub(amount));
        entry.clamp_resources();
        let (name, pv) = (entry.name.clone(), entry.current_pv);
        self.log_event(&name, CombatLogKind::Damage, format!("{name} takes {amount} damage"));
        pv
    }

    /// Add PV, never above max. Non-positive amounts are ignored.
    pub fn heal(&mut self, entry_id: &str, amount: i32) -> Option<i32> {
        let entry = self.entry_mut(entry_id)?;
        if amount <= 0 {
            return entry.current_pv;
        }
        let current = entry.current_pv?;
        entry.current_pv = Some(current.saturating_add(amount));
        entry.clamp_resources();
        let (name, pv) = (entry.name.clone(), entry.current_pv);
        self.log_event(&name, CombatLogKind::Healing, format!("{name} heals {amount} PV"));
        pv
    }

    pub fn spend_mana(&mut self, entry_id: &str, amount: i32) -> Option<i32> {
        let entry = self.entry_mut(entry_id)?;
        if amount <= 0 {
            return entry.current_pm;
        }
        let current = entry.current_pm?;
        entry.current_pm = Some(current.saturating_sub(amount));
        entry.clamp_resources();
        let (name, pm) = (entry.name.clone(), entry.current_pm);
        self.log_event(&name, CombatLogKind::ManaSpent, format!("{name} spends {amount} PM"));
        pm
    }

    pub fn restore_mana(&mut self, entry_id: &str, amount: i32) -> Option<i32> {
        let entry = self.entry_mut(entry_id)?;
        if amount <= 0 {
            return entry.current_pm;
        }
        let current = entry.current_pm?;
        entry.current_pm = Some(current.saturating_add(amount));
        entry.clamp_resources();
        let (name, pm) = (entry.name.clone(), entry.current_pm);
        self.log_event(&name, CombatLogKind::ManaRestored, format!("{name} recovers {amount} PM"));
        pm
    }

    /// Add a condition unless already present (case-insensitive).
    pub fn add_condition(&mut self, entry_id: &str, condition: &str) -> bool {
        let Some(entry) = self.entry_mut(entry_id) else {
            return false;
        };
        if entry.has_condition(condition) {
            return false;
        }
        entry.conditions.push(condition.to_string());
        let name = entry.name.clone();
        self.log_event(&name, CombatLogKind::ConditionApplied, format!("{name} is now {condition}"));
        true
    }

    pub fn remove_condition(&mut self, entry_id: &str, condition: &str) -> bool {
        let Some(entry) = self.entry_mut(entry_id) else {
            return false;
        };
        let before = entry.conditions.len();
        entry.conditions.retain(|c| !c.eq_ignore_ascii_case(condition));
        if entry.conditions.len() == before {
            return false;
        }
        let name = entry.name.clone();
        self.log_event(&name, CombatLogKind::ConditionRemoved, format!("{name} is no longer {condition}"));
        true
    }

    /// Consume one action from the entry's budget.
    pub fn use_action(&mut self, entry_id: &str, kind: ActionKind) -> bool {
        let Some(entry) = self.entry_mut(entry_id) else {
            return false;
        };
        let spent = entry
            .available_actions
            .as_mut()
            .is_some_and(|budget| budget.spend(kind));
        if spent {
            let name = entry.name.clone();
            self.log_event(&name, CombatLogKind::ActionUsed, format!("{name} uses a {kind:?} action"));
        }
        spent
    }

    pub fn set_defeated(&mut self, entry_id: &str, defeated: bool) -> bool {
        let Some(entry) = self.entry_mut(entry_id) else {
            return false;
        };
        if entry.is_defeated == defeated {
            return true;
        }
        entry.is_defeated = defeated;
        let name = entry.name.clone();
        let (kind, text) = if defeated {
            (CombatLogKind::Defeated, format!("{name} is defeated"))
        } else {
            (CombatLogKind::Revived, format!("{name} is back in the fight"))
        };
        self.log_event(&name, kind, text);
        true
    }

    // ========================================================================
    // Roster Changes
    // ========================================================================

    /// Add a late joiner. In a running combat it is slotted by initiative.
    pub fn add_entry(&mut self, entry: InitiativeEntry) {
        let name = entry.name.clone();
        self.initiative_order.push(entry);
        if self.is_in_progress() {
            self.resort();
        }
        self.log_event(&name, CombatLogKind::EntryAdded, format!("{name} joins the fight"));
    }

    /// Remove an entry, keeping the turn pointer on the same combatant when
    /// possible.
    pub fn remove_entry(&mut self, entry_id: &str) -> Option<InitiativeEntry> {
        let pos = self.initiative_order.iter().position(|e| e.id == entry_id)?;
        let removed = self.initiative_order.remove(pos);

        // Removed before current: shift back to stay on the same combatant.
        // Removed at current: the next combatant slides into place.
        if pos < self.current_turn_index {
            self.current_turn_index -= 1;
        }
        self.current_turn_index = self
            .current_turn_index
            .min(self.initiative_order.len().saturating_sub(1));

        self.log_event(&removed.name, CombatLogKind::EntryRemoved, format!("{} leaves the fight", removed.name));
        Some(removed)
    }
}

// ============================================================================
// Tests
// ============================================================================
