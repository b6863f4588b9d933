//! Combat Module
//!
//! Initiative roster construction and the turn engine that runs a fight:
//! rolling initiative, ordering, turn/round progression, and per-combatant
//! PV/PM, conditions and action budget.

pub mod entry;
pub mod initiative;
pub mod state;

pub use entry::{ActionBudget, ActionKind, EntryType, EntryUpdate, InitiativeEntry};
pub use initiative::{build_initiative, InitiativeBuilder};
pub use state::{
    CombatLogEntry, CombatLogKind, CombatState, CombatStatus, TurnOptions, TurnOutcome,
};
