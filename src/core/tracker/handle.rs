//! Tracker Handle
//!
//! Shares one [`TrackerState`] between the threads that receive commands and
//! the ones that render it. Commands are applied under the write lock, so
//! every reader sees them in receipt order.

use std::sync::{PoisonError, RwLock};

use super::command::Command;
use super::event::TrackerEvent;
use super::state::TrackerState;
use crate::core::rollup::{AggregatedData, RollupScope};

#[derive(Debug, Default)]
pub struct TrackerHandle {
    state: RwLock<TrackerState>,
}

impl TrackerHandle {
    pub fn new(state: TrackerState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Apply a command and return the events it produced.
    pub fn dispatch(&self, command: Command) -> Vec<TrackerEvent> {
        // Poisoning is recovered; the state may hold a partially applied command
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.apply(command)
    }

    /// Run a read-only query against the current state.
    pub fn read<T>(&self, f: impl FnOnce(&TrackerState) -> T) -> T {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    pub fn snapshot(&self) -> TrackerState {
        self.read(TrackerState::clone)
    }

    pub fn rollup(&self, scope: &RollupScope) -> Option<AggregatedData> {
        self.read(|state| state.rollup(scope))
    }
}
