//! Session Tracker
//!
//! Command/query surface over the campaign hierarchy and the live combat.

pub mod command;
pub mod event;
pub mod handle;
pub mod state;

pub use command::{Command, EnemyUpdate, NpcLinkUpdate, ObjectLinkUpdate};
pub use event::TrackerEvent;
pub use handle::TrackerHandle;
pub use state::TrackerState;
