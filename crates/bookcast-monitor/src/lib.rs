//! Change detection and consistency monitoring.
//!
//! Two concerns live here:
//! - `ChangeDetector`: suppresses republication of ladders that have not
//!   changed since the last publish, for markets configured on-change.
//! - `SlotMonitor`: the kill-switch state machine. Compares the book's slot
//!   against the oracle's and watches each market's logical clock for
//!   freezes. Either violation surfaces as a typed `FatalCondition` that the
//!   orchestrator turns into process termination.

pub mod change;
pub mod slot_watch;

pub use change::ChangeDetector;
pub use slot_watch::{
    FatalCondition, SlotMonitor, SlotState, StalenessWindows, DEFAULT_SLOT_DIFF_THRESHOLD,
};
