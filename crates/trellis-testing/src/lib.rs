//! Testing utilities for Trellis.
//!
//! Provides a virtual clock, an idle scheduler driven by that clock and
//! fixture builders for nodes and workspaces.

mod clock;
mod fixtures;

pub use clock::{ManualClock, ManualIdleScheduler};
pub use fixtures::{
    object, registry_with_locales, sample_locales, sample_schema, selected_workspace,
    workbench_for, NodeFixture,
};
