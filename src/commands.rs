//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.

use crate::model::Container;

/// Side effects requested by `update()`
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// The tree changed; re-render bindings
    Redraw,
    /// Start the save debounce timer for `revision`.
    /// After delay_ms, sends Msg::Persist(SaveReady)
    DebouncedSave { revision: u64, delay_ms: u64 },
    /// Write `layout` through the gateway.
    /// Sends Msg::Persist(SaveCompleted) when done
    SaveLayout { revision: u64, layout: Container },
    /// Read the stored tree. Sends Msg::Persist(Loaded)
    LoadLayout,
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Does this command (or any in a batch) require re-rendering?
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::Redraw => true,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
            Cmd::None
            | Cmd::DebouncedSave { .. }
            | Cmd::SaveLayout { .. }
            | Cmd::LoadLayout => false,
        }
    }

    /// Find the debounced save revision carried by this command, if any
    pub fn debounced_revision(&self) -> Option<u64> {
        match self {
            Cmd::DebouncedSave { revision, .. } => Some(*revision),
            Cmd::Batch(cmds) => cmds.iter().find_map(|c| c.debounced_revision()),
            _ => None,
        }
    }
}
