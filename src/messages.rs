//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types. A gesture source maps
//! pointer interactions to exactly one `LayoutMsg`.

use crate::layout::DropZone;
use crate::model::{Axis, Container, PanelId, PanelKind, Settings};

/// Panel tree operations
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutMsg {
    /// Create a panel of `kind` at root level (append when `index` is None or past the end)
    AddPanel {
        kind: PanelKind,
        settings: Option<Settings>,
        index: Option<usize>,
    },
    /// Delete a panel wherever it sits
    RemovePanel(PanelId),
    /// Shallow-merge settings into a panel
    UpdatePanelConfig { id: PanelId, settings: Settings },
    /// Set a panel's size (clamped to its bounds)
    ResizePanel { id: PanelId, size: f64 },
    /// Move `active` to the position of its sibling `over`
    ReorderPanels { active: PanelId, over: PanelId },
    /// Wrap root-level panels in a new split group
    CreateGroup {
        ids: Vec<PanelId>,
        axis: Axis,
        index: Option<usize>,
    },
    /// Pull a panel out of its group back to root level
    UngroupPanel { id: PanelId, index: Option<usize> },
    /// Set the axis of the root (empty path) or of a nested container
    ChangeLayoutDirection { path: Vec<PanelId>, axis: Axis },
    /// Drop `dragged` onto a zone of `target`
    SmartDrop {
        dragged: PanelId,
        target: PanelId,
        zone: DropZone,
    },
    /// Replace the tree with the configured default panels
    ResetLayout,
}

/// Undo/redo of whole-tree changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMsg {
    Undo,
    Redo,
}

/// Results flowing back from the persistence gateway
#[derive(Debug, Clone, PartialEq)]
pub enum PersistMsg {
    /// Initial load finished: stored tree, nothing stored, or an error
    Loaded(Result<Option<Container>, String>),
    /// Debounce window for `revision` elapsed
    SaveReady { revision: u64 },
    /// Gateway finished writing `revision`
    SaveCompleted {
        revision: u64,
        result: Result<(), String>,
    },
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Layout(LayoutMsg),
    History(HistoryMsg),
    Persist(PersistMsg),
}
