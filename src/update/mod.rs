//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod history;
pub mod layout;
mod persist;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::DashboardModel;

#[cfg(debug_assertions)]
use tracing::{debug, span, warn, Level};

pub use history::update_history;
pub use layout::update_layout;
pub use persist::{schedule_save, update_persist};

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut DashboardModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut DashboardModel, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Layout(m) => layout::update_layout(model, m),
        Msg::History(m) => history::update_history(model, m),
        Msg::Persist(m) => persist::update_persist(model, m),
    }
}

/// Traced update wrapper (debug builds only)
///
/// Logs every message with the revision before and after, and reports any
/// structural invariant the resulting tree breaks.
#[cfg(debug_assertions)]
fn update_traced(model: &mut DashboardModel, msg: Msg) -> Option<Cmd> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();

    let revision_before = model.revision;
    debug!(target: "dashboard::update", "Processing {:?}", msg);

    let result = update_inner(model, msg);

    if model.revision != revision_before {
        debug!(
            target: "dashboard::update",
            "{} changed layout: revision {} -> {}",
            msg_name,
            revision_before,
            model.revision
        );
        let report = model.layout.validate();
        if !report.is_structurally_sound() {
            warn!(
                target: "dashboard::update",
                "{} left broken invariants: {:?}",
                msg_name,
                report.violations
            );
        }
    }

    result
}

/// Get a short name for a message type (for tracing)
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    use crate::messages::{LayoutMsg, PersistMsg};

    match msg {
        Msg::Layout(m) => {
            let name = match m {
                LayoutMsg::AddPanel { .. } => "AddPanel",
                LayoutMsg::RemovePanel(_) => "RemovePanel",
                LayoutMsg::UpdatePanelConfig { .. } => "UpdatePanelConfig",
                LayoutMsg::ResizePanel { .. } => "ResizePanel",
                LayoutMsg::ReorderPanels { .. } => "ReorderPanels",
                LayoutMsg::CreateGroup { .. } => "CreateGroup",
                LayoutMsg::UngroupPanel { .. } => "UngroupPanel",
                LayoutMsg::ChangeLayoutDirection { .. } => "ChangeLayoutDirection",
                LayoutMsg::SmartDrop { .. } => "SmartDrop",
                LayoutMsg::ResetLayout => "ResetLayout",
            };
            format!("Layout::{}", name)
        }
        Msg::History(m) => format!("History::{:?}", m),
        Msg::Persist(m) => {
            let name = match m {
                PersistMsg::Loaded(_) => "Loaded",
                PersistMsg::SaveReady { .. } => "SaveReady",
                PersistMsg::SaveCompleted { .. } => "SaveCompleted",
            };
            format!("Persist::{}", name)
        }
    }
}
