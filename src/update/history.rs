//! Undo/redo handlers

use crate::commands::Cmd;
use crate::messages::HistoryMsg;
use crate::model::DashboardModel;

use super::persist::tree_changed;

/// Handle undo/redo; each restored tree counts as a new revision
pub fn update_history(model: &mut DashboardModel, msg: HistoryMsg) -> Option<Cmd> {
    let current = std::mem::take(&mut model.layout);
    let restored = match msg {
        HistoryMsg::Undo => model.history.undo(current),
        HistoryMsg::Redo => model.history.redo(current),
    };

    match restored {
        Ok(tree) => {
            model.layout = tree;
            model.revision += 1;
            Some(tree_changed(model))
        }
        Err(current) => {
            tracing::debug!("{:?}: nothing to restore", msg);
            model.layout = current;
            None
        }
    }
}
