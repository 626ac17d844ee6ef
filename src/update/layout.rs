//! Layout message handlers (add, remove, resize, group, drop, ...)

use crate::commands::Cmd;
use crate::layout;
use crate::messages::LayoutMsg;
use crate::model::{DashboardModel, PanelKind};

use super::persist::tree_changed;

/// Handle panel tree operations
///
/// Returns `None` when the operation left the tree unchanged.
pub fn update_layout(model: &mut DashboardModel, msg: LayoutMsg) -> Option<Cmd> {
    model.last_error = None;

    let changed = match msg {
        LayoutMsg::AddPanel {
            kind,
            settings,
            index,
        } => match model.add_panel(&kind, settings, index) {
            Ok(id) => {
                tracing::debug!("Added panel {} of kind {}", id, kind);
                true
            }
            Err(e) => {
                tracing::warn!("AddPanel failed: {}", e);
                model.last_error = Some(e);
                false
            }
        },

        LayoutMsg::RemovePanel(id) => model.apply(|root| layout::remove_panel(root, &id)),

        LayoutMsg::UpdatePanelConfig { id, settings } => {
            model.apply(|root| layout::update_panel_config(root, &id, settings))
        }

        LayoutMsg::ResizePanel { id, size } => {
            model.apply(|root| layout::resize_panel(root, &id, size))
        }

        LayoutMsg::ReorderPanels { active, over } => {
            model.apply(|root| layout::reorder_panels(root, &active, &over))
        }

        LayoutMsg::CreateGroup { ids, axis, index } => {
            let group_id = model.next_panel_id(&PanelKind::group());
            model.apply(|root| layout::create_group(root, &ids, axis, index, group_id))
        }

        LayoutMsg::UngroupPanel { id, index } => {
            model.apply(|root| layout::ungroup_panel(root, &id, index))
        }

        LayoutMsg::ChangeLayoutDirection { path, axis } => {
            model.apply(|root| layout::change_layout_direction(root, &path, axis))
        }

        LayoutMsg::SmartDrop {
            dragged,
            target,
            zone,
        } => {
            let group_id = model.next_panel_id(&PanelKind::group());
            model.apply(|root| layout::smart_drop(root, &dragged, &target, zone, group_id))
        }

        LayoutMsg::ResetLayout => {
            let seed = model.seed_layout();
            model.apply(|_| seed)
        }
    };

    if changed {
        Some(tree_changed(model))
    } else {
        tracing::debug!("Layout unchanged (revision {})", model.revision);
        None
    }
}
