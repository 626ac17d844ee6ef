//! Invariant cleanup - removes empty containers and flattens singleton ones
//!
//! Runs bottom-up: a composite panel's nested container is cleaned before the
//! panel itself is judged, so collapses propagate toward the root in one pass.

use crate::model::{Container, Panel};

/// Normalize a container tree.
///
/// For every composite panel, after cleaning its contents:
/// - zero children: the panel is dropped from its parent
/// - one child: the panel is replaced in place by that child, which takes the
///   panel's `size`/`min_size`/`max_size`
/// - two or more: left as-is
///
/// The container passed in is never removed itself (the root survives empty).
pub fn cleanup(mut container: Container) -> Container {
    container.children = std::mem::take(&mut container.children)
        .into_iter()
        .filter_map(cleanup_panel)
        .collect();
    container
}

fn cleanup_panel(mut panel: Panel) -> Option<Panel> {
    panel.nested = panel.nested.take().map(cleanup);
    collapse_slot(panel)
}

/// Replace a singleton or empty container left behind by removing one child.
///
/// `slot` is the composite panel that owns `nested`. Used by eager collapse
/// during extraction, mirroring what [`cleanup`] would do at that one level.
pub(crate) fn collapse_slot(mut slot: Panel) -> Option<Panel> {
    let Some(mut nested) = slot.nested.take() else {
        return Some(slot);
    };
    match nested.children.len() {
        0 => None,
        1 => {
            let only = nested.children.pop()?;
            Some(only.adopt_slot(&slot))
        }
        _ => {
            slot.nested = Some(nested);
            Some(slot)
        }
    }
}
