//! Layout mutator - the operations that turn one panel tree into the next
//!
//! Each function consumes the root and returns the new root. Not-found ids and
//! invalid cardinalities hand the input back untouched.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::cleanup::{cleanup, collapse_slot};
use crate::model::{merge_settings, Axis, Container, Panel, PanelId, PanelKind, Settings};
use crate::registry::PanelRegistry;

/// Bounds given to composite panels created by grouping
pub const GROUP_MIN_SIZE: f64 = 10.0;
pub const GROUP_MAX_SIZE: f64 = 100.0;

/// Share each side receives when a smart drop splits a slot
const SPLIT_SHARE: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("unknown panel kind '{0}'")]
    UnknownPanelKind(PanelKind),
}

// ============================================================================
// Drop Zones
// ============================================================================

/// Region of the target panel a dragged panel was released over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropZone {
    Top,
    Bottom,
    Left,
    Right,
    Center,
}

impl DropZone {
    /// Axis of the split this zone creates and whether the dragged panel comes first.
    /// `None` for the center zone, which replaces instead of splitting.
    pub fn split(self) -> Option<(Axis, bool)> {
        match self {
            DropZone::Top => Some((Axis::Vertical, true)),
            DropZone::Bottom => Some((Axis::Vertical, false)),
            DropZone::Left => Some((Axis::Horizontal, true)),
            DropZone::Right => Some((Axis::Horizontal, false)),
            DropZone::Center => None,
        }
    }
}

impl FromStr for DropZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(DropZone::Top),
            "bottom" => Ok(DropZone::Bottom),
            "left" => Ok(DropZone::Left),
            "right" => Ok(DropZone::Right),
            "center" => Ok(DropZone::Center),
            other => Err(format!("unknown drop zone '{}'", other)),
        }
    }
}

// ============================================================================
// Operations
// ============================================================================

/// Build a new leaf panel for `kind` from registry defaults.
///
/// `settings` is merged over the registry's default settings.
pub fn build_panel(
    registry: &dyn PanelRegistry,
    kind: &PanelKind,
    id: PanelId,
    settings: Option<Settings>,
) -> Result<Panel, LayoutError> {
    let defaults = registry
        .lookup(kind)
        .ok_or_else(|| LayoutError::UnknownPanelKind(kind.clone()))?;

    let mut merged = defaults.default_settings;
    if let Some(partial) = settings {
        merge_settings(&mut merged, partial);
    }

    Ok(Panel {
        id,
        kind: kind.clone(),
        size: defaults.default_size,
        min_size: defaults.min_size,
        max_size: defaults.max_size,
        settings: merged,
        nested: None,
    })
}

/// Insert a panel into the root's children (appends when `index` is absent or past the end).
///
/// Always targets the root, even if a nested container is being edited.
pub fn add_panel(mut root: Container, panel: Panel, index: Option<usize>) -> Container {
    if root.contains(&panel.id) {
        return root;
    }
    match index {
        Some(i) => insert_at(&mut root.children, i, panel),
        None => root.children.push(panel),
    }
    root
}

/// Delete a panel wherever it sits, then restore the invariants
pub fn remove_panel(mut root: Container, id: &PanelId) -> Container {
    if remove_from(&mut root, id).is_none() {
        return root;
    }
    cleanup(root)
}

/// Shallow-merge `partial` into the panel's settings
pub fn update_panel_config(mut root: Container, id: &PanelId, partial: Settings) -> Container {
    if let Some(panel) = root.find_mut(id) {
        merge_settings(&mut panel.settings, partial);
    }
    root
}

/// Set a panel's size, clamped to its bounds
pub fn resize_panel(mut root: Container, id: &PanelId, requested: f64) -> Container {
    if requested.is_nan() {
        return root;
    }
    if let Some(panel) = root.find_mut(id) {
        panel.size = clamp_size(requested, panel.min_size, panel.max_size);
    }
    root
}

/// Move `active` to the index of `over`, when both are children of the same container
pub fn reorder_panels(mut root: Container, active: &PanelId, over: &PanelId) -> Container {
    reorder_in(&mut root, active, over);
    root
}

/// Wrap two or more of the root's direct children in a new composite panel.
///
/// The grouped panels keep root order and share the new container evenly; the
/// composite takes the sum of their former sizes and is inserted at `index`
/// (default 0). Its bounds start at [`GROUP_MIN_SIZE`, `GROUP_MAX_SIZE`] and
/// widen to hold that sum.
pub fn create_group(
    mut root: Container,
    ids: &[PanelId],
    axis: Axis,
    index: Option<usize>,
    group_id: PanelId,
) -> Container {
    let found = root.children.iter().filter(|p| ids.contains(&p.id)).count();
    if found < 2 || root.contains(&group_id) {
        return root;
    }

    let (mut grouped, rest): (Vec<Panel>, Vec<Panel>) = std::mem::take(&mut root.children)
        .into_iter()
        .partition(|p| ids.contains(&p.id));

    let total: f64 = grouped.iter().map(|p| p.size).sum();
    let share = 100.0 / grouped.len() as f64;
    for panel in &mut grouped {
        panel.size = share;
    }

    root.children = rest;
    let group = Panel::composite(
        group_id,
        total,
        GROUP_MIN_SIZE.min(total),
        GROUP_MAX_SIZE.max(total),
        Container::new(axis, grouped),
    );
    insert_at(&mut root.children, index.unwrap_or(0), group);
    root
}

/// Pull a panel out of its container and re-insert it among the root's children.
///
/// A composite left with one child dissolves into it; one left empty disappears.
pub fn ungroup_panel(mut root: Container, id: &PanelId, index: Option<usize>) -> Container {
    let Some(panel) = extract_panel(&mut root, id) else {
        return root;
    };
    insert_at(&mut root.children, index.unwrap_or(0), panel);
    root
}

/// Set the axis of the root (empty path) or of the container nested in the
/// composite panel reached by following `path` from the root
pub fn change_layout_direction(mut root: Container, path: &[PanelId], axis: Axis) -> Container {
    if let Some(container) = container_at_path_mut(&mut root, path) {
        container.axis = axis;
    }
    root
}

/// Move `dragged` onto `target`.
///
/// The dragged panel is extracted first (collapsing its old container as
/// needed). For [`DropZone::Center`] it then replaces the target outright and
/// keeps its own size. For edge zones the target's slot becomes a new composite
/// `group_id` with the target's size and bounds, split 50/50 between the two.
pub fn smart_drop(
    root: Container,
    dragged: &PanelId,
    target: &PanelId,
    zone: DropZone,
    group_id: PanelId,
) -> Container {
    if dragged == target || !root.contains(target) {
        return root;
    }
    match root.find(dragged) {
        Some(panel) if !panel.subtree_contains(target) => {}
        _ => return root,
    }
    if zone.split().is_some() && root.contains(&group_id) {
        return root;
    }

    let mut working = root.clone();
    let Some(mut moved) = extract_panel(&mut working, dragged) else {
        return root;
    };
    // Extraction can dissolve the target when it is the dragged panel's own group
    let Some(slot) = working.find_mut(target) else {
        tracing::debug!(
            "smart_drop: target {} dissolved while extracting {}",
            target,
            dragged
        );
        return root;
    };

    match zone.split() {
        None => *slot = moved,
        Some((axis, dragged_first)) => {
            let shell = Panel::composite(
                group_id,
                slot.size,
                slot.min_size,
                slot.max_size,
                Container::new(axis, Vec::new()),
            );
            let mut existing = std::mem::replace(slot, shell);
            existing.size = SPLIT_SHARE;
            moved.size = SPLIT_SHARE;
            let children = if dragged_first {
                vec![moved, existing]
            } else {
                vec![existing, moved]
            };
            slot.nested = Some(Container::new(axis, children));
        }
    }

    cleanup(working)
}

// ============================================================================
// Helpers
// ============================================================================

fn insert_at(children: &mut Vec<Panel>, index: usize, panel: Panel) {
    if index <= children.len() {
        children.insert(index, panel);
    } else {
        children.push(panel);
    }
}

fn clamp_size(requested: f64, min: f64, max: f64) -> f64 {
    if max < min {
        return min;
    }
    requested.max(min).min(max)
}

/// Remove a panel without collapsing anything (cleanup runs afterwards)
fn remove_from(container: &mut Container, id: &PanelId) -> Option<Panel> {
    if let Some(i) = container.position(id) {
        return Some(container.children.remove(i));
    }
    container
        .children
        .iter_mut()
        .filter_map(|p| p.nested.as_mut())
        .find_map(|nested| remove_from(nested, id))
}

/// Remove a panel from the root or from any nested container, dissolving the
/// container it left when that leaves zero or one children
fn extract_panel(root: &mut Container, id: &PanelId) -> Option<Panel> {
    if let Some(i) = root.position(id) {
        return Some(root.children.remove(i));
    }
    extract_nested(root, id)
}

fn extract_nested(container: &mut Container, id: &PanelId) -> Option<Panel> {
    for i in 0..container.children.len() {
        let Some(nested) = container.children[i].nested.as_mut() else {
            continue;
        };

        if let Some(j) = nested.position(id) {
            let extracted = nested.children.remove(j);
            let slot = container.children.remove(i);
            if let Some(replacement) = collapse_slot(slot) {
                container.children.insert(i, replacement);
            }
            return Some(extracted);
        }

        if let Some(extracted) = extract_nested(nested, id) {
            return Some(extracted);
        }
    }
    None
}

fn reorder_in(container: &mut Container, active: &PanelId, over: &PanelId) -> bool {
    if let (Some(from), Some(to)) = (container.position(active), container.position(over)) {
        if from != to {
            let panel = container.children.remove(from);
            container.children.insert(to, panel);
        }
        return true;
    }
    container
        .children
        .iter_mut()
        .filter_map(|p| p.nested.as_mut())
        .any(|nested| reorder_in(nested, active, over))
}

fn container_at_path_mut<'a>(
    container: &'a mut Container,
    path: &[PanelId],
) -> Option<&'a mut Container> {
    let Some((first, rest)) = path.split_first() else {
        return Some(container);
    };
    let panel = container.children.iter_mut().find(|p| p.id == *first)?;
    container_at_path_mut(panel.nested.as_mut()?, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str, size: f64) -> Panel {
        Panel::leaf(id, "feed", size, 10.0, 100.0)
    }

    fn ids(container: &Container) -> Vec<&str> {
        container.children.iter().map(|p| p.id.as_str()).collect()
    }

    fn root_of(children: Vec<Panel>) -> Container {
        Container::new(Axis::Horizontal, children)
    }

    #[test]
    fn test_insert_at_out_of_range_appends() {
        let root = add_panel(root_of(vec![leaf("a", 50.0)]), leaf("b", 50.0), Some(99));
        assert_eq!(ids(&root), vec!["a", "b"]);
    }

    #[test]
    fn test_add_panel_rejects_duplicate_id() {
        let root = root_of(vec![leaf("a", 50.0)]);
        let next = add_panel(root.clone(), leaf("a", 10.0), None);
        assert_eq!(next, root);
    }

    #[test]
    fn test_clamp_size_inverted_bounds_use_min() {
        assert_eq!(clamp_size(50.0, 40.0, 30.0), 40.0);
        assert_eq!(clamp_size(5.0, 10.0, 90.0), 10.0);
        assert_eq!(clamp_size(95.0, 10.0, 90.0), 90.0);
        assert_eq!(clamp_size(45.0, 10.0, 90.0), 45.0);
    }

    #[test]
    fn test_resize_nan_is_noop() {
        let root = root_of(vec![leaf("a", 50.0)]);
        assert_eq!(resize_panel(root.clone(), &"a".into(), f64::NAN), root);
    }

    #[test]
    fn test_reorder_moves_to_over_index() {
        let root = root_of(vec![leaf("a", 25.0), leaf("b", 25.0), leaf("c", 25.0), leaf("d", 25.0)]);
        let forward = reorder_panels(root.clone(), &"a".into(), &"c".into());
        assert_eq!(ids(&forward), vec!["b", "c", "a", "d"]);
        let backward = reorder_panels(root, &"d".into(), &"b".into());
        assert_eq!(ids(&backward), vec!["a", "d", "b", "c"]);
    }

    #[test]
    fn test_reorder_across_containers_is_noop() {
        let root = root_of(vec![
            Panel::composite(
                "g",
                50.0,
                10.0,
                100.0,
                Container::new(Axis::Vertical, vec![leaf("a", 50.0), leaf("b", 50.0)]),
            ),
            leaf("c", 50.0),
        ]);
        assert_eq!(reorder_panels(root.clone(), &"a".into(), &"c".into()), root);
    }

    #[test]
    fn test_reorder_inside_nested_container() {
        let root = root_of(vec![
            Panel::composite(
                "g",
                50.0,
                10.0,
                100.0,
                Container::new(Axis::Vertical, vec![leaf("a", 50.0), leaf("b", 50.0)]),
            ),
            leaf("c", 50.0),
        ]);
        let next = reorder_panels(root, &"b".into(), &"a".into());
        let nested = next.children[0].nested.as_ref().unwrap();
        assert_eq!(ids(nested), vec!["b", "a"]);
    }

    #[test]
    fn test_create_group_uses_root_order() {
        let root = root_of(vec![leaf("a", 20.0), leaf("b", 30.0), leaf("c", 50.0)]);
        let next = create_group(
            root,
            &["c".into(), "a".into()],
            Axis::Vertical,
            Some(5),
            "g".into(),
        );
        assert_eq!(ids(&next), vec!["b", "g"]);
        let group = &next.children[1];
        assert_eq!(group.size, 70.0);
        assert_eq!(group.kind.as_str(), PanelKind::GROUP);
        assert_eq!(ids(group.nested.as_ref().unwrap()), vec!["a", "c"]);
    }

    #[test]
    fn test_create_group_needs_two_found() {
        let root = root_of(vec![leaf("a", 50.0), leaf("b", 50.0)]);
        let next = create_group(
            root.clone(),
            &["a".into(), "missing".into()],
            Axis::Horizontal,
            None,
            "g".into(),
        );
        assert_eq!(next, root);
    }

    #[test]
    fn test_ungroup_root_child_moves_it() {
        let root = root_of(vec![leaf("a", 30.0), leaf("b", 30.0), leaf("c", 40.0)]);
        let next = ungroup_panel(root, &"c".into(), None);
        assert_eq!(ids(&next), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_change_direction_bad_path_is_noop() {
        let root = root_of(vec![leaf("a", 50.0), leaf("b", 50.0)]);
        let next = change_layout_direction(root.clone(), &["a".into()], Axis::Vertical);
        assert_eq!(next, root);
    }

    #[test]
    fn test_smart_drop_onto_self_is_noop() {
        let root = root_of(vec![leaf("a", 50.0), leaf("b", 50.0)]);
        let next = smart_drop(root.clone(), &"a".into(), &"a".into(), DropZone::Left, "g".into());
        assert_eq!(next, root);
    }

    #[test]
    fn test_smart_drop_onto_own_descendant_is_noop() {
        let root = root_of(vec![
            Panel::composite(
                "g",
                50.0,
                10.0,
                100.0,
                Container::new(Axis::Vertical, vec![leaf("a", 50.0), leaf("b", 50.0)]),
            ),
            leaf("c", 50.0),
        ]);
        let next = smart_drop(root.clone(), &"g".into(), &"a".into(), DropZone::Top, "x".into());
        assert_eq!(next, root);
    }

    #[test]
    fn test_smart_drop_onto_dissolving_parent_is_noop() {
        let root = root_of(vec![
            Panel::composite(
                "g",
                50.0,
                10.0,
                100.0,
                Container::new(Axis::Vertical, vec![leaf("a", 50.0), leaf("b", 50.0)]),
            ),
            leaf("c", 50.0),
        ]);
        let next = smart_drop(root.clone(), &"a".into(), &"g".into(), DropZone::Right, "x".into());
        assert_eq!(next, root);
    }

    #[test]
    fn test_drop_zone_parse() {
        assert_eq!("Top".parse::<DropZone>(), Ok(DropZone::Top));
        assert_eq!("center".parse::<DropZone>(), Ok(DropZone::Center));
        assert!("middle".parse::<DropZone>().is_err());
    }
}
