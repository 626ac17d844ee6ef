//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use dashboard_layout::config::DashboardConfig;
use dashboard_layout::model::{Axis, Container, DashboardModel, Panel, PanelId};

/// Leaf panel with bounds 10-100
pub fn leaf(id: &str, size: f64) -> Panel {
    Panel::leaf(id, "activity-feed", size, 10.0, 100.0)
}

/// Leaf panel with explicit bounds
pub fn bounded(id: &str, size: f64, min: f64, max: f64) -> Panel {
    Panel::leaf(id, "activity-feed", size, min, max)
}

/// Composite panel with bounds 10-100
pub fn group(id: &str, size: f64, axis: Axis, children: Vec<Panel>) -> Panel {
    Panel::composite(id, size, 10.0, 100.0, Container::new(axis, children))
}

/// Horizontal root container
pub fn root(children: Vec<Panel>) -> Container {
    Container::new(Axis::Horizontal, children)
}

/// Ids of a container's direct children
pub fn child_ids(container: &Container) -> Vec<&str> {
    container.children.iter().map(|p| p.id.as_str()).collect()
}

/// Sizes of a container's direct children
pub fn child_sizes(container: &Container) -> Vec<f64> {
    container.children.iter().map(|p| p.size).collect()
}

pub fn id(s: &str) -> PanelId {
    PanelId::new(s)
}

/// Scenario tree: P1(40), P2(35), P3(25)
pub fn three_panels() -> Container {
    root(vec![leaf("P1", 40.0), leaf("P2", 35.0), leaf("P3", 25.0)])
}

/// Config with no seed panels and no save delay
pub fn test_config() -> DashboardConfig {
    DashboardConfig {
        save_debounce_ms: 0,
        default_panels: vec![],
        ..DashboardConfig::default()
    }
}

/// Model holding `layout`, with the initial load already completed
pub fn test_model(layout: Container) -> DashboardModel {
    let mut model = DashboardModel::from_config(test_config());
    model.layout = layout;
    model.persistence.loaded = true;
    model
}

/// Panic with the violations if the tree breaks a structural invariant
pub fn assert_sound(container: &Container) {
    let report = container.validate();
    assert!(
        report.is_structurally_sound(),
        "invariants violated: {:?}\n{:#?}",
        report.violations,
        container
    );
}
