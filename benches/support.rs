//! Shared helpers for benchmarks

use dashboard_layout::model::{Axis, Container, Panel};

/// Root with `width` leaf panels side by side
#[allow(dead_code)]
pub fn wide_tree(width: usize) -> Container {
    let share = 100.0 / width as f64;
    let children = (0..width)
        .map(|i| Panel::leaf(format!("p{}", i), "activity-feed", share, 1.0, 100.0))
        .collect();
    Container::new(Axis::Horizontal, children)
}

/// Chain of nested pairs `depth` levels deep; the deepest leaf is `leaf-{depth}`
#[allow(dead_code)]
pub fn deep_tree(depth: usize) -> Container {
    let mut inner = Container::new(
        Axis::Vertical,
        vec![
            Panel::leaf(format!("leaf-{}", depth), "activity-feed", 50.0, 10.0, 100.0),
            Panel::leaf(format!("side-{}", depth), "activity-feed", 50.0, 10.0, 100.0),
        ],
    );
    for level in (0..depth).rev() {
        let axis = if level % 2 == 0 {
            Axis::Horizontal
        } else {
            Axis::Vertical
        };
        inner = Container::new(
            axis,
            vec![
                Panel::leaf(format!("side-{}", level), "activity-feed", 50.0, 10.0, 100.0),
                Panel::composite(format!("g-{}", level), 50.0, 10.0, 100.0, inner),
            ],
        );
    }
    inner
}
