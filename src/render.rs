//! Content renderer binding
//!
//! The engine hands each leaf panel to the host as a [`RenderBinding`]; the host
//! decides what widget to mount for the panel's kind. Settings are passed
//! through untouched.

use std::fmt::Write;

use crate::model::{Container, Panel, PanelId, PanelKind, Settings};

/// What a renderer needs to mount one leaf panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderBinding<'a> {
    pub id: &'a PanelId,
    pub kind: &'a PanelKind,
    pub settings: &'a Settings,
}

impl<'a> RenderBinding<'a> {
    fn of(panel: &'a Panel) -> Self {
        Self {
            id: &panel.id,
            kind: &panel.kind,
            settings: &panel.settings,
        }
    }
}

/// Implemented by hosts that turn panel bindings into widgets
pub trait ContentRenderer {
    type Output;

    fn render(&self, binding: RenderBinding<'_>) -> Self::Output;
}

/// Every leaf panel in visual order
pub fn leaf_bindings(root: &Container) -> Vec<RenderBinding<'_>> {
    let mut out = Vec::new();
    collect_leaves(root, &mut out);
    out
}

fn collect_leaves<'a>(container: &'a Container, out: &mut Vec<RenderBinding<'a>>) {
    for panel in &container.children {
        match &panel.nested {
            Some(nested) => collect_leaves(nested, out),
            None => out.push(RenderBinding::of(panel)),
        }
    }
}

/// Render every leaf with `renderer`, in visual order
pub fn render_all<R: ContentRenderer>(root: &Container, renderer: &R) -> Vec<R::Output> {
    leaf_bindings(root)
        .into_iter()
        .map(|binding| renderer.render(binding))
        .collect()
}

/// One-line description per leaf: `id [kind] {settings}`
#[derive(Debug, Default, Clone, Copy)]
pub struct SummaryRenderer;

impl ContentRenderer for SummaryRenderer {
    type Output = String;

    fn render(&self, binding: RenderBinding<'_>) -> String {
        let settings = serde_json::to_string(binding.settings).unwrap_or_default();
        format!("{} [{}] {}", binding.id, binding.kind, settings)
    }
}

/// Indented text outline of the whole tree, composites included
pub fn outline(root: &Container) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "root ({})", root.axis);
    outline_container(root, 1, &mut out);
    out
}

fn outline_container(container: &Container, depth: usize, out: &mut String) {
    for panel in &container.children {
        let indent = "  ".repeat(depth);
        match &panel.nested {
            Some(nested) => {
                let _ = writeln!(
                    out,
                    "{}{} {:.1}% ({})",
                    indent,
                    panel.id,
                    panel.size,
                    nested.axis
                );
                outline_container(nested, depth + 1, out);
            }
            None => {
                let _ = writeln!(
                    out,
                    "{}{} [{}] {:.1}% ({:.0}-{:.0})",
                    indent, panel.id, panel.kind, panel.size, panel.min_size, panel.max_size
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Axis;

    fn tree() -> Container {
        Container::new(
            Axis::Horizontal,
            vec![
                Panel::leaf("a", "collection-grid", 40.0, 20.0, 100.0),
                Panel::composite(
                    "g",
                    60.0,
                    10.0,
                    100.0,
                    Container::new(
                        Axis::Vertical,
                        vec![
                            Panel::leaf("b", "recommendations", 50.0, 15.0, 80.0),
                            Panel::leaf("c", "activity-feed", 50.0, 15.0, 60.0),
                        ],
                    ),
                ),
            ],
        )
    }

    #[test]
    fn test_leaf_bindings_skip_composites() {
        let root = tree();
        let ids: Vec<&str> = leaf_bindings(&root).iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_render_all_with_summary() {
        let root = tree();
        let lines = render_all(&root, &SummaryRenderer);
        assert_eq!(lines[0], "a [collection-grid] {}");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_outline_indents_nested() {
        let text = outline(&tree());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "root (horizontal)");
        assert_eq!(lines[2], "  g 60.0% (vertical)");
        assert!(lines[3].starts_with("    b [recommendations] 50.0%"));
    }
}
