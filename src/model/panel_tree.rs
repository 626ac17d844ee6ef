//! Panel tree - the recursive container/panel structure behind a dashboard
//!
//! A dashboard is a single root [`Container`] whose children are [`Panel`]s.
//! A panel is either a leaf (bound to one content renderer through its `kind`)
//! or a composite whose `nested` container splits its slot further.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// Identifiers
// ============================================================================

/// Opaque identifier of a panel, unique across the whole tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(pub String);

impl PanelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PanelId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Tag naming which content renderer owns a panel
///
/// The engine never interprets it beyond registry lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelKind(pub String);

impl PanelKind {
    /// Kind given to composite panels created by grouping and smart drop
    pub const GROUP: &'static str = "group";

    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn group() -> Self {
        Self(Self::GROUP.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PanelKind {
    fn from(kind: &str) -> Self {
        Self(kind.to_string())
    }
}

/// Arbitrary per-panel settings, opaque to the engine
pub type Settings = serde_json::Map<String, serde_json::Value>;

/// Shallow merge: every key in `partial` overwrites the key in `target`
pub fn merge_settings(target: &mut Settings, partial: Settings) {
    for (key, value) in partial {
        target.insert(key, value);
    }
}

// ============================================================================
// Tree
// ============================================================================

/// Primary axis of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Children arranged left-to-right
    #[default]
    Horizontal,
    /// Children arranged top-to-bottom
    Vertical,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Horizontal => f.write_str("horizontal"),
            Axis::Vertical => f.write_str("vertical"),
        }
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "horizontal" | "h" => Ok(Axis::Horizontal),
            "vertical" | "v" => Ok(Axis::Vertical),
            other => Err(format!("unknown axis '{}'", other)),
        }
    }
}

/// A node of the layout tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub id: PanelId,
    pub kind: PanelKind,
    /// Share (percent) of the parent container's span along its axis
    pub size: f64,
    pub min_size: f64,
    pub max_size: f64,
    #[serde(default)]
    pub settings: Settings,
    /// Present if and only if this panel is a split group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested: Option<Container>,
}

impl Panel {
    /// Create a leaf panel with empty settings
    pub fn leaf(
        id: impl Into<PanelId>,
        kind: impl Into<PanelKind>,
        size: f64,
        min_size: f64,
        max_size: f64,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            size,
            min_size,
            max_size,
            settings: Settings::new(),
            nested: None,
        }
    }

    /// Create a composite panel wrapping `nested`
    pub fn composite(
        id: impl Into<PanelId>,
        size: f64,
        min_size: f64,
        max_size: f64,
        nested: Container,
    ) -> Self {
        Self {
            id: id.into(),
            kind: PanelKind::group(),
            size,
            min_size,
            max_size,
            settings: Settings::new(),
            nested: Some(nested),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.nested.is_none()
    }

    /// Take over the slot metrics of `slot` (size and bounds), keeping everything else
    pub fn adopt_slot(mut self, slot: &Panel) -> Self {
        self.size = slot.size;
        self.min_size = slot.min_size;
        self.max_size = slot.max_size;
        self
    }

    /// Does this panel or any descendant carry `id`?
    pub fn subtree_contains(&self, id: &PanelId) -> bool {
        self.id == *id || self.nested.as_ref().is_some_and(|c| c.contains(id))
    }
}

impl From<String> for PanelId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<String> for PanelKind {
    fn from(kind: String) -> Self {
        Self(kind)
    }
}

/// Ordered, axis-aligned set of panels (the root, or a composite's contents)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Container {
    pub axis: Axis,
    #[serde(default)]
    pub children: Vec<Panel>,
}

impl Container {
    pub fn new(axis: Axis, children: Vec<Panel>) -> Self {
        Self { axis, children }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Index of a direct child
    pub fn position(&self, id: &PanelId) -> Option<usize> {
        self.children.iter().position(|p| p.id == *id)
    }

    /// Find a panel anywhere below this container
    pub fn find(&self, id: &PanelId) -> Option<&Panel> {
        for child in &self.children {
            if child.id == *id {
                return Some(child);
            }
            if let Some(found) = child.nested.as_ref().and_then(|c| c.find(id)) {
                return Some(found);
            }
        }
        None
    }

    /// Find a panel anywhere below this container, mutably
    pub fn find_mut(&mut self, id: &PanelId) -> Option<&mut Panel> {
        for child in &mut self.children {
            if child.id == *id {
                return Some(child);
            }
            if let Some(found) = child.nested.as_mut().and_then(|c| c.find_mut(id)) {
                return Some(found);
            }
        }
        None
    }

    pub fn contains(&self, id: &PanelId) -> bool {
        self.find(id).is_some()
    }

    /// All panel ids in pre-order (composites before their contents)
    pub fn ids(&self) -> Vec<PanelId> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids(&self, out: &mut Vec<PanelId>) {
        for child in &self.children {
            out.push(child.id.clone());
            if let Some(nested) = &child.nested {
                nested.collect_ids(out);
            }
        }
    }

    /// Ids of the composite panels leading from this container down to the
    /// container that directly holds `id`.
    ///
    /// Empty when `id` is a direct child; `None` when it is not in the tree.
    pub fn path_to(&self, id: &PanelId) -> Option<Vec<PanelId>> {
        if self.position(id).is_some() {
            return Some(Vec::new());
        }
        for child in &self.children {
            if let Some(nested) = &child.nested {
                if let Some(mut rest) = nested.path_to(id) {
                    rest.insert(0, child.id.clone());
                    return Some(rest);
                }
            }
        }
        None
    }

    /// Number of leaf panels reachable from this container
    pub fn leaf_count(&self) -> usize {
        self.children
            .iter()
            .map(|p| match &p.nested {
                Some(nested) => nested.leaf_count(),
                None => 1,
            })
            .sum()
    }

    /// Check the tree invariants and report every violation found
    pub fn validate(&self) -> InvariantReport {
        let mut report = InvariantReport::default();
        let mut seen = HashSet::new();
        self.validate_into(&mut seen, &mut report);
        report
    }

    fn validate_into<'a>(&'a self, seen: &mut HashSet<&'a PanelId>, report: &mut InvariantReport) {
        for child in &self.children {
            if !seen.insert(&child.id) {
                report.violations.push(Violation::DuplicateId(child.id.clone()));
            }
            if child.size.is_nan() || child.size < child.min_size || child.size > child.max_size {
                report
                    .violations
                    .push(Violation::SizeOutOfBounds(child.id.clone()));
            }
            if let Some(nested) = &child.nested {
                match nested.children.len() {
                    0 => report
                        .violations
                        .push(Violation::EmptyContainer(child.id.clone())),
                    1 => report
                        .violations
                        .push(Violation::SingletonContainer(child.id.clone())),
                    _ => {}
                }
                nested.validate_into(seen, report);
            }
        }
    }

    /// Structural invariants hold: unique ids, no empty or singleton containers
    pub fn is_valid(&self) -> bool {
        self.validate().is_structurally_sound()
    }
}

// ============================================================================
// Invariant Validation
// ============================================================================

/// A single broken invariant, naming the offending panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The id occurs more than once in the tree
    DuplicateId(PanelId),
    /// Composite panel whose container has no children
    EmptyContainer(PanelId),
    /// Composite panel whose container has exactly one child
    SingletonContainer(PanelId),
    /// `size` outside `[min_size, max_size]`
    SizeOutOfBounds(PanelId),
}

impl Violation {
    pub fn is_structural(&self) -> bool {
        !matches!(self, Violation::SizeOutOfBounds(_))
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::DuplicateId(id) => write!(f, "duplicate panel id {}", id),
            Violation::EmptyContainer(id) => write!(f, "panel {} holds an empty container", id),
            Violation::SingletonContainer(id) => {
                write!(f, "panel {} holds a single-child container", id)
            }
            Violation::SizeOutOfBounds(id) => write!(f, "panel {} size is out of bounds", id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvariantReport {
    pub violations: Vec<Violation>,
}

impl InvariantReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn is_structurally_sound(&self) -> bool {
        !self.violations.iter().any(Violation::is_structural)
    }
}
