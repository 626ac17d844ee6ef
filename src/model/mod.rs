//! Dashboard model - the complete state of one dashboard session
//!
//! The session owns exactly one [`DashboardModel`]. Every edit flows through
//! `update()`, which swaps `layout` for the tree an operation returns.

pub mod history;
pub mod panel_tree;

pub use history::LayoutHistory;
pub use panel_tree::{
    merge_settings, Axis, Container, InvariantReport, Panel, PanelId, PanelKind, Settings,
    Violation,
};

use crate::config::DashboardConfig;
use crate::layout::{self, LayoutError};
use crate::registry::{PanelRegistry, StaticRegistry};
use crate::render::{leaf_bindings, RenderBinding};

/// Where the session stands with the persistence gateway
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistenceState {
    /// The initial load has completed (successfully or not)
    pub loaded: bool,
    /// Revision of the last tree the gateway confirmed as written
    pub saved_revision: u64,
    /// Last load/save failure, cleared by the next success
    pub last_error: Option<String>,
}

/// The complete dashboard model
#[derive(Debug)]
pub struct DashboardModel {
    /// Root container of the panel tree
    pub layout: Container,
    /// Source of defaults for new panels
    pub registry: Box<dyn PanelRegistry>,
    /// Persisted configuration
    pub config: DashboardConfig,
    /// Undo/redo snapshots
    pub history: LayoutHistory,
    /// Bumped on every change to `layout`
    pub revision: u64,
    pub persistence: PersistenceState,
    /// Last operation that failed to apply
    pub last_error: Option<LayoutError>,
    next_panel_seq: u64,
}

impl DashboardModel {
    /// Create a model with the seed layout described by `config`
    pub fn new(config: DashboardConfig, registry: Box<dyn PanelRegistry>) -> Self {
        let mut model = Self::with_layout(
            Container::new(config.root_axis, Vec::new()),
            config,
            registry,
        );
        model.layout = model.seed_layout();
        model
    }

    /// Create a model around an existing tree
    pub fn with_layout(
        layout: Container,
        config: DashboardConfig,
        registry: Box<dyn PanelRegistry>,
    ) -> Self {
        let history = LayoutHistory::new(config.history_limit);
        Self {
            layout,
            registry,
            config,
            history,
            revision: 0,
            persistence: PersistenceState::default(),
            last_error: None,
            next_panel_seq: 1,
        }
    }

    /// Model using the built-in registry extended by the config's panel kinds
    pub fn from_config(config: DashboardConfig) -> Self {
        let registry = StaticRegistry::with_overrides(&config.panels);
        Self::new(config, Box::new(registry))
    }

    /// Generate an id not present anywhere in the current tree
    pub fn next_panel_id(&mut self, kind: &PanelKind) -> PanelId {
        loop {
            let id = PanelId(format!("{}-{}", kind, self.next_panel_seq));
            self.next_panel_seq += 1;
            if !self.layout.contains(&id) {
                return id;
            }
        }
    }

    /// Fresh layout from the configured default panels (unknown kinds are skipped)
    pub fn seed_layout(&mut self) -> Container {
        let kinds: Vec<PanelKind> = self
            .config
            .default_panels
            .iter()
            .map(|k| PanelKind::new(k.as_str()))
            .collect();

        let mut root = Container::new(self.config.root_axis, Vec::new());
        for kind in kinds {
            let id = self.next_panel_id(&kind);
            match layout::build_panel(self.registry.as_ref(), &kind, id, None) {
                Ok(panel) => root = layout::add_panel(root, panel, None),
                Err(e) => tracing::warn!("Skipping default panel: {}", e),
            }
        }
        root
    }

    /// Build a panel of `kind` from registry defaults and append/insert it at root level
    pub fn add_panel(
        &mut self,
        kind: &PanelKind,
        settings: Option<Settings>,
        index: Option<usize>,
    ) -> Result<PanelId, LayoutError> {
        let id = self.next_panel_id(kind);
        let panel = layout::build_panel(self.registry.as_ref(), kind, id.clone(), settings)?;
        self.apply(|root| layout::add_panel(root, panel, index));
        Ok(id)
    }

    /// Run one tree transition. Returns whether the tree changed; only real
    /// changes are recorded in history and bump the revision.
    pub fn apply(&mut self, op: impl FnOnce(Container) -> Container) -> bool {
        let previous = self.layout.clone();
        let next = op(std::mem::take(&mut self.layout));
        if next == previous {
            self.layout = next;
            return false;
        }
        self.layout = next;
        self.history.record(previous);
        self.revision += 1;
        true
    }

    /// Install a tree from outside the reducer (e.g. a load) without history.
    ///
    /// The tree is normalized first; returns whether that changed anything.
    pub fn replace_layout(&mut self, layout: Container) -> bool {
        let cleaned = layout::cleanup(layout.clone());
        let normalized = cleaned != layout;
        self.layout = cleaned;
        self.history.clear();
        self.revision += 1;
        normalized
    }

    /// Leaf panels for the content renderer, in visual order
    pub fn bindings(&self) -> Vec<RenderBinding<'_>> {
        leaf_bindings(&self.layout)
    }

    /// Changes exist that the gateway has not confirmed
    pub fn is_dirty(&self) -> bool {
        self.revision > self.persistence.saved_revision
    }
}

// ============================================================================
// Debug Invariant Validation
// ============================================================================

impl DashboardModel {
    /// Validate the structural tree invariants in debug builds.
    ///
    /// Panics in debug builds if ids repeat or a container is empty or singleton.
    #[cfg(debug_assertions)]
    pub fn assert_invariants(&self) {
        let report = self.layout.validate();
        assert!(
            report.is_structurally_sound(),
            "layout invariants violated: {:?}",
            report.violations
        );
    }

    /// No-op in release builds
    #[cfg(not(debug_assertions))]
    #[inline]
    pub fn assert_invariants(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_model_seeds_default_panels() {
        let model = DashboardModel::from_config(DashboardConfig::default());
        let kinds: Vec<&str> = model
            .layout
            .children
            .iter()
            .map(|p| p.kind.as_str())
            .collect();
        assert_eq!(
            kinds,
            vec!["collection-grid", "recommendations", "activity-feed"]
        );
        assert_eq!(model.revision, 0);
        assert!(!model.is_dirty());
    }

    #[test]
    fn test_seed_skips_unknown_kinds() {
        let config = DashboardConfig {
            default_panels: vec!["weather".into(), "activity-feed".into()],
            ..DashboardConfig::default()
        };
        let model = DashboardModel::from_config(config);
        assert_eq!(model.layout.children.len(), 1);
    }

    #[test]
    fn test_next_panel_id_skips_taken_ids() {
        let config = DashboardConfig {
            default_panels: vec![],
            ..DashboardConfig::default()
        };
        let mut model = DashboardModel::from_config(config);
        model.layout = Container::new(
            Axis::Horizontal,
            vec![Panel::leaf("feed-1", "feed", 50.0, 10.0, 100.0)],
        );
        assert_eq!(model.next_panel_id(&"feed".into()).as_str(), "feed-2");
    }

    #[test]
    fn test_apply_noop_keeps_revision() {
        let mut model = DashboardModel::from_config(DashboardConfig::default());
        let changed = model.apply(|root| root);
        assert!(!changed);
        assert_eq!(model.revision, 0);
        assert!(!model.history.can_undo());
    }
}
