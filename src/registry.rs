//! Panel registry - default sizing and settings per panel kind
//!
//! The engine asks the registry for defaults whenever a panel is created. Hosts
//! can plug in their own [`PanelRegistry`]; [`StaticRegistry`] covers the
//! built-in dashboard widgets plus whatever the user config adds.

use std::collections::BTreeMap;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::model::{PanelKind, Settings};

/// Defaults handed out for one panel kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelDefaults {
    #[serde(default = "default_size")]
    pub default_size: f64,
    #[serde(default = "default_min_size")]
    pub min_size: f64,
    #[serde(default = "default_max_size")]
    pub max_size: f64,
    #[serde(default)]
    pub default_settings: Settings,
}

fn default_size() -> f64 {
    33.0
}

fn default_min_size() -> f64 {
    10.0
}

fn default_max_size() -> f64 {
    100.0
}

impl PanelDefaults {
    pub fn new(default_size: f64, min_size: f64, max_size: f64) -> Self {
        Self {
            default_size,
            min_size,
            max_size,
            default_settings: Settings::new(),
        }
    }

    pub fn with_setting(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.default_settings.insert(key.to_string(), value.into());
        self
    }
}

/// Source of panel defaults, keyed by kind
pub trait PanelRegistry: Debug + Send {
    /// Defaults for `kind`, or `None` if the kind is not registered
    fn lookup(&self, kind: &PanelKind) -> Option<PanelDefaults>;

    /// All registered kinds, for listings
    fn kinds(&self) -> Vec<PanelKind>;
}

/// Well-known panel kinds of the dashboard
pub mod kinds {
    pub const COLLECTION_GRID: &str = "collection-grid";
    pub const RECOMMENDATIONS: &str = "recommendations";
    pub const ACTIVITY_FEED: &str = "activity-feed";
}

/// In-memory registry backed by a map
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    entries: BTreeMap<PanelKind, PanelDefaults>,
}

impl StaticRegistry {
    /// Registry without any kinds
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with the built-in dashboard widgets
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(
            kinds::COLLECTION_GRID,
            PanelDefaults::new(40.0, 20.0, 100.0)
                .with_setting("columns", 4)
                .with_setting("sort", "recent"),
        );
        registry.register(
            kinds::RECOMMENDATIONS,
            PanelDefaults::new(35.0, 15.0, 80.0).with_setting("limit", 10),
        );
        registry.register(
            kinds::ACTIVITY_FEED,
            PanelDefaults::new(25.0, 15.0, 60.0)
                .with_setting("limit", 20)
                .with_setting("showFollowing", true),
        );
        registry
    }

    /// Built-ins extended (or overridden) by `extra`
    pub fn with_overrides(extra: &BTreeMap<String, PanelDefaults>) -> Self {
        let mut registry = Self::builtin();
        for (kind, defaults) in extra {
            registry.register(kind.as_str(), defaults.clone());
        }
        registry
    }

    pub fn register(&mut self, kind: impl Into<PanelKind>, defaults: PanelDefaults) {
        let kind = kind.into();
        if kind.as_str() == PanelKind::GROUP {
            tracing::warn!("Refusing to register reserved panel kind '{}'", kind);
            return;
        }
        self.entries.insert(kind, defaults);
    }
}

impl PanelRegistry for StaticRegistry {
    fn lookup(&self, kind: &PanelKind) -> Option<PanelDefaults> {
        self.entries.get(kind).cloned()
    }

    fn kinds(&self) -> Vec<PanelKind> {
        self.entries.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_kinds_registered() {
        let registry = StaticRegistry::builtin();
        let kinds: Vec<String> = registry.kinds().into_iter().map(|k| k.0).collect();
        assert_eq!(
            kinds,
            vec!["activity-feed", "collection-grid", "recommendations"]
        );
    }

    #[test]
    fn test_lookup_unknown_is_none() {
        let registry = StaticRegistry::builtin();
        assert!(registry.lookup(&"weather".into()).is_none());
    }

    #[test]
    fn test_overrides_replace_builtin() {
        let mut extra = BTreeMap::new();
        extra.insert(
            kinds::ACTIVITY_FEED.to_string(),
            PanelDefaults::new(30.0, 10.0, 50.0),
        );
        extra.insert("now-playing".to_string(), PanelDefaults::new(20.0, 10.0, 40.0));
        let registry = StaticRegistry::with_overrides(&extra);

        let feed = registry.lookup(&kinds::ACTIVITY_FEED.into()).unwrap();
        assert_eq!(feed.default_size, 30.0);
        assert!(feed.default_settings.is_empty());
        assert!(registry.lookup(&"now-playing".into()).is_some());
    }

    #[test]
    fn test_group_kind_is_reserved() {
        let mut registry = StaticRegistry::empty();
        registry.register(PanelKind::GROUP, PanelDefaults::new(50.0, 10.0, 100.0));
        assert!(registry.lookup(&PanelKind::group()).is_none());
    }
}
