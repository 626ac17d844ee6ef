//! Persistence message handlers (load result, debounced save, save result)

use crate::commands::Cmd;
use crate::messages::PersistMsg;
use crate::model::{DashboardModel, Violation};

/// Debounce a save of the current revision
pub fn schedule_save(model: &DashboardModel) -> Cmd {
    Cmd::DebouncedSave {
        revision: model.revision,
        delay_ms: model.config.save_debounce_ms,
    }
}

/// Commands issued after any change to the tree
pub(super) fn tree_changed(model: &DashboardModel) -> Cmd {
    Cmd::Batch(vec![Cmd::Redraw, schedule_save(model)])
}

/// Handle gateway results and debounce timers
pub fn update_persist(model: &mut DashboardModel, msg: PersistMsg) -> Option<Cmd> {
    match msg {
        PersistMsg::Loaded(Ok(Some(layout))) => {
            let duplicates: Vec<String> = layout
                .validate()
                .violations
                .iter()
                .filter_map(|v| match v {
                    Violation::DuplicateId(id) => Some(id.to_string()),
                    _ => None,
                })
                .collect();
            if !duplicates.is_empty() {
                let error = format!(
                    "stored layout rejected: duplicate panel ids {}",
                    duplicates.join(", ")
                );
                tracing::warn!("{}", error);
                model.persistence.loaded = true;
                model.persistence.last_error = Some(error);
                return model.is_dirty().then(|| schedule_save(model));
            }

            let normalized = model.replace_layout(layout);
            model.persistence.loaded = true;
            model.persistence.last_error = None;
            if normalized {
                tracing::info!("Stored layout needed cleanup, scheduling save");
                Some(tree_changed(model))
            } else {
                model.persistence.saved_revision = model.revision;
                Some(Cmd::Redraw)
            }
        }

        PersistMsg::Loaded(Ok(None)) => {
            model.persistence.loaded = true;
            model.persistence.last_error = None;
            tracing::debug!("No stored layout, keeping current tree");
            model.is_dirty().then(|| schedule_save(model))
        }

        PersistMsg::Loaded(Err(e)) => {
            tracing::warn!("Failed to load layout: {}", e);
            model.persistence.loaded = true;
            model.persistence.last_error = Some(e);
            model.is_dirty().then(|| schedule_save(model))
        }

        PersistMsg::SaveReady { revision } => {
            if !model.persistence.loaded {
                tracing::debug!("Save of revision {} deferred until load completes", revision);
                return None;
            }
            if revision != model.revision {
                tracing::debug!(
                    "Save of revision {} superseded by revision {}",
                    revision,
                    model.revision
                );
                return None;
            }
            if !model.is_dirty() {
                return None;
            }
            Some(Cmd::SaveLayout {
                revision,
                layout: model.layout.clone(),
            })
        }

        PersistMsg::SaveCompleted { revision, result } => {
            match result {
                Ok(()) => {
                    model.persistence.saved_revision =
                        model.persistence.saved_revision.max(revision);
                    model.persistence.last_error = None;
                }
                Err(e) => {
                    tracing::warn!("Failed to save layout revision {}: {}", revision, e);
                    model.persistence.last_error = Some(e);
                }
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::model::{Axis, Container, Panel};

    fn loaded_model() -> DashboardModel {
        let mut model = DashboardModel::from_config(DashboardConfig::default());
        update_persist(&mut model, PersistMsg::Loaded(Ok(None)));
        model
    }

    fn two_panels() -> Container {
        Container::new(
            Axis::Horizontal,
            vec![
                Panel::leaf("a", "activity-feed", 50.0, 15.0, 60.0),
                Panel::leaf("b", "recommendations", 50.0, 15.0, 80.0),
            ],
        )
    }

    #[test]
    fn test_save_ready_stale_revision_dropped() {
        let mut model = loaded_model();
        model.apply(|root| crate::layout::resize_panel(root, &"collection-grid-1".into(), 50.0));
        model.apply(|root| crate::layout::resize_panel(root, &"collection-grid-1".into(), 60.0));
        assert_eq!(model.revision, 2);

        assert!(update_persist(&mut model, PersistMsg::SaveReady { revision: 1 }).is_none());
        let cmd = update_persist(&mut model, PersistMsg::SaveReady { revision: 2 });
        assert!(matches!(cmd, Some(Cmd::SaveLayout { revision: 2, .. })));
    }

    #[test]
    fn test_save_ready_before_load_is_dropped() {
        let mut model = DashboardModel::from_config(DashboardConfig::default());
        model.apply(|root| crate::layout::resize_panel(root, &"collection-grid-1".into(), 50.0));
        assert!(update_persist(&mut model, PersistMsg::SaveReady { revision: 1 }).is_none());
    }

    #[test]
    fn test_loaded_tree_replaces_and_clears_history() {
        let mut model = DashboardModel::from_config(DashboardConfig::default());
        model.apply(|root| crate::layout::resize_panel(root, &"collection-grid-1".into(), 50.0));
        assert!(model.history.can_undo());

        let cmd = update_persist(&mut model, PersistMsg::Loaded(Ok(Some(two_panels()))));
        assert_eq!(cmd, Some(Cmd::Redraw));
        assert_eq!(model.layout, two_panels());
        assert!(!model.history.can_undo());
        assert!(!model.is_dirty());
    }

    #[test]
    fn test_loaded_degenerate_tree_is_normalized_and_saved() {
        let mut model = DashboardModel::from_config(DashboardConfig::default());
        let degenerate = Container::new(
            Axis::Horizontal,
            vec![Panel::composite(
                "g",
                70.0,
                10.0,
                90.0,
                Container::new(
                    Axis::Vertical,
                    vec![Panel::leaf("only", "activity-feed", 20.0, 15.0, 60.0)],
                ),
            )],
        );
        let cmd = update_persist(&mut model, PersistMsg::Loaded(Ok(Some(degenerate))));
        assert!(cmd.and_then(|c| c.debounced_revision()).is_some());
        assert_eq!(model.layout.children[0].id.as_str(), "only");
        assert_eq!(model.layout.children[0].size, 70.0);
        assert!(model.is_dirty());
    }

    #[test]
    fn test_loaded_tree_with_duplicate_ids_is_rejected() {
        let mut model = DashboardModel::from_config(DashboardConfig::default());
        let before = model.layout.clone();
        let duplicated = Container::new(
            Axis::Horizontal,
            vec![
                Panel::leaf("a", "activity-feed", 50.0, 15.0, 60.0),
                Panel::composite(
                    "g",
                    50.0,
                    10.0,
                    90.0,
                    Container::new(
                        Axis::Vertical,
                        vec![
                            Panel::leaf("a", "recommendations", 50.0, 15.0, 80.0),
                            Panel::leaf("b", "recommendations", 50.0, 15.0, 80.0),
                        ],
                    ),
                ),
            ],
        );

        let cmd = update_persist(&mut model, PersistMsg::Loaded(Ok(Some(duplicated))));
        assert!(cmd.is_none());
        assert_eq!(model.layout, before);
        assert!(model.persistence.loaded);
        let error = model.persistence.last_error.as_deref().unwrap();
        assert!(error.contains("duplicate panel ids a"), "{error}");
        assert!(model.layout.validate().is_structurally_sound());
    }

    #[test]
    fn test_load_error_recorded_and_tree_kept() {
        let mut model = DashboardModel::from_config(DashboardConfig::default());
        let before = model.layout.clone();
        let cmd = update_persist(&mut model, PersistMsg::Loaded(Err("disk gone".into())));
        assert!(cmd.is_none());
        assert_eq!(model.layout, before);
        assert!(model.persistence.loaded);
        assert_eq!(model.persistence.last_error.as_deref(), Some("disk gone"));
    }

    #[test]
    fn test_save_completed_updates_saved_revision() {
        let mut model = loaded_model();
        model.apply(|root| crate::layout::resize_panel(root, &"collection-grid-1".into(), 50.0));
        update_persist(
            &mut model,
            PersistMsg::SaveCompleted {
                revision: 1,
                result: Ok(()),
            },
        );
        assert!(!model.is_dirty());

        model.apply(|root| crate::layout::resize_panel(root, &"collection-grid-1".into(), 55.0));
        update_persist(
            &mut model,
            PersistMsg::SaveCompleted {
                revision: 2,
                result: Err("read-only".into()),
            },
        );
        assert!(model.is_dirty());
        assert_eq!(model.persistence.last_error.as_deref(), Some("read-only"));
    }
}
