//! Command-line argument parsing for the dashboard tool
//!
//! Each mutating subcommand maps to exactly one layout message.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::layout::DropZone;
use crate::messages::{LayoutMsg, Msg};
use crate::model::{Axis, PanelId, PanelKind, Settings};

/// Inspect and edit a dashboard panel layout
#[derive(Parser, Debug)]
#[command(
    name = "dashboard-layout",
    version,
    about = "Inspect and edit a dashboard panel layout"
)]
pub struct CliArgs {
    /// Layout file to use instead of the one in the config directory
    #[arg(long, value_name = "FILE", global = true)]
    pub layout: Option<PathBuf>,

    /// Config file to use instead of the one in the config directory
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the panel tree
    Show,
    /// Print what the content renderer receives for each leaf
    Bindings,
    /// Add a panel of KIND at root level
    Add {
        kind: String,
        /// Root position (appends when omitted)
        #[arg(long)]
        index: Option<usize>,
        /// Setting override, repeatable
        #[arg(long = "set", value_name = "KEY=VALUE")]
        settings: Vec<String>,
    },
    /// Remove a panel
    Remove { id: String },
    /// Merge settings into a panel
    Configure {
        id: String,
        #[arg(value_name = "KEY=VALUE", required = true)]
        settings: Vec<String>,
    },
    /// Resize a panel (percent of its container, clamped to its bounds)
    Resize {
        id: String,
        #[arg(allow_negative_numbers = true)]
        size: f64,
    },
    /// Move ACTIVE to the position of its sibling OVER
    Reorder { active: String, over: String },
    /// Group root-level panels into a split
    Group {
        #[arg(required = true, num_args = 2..)]
        ids: Vec<String>,
        #[arg(long, default_value = "horizontal")]
        axis: Axis,
        #[arg(long)]
        index: Option<usize>,
    },
    /// Move a panel out of its group to root level
    Ungroup {
        id: String,
        #[arg(long)]
        index: Option<usize>,
    },
    /// Set the axis of the root, or of the group reached by PATH
    Direction {
        axis: Axis,
        #[arg(value_name = "PATH")]
        path: Vec<String>,
    },
    /// Drop DRAGGED onto a zone of TARGET
    Drop {
        dragged: String,
        target: String,
        /// top, bottom, left, right or center
        zone: DropZone,
    },
    /// Replace the layout with the configured default panels
    Reset,
    /// Validate the stored layout
    Check,
}

impl Command {
    /// The layout message this subcommand applies, if it mutates the tree
    pub fn to_msg(&self) -> Result<Option<Msg>, String> {
        let msg = match self {
            Command::Show | Command::Bindings | Command::Check => return Ok(None),
            Command::Add {
                kind,
                index,
                settings,
            } => LayoutMsg::AddPanel {
                kind: PanelKind::new(kind.as_str()),
                settings: if settings.is_empty() {
                    None
                } else {
                    Some(parse_settings(settings)?)
                },
                index: *index,
            },
            Command::Remove { id } => LayoutMsg::RemovePanel(PanelId::new(id.as_str())),
            Command::Configure { id, settings } => LayoutMsg::UpdatePanelConfig {
                id: PanelId::new(id.as_str()),
                settings: parse_settings(settings)?,
            },
            Command::Resize { id, size } => LayoutMsg::ResizePanel {
                id: PanelId::new(id.as_str()),
                size: *size,
            },
            Command::Reorder { active, over } => LayoutMsg::ReorderPanels {
                active: PanelId::new(active.as_str()),
                over: PanelId::new(over.as_str()),
            },
            Command::Group { ids, axis, index } => LayoutMsg::CreateGroup {
                ids: ids.iter().map(|id| PanelId::new(id.as_str())).collect(),
                axis: *axis,
                index: *index,
            },
            Command::Ungroup { id, index } => LayoutMsg::UngroupPanel {
                id: PanelId::new(id.as_str()),
                index: *index,
            },
            Command::Direction { axis, path } => LayoutMsg::ChangeLayoutDirection {
                path: path.iter().map(|id| PanelId::new(id.as_str())).collect(),
                axis: *axis,
            },
            Command::Drop {
                dragged,
                target,
                zone,
            } => LayoutMsg::SmartDrop {
                dragged: PanelId::new(dragged.as_str()),
                target: PanelId::new(target.as_str()),
                zone: *zone,
            },
            Command::Reset => LayoutMsg::ResetLayout,
        };
        Ok(Some(Msg::Layout(msg)))
    }
}

/// Parse `KEY=VALUE` pairs. Values are read as JSON when they parse, otherwise as strings.
pub fn parse_settings(pairs: &[String]) -> Result<Settings, String> {
    let mut settings = Settings::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", pair))?;
        if key.is_empty() {
            return Err(format!("empty key in '{}'", pair));
        }
        let value = serde_json::from_str(raw)
            .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
        settings.insert(key.to_string(), value);
    }
    Ok(settings)
}
