//! Dashboard panel layout engine
//!
//! A tree of resizable, re-orderable, splittable panels driven by an
//! Elm-style reducer: messages go in, a new tree and side-effect commands
//! come out.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod layout;
pub mod messages;
pub mod model;
pub mod persistence;
pub mod registry;
pub mod render;
pub mod runtime;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::DashboardConfig;
pub use messages::Msg;
pub use model::DashboardModel;
pub use runtime::Session;
