//! Layout engine - pure state transitions over the panel tree
//!
//! Every operation takes the current root by value and returns the next root.
//! A reference to a missing panel is a silent no-op that hands the input back
//! unchanged. Operations that can orphan a container finish with [`cleanup`].

mod cleanup;
pub mod ops;

pub use cleanup::cleanup;
pub use ops::{
    add_panel, build_panel, change_layout_direction, create_group, remove_panel,
    reorder_panels, resize_panel, smart_drop, ungroup_panel, update_panel_config, DropZone,
    LayoutError, GROUP_MAX_SIZE, GROUP_MIN_SIZE,
};
