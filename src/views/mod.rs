pub mod controls;
pub mod image_viewer;
pub mod metadata_panel;

pub use controls::controls;
pub use image_viewer::{frame_preview, preview_handle};
pub use metadata_panel::metadata_panel;
