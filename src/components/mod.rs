pub mod dialog;
pub mod segmented_toggle;

pub use dialog::show_notice;
pub use segmented_toggle::output_format_toggle;
