pub mod formatting;

pub use formatting::{format_date, format_frame_rate, format_person_name, format_time};
