//! Willowbend DICOM: contrast-enhanced video export for DICOM cine loops.

pub mod convert;
pub mod enhance;
pub mod error;
pub mod image_pipeline;
pub mod model;
pub mod notice;
pub mod settings;
pub mod utils;
pub mod video;

pub use convert::{convert_file, load_file, output_path_for, LoadedFile};
pub use error::{ConvertError, Result};
pub use settings::{parse_clip_limit, parse_frame_rate, ConversionSettings, EnhancementMode};
pub use video::{write_video, OutputFormat, VideoSummary};
