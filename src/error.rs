use std::path::{Path, PathBuf};

use thiserror::Error;

/// Every failure the load and convert pipeline can report.
///
/// Errors travel inside UI messages, so the variants carry rendered reasons
/// rather than the source error values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    #[error("{}: failed to open DICOM file ({reason})", .path.display())]
    Open { path: PathBuf, reason: String },

    #[error("{}: failed to decode pixel data ({reason})", .path.display())]
    PixelData { path: PathBuf, reason: String },

    #[error("{}: no frames to process", .path.display())]
    NoFrames { path: PathBuf },

    #[error("frame {index} is {found_width}x{found_height}, expected {width}x{height}")]
    InconsistentFrames {
        index: usize,
        width: u32,
        height: u32,
        found_width: u32,
        found_height: u32,
    },

    #[error("clip limit `{0}` is not a non-negative number")]
    InvalidClipLimit(String),

    #[error("frame rate `{0}` is not a positive number")]
    InvalidFrameRate(String),

    #[error("failed to encode video: {0}")]
    Encode(String),

    #[error("{}: {reason}", .path.display())]
    Io { path: PathBuf, reason: String },
}

impl ConvertError {
    pub fn io(path: &Path, err: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }
}

impl From<ffmpeg_next::Error> for ConvertError {
    fn from(err: ffmpeg_next::Error) -> Self {
        Self::Encode(err.to_string())
    }
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;
