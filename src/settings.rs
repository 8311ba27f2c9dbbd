use std::fmt;

use clap::ValueEnum;

use crate::enhance::Enhancement;
use crate::error::{ConvertError, Result};
use crate::model::StudyMetadata;
use crate::video::{FrameRate, OutputFormat};

pub const DEFAULT_CLIP_LIMIT: f32 = 1.5;
/// Used when a file declares no cine rate.
pub const DEFAULT_FRAME_RATE: f64 = 15.0;
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum EnhancementMode {
    /// Contrast limited adaptive histogram equalization
    #[default]
    Clahe,
    /// Whole-frame histogram equalization
    Global,
    /// Frames are written unchanged
    None,
}

impl EnhancementMode {
    pub const ALL: [EnhancementMode; 3] = [
        EnhancementMode::Clahe,
        EnhancementMode::Global,
        EnhancementMode::None,
    ];
}

impl fmt::Display for EnhancementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnhancementMode::Clahe => f.write_str("CLAHE"),
            EnhancementMode::Global => f.write_str("Equalize"),
            EnhancementMode::None => f.write_str("None"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSettings {
    pub clip_limit: f32,
    pub output_format: OutputFormat,
    pub enhancement: EnhancementMode,
    pub fallback_frame_rate: f64,
    pub jpeg_quality: u8,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            clip_limit: DEFAULT_CLIP_LIMIT,
            output_format: OutputFormat::default(),
            enhancement: EnhancementMode::default(),
            fallback_frame_rate: DEFAULT_FRAME_RATE,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ConversionSettings {
    pub fn enhancement(&self) -> Enhancement {
        match self.enhancement {
            EnhancementMode::Clahe => Enhancement::Clahe {
                clip_limit: self.clip_limit,
            },
            EnhancementMode::Global => Enhancement::Global,
            EnhancementMode::None => Enhancement::None,
        }
    }

    pub fn frame_rate_for(&self, metadata: &StudyMetadata) -> f64 {
        metadata.cine_rate.unwrap_or(self.fallback_frame_rate)
    }
}

/// Parses the clip-limit text field. Surrounding whitespace is ignored.
pub fn parse_clip_limit(input: &str) -> Result<f32> {
    let trimmed = input.trim();
    trimmed
        .parse::<f32>()
        .ok()
        .filter(|limit| limit.is_finite() && *limit >= 0.0)
        .ok_or_else(|| ConvertError::InvalidClipLimit(trimmed.to_string()))
}

/// Parses a frames-per-second value. Zero, negative, and non-finite rates
/// are rejected.
pub fn parse_frame_rate(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    let fps = trimmed
        .parse::<f64>()
        .map_err(|_| ConvertError::InvalidFrameRate(trimmed.to_string()))?;
    FrameRate::from_fps(fps)?;
    Ok(fps)
}
