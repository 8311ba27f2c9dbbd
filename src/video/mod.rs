//! Motion JPEG video output in AVI or MP4 containers.

mod encoder;

use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use ffmpeg_next::{self as ffmpeg};

use crate::error::{ConvertError, Result};
use crate::model::FrameStack;

pub use encoder::VideoEncoder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Avi,
    Mp4,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Avi, OutputFormat::Mp4];

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Avi => "avi",
            OutputFormat::Mp4 => "mp4",
        }
    }

    /// FFmpeg muxer name.
    pub fn container(self) -> &'static str {
        match self {
            OutputFormat::Avi => "avi",
            OutputFormat::Mp4 => "mp4",
        }
    }

    /// Both containers carry Motion JPEG.
    pub fn codec_id(self) -> ffmpeg::codec::Id {
        ffmpeg::codec::Id::MJPEG
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Avi => f.write_str("AVI"),
            OutputFormat::Mp4 => f.write_str("MP4"),
        }
    }
}

/// Frames per second as `numerator / denominator`, kept to millisecond
/// precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRate {
    pub numerator: u32,
    pub denominator: u32,
}

impl FrameRate {
    const DENOMINATOR: u32 = 1000;

    pub fn from_fps(fps: f64) -> Result<Self> {
        let numerator = (fps * f64::from(Self::DENOMINATOR)).round();
        if !fps.is_finite() || numerator < 1.0 || numerator > f64::from(i32::MAX) {
            return Err(ConvertError::InvalidFrameRate(fps.to_string()));
        }

        Ok(Self {
            numerator: numerator as u32,
            denominator: Self::DENOMINATOR,
        })
    }

    pub fn fps(self) -> f64 {
        f64::from(self.numerator) / f64::from(self.denominator)
    }

    /// Frames per second as an FFmpeg rational.
    pub fn rational(self) -> ffmpeg::Rational {
        ffmpeg::Rational::new(self.numerator as i32, self.denominator as i32)
    }

    /// One tick per frame.
    pub fn time_base(self) -> ffmpeg::Rational {
        ffmpeg::Rational::new(self.denominator as i32, self.numerator as i32)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoSummary {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub frames: usize,
    pub frame_rate: FrameRate,
}

/// Writes every frame of `stack`, in order, to a new video at `output`.
///
/// An existing file at `output` is replaced. If the write fails after the
/// file was created, the partial file is removed. A file this call could not
/// create is left untouched.
pub fn write_video(
    stack: &FrameStack,
    output: &Path,
    format: OutputFormat,
    fps: f64,
    quality: u8,
) -> Result<VideoSummary> {
    if stack.is_empty() {
        return Err(ConvertError::NoFrames {
            path: output.to_path_buf(),
        });
    }
    let frame_rate = FrameRate::from_fps(fps)?;

    log::info!(
        "Writing {} {} frame(s) at {:.3} fps to {}",
        stack.len(),
        format,
        frame_rate.fps(),
        output.display()
    );

    if let Err(err) = File::create(output) {
        let err = ConvertError::io(output, err);
        log::error!("{err}");
        return Err(err);
    }

    if let Err(err) = encode_frames(stack, output, format, frame_rate, quality) {
        log::error!("{err}");
        remove_partial(output);
        return Err(err);
    }

    Ok(VideoSummary {
        path: output.to_path_buf(),
        format,
        frames: stack.len(),
        frame_rate,
    })
}

fn encode_frames(
    stack: &FrameStack,
    output: &Path,
    format: OutputFormat,
    frame_rate: FrameRate,
    quality: u8,
) -> Result<()> {
    let mut encoder = VideoEncoder::new(
        output,
        stack.width(),
        stack.height(),
        format,
        frame_rate,
        quality,
    )?;

    for (index, frame) in stack.frames().iter().enumerate() {
        encoder.add_frame(frame)?;
        log::trace!("Encoded frame {index}");
    }
    encoder.finish()
}

fn remove_partial(output: &Path) {
    if let Err(err) = fs::remove_file(output) {
        if err.kind() != io::ErrorKind::NotFound {
            log::warn!("Unable to remove partial video {}: {err}", output.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, Luma};

    use super::*;

    #[test]
    fn formats_expose_extension_and_container() {
        assert_eq!(OutputFormat::Avi.extension(), "avi");
        assert_eq!(OutputFormat::Avi.container(), "avi");
        assert_eq!(OutputFormat::Mp4.extension(), "mp4");
        assert_eq!(OutputFormat::Mp4.container(), "mp4");
        assert_eq!(OutputFormat::Mp4.codec_id(), ffmpeg::codec::Id::MJPEG);
        assert_eq!(OutputFormat::Mp4.to_string(), "MP4");
    }

    #[test]
    fn frame_rates_keep_millisecond_precision() {
        let rate = FrameRate::from_fps(29.97).unwrap();
        assert_eq!((rate.numerator, rate.denominator), (29970, 1000));
        assert_eq!(rate.time_base(), ffmpeg::Rational::new(1000, 29970));
        assert_eq!(rate.rational(), ffmpeg::Rational::new(29970, 1000));
    }

    #[test]
    fn non_positive_frame_rates_are_rejected() {
        assert_eq!(
            FrameRate::from_fps(0.0),
            Err(ConvertError::InvalidFrameRate("0".into()))
        );
        assert!(FrameRate::from_fps(f64::NAN).is_err());
        assert!(FrameRate::from_fps(-5.0).is_err());
    }

    fn stack_of(width: u32, height: u32, frames: usize) -> FrameStack {
        let frame = GrayImage::from_pixel(width, height, Luma([128]));
        FrameStack::from_frames(vec![frame; frames]).unwrap()
    }

    #[test]
    fn empty_stacks_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("empty.avi");
        let result = write_video(&FrameStack::default(), &output, OutputFormat::Avi, 10.0, 90);

        assert!(matches!(result, Err(ConvertError::NoFrames { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn failure_after_creation_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("wide.avi");
        let stack = stack_of(u32::from(u16::MAX) + 1, 1, 2);

        let result = write_video(&stack, &output, OutputFormat::Avi, 10.0, 90);

        assert!(matches!(result, Err(ConvertError::Encode(_))));
        assert!(!output.exists());
    }

    #[test]
    fn existing_file_that_cannot_be_created_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("locked.avi");
        fs::write(&output, b"keep me").unwrap();
        let mut permissions = fs::metadata(&output).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&output, permissions).unwrap();

        // Privileged users can still open read-only files for writing.
        if fs::OpenOptions::new().write(true).open(&output).is_ok() {
            return;
        }

        let result = write_video(&stack_of(8, 8, 2), &output, OutputFormat::Avi, 10.0, 90);

        assert!(matches!(result, Err(ConvertError::Io { .. })));
        assert_eq!(fs::read(&output).unwrap(), b"keep me");
    }
}
