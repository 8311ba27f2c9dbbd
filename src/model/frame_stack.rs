use image::GrayImage;

use crate::error::{ConvertError, Result};

/// Ordered single-channel frames that all share one width and height.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameStack {
    width: u32,
    height: u32,
    frames: Vec<GrayImage>,
}

impl FrameStack {
    pub fn from_frames(frames: Vec<GrayImage>) -> Result<Self> {
        let (width, height) = frames
            .first()
            .map(|frame| frame.dimensions())
            .unwrap_or((0, 0));

        for (index, frame) in frames.iter().enumerate() {
            let (found_width, found_height) = frame.dimensions();
            if (found_width, found_height) != (width, height) {
                return Err(ConvertError::InconsistentFrames {
                    index,
                    width,
                    height,
                    found_width,
                    found_height,
                });
            }
        }

        Ok(Self {
            width,
            height,
            frames,
        })
    }

    /// `(frame count, width, height)`
    pub fn shape(&self) -> (usize, u32, u32) {
        (self.frames.len(), self.width, self.height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[GrayImage] {
        &self.frames
    }

    pub fn first(&self) -> Option<&GrayImage> {
        self.frames.first()
    }

    /// Builds a new stack by transforming every frame. The transform must
    /// keep the frame dimensions.
    pub fn map_frames<F>(&self, transform: F) -> Result<Self>
    where
        F: FnMut(&GrayImage) -> GrayImage,
    {
        Self::from_frames(self.frames.iter().map(transform).collect())
    }
}
