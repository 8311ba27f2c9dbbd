use std::path::Path;

use dicom::core::header::HasLength;
use dicom::dictionary_std::tags;
use dicom::object::{open_file, DefaultDicomObject};
use dicom::pixeldata::PixelDecoder;

use super::FrameStack;
use crate::error::{ConvertError, Result};
use crate::image_pipeline::FrameImagePipeline;

pub fn load_frame_stack(path: &Path) -> Result<FrameStack> {
    let object = open_dicom(path)?;
    frame_stack_from_object(&object, path)
}

pub(crate) fn open_dicom(path: &Path) -> Result<DefaultDicomObject> {
    log::info!("Loading DICOM file: {}", path.display());
    open_file(path).map_err(|err| {
        let error = ConvertError::Open {
            path: path.to_path_buf(),
            reason: err.to_string(),
        };
        log::error!("{error}");
        error
    })
}

pub(crate) fn frame_stack_from_object(
    object: &DefaultDicomObject,
    path: &Path,
) -> Result<FrameStack> {
    let pixel_error = |reason: String| {
        let error = ConvertError::PixelData {
            path: path.to_path_buf(),
            reason,
        };
        log::error!("{error}");
        error
    };

    let no_frames = || {
        let error = ConvertError::NoFrames {
            path: path.to_path_buf(),
        };
        log::error!("{error}");
        error
    };

    let has_samples = object
        .element_opt(tags::PIXEL_DATA)
        .ok()
        .flatten()
        .is_some_and(|pixel_data| !pixel_data.is_empty());
    if !has_samples {
        return Err(no_frames());
    }

    let decoded = object
        .decode_pixel_data()
        .map_err(|err| pixel_error(err.to_string()))?;
    let frames = FrameImagePipeline::grayscale_frames(&decoded).map_err(pixel_error)?;

    if frames.is_empty() {
        return Err(no_frames());
    }

    let stack = FrameStack::from_frames(frames)?;
    let (count, width, height) = stack.shape();
    log::info!(
        "Decoded {count} frame(s) of {width}x{height} from {}",
        path.display()
    );
    Ok(stack)
}
