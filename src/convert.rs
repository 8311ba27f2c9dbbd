use std::path::{Path, PathBuf};

use crate::enhance::enhance_stack;
use crate::error::Result;
use crate::model::loader::{frame_stack_from_object, open_dicom};
use crate::model::{FrameStack, StudyMetadata};
use crate::settings::ConversionSettings;
use crate::video::{write_video, OutputFormat, VideoSummary};

/// A DICOM file whose metadata and frames are held in memory, ready to
/// convert.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub metadata: StudyMetadata,
    pub frames: FrameStack,
}

pub fn load_file(path: &Path) -> Result<LoadedFile> {
    let object = open_dicom(path)?;
    let metadata = StudyMetadata::from_object(&object);
    let frames = frame_stack_from_object(&object, path)?;

    if metadata.number_of_frames as usize != frames.len() {
        log::warn!(
            "{} declares {} frame(s) but {} were decoded",
            path.display(),
            metadata.number_of_frames,
            frames.len()
        );
    }

    Ok(LoadedFile {
        path: path.to_path_buf(),
        metadata,
        frames,
    })
}

/// `<directory>/<input stem>.<format extension>`
pub fn output_path_for(input: &Path, directory: &Path, format: OutputFormat) -> PathBuf {
    let mut name = input
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_else(|| "output".into());
    name.push(".");
    name.push(format.extension());
    directory.join(name)
}

pub fn convert_file(
    loaded: &LoadedFile,
    settings: &ConversionSettings,
    directory: &Path,
) -> Result<VideoSummary> {
    let output = output_path_for(&loaded.path, directory, settings.output_format);
    let enhanced = enhance_stack(&loaded.frames, settings.enhancement())?;
    let fps = settings.frame_rate_for(&loaded.metadata);

    let summary = write_video(
        &enhanced,
        &output,
        settings.output_format,
        fps,
        settings.jpeg_quality,
    )?;
    log::info!(
        "Converted {} into {} ({} frame(s))",
        loaded.path.display(),
        summary.path.display(),
        summary.frames
    );
    Ok(summary)
}
