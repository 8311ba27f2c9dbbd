use std::path::PathBuf;

use willowbend::model::StudyMetadata;
use willowbend::{ConvertError, EnhancementMode, LoadedFile, OutputFormat, VideoSummary};

#[derive(Debug, Clone)]
pub enum Message {
    Browse,
    Selected(Option<(Vec<PathBuf>, Result<StudyMetadata, ConvertError>)>),
    Load,
    Loaded(Vec<Result<LoadedFile, ConvertError>>),
    Convert,
    DirectoryPicked(Option<PathBuf>),
    Converted(Vec<(PathBuf, Result<VideoSummary, ConvertError>)>),
    ClipLimitChanged(String),
    SetOutputFormat(OutputFormat),
    EnhancementSelected(EnhancementMode),
    About,
    Exit,
    DialogClosed,
}
