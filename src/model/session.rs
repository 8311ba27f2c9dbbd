use std::path::PathBuf;
use std::sync::Arc;

use crate::convert::LoadedFile;
use crate::error::{ConvertError, Result};
use crate::model::StudyMetadata;
use crate::video::VideoSummary;

#[derive(Debug, Clone)]
pub enum FileStatus {
    Selected,
    Loaded(Arc<LoadedFile>),
    Converted { output: PathBuf },
}

#[derive(Debug, Clone)]
pub struct FileJob {
    pub path: PathBuf,
    pub status: FileStatus,
}

impl FileJob {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.status, FileStatus::Loaded(_))
    }
}

/// Why a conversion cannot start yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertBlocker {
    NoSelection,
    NotLoaded,
}

/// Files picked by the user and how far each has progressed.
#[derive(Debug, Default)]
pub struct Session {
    jobs: Vec<FileJob>,
    preview: Option<StudyMetadata>,
}

impl Session {
    /// Replaces the selection. `preview` describes the first path.
    pub fn select(&mut self, paths: Vec<PathBuf>, preview: StudyMetadata) {
        log::info!("Selected {} file(s)", paths.len());
        self.jobs = paths
            .into_iter()
            .map(|path| FileJob {
                path,
                status: FileStatus::Selected,
            })
            .collect();
        self.preview = Some(preview);
    }

    pub fn clear(&mut self) {
        self.jobs.clear();
        self.preview = None;
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn jobs(&self) -> &[FileJob] {
        &self.jobs
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.jobs.iter().map(|job| job.path.clone()).collect()
    }

    pub fn preview(&self) -> Option<&StudyMetadata> {
        self.preview.as_ref()
    }

    /// Commits a load batch only if every file in it loaded. On failure the
    /// session is left as it was and the errors are returned.
    pub fn apply_load(
        &mut self,
        results: Vec<Result<LoadedFile>>,
    ) -> Result<usize, Vec<ConvertError>> {
        let mut loaded = Vec::with_capacity(results.len());
        let mut errors = Vec::new();
        for result in results {
            match result {
                Ok(file) => loaded.push(file),
                Err(err) => errors.push(err),
            }
        }

        if !errors.is_empty() {
            log::warn!("Load batch rejected: {} file(s) failed", errors.len());
            return Err(errors);
        }

        let mut committed = 0;
        for file in loaded {
            match self.jobs.iter_mut().find(|job| job.path == file.path) {
                Some(job) => {
                    job.status = FileStatus::Loaded(Arc::new(file));
                    committed += 1;
                }
                None => log::debug!("Dropping stale load of {}", file.path.display()),
            }
        }
        Ok(committed)
    }

    pub fn ready_to_convert(&self) -> Result<usize, ConvertBlocker> {
        if self.jobs.is_empty() {
            return Err(ConvertBlocker::NoSelection);
        }
        match self.jobs.iter().filter(|job| job.is_loaded()).count() {
            0 => Err(ConvertBlocker::NotLoaded),
            count => Ok(count),
        }
    }

    pub fn loaded_files(&self) -> Vec<Arc<LoadedFile>> {
        self.jobs
            .iter()
            .filter_map(|job| match &job.status {
                FileStatus::Loaded(file) => Some(Arc::clone(file)),
                _ => None,
            })
            .collect()
    }

    /// Marks every successfully written file as converted and returns how
    /// many were. Failed files stay loaded.
    pub fn apply_conversion(&mut self, results: &[(PathBuf, Result<VideoSummary>)]) -> usize {
        let mut converted = 0;
        for (path, result) in results {
            let Ok(summary) = result else {
                continue;
            };
            if let Some(job) = self.jobs.iter_mut().find(|job| &job.path == path) {
                job.status = FileStatus::Converted {
                    output: summary.path.clone(),
                };
                converted += 1;
            }
        }
        converted
    }
}
