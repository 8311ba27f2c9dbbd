//! User-facing outcome messages shared by the window and the CLI.

use crate::model::ConvertBlocker;
use crate::video::OutputFormat;

pub const PRODUCT_NAME: &str = "Willowbend DICOM";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    NoFile,
    /// The first selected file could not be read for the study form.
    PreviewFailed(String),
    FileLoaded {
        count: usize,
    },
    LoadFailed(Vec<String>),
    NoFileToConvert,
    NoFileLoaded,
    InvalidClipLimit(String),
    NoDirectory,
    Converted {
        format: OutputFormat,
        converted: usize,
        failures: Vec<String>,
    },
    About,
}

impl Notice {
    pub fn title(&self) -> String {
        match self {
            Notice::NoFile => "No File".into(),
            Notice::PreviewFailed(_) => "Cannot Show File Details".into(),
            Notice::FileLoaded { .. } => "DICOM File Loaded".into(),
            Notice::LoadFailed(_) => "File Loading Failed".into(),
            Notice::NoFileToConvert => "No File to be Converted".into(),
            Notice::NoFileLoaded => "No File Loaded".into(),
            Notice::InvalidClipLimit(_) => "Invalid Clip Limit".into(),
            Notice::NoDirectory => "No Directory".into(),
            Notice::Converted { .. } => "Video File Converted".into(),
            Notice::About => format!("About {PRODUCT_NAME}"),
        }
    }

    pub fn description(&self) -> String {
        match self {
            Notice::NoFile => "Sorry, no file loaded! Please choose DICOM file first.".into(),
            Notice::PreviewFailed(reason) => format!(
                "Sorry, the selected file's details cannot be shown. \
                 Nothing was loaded; please choose another file.\n\n{reason}"
            ),
            Notice::FileLoaded { count: 1 } => "DICOM file successfully loaded!".into(),
            Notice::FileLoaded { count } => format!("{count} DICOM files successfully loaded!"),
            Notice::LoadFailed(failures) => format!(
                "Sorry, file loading failed! Please check the file format.\n\n{}",
                failures.join("\n")
            ),
            Notice::NoFileToConvert => {
                "Sorry, no file to be converted! Please choose a DICOM file first.".into()
            }
            Notice::NoFileLoaded => {
                "Sorry, no file loaded! Please load the chosen DICOM file.".into()
            }
            Notice::InvalidClipLimit(input) => {
                format!("`{input}` is not a valid clip limit. Please enter a non-negative number.")
            }
            Notice::NoDirectory => {
                "Sorry, no directory shown! Please specify the output directory.".into()
            }
            Notice::Converted {
                format,
                converted,
                failures,
            } => {
                if failures.is_empty() {
                    format!("{format} video(s) successfully converted!")
                } else {
                    format!(
                        "{converted} {format} video(s) converted, {} failed:\n\n{}",
                        failures.len(),
                        failures.join("\n")
                    )
                }
            }
            Notice::About => format!(
                "{PRODUCT_NAME} Version {}\nConverts DICOM cine loops into AVI or MP4 video.",
                env!("CARGO_PKG_VERSION")
            ),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Notice::FileLoaded { .. } | Notice::About => Severity::Info,
            Notice::Converted { failures, .. } if failures.is_empty() => Severity::Info,
            _ => Severity::Warning,
        }
    }
}

impl From<ConvertBlocker> for Notice {
    fn from(blocker: ConvertBlocker) -> Self {
        match blocker {
            ConvertBlocker::NoSelection => Notice::NoFileToConvert,
            ConvertBlocker::NotLoaded => Notice::NoFileLoaded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blockers_map_to_convert_warnings() {
        let notice = Notice::from(ConvertBlocker::NotLoaded);
        assert_eq!(notice.title(), "No File Loaded");
        assert_eq!(notice.severity(), Severity::Warning);
        assert_eq!(
            Notice::from(ConvertBlocker::NoSelection).title(),
            "No File to be Converted"
        );
    }

    #[test]
    fn preview_failure_is_not_a_load_failure() {
        let notice = Notice::PreviewFailed("a.dcm: failed to open DICOM file".into());
        assert_eq!(notice.title(), "Cannot Show File Details");
        assert_ne!(notice.title(), Notice::LoadFailed(Vec::new()).title());
        assert!(notice.description().contains("a.dcm"));
        assert_eq!(notice.severity(), Severity::Warning);
    }

    #[test]
    fn conversion_summary_names_the_format() {
        let notice = Notice::Converted {
            format: OutputFormat::Mp4,
            converted: 2,
            failures: Vec::new(),
        };
        assert_eq!(notice.description(), "MP4 video(s) successfully converted!");
        assert_eq!(notice.severity(), Severity::Info);
    }

    #[test]
    fn partial_conversion_lists_failures() {
        let notice = Notice::Converted {
            format: OutputFormat::Avi,
            converted: 1,
            failures: vec!["b.dcm: no frames to process".into()],
        };
        let description = notice.description();
        assert!(description.starts_with("1 AVI video(s) converted, 1 failed"));
        assert!(description.contains("b.dcm"));
        assert_eq!(notice.severity(), Severity::Warning);
    }
}
