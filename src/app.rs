use std::path::PathBuf;

use iced::widget::image::Handle;
use iced::widget::{column, container, row};
use iced::{application, Alignment, Element, Length, Size, Task, Theme};
use rfd::AsyncFileDialog;
use willowbend::model::{read_metadata, Session, StudyMetadata};
use willowbend::notice::{Notice, PRODUCT_NAME};
use willowbend::settings::DEFAULT_CLIP_LIMIT;
use willowbend::{convert_file, load_file, parse_clip_limit, ConversionSettings, ConvertError};

use crate::components::show_notice;
use crate::message::Message;
use crate::views::{controls, frame_preview, metadata_panel, preview_handle};

pub fn run() -> iced::Result {
    application(PRODUCT_NAME, App::update, App::view)
        .theme(App::theme)
        .window_size(Size::new(980.0, 640.0))
        .run()
}

pub struct App {
    session: Session,
    clip_limit_input: String,
    settings: ConversionSettings,
    /// Settings captured when Convert was pressed, held until the run ends.
    in_flight: Option<ConversionSettings>,
    busy: bool,
    preview: Option<Handle>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            session: Session::default(),
            clip_limit_input: DEFAULT_CLIP_LIMIT.to_string(),
            settings: ConversionSettings::default(),
            in_flight: None,
            busy: false,
            preview: None,
        }
    }
}

impl App {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Browse => {
                self.busy = true;
                Task::perform(pick_dicom_files(), Message::Selected)
            }
            Message::Selected(selection) => {
                self.busy = false;
                self.preview = None;
                match selection {
                    Some((paths, Ok(metadata))) => {
                        self.session.select(paths, metadata);
                        Task::none()
                    }
                    Some((_, Err(err))) => {
                        self.session.clear();
                        show_notice(Notice::PreviewFailed(err.to_string()))
                    }
                    None => {
                        log::info!("File selection cancelled");
                        self.session.clear();
                        Task::none()
                    }
                }
            }
            Message::Load => {
                if self.session.is_empty() {
                    return show_notice(Notice::NoFile);
                }

                self.busy = true;
                let paths = self.session.paths();
                Task::perform(
                    async move { paths.iter().map(|path| load_file(path)).collect::<Vec<_>>() },
                    Message::Loaded,
                )
            }
            Message::Loaded(results) => {
                self.busy = false;
                match self.session.apply_load(results) {
                    Ok(count) => {
                        self.preview = self
                            .session
                            .loaded_files()
                            .first()
                            .and_then(|file| file.frames.first().map(preview_handle));
                        show_notice(Notice::FileLoaded { count })
                    }
                    Err(errors) => show_notice(Notice::LoadFailed(
                        errors.iter().map(ToString::to_string).collect(),
                    )),
                }
            }
            Message::Convert => {
                if let Err(blocker) = self.session.ready_to_convert() {
                    return show_notice(blocker.into());
                }
                let clip_limit = match parse_clip_limit(&self.clip_limit_input) {
                    Ok(clip_limit) => clip_limit,
                    Err(_) => {
                        return show_notice(Notice::InvalidClipLimit(
                            self.clip_limit_input.trim().to_string(),
                        ))
                    }
                };

                self.busy = true;
                self.in_flight = Some(ConversionSettings {
                    clip_limit,
                    ..self.settings.clone()
                });
                Task::perform(
                    async {
                        AsyncFileDialog::new()
                            .set_title("Choose output directory")
                            .pick_folder()
                            .await
                            .map(|handle| handle.path().to_path_buf())
                    },
                    Message::DirectoryPicked,
                )
            }
            Message::DirectoryPicked(None) => {
                self.busy = false;
                self.in_flight = None;
                show_notice(Notice::NoDirectory)
            }
            Message::DirectoryPicked(Some(directory)) => {
                let Some(settings) = self.in_flight.clone() else {
                    self.busy = false;
                    return Task::none();
                };

                let files = self.session.loaded_files();
                log::info!(
                    "Converting {} file(s) to {} in {}",
                    files.len(),
                    settings.output_format,
                    directory.display()
                );
                Task::perform(
                    async move {
                        files
                            .iter()
                            .map(|file| {
                                let result = convert_file(file, &settings, &directory);
                                (file.path.clone(), result)
                            })
                            .collect::<Vec<_>>()
                    },
                    Message::Converted,
                )
            }
            Message::Converted(results) => {
                self.busy = false;
                let format = self
                    .in_flight
                    .take()
                    .map_or(self.settings.output_format, |settings| settings.output_format);
                let converted = self.session.apply_conversion(&results);
                let failures = results
                    .iter()
                    .filter_map(|(_, result)| result.as_ref().err().map(ToString::to_string))
                    .collect();

                show_notice(Notice::Converted {
                    format,
                    converted,
                    failures,
                })
            }
            // Settings are frozen while a dialog, load, or conversion runs.
            Message::ClipLimitChanged(_)
            | Message::SetOutputFormat(_)
            | Message::EnhancementSelected(_)
                if self.busy =>
            {
                Task::none()
            }
            Message::ClipLimitChanged(input) => {
                self.clip_limit_input = input;
                Task::none()
            }
            Message::SetOutputFormat(format) => {
                self.settings.output_format = format;
                Task::none()
            }
            Message::EnhancementSelected(mode) => {
                self.settings.enhancement = mode;
                Task::none()
            }
            Message::About => show_notice(Notice::About),
            Message::Exit => iced::exit(),
            Message::DialogClosed => Task::none(),
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let controls = controls(&self.clip_limit_input, &self.settings, self.busy);

        let details = container(metadata_panel(&self.session))
            .padding(16)
            .width(Length::FillPortion(3))
            .height(Length::Fill);

        let preview = container(frame_preview(self.preview.as_ref()))
            .padding(16)
            .width(Length::FillPortion(2))
            .height(Length::Fill)
            .align_x(Alignment::Center)
            .align_y(Alignment::Center);

        column![controls, row![details, preview].spacing(16)]
            .padding(20)
            .spacing(20)
            .align_x(Alignment::Start)
            .into()
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Multi-select open dialog. The first pick's metadata is read for the form.
async fn pick_dicom_files() -> Option<(Vec<PathBuf>, Result<StudyMetadata, ConvertError>)> {
    let handles = AsyncFileDialog::new()
        .set_title("Select DICOM files")
        .add_filter("DICOM files", &["dcm", "DCM"])
        .add_filter("All files", &["*"])
        .pick_files()
        .await?;
    let paths: Vec<PathBuf> = handles
        .iter()
        .map(|handle| handle.path().to_path_buf())
        .collect();
    let preview = read_metadata(paths.first()?);
    Some((paths, preview))
}

#[cfg(test)]
mod tests {
    use willowbend::{EnhancementMode, OutputFormat};

    use super::*;

    #[test]
    fn settings_are_frozen_while_busy() {
        let mut app = App {
            busy: true,
            ..App::default()
        };
        let _ = app.update(Message::EnhancementSelected(EnhancementMode::Global));
        let _ = app.update(Message::SetOutputFormat(OutputFormat::Mp4));
        let _ = app.update(Message::ClipLimitChanged("4".into()));
        assert_eq!(app.settings, ConversionSettings::default());
        assert_eq!(app.clip_limit_input, DEFAULT_CLIP_LIMIT.to_string());

        app.busy = false;
        let _ = app.update(Message::EnhancementSelected(EnhancementMode::Global));
        assert_eq!(app.settings.enhancement, EnhancementMode::Global);
    }

    #[test]
    fn failed_preview_clears_selection() {
        let mut app = App::default();
        app.session
            .select(vec![PathBuf::from("a.dcm")], StudyMetadata::default());
        let err = ConvertError::Open {
            path: PathBuf::from("b.dcm"),
            reason: "not a DICOM file".into(),
        };

        let _ = app.update(Message::Selected(Some((vec![PathBuf::from("b.dcm")], Err(err)))));

        assert!(app.session.is_empty());
        assert!(!app.busy);
    }
}
