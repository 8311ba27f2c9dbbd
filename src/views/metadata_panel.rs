use iced::widget::text::Wrapping;
use iced::widget::{column, row, scrollable, text, Column};
use iced::{Element, Length};
use willowbend::model::{FileStatus, Session};

use crate::message::Message;

/// Study fields of the first selected file, followed by the selection list.
pub fn metadata_panel(session: &Session) -> Element<'_, Message> {
    let Some(preview) = session.preview() else {
        return text("Browse for DICOM files to see their study details").into();
    };

    let form = preview
        .rows()
        .into_iter()
        .fold(Column::new().spacing(6), |form, (label, value)| {
            form.push(
                row![
                    text(label).width(Length::FillPortion(2)),
                    text(value)
                        .width(Length::FillPortion(3))
                        .wrapping(Wrapping::Word),
                ]
                .spacing(12),
            )
        });

    let files = session.jobs().iter().fold(Column::new().spacing(4), |files, job| {
        let status = match &job.status {
            FileStatus::Selected => String::from("selected"),
            FileStatus::Loaded(loaded) => {
                let (frames, width, height) = loaded.frames.shape();
                format!("loaded, {frames} frame(s) at {width}x{height}")
            }
            FileStatus::Converted { output } => format!("converted to {}", output.display()),
        };
        files.push(
            row![
                text(job.file_name()).width(Length::FillPortion(2)),
                text(status)
                    .width(Length::FillPortion(3))
                    .wrapping(Wrapping::Word),
            ]
            .spacing(12),
        )
    });

    column![
        form,
        text(format!("{} file(s) selected", session.len())).size(16),
        scrollable(files).height(Length::Fill),
    ]
    .spacing(16)
    .into()
}
