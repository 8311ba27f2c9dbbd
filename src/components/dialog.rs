use iced::Task;
use rfd::{AsyncMessageDialog, MessageButtons, MessageLevel};
use willowbend::notice::{Notice, Severity};

use crate::message::Message;

/// Shows `notice` in a native modal dialog.
pub fn show_notice(notice: Notice) -> Task<Message> {
    let title = notice.title();
    let description = notice.description();
    let level = match notice.severity() {
        Severity::Info => MessageLevel::Info,
        Severity::Warning => {
            log::warn!("{title}: {description}");
            MessageLevel::Warning
        }
    };

    Task::perform(
        async move {
            AsyncMessageDialog::new()
                .set_level(level)
                .set_title(title)
                .set_description(description)
                .set_buttons(MessageButtons::Ok)
                .show()
                .await
        },
        |_| Message::DialogClosed,
    )
}
