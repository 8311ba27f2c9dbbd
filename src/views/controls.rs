use iced::widget::{button, column, container, pick_list, row, text, text_input};
use iced::{Alignment, Element, Length};
use willowbend::{ConversionSettings, EnhancementMode};

use crate::components::output_format_toggle;
use crate::message::Message;

/// Action buttons and conversion settings. Every control is inert while
/// `busy` is set.
pub fn controls<'a>(
    clip_limit: &'a str,
    settings: &ConversionSettings,
    busy: bool,
) -> Element<'a, Message> {
    let action = |label: &'static str, message: Message| {
        button(container(text(label)).width(Length::Fill).align_x(Alignment::Center))
            .width(Length::Fixed(110.0))
            .on_press_maybe((!busy).then_some(message))
    };

    let actions = row![
        action("Browse", Message::Browse),
        action("Load", Message::Load),
        action("Convert", Message::Convert),
        action("About", Message::About),
        action("Exit", Message::Exit),
    ]
    .spacing(12);

    let mut clip_input = text_input("1.5", clip_limit).width(Length::Fixed(80.0));
    if !busy {
        clip_input = clip_input.on_input(Message::ClipLimitChanged);
    }

    // A pick list cannot be disabled, so a busy form shows an inert button
    // carrying the current choice instead.
    let enhancement: Element<'a, Message> = if busy {
        button(text(settings.enhancement.to_string()))
            .width(Length::Fixed(120.0))
            .into()
    } else {
        pick_list(
            EnhancementMode::ALL,
            Some(settings.enhancement),
            Message::EnhancementSelected,
        )
        .width(Length::Fixed(120.0))
        .into()
    };

    let options = row![
        text("Clip limit"),
        clip_input,
        text("Enhancement"),
        enhancement,
        text("Format"),
        output_format_toggle(settings.output_format, !busy),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    column![actions, options].spacing(16).into()
}
