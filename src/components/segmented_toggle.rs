use iced::border::{Border, Radius};
use iced::widget::button::Status;
use iced::widget::text::Wrapping;
use iced::widget::{button, container, text, Container, Row};
use iced::{Alignment, Background, Color, Element, Length, Shadow, Theme};
use willowbend::OutputFormat;

use crate::message::Message;

/// Pill-shaped AVI / MP4 switch. Disabled while `enabled` is false.
pub fn output_format_toggle(current: OutputFormat, enabled: bool) -> Container<'static, Message> {
    let last = OutputFormat::ALL.len() - 1;
    let segments = OutputFormat::ALL
        .into_iter()
        .enumerate()
        .map(|(index, format)| {
            let edge = match index {
                0 => Edge::Leading,
                i if i == last => Edge::Trailing,
                _ => Edge::Inner,
            };
            Element::from(segment(format, current, edge, enabled).width(Length::FillPortion(1)))
        });

    container(Row::with_children(segments))
        .padding(3)
        .width(Length::Fixed(180.0))
        .style(track_style)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Leading,
    Inner,
    Trailing,
}

fn segment(
    format: OutputFormat,
    current: OutputFormat,
    edge: Edge,
    enabled: bool,
) -> button::Button<'static, Message> {
    let selected = format == current;
    let label = container(text(format.to_string()).size(14).wrapping(Wrapping::None))
        .width(Length::Fill)
        .height(Length::Fixed(30.0))
        .align_x(Alignment::Center)
        .align_y(Alignment::Center);

    button(label)
        .padding(0)
        .on_press_maybe(enabled.then_some(Message::SetOutputFormat(format)))
        .style(move |theme, status| segment_style(theme, status, selected, edge))
}

fn track_style(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(Background::Color(palette.background.strong.color)),
        border: Border {
            color: palette.background.strong.color.scale_alpha(0.6),
            width: 1.0,
            radius: Radius::new(999.0),
        },
        ..Default::default()
    }
}

fn segment_style(theme: &Theme, status: Status, selected: bool, edge: Edge) -> button::Style {
    let palette = theme.extended_palette();
    let (pair, idle) = if selected {
        (palette.primary.strong, 1.0)
    } else {
        (palette.background.strong, 0.4)
    };

    let background = match status {
        Status::Active => pair.color.scale_alpha(idle),
        Status::Hovered if selected => palette.primary.base.color,
        Status::Hovered => palette.background.base.color.scale_alpha(0.8),
        Status::Pressed => pair.color.scale_alpha(0.9),
        Status::Disabled => pair.color.scale_alpha(idle * 0.5),
    };

    let text_color = if selected {
        palette.primary.strong.text
    } else {
        palette.background.base.text
    };

    let (outer, inner) = (999.0, 10.0);
    let radius = match edge {
        Edge::Leading => Radius {
            top_left: outer,
            top_right: inner,
            bottom_right: inner,
            bottom_left: outer,
        },
        Edge::Inner => Radius::new(inner),
        Edge::Trailing => Radius {
            top_left: inner,
            top_right: outer,
            bottom_right: outer,
            bottom_left: inner,
        },
    };

    button::Style {
        background: Some(Background::Color(background)),
        text_color,
        border: Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius,
        },
        shadow: Shadow::default(),
    }
}
