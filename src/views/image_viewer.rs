use iced::widget::image::Handle;
use iced::widget::{text, Image};
use iced::{Element, Length};
use image::GrayImage;

use crate::message::Message;

pub fn frame_preview(handle: Option<&Handle>) -> Element<'static, Message> {
    match handle {
        Some(handle) => Image::new(handle.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        None => text("Load a file to preview its first frame").into(),
    }
}

pub fn preview_handle(frame: &GrayImage) -> Handle {
    let rgba = frame
        .as_raw()
        .iter()
        .flat_map(|&value| [value, value, value, u8::MAX])
        .collect::<Vec<u8>>();
    Handle::from_rgba(frame.width(), frame.height(), rgba)
}
