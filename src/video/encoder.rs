use std::path::Path;

use ffmpeg_next::{self as ffmpeg};
use image::GrayImage;

use super::{FrameRate, OutputFormat};
use crate::error::{ConvertError, Result};

/// Largest frame side a baseline JPEG header can describe.
const MAX_JPEG_DIMENSION: u32 = u16::MAX as u32;

/// Encodes grayscale frames to Motion JPEG and muxes them into an AVI or
/// MP4 file using FFmpeg.
pub struct VideoEncoder {
    output: ffmpeg::format::context::Output,
    video_encoder: ffmpeg::codec::encoder::video::Encoder,
    time_base: ffmpeg::Rational,
    frame_index: i64,

    raw_frame: ffmpeg::frame::Video,
    yuv_frame: ffmpeg::frame::Video,
    scaling_context: ffmpeg::software::scaling::Context,
}

impl VideoEncoder {
    /// Opens `path` for writing and writes the container header.
    pub fn new(
        path: &Path,
        width: u32,
        height: u32,
        format: OutputFormat,
        frame_rate: FrameRate,
        quality: u8,
    ) -> Result<Self> {
        if width > MAX_JPEG_DIMENSION || height > MAX_JPEG_DIMENSION {
            return Err(ConvertError::Encode(format!(
                "{width}x{height} frames exceed the Motion JPEG limit of \
                 {MAX_JPEG_DIMENSION} pixels per side"
            )));
        }

        ffmpeg::init()?;
        ffmpeg::util::log::set_level(ffmpeg::util::log::Level::Error);

        let mut options = ffmpeg::Dictionary::new();
        if format == OutputFormat::Mp4 {
            options.set("movflags", "faststart");
        }
        let mut output = ffmpeg::format::output_as_with(path, format.container(), options)?;
        let global_header = output
            .format()
            .flags()
            .contains(ffmpeg::format::Flags::GLOBAL_HEADER);

        let codec = ffmpeg::codec::encoder::find(format.codec_id())
            .ok_or(ffmpeg::Error::EncoderNotFound)?;
        let context = ffmpeg::codec::Context::new_with_codec(codec);
        let mut video_encoder = context.encoder().video()?;

        let time_base = frame_rate.time_base();
        video_encoder.set_width(width);
        video_encoder.set_height(height);
        video_encoder.set_format(ffmpeg::format::Pixel::YUVJ420P);
        video_encoder.set_time_base(time_base);
        video_encoder.set_frame_rate(Some(frame_rate.rational()));
        if global_header {
            video_encoder.set_flags(ffmpeg::codec::Flags::GLOBAL_HEADER);
        }

        let encoder = video_encoder.open_as_with(codec, encoder_options(quality))?;
        let parameters = ffmpeg::codec::Parameters::from(&encoder);

        let mut output_stream = output.add_stream(codec)?;
        output_stream.set_parameters(parameters);
        output_stream.set_time_base(time_base);

        output.write_header()?;

        let raw_frame = ffmpeg::frame::Video::new(ffmpeg::format::Pixel::GRAY8, width, height);
        let yuv_frame = ffmpeg::frame::Video::new(ffmpeg::format::Pixel::YUVJ420P, width, height);
        let scaling_context = ffmpeg::software::scaling::Context::get(
            raw_frame.format(),
            width,
            height,
            yuv_frame.format(),
            width,
            height,
            ffmpeg::software::scaling::Flags::POINT,
        )?;

        Ok(Self {
            output,
            video_encoder: encoder,
            time_base,
            frame_index: 0,
            raw_frame,
            yuv_frame,
            scaling_context,
        })
    }

    /// Encodes the next frame. Each frame is shown for one frame interval.
    pub fn add_frame(&mut self, frame: &GrayImage) -> Result<()> {
        if frame.width() != self.raw_frame.width() || frame.height() != self.raw_frame.height() {
            return Err(ConvertError::Encode(format!(
                "frame is {}x{}, encoder expects {}x{}",
                frame.width(),
                frame.height(),
                self.raw_frame.width(),
                self.raw_frame.height()
            )));
        }

        self.update_raw_frame(frame);
        self.scaling_context.run(&self.raw_frame, &mut self.yuv_frame)?;

        self.yuv_frame.set_pts(Some(self.frame_index));
        self.frame_index += 1;

        self.video_encoder.send_frame(&self.yuv_frame)?;
        self.flush_packets_to_output()
    }

    /// Copies pixel rows into the raw frame, respecting its line stride.
    fn update_raw_frame(&mut self, frame: &GrayImage) {
        let row_size = frame.width() as usize;
        let stride = self.raw_frame.stride(0);
        let dst = self.raw_frame.data_mut(0);

        if row_size == stride {
            dst[..frame.as_raw().len()].copy_from_slice(frame.as_raw());
        } else {
            for (src_row, dst_row) in frame
                .as_raw()
                .chunks_exact(row_size)
                .zip(dst.chunks_mut(stride))
            {
                dst_row[..row_size].copy_from_slice(src_row);
            }
        }
    }

    /// Drains the encoder and writes the container trailer.
    pub fn finish(&mut self) -> Result<()> {
        self.video_encoder.send_eof()?;
        self.flush_packets_to_output()?;
        self.output.write_trailer()?;
        Ok(())
    }

    fn flush_packets_to_output(&mut self) -> Result<()> {
        let stream_time_base = self
            .output
            .stream(0)
            .map_or(self.time_base, |stream| stream.time_base());
        let mut packet = ffmpeg::Packet::empty();

        while self.video_encoder.receive_packet(&mut packet).is_ok() {
            packet.set_stream(0);
            packet.rescale_ts(self.time_base, stream_time_base);
            packet.write_interleaved(&mut self.output)?;
        }

        Ok(())
    }
}

/// Pins the quantiser so every frame gets the same JPEG quality.
fn encoder_options(quality: u8) -> ffmpeg::Dictionary<'static> {
    let qscale = quality_to_qscale(quality).to_string();
    let mut opts = ffmpeg::Dictionary::new();
    opts.set("qmin", &qscale);
    opts.set("qmax", &qscale);
    opts
}

/// Maps JPEG quality 1..=100 onto FFmpeg's qscale 31..=2 (lower is finer).
fn quality_to_qscale(quality: u8) -> u32 {
    let quality = u32::from(quality.clamp(1, 100));
    2 + (100 - quality) * 29 / 99
}
