#![allow(dead_code)]

use std::path::{Path, PathBuf};

use dicom::core::{DataElement, PrimitiveValue, Tag, VR};
use dicom::dictionary_std::{tags, uids};
use dicom::object::{FileMetaTableBuilder, InMemDicomObject};
use ffmpeg_next::{self as ffmpeg};

pub const ROWS: u16 = 16;
pub const COLUMNS: u16 = 24;

const SOP_CLASS: &str = uids::MULTI_FRAME_GRAYSCALE_BYTE_SECONDARY_CAPTURE_IMAGE_STORAGE;
const SOP_INSTANCE: &str = "2.25.1001";

fn element(tag: Tag, vr: VR, value: impl Into<PrimitiveValue>) -> DataElement<InMemDicomObject> {
    DataElement::new(tag, vr, value.into())
}

/// Image Pixel module of a fixture file.
pub struct Pixels {
    pub rows: u16,
    pub columns: u16,
    pub frames: usize,
    pub photometric: &'static str,
    pub samples_per_pixel: u16,
    pub bits_allocated: u16,
    pub vr: VR,
    pub data: PrimitiveValue,
}

impl Pixels {
    /// 8-bit single-sample frames of `rows` x `columns`.
    pub fn gray8(rows: u16, columns: u16, photometric: &'static str, data: Vec<u8>) -> Self {
        let frame_len = usize::from(rows) * usize::from(columns);
        Self {
            rows,
            columns,
            frames: data.len() / frame_len.max(1),
            photometric,
            samples_per_pixel: 1,
            bits_allocated: 8,
            vr: VR::OB,
            data: PrimitiveValue::from(data),
        }
    }
}

/// Writes an 8-bit MONOCHROME2 cine file where frame `i` is filled with
/// `levels[i]`.
pub fn write_cine(dir: &Path, name: &str, levels: &[u8], cine_rate: Option<u32>) -> PathBuf {
    let pixels = Pixels::gray8(ROWS, COLUMNS, "MONOCHROME2", filled(levels));
    write_fixture(dir, name, pixels, cine_rate)
}

/// Single-frame MONOCHROME1 image of `rows` x `columns` holding `samples`.
pub fn write_monochrome1(
    dir: &Path,
    name: &str,
    rows: u16,
    columns: u16,
    samples: &[u8],
) -> PathBuf {
    let pixels = Pixels::gray8(rows, columns, "MONOCHROME1", samples.to_vec());
    write_fixture(dir, name, pixels, None)
}

/// 16-bit MONOCHROME2 cine where frame `i` is filled with `levels[i]`.
pub fn write_wide_cine(dir: &Path, name: &str, levels: &[u16]) -> PathBuf {
    let frame_len = usize::from(ROWS) * usize::from(COLUMNS);
    let samples: Vec<u16> = levels
        .iter()
        .flat_map(|&level| std::iter::repeat(level).take(frame_len))
        .collect();
    let pixels = Pixels {
        rows: ROWS,
        columns: COLUMNS,
        frames: levels.len(),
        photometric: "MONOCHROME2",
        samples_per_pixel: 1,
        bits_allocated: 16,
        vr: VR::OW,
        data: PrimitiveValue::U16(samples.into()),
    };
    write_fixture(dir, name, pixels, None)
}

/// Single-row interleaved RGB image, one pixel per entry of `colors`.
pub fn write_rgb(dir: &Path, name: &str, colors: &[[u8; 3]]) -> PathBuf {
    let pixels = Pixels {
        rows: 1,
        columns: colors.len() as u16,
        frames: 1,
        photometric: "RGB",
        samples_per_pixel: 3,
        bits_allocated: 8,
        vr: VR::OB,
        data: PrimitiveValue::from(colors.concat()),
    };
    write_fixture(dir, name, pixels, None)
}

/// A cine that declares zero frames and carries no pixel samples.
pub fn write_empty_cine(dir: &Path, name: &str) -> PathBuf {
    let pixels = Pixels::gray8(ROWS, COLUMNS, "MONOCHROME2", Vec::new());
    write_fixture(dir, name, pixels, None)
}

fn filled(levels: &[u8]) -> Vec<u8> {
    let frame_len = usize::from(ROWS) * usize::from(COLUMNS);
    levels
        .iter()
        .flat_map(|&level| std::iter::repeat(level).take(frame_len))
        .collect()
}

pub fn write_fixture(dir: &Path, name: &str, pixels: Pixels, cine_rate: Option<u32>) -> PathBuf {
    let bits = pixels.bits_allocated;
    let mut object = InMemDicomObject::from_element_iter([
        element(tags::SOP_CLASS_UID, VR::UI, SOP_CLASS),
        element(tags::SOP_INSTANCE_UID, VR::UI, SOP_INSTANCE),
        element(tags::PATIENT_ID, VR::LO, "WB-0042"),
        element(tags::PATIENT_NAME, VR::PN, "Doe^Jane"),
        element(tags::PATIENT_BIRTH_DATE, VR::DA, "19700101"),
        element(tags::PATIENT_SEX, VR::CS, "F"),
        element(tags::STUDY_ID, VR::SH, "ECHO1"),
        element(tags::STUDY_DATE, VR::DA, "20190315"),
        element(tags::STUDY_TIME, VR::TM, "101500"),
        element(tags::INSTITUTION_NAME, VR::LO, "Willowbend Clinic"),
        element(tags::MANUFACTURER, VR::LO, "Acme Imaging"),
        element(tags::NUMBER_OF_FRAMES, VR::IS, pixels.frames.to_string()),
        element(tags::SAMPLES_PER_PIXEL, VR::US, pixels.samples_per_pixel),
        element(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, pixels.photometric),
        element(tags::ROWS, VR::US, pixels.rows),
        element(tags::COLUMNS, VR::US, pixels.columns),
        element(tags::BITS_ALLOCATED, VR::US, bits),
        element(tags::BITS_STORED, VR::US, bits),
        element(tags::HIGH_BIT, VR::US, bits - 1),
        element(tags::PIXEL_REPRESENTATION, VR::US, 0_u16),
        element(tags::PIXEL_DATA, pixels.vr, pixels.data),
    ]);
    if pixels.samples_per_pixel > 1 {
        object.put(element(tags::PLANAR_CONFIGURATION, VR::US, 0_u16));
    }
    if let Some(rate) = cine_rate {
        object.put(element(tags::CINE_RATE, VR::IS, rate.to_string()));
    }

    let path = dir.join(name);
    object
        .with_meta(
            FileMetaTableBuilder::new()
                .media_storage_sop_class_uid(SOP_CLASS)
                .media_storage_sop_instance_uid(SOP_INSTANCE)
                .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN),
        )
        .expect("fixture meta table")
        .write_to_file(&path)
        .expect("fixture written");
    path
}

pub fn find(bytes: &[u8], needle: &[u8]) -> Option<usize> {
    bytes.windows(needle.len()).position(|window| window == needle)
}

/// A video read back through FFmpeg.
pub struct DecodedVideo {
    pub codec: ffmpeg::codec::Id,
    pub width: u32,
    pub height: u32,
    /// Mean luma of each decoded frame, in presentation order.
    pub frame_means: Vec<f64>,
}

pub fn decode_video(path: &Path) -> DecodedVideo {
    ffmpeg::init().expect("ffmpeg initialises");
    let mut input = ffmpeg::format::input(&path).expect("video opens");
    let stream = input
        .streams()
        .best(ffmpeg::media::Type::Video)
        .expect("video stream");
    let stream_index = stream.index();
    let context = ffmpeg::codec::Context::from_parameters(stream.parameters()).unwrap();
    let codec = context.id();
    let mut decoder = context.decoder().video().expect("video decoder");

    let mut frame_means = Vec::new();
    for (stream, packet) in input.packets() {
        if stream.index() == stream_index {
            decoder.send_packet(&packet).unwrap();
            drain_frames(&mut decoder, &mut frame_means);
        }
    }
    decoder.send_eof().unwrap();
    drain_frames(&mut decoder, &mut frame_means);

    DecodedVideo {
        codec,
        width: decoder.width(),
        height: decoder.height(),
        frame_means,
    }
}

fn drain_frames(decoder: &mut ffmpeg::decoder::Video, frame_means: &mut Vec<f64>) {
    let mut frame = ffmpeg::frame::Video::empty();
    while decoder.receive_frame(&mut frame).is_ok() {
        frame_means.push(mean_luma(&frame));
    }
}

/// Mean of the luma plane, which is plane 0 for every YUV layout.
fn mean_luma(frame: &ffmpeg::frame::Video) -> f64 {
    let (width, height) = (frame.width() as usize, frame.height() as usize);
    let stride = frame.stride(0);
    let total: u64 = frame
        .data(0)
        .chunks(stride)
        .take(height)
        .flat_map(|row| &row[..width])
        .map(|&value| u64::from(value))
        .sum();
    total as f64 / (width * height) as f64
}
