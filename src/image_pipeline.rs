use dicom::pixeldata::{DecodedPixelData, PhotometricInterpretation};
use image::GrayImage;

/// Turns decoded DICOM pixel data into 8-bit grayscale frames.
pub struct FrameImagePipeline;

impl FrameImagePipeline {
    pub fn grayscale_frames(decoded: &DecodedPixelData<'_>) -> Result<Vec<GrayImage>, String> {
        if decoded.number_of_frames() == 0 {
            return Ok(Vec::new());
        }

        match decoded.photometric_interpretation() {
            photometric if photometric.is_monochrome() && decoded.samples_per_pixel() == 1 => {
                Self::monochrome_frames(decoded)
            }
            other => Self::color_frames(decoded, other.as_str()),
        }
    }

    fn monochrome_frames(decoded: &DecodedPixelData<'_>) -> Result<Vec<GrayImage>, String> {
        let width = decoded.columns();
        let height = decoded.rows();
        let invert = matches!(
            decoded.photometric_interpretation(),
            PhotometricInterpretation::Monochrome1
        );

        if decoded.bits_allocated() <= 8 {
            return (0..decoded.number_of_frames())
                .map(|frame_idx| {
                    let mut samples = decoded
                        .to_vec_frame::<u8>(frame_idx)
                        .map_err(|err| format!("Failed to materialize frame {frame_idx}: {err}"))?;
                    if invert {
                        samples.iter_mut().for_each(|gray| *gray = 255 - *gray);
                    }
                    gray_image(width, height, samples, frame_idx)
                })
                .collect();
        }

        // Wide samples share one window across the stack so brightness does
        // not flicker between frames.
        let raw_frames = (0..decoded.number_of_frames())
            .map(|frame_idx| {
                decoded
                    .to_vec_frame::<f32>(frame_idx)
                    .map_err(|err| format!("Failed to materialize frame {frame_idx}: {err}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (min, max) = raw_frames
            .iter()
            .filter_map(|samples| min_max_f32(samples))
            .fold((f32::MAX, f32::MIN), |(lo, hi), (min, max)| {
                (lo.min(min), hi.max(max))
            });

        raw_frames
            .into_iter()
            .zip(0u32..)
            .map(|(samples, frame_idx)| {
                let gray = samples
                    .iter()
                    .map(|&value| {
                        let gray = normalize_f32(value, min, max);
                        if invert {
                            255 - gray
                        } else {
                            gray
                        }
                    })
                    .collect();
                gray_image(width, height, gray, frame_idx)
            })
            .collect()
    }

    fn color_frames(
        decoded: &DecodedPixelData<'_>,
        interpretation: &str,
    ) -> Result<Vec<GrayImage>, String> {
        (0..decoded.number_of_frames())
            .map(|frame_idx| {
                decoded
                    .to_dynamic_image(frame_idx)
                    .map(|image| image.into_luma8())
                    .map_err(|err| {
                        format!(
                            "Unsupported photometric interpretation `{interpretation}` in frame {frame_idx}: {err}"
                        )
                    })
            })
            .collect()
    }
}

fn gray_image(
    width: u32,
    height: u32,
    samples: Vec<u8>,
    frame_idx: u32,
) -> Result<GrayImage, String> {
    let len = samples.len();
    GrayImage::from_raw(width, height, samples).ok_or_else(|| {
        format!("Frame {frame_idx} holds {len} samples, too few for {width}x{height}")
    })
}

fn min_max_f32(values: &[f32]) -> Option<(f32, f32)> {
    values.iter().copied().fold(None, |acc, value| match acc {
        None => Some((value, value)),
        Some((min, max)) => Some((min.min(value), max.max(value))),
    })
}

fn normalize_f32(value: f32, min: f32, max: f32) -> u8 {
    if max <= min {
        return 0;
    }

    let normalized = (value - min) / (max - min);
    (normalized * 255.0).clamp(0.0, 255.0).round() as u8
}
