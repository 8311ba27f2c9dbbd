//! Per-frame contrast enhancement.
//!
//! CLAHE follows the usual tile/clip/interpolate scheme: frames whose size is
//! not a multiple of the grid are padded by reflection for histogram
//! collection only, each tile histogram is clipped and the excess spread back
//! over the bins, and every output pixel blends the lookup tables of the four
//! nearest tile centres.

use image::GrayImage;

use crate::error::Result;
use crate::model::FrameStack;

pub const TILE_GRID: (u32, u32) = (8, 8);

const BINS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Enhancement {
    None,
    Global,
    Clahe { clip_limit: f32 },
}

/// Enhances every frame of `stack` with the same transform.
///
/// Fails with `InconsistentFrames` if a transform changed a frame's size.
pub fn enhance_stack(stack: &FrameStack, enhancement: Enhancement) -> Result<FrameStack> {
    log::debug!("Enhancing {} frame(s) with {enhancement:?}", stack.len());
    let enhanced = match enhancement {
        Enhancement::None => return Ok(stack.clone()),
        Enhancement::Global => stack.map_frames(equalize_histogram),
        Enhancement::Clahe { clip_limit } => {
            stack.map_frames(|frame| clahe(frame, clip_limit, TILE_GRID))
        }
    };

    enhanced.inspect_err(|err| log::error!("Enhancement failed: {err}"))
}

/// Global histogram equalization over the whole frame.
pub fn equalize_histogram(frame: &GrayImage) -> GrayImage {
    let total = frame.as_raw().len();
    let mut hist = [0usize; BINS];
    for &value in frame.as_raw() {
        hist[value as usize] += 1;
    }

    let Some(first) = hist.iter().position(|&count| count > 0) else {
        return frame.clone();
    };
    if hist[first] == total {
        return GrayImage::from_pixel(frame.width(), frame.height(), image::Luma([first as u8]));
    }

    let scale = 255.0 / (total - hist[first]) as f32;
    let mut lut = [0u8; BINS];
    let mut sum = 0usize;
    for level in first + 1..BINS {
        sum += hist[level];
        lut[level] = (sum as f32 * scale).round().clamp(0.0, 255.0) as u8;
    }

    map_pixels(frame, |value| lut[value as usize])
}

/// Contrast limited adaptive histogram equalization.
///
/// `clip_limit` is relative to a flat histogram; a value of zero or less
/// disables clipping.
pub fn clahe(frame: &GrayImage, clip_limit: f32, grid: (u32, u32)) -> GrayImage {
    let (width, height) = frame.dimensions();
    let (tiles_x, tiles_y) = (grid.0.max(1) as usize, grid.1.max(1) as usize);
    if width == 0 || height == 0 {
        return frame.clone();
    }

    let (width, height) = (width as usize, height as usize);
    let padded_width = width.div_ceil(tiles_x) * tiles_x;
    let padded_height = height.div_ceil(tiles_y) * tiles_y;
    let tile_width = padded_width / tiles_x;
    let tile_height = padded_height / tiles_y;
    let tile_area = tile_width * tile_height;

    let clip = (clip_limit > 0.0)
        .then(|| ((clip_limit * tile_area as f32 / BINS as f32) as usize).max(1));
    let lut_scale = (BINS - 1) as f32 / tile_area as f32;

    let pixels = frame.as_raw();
    let mut luts = vec![[0u8; BINS]; tiles_x * tiles_y];

    for tile_y in 0..tiles_y {
        for tile_x in 0..tiles_x {
            let mut hist = [0usize; BINS];
            for y in tile_y * tile_height..(tile_y + 1) * tile_height {
                let row = reflect_101(y, height) * width;
                for x in tile_x * tile_width..(tile_x + 1) * tile_width {
                    hist[pixels[row + reflect_101(x, width)] as usize] += 1;
                }
            }

            if let Some(clip) = clip {
                clip_histogram(&mut hist, clip);
            }

            let lut = &mut luts[tile_y * tiles_x + tile_x];
            let mut sum = 0usize;
            for (level, count) in hist.iter().enumerate() {
                sum += count;
                lut[level] = (sum as f32 * lut_scale).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    let inv_tile_width = 1.0 / tile_width as f32;
    let inv_tile_height = 1.0 / tile_height as f32;
    let mut output = Vec::with_capacity(width * height);

    for y in 0..height {
        let (top, bottom, weight_y) = neighbours(y as f32 * inv_tile_height - 0.5, tiles_y);
        for x in 0..width {
            let (left, right, weight_x) = neighbours(x as f32 * inv_tile_width - 0.5, tiles_x);
            let value = pixels[y * width + x] as usize;

            let lut = |tile_y: usize, tile_x: usize| luts[tile_y * tiles_x + tile_x][value] as f32;
            let upper = lut(top, left) * (1.0 - weight_x) + lut(top, right) * weight_x;
            let lower = lut(bottom, left) * (1.0 - weight_x) + lut(bottom, right) * weight_x;
            let blended = upper * (1.0 - weight_y) + lower * weight_y;

            output.push(blended.round().clamp(0.0, 255.0) as u8);
        }
    }

    GrayImage::from_raw(width as u32, height as u32, output).unwrap_or_else(|| frame.clone())
}

fn clip_histogram(hist: &mut [usize; BINS], clip: usize) {
    let mut excess = 0usize;
    for count in hist.iter_mut() {
        if *count > clip {
            excess += *count - clip;
            *count = clip;
        }
    }

    let batch = excess / BINS;
    let mut residual = excess - batch * BINS;
    for count in hist.iter_mut() {
        *count += batch;
    }

    if residual > 0 {
        let step = (BINS / residual).max(1);
        let mut level = 0;
        while level < BINS && residual > 0 {
            hist[level] += 1;
            residual -= 1;
            level += step;
        }
    }
}

/// Lower and upper tile index around a tile-space coordinate, plus the
/// weight of the upper one.
fn neighbours(position: f32, tiles: usize) -> (usize, usize, f32) {
    let lower = position.floor();
    let weight = position - lower;
    let last = tiles as i64 - 1;
    let first = (lower as i64).clamp(0, last) as usize;
    let second = (lower as i64 + 1).clamp(0, last) as usize;
    (first, second, weight)
}

/// Border index mirrored without repeating the edge sample (`dcb|abcd|cba`).
fn reflect_101(index: usize, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let index = index % period;
    if index < len {
        index
    } else {
        period - index
    }
}

fn map_pixels(frame: &GrayImage, lut: impl Fn(u8) -> u8) -> GrayImage {
    let mut output = frame.clone();
    for pixel in output.pixels_mut() {
        pixel.0[0] = lut(pixel.0[0]);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32, low: u8, high: u8) -> GrayImage {
        let span = (high - low) as u32;
        GrayImage::from_fn(width, height, |x, _| {
            image::Luma([low + (x * span / (width - 1).max(1)) as u8])
        })
    }

    fn range(frame: &GrayImage) -> (u8, u8) {
        let min = frame.as_raw().iter().copied().min().unwrap_or(0);
        let max = frame.as_raw().iter().copied().max().unwrap_or(0);
        (min, max)
    }

    #[test]
    fn reflect_101_mirrors_without_edge_repeat() {
        let mirrored: Vec<usize> = (0..9).map(|i| reflect_101(i, 4)).collect();
        assert_eq!(mirrored, vec![0, 1, 2, 3, 2, 1, 0, 1, 2]);
        assert_eq!(reflect_101(5, 1), 0);
    }

    #[test]
    fn clipping_preserves_histogram_mass() {
        let mut hist = [0usize; BINS];
        hist[10] = 500;
        hist[20] = 40;
        clip_histogram(&mut hist, 16);
        assert_eq!(hist.iter().sum::<usize>(), 540);
        assert!(hist[10] <= 16 + 3);
    }

    #[test]
    fn clahe_keeps_shape() {
        let frame = gradient(37, 23, 90, 140);
        let enhanced = clahe(&frame, 2.0, TILE_GRID);
        assert_eq!(enhanced.dimensions(), (37, 23));
    }

    #[test]
    fn clahe_is_deterministic() {
        let frame = gradient(64, 48, 100, 131);
        assert_eq!(clahe(&frame, 1.5, TILE_GRID), clahe(&frame, 1.5, TILE_GRID));
    }

    #[test]
    fn clahe_stretches_low_contrast_frames() {
        let frame = gradient(64, 64, 100, 131);
        let (in_min, in_max) = range(&frame);
        let (out_min, out_max) = range(&clahe(&frame, 40.0, TILE_GRID));
        assert!(out_max - out_min > in_max - in_min);
    }

    #[test]
    fn clahe_leaves_constant_frames_uniform() {
        let frame = GrayImage::from_pixel(40, 40, image::Luma([77]));
        let enhanced = clahe(&frame, 2.0, TILE_GRID);
        let (min, max) = range(&enhanced);
        assert_eq!(min, max);
    }

    #[test]
    fn clip_limit_changes_the_result() {
        let mut frame = gradient(64, 64, 60, 200);
        frame.put_pixel(10, 10, image::Luma([255]));
        assert_ne!(clahe(&frame, 1.0, TILE_GRID), clahe(&frame, 8.0, TILE_GRID));
    }

    #[test]
    fn tiny_frames_are_supported() {
        let frame = GrayImage::from_pixel(1, 3, image::Luma([12]));
        assert_eq!(clahe(&frame, 2.0, TILE_GRID).dimensions(), (1, 3));
    }

    #[test]
    fn global_equalization_spreads_two_levels() {
        let frame = GrayImage::from_fn(8, 8, |x, _| image::Luma([if x < 4 { 50 } else { 200 }]));
        let equalized = equalize_histogram(&frame);
        assert_eq!(range(&equalized), (0, 255));
    }

    #[test]
    fn global_equalization_of_flat_frame_is_identity() {
        let frame = GrayImage::from_pixel(5, 5, image::Luma([9]));
        assert_eq!(equalize_histogram(&frame), frame);
    }

    #[test]
    fn stack_enhancement_keeps_frame_count() {
        let stack = FrameStack::from_frames(vec![gradient(16, 16, 0, 50); 3]).unwrap();
        let enhanced = enhance_stack(&stack, Enhancement::Clahe { clip_limit: 1.5 }).unwrap();
        assert_eq!(enhanced.shape(), stack.shape());
        assert_eq!(enhance_stack(&stack, Enhancement::None).unwrap(), stack);
        let global = enhance_stack(&stack, Enhancement::Global).unwrap();
        assert_eq!(global.shape(), stack.shape());
    }
}
