//! Drawing a fractional source rectangle into an output buffer.
//!
//! Every filter uses inverse mapping: for each output pixel center we compute
//! the matching source coordinate inside the rectangle and sample there, so
//! sub-pixel rectangles are honored exactly. Lanczos3 runs as two separable
//! passes and widens its kernel by the step when downscaling.

use std::f64::consts::PI;

use super::FilterType;
use crate::decode::DecodedImage;
use crate::geometry::SourceRect;

/// Draw `rect` of `image` scaled into a `width` x `height` RGBA buffer.
///
/// Coordinates outside the image are clamped to the nearest edge pixel.
/// Zero output dimensions are raised to 1.
pub fn draw_region(
    image: &DecodedImage,
    rect: &SourceRect,
    width: u32,
    height: u32,
    filter: FilterType,
) -> DecodedImage {
    let width = width.max(1);
    let height = height.max(1);

    if image.is_empty() {
        return DecodedImage::new(width, height, vec![0u8; width as usize * height as usize * 4]);
    }

    match filter {
        FilterType::Lanczos3 => resample_lanczos(image, rect, width, height),
        FilterType::Bilinear => inverse_map(image, rect, width, height, sample_bilinear),
        FilterType::Nearest => inverse_map(image, rect, width, height, sample_nearest),
    }
}

fn inverse_map(
    image: &DecodedImage,
    rect: &SourceRect,
    width: u32,
    height: u32,
    sample: fn(&DecodedImage, f64, f64) -> [u8; 4],
) -> DecodedImage {
    let step_x = rect.width / width as f64;
    let step_y = rect.height / height as f64;

    let mut output = Vec::with_capacity(width as usize * height as usize * 4);
    for dst_y in 0..height {
        // Source coordinate of the output pixel center, in pixel-center units
        let src_y = rect.y + (dst_y as f64 + 0.5) * step_y - 0.5;
        for dst_x in 0..width {
            let src_x = rect.x + (dst_x as f64 + 0.5) * step_x - 0.5;
            output.extend_from_slice(&sample(image, src_x, src_y));
        }
    }

    DecodedImage::new(width, height, output)
}

/// Source indices (edge-clamped) and normalized weights for one output sample.
type Taps = Vec<(usize, f32)>;

fn lanczos3(x: f64) -> f64 {
    if x == 0.0 {
        return 1.0;
    }
    if x.abs() >= 3.0 {
        return 0.0;
    }
    let px = PI * x;
    3.0 * px.sin() * (px / 3.0).sin() / (px * px)
}

/// Lanczos3 taps along one axis for every output index.
fn axis_taps(start: f64, span: f64, out_len: u32, src_len: u32) -> Vec<Taps> {
    let step = span / out_len as f64;
    let scale = step.abs().max(1.0);
    let support = 3.0 * scale;

    (0..out_len)
        .map(|dst| -> Taps {
            let center = start + (dst as f64 + 0.5) * step - 0.5;
            if !center.is_finite() {
                return vec![(0, 1.0)];
            }

            let lo = (center - support).floor() as i64;
            let hi = (center + support).ceil() as i64;
            let mut taps = Vec::with_capacity((hi - lo + 1).max(0) as usize);
            let mut total = 0.0f64;
            for i in lo..=hi {
                let weight = lanczos3((i as f64 - center) / scale);
                if weight != 0.0 {
                    taps.push((clamp_index(i as f64, src_len), weight));
                    total += weight;
                }
            }

            if taps.is_empty() || total.abs() < f64::EPSILON {
                return vec![(clamp_index(center.round(), src_len), 1.0)];
            }
            taps.into_iter()
                .map(|(i, weight)| (i, (weight / total) as f32))
                .collect()
        })
        .collect()
}

fn resample_lanczos(
    image: &DecodedImage,
    rect: &SourceRect,
    width: u32,
    height: u32,
) -> DecodedImage {
    let columns = axis_taps(rect.x, rect.width, width, image.width);
    let rows = axis_taps(rect.y, rect.height, height, image.height);

    // Horizontal pass, limited to the source rows the vertical pass reads
    let (top, bottom) = rows
        .iter()
        .flatten()
        .fold((usize::MAX, 0), |(lo, hi), &(y, _)| (lo.min(y), hi.max(y)));
    let stride = width as usize;
    let mut horizontal = vec![[0f32; 4]; (bottom + 1 - top) * stride];
    for (y, row) in (top..=bottom).zip(horizontal.chunks_exact_mut(stride)) {
        for (acc, taps) in row.iter_mut().zip(&columns) {
            for &(x, weight) in taps {
                let p = pixel(image, x, y);
                for c in 0..4 {
                    acc[c] += p[c] as f32 * weight;
                }
            }
        }
    }

    let mut output = Vec::with_capacity(stride * height as usize * 4);
    for taps in &rows {
        for x in 0..stride {
            let mut acc = [0f32; 4];
            for &(y, weight) in taps {
                let p = horizontal[(y - top) * stride + x];
                for c in 0..4 {
                    acc[c] += p[c] * weight;
                }
            }
            output.extend(acc.iter().map(|v| v.round().clamp(0.0, 255.0) as u8));
        }
    }

    DecodedImage::new(width, height, output)
}

#[inline]
fn pixel(image: &DecodedImage, x: usize, y: usize) -> [u8; 4] {
    let idx = (y * image.width as usize + x) * 4;
    [
        image.pixels[idx],
        image.pixels[idx + 1],
        image.pixels[idx + 2],
        image.pixels[idx + 3],
    ]
}

#[inline]
fn clamp_index(v: f64, len: u32) -> usize {
    v.clamp(0.0, (len - 1) as f64) as usize
}

fn sample_nearest(image: &DecodedImage, x: f64, y: f64) -> [u8; 4] {
    pixel(
        image,
        clamp_index(x.round(), image.width),
        clamp_index(y.round(), image.height),
    )
}

/// Bilinear interpolation over the 4 nearest pixels, edge-clamped.
fn sample_bilinear(image: &DecodedImage, x: f64, y: f64) -> [u8; 4] {
    let x = x.clamp(0.0, (image.width - 1) as f64);
    let y = y.clamp(0.0, (image.height - 1) as f64);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(image.width as usize - 1);
    let y1 = (y0 + 1).min(image.height as usize - 1);

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = pixel(image, x0, y0);
    let p10 = pixel(image, x1, y0);
    let p01 = pixel(image, x0, y1);
    let p11 = pixel(image, x1, y1);

    let mut result = [0u8; 4];
    for i in 0..4 {
        let v = p00[i] as f64 * (1.0 - fx) * (1.0 - fy)
            + p10[i] as f64 * fx * (1.0 - fy)
            + p01[i] as f64 * (1.0 - fx) * fy
            + p11[i] as f64 * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }
    result
}
