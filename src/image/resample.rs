//! Area-weighted box resampling.
//!
//! Each output pixel averages the exact real-valued rectangle it covers in
//! the input image, weighting edge pixels by their overlap length. This is
//! ideal box filtering: it reproduces exact area averages for every scale
//! factor, whether or not it divides the input evenly. Accumulation runs
//! in `f64` and the result is narrowed on write.

use crate::cancel::CancelToken;
use crate::image::ImageBuffer;
use crate::util::{PatchMatchError, PatchMatchResult};

/// Resamples `image` by an isotropic `scale`.
///
/// `scale == 1.0` returns a copy with unchanged dimensions; otherwise the
/// output is `max(1, round(width * scale))` by `max(1, round(height *
/// scale))` with the channel count preserved. The cancel token is polled
/// once per output row; an interrupted call drops the partial buffer.
pub fn resample(
    image: &ImageBuffer,
    scale: f64,
    cancel: &CancelToken,
) -> PatchMatchResult<ImageBuffer> {
    check_scale(scale)?;
    if scale == 1.0 {
        return Ok(image.clone());
    }
    let (out_width, out_height) = output_dims(image.width(), image.height(), scale);
    let channels = image.channels();
    let sample_size = 1.0 / scale;

    let mut out = ImageBuffer::new(out_width, out_height, channels)?;
    let mut totals = vec![0.0f64; channels];
    for y in 0..out_height {
        cancel.check()?;
        for x in 0..out_width {
            let area = accumulate_area(image, x, y, sample_size, &mut totals);
            let pix = out.pixel_mut(x, y);
            for (value, total) in pix.iter_mut().zip(totals.iter()) {
                *value = (total / area) as f32;
            }
        }
    }
    Ok(out)
}

/// Row-parallel variant of [`resample`].
///
/// Output rows are independent, so they distribute cleanly across the
/// rayon pool; the cancel flag is still honored per row.
#[cfg(feature = "rayon")]
pub fn resample_par(
    image: &ImageBuffer,
    scale: f64,
    cancel: &CancelToken,
) -> PatchMatchResult<ImageBuffer> {
    use rayon::prelude::*;

    check_scale(scale)?;
    if scale == 1.0 {
        return Ok(image.clone());
    }
    let (out_width, out_height) = output_dims(image.width(), image.height(), scale);
    let channels = image.channels();
    let sample_size = 1.0 / scale;

    let rows: Vec<Option<Vec<f32>>> = (0..out_height)
        .into_par_iter()
        .map(|y| {
            if cancel.is_cancelled() {
                return None;
            }
            let mut totals = vec![0.0f64; channels];
            let mut row = Vec::with_capacity(out_width * channels);
            for x in 0..out_width {
                let area = accumulate_area(image, x, y, sample_size, &mut totals);
                for total in &totals {
                    row.push((total / area) as f32);
                }
            }
            Some(row)
        })
        .collect();

    let mut data = Vec::with_capacity(out_width * out_height * channels);
    for row in rows {
        data.extend_from_slice(&row.ok_or(PatchMatchError::Cancelled)?);
    }
    ImageBuffer::from_vec(data, out_width, out_height, channels)
}

fn check_scale(scale: f64) -> PatchMatchResult<()> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(PatchMatchError::InvalidScale { scale })
    }
}

fn output_dims(width: usize, height: usize, scale: f64) -> (usize, usize) {
    let out_width = (width as f64 * scale).round() as usize;
    let out_height = (height as f64 * scale).round() as usize;
    (out_width.max(1), out_height.max(1))
}

/// Accumulates the weighted channel sums of the input rectangle covered by
/// output pixel `(x, y)` into `totals` and returns the covered area.
///
/// The sample rectangle is `[x, x+1) * sample_size` clamped to the input on
/// the right and bottom; each intersected input pixel contributes its exact
/// overlap `wx * wy`, so the area equals the rectangle's clamped extent and
/// is never zero.
fn accumulate_area(
    image: &ImageBuffer,
    x: usize,
    y: usize,
    sample_size: f64,
    totals: &mut [f64],
) -> f64 {
    let x1 = x as f64 * sample_size;
    let x2 = ((x + 1) as f64 * sample_size).min(image.width() as f64);
    let y1 = y as f64 * sample_size;
    let y2 = ((y + 1) as f64 * sample_size).min(image.height() as f64);

    totals.fill(0.0);
    let mut area = 0.0f64;
    for sy in (y1.floor() as usize)..(y2.ceil() as usize) {
        let wy = y2.min((sy + 1) as f64) - y1.max(sy as f64);
        if wy <= 0.0 {
            continue;
        }
        for sx in (x1.floor() as usize)..(x2.ceil() as usize) {
            let wx = x2.min((sx + 1) as f64) - x1.max(sx as f64);
            if wx <= 0.0 {
                continue;
            }
            let weight = wx * wy;
            for (total, value) in totals.iter_mut().zip(image.pixel(sx, sy)) {
                *total += f64::from(*value) * weight;
            }
            area += weight;
        }
    }
    area
}
