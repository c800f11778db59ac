//! Propagate-and-search refinement sweeps.

use rand::Rng;

use crate::cancel::CancelToken;
use crate::field::VectorField;
use crate::image::ImageBuffer;
use crate::kernel::score_candidate;
use crate::util::PatchMatchResult;

/// Runs one full sweep of propagation and random search over `field`,
/// mutating it in place.
///
/// Even `iteration`s scan in raster order, odd ones in fully reversed
/// raster order, so good matches travel across the image in alternating
/// directions. A nonzero `partial_len` ends the sweep after exactly that
/// many visited pixels, which is how fractional iteration counts run their
/// remainder. Cancellation is polled per row; pixels already written stay.
#[allow(clippy::too_many_arguments)]
pub fn refine<R: Rng>(
    field: &mut VectorField,
    src: &ImageBuffer,
    trg: &ImageBuffer,
    patch_size: u32,
    iteration: u32,
    partial_len: usize,
    rng: &mut R,
    cancel: &CancelToken,
) -> PatchMatchResult<()> {
    let width = field.width() as i32;
    let height = field.height() as i32;
    let src_width = src.width() as i32;
    let src_height = src.height() as i32;
    let dir: i32 = if iteration % 2 == 0 { 1 } else { -1 };

    let mut count = 0usize;
    for yi in 0..height {
        cancel.check()?;
        for xi in 0..width {
            if partial_len != 0 && count == partial_len {
                return Ok(());
            }
            count += 1;

            let (x, y) = if dir < 0 {
                (width - 1 - xi, height - 1 - yi)
            } else {
                (xi, yi)
            };
            let mut best = field.get(x as usize, y as usize);

            // Propagate from the neighbors scanned just before this pixel.
            if x - dir >= 0 && x - dir < width {
                let left = field.get((x - dir) as usize, y as usize);
                score_candidate(
                    src,
                    trg,
                    x + left.dx as i32,
                    y + left.dy as i32,
                    x,
                    y,
                    patch_size,
                    &mut best,
                );
            }
            if y - dir >= 0 && y - dir < height {
                let up = field.get(x as usize, (y - dir) as usize);
                score_candidate(
                    src,
                    trg,
                    x + up.dx as i32,
                    y + up.dy as i32,
                    x,
                    y,
                    patch_size,
                    &mut best,
                );
            }

            // Random search in windows that halve until either radius
            // drops below one pixel. The window center is the best match
            // after propagation and stays fixed for the whole descent.
            let center_x = x + best.dx as i32;
            let center_y = y + best.dy as i32;
            let mut rad_w = f64::from(src_width) / 2.0;
            let mut rad_h = f64::from(src_height) / 2.0;
            while rad_w >= 1.0 && rad_h >= 1.0 {
                let rw = rad_w.ceil() as i32;
                let rh = rad_h.ceil() as i32;
                let left = (center_x - rw).max(0);
                let bottom = (center_y - rh).max(0);
                let right = (center_x + rw + 1).min(src_width);
                let top = (center_y + rh + 1).min(src_height);
                if right <= left || top <= bottom {
                    break;
                }
                let sx = rng.random_range(left..right);
                let sy = rng.random_range(bottom..top);
                score_candidate(src, trg, sx, sy, x, y, patch_size, &mut best);
                rad_w /= 2.0;
                rad_h /= 2.0;
            }

            field.set(x as usize, y as usize, best);
        }
    }
    Ok(())
}
