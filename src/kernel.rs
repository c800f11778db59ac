//! Patch scoring.
//!
//! `score_candidate` is the one scoring routine shared by field
//! initialization and refinement: summed absolute difference over a square
//! window, compared over the channels both images have. The incumbent in
//! `best` prunes the accumulation early, and windows clipped at image
//! borders are normalized back to full-patch cost so edge pixels compete
//! fairly with interior ones.

use crate::field::Candidate;
use crate::image::ImageBuffer;

/// Scores the source patch at `(x_src, y_src)` against the target patch at
/// `(x_trg, y_trg)` and installs it into `best` if it wins.
///
/// The candidate wins on strictly lower cost, or on equal cost with a
/// strictly smaller squared displacement. A source center outside the
/// image is ignored, as is a window with no overlapping pixel pair at all;
/// `best` is left untouched in both cases.
#[allow(clippy::too_many_arguments)]
pub fn score_candidate(
    src: &ImageBuffer,
    trg: &ImageBuffer,
    x_src: i32,
    y_src: i32,
    x_trg: i32,
    y_trg: i32,
    patch_size: u32,
    best: &mut Candidate,
) {
    if !src.contains(x_src, y_src) {
        return;
    }
    debug_assert!(patch_size >= 1);

    let channels = src.channels().min(trg.channels());
    let half = ((patch_size - 1) >> 1) as i32;
    let mut total = 0.0f32;
    let mut count = 0u32;

    for y_off in -half..=half {
        for x_off in -half..=half {
            let xx_src = x_src + x_off;
            let yy_src = y_src + y_off;
            let xx_trg = x_trg + x_off;
            let yy_trg = y_trg + y_off;
            if !src.contains(xx_src, yy_src) || !trg.contains(xx_trg, yy_trg) {
                continue;
            }
            let pix_src = src.pixel(xx_src as usize, yy_src as usize);
            let pix_trg = trg.pixel(xx_trg as usize, yy_trg as usize);
            for c in 0..channels {
                total += (pix_trg[c] - pix_src[c]).abs();
                // A partial sum past the incumbent can no longer win; equal
                // sums stay alive for the displacement tie-break.
                if best.cost >= 0.0 && total > best.cost {
                    return;
                }
            }
            count += 1;
        }
    }

    if count == 0 {
        return;
    }
    let max_count = patch_size * patch_size;
    if count < max_count {
        total *= max_count as f32 / count as f32;
    }
    if best.cost >= 0.0 && total > best.cost {
        return;
    }

    let dx = (x_src - x_trg) as f32;
    let dy = (y_src - y_trg) as f32;
    if best.cost >= 0.0
        && total == best.cost
        && dx * dx + dy * dy > best.dx * best.dx + best.dy * best.dy
    {
        return;
    }
    *best = Candidate {
        dx,
        dy,
        cost: total,
    };
}
