//! Per-level field initialization.

use rand::Rng;

use crate::cancel::CancelToken;
use crate::field::{Candidate, VectorField};
use crate::image::ImageBuffer;
use crate::kernel::score_candidate;
use crate::util::PatchMatchResult;

/// Builds the initial field for one pyramid level, sized to `trg`.
///
/// Every pixel scores one uniformly random source position. When `prev`
/// holds the already-refined coarser field, the nearest coarse vector
/// (`x * prev_width / width`, floor division, same for y) is scored as a
/// second candidate so coarse matches survive into the finer level. The
/// random position always lies inside the source, so every pixel of the
/// returned field holds a scored candidate.
pub fn initialize_level<R: Rng>(
    src: &ImageBuffer,
    trg: &ImageBuffer,
    prev: Option<&VectorField>,
    patch_size: u32,
    rng: &mut R,
    cancel: &CancelToken,
) -> PatchMatchResult<VectorField> {
    let width = trg.width();
    let height = trg.height();
    let mut field = VectorField::new(width, height)?;

    for y in 0..height {
        cancel.check()?;
        for x in 0..width {
            let dx = rng.random_range(0..src.width()) as i32 - x as i32;
            let dy = rng.random_range(0..src.height()) as i32 - y as i32;
            let mut best = Candidate::UNSET;
            score_candidate(
                src,
                trg,
                x as i32 + dx,
                y as i32 + dy,
                x as i32,
                y as i32,
                patch_size,
                &mut best,
            );
            if let Some(prev) = prev {
                let px = x * prev.width() / width;
                let py = y * prev.height() / height;
                let seed = prev.get(px, py);
                score_candidate(
                    src,
                    trg,
                    x as i32 + seed.dx as i32,
                    y as i32 + seed.dy as i32,
                    x as i32,
                    y as i32,
                    patch_size,
                    &mut best,
                );
            }
            field.set(x, y, best);
        }
    }
    Ok(field)
}
