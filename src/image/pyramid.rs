//! Pyramid level arithmetic.
//!
//! Level 1 is the coarsest tier and `num_levels` the native resolution;
//! each level doubles the scale of the one before it. The pyramid is never
//! stored: every level resamples the native-resolution inputs directly, so
//! the geometry between levels is fixed by the scale formula alone.

use crate::image::ImageBuffer;

/// Number of pyramid levels for a source/target pair.
///
/// One level when the smallest dimension of either image does not exceed
/// the patch, otherwise enough levels that the coarsest tier shrinks the
/// smallest dimension to roughly the patch size.
pub fn num_levels(src: &ImageBuffer, trg: &ImageBuffer, patch_size: u32) -> i32 {
    let min_dim = src
        .width()
        .min(src.height())
        .min(trg.width())
        .min(trg.height());
    if min_dim <= patch_size as usize {
        return 1;
    }
    (min_dim as f64 / f64::from(patch_size)).log2() as i32 + 1
}

/// Scale factor of `level` relative to native resolution: `2^(level -
/// num_levels)`.
pub fn level_scale(level: i32, num_levels: i32) -> f64 {
    let mut scale = 1.0f64;
    for _ in level..num_levels {
        scale *= 0.5;
    }
    scale
}
