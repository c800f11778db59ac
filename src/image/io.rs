//! Convenience helpers for loading images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::ImageBuffer;
use crate::util::{PatchMatchError, PatchMatchResult};
use std::path::Path;

/// Converts a dynamic image into an interleaved RGB float buffer.
pub fn buffer_from_dynamic_image(img: &image::DynamicImage) -> PatchMatchResult<ImageBuffer> {
    let rgb = img.to_rgb32f();
    let width = rgb.width() as usize;
    let height = rgb.height() as usize;
    ImageBuffer::from_vec(rgb.into_raw(), width, height, 3)
}

/// Loads an image from disk as an RGB float buffer.
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> PatchMatchResult<ImageBuffer> {
    let img = image::open(path).map_err(|err| PatchMatchError::ImageIo {
        reason: err.to_string(),
    })?;
    buffer_from_dynamic_image(&img)
}
