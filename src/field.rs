//! Displacement vector fields.
//!
//! A field stores one candidate per target pixel: the displacement to its
//! best source match so far and the patch cost of that match. The backing
//! store is a plain 3-channel [`ImageBuffer`] (`dx`, `dy`, `cost`), so a
//! finished field can be handed to image-consuming callers unchanged.

use crate::image::ImageBuffer;
use crate::util::PatchMatchResult;

/// One candidate match slot: a displacement and its patch cost.
///
/// `cost` is non-negative once any candidate has been scored; the sentinel
/// `-1.0` marks a slot that has never held a candidate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Signed horizontal offset from target pixel to source pixel.
    pub dx: f32,
    /// Signed vertical offset from target pixel to source pixel.
    pub dy: f32,
    /// Summed-absolute-difference patch cost, `-1.0` when unset.
    pub cost: f32,
}

impl Candidate {
    /// Slot that has never been scored.
    pub const UNSET: Self = Self {
        dx: 0.0,
        dy: 0.0,
        cost: -1.0,
    };

    /// True once a scored candidate has been installed.
    pub fn is_set(&self) -> bool {
        self.cost >= 0.0
    }
}

/// Per-pixel displacement field with match costs.
#[derive(Clone, Debug)]
pub struct VectorField {
    img: ImageBuffer,
}

impl VectorField {
    /// Channels per field pixel: `dx`, `dy`, `cost`.
    pub const CHANNELS: usize = 3;

    /// Allocates a field of unset candidates.
    pub fn new(width: usize, height: usize) -> PatchMatchResult<Self> {
        let mut img = ImageBuffer::new(width, height, Self::CHANNELS)?;
        for pix in img.as_mut_slice().chunks_exact_mut(Self::CHANNELS) {
            pix[2] = Candidate::UNSET.cost;
        }
        Ok(Self { img })
    }

    /// Returns the field width in pixels.
    pub fn width(&self) -> usize {
        self.img.width()
    }

    /// Returns the field height in pixels.
    pub fn height(&self) -> usize {
        self.img.height()
    }

    /// Reads the candidate at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Candidate {
        let pix = self.img.pixel(x, y);
        Candidate {
            dx: pix[0],
            dy: pix[1],
            cost: pix[2],
        }
    }

    /// Writes the candidate at `(x, y)`.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, candidate: Candidate) {
        let pix = self.img.pixel_mut(x, y);
        pix[0] = candidate.dx;
        pix[1] = candidate.dy;
        pix[2] = candidate.cost;
    }

    /// Borrows the field as its backing image.
    pub fn as_image(&self) -> &ImageBuffer {
        &self.img
    }

    /// Consumes the field into its backing image.
    pub fn into_image(self) -> ImageBuffer {
        self.img
    }

    /// Copies the field into a caller-sized buffer whose pixel `(0, 0)`
    /// sits at field coordinate `(x0, y0)`.
    ///
    /// Destination pixels outside the field are zeroed, extra destination
    /// channels pad with zero, and fewer destination channels crop.
    pub fn blit_into(&self, dst: &mut ImageBuffer, x0: i64, y0: i64) {
        let copied = dst.channels().min(Self::CHANNELS);
        let width = self.width() as i64;
        let height = self.height() as i64;
        for y in 0..dst.height() {
            for x in 0..dst.width() {
                let fx = x as i64 + x0;
                let fy = y as i64 + y0;
                let out = dst.pixel_mut(x, y);
                if fx < 0 || fy < 0 || fx >= width || fy >= height {
                    out.fill(0.0);
                    continue;
                }
                let src = self.img.pixel(fx as usize, fy as usize);
                out[..copied].copy_from_slice(&src[..copied]);
                out[copied..].fill(0.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Candidate, VectorField};
    use crate::image::ImageBuffer;

    #[test]
    fn new_field_is_unset() {
        let field = VectorField::new(3, 2).unwrap();
        for y in 0..2 {
            for x in 0..3 {
                assert!(!field.get(x, y).is_set());
            }
        }
    }

    #[test]
    fn set_then_get_roundtrips() {
        let mut field = VectorField::new(2, 2).unwrap();
        let cand = Candidate {
            dx: -3.0,
            dy: 1.0,
            cost: 7.5,
        };
        field.set(1, 0, cand);
        assert_eq!(field.get(1, 0), cand);
        assert!(!field.get(0, 0).is_set());
    }

    #[test]
    fn blit_pads_crops_and_zero_fills() {
        let mut field = VectorField::new(2, 2).unwrap();
        field.set(
            0,
            0,
            Candidate {
                dx: 1.0,
                dy: 2.0,
                cost: 3.0,
            },
        );

        // Wider destination: 4 channels pad, offset shifts past the field.
        let mut dst = ImageBuffer::new(3, 1, 4).unwrap();
        dst.as_mut_slice().fill(9.0);
        field.blit_into(&mut dst, -1, 0);
        assert_eq!(dst.pixel(0, 0), &[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(dst.pixel(1, 0), &[1.0, 2.0, 3.0, 0.0]);

        // Narrower destination crops to dx only.
        let mut narrow = ImageBuffer::new(1, 1, 1).unwrap();
        field.blit_into(&mut narrow, 0, 0);
        assert_eq!(narrow.pixel(0, 0), &[1.0]);
    }
}
