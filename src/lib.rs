//! Dense correspondence fields via randomized PatchMatch.
//!
//! The solver matches every pixel of a target image against a source image
//! by propagating good matches between neighbors and sampling shrinking
//! random search windows, refined coarse-to-fine over an image pyramid
//! built with exact area-weighted resampling. The result is a per-pixel
//! displacement `(dx, dy)` into the source plus the match's patch cost.
//!
//! The default build is single-threaded and, for a fixed seed, fully
//! deterministic. Optional features: `rayon` (row-parallel resampling),
//! `tracing` (spans and events), `image-io` (loading image files).

pub mod cancel;
pub mod field;
pub mod image;
pub mod kernel;
pub mod search;
pub mod util;

mod trace;

pub use cancel::CancelToken;
pub use field::{Candidate, VectorField};
#[cfg(feature = "image-io")]
pub use image::io;
pub use image::pyramid::{level_scale, num_levels};
pub use image::resample::resample;
#[cfg(feature = "rayon")]
pub use image::resample::resample_par;
pub use image::ImageBuffer;
pub use kernel::score_candidate;
pub use search::{initialize_level, refine, MatchParams, PatchMatcher};
pub use util::{PatchMatchError, PatchMatchResult};
