//! The coarse-to-fine PatchMatch driver.
//!
//! [`PatchMatcher`] walks the pyramid from the coarsest requested level to
//! the finest: resample both inputs, initialize the level's field (seeded
//! by the previous level), then alternate propagation and random-search
//! sweeps. The finest processed field is the result.

mod init;
mod refine;

pub use init::initialize_level;
pub use refine::refine;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cancel::CancelToken;
use crate::field::VectorField;
use crate::image::pyramid::{level_scale, num_levels};
use crate::image::resample::resample;
#[cfg(feature = "rayon")]
use crate::image::resample::resample_par;
use crate::image::ImageBuffer;
use crate::trace::{trace_event, trace_span};
use crate::util::{PatchMatchError, PatchMatchResult};

/// Solver parameters.
#[derive(Clone, Copy, Debug)]
pub struct MatchParams {
    /// Side of the square comparison window; odd values keep it centered
    /// on the pixel, even values truncate the half-window.
    pub patch_size: u32,
    /// First (coarsest) pyramid level to process; clamped to the pyramid.
    pub start_level: i32,
    /// Last (finest) pyramid level to process; clamped to the pyramid.
    pub end_level: i32,
    /// Propagate-and-search sweeps per level. The fractional part runs a
    /// partial sweep over `floor(frac * width * height)` pixels, at the
    /// last processed level only.
    pub iterations: f64,
    /// Seed for the single run-wide random generator.
    pub random_seed: u64,
    /// Resample input rows in parallel (effective with the `rayon`
    /// feature; initialization and refinement stay sequential so results
    /// are identical either way).
    pub parallel: bool,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            patch_size: 5,
            start_level: 1,
            end_level: i32::MAX,
            iterations: 4.0,
            random_seed: 0,
            parallel: false,
        }
    }
}

/// Dense correspondence solver.
///
/// For every pixel of the target image the solver finds a source pixel
/// whose surrounding patch matches best, expressed as a displacement plus
/// the match's patch cost.
pub struct PatchMatcher {
    params: MatchParams,
    cancel: CancelToken,
}

impl PatchMatcher {
    /// Creates a solver with a fresh cancellation token.
    pub fn new(params: MatchParams) -> Self {
        Self {
            params,
            cancel: CancelToken::new(),
        }
    }

    /// Replaces the cancellation token, e.g. with one shared with a
    /// controlling thread.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token polled by the solver; clone it to request cancellation from
    /// elsewhere.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Computes the correspondence field from `trg` pixels into `src`.
    ///
    /// The returned field has the dimensions of the target at the last
    /// processed level: the target's own dimensions when `end_level`
    /// reaches the finest level, half of them per level below it.
    pub fn run(&self, src: &ImageBuffer, trg: &ImageBuffer) -> PatchMatchResult<VectorField> {
        let patch_size = self.params.patch_size.max(1);
        let levels = num_levels(src, trg, patch_size);
        let start = self.params.start_level.clamp(1, levels);
        let end = self.params.end_level.clamp(1, levels);
        if start > end {
            return Err(PatchMatchError::EmptyLevelRange { start, end });
        }
        let iterations = self.params.iterations.max(0.0);
        let mut rng = StdRng::seed_from_u64(self.params.random_seed);

        let mut field: Option<VectorField> = None;
        for level in start..=end {
            self.cancel.check()?;
            let scale = level_scale(level, levels);
            let img_src = self.resample_input(src, scale)?;
            let img_trg = self.resample_input(trg, scale)?;
            let _span = trace_span!(
                "pyramid_level",
                level = level,
                width = img_trg.width(),
                height = img_trg.height()
            )
            .entered();

            let mut next = initialize_level(
                &img_src,
                &img_trg,
                field.as_ref(),
                patch_size,
                &mut rng,
                &self.cancel,
            )?;

            let pixels = img_trg.width() * img_trg.height();
            let partial_len = ((iterations - iterations.floor()) * pixels as f64) as usize;
            let mut sweep = 0u32;
            while f64::from(sweep) < iterations {
                let len = if level == end && f64::from(sweep + 1) > iterations {
                    partial_len
                } else {
                    0
                };
                refine(
                    &mut next,
                    &img_src,
                    &img_trg,
                    patch_size,
                    sweep,
                    len,
                    &mut rng,
                    &self.cancel,
                )?;
                sweep += 1;
            }
            trace_event!("level_refined", level = level, sweeps = sweep);
            field = Some(next);
        }
        field.ok_or(PatchMatchError::EmptyLevelRange { start, end })
    }

    fn resample_input(&self, image: &ImageBuffer, scale: f64) -> PatchMatchResult<ImageBuffer> {
        #[cfg(feature = "rayon")]
        if self.params.parallel {
            return resample_par(image, scale, &self.cancel);
        }
        resample(image, scale, &self.cancel)
    }
}
