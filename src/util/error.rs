//! Error types for patchmatch.

use thiserror::Error;

/// Result alias for patchmatch operations.
pub type PatchMatchResult<T> = std::result::Result<T, PatchMatchError>;

/// Errors surfaced by the correspondence solver.
#[derive(Debug, Error)]
pub enum PatchMatchError {
    /// An image dimension is zero or the pixel count overflows.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// A buffer does not hold the elements its dimensions require.
    #[error("buffer length mismatch: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The channel count is zero.
    #[error("invalid channel count: {channels}")]
    InvalidChannels { channels: usize },
    /// The resampling scale is not a positive finite number.
    #[error("invalid scale factor: {scale}")]
    InvalidScale { scale: f64 },
    /// The clamped level range selects no pyramid level.
    #[error("level range {start}..={end} selects no pyramid level")]
    EmptyLevelRange { start: i32, end: i32 },
    /// The run was stopped through its `CancelToken`; not a failure, the
    /// caller simply gets no result.
    #[error("cancelled")]
    Cancelled,
    /// Reading an image file failed.
    #[cfg(feature = "image-io")]
    #[error("image io failed: {reason}")]
    ImageIo { reason: String },
}
