//! Error types for sampling and baking.

use thiserror::Error;

/// Result type for frame sampling.
pub type SampleResult<T> = Result<T, SampleError>;

/// Result type for a whole bake.
pub type BakeResult<T> = Result<T, BakeError>;

/// Errors raised while pulling a frame out of the host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SampleError {
    /// The mesh topology changed between the rest pose and this frame.
    #[error("frame {frame} has {actual} vertices but the rest pose has {expected}")]
    InvalidFrame {
        frame: i32,
        expected: usize,
        actual: usize,
    },

    /// The host could not evaluate the frame at all.
    #[error("host failed to evaluate frame {frame}: {message}")]
    Host { frame: i32, message: String },
}

/// Errors that abort a bake. No buffer is produced when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BakeError {
    #[error("end frame {end} is before start frame {start}")]
    InvalidRange { start: i32, end: i32 },

    #[error("bake failed: {0}")]
    BakeFailed(#[from] SampleError),

    #[error("texture of {frames} frames x {vertices} vertices does not fit in memory")]
    BufferTooLarge { frames: usize, vertices: usize },

    #[error("bake cancelled before frame {frame}")]
    Cancelled { frame: i32 },
}
