// THEORY:
// A single error type covers every way a detection call can refuse to run.
// Precondition violations on frames (wrong channel count, mismatched sizes,
// malformed buffers) are reported here and abort the whole call. Degenerate
// data, such as a frame without any logo in it, is never an error: those
// stages simply return empty collections.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for logo_vision operations.
#[derive(Debug, Error)]
pub enum LogoVisionError {
    #[error("Frame must have non-zero width and height, got {width}x{height}")]
    EmptyFrame { width: u32, height: u32 },

    #[error("Expected a {expected}-channel frame, got {actual} channel(s)")]
    ChannelMismatch { expected: u8, actual: u8 },

    #[error("Frame size mismatch: expected {expected:?}, got {actual:?}")]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Frame buffer holds {actual} bytes, expected {expected}")]
    BufferLength { expected: usize, actual: usize },

    #[error("Structuring element size must be odd and non-zero, got {0}")]
    InvalidKernel(usize),

    #[error("Invalid detector configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse configuration from {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Detection worker pool is closed")]
    PoolClosed(#[from] tokio::sync::AcquireError),

    #[error("Detection worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, LogoVisionError>;
