// THEORY:
// This file is the main entry point for the `logo_vision` library crate. It
// exports the `LogoDetector` and its configuration as the high-level interface
// of the engine: a decoded BGR frame and a `DetectorConfig` go in, a list of
// logo rectangles comes out. `ParallelDetector` wraps the same detector for
// batches of frames on a tokio runtime.
//
// The stage modules in `core_modules` (color conversion, thresholding,
// morphology, blob extraction, moments, filtering, matching) stay public so
// they can be used and tested on their own, but callers normally never need
// to touch them.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;

pub use config::DetectorConfig;
pub use core_modules::frame::Frame;
pub use error::{LogoVisionError, Result};
pub use parallel_pipeline::ParallelDetector;
pub use pipeline::{Logo, LogoDetector, NoopObserver, PipelineObserver};
