// THEORY:
// The `pipeline` module is the top-level API of the detection engine. It wires
// the core modules into one fixed sequence and hides them behind a single call:
// a BGR frame goes in, a list of logo rectangles comes out.
//
//   BGR -> HSV -> threshold (blue, red x2 OR-ed) -> opening -> blobs
//       -> area filter -> Hu filter -> red/blue matching -> logos
//
// The detector holds nothing but its validated configuration and an observer,
// so it can be shared freely between threads. Every call allocates its own
// working masks. Observers receive each intermediate image as it is produced;
// they are the hook for debugging dumps and never influence the result.

use crate::config::{ColorProfile, DetectorConfig};
use crate::core_modules::blob_detector::blob_detector;
use crate::core_modules::blob_filter::{self, ShapedBlob};
use crate::core_modules::blob_matcher::match_blobs;
use crate::core_modules::frame::Frame;
use crate::core_modules::morphology;
use crate::core_modules::pixel::pixel;
use crate::core_modules::smart_blob::render_blobs;
use crate::core_modules::threshold::{bitwise_or, threshold};
use crate::error::Result;
use image::RgbImage;
use std::sync::Arc;
use tracing::debug;

// Re-export key data structures for the public API.
pub use crate::core_modules::blob_matcher::Logo;

/// Receives the intermediate images of a detection call.
pub trait PipelineObserver: Send + Sync {
    fn on_intermediate_result(&self, stage: &str, image: &Frame);

    /// Stages that only exist for observers (rendered blob masks) are skipped
    /// when this returns false.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {
    fn on_intermediate_result(&self, _stage: &str, _image: &Frame) {}

    fn is_enabled(&self) -> bool {
        false
    }
}

/// The main, top-level struct for the detection engine.
#[derive(Clone)]
pub struct LogoDetector {
    config: DetectorConfig,
    observer: Arc<dyn PipelineObserver>,
}

impl std::fmt::Debug for LogoDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogoDetector")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LogoDetector {
    /// Validates `config` and builds a detector with no observer.
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            observer: Arc::new(NoopObserver),
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Convenience entry point for decoded RGB images.
    pub fn find_logos_in_image(&self, image: &RgbImage) -> Result<Vec<Logo>> {
        self.find_logos(&Frame::from_rgb_image(image))
    }

    /// Runs the full pipeline on a 3-channel BGR frame.
    pub fn find_logos(&self, bgr: &Frame) -> Result<Vec<Logo>> {
        bgr.ensure_non_empty()?;
        bgr.ensure_channels(Frame::COLOR_CHANNELS)?;

        // Stage 1: Color Space Conversion
        let hsv = pixel::bgr_to_hsv(bgr)?;
        self.observer.on_intermediate_result("hsv", &hsv);

        // Stages 2-5 run independently per color.
        let blue_blobs = self.find_color_blobs(&hsv, &self.config.blue_profile())?;
        let red_blobs = self.find_color_blobs(&hsv, &self.config.red_profile())?;

        // Stage 6: Red/Blue Matching
        let logos = match_blobs(
            red_blobs.iter().map(|shaped| &shaped.blob),
            blue_blobs.iter().map(|shaped| &shaped.blob),
            self.config.max_blobs_centers_distance,
        );
        debug!(
            red = red_blobs.len(),
            blue = blue_blobs.len(),
            logos = logos.len(),
            "matched blobs"
        );

        Ok(logos)
    }

    fn find_color_blobs(&self, hsv: &Frame, profile: &ColorProfile) -> Result<Vec<ShapedBlob>> {
        let color = profile.name;

        // Stage 2: Thresholding
        // A wrapping hue range is thresholded as two boxes and the masks OR-ed.
        let mut mask = Frame::empty_mask(hsv.width(), hsv.height());
        for range in profile.color_range.split_hue_wraparound() {
            let partial = threshold(hsv, &[range])?;
            mask = bitwise_or(&mask, &partial)?;
        }
        debug!(color, pixels = mask.count_nonzero(), "thresholded mask");
        self.observer
            .on_intermediate_result(&format!("{color}_mask"), &mask);

        // Stage 3: Denoising
        let mut denoised = morphology::open(&mask, &profile.morphology)?;
        debug!(color, pixels = denoised.count_nonzero(), "opened mask");
        self.observer
            .on_intermediate_result(&format!("{color}_mask_denoised"), &denoised);

        // Stage 4: Blob Extraction (consumes the denoised mask)
        let blobs = blob_detector::find_blobs(&mut denoised)?;
        let extracted = blobs.len();

        // Stage 5: Filtering
        let blobs = blob_filter::filter_by_area(blobs, &profile.area_range);
        let by_area = blobs.len();
        let shaped = blob_filter::filter_by_hu_moments(
            blob_filter::shape_blobs(blobs),
            &profile.hu0_range,
            &profile.hu1_range,
        );
        debug!(
            color,
            extracted,
            by_area,
            by_shape = shaped.len(),
            "filtered blobs"
        );

        if self.observer.is_enabled() {
            let survivors = render_blobs(
                shaped.iter().map(|shaped| &shaped.blob),
                hsv.width(),
                hsv.height(),
            );
            self.observer
                .on_intermediate_result(&format!("{color}_blobs"), &survivors);
        }

        Ok(shaped)
    }
}
