// THEORY:
// The `threshold` module turns an HSV frame into binary masks. A `ColorRange`
// is an inclusive box in HSV space; a pixel is marked (255) when all three of
// its channels fall inside the box, and cleared (0) otherwise.
//
// Red is the awkward color: its hues sit on both sides of zero (roughly 0..10
// and 165..180 on the half-degree scale). A `ColorRange` whose hue minimum is
// greater than its hue maximum therefore denotes a range that wraps around,
// and `split_hue_wraparound` turns it into the two plain boxes that are
// thresholded separately and OR-ed together.

use crate::core_modules::frame::Frame;
use crate::error::{LogoVisionError, Result};
use serde::{Deserialize, Serialize};

/// An inclusive per-channel acceptance box in HSV space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRange {
    pub min: [u8; 3],
    pub max: [u8; 3],
}

impl ColorRange {
    /// Upper end of the half-degree hue scale.
    pub const HUE_LIMIT: u8 = 180;

    pub const fn new(min: [u8; 3], max: [u8; 3]) -> Self {
        Self { min, max }
    }

    /// Whether all three samples lie within their inclusive bounds.
    #[inline]
    pub fn contains(&self, pixel: &[u8]) -> bool {
        pixel
            .iter()
            .zip(self.min.iter().zip(self.max.iter()))
            .all(|(value, (min, max))| min <= value && value <= max)
    }

    /// True when the hue bounds run "backwards" through zero.
    pub fn wraps_hue(&self) -> bool {
        self.min[0] > self.max[0]
    }

    /// Splits a wrapping range into `[min_hue, 180]` and `[0, max_hue]`.
    /// A non-wrapping range is returned unchanged.
    pub fn split_hue_wraparound(&self) -> Vec<ColorRange> {
        if !self.wraps_hue() {
            return vec![*self];
        }

        let upper = ColorRange::new(
            self.min,
            [Self::HUE_LIMIT, self.max[1], self.max[2]],
        );
        let lower = ColorRange::new([0, self.min[1], self.min[2]], self.max);
        vec![lower, upper]
    }
}

/// Thresholds `src` into a freshly allocated mask. See [`threshold_into`].
pub fn threshold(src: &Frame, ranges: &[ColorRange]) -> Result<Frame> {
    let mut dst = Frame::empty_mask(src.width(), src.height());
    threshold_into(src, &mut dst, ranges)?;
    Ok(dst)
}

/// Marks every pixel of `src` that falls inside any of `ranges`.
pub fn threshold_into(src: &Frame, dst: &mut Frame, ranges: &[ColorRange]) -> Result<()> {
    src.ensure_channels(Frame::COLOR_CHANNELS)?;
    dst.ensure_channels(Frame::MASK_CHANNELS)?;
    src.ensure_same_size(dst)?;

    for (pixel, target) in src.data().chunks_exact(3).zip(dst.data_mut().iter_mut()) {
        let in_range = ranges.iter().any(|range| range.contains(pixel));
        *target = if in_range { Frame::MASK_SET } else { 0 };
    }

    Ok(())
}

/// Per-sample bitwise OR of two equally shaped frames.
pub fn bitwise_or(first: &Frame, second: &Frame) -> Result<Frame> {
    first.ensure_same_size(second)?;
    if first.channels() != second.channels() {
        return Err(LogoVisionError::ChannelMismatch {
            expected: first.channels(),
            actual: second.channels(),
        });
    }

    let data = first
        .data()
        .iter()
        .zip(second.data())
        .map(|(a, b)| a | b)
        .collect();
    Frame::new(first.width(), first.height(), first.channels(), data)
}
