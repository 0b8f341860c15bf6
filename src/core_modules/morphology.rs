// THEORY:
// The `morphology` module cleans binary masks before blobs are extracted.
// Thresholding leaves isolated specks behind wherever a stray pixel happens to
// fall inside a color range; an "opening" (erode, then dilate) removes them
// while larger regions come back at approximately their original extent.
//
// Key properties:
// 1.  **Square Neighborhood**: The structuring element is an odd-sized, all-ones
//     square. Because a square is separable, every pass runs as a horizontal
//     sweep followed by a vertical sweep.
// 2.  **Valid Border Policy**: Neighborhood taps that fall outside the frame are
//     ignored rather than treated as zero, so a fully set mask stays fully set
//     under erosion and regions touching the border are not eaten away.
// 3.  **Per-Color Tuning**: `MorphologyConfig` carries the kernel size and the
//     number of erode and dilate passes. The red mask is the union of two
//     separate thresholds and fragments more, so by default it receives one
//     extra dilate pass.

use crate::core_modules::frame::Frame;
use crate::error::{LogoVisionError, Result};
use serde::{Deserialize, Serialize};

/// An odd-sized, all-ones square neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuringElement {
    size: usize,
}

impl StructuringElement {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(LogoVisionError::InvalidKernel(size));
        }
        Ok(Self { size })
    }

    /// The usual 3x3 neighborhood.
    pub const fn square3() -> Self {
        Self { size: 3 }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn radius(&self) -> usize {
        self.size / 2
    }
}

/// Opening parameters for one color's mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphologyConfig {
    /// Side length of the square structuring element; must be odd.
    pub kernel_size: usize,
    pub erode_iterations: u32,
    pub dilate_iterations: u32,
}

impl Default for MorphologyConfig {
    fn default() -> Self {
        Self {
            kernel_size: 3,
            erode_iterations: 1,
            dilate_iterations: 1,
        }
    }
}

impl MorphologyConfig {
    pub fn structuring_element(&self) -> Result<StructuringElement> {
        StructuringElement::new(self.kernel_size)
    }
}

/// Each output pixel becomes the minimum of its neighborhood.
pub fn erode(src: &Frame, kernel: &StructuringElement) -> Result<Frame> {
    sweep(src, kernel, u8::min)
}

/// Each output pixel becomes the maximum of its neighborhood.
pub fn dilate(src: &Frame, kernel: &StructuringElement) -> Result<Frame> {
    sweep(src, kernel, u8::max)
}

/// Applies `erode_iterations` erosions followed by `dilate_iterations` dilations.
pub fn open(src: &Frame, config: &MorphologyConfig) -> Result<Frame> {
    src.ensure_channels(Frame::MASK_CHANNELS)?;
    let kernel = config.structuring_element()?;

    let mut mask = src.clone();
    for _ in 0..config.erode_iterations {
        mask = erode(&mask, &kernel)?;
    }
    for _ in 0..config.dilate_iterations {
        mask = dilate(&mask, &kernel)?;
    }
    Ok(mask)
}

fn sweep(src: &Frame, kernel: &StructuringElement, pick: fn(u8, u8) -> u8) -> Result<Frame> {
    src.ensure_channels(Frame::MASK_CHANNELS)?;

    let width = src.width() as usize;
    let height = src.height() as usize;
    let radius = kernel.radius();
    if width == 0 || height == 0 {
        return Ok(src.clone());
    }

    // --- 1. Horizontal pass ---
    let source = src.data();
    let mut horizontal = vec![0u8; source.len()];
    for y in 0..height {
        let row = &source[y * width..(y + 1) * width];
        for x in 0..width {
            let first = x.saturating_sub(radius);
            let last = (x + radius).min(width - 1);
            horizontal[y * width + x] = row[first..=last]
                .iter()
                .copied()
                .reduce(pick)
                .unwrap_or(row[x]);
        }
    }

    // --- 2. Vertical pass ---
    let mut dst = Frame::empty_mask(src.width(), src.height());
    let output = dst.data_mut();
    for y in 0..height {
        let first = y.saturating_sub(radius);
        let last = (y + radius).min(height - 1);
        for x in 0..width {
            let mut value = horizontal[first * width + x];
            for row in (first + 1)..=last {
                value = pick(value, horizontal[row * width + x]);
            }
            output[y * width + x] = value;
        }
    }

    Ok(dst)
}
