// THEORY:
// The `Frame` module is the raw data container of the vision engine. A `Frame`
// is a contiguous, row-major buffer of 8-bit samples with either three channels
// (a color image, stored blue/green/red, or hue/saturation/value after
// conversion) or one channel (a binary mask, 0 or 255).
//
// Key architectural principles:
// 1.  **Dumb Container**: Like the pixel and blob types, a `Frame` knows how to
//     index itself and validate its own shape, nothing more. All analysis lives
//     in the stage modules that consume it.
// 2.  **Explicit Preconditions**: Every stage checks the channel count and
//     dimensions it needs through the `ensure_*` helpers and reports a
//     `LogoVisionError` instead of reinterpreting malformed data.
// 3.  **Boundary Conversions**: The `image` crate only knows RGB ordering, so the
//     conversions to and from `RgbImage`/`GrayImage` swap channels here, once,
//     at the edge of the library.

use crate::error::{LogoVisionError, Result};
use image::{GrayImage, Luma, Rgb, RgbImage};

/// A rectangular buffer of 8-bit samples with 1 or 3 interleaved channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl Frame {
    /// Channel count of a color (BGR or HSV) frame.
    pub const COLOR_CHANNELS: u8 = 3;
    /// Channel count of a binary mask.
    pub const MASK_CHANNELS: u8 = 1;
    /// Value of a set pixel in a binary mask.
    pub const MASK_SET: u8 = 255;

    /// Wraps an existing buffer, validating its channel count and length.
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        if channels != Self::COLOR_CHANNELS && channels != Self::MASK_CHANNELS {
            return Err(LogoVisionError::ChannelMismatch {
                expected: Self::COLOR_CHANNELS,
                actual: channels,
            });
        }

        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(LogoVisionError::BufferLength {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Creates a frame with every sample set to `value`.
    pub fn filled(width: u32, height: u32, channels: u8, value: u8) -> Self {
        let len = width as usize * height as usize * channels as usize;
        Self {
            width,
            height,
            channels,
            data: vec![value; len],
        }
    }

    /// Creates an all-zero frame.
    pub fn zeros(width: u32, height: u32, channels: u8) -> Self {
        Self::filled(width, height, channels, 0)
    }

    /// Creates an empty (all clear) binary mask.
    pub fn empty_mask(width: u32, height: u32) -> Self {
        Self::zeros(width, height, Self::MASK_CHANNELS)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels as usize
    }

    /// All channel samples of the pixel at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let start = self.offset(x, y);
        &self.data[start..start + self.channels as usize]
    }

    /// Overwrites all channel samples of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the frame or `samples` holds fewer
    /// entries than the frame has channels. Extra samples are ignored.
    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, samples: &[u8]) {
        let start = self.offset(x, y);
        let channels = self.channels as usize;
        self.data[start..start + channels].copy_from_slice(&samples[..channels]);
    }

    /// First channel sample at `(x, y)`; the whole pixel for a mask.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[self.offset(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        let offset = self.offset(x, y);
        self.data[offset] = value;
    }

    #[inline]
    pub fn is_set(&self, x: u32, y: u32) -> bool {
        self.get(x, y) != 0
    }

    /// Whether `(x, y)` (possibly negative) lies inside the frame.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    /// Paints every pixel of a rectangle with `samples`, clipped to the frame.
    ///
    /// # Panics
    ///
    /// Panics if the clipped rectangle is not empty and `samples` holds fewer
    /// entries than the frame has channels.
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, samples: &[u8]) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for row in y..y_end {
            for column in x..x_end {
                self.put_pixel(column, row, samples);
            }
        }
    }

    /// Number of non-zero samples, i.e. the set pixel count of a mask.
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    pub fn ensure_channels(&self, expected: u8) -> Result<()> {
        if self.channels != expected {
            return Err(LogoVisionError::ChannelMismatch {
                expected,
                actual: self.channels,
            });
        }
        Ok(())
    }

    pub fn ensure_same_size(&self, other: &Frame) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(LogoVisionError::SizeMismatch {
                expected: self.dimensions(),
                actual: other.dimensions(),
            });
        }
        Ok(())
    }

    pub fn ensure_non_empty(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(LogoVisionError::EmptyFrame {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Converts a decoded RGB image into a BGR color frame.
    pub fn from_rgb_image(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for Rgb([red, green, blue]) in image.pixels() {
            data.extend_from_slice(&[*blue, *green, *red]);
        }
        Self {
            width,
            height,
            channels: Self::COLOR_CHANNELS,
            data,
        }
    }

    /// Wraps a grayscale image as a mask without thresholding it.
    pub fn from_gray_image(image: &GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            channels: Self::MASK_CHANNELS,
            data: image.as_raw().clone(),
        }
    }

    /// Renders the frame as RGB: BGR frames are swapped back, masks are replicated.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let samples = self.pixel(x, y);
            match samples {
                [blue, green, red] => Rgb([*red, *green, *blue]),
                [value] => Rgb([*value, *value, *value]),
                _ => Rgb([0, 0, 0]),
            }
        })
    }

    /// Renders a mask as a grayscale image.
    pub fn to_gray_image(&self) -> Result<GrayImage> {
        self.ensure_channels(Self::MASK_CHANNELS)?;
        Ok(GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([self.get(x, y)])
        }))
    }
}
