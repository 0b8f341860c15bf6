// THEORY:
// `DetectorConfig` is the single immutable value that tunes the detector. It is
// decoded once at the boundary (from a JSON document or built in code), checked
// by `validate`, and then handed to the detector which never looks at documents
// itself.
//
// The JSON layout is flat: one key per setting, every range written as
// `{ "min": ..., "max": ... }`. Morphology keys are optional and fall back to
// the built-in tuning when absent, so documents written for older detectors
// still load.
//
// Red hue wraps around zero. The red color range is therefore stored as one
// range whose hue minimum is larger than its hue maximum; the detector splits
// it into two boxes before thresholding.

use crate::core_modules::blob_filter::{BlobAreaRange, HuMomentRange, ValueRange};
use crate::core_modules::morphology::{MorphologyConfig, StructuringElement};
use crate::core_modules::threshold::ColorRange;
use crate::error::{LogoVisionError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up next to an input image when no config is given.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    pub blue_range: ColorRange,
    pub blue_blob_area_range: BlobAreaRange,
    pub blue_blob_hu0_range: HuMomentRange,
    pub blue_blob_hu1_range: HuMomentRange,
    #[serde(default = "default_blue_morphology")]
    pub blue_morphology: MorphologyConfig,

    pub red_range: ColorRange,
    pub red_blob_area_range: BlobAreaRange,
    pub red_blob_hu0_range: HuMomentRange,
    pub red_blob_hu1_range: HuMomentRange,
    #[serde(default = "default_red_morphology")]
    pub red_morphology: MorphologyConfig,

    /// Largest accepted distance, in pixels, between a red and a blue center.
    pub max_blobs_centers_distance: f64,
}

/// Everything the detector needs to segment and filter one color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorProfile {
    pub name: &'static str,
    pub color_range: ColorRange,
    pub area_range: BlobAreaRange,
    pub hu0_range: HuMomentRange,
    pub hu1_range: HuMomentRange,
    pub morphology: MorphologyConfig,
}

fn default_blue_morphology() -> MorphologyConfig {
    MorphologyConfig::default()
}

fn default_red_morphology() -> MorphologyConfig {
    MorphologyConfig {
        dilate_iterations: 2,
        ..MorphologyConfig::default()
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            blue_range: ColorRange::new([100, 75, 0], [130, 255, 255]),
            blue_blob_area_range: ValueRange::new(200, 2500),
            blue_blob_hu0_range: ValueRange::new(0.30, 0.45),
            blue_blob_hu1_range: ValueRange::new(0.05, 0.15),
            blue_morphology: default_blue_morphology(),

            red_range: ColorRange::new([165, 75, 75], [10, 255, 255]),
            red_blob_area_range: ValueRange::new(500, 3000),
            red_blob_hu0_range: ValueRange::new(0.18, 0.20),
            red_blob_hu1_range: ValueRange::new(0.006, 0.015),
            red_morphology: default_red_morphology(),

            max_blobs_centers_distance: 30.0,
        }
    }
}

impl DetectorConfig {
    /// Decodes and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, decodes and validates a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config: Self =
            serde_json::from_str(&contents).map_err(|source| LogoVisionError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// `config.json` in the directory holding `image_path`.
    pub fn sibling_path(image_path: impl AsRef<Path>) -> PathBuf {
        let directory = image_path
            .as_ref()
            .parent()
            .unwrap_or_else(|| Path::new(""));
        directory.join(DEFAULT_CONFIG_FILE_NAME)
    }

    pub fn blue_profile(&self) -> ColorProfile {
        ColorProfile {
            name: "blue",
            color_range: self.blue_range,
            area_range: self.blue_blob_area_range,
            hu0_range: self.blue_blob_hu0_range,
            hu1_range: self.blue_blob_hu1_range,
            morphology: self.blue_morphology,
        }
    }

    pub fn red_profile(&self) -> ColorProfile {
        ColorProfile {
            name: "red",
            color_range: self.red_range,
            area_range: self.red_blob_area_range,
            hu0_range: self.red_blob_hu0_range,
            hu1_range: self.red_blob_hu1_range,
            morphology: self.red_morphology,
        }
    }

    /// Rejects settings the detector cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.blue_profile().validate()?;
        self.red_profile().validate()?;

        let distance = self.max_blobs_centers_distance;
        if !distance.is_finite() || distance < 0.0 {
            return Err(LogoVisionError::InvalidConfig(format!(
                "max_blobs_centers_distance must be finite and non-negative, got {distance}"
            )));
        }
        Ok(())
    }
}

impl ColorProfile {
    fn validate(&self) -> Result<()> {
        let range = &self.color_range;
        if range.min[0] > ColorRange::HUE_LIMIT || range.max[0] > ColorRange::HUE_LIMIT {
            return Err(self.invalid(format!(
                "hue bounds must not exceed {}, got {}..{}",
                ColorRange::HUE_LIMIT,
                range.min[0],
                range.max[0]
            )));
        }
        for (channel, label) in [(1, "saturation"), (2, "value")] {
            if range.min[channel] > range.max[channel] {
                return Err(self.invalid(format!(
                    "{label} minimum {} exceeds maximum {}",
                    range.min[channel], range.max[channel]
                )));
            }
        }

        if !self.area_range.is_ordered() {
            return Err(self.invalid(format!(
                "area range {}..{} is reversed",
                self.area_range.min, self.area_range.max
            )));
        }
        for (range, label) in [(&self.hu0_range, "hu0"), (&self.hu1_range, "hu1")] {
            if !range.is_ordered() {
                return Err(self.invalid(format!(
                    "{label} range {}..{} is reversed or not a number",
                    range.min, range.max
                )));
            }
        }

        StructuringElement::new(self.morphology.kernel_size)?;
        Ok(())
    }

    fn invalid(&self, reason: String) -> LogoVisionError {
        LogoVisionError::InvalidConfig(format!("{}: {reason}", self.name))
    }
}
