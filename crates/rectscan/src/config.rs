use std::{fs, path::Path};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    accumulator::AccumulatorScope,
    error::{RectError, Result},
    overlay::MAX_STROKE_WIDTH,
};

/// Largest side accepted for the flattened paper image
pub const MAX_RECTIFIED_SIDE: u32 = 8192;

/// Tuning for the whole detection run
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct DetectorConfig {
    #[schemars(description = "Median filter window extent in pixels (odd)")]
    pub median_window: u32,
    #[schemars(description = "Canny hysteresis low threshold")]
    pub canny_low: f32,
    #[schemars(description = "Canny hysteresis high threshold")]
    pub canny_high: f32,
    #[schemars(description = "Dilation radius applied to the edge mask")]
    pub dilation_radius: u8,
    #[schemars(
        description = "Number of threshold levels; level 0 is edge based, the rest are intensity cuts",
        range(min = 1, max = 255)
    )]
    pub threshold_levels: u32,
    #[schemars(description = "Polygon approximation tolerance as a fraction of contour perimeter")]
    pub approx_epsilon_ratio: f64,
    #[schemars(description = "Candidates must have an area strictly above this")]
    pub min_area: f64,
    #[schemars(description = "Candidates must have every corner cosine strictly below this")]
    pub max_cosine: f64,
    pub accumulator_scope: AccumulatorScope,
    pub overlay: OverlayStyle,
    pub white: WhiteDefinition,
    #[schemars(description = "Output size of the flattened paper image")]
    pub rectified: RectifiedSize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            median_window: 9,
            canny_low: 10.0,
            canny_high: 20.0,
            dilation_radius: 1,
            threshold_levels: 2,
            approx_epsilon_ratio: 0.02,
            min_area: 1000.0,
            max_cosine: 0.3,
            accumulator_scope: AccumulatorScope::Run,
            overlay: OverlayStyle::default(),
            white: WhiteDefinition::default(),
            rectified: RectifiedSize::default(),
        }
    }
}

/// How detections are drawn over the source image
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct OverlayStyle {
    pub color: [u8; 3],
    pub paper_color: [u8; 3],
    pub stroke_width: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: [0, 255, 0],
            paper_color: [255, 0, 0],
            stroke_width: 3,
        }
    }
}

/// A pixel is white when its saturation is below `saturation`
/// and its brightness is above `brightness` (both in 0..=1)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct WhiteDefinition {
    pub saturation: f32,
    pub brightness: f32,
}

impl Default for WhiteDefinition {
    fn default() -> Self {
        Self {
            saturation: 0.3,
            brightness: 0.5,
        }
    }
}

/// Pixel size of the flattened paper image
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct RectifiedSize {
    pub width: u32,
    pub height: u32,
}

impl Default for RectifiedSize {
    fn default() -> Self {
        // A4 portrait proportions
        Self {
            width: 1000,
            height: 1414,
        }
    }
}

impl DetectorConfig {
    /// JSON schema of the configuration file
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(DetectorConfig)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(RectError::InvalidConfig(msg));

        if self.median_window == 0 || self.median_window % 2 == 0 {
            return invalid(format!("median_window must be odd, got {}", self.median_window));
        }
        if !(self.canny_low >= 0.0 && self.canny_low <= self.canny_high) {
            return invalid(format!(
                "canny thresholds must satisfy 0 <= low <= high, got {} / {}",
                self.canny_low, self.canny_high
            ));
        }
        if !(1..=255).contains(&self.threshold_levels) {
            return invalid(format!("threshold_levels must be in 1..=255, got {}", self.threshold_levels));
        }
        if !(self.approx_epsilon_ratio > 0.0) {
            return invalid(format!(
                "approx_epsilon_ratio must be positive, got {}",
                self.approx_epsilon_ratio
            ));
        }
        if !(self.min_area >= 0.0) {
            return invalid(format!("min_area must be non-negative, got {}", self.min_area));
        }
        if !(self.max_cosine > 0.0 && self.max_cosine <= 1.0) {
            return invalid(format!("max_cosine must be in (0, 1], got {}", self.max_cosine));
        }
        if !(1..=MAX_STROKE_WIDTH).contains(&self.overlay.stroke_width) {
            return invalid(format!(
                "overlay.stroke_width must be in 1..={}, got {}",
                MAX_STROKE_WIDTH, self.overlay.stroke_width
            ));
        }
        let RectifiedSize { width, height } = self.rectified;
        if !(2..=MAX_RECTIFIED_SIDE).contains(&width) || !(2..=MAX_RECTIFIED_SIDE).contains(&height) {
            return invalid(format!(
                "rectified size must be in 2..={} per side, got {}x{}",
                MAX_RECTIFIED_SIDE, width, height
            ));
        }
        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: DetectorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load configuration from a JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        let config: DetectorConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path_ref),
            Some("json") => Self::from_json_file(path_ref),
            _ => Err(RectError::InvalidConfig(format!(
                "unsupported config format for {}; use .toml or .json",
                path_ref.display()
            ))),
        }
    }
}
