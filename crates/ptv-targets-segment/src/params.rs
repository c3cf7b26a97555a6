use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Inclusive pixel rectangle eligible for detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roi {
    pub xmin: usize,
    pub xmax: usize,
    pub ymin: usize,
    pub ymax: usize,
}

impl Roi {
    pub fn new(xmin: usize, xmax: usize, ymin: usize, ymax: usize) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    /// The whole `width x height` image.
    pub fn full(width: usize, height: usize) -> Self {
        Self::new(0, width.saturating_sub(1), 0, height.saturating_sub(1))
    }
}

/// Parameters for target recognition.
///
/// All `min_*` values must not exceed the matching `max_*`; see
/// [`DetectionConfig::validate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Grey value a pixel must exceed to belong to a target.
    pub threshold: u32,
    /// Largest grey-value rise allowed between a grown pixel and its reference.
    pub discontinuity: u32,
    /// Pixel count bounds (inclusive).
    pub min_pixels: u32,
    pub max_pixels: u32,
    /// Bounding-box width bounds (inclusive).
    pub min_width: u32,
    pub max_width: u32,
    /// Bounding-box height bounds (inclusive).
    pub min_height: u32,
    pub max_height: u32,
    /// Threshold-corrected intensity sum must be strictly greater than this.
    pub min_sum_intensity: u64,
    /// Region of interest; `None` scans the whole image.
    pub roi: Option<Roi>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold: 40,
            discontinuity: 100,
            min_pixels: 4,
            max_pixels: 500,
            min_width: 2,
            max_width: 100,
            min_height: 2,
            max_height: 100,
            min_sum_intensity: 100,
            roi: None,
        }
    }
}

impl DetectionConfig {
    /// Reject configurations with any inverted min/max pair.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        check_bounds("pixel count", self.min_pixels.into(), self.max_pixels.into())?;
        check_bounds("width", self.min_width.into(), self.max_width.into())?;
        check_bounds("height", self.min_height.into(), self.max_height.into())?;
        if let Some(roi) = self.roi {
            if roi.xmin > roi.xmax {
                return Err(ConfigurationError::InvertedRoi {
                    axis: 'x',
                    min: roi.xmin,
                    max: roi.xmax,
                });
            }
            if roi.ymin > roi.ymax {
                return Err(ConfigurationError::InvertedRoi {
                    axis: 'y',
                    min: roi.ymin,
                    max: roi.ymax,
                });
            }
        }
        Ok(())
    }
}

fn check_bounds(name: &'static str, min: u64, max: u64) -> Result<(), ConfigurationError> {
    if min > max {
        return Err(ConfigurationError::InvertedBounds { name, min, max });
    }
    Ok(())
}
