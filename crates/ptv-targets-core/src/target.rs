use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// One recognised particle image.
///
/// Positions use the pixel-centre convention: the centre of pixel `(i, j)` is
/// at `(i + 0.5, j + 0.5)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Sequential id in seed scan order, starting at 0.
    pub id: usize,
    /// Intensity-weighted sub-pixel centroid.
    pub position: Point2<f64>,
    /// Number of pixels in the region.
    pub pixel_count: u32,
    /// Bounding-box width in pixels.
    pub width: u32,
    /// Bounding-box height in pixels.
    pub height: u32,
    /// Summed intensity above threshold, `sum(gv) - pixel_count * threshold`.
    pub sum_intensity: u64,
}

impl Target {
    #[inline]
    pub fn x(&self) -> f64 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.position.y
    }
}
