//! Region growing from a single seed.

use std::collections::VecDeque;

use nalgebra::Point2;
use ptv_targets_core::GrayImageView;

use crate::grid::{BoundingBox, ScanWindow, WorkingGrid};
use crate::params::DetectionConfig;

/// Why a grown blob was not emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Rejection {
    TouchesRoi,
    PixelCount(u32),
    Width(u32),
    Height(u32),
    SumIntensity(u64),
}

/// Accumulated statistics of one connected region.
#[derive(Clone, Debug)]
pub(crate) struct Blob {
    pub bbox: BoundingBox,
    pub pixel_count: u32,
    /// Raw grey-value sum.
    sum: u64,
    /// Position sums weighted by `gv - threshold`.
    sum_x: f64,
    sum_y: f64,
}

impl Blob {
    fn seed(x: usize, y: usize, gv: u8, threshold: u32) -> Self {
        let mut blob = Self {
            bbox: BoundingBox::at(x, y),
            pixel_count: 0,
            sum: 0,
            sum_x: 0.0,
            sum_y: 0.0,
        };
        blob.add(x, y, gv, threshold);
        blob
    }

    #[inline]
    fn add(&mut self, x: usize, y: usize, gv: u8, threshold: u32) {
        let w = f64::from(u32::from(gv) - threshold);
        self.bbox.include(x, y);
        self.pixel_count += 1;
        self.sum += u64::from(gv);
        self.sum_x += x as f64 * w;
        self.sum_y += y as f64 * w;
    }

    /// `sum(gv) - pixel_count * threshold`.
    pub fn corrected_sum(&self, threshold: u32) -> u64 {
        self.sum - u64::from(self.pixel_count) * u64::from(threshold)
    }

    /// Weighted centroid in pixel-centre convention.
    pub fn centroid(&self, threshold: u32) -> Point2<f64> {
        let weight = self.corrected_sum(threshold) as f64;
        Point2::new(self.sum_x / weight + 0.5, self.sum_y / weight + 0.5)
    }

    /// Boundary test first, then size, shape and intensity filters.
    pub fn check(&self, window: &ScanWindow, config: &DetectionConfig) -> Result<(), Rejection> {
        if window.touches_edge(&self.bbox) {
            return Err(Rejection::TouchesRoi);
        }
        let n = self.pixel_count;
        if n < config.min_pixels || n > config.max_pixels {
            return Err(Rejection::PixelCount(n));
        }
        let width = self.bbox.width();
        if width < config.min_width || width > config.max_width {
            return Err(Rejection::Width(width));
        }
        let height = self.bbox.height();
        if height < config.min_height || height > config.max_height {
            return Err(Rejection::Height(height));
        }
        let sum = self.corrected_sum(config.threshold);
        if sum <= config.min_sum_intensity {
            return Err(Rejection::SumIntensity(sum));
        }
        Ok(())
    }
}

/// Grow a blob breadth-first from `(x, y)`, claiming pixels in `grid`.
///
/// Membership is tested on the working grid, while the discontinuity
/// reference and the ridge test read the untouched `image`. Swapping either
/// buffer changes which pixels join.
pub(crate) fn grow(
    image: &GrayImageView<'_>,
    grid: &mut WorkingGrid,
    window: &ScanWindow,
    config: &DetectionConfig,
    x: usize,
    y: usize,
) -> Blob {
    let threshold = config.threshold;
    let mut blob = Blob::seed(x, y, grid.at(x, y), threshold);
    grid.claim(x, y);

    let mut frontier = VecDeque::from([(x, y)]);
    while let Some((rx, ry)) = frontier.pop_front() {
        let limit = u32::from(image.at(rx, ry)).saturating_add(config.discontinuity);

        // Ridge test on the reference position; the window margin keeps
        // these reads inside the image.
        let ridge_ok = [(rx - 1, ry), (rx + 1, ry), (rx, ry - 1), (rx, ry + 1)]
            .into_iter()
            .all(|(nx, ny)| u32::from(image.at(nx, ny)) <= limit);
        if !ridge_ok {
            continue;
        }

        for (nx, ny) in [(rx - 1, ry), (rx + 1, ry), (rx, ry - 1), (rx, ry + 1)] {
            if !window.contains(nx, ny) {
                continue;
            }
            let gv = grid.at(nx, ny);
            let value = u32::from(gv);
            if value > threshold && value <= limit {
                grid.claim(nx, ny);
                blob.add(nx, ny, gv, threshold);
                frontier.push_back((nx, ny));
            }
        }
    }
    blob
}
