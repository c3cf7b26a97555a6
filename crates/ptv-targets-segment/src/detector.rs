use log::{debug, trace};
use ptv_targets_core::{GrayImageView, Target};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::blob::{grow, Rejection};
use crate::error::ConfigurationError;
use crate::grid::{ScanWindow, WorkingGrid};
use crate::params::DetectionConfig;

/// Per-call counters, mostly useful when tuning parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionStats {
    /// Local maxima that started a blob.
    pub seeds: usize,
    /// Blobs emitted as targets.
    pub accepted: usize,
    /// Blobs whose bounding box reached the ROI edge.
    pub rejected_boundary: usize,
    /// Blobs failing the size, shape or intensity filters.
    pub rejected_filters: usize,
}

/// Target detector with a validated configuration.
///
/// The detector holds no per-call state, so one instance can serve several
/// cameras or frames from different threads.
#[derive(Clone, Debug)]
pub struct TargetDetector {
    config: DetectionConfig,
}

impl TargetDetector {
    pub fn new(config: DetectionConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Detect targets in `image`, ordered by the scan position of their seeds.
    pub fn detect(&self, image: &GrayImageView<'_>) -> Vec<Target> {
        self.detect_with_stats(image).0
    }

    /// Same as [`TargetDetector::detect`], also returning per-call counters.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip(self, image),
            fields(width = image.width, height = image.height)
        )
    )]
    pub fn detect_with_stats(&self, image: &GrayImageView<'_>) -> (Vec<Target>, DetectionStats) {
        let mut stats = DetectionStats::default();
        let Some(window) = ScanWindow::clamp(self.config.roi, image.width, image.height) else {
            debug!(
                "empty scan window for {}x{} image, roi={:?}",
                image.width, image.height, self.config.roi
            );
            return (Vec::new(), stats);
        };

        let threshold = self.config.threshold;
        let mut grid = WorkingGrid::copy_of(image);
        let mut targets = Vec::new();

        for y in window.ymin..=window.ymax {
            for x in window.xmin..=window.xmax {
                if u32::from(grid.at(x, y)) <= threshold || !grid.is_local_max(x, y) {
                    continue;
                }
                stats.seeds += 1;

                let blob = grow(image, &mut grid, &window, &self.config, x, y);
                match blob.check(&window, &self.config) {
                    Ok(()) => {
                        targets.push(Target {
                            id: targets.len(),
                            position: blob.centroid(threshold),
                            pixel_count: blob.pixel_count,
                            width: blob.bbox.width(),
                            height: blob.bbox.height(),
                            sum_intensity: blob.corrected_sum(threshold),
                        });
                        stats.accepted += 1;
                    }
                    Err(Rejection::TouchesRoi) => {
                        trace!("seed ({x}, {y}): blob touches roi edge");
                        stats.rejected_boundary += 1;
                    }
                    Err(reason) => {
                        trace!("seed ({x}, {y}): rejected by filter {reason:?}");
                        stats.rejected_filters += 1;
                    }
                }
            }
        }

        debug!(
            "detected {} targets from {} seeds ({} on roi edge, {} filtered)",
            stats.accepted, stats.seeds, stats.rejected_boundary, stats.rejected_filters
        );
        (targets, stats)
    }
}

/// Validate `config` and detect targets in `image`.
///
/// Fails only for an invalid configuration, before any pixel is read.
pub fn detect(
    image: &GrayImageView<'_>,
    config: &DetectionConfig,
) -> Result<Vec<Target>, ConfigurationError> {
    Ok(TargetDetector::new(config.clone())?.detect(image))
}

/// [`detect`] plus per-call counters.
pub fn detect_with_stats(
    image: &GrayImageView<'_>,
    config: &DetectionConfig,
) -> Result<(Vec<Target>, DetectionStats), ConfigurationError> {
    Ok(TargetDetector::new(config.clone())?.detect_with_stats(image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ptv_targets_core::GrayImage;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn detector_is_shareable() {
        assert_send_sync::<TargetDetector>();
        assert_send_sync::<GrayImageView<'static>>();
    }

    #[test]
    fn stats_count_each_outcome() {
        let cfg = DetectionConfig {
            threshold: 10,
            discontinuity: 5,
            min_pixels: 2,
            max_pixels: 100,
            min_width: 1,
            max_width: 10,
            min_height: 1,
            max_height: 10,
            min_sum_intensity: 0,
            roi: None,
        };
        let mut img = GrayImage::new(20, 20);
        img.fill_rect(4, 4, 6, 6, 50); // accepted
        img.set(12, 4, 50); // single pixel, below min_pixels
        img.fill_rect(1, 14, 2, 15, 50); // on the left edge of the window

        let detector = TargetDetector::new(cfg).expect("valid");
        let (targets, stats) = detector.detect_with_stats(&img.view());
        assert_eq!(targets.len(), 1);
        assert_eq!(
            stats,
            DetectionStats {
                seeds: 3,
                accepted: 1,
                rejected_boundary: 1,
                rejected_filters: 1,
            }
        );
    }

    #[test]
    fn tiny_image_yields_nothing() {
        let img = GrayImage::from_raw(2, 2, vec![200; 4]).expect("image");
        let detector = TargetDetector::new(DetectionConfig::default()).expect("valid");
        assert!(detector.detect(&img.view()).is_empty());
    }
}
