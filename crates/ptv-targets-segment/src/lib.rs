//! Target (particle image) recognition by peak-seeded region growing.
//!
//! The detector scans a pre-filtered grayscale image in row-major order,
//! accepts local maxima above a grey-value threshold as seeds, grows each seed
//! over its 4-connected neighbours under a discontinuity constraint, and
//! reduces every accepted region to an intensity-weighted sub-pixel centroid.
//!
//! Output order is part of the contract: target ids follow the scan order of
//! the seeds, and flat plateaus are seeded at their first-scanned pixel.
//! Correspondence and tracking stages downstream rely on that ordering.
//!
//! ```
//! use ptv_targets_core::GrayImage;
//! use ptv_targets_segment::{detect, DetectionConfig, Roi};
//!
//! let mut img = GrayImage::new(20, 20);
//! img.fill_rect(5, 5, 7, 7, 50);
//!
//! let config = DetectionConfig {
//!     threshold: 10,
//!     discontinuity: 5,
//!     min_pixels: 1,
//!     max_pixels: 100,
//!     min_width: 1,
//!     max_width: 10,
//!     min_height: 1,
//!     max_height: 10,
//!     min_sum_intensity: 0,
//!     roi: Some(Roi::new(1, 18, 1, 18)),
//! };
//!
//! let targets = detect(&img.view(), &config).expect("valid config");
//! assert_eq!(targets.len(), 1);
//! assert_eq!(targets[0].sum_intensity, 360);
//! ```

mod blob;
mod detector;
mod error;
mod grid;
mod params;

pub use detector::{detect, detect_with_stats, DetectionStats, TargetDetector};
pub use error::ConfigurationError;
pub use params::{DetectionConfig, Roi};
