use std::path::Path;

use ptv_targets_core::Target;
use ptv_targets_segment::{ConfigurationError, DetectionConfig, DetectionStats, TargetDetector};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::core;

/// Errors produced by the high-level facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("invalid grayscale image buffer length (expected {expected} bytes, got {got})")]
    InvalidGrayBuffer { expected: usize, got: usize },

    #[error("invalid grayscale image dimensions (width={width}, height={height})")]
    InvalidGrayDimensions { width: u32, height: u32 },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Image(#[from] ::image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convert an `image::GrayImage` into the lightweight `ptv-targets-core` view type.
pub fn gray_view(img: &::image::GrayImage) -> core::GrayImageView<'_> {
    core::GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Decode an image file and convert it to 8-bit luma.
pub fn load_gray(path: impl AsRef<Path>) -> Result<::image::GrayImage, DetectError> {
    Ok(::image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?
        .to_luma8())
}

/// Run target recognition on an `image::GrayImage`.
pub fn detect_targets(
    img: &::image::GrayImage,
    config: &DetectionConfig,
) -> Result<Vec<Target>, DetectError> {
    Ok(detect_targets_with_stats(img, config)?.0)
}

/// [`detect_targets`] plus per-call counters.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, config), fields(width = img.width(), height = img.height()))
)]
pub fn detect_targets_with_stats(
    img: &::image::GrayImage,
    config: &DetectionConfig,
) -> Result<(Vec<Target>, DetectionStats), DetectError> {
    let detector = TargetDetector::new(config.clone())?;
    Ok(detector.detect_with_stats(&gray_view(img)))
}

/// Build an `image::GrayImage` from a raw grayscale buffer.
pub fn gray_image_from_slice(
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<::image::GrayImage, DetectError> {
    let w = usize::try_from(width).ok();
    let h = usize::try_from(height).ok();
    let Some((w, h)) = w.zip(h) else {
        return Err(DetectError::InvalidGrayDimensions { width, height });
    };
    let Some(expected) = w.checked_mul(h) else {
        return Err(DetectError::InvalidGrayDimensions { width, height });
    };
    if pixels.len() != expected {
        return Err(DetectError::InvalidGrayBuffer {
            expected,
            got: pixels.len(),
        });
    }
    ::image::GrayImage::from_raw(width, height, pixels.to_vec())
        .ok_or(DetectError::InvalidGrayDimensions { width, height })
}

pub fn detect_targets_from_gray_u8(
    width: u32,
    height: u32,
    pixels: &[u8],
    config: &DetectionConfig,
) -> Result<Vec<Target>, DetectError> {
    let img = gray_image_from_slice(width, height, pixels)?;
    detect_targets(&img, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Roi;
    use approx::assert_abs_diff_eq;

    fn scenario_pixels() -> Vec<u8> {
        let mut pixels = vec![0u8; 20 * 20];
        for y in 5..=7 {
            for x in 5..=7 {
                pixels[y * 20 + x] = 50;
            }
        }
        pixels
    }

    fn scenario_config() -> DetectionConfig {
        DetectionConfig {
            threshold: 10,
            discontinuity: 5,
            min_pixels: 1,
            max_pixels: 100,
            min_width: 1,
            max_width: 10,
            min_height: 1,
            max_height: 10,
            min_sum_intensity: 0,
            roi: Some(Roi::new(1, 18, 1, 18)),
        }
    }

    #[test]
    fn detects_from_raw_buffer() {
        let targets = detect_targets_from_gray_u8(20, 20, &scenario_pixels(), &scenario_config())
            .expect("detect");
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].sum_intensity, 360);
        assert_abs_diff_eq!(targets[0].x(), 6.5, epsilon = 1e-12);
    }

    #[test]
    fn rejects_wrong_buffer_length() {
        let err = detect_targets_from_gray_u8(20, 19, &scenario_pixels(), &scenario_config())
            .unwrap_err();
        assert!(matches!(
            err,
            DetectError::InvalidGrayBuffer {
                expected: 380,
                got: 400
            }
        ));
    }

    #[test]
    fn configuration_error_passes_through() {
        let config = DetectionConfig {
            min_width: 9,
            max_width: 3,
            ..scenario_config()
        };
        let err = detect_targets_from_gray_u8(20, 20, &scenario_pixels(), &config).unwrap_err();
        assert!(matches!(err, DetectError::Configuration(_)));
    }
}
