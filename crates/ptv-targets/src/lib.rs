//! High-level facade for the `ptv-targets-*` workspace.
//!
//! This crate provides:
//! - stable re-exports of the core types and the target detector
//! - JSON configuration/report helpers and the legacy per-frame
//!   `_targets` text format ([`io`])
//! - (feature `image`) helpers that decode image files or raw buffers and run
//!   the detector on them ([`detect`])
//! - (feature `cli`) the `ptv-targets` command-line tool
//!
//! ## Quickstart
//!
//! ```no_run
//! use ptv_targets::detect;
//! use ptv_targets::DetectionConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = detect::load_gray("cam1.10001.tif")?;
//! let targets = detect::detect_targets(&img, &DetectionConfig::default())?;
//! println!("found {} targets", targets.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `ptv_targets::core`: image views and the [`Target`] record.
//! - `ptv_targets::segment`: configuration, validation and detection.
//! - `ptv_targets::io`: config/report JSON and legacy target files.
//! - `ptv_targets::detect` (feature `image`): end-to-end helpers from `image::GrayImage`.

pub use ptv_targets_core as core;
pub use ptv_targets_segment as segment;

pub use ptv_targets_core::{GrayImage, GrayImageView, Target};
pub use ptv_targets_segment::{
    ConfigurationError, DetectionConfig, DetectionStats, Roi, TargetDetector,
};

pub mod io;

#[cfg(feature = "image")]
pub mod detect;
