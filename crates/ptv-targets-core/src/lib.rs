//! Core types for particle-tracking target recognition.
//!
//! This crate is intentionally small. It holds the grayscale image types the
//! detector reads, the [`Target`] record it emits, and the logger used by the
//! binaries. It does *not* know about segmentation parameters or cameras.

mod image;
mod logger;
mod target;

pub use image::{GrayImage, GrayImageView, ImageError};
pub use target::Target;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
