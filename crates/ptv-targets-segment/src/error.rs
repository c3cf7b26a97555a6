/// Structurally invalid detection parameters.
///
/// Raised before any pixel is scanned. Image content never produces an error.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("{name}: minimum {min} exceeds maximum {max}")]
    InvertedBounds {
        name: &'static str,
        min: u64,
        max: u64,
    },
    #[error("region of interest: {axis} range is inverted ({min} > {max})")]
    InvertedRoi { axis: char, min: usize, max: usize },
}
