//! Error types for region splitting.
//!
//! Every failure is a validation failure on the caller's parameters and is
//! raised before the foreground mask is built.

/// Errors returned by the region-splitting pipeline.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SplitError {
    #[error("background color must be in #RGB, #RRGGBB or #RRRGGGBBB format (got {value:?})")]
    InvalidColorFormat { value: String },
    #[error("point-sample background mode requires a sample coordinate")]
    MissingSampleCoordinate,
    #[error("no image selected, or the selection is not an image")]
    EmptySelectionOrWrongType,
    #[error("unknown background mode {name:?} (expected border, manual or pick)")]
    InvalidMode { name: String },
    #[error("raster must have shape (height, width, 4) with non-zero size (got {height}x{width}x{channels})")]
    InvalidShape {
        height: usize,
        width: usize,
        channels: usize,
    },
}

pub type Result<T> = std::result::Result<T, SplitError>;
