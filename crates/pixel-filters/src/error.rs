//! Errors reported by the filter crate.

use std::fmt;

/// Error returned by scratch-backed kernels and filter name parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The line scratch is narrower than the image being filtered.
    ScratchTooSmall {
        /// Width the kernel needs
        required: usize,
        /// Width the scratch was sized for
        available: usize,
    },
    /// A filter name did not match any [`crate::FilterKind`].
    UnknownFilter(String),
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::ScratchTooSmall {
                required,
                available,
            } => write!(
                f,
                "line scratch too small: image is {} pixels wide, scratch holds {}",
                required, available
            ),
            FilterError::UnknownFilter(name) => write!(f, "unknown filter: {}", name),
        }
    }
}

impl std::error::Error for FilterError {}
