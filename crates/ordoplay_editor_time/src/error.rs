// SPDX-License-Identifier: MIT OR Apache-2.0
//! Errors raised when converting times to and from text.

use thiserror::Error;

/// Time conversion errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimeError {
    /// Text is not of the form `[-]HH:MM:SS[.fraction]`
    #[error("Invalid time string `{0}`")]
    InvalidTimestring(String),

    /// Text is not of the form `HH:MM:SS:FF` or `HH:MM:SS;FF`
    #[error("Invalid timecode `{0}`")]
    InvalidTimecode(String),

    /// Rate that is zero, negative or not finite
    #[error("Invalid rate: {0}")]
    InvalidRate(f64),

    /// Drop-frame timecode requested at a rate other than 29.97 or 59.94
    #[error("Drop-frame timecode is not defined at rate {0}")]
    DropFrameRate(f64),

    /// Timecode cannot express times before zero
    #[error("Negative time of {0} frames has no timecode")]
    NegativeTimecode(i64),
}

/// Result type for time conversions
pub type Result<T> = std::result::Result<T, TimeError>;
