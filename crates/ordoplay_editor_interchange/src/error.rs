// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error type shared by the interchange data model, registry and codec.

use crate::value::ValueKind;
use ordoplay_editor_time::{RationalTime, TimeError, TimeRange};
use thiserror::Error;

/// Interchange errors
#[derive(Debug, Error)]
pub enum InterchangeError {
    /// A value was read as a variant it does not hold
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Requested variant
        expected: ValueKind,
        /// Variant actually stored
        found: ValueKind,
    },

    /// A schema field holds a value of the wrong variant
    #[error("Field `{key}` of {schema}: expected {expected}, found {found}")]
    FieldTypeMismatch {
        /// Schema being read
        schema: String,
        /// Offending field
        key: String,
        /// Variant the schema declares
        expected: ValueKind,
        /// Variant found in the payload
        found: ValueKind,
    },

    /// Dictionary key not present
    #[error("Key not found: {key}")]
    NotFound {
        /// Missing key
        key: String,
    },

    /// Time outside the available range of a media reference
    #[error("Time {time} is outside the available range {}", format_range(.range))]
    TimeOutOfRange {
        /// Requested time
        time: RationalTime,
        /// Available range, if any was set
        range: Option<TimeRange>,
    },

    /// Image number outside `0..count`
    #[error("Image number {image_number} out of range: sequence has {count} images")]
    ImageNumberOutOfRange {
        /// Requested image number
        image_number: i64,
        /// Number of images in the sequence
        count: i64,
    },

    /// Frame step of zero used in frame arithmetic
    #[error("Invalid frame step: 0")]
    InvalidFrameStep,

    /// Frame number of an image does not fit in an `i64`
    #[error(
        "Frame number of image {image_number} overflows: start frame {start_frame}, step {frame_step}"
    )]
    FrameNumberOverflow {
        /// Requested image number
        image_number: i64,
        /// First frame number of the sequence
        start_frame: i64,
        /// Frame step of the sequence
        frame_step: i64,
    },

    /// No registered schema matches a name and version.
    ///
    /// The decoder turns this into an `UnknownSchema`; it is never
    /// returned from decoding.
    #[error("Schema not registered: {name}.{version}")]
    SchemaResolution {
        /// Schema name
        name: String,
        /// Schema version
        version: i64,
    },

    /// Object graph contains a reference cycle and cannot be written as a tree
    #[error("Cyclic reference through {schema} cannot be serialized")]
    CyclicReference {
        /// Schema of the object closing the cycle
        schema: String,
    },

    /// Value has no representation in the wire format
    #[error("Unrepresentable value: {0}")]
    Unrepresentable(String),

    /// Payload is well-formed JSON but not a valid document
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// JSON syntax or I/O error from the JSON layer
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Time string or timecode could not be converted
    #[error("Time conversion error: {0}")]
    Time(#[from] TimeError),

    /// File system error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file could not be parsed
    #[error("Settings parse error: {0}")]
    SettingsParse(#[from] ron::error::SpannedError),

    /// Settings could not be written
    #[error("Settings write error: {0}")]
    SettingsWrite(#[from] ron::Error),
}

/// Result type for interchange operations
pub type Result<T> = std::result::Result<T, InterchangeError>;

fn format_range(range: &Option<TimeRange>) -> String {
    match range {
        Some(range) => range.to_string(),
        None => "(none)".to_string(),
    }
}

impl InterchangeError {
    /// Whether this is one of the out-of-range errors
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            Self::TimeOutOfRange { .. } | Self::ImageNumberOutOfRange { .. }
        )
    }
}
