// SPDX-License-Identifier: MIT OR Apache-2.0
//! Media references: where the media of a clip lives.
//!
//! All media references share a [`MediaReferenceBase`] (name, available
//! range, metadata). The variants add what they need to locate media:
//! - [`ExternalReference`]: one URL
//! - [`MissingReference`]: nothing; the media is known to be absent
//! - [`GeneratorReference`]: a generator kind plus parameters
//!
//! Image sequences live in [`crate::image_sequence`].

use crate::dictionary::Dictionary;
use crate::error::Result;
use crate::schema::{FieldReader, Schema};
use crate::value::Value;
use ordoplay_editor_time::TimeRange;

/// Fields common to every media reference
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaReferenceBase {
    /// Display name
    pub name: String,
    /// Range over which the media is known to exist
    pub available_range: Option<TimeRange>,
    /// Free-form metadata
    pub metadata: Dictionary,
}

impl MediaReferenceBase {
    pub(crate) fn write_name(&self, fields: &mut Dictionary) {
        fields.insert("name", self.name.clone());
    }

    pub(crate) fn write_range_and_metadata(&self, fields: &mut Dictionary) {
        fields.insert(
            "available_range",
            self.available_range.map_or(Value::Empty, Value::TimeRange),
        );
        fields.insert("metadata", self.metadata.clone());
    }

    pub(crate) fn read(reader: &mut FieldReader) -> Result<Self> {
        Ok(Self {
            name: reader.string("name")?,
            available_range: reader.optional_time_range("available_range")?,
            metadata: reader.dictionary("metadata")?,
        })
    }
}

/// Implements the shared capabilities and `with_*` setters of a media
/// reference type holding a `base: MediaReferenceBase` field.
macro_rules! media_reference_common {
    ($ty:ty) => {
        impl $crate::object::HasMetadata for $ty {
            fn metadata(&self) -> &$crate::dictionary::Dictionary {
                &self.base.metadata
            }

            fn metadata_mut(&mut self) -> &mut $crate::dictionary::Dictionary {
                &mut self.base.metadata
            }
        }

        impl $crate::object::HasAvailableRange for $ty {
            fn available_range(&self) -> Option<ordoplay_editor_time::TimeRange> {
                self.base.available_range
            }

            fn set_available_range(&mut self, range: Option<ordoplay_editor_time::TimeRange>) {
                self.base.available_range = range;
            }
        }

        impl $ty {
            /// Set the display name
            pub fn with_name(mut self, name: impl Into<String>) -> Self {
                self.base.name = name.into();
                self
            }

            /// Set the available range
            pub fn with_available_range(mut self, range: ordoplay_editor_time::TimeRange) -> Self {
                self.base.available_range = Some(range);
                self
            }

            /// Set the metadata
            pub fn with_metadata(mut self, metadata: $crate::dictionary::Dictionary) -> Self {
                self.base.metadata = metadata;
                self
            }
        }
    };
}

pub(crate) use media_reference_common;

/// Reference to media at a single URL
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalReference {
    /// Shared media reference fields
    pub base: MediaReferenceBase,
    /// Location of the media
    pub target_url: String,
}

impl ExternalReference {
    /// Create a reference to `target_url`
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            base: MediaReferenceBase::default(),
            target_url: target_url.into(),
        }
    }
}

media_reference_common!(ExternalReference);

impl Schema for ExternalReference {
    const NAME: &'static str = "ExternalReference";
    const VERSION: i64 = 1;

    fn write_fields(&self, fields: &mut Dictionary) {
        self.base.write_name(fields);
        fields.insert("target_url", self.target_url.clone());
        self.base.write_range_and_metadata(fields);
    }

    fn read_fields(reader: &mut FieldReader) -> Result<Self> {
        let base = MediaReferenceBase::read(reader)?;
        Ok(Self {
            base,
            target_url: reader.string("target_url")?,
        })
    }
}

/// Reference standing in for media that could not be found
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MissingReference {
    /// Shared media reference fields
    pub base: MediaReferenceBase,
}

media_reference_common!(MissingReference);

impl Schema for MissingReference {
    const NAME: &'static str = "MissingReference";
    const VERSION: i64 = 1;

    fn write_fields(&self, fields: &mut Dictionary) {
        self.base.write_name(fields);
        self.base.write_range_and_metadata(fields);
    }

    fn read_fields(reader: &mut FieldReader) -> Result<Self> {
        Ok(Self {
            base: MediaReferenceBase::read(reader)?,
        })
    }
}

/// Reference to media synthesised by a generator (bars, solids, noise)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratorReference {
    /// Shared media reference fields
    pub base: MediaReferenceBase,
    /// Generator identifier, e.g. `"SMPTEBars"`
    pub generator_kind: String,
    /// Generator parameters
    pub parameters: Dictionary,
}

impl GeneratorReference {
    /// Create a reference to a generator of `generator_kind`
    pub fn new(generator_kind: impl Into<String>) -> Self {
        Self {
            base: MediaReferenceBase::default(),
            generator_kind: generator_kind.into(),
            parameters: Dictionary::new(),
        }
    }

    /// Set the generator parameters
    pub fn with_parameters(mut self, parameters: Dictionary) -> Self {
        self.parameters = parameters;
        self
    }
}

media_reference_common!(GeneratorReference);

impl Schema for GeneratorReference {
    const NAME: &'static str = "GeneratorReference";
    const VERSION: i64 = 1;

    fn write_fields(&self, fields: &mut Dictionary) {
        self.base.write_name(fields);
        fields.insert("generator_kind", self.generator_kind.clone());
        fields.insert("parameters", self.parameters.clone());
        self.base.write_range_and_metadata(fields);
    }

    fn read_fields(reader: &mut FieldReader) -> Result<Self> {
        let base = MediaReferenceBase::read(reader)?;
        Ok(Self {
            base,
            generator_kind: reader.string("generator_kind")?,
            parameters: reader.dictionary("parameters")?,
        })
    }
}
