// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline interchange data model for OrdoPlay Editor.
//!
//! This crate provides the core of the interchange format:
//! - Dynamically typed values and insertion-ordered dictionaries
//! - Schema objects: media references, image sequences, effects
//! - Frame numbering for image sequences
//! - Structural equivalence of object graphs, cycles included
//! - A schema registry and a JSON codec that round-trips unknown schemas
//!
//! ## Architecture
//!
//! The data model is built on:
//! - A closed [`Value`] enum shared by metadata and schema fields
//! - [`SchemaObject`], a schema variant plus preserved dynamic fields
//! - [`ObjectRef`], a single-threaded shared handle to a schema object
//! - The [`Schema`] trait, implemented by every registered schema

pub mod codec;
pub mod dictionary;
pub mod effect;
pub mod equivalence;
pub mod error;
pub mod image_sequence;
pub mod media_reference;
pub mod object;
pub mod registry;
pub mod render;
pub mod schema;
pub mod settings;
pub mod unknown;
pub mod value;

pub use codec::{
    from_json_file, from_json_string, from_json_value, to_json_file, to_json_string,
    to_json_value, Decoder, Encoder,
};
pub use dictionary::{Cursor, Dictionary};
pub use effect::{Effect, FreezeFrame, LinearTimeWarp};
pub use equivalence::Equivalence;
pub use error::{InterchangeError, Result};
pub use image_sequence::{format_frame_number, ImageSequenceReference, MissingFramePolicy};
pub use media_reference::{ExternalReference, GeneratorReference, MediaReferenceBase, MissingReference};
pub use object::{HasAvailableRange, HasMetadata, ObjectRef, SchemaBody, SchemaObject};
pub use registry::{SchemaRegistry, SchemaUpgrade};
pub use schema::{FieldReader, Schema};
pub use settings::SerializerSettings;
pub use unknown::UnknownSchema;
pub use value::{Value, ValueKind, ValueList};

pub use ordoplay_editor_time::{RationalTime, TimeError, TimeRange};
