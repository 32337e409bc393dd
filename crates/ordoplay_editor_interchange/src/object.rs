// SPDX-License-Identifier: MIT OR Apache-2.0
//! Schema objects and shared references to them.
//!
//! A [`SchemaObject`] is one of the known schema variants ([`SchemaBody`])
//! plus any dynamic fields that arrived on the wire without being declared
//! by the schema. Objects are shared through [`ObjectRef`], a single-threaded
//! reference-counted handle: mutation through one handle is visible through
//! every other handle to the same object.

use crate::dictionary::Dictionary;
use crate::effect::{Effect, FreezeFrame, LinearTimeWarp};
use crate::image_sequence::ImageSequenceReference;
use crate::media_reference::{ExternalReference, GeneratorReference, MissingReference};
use crate::schema::Schema;
use crate::unknown::UnknownSchema;
use ordoplay_editor_time::TimeRange;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// Access to a metadata dictionary
pub trait HasMetadata {
    /// Metadata dictionary
    fn metadata(&self) -> &Dictionary;

    /// Mutable metadata dictionary
    fn metadata_mut(&mut self) -> &mut Dictionary;
}

/// Access to the available range of a media reference
pub trait HasAvailableRange {
    /// Range over which the media is known to exist
    fn available_range(&self) -> Option<TimeRange>;

    /// Set or clear the available range
    fn set_available_range(&mut self, range: Option<TimeRange>);
}

/// The schema-specific part of a schema object
#[derive(Debug, Clone)]
pub enum SchemaBody {
    /// Media at a single URL
    ExternalReference(ExternalReference),
    /// Numbered image files
    ImageSequenceReference(ImageSequenceReference),
    /// Placeholder for media that is not available
    MissingReference(MissingReference),
    /// Media produced by a generator
    GeneratorReference(GeneratorReference),
    /// Generic effect
    Effect(Effect),
    /// Constant speed change
    LinearTimeWarp(LinearTimeWarp),
    /// Hold of a single frame
    FreezeFrame(FreezeFrame),
    /// Schema the registry did not recognise
    Unknown(UnknownSchema),
}

macro_rules! schema_body_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for SchemaBody {
                fn from(v: $variant) -> Self {
                    Self::$variant(v)
                }
            }

            impl From<$variant> for SchemaObject {
                fn from(v: $variant) -> Self {
                    Self::new(v)
                }
            }

            impl From<$variant> for crate::value::Value {
                fn from(v: $variant) -> Self {
                    Self::Object(ObjectRef::new(SchemaObject::new(v)))
                }
            }
        )*
    };
}

schema_body_from!(
    ExternalReference,
    ImageSequenceReference,
    MissingReference,
    GeneratorReference,
    Effect,
    LinearTimeWarp,
    FreezeFrame,
);

impl SchemaBody {
    /// Schema name of this variant
    pub fn schema_name(&self) -> &'static str {
        match self {
            Self::ExternalReference(_) => ExternalReference::NAME,
            Self::ImageSequenceReference(_) => ImageSequenceReference::NAME,
            Self::MissingReference(_) => MissingReference::NAME,
            Self::GeneratorReference(_) => GeneratorReference::NAME,
            Self::Effect(_) => Effect::NAME,
            Self::LinearTimeWarp(_) => LinearTimeWarp::NAME,
            Self::FreezeFrame(_) => FreezeFrame::NAME,
            Self::Unknown(_) => UnknownSchema::NAME,
        }
    }

    /// Schema version of this variant
    pub fn schema_version(&self) -> i64 {
        match self {
            Self::ExternalReference(_) => ExternalReference::VERSION,
            Self::ImageSequenceReference(_) => ImageSequenceReference::VERSION,
            Self::MissingReference(_) => MissingReference::VERSION,
            Self::GeneratorReference(_) => GeneratorReference::VERSION,
            Self::Effect(_) => Effect::VERSION,
            Self::LinearTimeWarp(_) => LinearTimeWarp::VERSION,
            Self::FreezeFrame(_) => FreezeFrame::VERSION,
            Self::Unknown(_) => UnknownSchema::VERSION,
        }
    }

    fn write_fields(&self, fields: &mut Dictionary) {
        match self {
            Self::ExternalReference(v) => v.write_fields(fields),
            Self::ImageSequenceReference(v) => v.write_fields(fields),
            Self::MissingReference(v) => v.write_fields(fields),
            Self::GeneratorReference(v) => v.write_fields(fields),
            Self::Effect(v) => v.write_fields(fields),
            Self::LinearTimeWarp(v) => v.write_fields(fields),
            Self::FreezeFrame(v) => v.write_fields(fields),
            Self::Unknown(v) => v.write_fields(fields),
        }
    }

    fn metadata_holder(&self) -> Option<&dyn HasMetadata> {
        match self {
            Self::ExternalReference(v) => Some(v),
            Self::ImageSequenceReference(v) => Some(v),
            Self::MissingReference(v) => Some(v),
            Self::GeneratorReference(v) => Some(v),
            Self::Effect(v) => Some(v),
            Self::LinearTimeWarp(v) => Some(v),
            Self::FreezeFrame(v) => Some(v),
            Self::Unknown(_) => None,
        }
    }

    fn metadata_holder_mut(&mut self) -> Option<&mut dyn HasMetadata> {
        match self {
            Self::ExternalReference(v) => Some(v),
            Self::ImageSequenceReference(v) => Some(v),
            Self::MissingReference(v) => Some(v),
            Self::GeneratorReference(v) => Some(v),
            Self::Effect(v) => Some(v),
            Self::LinearTimeWarp(v) => Some(v),
            Self::FreezeFrame(v) => Some(v),
            Self::Unknown(_) => None,
        }
    }

    fn media_reference(&self) -> Option<&dyn HasAvailableRange> {
        match self {
            Self::ExternalReference(v) => Some(v),
            Self::ImageSequenceReference(v) => Some(v),
            Self::MissingReference(v) => Some(v),
            Self::GeneratorReference(v) => Some(v),
            _ => None,
        }
    }

    fn media_reference_mut(&mut self) -> Option<&mut dyn HasAvailableRange> {
        match self {
            Self::ExternalReference(v) => Some(v),
            Self::ImageSequenceReference(v) => Some(v),
            Self::MissingReference(v) => Some(v),
            Self::GeneratorReference(v) => Some(v),
            _ => None,
        }
    }
}

/// A schema object: declared schema fields plus preserved dynamic fields
#[derive(Debug, Clone)]
pub struct SchemaObject {
    body: SchemaBody,
    dynamic_fields: Dictionary,
}

impl SchemaObject {
    /// Wrap a schema variant with no dynamic fields
    pub fn new(body: impl Into<SchemaBody>) -> Self {
        Self {
            body: body.into(),
            dynamic_fields: Dictionary::new(),
        }
    }

    pub(crate) fn with_dynamic_fields(body: SchemaBody, dynamic_fields: Dictionary) -> Self {
        Self {
            body,
            dynamic_fields,
        }
    }

    /// Schema-specific content
    pub fn body(&self) -> &SchemaBody {
        &self.body
    }

    /// Mutable schema-specific content
    pub fn body_mut(&mut self) -> &mut SchemaBody {
        &mut self.body
    }

    /// Fields present on the wire that the schema does not declare
    pub fn dynamic_fields(&self) -> &Dictionary {
        &self.dynamic_fields
    }

    /// Mutable dynamic fields
    pub fn dynamic_fields_mut(&mut self) -> &mut Dictionary {
        &mut self.dynamic_fields
    }

    /// Schema name (`"UnknownSchema"` for unrecognised objects)
    pub fn schema_name(&self) -> &'static str {
        self.body.schema_name()
    }

    /// Schema version
    pub fn schema_version(&self) -> i64 {
        self.body.schema_version()
    }

    /// Name and version written to the wire.
    ///
    /// Equal to [`Self::schema_name`] and [`Self::schema_version`] except for
    /// unknown schemas, which keep their original signature.
    pub fn wire_schema(&self) -> (&str, i64) {
        match &self.body {
            SchemaBody::Unknown(unknown) => (
                unknown.original_schema_name(),
                unknown.original_schema_version(),
            ),
            body => (body.schema_name(), body.schema_version()),
        }
    }

    /// Whether this object stands in for an unrecognised schema
    pub fn is_unknown_schema(&self) -> bool {
        matches!(self.body, SchemaBody::Unknown(_))
    }

    /// Whether this object is any kind of media reference
    pub fn is_media_reference(&self) -> bool {
        self.body.media_reference().is_some()
    }

    /// Whether this object is a missing media reference
    pub fn is_missing_reference(&self) -> bool {
        matches!(self.body, SchemaBody::MissingReference(_))
    }

    /// All fields in declaration order, followed by dynamic fields
    pub fn to_fields(&self) -> Dictionary {
        let mut fields = Dictionary::with_capacity(self.dynamic_fields.len() + 8);
        self.body.write_fields(&mut fields);
        for (key, value) in self.dynamic_fields.iter() {
            if !fields.contains_key(key) {
                fields.insert(key, value.clone());
            }
        }
        fields
    }

    /// Metadata dictionary, if the schema has one
    pub fn metadata(&self) -> Option<&Dictionary> {
        self.body.metadata_holder().map(|holder| holder.metadata())
    }

    /// Mutable metadata dictionary, if the schema has one
    pub fn metadata_mut(&mut self) -> Option<&mut Dictionary> {
        self.body.metadata_holder_mut().map(|holder| holder.metadata_mut())
    }

    /// Available range, for media references
    pub fn available_range(&self) -> Option<TimeRange> {
        self.body.media_reference().and_then(|reference| reference.available_range())
    }

    /// Set the available range; returns `false` if this is not a media reference
    pub fn set_available_range(&mut self, range: Option<TimeRange>) -> bool {
        match self.body.media_reference_mut() {
            Some(reference) => {
                reference.set_available_range(range);
                true
            }
            None => false,
        }
    }

    /// Get as an effect
    pub fn as_effect(&self) -> Option<&Effect> {
        match &self.body {
            SchemaBody::Effect(v) => Some(v),
            _ => None,
        }
    }

    /// Get as a mutable effect
    pub fn as_effect_mut(&mut self) -> Option<&mut Effect> {
        match &mut self.body {
            SchemaBody::Effect(v) => Some(v),
            _ => None,
        }
    }

    /// Get as a linear time warp
    pub fn as_linear_time_warp(&self) -> Option<&LinearTimeWarp> {
        match &self.body {
            SchemaBody::LinearTimeWarp(v) => Some(v),
            _ => None,
        }
    }

    /// Get as a freeze frame
    pub fn as_freeze_frame(&self) -> Option<&FreezeFrame> {
        match &self.body {
            SchemaBody::FreezeFrame(v) => Some(v),
            _ => None,
        }
    }

    /// Get as an external reference
    pub fn as_external_reference(&self) -> Option<&ExternalReference> {
        match &self.body {
            SchemaBody::ExternalReference(v) => Some(v),
            _ => None,
        }
    }

    /// Get as a mutable external reference
    pub fn as_external_reference_mut(&mut self) -> Option<&mut ExternalReference> {
        match &mut self.body {
            SchemaBody::ExternalReference(v) => Some(v),
            _ => None,
        }
    }

    /// Get as an image sequence reference
    pub fn as_image_sequence(&self) -> Option<&ImageSequenceReference> {
        match &self.body {
            SchemaBody::ImageSequenceReference(v) => Some(v),
            _ => None,
        }
    }

    /// Get as a mutable image sequence reference
    pub fn as_image_sequence_mut(&mut self) -> Option<&mut ImageSequenceReference> {
        match &mut self.body {
            SchemaBody::ImageSequenceReference(v) => Some(v),
            _ => None,
        }
    }

    /// Get as a missing reference
    pub fn as_missing_reference(&self) -> Option<&MissingReference> {
        match &self.body {
            SchemaBody::MissingReference(v) => Some(v),
            _ => None,
        }
    }

    /// Get as a generator reference
    pub fn as_generator_reference(&self) -> Option<&GeneratorReference> {
        match &self.body {
            SchemaBody::GeneratorReference(v) => Some(v),
            _ => None,
        }
    }

    /// Get as an unknown schema
    pub fn as_unknown(&self) -> Option<&UnknownSchema> {
        match &self.body {
            SchemaBody::Unknown(v) => Some(v),
            _ => None,
        }
    }

    /// Deep structural comparison, independent of object identity
    pub fn is_equivalent_to(&self, other: &SchemaObject) -> bool {
        crate::equivalence::Equivalence::new().objects(self, other)
    }

    /// Deterministic human-readable rendering for diagnostics
    pub fn to_debug_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SchemaObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::render::DebugRenderer::new(f).object(self)
    }
}

/// Shared, mutable handle to a schema object.
///
/// Cloning the handle shares the object. Handles are single-threaded. A
/// graph whose objects reference each other in a cycle keeps itself alive
/// until one of the references is removed.
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<SchemaObject>>);

impl ObjectRef {
    /// Place an object behind a new shared handle
    pub fn new(object: impl Into<SchemaObject>) -> Self {
        Self(Rc::new(RefCell::new(object.into())))
    }

    /// Borrow the object.
    ///
    /// Panics if the object is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, SchemaObject> {
        self.0.borrow()
    }

    /// Mutably borrow the object.
    ///
    /// Panics if the object is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, SchemaObject> {
        self.0.borrow_mut()
    }

    /// Whether two handles point at the same object
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared object, stable for the object's lifetime
    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    /// Number of handles sharing the object
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Schema name of the referenced object
    pub fn schema_name(&self) -> &'static str {
        self.borrow().schema_name()
    }

    /// Deep structural comparison, independent of object identity
    pub fn is_equivalent_to(&self, other: &ObjectRef) -> bool {
        crate::equivalence::Equivalence::new().object_refs(self, other)
    }
}

impl From<SchemaObject> for ObjectRef {
    fn from(object: SchemaObject) -> Self {
        Self::new(object)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.is_equivalent_to(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(object) => write!(f, "ObjectRef({}@{:#x})", object.schema_name(), self.addr()),
            Err(_) => write!(f, "ObjectRef(<borrowed>@{:#x})", self.addr()),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::render::DebugRenderer::new(f).object_ref(self)
    }
}
