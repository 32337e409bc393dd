// SPDX-License-Identifier: MIT OR Apache-2.0
//! Registry mapping schema names to constructors.
//!
//! Decoding looks up the schema name and version of every object in the
//! registry. Objects of older versions are upgraded field by field before
//! construction. Objects whose name is unknown, or whose version is newer
//! than the registered one, become [`UnknownSchema`] placeholders so they
//! survive a round trip unchanged.

use crate::dictionary::Dictionary;
use crate::effect::{Effect, FreezeFrame, LinearTimeWarp};
use crate::error::{InterchangeError, Result};
use crate::image_sequence::ImageSequenceReference;
use crate::media_reference::{ExternalReference, GeneratorReference, MissingReference};
use crate::object::{SchemaBody, SchemaObject};
use crate::schema::{FieldReader, Schema};
use crate::unknown::UnknownSchema;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Rewrites the fields of an object to the next schema version
pub type SchemaUpgrade = fn(&mut Dictionary);

type Constructor = fn(&mut FieldReader) -> Result<SchemaBody>;

fn construct_schema<T: Schema>(reader: &mut FieldReader) -> Result<SchemaBody> {
    T::read_fields(reader).map(Into::into)
}

struct SchemaEntry {
    version: i64,
    construct: Constructor,
    /// Upgrades keyed by the version they produce
    upgrades: BTreeMap<i64, SchemaUpgrade>,
}

/// Registered schemas by name
pub struct SchemaRegistry {
    entries: IndexMap<String, SchemaEntry>,
}

static BUILTIN: LazyLock<SchemaRegistry> = LazyLock::new(SchemaRegistry::with_builtin_schemas);

impl SchemaRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Create a registry holding every built-in schema
    pub fn with_builtin_schemas() -> Self {
        let mut registry = Self::new();
        registry.register::<ExternalReference>();
        registry.register::<ImageSequenceReference>();
        registry.register::<MissingReference>();
        registry.register::<GeneratorReference>();
        registry.register::<Effect>();
        registry.register::<LinearTimeWarp>();
        registry.register::<FreezeFrame>();
        registry
    }

    /// Shared registry of the built-in schemas
    pub fn builtin() -> &'static SchemaRegistry {
        &BUILTIN
    }

    /// Register a schema at its current version.
    ///
    /// Registering a name again replaces the constructor and keeps any
    /// upgrades already registered for it.
    pub fn register<T: Schema>(&mut self) {
        let upgrades = self
            .entries
            .shift_remove(T::NAME)
            .map(|entry| entry.upgrades)
            .unwrap_or_default();
        self.entries.insert(
            T::NAME.to_string(),
            SchemaEntry {
                version: T::VERSION,
                construct: construct_schema::<T>,
                upgrades,
            },
        );
    }

    /// Register the upgrade of schema `name` from `to_version - 1` to
    /// `to_version`.
    ///
    /// Returns `false` if `name` is not registered.
    pub fn register_upgrade(&mut self, name: &str, to_version: i64, upgrade: SchemaUpgrade) -> bool {
        match self.entries.get_mut(name) {
            Some(entry) => {
                entry.upgrades.insert(to_version, upgrade);
                true
            }
            None => false,
        }
    }

    /// Check whether a schema is registered
    pub fn is_registered(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Current version of a registered schema
    pub fn current_version(&self, name: &str) -> Option<i64> {
        self.entries.get(name).map(|entry| entry.version)
    }

    /// Registered schema names in registration order
    pub fn schema_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn resolve(&self, name: &str, version: i64) -> Result<&SchemaEntry> {
        match self.entries.get(name) {
            Some(entry) if version <= entry.version => Ok(entry),
            _ => Err(InterchangeError::SchemaResolution {
                name: name.to_string(),
                version,
            }),
        }
    }

    /// Build an object of schema `name` at `version` from decoded fields.
    ///
    /// Fields the schema does not declare are kept as dynamic fields. A
    /// schema that cannot be resolved yields an [`UnknownSchema`] object
    /// holding the fields verbatim; a declared field of the wrong type is an
    /// error.
    pub fn construct(&self, name: &str, version: i64, mut fields: Dictionary) -> Result<SchemaObject> {
        let entry = match self.resolve(name, version) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("{}; keeping object as {}", e, UnknownSchema::NAME);
                let unknown = UnknownSchema::new(name, version, fields);
                return Ok(SchemaObject::new(SchemaBody::Unknown(unknown)));
            }
        };

        if version < entry.version {
            for (to_version, upgrade) in entry.upgrades.range(version + 1..=entry.version) {
                upgrade(&mut fields);
                tracing::debug!("Upgraded {} to version {}", name, to_version);
            }
        }

        let mut reader = FieldReader::new(name, fields);
        let body = (entry.construct)(&mut reader)?;
        Ok(SchemaObject::with_dynamic_fields(body, reader.into_remaining()))
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::with_builtin_schemas()
    }
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(name, entry)| (name, entry.version)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Value, ValueKind};

    fn rename_effect_field(fields: &mut Dictionary) {
        if let Some(value) = fields.take("effect") {
            fields.insert("effect_name", value);
        }
    }

    #[test]
    fn test_builtin_schemas() {
        let registry = SchemaRegistry::default();
        for name in [
            "ExternalReference",
            "ImageSequenceReference",
            "MissingReference",
            "GeneratorReference",
            "Effect",
            "LinearTimeWarp",
            "FreezeFrame",
        ] {
            assert!(registry.is_registered(name), "{name} not registered");
            assert_eq!(registry.current_version(name), Some(1));
        }
        assert!(!registry.is_registered("UnknownSchema"));
        assert_eq!(SchemaRegistry::new().schema_names().count(), 0);
        assert_eq!(SchemaRegistry::builtin().schema_names().count(), 7);
    }

    #[test]
    fn test_construct_keeps_undeclared_fields() {
        let fields: Dictionary = [
            ("name", Value::from("blur it")),
            ("effect_name", Value::from("blur")),
            ("vendor_tag", Value::Int(7)),
        ]
        .into_iter()
        .collect();
        let object = SchemaRegistry::builtin().construct("Effect", 1, fields).unwrap();
        assert_eq!(object.as_effect().unwrap().effect_name, "blur");
        assert_eq!(object.dynamic_fields().get("vendor_tag"), Some(&Value::Int(7)));
    }

    #[test]
    fn test_unresolvable_schema_becomes_unknown() {
        let registry = SchemaRegistry::builtin();
        let fields: Dictionary = [("foo", "bar")].into_iter().collect();

        let unknown = registry.construct("Clip", 2, fields.clone()).unwrap();
        assert!(unknown.is_unknown_schema());
        assert_eq!(unknown.wire_schema(), ("Clip", 2));

        let newer = registry.construct("Effect", 5, fields).unwrap();
        assert!(newer.is_unknown_schema());
        assert_eq!(newer.wire_schema(), ("Effect", 5));
        assert_eq!(newer.as_unknown().unwrap().fields().get("foo"), Some(&Value::from("bar")));
    }

    #[test]
    fn test_field_type_error_propagates() {
        let fields: Dictionary = [("start_frame", "one")].into_iter().collect();
        let err = SchemaRegistry::builtin()
            .construct("ImageSequenceReference", 1, fields)
            .unwrap_err();
        assert!(matches!(
            err,
            InterchangeError::FieldTypeMismatch {
                ref schema,
                ref key,
                expected: ValueKind::Int,
                found: ValueKind::String,
            } if schema == "ImageSequenceReference" && key == "start_frame"
        ));
    }

    #[test]
    fn test_upgrades_run_for_older_versions() {
        let mut registry = SchemaRegistry::default();
        assert!(registry.register_upgrade("Effect", 1, rename_effect_field));
        assert!(!registry.register_upgrade("Clip", 2, rename_effect_field));

        let fields: Dictionary = [("effect", "blur")].into_iter().collect();
        let object = registry.construct("Effect", 0, fields.clone()).unwrap();
        assert_eq!(object.as_effect().unwrap().effect_name, "blur");
        assert!(object.dynamic_fields().is_empty());

        let current = registry.construct("Effect", 1, fields).unwrap();
        assert_eq!(current.as_effect().unwrap().effect_name, "");
        assert!(current.dynamic_fields().contains_key("effect"));
    }

    #[test]
    fn test_reregistering_keeps_upgrades() {
        let mut registry = SchemaRegistry::new();
        registry.register::<Effect>();
        registry.register_upgrade("Effect", 1, rename_effect_field);
        registry.register::<Effect>();

        let fields: Dictionary = [("effect", "blur")].into_iter().collect();
        let object = registry.construct("Effect", 0, fields).unwrap();
        assert_eq!(object.as_effect().unwrap().effect_name, "blur");
    }
}
