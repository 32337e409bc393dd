// SPDX-License-Identifier: MIT OR Apache-2.0
//! Schema trait and field reading for schema objects.

use crate::dictionary::Dictionary;
use crate::error::{InterchangeError, Result};
use crate::object::SchemaBody;
use crate::value::{Value, ValueKind};
use ordoplay_editor_time::{RationalTime, TimeRange};

/// A named, versioned record type of the interchange format.
///
/// `write_fields` emits the declared fields in a fixed order; `read_fields`
/// consumes them from a [`FieldReader`]. Fields left unread by
/// `read_fields` are kept by the caller as dynamic fields.
pub trait Schema: Sized + Into<SchemaBody> {
    /// Schema name as written on the wire
    const NAME: &'static str;
    /// Current schema version
    const VERSION: i64;

    /// Write declared fields in declaration order
    fn write_fields(&self, fields: &mut Dictionary);

    /// Read declared fields, leaving unknown ones in the reader
    fn read_fields(reader: &mut FieldReader) -> Result<Self>;
}

/// Typed access to the decoded fields of one schema object.
///
/// Each read removes the field. Absent fields and `null` produce the
/// schema default; a present field of the wrong variant is an error naming
/// the schema and the key.
#[derive(Debug)]
pub struct FieldReader {
    schema: String,
    fields: Dictionary,
}

impl FieldReader {
    /// Create a reader over `fields` of schema `schema`
    pub fn new(schema: impl Into<String>, fields: Dictionary) -> Self {
        Self {
            schema: schema.into(),
            fields,
        }
    }

    /// Schema being read
    pub fn schema(&self) -> &str {
        &self.schema
    }

    fn take(&mut self, key: &str) -> Option<Value> {
        match self.fields.take(key) {
            Some(Value::Empty) | None => None,
            Some(value) => Some(value),
        }
    }

    fn mismatch(&self, key: &str, expected: ValueKind, found: &Value) -> InterchangeError {
        InterchangeError::FieldTypeMismatch {
            schema: self.schema.clone(),
            key: key.to_string(),
            expected,
            found: found.kind(),
        }
    }

    /// Read a string field, defaulting to empty
    pub fn string(&mut self, key: &str) -> Result<String> {
        match self.take(key) {
            None => Ok(String::new()),
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(self.mismatch(key, ValueKind::String, &other)),
        }
    }

    /// Read a string field, distinguishing an absent or null field from an
    /// empty string
    pub fn optional_string(&mut self, key: &str) -> Result<Option<String>> {
        match self.take(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(self.mismatch(key, ValueKind::String, &other)),
        }
    }

    /// Read an integer field
    pub fn int(&mut self, key: &str, default: i64) -> Result<i64> {
        match self.take(key) {
            None => Ok(default),
            Some(Value::Int(v)) => Ok(v),
            Some(other) => Err(self.mismatch(key, ValueKind::Int, &other)),
        }
    }

    /// Read a double field; integers are accepted and widened
    pub fn double(&mut self, key: &str, default: f64) -> Result<f64> {
        match self.take(key) {
            None => Ok(default),
            Some(value) => value
                .coerce_to_double()
                .map_err(|_| self.mismatch(key, ValueKind::Double, &value)),
        }
    }

    /// Read a time field, defaulting to zero at rate 1
    pub fn time(&mut self, key: &str) -> Result<RationalTime> {
        match self.take(key) {
            None => Ok(RationalTime::default()),
            Some(Value::Time(time)) => Ok(time),
            Some(other) => Err(self.mismatch(key, ValueKind::Time, &other)),
        }
    }

    /// Read an optional time range field
    pub fn optional_time_range(&mut self, key: &str) -> Result<Option<TimeRange>> {
        match self.take(key) {
            None => Ok(None),
            Some(Value::TimeRange(range)) => Ok(Some(range)),
            Some(other) => Err(self.mismatch(key, ValueKind::TimeRange, &other)),
        }
    }

    /// Read a dictionary field, defaulting to empty
    pub fn dictionary(&mut self, key: &str) -> Result<Dictionary> {
        match self.take(key) {
            None => Ok(Dictionary::new()),
            Some(Value::Dictionary(d)) => Ok(d),
            Some(other) => Err(self.mismatch(key, ValueKind::Dictionary, &other)),
        }
    }

    /// Fields not consumed by any read
    pub fn into_remaining(self) -> Dictionary {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_absent_and_null_fields() {
        let fields: Dictionary = [("name", Value::Empty)].into_iter().collect();
        let mut reader = FieldReader::new("Effect", fields);
        assert_eq!(reader.string("name").unwrap(), "");
        assert_eq!(reader.int("start_frame", 1).unwrap(), 1);
        assert_eq!(reader.double("rate", 1.0).unwrap(), 1.0);
        assert!(reader.optional_time_range("available_range").unwrap().is_none());
        assert!(reader.dictionary("metadata").unwrap().is_empty());
    }

    #[test]
    fn test_wrong_variant_names_schema_and_key() {
        let fields: Dictionary = [("start_frame", "one")].into_iter().collect();
        let mut reader = FieldReader::new("ImageSequenceReference", fields);
        let err = reader.int("start_frame", 1).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("start_frame"));
        assert!(message.contains("ImageSequenceReference"));
    }

    #[test]
    fn test_optional_string_keeps_empty_value() {
        let fields: Dictionary = [("present", Value::from("")), ("null", Value::Empty)]
            .into_iter()
            .collect();
        let mut reader = FieldReader::new("Effect", fields);
        assert_eq!(reader.optional_string("present").unwrap(), Some(String::new()));
        assert_eq!(reader.optional_string("null").unwrap(), None);
        assert_eq!(reader.optional_string("absent").unwrap(), None);
    }

    #[test]
    fn test_double_accepts_integers() {
        let fields: Dictionary = [("rate", Value::Int(24))].into_iter().collect();
        let mut reader = FieldReader::new("ImageSequenceReference", fields);
        assert_eq!(reader.double("rate", 1.0).unwrap(), 24.0);
    }

    #[test]
    fn test_unread_fields_remain() {
        let range = TimeRange::new(RationalTime::new(0.0, 24.0), RationalTime::new(10.0, 24.0));
        let mut fields = Dictionary::new();
        fields.insert("available_range", range);
        fields.insert("studio_tag", "abc");
        let mut reader = FieldReader::new("MissingReference", fields);
        assert_eq!(reader.optional_time_range("available_range").unwrap(), Some(range));

        let remaining = reader.into_remaining();
        assert_eq!(remaining.keys().collect::<Vec<_>>(), ["studio_tag"]);
    }
}
