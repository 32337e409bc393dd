// SPDX-License-Identifier: MIT OR Apache-2.0
//! JSON encoding and decoding of values and object graphs.
//!
//! Wire format:
//! - dictionaries are JSON objects in insertion order, lists are arrays and
//!   [`Value::Empty`] is `null`
//! - integers are JSON integers; doubles always carry a fractional part so
//!   the two stay distinct
//! - schema objects are JSON objects whose first key is
//!   `"OTIO_SCHEMA": "Name.Version"`, followed by the declared fields and
//!   then any dynamic fields
//! - times and ranges are the `RationalTime.1` and `TimeRange.1` schemas
//!
//! Shared objects are written out at every place they occur. A graph with a
//! reference cycle cannot be written and fails with
//! [`InterchangeError::CyclicReference`].

use crate::dictionary::Dictionary;
use crate::error::{InterchangeError, Result};
use crate::object::{ObjectRef, SchemaObject};
use crate::registry::SchemaRegistry;
use crate::schema::FieldReader;
use crate::settings::SerializerSettings;
use crate::value::Value;
use ordoplay_editor_time::{RationalTime, TimeRange};
use serde::Serialize;
use serde_json::{Map, Number};
use std::path::Path;

/// Key holding the schema signature of an encoded object
pub const SCHEMA_KEY: &str = "OTIO_SCHEMA";

const RATIONAL_TIME_SCHEMA: &str = "RationalTime";
const TIME_RANGE_SCHEMA: &str = "TimeRange";

/// Writes values as JSON
#[derive(Debug, Default)]
pub struct Encoder {
    settings: SerializerSettings,
    active: Vec<usize>,
}

impl Encoder {
    /// Create an encoder
    pub fn new(settings: SerializerSettings) -> Self {
        Self {
            settings,
            active: Vec::new(),
        }
    }

    /// Encode a value as a JSON tree
    pub fn encode(&mut self, value: &Value) -> Result<serde_json::Value> {
        Ok(match value {
            Value::Empty => serde_json::Value::Null,
            Value::Bool(v) => serde_json::Value::Bool(*v),
            Value::Int(v) => serde_json::Value::Number((*v).into()),
            Value::Double(v) => encode_double(*v)?,
            Value::String(v) => serde_json::Value::String(v.clone()),
            Value::Time(time) => encode_time(time)?,
            Value::TimeRange(range) => {
                let mut map = schema_map(TIME_RANGE_SCHEMA, 1);
                map.insert("duration".to_string(), encode_time(&range.duration())?);
                map.insert("start_time".to_string(), encode_time(&range.start_time())?);
                serde_json::Value::Object(map)
            }
            Value::Dictionary(dictionary) => self.encode_dictionary(dictionary)?,
            Value::List(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(|item| self.encode(item))
                    .collect::<Result<_>>()?,
            ),
            Value::Object(object) => self.encode_object_ref(object)?,
        })
    }

    fn encode_dictionary(&mut self, dictionary: &Dictionary) -> Result<serde_json::Value> {
        let mut map = Map::with_capacity(dictionary.len());
        for (key, value) in dictionary.iter() {
            map.insert(key.to_string(), self.encode(value)?);
        }
        Ok(serde_json::Value::Object(map))
    }

    /// Encode a schema object as a JSON tree
    pub fn encode_object(&mut self, object: &SchemaObject) -> Result<serde_json::Value> {
        let (name, version) = object.wire_schema();
        let fields = object.to_fields();
        let mut map = schema_map(name, version);
        for (key, value) in fields.iter() {
            if key != SCHEMA_KEY {
                map.insert(key.to_string(), self.encode(value)?);
            }
        }
        Ok(serde_json::Value::Object(map))
    }

    fn encode_object_ref(&mut self, object: &ObjectRef) -> Result<serde_json::Value> {
        let addr = object.addr();
        if self.active.contains(&addr) {
            return Err(InterchangeError::CyclicReference {
                schema: object.borrow().wire_schema().0.to_string(),
            });
        }
        self.active.push(addr);
        let encoded = self.encode_object(&object.borrow());
        self.active.pop();
        encoded
    }

    /// Encode a value as JSON text using the configured indentation
    pub fn encode_to_string(&mut self, value: &Value) -> Result<String> {
        let json = self.encode(value)?;
        write_json(&json, self.settings.indent)
    }
}

fn schema_map(name: &str, version: i64) -> Map<String, serde_json::Value> {
    let mut map = Map::new();
    map.insert(
        SCHEMA_KEY.to_string(),
        serde_json::Value::String(format!("{name}.{version}")),
    );
    map
}

fn encode_double(v: f64) -> Result<serde_json::Value> {
    Number::from_f64(v)
        .map(serde_json::Value::Number)
        .ok_or_else(|| InterchangeError::Unrepresentable(format!("non-finite double {v}")))
}

fn encode_time(time: &RationalTime) -> Result<serde_json::Value> {
    let mut map = schema_map(RATIONAL_TIME_SCHEMA, 1);
    map.insert("rate".to_string(), encode_double(time.rate())?);
    map.insert("value".to_string(), encode_double(time.value())?);
    Ok(serde_json::Value::Object(map))
}

fn write_json(json: &serde_json::Value, indent: usize) -> Result<String> {
    if indent == 0 {
        return Ok(serde_json::to_string(json)?);
    }
    let indent = vec![b' '; indent];
    let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
    let mut serializer = serde_json::Serializer::with_formatter(Vec::new(), formatter);
    json.serialize(&mut serializer)?;
    String::from_utf8(serializer.into_inner())
        .map_err(|e| InterchangeError::Unrepresentable(e.to_string()))
}

/// Reads values from JSON, resolving schemas through a registry
#[derive(Debug)]
pub struct Decoder<'r> {
    registry: &'r SchemaRegistry,
    settings: SerializerSettings,
}

impl Default for Decoder<'static> {
    fn default() -> Self {
        Self::new(SchemaRegistry::builtin(), SerializerSettings::default())
    }
}

impl<'r> Decoder<'r> {
    /// Create a decoder
    pub fn new(registry: &'r SchemaRegistry, settings: SerializerSettings) -> Self {
        Self { registry, settings }
    }

    /// Decode a JSON tree
    pub fn decode(&self, json: serde_json::Value) -> Result<Value> {
        Ok(match json {
            serde_json::Value::Null => Value::Empty,
            serde_json::Value::Bool(v) => Value::Bool(v),
            serde_json::Value::Number(n) => decode_number(&n)?,
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::List(
                items
                    .into_iter()
                    .map(|item| self.decode(item))
                    .collect::<Result<_>>()?,
            ),
            serde_json::Value::Object(map) => self.decode_map(map)?,
        })
    }

    /// Decode JSON text
    pub fn decode_str(&self, s: &str) -> Result<Value> {
        self.decode(serde_json::from_str(s)?)
    }

    /// Decode a JSON file
    pub fn decode_file(&self, path: &Path) -> Result<Value> {
        let content = std::fs::read_to_string(path)?;
        let value = self.decode_str(&content)?;
        tracing::debug!("Loaded document from {:?}", path);
        Ok(value)
    }

    fn decode_map(&self, map: Map<String, serde_json::Value>) -> Result<Value> {
        let signature = match map.get(SCHEMA_KEY) {
            None => None,
            Some(serde_json::Value::String(s)) => Some(parse_signature(s)?),
            Some(other) => {
                return Err(InterchangeError::MalformedPayload(format!(
                    "{SCHEMA_KEY} must be a string, found {other}"
                )))
            }
        };

        let mut fields = Dictionary::with_capacity(map.len());
        for (key, value) in map {
            if key != SCHEMA_KEY {
                let decoded = self.decode(value)?;
                fields.insert(key, decoded);
            }
        }

        let Some((name, version)) = signature else {
            return Ok(Value::Dictionary(fields));
        };
        match name.as_str() {
            RATIONAL_TIME_SCHEMA => decode_time(fields).map(Value::Time),
            TIME_RANGE_SCHEMA => {
                let mut reader = FieldReader::new(TIME_RANGE_SCHEMA, fields);
                let start_time = reader.time("start_time")?;
                let duration = reader.time("duration")?;
                Ok(Value::TimeRange(TimeRange::new(start_time, duration)))
            }
            _ => {
                let mut object = self.registry.construct(&name, version, fields)?;
                if !self.settings.preserve_dynamic_fields && !object.dynamic_fields().is_empty() {
                    tracing::warn!(
                        "Dropping {} undeclared fields of {}",
                        object.dynamic_fields().len(),
                        name
                    );
                    object.dynamic_fields_mut().clear();
                }
                Ok(Value::Object(ObjectRef::new(object)))
            }
        }
    }
}

fn parse_signature(signature: &str) -> Result<(String, i64)> {
    let malformed =
        || InterchangeError::MalformedPayload(format!("invalid schema signature `{signature}`"));
    let (name, version) = signature.rsplit_once('.').ok_or_else(malformed)?;
    if name.is_empty() {
        return Err(malformed());
    }
    let version = version.parse().map_err(|_| malformed())?;
    Ok((name.to_string(), version))
}

fn decode_number(n: &Number) -> Result<Value> {
    if let Some(v) = n.as_i64() {
        return Ok(Value::Int(v));
    }
    n.as_f64()
        .map(Value::Double)
        .ok_or_else(|| InterchangeError::MalformedPayload(format!("unsupported number {n}")))
}

fn decode_time(fields: Dictionary) -> Result<RationalTime> {
    let mut reader = FieldReader::new(RATIONAL_TIME_SCHEMA, fields);
    let value = reader.double("value", 0.0)?;
    let rate = reader.double("rate", 1.0)?;
    Ok(RationalTime::new(value, rate))
}

/// Encode a value as a JSON tree
pub fn to_json_value(value: &Value) -> Result<serde_json::Value> {
    Encoder::default().encode(value)
}

/// Encode a value as JSON text; an `indent` of 0 writes compact JSON
pub fn to_json_string(value: &Value, indent: usize) -> Result<String> {
    Encoder::new(SerializerSettings::default().with_indent(indent)).encode_to_string(value)
}

/// Encode a value into a JSON file
pub fn to_json_file(value: &Value, path: &Path, indent: usize) -> Result<()> {
    std::fs::write(path, to_json_string(value, indent)?)?;
    tracing::debug!("Saved document to {:?}", path);
    Ok(())
}

/// Decode a JSON tree using the built-in schemas
pub fn from_json_value(json: serde_json::Value) -> Result<Value> {
    Decoder::default().decode(json)
}

/// Decode JSON text using the built-in schemas
pub fn from_json_string(s: &str) -> Result<Value> {
    Decoder::default().decode_str(s)
}

/// Decode a JSON file using the built-in schemas
pub fn from_json_file(path: &Path) -> Result<Value> {
    Decoder::default().decode_file(path)
}

impl SchemaObject {
    /// Encode as JSON text; an `indent` of 0 writes compact JSON
    pub fn to_json_string(&self, indent: usize) -> Result<String> {
        let json = Encoder::default().encode_object(self)?;
        write_json(&json, indent)
    }

    /// Copy the object and everything it references.
    ///
    /// Objects shared within the graph become independent copies. Fails with
    /// [`InterchangeError::CyclicReference`] if the graph has a cycle.
    pub fn deep_copy(&self) -> Result<SchemaObject> {
        let json = Encoder::default().encode_object(self)?;
        let copy = from_json_value(json)?;
        let object = copy.as_object()?.borrow().clone();
        Ok(object)
    }
}

impl ObjectRef {
    /// Decode a schema object from JSON text
    pub fn from_json_string(s: &str) -> Result<ObjectRef> {
        match from_json_string(s)? {
            Value::Object(object) => Ok(object),
            other => Err(InterchangeError::MalformedPayload(format!(
                "expected a schema object, found {}",
                other.kind()
            ))),
        }
    }

    /// Copy the referenced object and everything it references
    pub fn deep_copy(&self) -> Result<ObjectRef> {
        Ok(ObjectRef::new(self.borrow().deep_copy()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::Effect;
    use crate::image_sequence::ImageSequenceReference;
    use crate::media_reference::ExternalReference;

    #[test]
    fn test_ints_and_doubles_stay_distinct() {
        let d: Dictionary = [("int", Value::Int(1)), ("double", Value::Double(1.0))]
            .into_iter()
            .collect();
        let text = to_json_string(&Value::from(d), 0).unwrap();
        assert_eq!(text, r#"{"int":1,"double":1.0}"#);

        let back = from_json_string(&text).unwrap();
        let back = back.as_dictionary().unwrap();
        assert_eq!(back.get("int"), Some(&Value::Int(1)));
        assert_eq!(back.get("double"), Some(&Value::Double(1.0)));
    }

    #[test]
    fn test_schema_key_comes_first() {
        let value = Value::from(ExternalReference::new("file:///a.mov"));
        let json = to_json_value(&value).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            ["OTIO_SCHEMA", "name", "target_url", "available_range", "metadata"]
        );
        assert_eq!(json["OTIO_SCHEMA"], "ExternalReference.1");
        assert!(json["available_range"].is_null());
    }

    #[test]
    fn test_time_wire_format() {
        let range = TimeRange::new(RationalTime::new(1.0, 24.0), RationalTime::new(48.0, 24.0));
        let json = to_json_value(&Value::from(range)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "OTIO_SCHEMA": "TimeRange.1",
                "duration": {"OTIO_SCHEMA": "RationalTime.1", "rate": 24.0, "value": 48.0},
                "start_time": {"OTIO_SCHEMA": "RationalTime.1", "rate": 24.0, "value": 1.0},
            })
        );
        assert_eq!(from_json_value(json).unwrap(), Value::TimeRange(range));
    }

    #[test]
    fn test_indentation() {
        let d: Dictionary = [("a", 1_i64)].into_iter().collect();
        let value = Value::from(d);
        assert_eq!(to_json_string(&value, 2).unwrap(), "{\n  \"a\": 1\n}");
        assert_eq!(to_json_string(&value, 4).unwrap(), "{\n    \"a\": 1\n}");
    }

    #[test]
    fn test_non_finite_double_is_unrepresentable() {
        let err = to_json_value(&Value::Double(f64::NAN)).unwrap_err();
        assert!(matches!(err, InterchangeError::Unrepresentable(_)));
        let err = to_json_value(&Value::from(RationalTime::new(1.0, f64::INFINITY))).unwrap_err();
        assert!(matches!(err, InterchangeError::Unrepresentable(_)));
    }

    #[test]
    fn test_cycle_fails_to_encode() {
        let a = ObjectRef::new(Effect::new("loop", "e"));
        a.borrow_mut()
            .metadata_mut()
            .unwrap()
            .insert("self", Value::Object(a.clone()));
        let err = to_json_value(&Value::Object(a.clone())).unwrap_err();
        assert!(matches!(err, InterchangeError::CyclicReference { ref schema } if schema == "Effect"));
        a.borrow_mut().metadata_mut().unwrap().clear();
    }

    #[test]
    fn test_shared_object_written_at_each_occurrence() {
        let shared = ObjectRef::new(Effect::new("shared", "blur"));
        let list = Value::from(vec![Value::Object(shared.clone()), Value::Object(shared)]);
        let back = from_json_value(to_json_value(&list).unwrap()).unwrap();
        let items = back.as_list().unwrap();
        assert_eq!(items.len(), 2);
        assert!(!items[0].as_object().unwrap().ptr_eq(items[1].as_object().unwrap()));
        assert_eq!(back, list);
    }

    #[test]
    fn test_malformed_signatures() {
        for text in [
            r#"{"OTIO_SCHEMA": "Effect"}"#,
            r#"{"OTIO_SCHEMA": "Effect.one"}"#,
            r#"{"OTIO_SCHEMA": ".1"}"#,
            r#"{"OTIO_SCHEMA": 1}"#,
        ] {
            let err = from_json_string(text).unwrap_err();
            assert!(matches!(err, InterchangeError::MalformedPayload(_)), "{text}");
        }
        assert!(matches!(
            from_json_string("{not json").unwrap_err(),
            InterchangeError::Json(_)
        ));
    }

    #[test]
    fn test_dropping_dynamic_fields() {
        let text = r#"{"OTIO_SCHEMA": "Effect.1", "effect_name": "blur", "vendor": 1}"#;
        let keep = from_json_string(text).unwrap();
        assert_eq!(keep.as_object().unwrap().borrow().dynamic_fields().len(), 1);

        let settings = SerializerSettings::default().with_preserve_dynamic_fields(false);
        let decoder = Decoder::new(SchemaRegistry::builtin(), settings);
        let dropped = decoder.decode_str(text).unwrap();
        assert!(dropped.as_object().unwrap().borrow().dynamic_fields().is_empty());
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let sequence = ImageSequenceReference::new("file:///shots").with_start_frame(10);
        let original = ObjectRef::new(sequence);
        let copy = original.deep_copy().unwrap();
        assert!(!copy.ptr_eq(&original));
        assert_eq!(copy, original);

        copy.borrow_mut().as_image_sequence_mut().unwrap().start_frame = 11;
        assert_ne!(copy, original);
    }

    #[test]
    fn test_object_from_json_string() {
        let object = ObjectRef::from_json_string(r#"{"OTIO_SCHEMA": "Effect.1", "name": "x"}"#).unwrap();
        assert_eq!(object.schema_name(), "Effect");
        assert!(ObjectRef::from_json_string("[1, 2]").is_err());
        assert_eq!(
            object.borrow().to_json_string(0).unwrap(),
            r#"{"OTIO_SCHEMA":"Effect.1","name":"x","effect_name":"","metadata":{}}"#
        );
    }
}
