// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dynamically typed values stored in metadata and schema fields.

use crate::dictionary::Dictionary;
use crate::error::{InterchangeError, Result};
use crate::object::{ObjectRef, SchemaObject};
use ordoplay_editor_time::{RationalTime, TimeRange};
use std::fmt;

/// Ordered list of values
pub type ValueList = Vec<Value>;

/// Tag identifying the active variant of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// No value
    Empty,
    /// Boolean
    Bool,
    /// 64-bit signed integer
    Int,
    /// 64-bit float
    Double,
    /// UTF-8 string
    String,
    /// Rational time
    Time,
    /// Time range
    TimeRange,
    /// Ordered dictionary
    Dictionary,
    /// Ordered list
    List,
    /// Shared schema object
    Object,
}

impl ValueKind {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Double => "double",
            Self::String => "string",
            Self::Time => "time",
            Self::TimeRange => "time range",
            Self::Dictionary => "dictionary",
            Self::List => "list",
            Self::Object => "schema object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value of one of the types the interchange format can carry.
///
/// Reading a value as a variant it does not hold fails with
/// [`InterchangeError::TypeMismatch`]; there is no implicit conversion
/// between [`Value::Int`] and [`Value::Double`].
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// No value (`null` on the wire)
    #[default]
    Empty,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float
    Double(f64),
    /// UTF-8 string
    String(String),
    /// Rational time
    Time(RationalTime),
    /// Time range
    TimeRange(TimeRange),
    /// Ordered dictionary
    Dictionary(Dictionary),
    /// Ordered list
    List(ValueList),
    /// Shared reference to a schema object
    Object(ObjectRef),
}

impl Value {
    /// Tag of the active variant
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Empty => ValueKind::Empty,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Double(_) => ValueKind::Double,
            Self::String(_) => ValueKind::String,
            Self::Time(_) => ValueKind::Time,
            Self::TimeRange(_) => ValueKind::TimeRange,
            Self::Dictionary(_) => ValueKind::Dictionary,
            Self::List(_) => ValueKind::List,
            Self::Object(_) => ValueKind::Object,
        }
    }

    /// Whether this is [`Value::Empty`]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    fn mismatch(&self, expected: ValueKind) -> InterchangeError {
        InterchangeError::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }

    /// Read as a boolean
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Self::Bool(v) => Ok(*v),
            _ => Err(self.mismatch(ValueKind::Bool)),
        }
    }

    /// Read as an integer
    pub fn as_int(&self) -> Result<i64> {
        match self {
            Self::Int(v) => Ok(*v),
            _ => Err(self.mismatch(ValueKind::Int)),
        }
    }

    /// Read as a double
    pub fn as_double(&self) -> Result<f64> {
        match self {
            Self::Double(v) => Ok(*v),
            _ => Err(self.mismatch(ValueKind::Double)),
        }
    }

    /// Read as a string slice
    pub fn as_str(&self) -> Result<&str> {
        match self {
            Self::String(v) => Ok(v),
            _ => Err(self.mismatch(ValueKind::String)),
        }
    }

    /// Read as a rational time
    pub fn as_time(&self) -> Result<RationalTime> {
        match self {
            Self::Time(v) => Ok(*v),
            _ => Err(self.mismatch(ValueKind::Time)),
        }
    }

    /// Read as a time range
    pub fn as_time_range(&self) -> Result<TimeRange> {
        match self {
            Self::TimeRange(v) => Ok(*v),
            _ => Err(self.mismatch(ValueKind::TimeRange)),
        }
    }

    /// Read as a dictionary
    pub fn as_dictionary(&self) -> Result<&Dictionary> {
        match self {
            Self::Dictionary(v) => Ok(v),
            _ => Err(self.mismatch(ValueKind::Dictionary)),
        }
    }

    /// Read as a mutable dictionary
    pub fn as_dictionary_mut(&mut self) -> Result<&mut Dictionary> {
        match self {
            Self::Dictionary(v) => Ok(v),
            _ => Err(self.mismatch(ValueKind::Dictionary)),
        }
    }

    /// Read as a list
    pub fn as_list(&self) -> Result<&ValueList> {
        match self {
            Self::List(v) => Ok(v),
            _ => Err(self.mismatch(ValueKind::List)),
        }
    }

    /// Read as a mutable list
    pub fn as_list_mut(&mut self) -> Result<&mut ValueList> {
        match self {
            Self::List(v) => Ok(v),
            _ => Err(self.mismatch(ValueKind::List)),
        }
    }

    /// Read as a schema object reference
    pub fn as_object(&self) -> Result<&ObjectRef> {
        match self {
            Self::Object(v) => Ok(v),
            _ => Err(self.mismatch(ValueKind::Object)),
        }
    }

    /// Explicit numeric coercion: integers and doubles both read as `f64`
    pub fn coerce_to_double(&self) -> Result<f64> {
        match self {
            Self::Int(v) => Ok(*v as f64),
            Self::Double(v) => Ok(*v),
            _ => Err(self.mismatch(ValueKind::Double)),
        }
    }

    /// Deep structural comparison, independent of object identity
    pub fn is_equivalent_to(&self, other: &Value) -> bool {
        crate::equivalence::Equivalence::new().values(self, other)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.is_equivalent_to(other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::render::DebugRenderer::new(f).value(self)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<RationalTime> for Value {
    fn from(v: RationalTime) -> Self {
        Self::Time(v)
    }
}

impl From<TimeRange> for Value {
    fn from(v: TimeRange) -> Self {
        Self::TimeRange(v)
    }
}

impl From<Dictionary> for Value {
    fn from(v: Dictionary) -> Self {
        Self::Dictionary(v)
    }
}

impl From<ValueList> for Value {
    fn from(v: ValueList) -> Self {
        Self::List(v)
    }
}

impl From<ObjectRef> for Value {
    fn from(v: ObjectRef) -> Self {
        Self::Object(v)
    }
}

impl From<SchemaObject> for Value {
    fn from(v: SchemaObject) -> Self {
        Self::Object(ObjectRef::new(v))
    }
}

impl TryFrom<&Value> for bool {
    type Error = InterchangeError;

    fn try_from(value: &Value) -> Result<Self> {
        value.as_bool()
    }
}

impl TryFrom<&Value> for i64 {
    type Error = InterchangeError;

    fn try_from(value: &Value) -> Result<Self> {
        value.as_int()
    }
}

impl TryFrom<&Value> for f64 {
    type Error = InterchangeError;

    fn try_from(value: &Value) -> Result<Self> {
        value.as_double()
    }
}

impl TryFrom<&Value> for String {
    type Error = InterchangeError;

    fn try_from(value: &Value) -> Result<Self> {
        value.as_str().map(str::to_string)
    }
}

impl TryFrom<&Value> for RationalTime {
    type Error = InterchangeError;

    fn try_from(value: &Value) -> Result<Self> {
        value.as_time()
    }
}

impl TryFrom<&Value> for TimeRange {
    type Error = InterchangeError;

    fn try_from(value: &Value) -> Result<Self> {
        value.as_time_range()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(Value::Empty.kind(), ValueKind::Empty);
        assert_eq!(Value::from(true).kind(), ValueKind::Bool);
        assert_eq!(Value::from(3_i32).kind(), ValueKind::Int);
        assert_eq!(Value::from(3.0).kind(), ValueKind::Double);
        assert_eq!(Value::from("x").kind(), ValueKind::String);
        assert_eq!(Value::from(RationalTime::new(1.0, 24.0)).kind(), ValueKind::Time);
        assert_eq!(Value::from(Dictionary::new()).kind(), ValueKind::Dictionary);
        assert_eq!(Value::from(vec![Value::Empty]).kind(), ValueKind::List);
    }

    #[test]
    fn test_wrong_variant_read_fails() {
        let v = Value::from("bar");
        assert_eq!(v.as_str().unwrap(), "bar");

        let err = v.as_int().unwrap_err();
        assert!(matches!(
            err,
            InterchangeError::TypeMismatch {
                expected: ValueKind::Int,
                found: ValueKind::String,
            }
        ));
        assert!(String::try_from(&Value::Int(1)).is_err());
    }

    #[test]
    fn test_no_implicit_numeric_coercion() {
        assert_ne!(Value::Int(1), Value::Double(1.0));
        assert!(Value::Int(1).as_double().is_err());
        assert_eq!(Value::Int(1).coerce_to_double().unwrap(), 1.0);
        assert_eq!(Value::Double(2.5).coerce_to_double().unwrap(), 2.5);
        assert!(Value::from("1").coerce_to_double().is_err());
    }

    #[test]
    fn test_list_equality_is_ordered() {
        let a = Value::from(vec![Value::Int(1), Value::Int(2)]);
        let b = Value::from(vec![Value::Int(2), Value::Int(1)]);
        assert_ne!(a, b);
        assert_eq!(a, Value::from(vec![Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn test_mutable_container_access() {
        let mut v = Value::from(Dictionary::new());
        v.as_dictionary_mut().unwrap().insert("k", 1_i64);
        assert_eq!(v.as_dictionary().unwrap().len(), 1);
        assert!(v.as_list_mut().is_err());
    }
}
