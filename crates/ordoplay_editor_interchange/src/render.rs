// SPDX-License-Identifier: MIT OR Apache-2.0
//! Deterministic text rendering of values and object graphs.
//!
//! Objects render as `SchemaName(field=value, ...)` in declared field order,
//! dictionaries as `{"key": value, ...}` and lists as `[value, ...]`. An
//! object reached again while it is still being rendered prints as
//! `<cycle SchemaName>`.

use crate::dictionary::Dictionary;
use crate::object::{ObjectRef, SchemaBody, SchemaObject};
use crate::value::Value;
use std::fmt::{self, Write};

/// Renders values into a formatter
pub struct DebugRenderer<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
    active: Vec<usize>,
}

impl<'a, 'b> DebugRenderer<'a, 'b> {
    /// Render into `f`
    pub fn new(f: &'a mut fmt::Formatter<'b>) -> Self {
        Self {
            f,
            active: Vec::new(),
        }
    }

    /// Render a value
    pub fn value(&mut self, value: &Value) -> fmt::Result {
        match value {
            Value::Empty => self.f.write_str("null"),
            Value::Bool(v) => write!(self.f, "{v}"),
            Value::Int(v) => write!(self.f, "{v}"),
            Value::Double(v) => write!(self.f, "{v:?}"),
            Value::String(v) => write!(self.f, "{v:?}"),
            Value::Time(v) => write!(self.f, "{v}"),
            Value::TimeRange(v) => write!(self.f, "{v}"),
            Value::Dictionary(v) => self.dictionary(v),
            Value::List(items) => {
                self.f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.f.write_str(", ")?;
                    }
                    self.value(item)?;
                }
                self.f.write_char(']')
            }
            Value::Object(object) => self.object_ref(object),
        }
    }

    /// Render a dictionary
    pub fn dictionary(&mut self, dictionary: &Dictionary) -> fmt::Result {
        self.f.write_char('{')?;
        for (i, (key, value)) in dictionary.iter().enumerate() {
            if i > 0 {
                self.f.write_str(", ")?;
            }
            write!(self.f, "{key:?}: ")?;
            self.value(value)?;
        }
        self.f.write_char('}')
    }

    /// Render a schema object
    pub fn object(&mut self, object: &SchemaObject) -> fmt::Result {
        if let SchemaBody::Unknown(unknown) = object.body() {
            write!(
                self.f,
                "{}(original_schema_name={:?}, original_schema_version={}, fields=",
                object.schema_name(),
                unknown.original_schema_name(),
                unknown.original_schema_version(),
            )?;
            self.dictionary(&object.to_fields())?;
            return self.f.write_char(')');
        }

        write!(self.f, "{}(", object.schema_name())?;
        for (i, (key, value)) in object.to_fields().iter().enumerate() {
            if i > 0 {
                self.f.write_str(", ")?;
            }
            write!(self.f, "{key}=")?;
            self.value(value)?;
        }
        self.f.write_char(')')
    }

    /// Render the object behind a shared handle
    pub fn object_ref(&mut self, object: &ObjectRef) -> fmt::Result {
        let addr = object.addr();
        if self.active.contains(&addr) {
            return write!(self.f, "<cycle {}>", object.schema_name());
        }
        self.active.push(addr);
        let result = self.object(&object.borrow());
        self.active.pop();
        result
    }
}
