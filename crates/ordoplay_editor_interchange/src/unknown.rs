// SPDX-License-Identifier: MIT OR Apache-2.0
//! Placeholder for schema objects the registry does not recognise.

use crate::dictionary::Dictionary;

/// Object of an unrecognised schema, kept so it can be written back unchanged.
///
/// Only the registry creates these, when decoding meets a schema name it
/// does not know or a version newer than the registered one.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownSchema {
    original_schema_name: String,
    original_schema_version: i64,
    fields: Dictionary,
}

impl UnknownSchema {
    /// Schema name reported for every unknown object
    pub const NAME: &'static str = "UnknownSchema";
    /// Schema version reported for every unknown object
    pub const VERSION: i64 = 1;

    pub(crate) fn new(
        original_schema_name: impl Into<String>,
        original_schema_version: i64,
        fields: Dictionary,
    ) -> Self {
        Self {
            original_schema_name: original_schema_name.into(),
            original_schema_version,
            fields,
        }
    }

    /// Schema name found on the wire
    pub fn original_schema_name(&self) -> &str {
        &self.original_schema_name
    }

    /// Schema version found on the wire
    pub fn original_schema_version(&self) -> i64 {
        self.original_schema_version
    }

    /// Fields as decoded, in their original order
    pub fn fields(&self) -> &Dictionary {
        &self.fields
    }

    /// Always `true`
    pub fn is_unknown_schema(&self) -> bool {
        true
    }

    pub(crate) fn write_fields(&self, fields: &mut Dictionary) {
        fields.extend(self.fields.iter().map(|(key, value)| (key, value.clone())));
    }
}
