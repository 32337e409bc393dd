// SPDX-License-Identifier: MIT OR Apache-2.0
//! Serializer settings, stored on disk as RON.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options controlling how documents are written and read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializerSettings {
    /// Spaces per indentation level when writing JSON; 0 writes compact JSON
    #[serde(default = "default_indent")]
    pub indent: usize,
    /// Keep fields a schema does not declare when decoding
    #[serde(default = "default_preserve_dynamic_fields")]
    pub preserve_dynamic_fields: bool,
}

fn default_indent() -> usize {
    4
}

fn default_preserve_dynamic_fields() -> bool {
    true
}

impl Default for SerializerSettings {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            preserve_dynamic_fields: default_preserve_dynamic_fields(),
        }
    }
}

impl SerializerSettings {
    /// Settings writing compact JSON
    pub fn compact() -> Self {
        Self {
            indent: 0,
            ..Self::default()
        }
    }

    /// Set the indentation width
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Set whether undeclared fields survive decoding
    pub fn with_preserve_dynamic_fields(mut self, preserve: bool) -> Self {
        self.preserve_dynamic_fields = preserve;
        self
    }

    /// Serialize to RON format
    pub fn to_ron(&self) -> Result<String> {
        let config = ron::ser::PrettyConfig::default().struct_names(true);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Deserialize from RON format
    pub fn from_ron(s: &str) -> Result<Self> {
        Ok(ron::from_str(s)?)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_ron()?)?;
        tracing::debug!("Saved serializer settings to {:?}", path);
        Ok(())
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_ron(&content)?;
        tracing::debug!("Loaded serializer settings from {:?}", path);
        Ok(settings)
    }
}
