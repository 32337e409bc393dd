// SPDX-License-Identifier: MIT OR Apache-2.0
//! Effects applied to timeline items.

use crate::dictionary::Dictionary;
use crate::error::Result;
use crate::object::HasMetadata;
use crate::schema::{FieldReader, Schema};

/// A named effect with free-form metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effect {
    /// Display name
    pub name: String,
    /// Identifier of the effect, e.g. `"blur"`
    pub effect_name: String,
    /// Free-form metadata
    pub metadata: Dictionary,
}

impl Effect {
    /// Create an effect
    pub fn new(name: impl Into<String>, effect_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            effect_name: effect_name.into(),
            metadata: Dictionary::new(),
        }
    }

    /// Set the metadata
    pub fn with_metadata(mut self, metadata: Dictionary) -> Self {
        self.metadata = metadata;
        self
    }

    fn write_effect_fields(&self, fields: &mut Dictionary) {
        fields.insert("name", self.name.clone());
        fields.insert("effect_name", self.effect_name.clone());
        fields.insert("metadata", self.metadata.clone());
    }

    fn read_effect_fields(reader: &mut FieldReader, default_effect_name: &str) -> Result<Self> {
        let name = reader.string("name")?;
        let effect_name = reader
            .optional_string("effect_name")?
            .unwrap_or_else(|| default_effect_name.to_string());
        Ok(Self {
            name,
            effect_name,
            metadata: reader.dictionary("metadata")?,
        })
    }
}

impl HasMetadata for Effect {
    fn metadata(&self) -> &Dictionary {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Dictionary {
        &mut self.metadata
    }
}

impl Schema for Effect {
    const NAME: &'static str = "Effect";
    const VERSION: i64 = 1;

    fn write_fields(&self, fields: &mut Dictionary) {
        self.write_effect_fields(fields);
    }

    fn read_fields(reader: &mut FieldReader) -> Result<Self> {
        Effect::read_effect_fields(reader, "")
    }
}

/// Constant change of playback speed.
///
/// A `time_scalar` of 2.0 plays twice as fast, 0.5 at half speed and
/// negative values play backwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearTimeWarp {
    /// Shared effect fields
    pub effect: Effect,
    /// Speed multiplier
    pub time_scalar: f64,
}

impl Default for LinearTimeWarp {
    fn default() -> Self {
        Self {
            effect: Effect::new("", Self::NAME),
            time_scalar: 1.0,
        }
    }
}

impl LinearTimeWarp {
    /// Create a time warp playing at `time_scalar` times normal speed
    pub fn new(name: impl Into<String>, time_scalar: f64) -> Self {
        Self {
            effect: Effect::new(name, Self::NAME),
            time_scalar,
        }
    }
}

impl HasMetadata for LinearTimeWarp {
    fn metadata(&self) -> &Dictionary {
        &self.effect.metadata
    }

    fn metadata_mut(&mut self) -> &mut Dictionary {
        &mut self.effect.metadata
    }
}

impl Schema for LinearTimeWarp {
    const NAME: &'static str = "LinearTimeWarp";
    const VERSION: i64 = 1;

    fn write_fields(&self, fields: &mut Dictionary) {
        self.effect.write_effect_fields(fields);
        fields.insert("time_scalar", self.time_scalar);
    }

    fn read_fields(reader: &mut FieldReader) -> Result<Self> {
        let effect = Effect::read_effect_fields(reader, Self::NAME)?;
        Ok(Self {
            effect,
            time_scalar: reader.double("time_scalar", 1.0)?,
        })
    }
}

/// Hold of the first frame for the duration of the item.
///
/// Written with a `time_scalar` of 0.0; the value read back is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct FreezeFrame {
    /// Shared effect fields
    pub effect: Effect,
}

impl Default for FreezeFrame {
    fn default() -> Self {
        Self::new("")
    }
}

impl FreezeFrame {
    /// Create a freeze frame
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            effect: Effect::new(name, Self::NAME),
        }
    }

    /// Speed multiplier, always 0.0
    pub fn time_scalar(&self) -> f64 {
        0.0
    }
}

impl HasMetadata for FreezeFrame {
    fn metadata(&self) -> &Dictionary {
        &self.effect.metadata
    }

    fn metadata_mut(&mut self) -> &mut Dictionary {
        &mut self.effect.metadata
    }
}

impl Schema for FreezeFrame {
    const NAME: &'static str = "FreezeFrame";
    const VERSION: i64 = 1;

    fn write_fields(&self, fields: &mut Dictionary) {
        self.effect.write_effect_fields(fields);
        fields.insert("time_scalar", self.time_scalar());
    }

    fn read_fields(reader: &mut FieldReader) -> Result<Self> {
        let effect = Effect::read_effect_fields(reader, Self::NAME)?;
        reader.double("time_scalar", 0.0)?;
        Ok(Self { effect })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_effect_fields() {
        let effect = Effect::new("blur it", "blur");
        let mut fields = Dictionary::new();
        effect.write_fields(&mut fields);
        assert_eq!(fields.keys().collect::<Vec<_>>(), ["name", "effect_name", "metadata"]);
        assert_eq!(fields.get("effect_name").unwrap().as_str().unwrap(), "blur");
    }

    #[test]
    fn test_time_warp_defaults_effect_name() {
        let warp = LinearTimeWarp::new("fast", 2.0);
        assert_eq!(warp.effect.effect_name, "LinearTimeWarp");

        let fields: Dictionary = [("name", Value::from("slow")), ("time_scalar", Value::Int(2))]
            .into_iter()
            .collect();
        let mut reader = FieldReader::new(LinearTimeWarp::NAME, fields);
        let read = LinearTimeWarp::read_fields(&mut reader).unwrap();
        assert_eq!(read.effect.effect_name, "LinearTimeWarp");
        assert_eq!(read.time_scalar, 2.0);
    }

    #[test]
    fn test_empty_effect_name_is_kept() {
        let mut warp = LinearTimeWarp::new("fast", 2.0);
        warp.effect.effect_name = String::new();
        let mut fields = Dictionary::new();
        warp.write_fields(&mut fields);

        let mut reader = FieldReader::new(LinearTimeWarp::NAME, fields);
        let read = LinearTimeWarp::read_fields(&mut reader).unwrap();
        assert_eq!(read.effect.effect_name, "");
        assert_eq!(read, warp);

        let fields: Dictionary = [("effect_name", Value::Empty)].into_iter().collect();
        let mut reader = FieldReader::new(FreezeFrame::NAME, fields);
        let freeze = FreezeFrame::read_fields(&mut reader).unwrap();
        assert_eq!(freeze.effect.effect_name, "FreezeFrame");
    }

    #[test]
    fn test_freeze_frame_scalar_is_fixed() {
        let fields: Dictionary = [("name", Value::from("hold")), ("time_scalar", Value::from(3.0))]
            .into_iter()
            .collect();
        let mut reader = FieldReader::new(FreezeFrame::NAME, fields);
        let freeze = FreezeFrame::read_fields(&mut reader).unwrap();
        assert!(reader.into_remaining().is_empty());

        let mut written = Dictionary::new();
        freeze.write_fields(&mut written);
        assert_eq!(written.get("time_scalar"), Some(&Value::Double(0.0)));
        assert_eq!(written.get("effect_name").unwrap().as_str().unwrap(), "FreezeFrame");
    }

    #[test]
    fn test_metadata_access() {
        let mut warp = LinearTimeWarp::default();
        warp.metadata_mut().insert("speed", "ramp");
        assert_eq!(warp.effect.metadata.len(), 1);
        assert_eq!(warp.time_scalar, 1.0);
    }
}
