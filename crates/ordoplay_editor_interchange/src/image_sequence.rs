// SPDX-License-Identifier: MIT OR Apache-2.0
//! Image sequence media references and frame numbering.
//!
//! An image sequence is a run of files whose names differ only by an
//! embedded frame number, e.g. `shot.0001.exr, shot.0002.exr, ...`.
//! Three numberings are involved:
//! - presentation time, within the reference's available range
//! - image number, counting images from 0
//! - frame number, the integer printed in the file name:
//!   `start_frame + image_number * frame_step`
//!
//! Frame numbers may be negative. They are printed with the sign first and
//! the digits zero-padded to `frame_zero_padding`, so frame `-1` at padding 4
//! prints as `-0001`.

use crate::dictionary::Dictionary;
use crate::error::{InterchangeError, Result};
use crate::media_reference::{media_reference_common, MediaReferenceBase};
use crate::schema::{FieldReader, Schema};
use ordoplay_editor_time::{RationalTime, TimeRange};
use std::fmt;
use std::str::FromStr;

/// What a consumer should do when a frame file is absent.
///
/// Recorded only; frame numbering never looks at the file system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MissingFramePolicy {
    /// Treat a missing frame as an error
    #[default]
    Error,
    /// Hold the previous frame
    Hold,
    /// Substitute a black frame
    Black,
}

impl MissingFramePolicy {
    /// Name used in the wire format
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Hold => "hold",
            Self::Black => "black",
        }
    }
}

impl fmt::Display for MissingFramePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissingFramePolicy {
    type Err = InterchangeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "error" => Ok(Self::Error),
            "hold" => Ok(Self::Hold),
            "black" => Ok(Self::Black),
            other => Err(InterchangeError::MalformedPayload(format!(
                "unknown missing frame policy `{other}`"
            ))),
        }
    }
}

/// Reference to a sequence of numbered image files
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSequenceReference {
    /// Shared media reference fields
    pub base: MediaReferenceBase,
    /// Directory URL the file names are appended to
    pub target_url_base: String,
    /// File name text before the frame number
    pub name_prefix: String,
    /// File name text after the frame number
    pub name_suffix: String,
    /// Frame number of image 0
    pub start_frame: i64,
    /// Frame number increment between consecutive images
    pub frame_step: i64,
    /// Images per second when played at a constant rate
    pub rate: f64,
    /// Minimum digit count of printed frame numbers
    pub frame_zero_padding: i64,
    /// Handling of absent frame files
    pub missing_frame_policy: MissingFramePolicy,
}

impl Default for ImageSequenceReference {
    /// Defaults: `start_frame = 1`, `frame_step = 1`, `rate = 1.0`,
    /// `frame_zero_padding = 0`, `missing_frame_policy = Error`, empty
    /// strings, no available range, empty metadata.
    fn default() -> Self {
        Self {
            base: MediaReferenceBase::default(),
            target_url_base: String::new(),
            name_prefix: String::new(),
            name_suffix: String::new(),
            start_frame: 1,
            frame_step: 1,
            rate: 1.0,
            frame_zero_padding: 0,
            missing_frame_policy: MissingFramePolicy::Error,
        }
    }
}

media_reference_common!(ImageSequenceReference);

impl ImageSequenceReference {
    /// Create a sequence rooted at `target_url_base` with default numbering
    pub fn new(target_url_base: impl Into<String>) -> Self {
        Self {
            target_url_base: target_url_base.into(),
            ..Self::default()
        }
    }

    /// Set the file name prefix and suffix
    pub fn with_file_name(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.name_prefix = prefix.into();
        self.name_suffix = suffix.into();
        self
    }

    /// Set the frame number of image 0
    pub fn with_start_frame(mut self, start_frame: i64) -> Self {
        self.start_frame = start_frame;
        self
    }

    /// Set the frame number increment
    pub fn with_frame_step(mut self, frame_step: i64) -> Self {
        self.frame_step = frame_step;
        self
    }

    /// Set the image rate
    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    /// Set the frame number padding
    pub fn with_frame_zero_padding(mut self, padding: i64) -> Self {
        self.frame_zero_padding = padding;
        self
    }

    /// Set the missing frame policy
    pub fn with_missing_frame_policy(mut self, policy: MissingFramePolicy) -> Self {
        self.missing_frame_policy = policy;
        self
    }

    fn checked_frame_step(&self) -> Result<i64> {
        if self.frame_step == 0 {
            return Err(InterchangeError::InvalidFrameStep);
        }
        Ok(self.frame_step)
    }

    fn check_image_number(&self, image_number: i64) -> Result<()> {
        let count = self.number_of_images_in_sequence();
        if image_number < 0 || image_number >= count {
            return Err(InterchangeError::ImageNumberOutOfRange {
                image_number,
                count,
            });
        }
        Ok(())
    }

    fn frame_for_image_number(&self, image_number: i64) -> Result<i64> {
        let frame_step = self.checked_frame_step()?;
        image_number
            .checked_mul(frame_step)
            .and_then(|offset| self.start_frame.checked_add(offset))
            .ok_or(InterchangeError::FrameNumberOverflow {
                image_number,
                start_frame: self.start_frame,
                frame_step,
            })
    }

    /// Number of images covered by the available range.
    ///
    /// Zero when there is no available range or the rate is not positive.
    pub fn number_of_images_in_sequence(&self) -> i64 {
        match self.base.available_range {
            Some(range) if self.rate > 0.0 => {
                (range.duration().to_seconds() * self.rate).round() as i64
            }
            _ => 0,
        }
    }

    /// Frame number of the last image.
    ///
    /// A sequence without images ends at its start frame.
    pub fn end_frame(&self) -> Result<i64> {
        self.checked_frame_step()?;
        let count = self.number_of_images_in_sequence();
        if count == 0 {
            return Ok(self.start_frame);
        }
        self.frame_for_image_number(count - 1)
    }

    /// Frame number shown at `time`
    pub fn frame_for_time(&self, time: RationalTime) -> Result<i64> {
        self.checked_frame_step()?;
        let range = match self.base.available_range {
            Some(range) if range.contains(time) => range,
            range => return Err(InterchangeError::TimeOutOfRange { time, range }),
        };
        let offset = time - range.start_time();
        let image_number = (offset.to_seconds() * self.rate).round() as i64;
        self.frame_for_image_number(image_number)
    }

    /// First and last frame numbers covered by `range`
    pub fn frame_range_for_time_range(&self, range: TimeRange) -> Result<(i64, i64)> {
        let first = self.frame_for_time(range.start_time())?;
        let last = self.frame_for_time(range.end_time_inclusive())?;
        Ok((first, last))
    }

    /// URL of the file holding image `image_number`
    pub fn target_url_for_image_number(&self, image_number: i64) -> Result<String> {
        self.check_image_number(image_number)?;
        let frame = self.frame_for_image_number(image_number)?;
        Ok(self.file_url(&format_frame_number(frame, self.frame_zero_padding)))
    }

    /// Time at which image `image_number` is presented
    pub fn presentation_time_for_image_number(&self, image_number: i64) -> Result<RationalTime> {
        self.check_image_number(image_number)?;
        let start = self
            .base
            .available_range
            .map(|range| range.start_time())
            .unwrap_or_default();
        Ok(start + RationalTime::new(image_number as f64, self.rate))
    }

    /// URL pattern with `symbol` in place of the frame number.
    ///
    /// Useful for glob or printf-style paths such as `shot.####.exr`.
    pub fn abstract_target_url(&self, symbol: &str) -> String {
        self.file_url(symbol)
    }

    fn file_url(&self, frame_text: &str) -> String {
        let base = &self.target_url_base;
        let mut url = String::with_capacity(
            base.len() + 1 + self.name_prefix.len() + frame_text.len() + self.name_suffix.len(),
        );
        url.push_str(base);
        if !base.is_empty() && !base.ends_with('/') {
            url.push('/');
        }
        url.push_str(&self.name_prefix);
        url.push_str(frame_text);
        url.push_str(&self.name_suffix);
        url
    }
}

/// Print a frame number with its sign first and digits padded to `padding`
pub fn format_frame_number(frame: i64, padding: i64) -> String {
    let width = usize::try_from(padding).unwrap_or(0);
    let sign = if frame < 0 { "-" } else { "" };
    format!("{sign}{:0width$}", frame.unsigned_abs())
}

impl Schema for ImageSequenceReference {
    const NAME: &'static str = "ImageSequenceReference";
    const VERSION: i64 = 1;

    fn write_fields(&self, fields: &mut Dictionary) {
        self.base.write_name(fields);
        fields.insert("target_url_base", self.target_url_base.clone());
        fields.insert("name_prefix", self.name_prefix.clone());
        fields.insert("name_suffix", self.name_suffix.clone());
        fields.insert("start_frame", self.start_frame);
        fields.insert("frame_step", self.frame_step);
        fields.insert("rate", self.rate);
        fields.insert("frame_zero_padding", self.frame_zero_padding);
        fields.insert("missing_frame_policy", self.missing_frame_policy.as_str());
        self.base.write_range_and_metadata(fields);
    }

    fn read_fields(reader: &mut FieldReader) -> Result<Self> {
        let defaults = Self::default();
        let base = MediaReferenceBase::read(reader)?;
        let policy = reader.string("missing_frame_policy")?;
        Ok(Self {
            base,
            target_url_base: reader.string("target_url_base")?,
            name_prefix: reader.string("name_prefix")?,
            name_suffix: reader.string("name_suffix")?,
            start_frame: reader.int("start_frame", defaults.start_frame)?,
            frame_step: reader.int("frame_step", defaults.frame_step)?,
            rate: reader.double("rate", defaults.rate)?,
            frame_zero_padding: reader.int("frame_zero_padding", defaults.frame_zero_padding)?,
            missing_frame_policy: if policy.is_empty() {
                defaults.missing_frame_policy
            } else {
                policy.parse()?
            },
        })
    }
}
