// SPDX-License-Identifier: MIT OR Apache-2.0
//! Conversions between times and their text forms.
//!
//! Time strings are wall-clock `HH:MM:SS.ffffff`. Timecode counts whole
//! frames at the nominal rate (30 for 29.97); drop-frame timecode skips
//! frame numbers at the start of every minute not divisible by ten.

use crate::error::{Result, TimeError};
use crate::rational::RationalTime;

const MICROSECONDS_PER_SECOND: f64 = 1_000_000.0;

fn check_rate(rate: f64) -> Result<()> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(TimeError::InvalidRate(rate))
    }
}

/// Frames counted per timecode second at `rate`
fn nominal_fps(rate: f64) -> Result<i64> {
    check_rate(rate)?;
    let fps = rate.round() as i64;
    if fps < 1 {
        return Err(TimeError::InvalidRate(rate));
    }
    Ok(fps)
}

/// Frame numbers skipped each minute by drop-frame timecode at `rate`
fn dropped_frames_per_minute(rate: f64) -> Result<i64> {
    if (rate - 29.97).abs() < 0.01 {
        Ok(2)
    } else if (rate - 59.94).abs() < 0.01 {
        Ok(4)
    } else {
        Err(TimeError::DropFrameRate(rate))
    }
}

/// Frame count as labelled by drop-frame timecode
fn with_dropped_frames(frame: i64, fps: i64, dropped: i64) -> i64 {
    let per_ten_minutes = fps * 600 - dropped * 9;
    let per_minute = fps * 60 - dropped;
    let tens = frame / per_ten_minutes;
    let rest = frame % per_ten_minutes;
    let mut skipped = dropped * 9 * tens;
    if rest > dropped {
        skipped += dropped * ((rest - dropped) / per_minute);
    }
    frame.saturating_add(skipped)
}

fn is_digits(field: &str) -> bool {
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit())
}

impl RationalTime {
    /// Create a time of `frames` whole frames at `rate`
    pub fn from_frames(frames: i64, rate: f64) -> Self {
        Self::new(frames as f64, rate)
    }

    /// Nearest whole frame at `rate`
    pub fn to_frames(&self, rate: f64) -> i64 {
        self.value_rescaled_to(rate).round() as i64
    }

    /// Format as `HH:MM:SS.ffffff`, rounded to the microsecond.
    ///
    /// Negative times carry a leading `-`.
    pub fn to_time_string(&self) -> String {
        let total = self.to_seconds();
        let sign = if total < 0.0 { "-" } else { "" };
        let micros = (total.abs() * MICROSECONDS_PER_SECOND).round() as u64;
        let fraction = micros % 1_000_000;
        let seconds = micros / 1_000_000;
        format!(
            "{sign}{:02}:{:02}:{:02}.{fraction:06}",
            seconds / 3600,
            (seconds / 60) % 60,
            seconds % 60
        )
    }

    /// Parse `[-]HH:MM:SS[.fraction]` into a time at `rate`
    pub fn from_time_string(text: &str, rate: f64) -> Result<Self> {
        check_rate(rate)?;
        let invalid = || TimeError::InvalidTimestring(text.to_string());

        let (sign, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (-1.0, rest),
            None => (1.0, text),
        };
        let fields: Vec<&str> = unsigned.split(':').collect();
        let [hours, minutes, seconds] = fields[..] else {
            return Err(invalid());
        };
        let seconds_valid = match seconds.split_once('.') {
            Some((whole, fraction)) => is_digits(whole) && is_digits(fraction),
            None => is_digits(seconds),
        };
        if !is_digits(hours) || !is_digits(minutes) || !seconds_valid {
            return Err(invalid());
        }

        let hours: f64 = hours.parse().map_err(|_| invalid())?;
        let minutes: f64 = minutes.parse().map_err(|_| invalid())?;
        let seconds: f64 = seconds.parse().map_err(|_| invalid())?;
        if minutes >= 60.0 || seconds >= 60.0 {
            return Err(invalid());
        }
        Ok(Self::from_seconds(
            sign * (hours * 3600.0 + minutes * 60.0 + seconds),
            rate,
        ))
    }

    /// Format as SMPTE timecode at `rate`.
    ///
    /// Non-drop timecode is `HH:MM:SS:FF`; drop-frame timecode uses `;`
    /// before the frame field and is only defined at 29.97 and 59.94.
    pub fn to_timecode(&self, rate: f64, drop_frame: bool) -> Result<String> {
        let fps = nominal_fps(rate)?;
        let mut frame = self.to_frames(rate);
        if frame < 0 {
            return Err(TimeError::NegativeTimecode(frame));
        }

        let separator = if drop_frame {
            frame = with_dropped_frames(frame, fps, dropped_frames_per_minute(rate)?);
            ';'
        } else {
            ':'
        };
        let seconds = frame / fps;
        Ok(format!(
            "{:02}:{:02}:{:02}{separator}{:02}",
            seconds / 3600,
            (seconds / 60) % 60,
            seconds % 60,
            frame % fps
        ))
    }

    /// Parse SMPTE timecode into a whole-frame time at `rate`.
    ///
    /// A `;` anywhere in the text marks drop-frame timecode.
    pub fn from_timecode(text: &str, rate: f64) -> Result<Self> {
        let fps = nominal_fps(rate)?;
        let invalid = || TimeError::InvalidTimecode(text.to_string());

        let drop_frame = text.contains(';');
        let fields: Vec<&str> = text.split([':', ';']).collect();
        let [hours, minutes, seconds, frames] = fields[..] else {
            return Err(invalid());
        };
        let parse = |field: &str| -> Result<i64> {
            if !is_digits(field) {
                return Err(invalid());
            }
            field.parse().map_err(|_| invalid())
        };
        let (hours, minutes, seconds, frames) =
            (parse(hours)?, parse(minutes)?, parse(seconds)?, parse(frames)?);
        if minutes >= 60 || seconds >= 60 || frames >= fps {
            return Err(invalid());
        }

        let total_seconds = hours
            .checked_mul(3600)
            .and_then(|s| s.checked_add(minutes * 60 + seconds))
            .ok_or_else(invalid)?;
        let mut frame = total_seconds
            .checked_mul(fps)
            .and_then(|f| f.checked_add(frames))
            .ok_or_else(invalid)?;

        if drop_frame {
            let dropped = dropped_frames_per_minute(rate)?;
            // these labels are skipped
            if seconds == 0 && frames < dropped && minutes % 10 != 0 {
                return Err(invalid());
            }
            let total_minutes = total_seconds / 60;
            frame -= dropped * (total_minutes - total_minutes / 10);
        }
        Ok(Self::from_frames(frame, rate))
    }
}
