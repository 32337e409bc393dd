// SPDX-License-Identifier: MIT OR Apache-2.0
//! A span of time given by a start time and a duration.

use crate::rational::RationalTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open span `[start_time, start_time + duration)`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    start_time: RationalTime,
    duration: RationalTime,
}

impl TimeRange {
    /// Create a range from a start time and a duration
    pub const fn new(start_time: RationalTime, duration: RationalTime) -> Self {
        Self { start_time, duration }
    }

    /// Create a range covering `[start_time, end_time_exclusive)`.
    ///
    /// The duration is expressed at the start time's rate.
    pub fn from_start_end_time(start_time: RationalTime, end_time_exclusive: RationalTime) -> Self {
        let duration = RationalTime::new(
            end_time_exclusive.value_rescaled_to(start_time.rate()) - start_time.value(),
            start_time.rate(),
        );
        Self::new(start_time, duration)
    }

    /// First instant of the range
    pub fn start_time(&self) -> RationalTime {
        self.start_time
    }

    /// Length of the range
    pub fn duration(&self) -> RationalTime {
        self.duration
    }

    /// First instant after the range, at the duration's rate
    pub fn end_time_exclusive(&self) -> RationalTime {
        self.duration + self.start_time.rescaled_to(self.duration.rate())
    }

    /// Last whole sample inside the range, at the duration's rate.
    ///
    /// Ranges no longer than one sample collapse to their start time.
    pub fn end_time_inclusive(&self) -> RationalTime {
        let end = self.end_time_exclusive();
        let span = end - self.start_time.rescaled_to(self.duration.rate());

        if span.value() > 1.0 {
            if self.duration.value() != self.duration.value().floor() {
                end.floor()
            } else {
                end - RationalTime::new(1.0, self.duration.rate())
            }
        } else {
            self.start_time
        }
    }

    /// Check whether `time` lies inside the range
    pub fn contains(&self, time: RationalTime) -> bool {
        self.start_time <= time && time < self.end_time_exclusive()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeRange({}, {})", self.start_time, self.duration)
    }
}
