// SPDX-License-Identifier: MIT OR Apache-2.0
//! A point in time expressed as a value at a rate.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// A time value measured in units of `1 / rate` seconds
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RationalTime {
    value: f64,
    rate: f64,
}

impl RationalTime {
    /// Create a time of `value` samples at `rate` samples per second
    pub const fn new(value: f64, rate: f64) -> Self {
        Self { value, rate }
    }

    /// Create a time from seconds, expressed at `rate`
    pub fn from_seconds(seconds: f64, rate: f64) -> Self {
        Self::new(seconds * rate, rate)
    }

    /// Sample count
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Samples per second
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Same instant expressed at `new_rate`
    pub fn rescaled_to(&self, new_rate: f64) -> Self {
        Self::new(self.value_rescaled_to(new_rate), new_rate)
    }

    /// Sample count of this instant at `new_rate`
    pub fn value_rescaled_to(&self, new_rate: f64) -> f64 {
        if new_rate == self.rate {
            self.value
        } else {
            self.value * new_rate / self.rate
        }
    }

    /// Time in seconds
    pub fn to_seconds(&self) -> f64 {
        self.value / self.rate
    }

    /// Round the value down to a whole sample
    pub fn floor(&self) -> Self {
        Self::new(self.value.floor(), self.rate)
    }

    /// Check whether two times lie within `delta` samples of each other,
    /// measured at this time's rate
    pub fn almost_equal(&self, other: &RationalTime, delta: f64) -> bool {
        (self.value - other.value_rescaled_to(self.rate)).abs() <= delta
    }
}

impl Default for RationalTime {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl PartialEq for RationalTime {
    /// Compares both values at the higher of the two rates
    fn eq(&self, other: &Self) -> bool {
        let rate = self.rate.max(other.rate);
        self.value_rescaled_to(rate) == other.value_rescaled_to(rate)
    }
}

impl PartialOrd for RationalTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.to_seconds().partial_cmp(&other.to_seconds())
    }
}

impl Add for RationalTime {
    type Output = RationalTime;

    fn add(self, rhs: RationalTime) -> RationalTime {
        if self.rate < rhs.rate {
            Self::new(self.value_rescaled_to(rhs.rate) + rhs.value, rhs.rate)
        } else {
            Self::new(self.value + rhs.value_rescaled_to(self.rate), self.rate)
        }
    }
}

impl AddAssign for RationalTime {
    fn add_assign(&mut self, rhs: RationalTime) {
        *self = *self + rhs;
    }
}

impl Sub for RationalTime {
    type Output = RationalTime;

    fn sub(self, rhs: RationalTime) -> RationalTime {
        if self.rate < rhs.rate {
            Self::new(self.value_rescaled_to(rhs.rate) - rhs.value, rhs.rate)
        } else {
            Self::new(self.value - rhs.value_rescaled_to(self.rate), self.rate)
        }
    }
}

impl fmt::Display for RationalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RationalTime({}, {})", self.value, self.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_across_rates() {
        assert_eq!(RationalTime::new(12.0, 24.0), RationalTime::new(6.0, 12.0));
        assert_ne!(RationalTime::new(12.0, 24.0), RationalTime::new(12.0, 25.0));
    }

    #[test]
    fn test_equality_is_symmetric() {
        let pairs = [
            (RationalTime::new(29.0, 7.0), RationalTime::new(29.0, 7.0).rescaled_to(1.0)),
            (RationalTime::new(5.0, 24.0), RationalTime::new(0.0, 0.0)),
            (RationalTime::new(1.0, 3.0), RationalTime::new(10.0, 30.0)),
            (RationalTime::new(100.0, 29.97), RationalTime::new(100.0, 30.0)),
        ];
        for (a, b) in pairs {
            assert_eq!(a == b, b == a, "{a} vs {b}");
        }
        assert_eq!(RationalTime::new(1.0, 3.0), RationalTime::new(10.0, 30.0));
        assert_ne!(RationalTime::new(5.0, 24.0), RationalTime::new(0.0, 0.0));
    }

    #[test]
    fn test_rescale() {
        let t = RationalTime::new(48.0, 24.0);
        assert_eq!(t.rescaled_to(30.0).value(), 60.0);
        assert_eq!(t.to_seconds(), 2.0);
        assert_eq!(RationalTime::from_seconds(1.5, 30.0).value(), 45.0);
    }

    #[test]
    fn test_arithmetic_uses_higher_rate() {
        let sum = RationalTime::new(1.0, 24.0) + RationalTime::new(1.0, 48.0);
        assert_eq!(sum.rate(), 48.0);
        assert_eq!(sum.value(), 3.0);

        let diff = RationalTime::new(10.0, 30.0) - RationalTime::new(4.0, 30.0);
        assert_eq!(diff.value(), 6.0);
        assert_eq!(diff.rate(), 30.0);

        let mut t = RationalTime::new(1.0, 24.0);
        t += RationalTime::new(2.0, 24.0);
        assert_eq!(t.value(), 3.0);
    }

    #[test]
    fn test_ordering_and_almost_equal() {
        assert!(RationalTime::new(1.0, 24.0) < RationalTime::new(1.0, 12.0));
        assert!(RationalTime::new(10.0, 24.0).almost_equal(&RationalTime::new(10.001, 24.0), 0.01));
        assert!(!RationalTime::new(10.0, 24.0).almost_equal(&RationalTime::new(11.0, 24.0), 0.5));
    }

    #[test]
    fn test_display() {
        assert_eq!(RationalTime::new(1.0, 24.0).to_string(), "RationalTime(1, 24)");
        assert_eq!(RationalTime::new(1.5, 24.0).to_string(), "RationalTime(1.5, 24)");
    }

    #[test]
    fn test_ron_round_trip() {
        let t = RationalTime::new(18.0, 24.0);
        let text = ron::to_string(&t).unwrap();
        let back: RationalTime = ron::from_str(&text).unwrap();
        assert_eq!(back, t);
    }
}
