// SPDX-License-Identifier: MIT OR Apache-2.0
//! Rational time values for OrdoPlay Editor timeline interchange.
//!
//! This crate provides the two time primitives stored by the interchange
//! data model:
//! - [`RationalTime`]: a sample count at a sample rate
//! - [`TimeRange`]: a start time plus a duration
//!
//! Times convert to and from `HH:MM:SS.ffffff` time strings and SMPTE
//! timecode, including drop-frame timecode at 29.97 and 59.94.
//!
//! Arithmetic between times at different rates is carried out at the
//! higher of the two rates, and equality compares values after rescaling,
//! so `RationalTime::new(12.0, 24.0) == RationalTime::new(6.0, 12.0)`.

pub mod error;
pub mod range;
pub mod rational;
pub mod timecode;

pub use error::TimeError;
pub use range::TimeRange;
pub use rational::RationalTime;
