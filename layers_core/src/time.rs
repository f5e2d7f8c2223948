// Copyright 2026 the Layers Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic host time used to drive transition animations.
//!
//! [`HostTime`] is a point on the host's monotonic clock in nanoseconds.
//! [`Duration`] is a span in the same unit. The stack never reads a clock on
//! its own: the host passes the current time into
//! [`Layers::advance`](crate::stack::Layers::advance) from its frame loop.

use core::fmt;
use core::ops::{Add, Sub};

/// A point in time on the host's monotonic clock, in nanoseconds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Returns the raw nanosecond value.
    #[inline]
    #[must_use]
    pub const fn nanos(self) -> u64 {
        self.0
    }

    /// Returns the duration between `self` and an earlier time, or zero if
    /// `earlier` is after `self`.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }

    /// Checked addition of a duration.
    #[inline]
    #[must_use]
    pub const fn checked_add(self, duration: Duration) -> Option<Self> {
        match self.0.checked_add(duration.0) {
            Some(t) => Some(Self(t)),
            None => None,
        }
    }
}

impl Add<Duration> for HostTime {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for HostTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({})", self.0)
    }
}

/// A span of time in nanoseconds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(pub u64);

impl Duration {
    /// A zero-length duration.
    pub const ZERO: Self = Self(0);

    /// Creates a duration from whole milliseconds.
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis.saturating_mul(1_000_000))
    }

    /// Returns the raw nanosecond value.
    #[inline]
    #[must_use]
    pub const fn nanos(self) -> u64 {
        self.0
    }

    /// Returns `true` if this duration is zero.
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `elapsed / self` clamped to `0.0..=1.0`.
    ///
    /// A zero-length duration is always complete.
    #[must_use]
    pub fn fraction(self, elapsed: Self) -> f64 {
        if self.0 == 0 {
            return 1.0;
        }
        let t = elapsed.0 as f64 / self.0 as f64;
        t.clamp(0.0, 1.0)
    }
}

impl Add for Duration {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturating_since_clamps_to_zero() {
        assert_eq!(
            HostTime(10).saturating_duration_since(HostTime(25)),
            Duration::ZERO
        );
        assert_eq!(
            HostTime(25).saturating_duration_since(HostTime(10)),
            Duration(15)
        );
    }

    #[test]
    fn fraction_is_clamped() {
        let d = Duration::from_millis(200);
        assert!((d.fraction(Duration::from_millis(50)) - 0.25).abs() < 1e-9);
        assert!((d.fraction(Duration::from_millis(400)) - 1.0).abs() < 1e-9);
        assert!((Duration::ZERO.fraction(Duration::ZERO) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn checked_add_overflows_to_none() {
        assert_eq!(HostTime(u64::MAX).checked_add(Duration(1)), None);
        assert_eq!(HostTime(1).checked_add(Duration(2)), Some(HostTime(3)));
    }
}
