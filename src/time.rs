//! Time-related types for the driver's bounded waits
//!
//! The AX5043 has no timestamp counter the driver relies on, so all timing is
//! taken from a host-provided [`Clock`] with microsecond resolution.

use core::ops::{Add, Sub};

#[cfg(feature = "defmt")]
use defmt::Format;

/// A monotonic microsecond time source
///
/// Every bounded wait in the driver measures elapsed time against `now` and
/// calls `yield_now` between polls, so cooperative schedulers get a chance to
/// run other work. Sleeping between polls goes through the `DelayNs`
/// implementation that accompanies the clock.
pub trait Clock {
    /// Returns the current time
    fn now(&mut self) -> Instant;

    /// Called between two polls of a busy wait
    fn yield_now(&mut self) {}
}

/// Represents an instant in time, in microseconds since an arbitrary epoch
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Instant(u64);

impl Instant {
    /// Creates a new instance of `Instant`
    ///
    /// # Example
    ///
    /// ``` rust
    /// use ax5043::time::Instant;
    ///
    /// let instant = Instant::from_micros(1_500);
    /// assert_eq!(instant.value(), 1_500);
    /// ```
    pub fn from_micros(value: u64) -> Self {
        Instant(value)
    }

    /// Returns the raw microsecond count
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Returns the amount of time passed between the two `Instant`s
    ///
    /// Assumes that `&self` represents a later time than the argument
    /// `earlier`. A clock that wrapped in between yields the wrapped
    /// difference.
    ///
    /// # Example
    ///
    /// ``` rust
    /// use ax5043::time::Instant;
    ///
    /// let earlier = Instant::from_micros(100);
    /// let later = Instant::from_micros(350);
    ///
    /// assert_eq!(later.duration_since(earlier).value(), 250);
    /// ```
    pub fn duration_since(&self, earlier: Instant) -> Duration {
        Duration(self.0.wrapping_sub(earlier.0))
    }
}

impl Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, rhs: Duration) -> Self::Output {
        Instant(self.0.wrapping_add(rhs.0))
    }
}

impl Sub<Duration> for Instant {
    type Output = Instant;

    fn sub(self, rhs: Duration) -> Self::Output {
        Instant(self.0.wrapping_sub(rhs.0))
    }
}

impl Sub<Instant> for Instant {
    type Output = Duration;

    fn sub(self, rhs: Instant) -> Self::Output {
        self.duration_since(rhs)
    }
}

/// A duration between two instants, in microseconds
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Duration(u64);

impl Duration {
    /// Creates a new `Duration` from microseconds
    pub const fn from_micros(micros: u64) -> Self {
        Duration(micros)
    }

    /// Creates a new `Duration` from milliseconds
    pub const fn from_millis(millis: u64) -> Self {
        Duration(millis * 1_000)
    }

    /// Returns the duration in microseconds
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Add<Duration> for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Self::Output {
        Duration(self.0.saturating_add(rhs.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instant_add_duration() {
        let instant = Instant::from_micros(1_000);
        let later = instant + Duration::from_millis(5);

        assert_eq!(later.value(), 6_000);
    }

    #[test]
    fn instant_sub_duration() {
        let instant = Instant::from_micros(1_000);

        assert_eq!((instant - Duration::from_micros(400)).value(), 600);
    }

    #[test]
    fn instant_sub_instant() {
        let start = Instant::from_micros(10);
        let end = Instant::from_micros(5_000_010);

        assert_eq!(end - start, Duration::from_millis(5_000));
    }

    #[test]
    fn duration_since_wrapped_clock() {
        let earlier = Instant::from_micros(u64::MAX - 9);
        let later = Instant::from_micros(10);

        assert_eq!(later.duration_since(earlier).value(), 20);
    }

    #[test]
    fn durations_compare() {
        assert!(Duration::from_millis(1) > Duration::from_micros(999));
        assert_eq!(
            Duration::from_millis(2) + Duration::from_micros(5),
            Duration::from_micros(2_005)
        );
    }
}
