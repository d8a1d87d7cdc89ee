// Copyright 2026 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Checked time spans and monotonic instants.
//!
//! [`Duration`] is a non-negative span stored as whole seconds plus a
//! nanosecond remainder. [`Instant`] uses the same normalized
//! representation for a point on the process monotonic clock.
//!
//! Every arithmetic operation is checked: overflow, underflow and invalid
//! floating-point inputs come back as [`TimeError`] and are never clamped.
//! The only saturating operations are the explicitly named
//! `saturating_*` methods used for timeout computation.

use core::fmt;

use thiserror::Error;

pub(crate) const NANOS_PER_SEC: u32 = 1_000_000_000;
const NANOS_PER_MILLI: u32 = 1_000_000;
const NANOS_PER_MICRO: u32 = 1_000;

/// 2^64 as an `f64`, the first whole-second value that does not fit in `u64`.
const SECS_LIMIT_F64: f64 = 18_446_744_073_709_551_616.0;

/// Errors produced by [`Duration`] and [`Instant`] arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum TimeError {
    /// The result exceeds the largest representable duration.
    #[error("overflow when computing duration")]
    DurationOverflow,
    /// The result would be a negative duration.
    #[error("underflow when computing duration")]
    DurationUnderflow,
    /// Division by zero or a non-finite scaling result.
    #[error("invalid duration scaling (zero divisor, NaN or infinity)")]
    Division,
    /// A constructor was given NaN.
    #[error("duration value is not a number")]
    InvalidValue,
    /// `Instant + Duration` left the representable range.
    #[error("overflow when adding duration to instant")]
    InstantOverflow,
    /// `Instant - Duration` went before the clock origin.
    #[error("underflow when subtracting duration from instant")]
    InstantUnderflow,
}

/// Adds two normalized `(secs, nanos)` pairs, carrying into seconds.
const fn add_parts(a: (u64, u32), b: (u64, u32)) -> Option<(u64, u32)> {
    let Some(mut secs) = a.0.checked_add(b.0) else {
        return None;
    };
    let mut nanos = a.1 + b.1;
    if nanos >= NANOS_PER_SEC {
        nanos -= NANOS_PER_SEC;
        secs = match secs.checked_add(1) {
            Some(s) => s,
            None => return None,
        };
    }
    Some((secs, nanos))
}

/// Subtracts `b` from `a`, borrowing a second when the nanos would go negative.
const fn sub_parts(a: (u64, u32), b: (u64, u32)) -> Option<(u64, u32)> {
    let (mut secs, mut nanos) = a;
    if nanos < b.1 {
        secs = match secs.checked_sub(1) {
            Some(s) => s,
            None => return None,
        };
        nanos += NANOS_PER_SEC;
    }
    let Some(secs) = secs.checked_sub(b.0) else {
        return None;
    };
    Some((secs, nanos - b.1))
}

/// Rounds a non-negative value below 2^53 to the nearest integer, ties away
/// from zero.
#[expect(
    clippy::cast_possible_truncation,
    reason = "callers pass values below 2^53; truncation is the intent"
)]
fn round_half_away(value: f64) -> u64 {
    let whole = value as u64;
    if value - whole as f64 >= 0.5 {
        whole + 1
    } else {
        whole
    }
}

/// A non-negative span of time with nanosecond precision.
///
/// Invariant: `subsec_nanos() < 1_000_000_000`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration {
    secs: u64,
    nanos: u32,
}

impl Duration {
    /// A zero-length duration.
    pub const ZERO: Self = Self { secs: 0, nanos: 0 };

    /// The largest representable duration.
    pub const MAX: Self = Self {
        secs: u64::MAX,
        nanos: NANOS_PER_SEC - 1,
    };

    /// Creates a duration from whole seconds and nanoseconds, carrying
    /// excess nanoseconds into seconds.
    pub const fn new(secs: u64, nanos: u32) -> Result<Self, TimeError> {
        let carry = (nanos / NANOS_PER_SEC) as u64;
        match secs.checked_add(carry) {
            Some(secs) => Ok(Self {
                secs,
                nanos: nanos % NANOS_PER_SEC,
            }),
            None => Err(TimeError::DurationOverflow),
        }
    }

    /// Creates a duration from whole seconds.
    #[inline]
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self { secs, nanos: 0 }
    }

    /// Creates a duration from whole milliseconds.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "the remainder is below one second of the unit"
    )]
    pub const fn from_millis(millis: u64) -> Self {
        Self {
            secs: millis / 1_000,
            nanos: (millis % 1_000) as u32 * NANOS_PER_MILLI,
        }
    }

    /// Creates a duration from whole microseconds.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "the remainder is below one second of the unit"
    )]
    pub const fn from_micros(micros: u64) -> Self {
        Self {
            secs: micros / 1_000_000,
            nanos: (micros % 1_000_000) as u32 * NANOS_PER_MICRO,
        }
    }

    /// Creates a duration from whole nanoseconds.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "the remainder is below one second of the unit"
    )]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self {
            secs: nanos / NANOS_PER_SEC as u64,
            nanos: (nanos % NANOS_PER_SEC as u64) as u32,
        }
    }

    /// Creates a duration from fractional seconds.
    ///
    /// The sub-second remainder is rounded to the nearest nanosecond, ties
    /// away from zero.
    pub fn from_secs_f64(secs: f64) -> Result<Self, TimeError> {
        Self::from_f64_units(secs, 1.0, f64::from(NANOS_PER_SEC))
    }

    /// Creates a duration from fractional milliseconds.
    pub fn from_millis_f64(millis: f64) -> Result<Self, TimeError> {
        Self::from_f64_units(millis, 1_000.0, f64::from(NANOS_PER_MILLI))
    }

    /// Creates a duration from fractional microseconds.
    pub fn from_micros_f64(micros: f64) -> Result<Self, TimeError> {
        Self::from_f64_units(micros, 1_000_000.0, f64::from(NANOS_PER_MICRO))
    }

    /// Creates a duration from fractional nanoseconds.
    ///
    /// `from_nanos_f64(1.4)` is one nanosecond, `from_nanos_f64(1.6)` is two.
    pub fn from_nanos_f64(nanos: f64) -> Result<Self, TimeError> {
        Self::from_f64_units(nanos, f64::from(NANOS_PER_SEC), 1.0)
    }

    /// Splits `value` (in a unit with `units_per_sec` per second) into whole
    /// seconds and a rounded nanosecond remainder.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "whole seconds are range-checked against 2^64 and the remainder is below 1e9"
    )]
    fn from_f64_units(value: f64, units_per_sec: f64, nanos_per_unit: f64) -> Result<Self, TimeError> {
        if value.is_nan() {
            return Err(TimeError::InvalidValue);
        }
        if value < 0.0 {
            return Err(TimeError::DurationUnderflow);
        }
        if value.is_infinite() {
            return Err(TimeError::DurationOverflow);
        }
        // `%` is exact, so the remainder carries no rounding error.
        let rem_units = value % units_per_sec;
        let whole_secs = (value - rem_units) / units_per_sec;
        if whole_secs >= SECS_LIMIT_F64 {
            return Err(TimeError::DurationOverflow);
        }
        let nanos = round_half_away(rem_units * nanos_per_unit);
        let secs = whole_secs as u64;
        if nanos >= u64::from(NANOS_PER_SEC) {
            let secs = secs.checked_add(1).ok_or(TimeError::DurationOverflow)?;
            Ok(Self {
                secs,
                nanos: (nanos - u64::from(NANOS_PER_SEC)) as u32,
            })
        } else {
            Ok(Self {
                secs,
                nanos: nanos as u32,
            })
        }
    }

    /// Returns the whole seconds in this duration.
    #[inline]
    #[must_use]
    pub const fn as_secs(self) -> u64 {
        self.secs
    }

    /// Returns the fractional part in nanoseconds (always below one second).
    #[inline]
    #[must_use]
    pub const fn subsec_nanos(self) -> u32 {
        self.nanos
    }

    /// Returns the total number of nanoseconds.
    #[inline]
    #[must_use]
    pub const fn as_nanos(self) -> u128 {
        self.secs as u128 * NANOS_PER_SEC as u128 + self.nanos as u128
    }

    /// Returns the total number of whole milliseconds.
    #[inline]
    #[must_use]
    pub const fn as_millis(self) -> u128 {
        self.secs as u128 * 1_000 + (self.nanos / NANOS_PER_MILLI) as u128
    }

    /// Returns this duration as fractional seconds.
    #[inline]
    #[must_use]
    pub fn as_secs_f64(self) -> f64 {
        self.secs as f64 + f64::from(self.nanos) / f64::from(NANOS_PER_SEC)
    }

    /// Returns `true` if this duration spans no time.
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.secs == 0 && self.nanos == 0
    }

    /// Checked addition. Fails with [`TimeError::DurationOverflow`].
    pub const fn checked_add(self, rhs: Self) -> Result<Self, TimeError> {
        match add_parts((self.secs, self.nanos), (rhs.secs, rhs.nanos)) {
            Some((secs, nanos)) => Ok(Self { secs, nanos }),
            None => Err(TimeError::DurationOverflow),
        }
    }

    /// Checked subtraction. Fails with [`TimeError::DurationUnderflow`] when
    /// `rhs > self`.
    pub const fn checked_sub(self, rhs: Self) -> Result<Self, TimeError> {
        match sub_parts((self.secs, self.nanos), (rhs.secs, rhs.nanos)) {
            Some((secs, nanos)) => Ok(Self { secs, nanos }),
            None => Err(TimeError::DurationUnderflow),
        }
    }

    /// Subtraction clamped at zero.
    #[inline]
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        match self.checked_sub(rhs) {
            Ok(d) => d,
            Err(_) => Self::ZERO,
        }
    }

    /// Scales this duration by `factor`.
    ///
    /// The product is computed on the total nanosecond count in double
    /// precision and re-normalized.
    pub fn checked_mul_f64(self, factor: f64) -> Result<Self, TimeError> {
        Self::from_total_nanos_f64(self.as_nanos() as f64 * factor)
    }

    /// Divides this duration by `divisor`.
    ///
    /// A zero or NaN divisor is [`TimeError::Division`].
    pub fn checked_div_f64(self, divisor: f64) -> Result<Self, TimeError> {
        if divisor == 0.0 || divisor.is_nan() {
            return Err(TimeError::Division);
        }
        Self::from_total_nanos_f64(self.as_nanos() as f64 / divisor)
    }

    fn from_total_nanos_f64(total: f64) -> Result<Self, TimeError> {
        if !total.is_finite() {
            return Err(TimeError::Division);
        }
        Self::from_nanos_f64(total)
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({}.{:09}s)", self.secs, self.nanos)
    }
}

impl From<core::time::Duration> for Duration {
    fn from(d: core::time::Duration) -> Self {
        Self {
            secs: d.as_secs(),
            nanos: d.subsec_nanos(),
        }
    }
}

impl From<Duration> for core::time::Duration {
    fn from(d: Duration) -> Self {
        Self::new(d.secs, d.nanos)
    }
}

/// A point on the process monotonic clock.
///
/// Instants are only comparable to other instants read from the same clock.
/// Use [`Instant::now`] (with the `std` feature) or the clock exposed by
/// the native event loop.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Instant {
    secs: u64,
    nanos: u32,
}

impl Instant {
    /// The clock origin.
    pub const ZERO: Self = Self { secs: 0, nanos: 0 };

    /// Creates an instant at `offset` past the clock origin.
    ///
    /// Clock implementations use this to publish their readings.
    #[inline]
    #[must_use]
    pub const fn from_offset(offset: Duration) -> Self {
        Self {
            secs: offset.secs,
            nanos: offset.nanos,
        }
    }

    /// Returns the span from the clock origin to this instant.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> Duration {
        Duration {
            secs: self.secs,
            nanos: self.nanos,
        }
    }

    /// Reads the process monotonic clock.
    #[cfg(feature = "std")]
    #[must_use]
    pub fn now() -> Self {
        clock::monotonic_now()
    }

    /// Returns `now() + d`.
    #[cfg(feature = "std")]
    pub fn after(d: Duration) -> Result<Self, TimeError> {
        Self::now().checked_add(d)
    }

    /// Returns an instant `secs` fractional seconds from now.
    #[cfg(feature = "std")]
    pub fn after_secs(secs: f64) -> Result<Self, TimeError> {
        Self::after(Duration::from_secs_f64(secs)?)
    }

    /// Returns an instant `millis` fractional milliseconds from now.
    #[cfg(feature = "std")]
    pub fn after_millis(millis: f64) -> Result<Self, TimeError> {
        Self::after(Duration::from_millis_f64(millis)?)
    }

    /// Returns an instant `micros` fractional microseconds from now.
    #[cfg(feature = "std")]
    pub fn after_micros(micros: f64) -> Result<Self, TimeError> {
        Self::after(Duration::from_micros_f64(micros)?)
    }

    /// Returns an instant `nanos` fractional nanoseconds from now.
    #[cfg(feature = "std")]
    pub fn after_nanos(nanos: f64) -> Result<Self, TimeError> {
        Self::after(Duration::from_nanos_f64(nanos)?)
    }

    /// Checked `self + d`. Fails with [`TimeError::InstantOverflow`].
    pub const fn checked_add(self, d: Duration) -> Result<Self, TimeError> {
        match add_parts((self.secs, self.nanos), (d.secs, d.nanos)) {
            Some((secs, nanos)) => Ok(Self { secs, nanos }),
            None => Err(TimeError::InstantOverflow),
        }
    }

    /// Checked `self - d`. Fails with [`TimeError::InstantUnderflow`].
    pub const fn checked_sub(self, d: Duration) -> Result<Self, TimeError> {
        match sub_parts((self.secs, self.nanos), (d.secs, d.nanos)) {
            Some((secs, nanos)) => Ok(Self { secs, nanos }),
            None => Err(TimeError::InstantUnderflow),
        }
    }

    /// Returns the span since `earlier`, failing with
    /// [`TimeError::DurationUnderflow`] if `earlier` is later than `self`.
    pub const fn checked_duration_since(self, earlier: Self) -> Result<Duration, TimeError> {
        self.offset().checked_sub(earlier.offset())
    }

    /// Returns the span since `earlier`, or zero if `earlier` is later.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        self.offset().saturating_sub(earlier.offset())
    }
}

impl fmt::Debug for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instant({}.{:09}s)", self.secs, self.nanos)
    }
}

#[cfg(all(feature = "std", unix))]
mod clock {
    use rustix::time::{ClockId, Timespec, clock_gettime};

    use super::{Instant, NANOS_PER_SEC};

    pub(super) fn monotonic_now() -> Instant {
        timespec_to_instant(clock_gettime(ClockId::Monotonic))
    }

    pub(super) fn timespec_to_instant(timespec: Timespec) -> Instant {
        let secs = u64::try_from(timespec.tv_sec).unwrap_or(0);
        let nanos = u32::try_from(timespec.tv_nsec)
            .unwrap_or(0)
            .min(NANOS_PER_SEC - 1);
        Instant { secs, nanos }
    }
}

#[cfg(all(feature = "std", not(unix)))]
mod clock {
    use std::sync::OnceLock;

    use super::{Duration, Instant};

    static ORIGIN: OnceLock<std::time::Instant> = OnceLock::new();

    pub(super) fn monotonic_now() -> Instant {
        let origin = *ORIGIN.get_or_init(std::time::Instant::now);
        Instant::from_offset(Duration::from(origin.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(d: Duration) -> (u64, u32) {
        (d.as_secs(), d.subsec_nanos())
    }

    #[test]
    fn fractional_seconds_split_into_parts() {
        let d = Duration::from_secs_f64(1.5).unwrap();
        assert_eq!(parts(d), (1, 500_000_000), "1.5s");
    }

    #[test]
    fn fractional_millis_keep_sub_milli_remainder() {
        let d = Duration::from_millis_f64(1000.5).unwrap();
        assert_eq!(parts(d), (1, 500_000), "1000.5ms");
    }

    #[test]
    fn fractional_micros() {
        let d = Duration::from_micros_f64(2_000_001.25).unwrap();
        assert_eq!(parts(d), (2, 1_250), "2000001.25us");
    }

    #[test]
    fn nanos_round_half_away_from_zero() {
        assert_eq!(Duration::from_nanos_f64(1.4).unwrap().subsec_nanos(), 1);
        assert_eq!(Duration::from_nanos_f64(1.6).unwrap().subsec_nanos(), 2);
        assert_eq!(Duration::from_nanos_f64(2.5).unwrap().subsec_nanos(), 3);
    }

    #[test]
    fn rounding_can_carry_into_seconds() {
        let d = Duration::from_secs_f64(0.999_999_999_9).unwrap();
        assert_eq!(parts(d), (1, 0), "remainder rounds up to a full second");
    }

    #[test]
    fn nanos_round_trip_through_f64() {
        for (secs, nanos) in [(0_u64, 0_u32), (0, 999_999_999), (3, 1), (86_400, 123_456_789)] {
            let total = secs as f64 * 1e9 + f64::from(nanos);
            let d = Duration::from_nanos_f64(total).unwrap();
            assert_eq!(parts(d), (secs, nanos), "round trip of {total}");
        }
    }

    #[test]
    fn invalid_constructor_inputs() {
        assert_eq!(
            Duration::from_secs_f64(f64::NAN),
            Err(TimeError::InvalidValue)
        );
        assert_eq!(
            Duration::from_millis_f64(-1.0),
            Err(TimeError::DurationUnderflow)
        );
        assert_eq!(
            Duration::from_secs_f64(f64::INFINITY),
            Err(TimeError::DurationOverflow)
        );
        assert_eq!(
            Duration::from_secs_f64(18e19),
            Err(TimeError::DurationOverflow)
        );
    }

    #[test]
    fn integer_constructors() {
        assert_eq!(parts(Duration::from_millis(1_234)), (1, 234_000_000));
        assert_eq!(parts(Duration::from_micros(1_000_001)), (1, 1_000));
        assert_eq!(parts(Duration::from_nanos(5_000_000_007)), (5, 7));
        assert_eq!(parts(Duration::new(1, 2_500_000_000).unwrap()), (3, 500_000_000));
        assert_eq!(
            Duration::new(u64::MAX, NANOS_PER_SEC),
            Err(TimeError::DurationOverflow)
        );
    }

    #[test]
    fn add_carries_nanos() {
        let a = Duration::new(1, 700_000_000).unwrap();
        let b = Duration::new(2, 600_000_000).unwrap();
        assert_eq!(parts(a.checked_add(b).unwrap()), (4, 300_000_000));
    }

    #[test]
    fn add_overflow_is_reported() {
        assert_eq!(
            Duration::from_secs_f64(18e19).and_then(|a| a.checked_add(a)),
            Err(TimeError::DurationOverflow),
            "18e19 seconds does not fit in u64"
        );
        let big = Duration::from_secs(u64::MAX / 2 + 1);
        assert_eq!(big.checked_add(big), Err(TimeError::DurationOverflow));
        let carry = Duration::MAX.checked_add(Duration::from_nanos(1));
        assert_eq!(carry, Err(TimeError::DurationOverflow), "nanos carry overflows");
    }

    #[test]
    fn sub_borrows_and_underflows() {
        let a = Duration::new(3, 100).unwrap();
        let b = Duration::new(1, 200).unwrap();
        assert_eq!(parts(a.checked_sub(b).unwrap()), (1, 999_999_900));
        assert_eq!(
            Duration::from_secs(1).checked_sub(Duration::from_secs(2)),
            Err(TimeError::DurationUnderflow)
        );
        assert_eq!(
            Duration::new(0, 5).unwrap().checked_sub(Duration::new(0, 6).unwrap()),
            Err(TimeError::DurationUnderflow),
            "borrow from zero seconds"
        );
    }

    #[test]
    fn sub_then_add_restores_value() {
        let a = Duration::new(7, 999_999_999).unwrap();
        let b = Duration::new(12, 1).unwrap();
        let diff = b.checked_sub(a).unwrap();
        assert_eq!(diff.checked_add(a), Ok(b));
    }

    #[test]
    fn mul_then_div_recovers_within_a_nanosecond() {
        let d = Duration::new(3, 141_592_653).unwrap();
        for k in [0.5, 2.0, 3.0, 7.25, 100.0] {
            let back = d
                .checked_mul_f64(k)
                .and_then(|m| m.checked_div_f64(k))
                .unwrap();
            let err = back.as_nanos().abs_diff(d.as_nanos());
            assert!(err <= 1, "k = {k}: off by {err}ns");
        }
    }

    #[test]
    fn invalid_scaling() {
        let d = Duration::from_secs(1);
        assert_eq!(d.checked_div_f64(0.0), Err(TimeError::Division));
        assert_eq!(d.checked_mul_f64(f64::NAN), Err(TimeError::Division));
        assert_eq!(d.checked_mul_f64(f64::INFINITY), Err(TimeError::Division));
        assert_eq!(d.checked_mul_f64(-2.0), Err(TimeError::DurationUnderflow));
        assert_eq!(
            Duration::from_secs(u64::MAX / 2).checked_mul_f64(4.0),
            Err(TimeError::DurationOverflow)
        );
    }

    #[test]
    fn instant_arithmetic() {
        let t = Instant::from_offset(Duration::new(10, 900_000_000).unwrap());
        let later = t.checked_add(Duration::from_millis(200)).unwrap();
        assert_eq!(later.offset(), Duration::new(11, 100_000_000).unwrap());
        assert_eq!(later.checked_duration_since(t), Ok(Duration::from_millis(200)));
        assert_eq!(t.saturating_duration_since(later), Duration::ZERO);
        assert_eq!(
            t.checked_duration_since(later),
            Err(TimeError::DurationUnderflow)
        );
    }

    #[test]
    fn instant_overflow_and_underflow() {
        let t = Instant::from_offset(Duration::from_secs(5));
        assert_eq!(t.checked_add(Duration::MAX), Err(TimeError::InstantOverflow));
        assert_eq!(
            t.checked_sub(Duration::from_secs(6)),
            Err(TimeError::InstantUnderflow)
        );
    }

    #[test]
    fn core_duration_conversion() {
        let core = core::time::Duration::new(4, 250);
        let d = Duration::from(core);
        assert_eq!(parts(d), (4, 250));
        assert_eq!(core::time::Duration::from(d), core);
    }

    #[cfg(feature = "std")]
    #[test]
    fn now_is_monotonic_and_bounded() {
        let first = Instant::now();
        let second = Instant::now();
        assert!(second >= first, "monotonic clock should not go backwards");
        assert_eq!(
            first.checked_add(Duration::MAX),
            Err(TimeError::InstantOverflow)
        );
        assert_eq!(
            first.checked_sub(Duration::MAX),
            Err(TimeError::InstantUnderflow)
        );
    }

    #[cfg(feature = "std")]
    #[test]
    fn after_is_in_the_future() {
        let before = Instant::now();
        let deadline = Instant::after_millis(50.0).unwrap();
        assert!(deadline > before, "deadline should be after the read");
        assert!(Instant::after_secs(-1.0).is_err(), "negative offsets fail");
    }

    #[cfg(all(feature = "std", unix))]
    #[test]
    fn timespec_conversion_clamps_nanos() {
        let t = clock::timespec_to_instant(rustix::time::Timespec {
            tv_sec: 12,
            tv_nsec: 2_000_000_000,
        });
        assert_eq!(t.offset(), Duration::new(12, 999_999_999).unwrap());
    }
}
