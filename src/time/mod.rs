//! Time representations for integrated state histories
//!
//! Numerical solutions may be keyed either by plain `f64` seconds since J2000
//! or by a [`SplitEpoch`], which keeps the whole and fractional seconds in
//! separate components (the same idea as passing `tdb` and `tdb2` to an
//! ephemeris). Differences between split epochs are formed component-wise, so
//! long propagations keep sub-second resolution.

use std::fmt;
use std::ops::{Add, Sub};

use nalgebra::SVector;
use serde::{Deserialize, Serialize};

use crate::constants::{DAY_S, J2000};
use crate::ephemerides::TabulatedHistory;
use crate::interpolators::LagrangeInterpolator;

/// Time representation used by a numerical solution or a stored interpolant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRepresentation {
    /// `f64` seconds since J2000
    Seconds,
    /// [`SplitEpoch`]
    Split,
}

impl fmt::Display for TimeRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeRepresentation::Seconds => write!(f, "seconds"),
            TimeRepresentation::Split => write!(f, "split epoch"),
        }
    }
}

/// A time value usable as the independent variable of a state history
pub trait Epoch: Copy + PartialOrd + fmt::Debug + 'static {
    /// Representation tag of this time type
    const REPRESENTATION: TimeRepresentation;

    /// Lossless conversion to a split epoch
    fn to_split(self) -> SplitEpoch;

    /// Conversion from a split epoch (lossy for `f64`)
    fn from_split(epoch: SplitEpoch) -> Self;

    /// Seconds since J2000 as a single `f64`
    fn seconds_since_j2000(self) -> f64 {
        self.to_split().to_seconds()
    }

    /// Time from seconds since J2000
    fn from_seconds(seconds: f64) -> Self {
        Self::from_split(SplitEpoch::from_seconds(seconds))
    }

    /// `self - earlier` in seconds
    fn seconds_since(self, earlier: Self) -> f64 {
        self.to_split().elapsed_since(earlier.to_split())
    }

    /// Store a double precision interpolant keyed by this time type
    fn wrap_double_history<const N: usize>(
        interpolator: LagrangeInterpolator<Self, SVector<f64, N>>,
    ) -> TabulatedHistory<N>;

    /// Store a single precision interpolant keyed by this time type
    fn wrap_single_history<const N: usize>(
        interpolator: LagrangeInterpolator<Self, SVector<f32, N>>,
    ) -> TabulatedHistory<N>;
}

impl Epoch for f64 {
    const REPRESENTATION: TimeRepresentation = TimeRepresentation::Seconds;

    fn to_split(self) -> SplitEpoch {
        SplitEpoch::from_seconds(self)
    }

    fn from_split(epoch: SplitEpoch) -> Self {
        epoch.to_seconds()
    }

    fn seconds_since_j2000(self) -> f64 {
        self
    }

    fn from_seconds(seconds: f64) -> Self {
        seconds
    }

    fn seconds_since(self, earlier: Self) -> f64 {
        self - earlier
    }

    fn wrap_double_history<const N: usize>(
        interpolator: LagrangeInterpolator<Self, SVector<f64, N>>,
    ) -> TabulatedHistory<N> {
        TabulatedHistory::Double(interpolator)
    }

    fn wrap_single_history<const N: usize>(
        interpolator: LagrangeInterpolator<Self, SVector<f32, N>>,
    ) -> TabulatedHistory<N> {
        TabulatedHistory::Single(interpolator)
    }
}

/// Seconds since J2000 held as an integral part and a fraction in `[0, 1)`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct SplitEpoch {
    whole_seconds: f64,
    fraction: f64,
}

impl SplitEpoch {
    /// Create a split epoch, normalizing so that the fraction lies in `[0, 1)`
    pub fn new(whole_seconds: f64, fraction: f64) -> Self {
        let whole = whole_seconds.floor();
        let carry = (whole_seconds - whole) + fraction;
        let carry_whole = carry.floor();
        let mut epoch = Self {
            whole_seconds: whole + carry_whole,
            fraction: carry - carry_whole,
        };
        // carry - floor(carry) can round up to exactly 1.0 for tiny negative carries
        if epoch.fraction >= 1.0 {
            epoch.whole_seconds += 1.0;
            epoch.fraction -= 1.0;
        }
        epoch
    }

    /// Create a split epoch from seconds since J2000
    pub fn from_seconds(seconds: f64) -> Self {
        Self::new(seconds, 0.0)
    }

    /// Create a split epoch from a two-part Julian date (TDB)
    pub fn from_julian_date(jd: f64, jd_fraction: f64) -> Self {
        let day_offset = jd - J2000;
        let whole_days = day_offset.floor();
        Self::new(
            whole_days * DAY_S,
            ((day_offset - whole_days) + jd_fraction) * DAY_S,
        )
    }

    /// Integral seconds since J2000
    pub fn whole_seconds(&self) -> f64 {
        self.whole_seconds
    }

    /// Fractional seconds in `[0, 1)`
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Seconds since J2000 as a single `f64`
    pub fn to_seconds(&self) -> f64 {
        self.whole_seconds + self.fraction
    }

    /// `self - earlier` in seconds, differencing the components separately
    pub fn elapsed_since(&self, earlier: SplitEpoch) -> f64 {
        (self.whole_seconds - earlier.whole_seconds) + (self.fraction - earlier.fraction)
    }
}

impl Add<f64> for SplitEpoch {
    type Output = SplitEpoch;

    fn add(self, seconds: f64) -> Self::Output {
        SplitEpoch::new(self.whole_seconds, self.fraction + seconds)
    }
}

impl Sub for SplitEpoch {
    type Output = f64;

    fn sub(self, other: SplitEpoch) -> Self::Output {
        self.elapsed_since(other)
    }
}

impl fmt::Display for SplitEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} s + {} s", self.whole_seconds, self.fraction)
    }
}

impl Epoch for SplitEpoch {
    const REPRESENTATION: TimeRepresentation = TimeRepresentation::Split;

    fn to_split(self) -> SplitEpoch {
        self
    }

    fn from_split(epoch: SplitEpoch) -> Self {
        epoch
    }

    fn seconds_since(self, earlier: Self) -> f64 {
        self.elapsed_since(earlier)
    }

    fn wrap_double_history<const N: usize>(
        interpolator: LagrangeInterpolator<Self, SVector<f64, N>>,
    ) -> TabulatedHistory<N> {
        TabulatedHistory::SplitDouble(interpolator)
    }

    fn wrap_single_history<const N: usize>(
        interpolator: LagrangeInterpolator<Self, SVector<f32, N>>,
    ) -> TabulatedHistory<N> {
        TabulatedHistory::SplitSingle(interpolator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_split_epoch_normalization() {
        let epoch = SplitEpoch::new(10.5, 0.75);
        assert_eq!(epoch.whole_seconds(), 11.0);
        assert_eq!(epoch.fraction(), 0.25);

        let negative = SplitEpoch::new(-1.25, 0.0);
        assert_eq!(negative.whole_seconds(), -2.0);
        assert_eq!(negative.fraction(), 0.75);
    }

    #[test]
    fn test_split_epoch_keeps_small_differences() {
        // At 1e10 s a single f64 only resolves ~2e-6 s
        let t0 = SplitEpoch::new(1.0e10, 0.125);
        let t1 = t0 + 1.0e-7;
        assert!(t1 > t0);
        assert_relative_eq!(t1 - t0, 1.0e-7, epsilon = 1e-15);
    }

    #[test]
    fn test_f64_round_trip_through_split() {
        for &seconds in &[0.0, 1.5, -3.25, 123_456.789, -98_765.4321] {
            let split = seconds.to_split();
            assert_eq!(f64::from_split(split), seconds);
        }
    }

    #[test]
    fn test_from_julian_date() {
        let epoch = SplitEpoch::from_julian_date(J2000 + 1.0, 0.5);
        assert_eq!(epoch.to_seconds(), 1.5 * DAY_S);
    }

    #[test]
    fn test_ordering() {
        let a = SplitEpoch::new(5.0, 0.9);
        let b = SplitEpoch::new(6.0, 0.1);
        assert!(a < b);
        assert_relative_eq!(b.seconds_since(a), 0.2, epsilon = 1e-12);
        assert_relative_eq!(b - a, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_split_epoch_interpolation() {
        let samples: Vec<(SplitEpoch, f64)> = (0..8)
            .map(|i| (SplitEpoch::new(1.0e9, 0.0) + i as f64 * 0.5, 3.0 * i as f64))
            .collect();
        let interpolator = LagrangeInterpolator::new(samples, 6).unwrap();
        let value = interpolator.interpolate(SplitEpoch::new(1.0e9, 0.0) + 1.25);
        assert_relative_eq!(value, 7.5, epsilon = 1e-9);
    }
}
