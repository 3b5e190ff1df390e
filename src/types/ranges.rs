// Copyright (c) 2024 Mike Tsao

use core::{
    fmt::Display,
    ops::{Mul, RangeInclusive},
};
use serde::{Deserialize, Serialize};

/// [RangedF64] enforces the given range limits while not becoming too expensive
/// to use compared to a plain f64. It enforces the value at creation, when
/// setting it explicitly, and when converting from an f64. Math on the inner
/// value is not checked.
///
/// Note that [RangedF64] doesn't tell you when clamping happens. It just does
/// it, silently.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RangedF64<const LOWER: i8, const UPPER: i8>(pub f64);
#[allow(missing_docs)]
impl<const LOWER: i8, const UPPER: i8> RangedF64<LOWER, UPPER> {
    /// The highest valid value.
    pub const MAX: f64 = UPPER as f64;
    /// The lowest valid value.
    pub const MIN: f64 = LOWER as f64;
    /// A zero value.
    pub const ZERO: f64 = 0.0;

    pub fn new(value: f64) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }
    pub const fn maximum() -> Self {
        Self(Self::MAX)
    }
    pub const fn minimum() -> Self {
        Self(Self::MIN)
    }
    pub const fn zero() -> Self {
        Self(Self::ZERO)
    }
    pub fn set(&mut self, value: f64) {
        self.0 = value.clamp(Self::MIN, Self::MAX);
    }

    pub fn to_percentage(&self) -> f64 {
        self.0 * 100.0
    }

    pub fn from_percentage(percentage: f64) -> Self {
        Self::new(percentage / 100.0)
    }
}
impl<const LOWER: i8, const UPPER: i8> Default for RangedF64<LOWER, UPPER> {
    fn default() -> Self {
        Self::new(Self::ZERO)
    }
}
impl<const LOWER: i8, const UPPER: i8> Display for RangedF64<LOWER, UPPER> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("{}", self.0))
    }
}
impl<const LOWER: i8, const UPPER: i8> From<RangedF64<LOWER, UPPER>> for f64 {
    fn from(value: RangedF64<LOWER, UPPER>) -> Self {
        value.0.clamp(RangedF64::<LOWER, UPPER>::MIN, RangedF64::<LOWER, UPPER>::MAX)
    }
}
impl<const LOWER: i8, const UPPER: i8> From<f64> for RangedF64<LOWER, UPPER> {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}
impl<const LOWER: i8, const UPPER: i8> From<f32> for RangedF64<LOWER, UPPER> {
    fn from(value: f32) -> Self {
        Self::new(value as f64)
    }
}

/// A [Normal] is a RangedF64 whose range is [0.0, 1.0]. Mix amounts such as
/// the noise blend are [Normal]s.
pub type Normal = RangedF64<0, 1>;
#[allow(missing_docs)]
impl Normal {
    pub const fn range() -> RangeInclusive<f64> {
        0.0..=1.0
    }
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }
}
impl Mul<Normal> for f64 {
    type Output = Self;

    fn mul(self, rhs: Normal) -> Self::Output {
        self * rhs.0
    }
}
impl From<Normal> for f32 {
    fn from(val: Normal) -> Self {
        val.0 as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_clamps() {
        assert_eq!(Normal::new(1.5).0, 1.0);
        assert_eq!(Normal::new(-0.5).0, 0.0);
        assert_eq!(Normal::from(0.25).0, 0.25);
        assert_eq!(Normal::default().0, 0.0);

        let mut n = Normal::maximum();
        n.set(3.0);
        assert_eq!(n, Normal::maximum());
        n.set(-3.0);
        assert_eq!(n, Normal::minimum());
    }

    #[test]
    fn normal_percentages() {
        assert_eq!(Normal::from_percentage(50.0).0, 0.5);
        assert_eq!(Normal::new(0.25).to_percentage(), 25.0);
        assert_eq!(Normal::from_percentage(250.0), Normal::maximum());
    }

    #[test]
    fn normal_scales_f64() {
        assert_eq!(2.0 * Normal::new(0.25), 0.5);
    }
}
