use std::ops::{Add, Div, Mul, Sub};

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// Floating point types accepted by [`nearly_equal`].
pub trait Float:
    Copy
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + sealed::Sealed
{
    const ZERO: Self;
    /// Smallest positive normal value of the type.
    const MIN_POSITIVE: Self;
    /// Tolerance used by [`nearly_equal_default`], 1e-5.
    const DEFAULT_EPSILON: Self;

    fn abs(self) -> Self;
}

impl Float for f32 {
    const ZERO: Self = 0.0;
    const MIN_POSITIVE: Self = f32::MIN_POSITIVE;
    const DEFAULT_EPSILON: Self = 0.00001;

    fn abs(self) -> Self {
        f32::abs(self)
    }
}

impl Float for f64 {
    const ZERO: Self = 0.0;
    const MIN_POSITIVE: Self = f64::MIN_POSITIVE;
    const DEFAULT_EPSILON: Self = 0.00001;

    fn abs(self) -> Self {
        f64::abs(self)
    }
}

/// Compares two floating point values within a relative tolerance.
///
/// When either side is exactly zero, or the difference is below the
/// smallest normal value, the check becomes absolute:
/// `|lhs - rhs| < epsilon * MIN_POSITIVE`. Otherwise the difference is
/// normalized by the sum of the magnitudes, `|lhs| + |rhs|`, not by the
/// larger one. Pass an epsilon of 0 to get exact equality.
#[allow(clippy::float_cmp)]
pub fn nearly_equal<F: Float>(lhs: F, rhs: F, epsilon: F) -> bool {
    if lhs == rhs {
        return true;
    }

    let diff = (lhs - rhs).abs();
    if lhs == F::ZERO || rhs == F::ZERO || diff < F::MIN_POSITIVE {
        return diff < epsilon * F::MIN_POSITIVE;
    }

    diff / (lhs.abs() + rhs.abs()) < epsilon
}

/// [`nearly_equal`] with the default tolerance of 1e-5.
pub fn nearly_equal_default<F: Float>(lhs: F, rhs: F) -> bool {
    nearly_equal(lhs, rhs, F::DEFAULT_EPSILON)
}

/// Asserts that two values are equal within the default tolerance.
#[track_caller]
pub fn require_nearly_equal<F: Float + std::fmt::Debug>(lhs: F, rhs: F) {
    assert!(
        nearly_equal_default(lhs, rhs),
        "floating point values differ: {lhs:?} versus {rhs:?}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_tolerance() {
        assert!(nearly_equal(1.0_f64, 1.00001, 1e-4));
        assert!(!nearly_equal(1.0_f64, 1.1, 1e-4));
        assert!(nearly_equal(1.0_f32, 1.000001, 1e-5));
        assert!(nearly_equal(-250.0_f64, -250.001, 1e-5));
    }

    #[test]
    fn denominator_is_sum_of_magnitudes() {
        // |diff| = 1, |lhs| + |rhs| = 21 => 0.0476; max-normalized would be 0.05
        assert!(nearly_equal(10.0_f64, 11.0, 0.048));
        assert!(!nearly_equal(10.0_f64, 11.0, 0.047));
    }

    #[test]
    fn exact_equality_short_circuits() {
        assert!(nearly_equal(0.0_f64, 0.0, 0.0));
        assert!(nearly_equal(3.5_f64, 3.5, 0.0));
        assert!(nearly_equal(f64::INFINITY, f64::INFINITY, 1e-5));
        assert!(!nearly_equal(3.5_f64, 3.5000001, 0.0));
    }

    #[test]
    fn zero_operand_uses_absolute_check() {
        // the absolute bound is epsilon * MIN_POSITIVE, far below 1e-10
        assert!(!nearly_equal(0.0_f64, 1e-10, 1e-5));
        assert!(nearly_equal(0.0_f64, 5e-324, 1e-5));
        assert!(nearly_equal(-0.0_f64, 0.0, 1e-5));
        assert!(!nearly_equal(0.0_f32, 1e-30, 1e-5));
    }

    #[test]
    fn subnormal_difference_uses_absolute_check() {
        let a = f64::MIN_POSITIVE;
        let b = f64::MIN_POSITIVE + 4.9e-324;
        assert!(nearly_equal(a, b, 1e-5));
    }

    #[test]
    fn nan_is_never_nearly_equal() {
        assert!(!nearly_equal(f64::NAN, f64::NAN, 1.0));
        assert!(!nearly_equal(1.0, f64::NAN, 1.0));
    }

    #[test]
    fn default_epsilon_is_one_hundred_thousandth() {
        assert!(nearly_equal_default(100.0_f64, 100.001));
        assert!(!nearly_equal_default(100.0_f64, 100.01));
        require_nearly_equal(2.0_f32, 2.00001);
    }

    #[test]
    #[should_panic(expected = "floating point values differ")]
    fn require_fails_outside_tolerance() {
        require_nearly_equal(1.0_f64, 1.5);
    }
}
