//! Channel arithmetic with first-order uncertainty propagation.
//!
//! Operands are treated as uncorrelated, matching the workspace algebra the
//! DNS reduction chain is written against.

use std::ops::{Add, Div, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measured {
    pub value: f64,
    pub sigma: f64,
}

impl Measured {
    pub const fn new(value: f64, sigma: f64) -> Self {
        Self { value, sigma }
    }

    pub const fn exact(value: f64) -> Self {
        Self { value, sigma: 0.0 }
    }

    /// Counting statistics: sigma is the square root of the count.
    pub fn counted(value: f64) -> Self {
        Self {
            value,
            sigma: value.abs().sqrt(),
        }
    }

    pub fn variance(self) -> f64 {
        self.sigma * self.sigma
    }

    fn from_variance(value: f64, variance: f64) -> Self {
        Self {
            value,
            sigma: variance.sqrt(),
        }
    }

    pub fn is_finite(self) -> bool {
        self.value.is_finite() && self.sigma.is_finite()
    }
}

impl Add for Measured {
    type Output = Measured;

    fn add(self, rhs: Measured) -> Measured {
        Measured::from_variance(self.value + rhs.value, self.variance() + rhs.variance())
    }
}

impl Sub for Measured {
    type Output = Measured;

    fn sub(self, rhs: Measured) -> Measured {
        Measured::from_variance(self.value - rhs.value, self.variance() + rhs.variance())
    }
}

impl Mul for Measured {
    type Output = Measured;

    fn mul(self, rhs: Measured) -> Measured {
        Measured::from_variance(
            self.value * rhs.value,
            rhs.value * rhs.value * self.variance() + self.value * self.value * rhs.variance(),
        )
    }
}

impl Div for Measured {
    type Output = Measured;

    fn div(self, rhs: Measured) -> Measured {
        let quotient = self.value / rhs.value;
        Measured::from_variance(
            quotient,
            (self.variance() + quotient * quotient * rhs.variance()) / (rhs.value * rhs.value),
        )
    }
}

impl Mul<f64> for Measured {
    type Output = Measured;

    fn mul(self, factor: f64) -> Measured {
        Measured::new(self.value * factor, self.sigma * factor.abs())
    }
}

impl Neg for Measured {
    type Output = Measured;

    fn neg(self) -> Measured {
        Measured::new(-self.value, self.sigma)
    }
}

#[cfg(test)]
mod tests {
    use super::Measured;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1.0e-12,
            "{actual} != {expected}"
        );
    }

    #[test]
    fn sums_and_differences_add_variances() {
        let lhs = Measured::new(10.0, 3.0);
        let rhs = Measured::new(4.0, 4.0);

        let sum = lhs + rhs;
        assert_close(sum.value, 14.0);
        assert_close(sum.sigma, 5.0);

        let difference = lhs - rhs;
        assert_close(difference.value, 6.0);
        assert_close(difference.sigma, 5.0);
    }

    #[test]
    fn products_and_quotients_use_relative_errors() {
        let lhs = Measured::new(6.0, 0.3);
        let rhs = Measured::new(2.0, 0.2);

        let product = lhs * rhs;
        assert_close(product.value, 12.0);
        assert_close(product.variance(), 4.0 * 0.09 + 36.0 * 0.04);

        let quotient = lhs / rhs;
        assert_close(quotient.value, 3.0);
        assert_close(quotient.variance(), (0.09 + 9.0 * 0.04) / 4.0);
    }

    #[test]
    fn quotient_with_zero_numerator_keeps_numerator_error() {
        let quotient = Measured::new(0.0, 1.0) / Measured::new(2.0, 0.5);
        assert_close(quotient.value, 0.0);
        assert_close(quotient.sigma, 0.5);
    }

    #[test]
    fn scalar_scaling_uses_absolute_factor() {
        let scaled = Measured::new(5.0, 2.0) * -0.5;
        assert_close(scaled.value, -2.5);
        assert_close(scaled.sigma, 1.0);
        assert_eq!(-Measured::new(1.0, 0.1), Measured::new(-1.0, 0.1));
    }

    #[test]
    fn counting_statistics_use_square_root() {
        let counted = Measured::counted(2997.0);
        assert_close(counted.sigma, 2997.0_f64.sqrt());
        assert_eq!(Measured::exact(1.0).sigma, 0.0);
        assert!(!(Measured::exact(1.0) / Measured::exact(0.0)).is_finite());
    }
}
