//! Complex-valued numeric constants.
//!
//! A [`Constant`] is a pair of `f64`s. Constants are the leaves every builder folds numbers into,
//! and the named constants [`Constant::ZERO`] and [`Constant::ONE`] are the sentinels the
//! builders test against to annihilate or drop terms.
//!
//! # Equality and ordering
//!
//! Constants are compared **structurally**: two constants are equal if their parts have the same
//! bit patterns. To make this agree with numeric equality where it matters, every constructor
//! normalizes `-0.0` to `0.0` and every NaN to a single canonical NaN. The total order compares
//! the real parts first and only falls back to the imaginary parts to break ties; it is used to
//! order terms canonically, not to compare the magnitude of complex numbers.

use crate::symbolic::error::NonPositiveLogarithm;
use std::{
    cmp::Ordering,
    fmt::{Display, Formatter},
    hash::{Hash, Hasher},
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};
use sym_error::Error;

/// Normalizes the representation of a single part of a constant.
fn normalize(n: f64) -> f64 {
    if n == 0.0 {
        0.0
    } else if n.is_nan() {
        f64::NAN
    } else {
        n
    }
}

/// A complex number `re + im * i`.
#[derive(Debug, Clone, Copy)]
pub struct Constant {
    re: f64,
    im: f64,
}

impl Constant {
    /// The additive identity.
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };

    /// The multiplicative identity.
    pub const ONE: Self = Self { re: 1.0, im: 0.0 };

    /// Negative one.
    pub const NEG_ONE: Self = Self { re: -1.0, im: 0.0 };

    /// The result of dividing by [`Constant::ZERO`].
    pub const NAN: Self = Self { re: f64::NAN, im: 0.0 };

    /// Euler's number, the base of the natural exponential.
    pub const E: Self = Self { re: std::f64::consts::E, im: 0.0 };

    /// Creates a constant from its real and imaginary parts.
    pub fn new(re: f64, im: f64) -> Self {
        Self { re: normalize(re), im: normalize(im) }
    }

    /// Creates a real constant.
    pub fn real(re: f64) -> Self {
        Self::new(re, 0.0)
    }

    /// The real part.
    pub fn re(&self) -> f64 {
        self.re
    }

    /// The imaginary part.
    pub fn im(&self) -> f64 {
        self.im
    }

    pub fn is_zero(&self) -> bool {
        self.re == 0.0 && self.im == 0.0
    }

    pub fn is_one(&self) -> bool {
        self.re == 1.0 && self.im == 0.0
    }

    /// Returns true if either part is NaN, which is how division by zero is reported.
    pub fn is_nan(&self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }

    pub fn is_real(&self) -> bool {
        self.im == 0.0
    }

    /// Returns true if the constant is a finite real integer.
    pub fn is_integer(&self) -> bool {
        self.is_real() && self.re.is_finite() && self.re.fract() == 0.0
    }

    /// Returns true if the constant should be written with a leading minus sign, i.e. its real
    /// part is negative, or it is purely imaginary with a negative imaginary part.
    pub fn is_sign_negative(&self) -> bool {
        self.re < 0.0 || (self.re == 0.0 && self.im < 0.0)
    }

    /// Raises this constant to the power of `exponent`.
    ///
    /// Real constants raised to real exponents stay on the real branch, so a negative base with a
    /// fractional exponent produces [`Constant::NAN`]. Otherwise the principal branch of the
    /// complex power is used.
    pub fn pow(self, exponent: Constant) -> Constant {
        if self.is_real() && exponent.is_real() {
            return Constant::real(self.re.powf(exponent.re));
        }

        if self.is_zero() {
            return if exponent.re > 0.0 { Constant::ZERO } else { Constant::NAN };
        }

        // z^w = e^(w ln z)
        let ln = self.ln_principal();
        let power = exponent * ln;
        let magnitude = power.re.exp();
        Constant::new(magnitude * power.im.cos(), magnitude * power.im.sin())
    }

    /// The natural logarithm.
    ///
    /// Non-positive real constants have no logarithm, and produce a [`NonPositiveLogarithm`]
    /// error. Constants with a non-zero imaginary part use the principal branch.
    pub fn ln(self) -> Result<Constant, Error> {
        if self.is_nan() {
            Ok(Constant::NAN)
        } else if self.is_real() && self.re <= 0.0 {
            Err(Error::spanning(self.to_string(), NonPositiveLogarithm { value: self }))
        } else if self.is_real() {
            Ok(self.ln_real())
        } else {
            Ok(self.ln_principal())
        }
    }

    /// The natural logarithm of a positive real constant. The caller must guarantee that the
    /// constant is positive and real.
    pub(crate) fn ln_real(self) -> Constant {
        if self == Constant::E {
            Constant::ONE
        } else {
            Constant::real(self.re.ln())
        }
    }

    /// The principal branch of the complex logarithm.
    fn ln_principal(self) -> Constant {
        Constant::new(self.re.hypot(self.im).ln(), self.im.atan2(self.re))
    }

    /// Returns true if the constant needs parentheses when written as a coefficient or exponent.
    pub(crate) fn needs_parens(&self) -> bool {
        self.re != 0.0 && self.im != 0.0
    }
}

impl Default for Constant {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<f64> for Constant {
    fn from(n: f64) -> Self {
        Self::real(n)
    }
}

impl From<i32> for Constant {
    fn from(n: i32) -> Self {
        Self::real(n as f64)
    }
}

/// Structural equality. See the [module-level documentation](self).
impl PartialEq for Constant {
    fn eq(&self, other: &Self) -> bool {
        self.re.to_bits() == other.re.to_bits() && self.im.to_bits() == other.im.to_bits()
    }
}

impl Eq for Constant {}

impl Hash for Constant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.re.to_bits().hash(state);
        self.im.to_bits().hash(state);
    }
}

impl PartialOrd for Constant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Orders by real part, then by imaginary part.
impl Ord for Constant {
    fn cmp(&self, other: &Self) -> Ordering {
        self.re.total_cmp(&other.re)
            .then_with(|| self.im.total_cmp(&other.im))
    }
}

impl Add for Constant {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Constant {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Constant {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.is_real() && rhs.is_real() {
            return Self::real(self.re * rhs.re);
        }
        Self::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

/// Division by [`Constant::ZERO`] produces [`Constant::NAN`] rather than an error.
impl Div for Constant {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        if rhs.is_zero() {
            return Self::NAN;
        }
        if self.is_real() && rhs.is_real() {
            return Self::real(self.re / rhs.re);
        }
        let denominator = rhs.re * rhs.re + rhs.im * rhs.im;
        Self::new(
            (self.re * rhs.re + self.im * rhs.im) / denominator,
            (self.im * rhs.re - self.re * rhs.im) / denominator,
        )
    }
}

impl Neg for Constant {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.re, -self.im)
    }
}

impl AddAssign for Constant {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Constant {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Constant {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign for Constant {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

/// Helper function to format the imaginary part of the complex number.
fn fmt_imaginary(f: &mut Formatter<'_>, n: f64) -> std::fmt::Result {
    if n == 1.0 {
        write!(f, "i")
    } else if n == -1.0 {
        write!(f, "-i")
    } else {
        write!(f, "{}i", n)
    }
}

impl Display for Constant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if *self == Constant::E {
            return write!(f, "e");
        }

        // real part comes first, then imaginary
        match (self.re == 0.0, self.im == 0.0) {
            (false, false) => {
                write!(f, "{}", self.re)?;
                if self.im.is_sign_positive() {
                    write!(f, " + ")?;
                    fmt_imaginary(f, self.im)
                } else {
                    write!(f, " - ")?;
                    fmt_imaginary(f, -self.im)
                }
            },
            (false, true) => write!(f, "{}", self.re),
            (true, false) => fmt_imaginary(f, self.im),
            (true, true) => write!(f, "0"),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{
        afe_abs,
        afe_relative_error_msg,
        afe_is_relative_eq,
        assert_float_relative_eq,
    };
    use super::*;

    #[test]
    fn sentinels_are_normalized() {
        assert_eq!(Constant::real(-0.0), Constant::ZERO);
        assert_eq!(Constant::real(0.0) * Constant::real(-3.0), Constant::ZERO);
        assert!(Constant::real(f64::NAN).is_nan());
        assert_eq!(Constant::real(-f64::NAN), Constant::NAN);
    }

    #[test]
    fn division_by_zero_is_nan() {
        assert!((Constant::ONE / Constant::ZERO).is_nan());
        assert!((Constant::new(1.0, 2.0) / Constant::ZERO).is_nan());
    }

    #[test]
    fn complex_arithmetic() {
        let a = Constant::new(1.0, 2.0);
        let b = Constant::new(3.0, -1.0);
        assert_eq!(a * b, Constant::new(5.0, 5.0));
        assert_eq!(a + b, Constant::new(4.0, 1.0));
        assert_eq!((a * b) / b, a);
    }

    #[test]
    fn ordering_by_real_part() {
        assert!(Constant::real(-2.0) < Constant::real(1.0));
        assert!(Constant::new(1.0, 5.0) < Constant::real(2.0));
        assert!(Constant::new(1.0, -1.0) < Constant::new(1.0, 1.0));
    }

    #[test]
    fn real_power() {
        assert_eq!(Constant::real(2.0).pow(Constant::real(10.0)), Constant::real(1024.0));
        assert_eq!(Constant::real(4.0).pow(Constant::real(-0.5)), Constant::real(0.5));
        assert!(Constant::real(-4.0).pow(Constant::real(0.5)).is_nan());
    }

    #[test]
    fn complex_power() {
        // i^2 = -1
        let square = Constant::new(0.0, 1.0).pow(Constant::real(2.0));
        assert_float_relative_eq!(square.re(), -1.0);
        assert!(square.im().abs() < 1e-12);
    }

    #[test]
    fn logarithm() {
        assert_eq!(Constant::E.ln().unwrap(), Constant::ONE);
        assert_float_relative_eq!(Constant::real(10.0).ln().unwrap().re(), 10f64.ln());
        assert!(Constant::ZERO.ln().is_err());

        let err = Constant::real(-2.0).ln().unwrap_err();
        assert!(err.is::<NonPositiveLogarithm>());
        assert_eq!(err.source, "-2");
    }

    #[test]
    fn display() {
        assert_eq!(Constant::real(2.0).to_string(), "2");
        assert_eq!(Constant::real(-0.5).to_string(), "-0.5");
        assert_eq!(Constant::new(0.0, 1.0).to_string(), "i");
        assert_eq!(Constant::new(3.0, -2.0).to_string(), "3 - 2i");
        assert_eq!(Constant::E.to_string(), "e");
    }
}
