//! Arithmetic operators on expressions. Every operator goes through the builders, so the result is
//! always canonical.

use crate::symbolic::{
    build::{self, power_unchecked},
    constant::Constant,
};
use std::{
    iter::{once, Product as IterProduct, Sum as IterSum},
    ops::{Add, Div, Mul, Neg, Sub},
};
use sym_error::Error;
use super::Expr;

impl Expr {
    /// Multiplies the expression by a constant.
    pub fn scale(&self, c: Constant) -> Expr {
        if c.is_zero() {
            return Expr::ZERO;
        }
        if c.is_one() {
            return self.clone();
        }

        match self {
            Self::Constant(k) => Self::Constant(*k * c),
            Self::Product(p) => {
                let times = p.times() * c;
                if times.is_zero() {
                    Expr::ZERO
                } else {
                    p.with_times(times)
                }
            },
            Self::Sum(s) => build::sum(
                s.products()
                    .iter()
                    .map(|term| term.scale(c))
                    .chain(once(Self::Constant(s.tail() * c)))
            ),
            factor => factor.clone().with_times(c),
        }
    }

    /// Returns `self^-1`.
    pub fn recip(&self) -> Expr {
        power_unchecked(self.clone(), Constant::NEG_ONE)
    }

    /// Raises the expression to a constant power.
    ///
    /// Returns an error if this would raise a differential to a non-integer power.
    pub fn pow(&self, exponent: Constant) -> Result<Expr, Error> {
        build::power(self.clone(), exponent)
    }
}

fn add(lhs: &Expr, rhs: &Expr) -> Expr {
    build::sum([lhs.clone(), rhs.clone()])
}

fn sub(lhs: &Expr, rhs: &Expr) -> Expr {
    build::sum([lhs.clone(), rhs.scale(Constant::NEG_ONE)])
}

fn mul(lhs: &Expr, rhs: &Expr) -> Expr {
    match (lhs, rhs) {
        (expr, Expr::Constant(c)) | (Expr::Constant(c), expr) => expr.scale(*c),
        _ => build::product([lhs.clone(), rhs.clone()]),
    }
}

fn div(lhs: &Expr, rhs: &Expr) -> Expr {
    match rhs {
        Expr::Constant(c) if c.is_zero() => Expr::Constant(Constant::NAN),
        Expr::Constant(c) => lhs.scale(Constant::ONE / *c),
        _ => build::product([lhs.clone(), rhs.recip()]),
    }
}

/// Implements a binary operator for every combination of owned and borrowed expressions, and for
/// expressions mixed with constants and floats.
macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $f:ident) => {
        impl $trait<Expr> for Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                $f(&self, &rhs)
            }
        }

        impl $trait<&Expr> for Expr {
            type Output = Expr;

            fn $method(self, rhs: &Expr) -> Expr {
                $f(&self, rhs)
            }
        }

        impl $trait<Expr> for &Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                $f(self, &rhs)
            }
        }

        impl $trait<&Expr> for &Expr {
            type Output = Expr;

            fn $method(self, rhs: &Expr) -> Expr {
                $f(self, rhs)
            }
        }

        impl $trait<Constant> for Expr {
            type Output = Expr;

            fn $method(self, rhs: Constant) -> Expr {
                $f(&self, &Expr::Constant(rhs))
            }
        }

        impl $trait<Expr> for Constant {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                $f(&Expr::Constant(self), &rhs)
            }
        }

        impl $trait<f64> for Expr {
            type Output = Expr;

            fn $method(self, rhs: f64) -> Expr {
                $f(&self, &Expr::from(rhs))
            }
        }

        impl $trait<f64> for &Expr {
            type Output = Expr;

            fn $method(self, rhs: f64) -> Expr {
                $f(self, &Expr::from(rhs))
            }
        }

        impl $trait<Expr> for f64 {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                $f(&Expr::from(self), &rhs)
            }
        }

        impl $trait<&Expr> for f64 {
            type Output = Expr;

            fn $method(self, rhs: &Expr) -> Expr {
                $f(&Expr::from(self), rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, add);
impl_binary_op!(Sub, sub, sub);
impl_binary_op!(Mul, mul, mul);
impl_binary_op!(Div, div, div);

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        self.scale(Constant::NEG_ONE)
    }
}

impl Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        self.scale(Constant::NEG_ONE)
    }
}

impl IterSum for Expr {
    fn sum<I: Iterator<Item = Expr>>(iter: I) -> Self {
        build::sum(iter)
    }
}

impl IterProduct for Expr {
    fn product<I: Iterator<Item = Expr>>(iter: I) -> Self {
        build::product(iter)
    }
}
