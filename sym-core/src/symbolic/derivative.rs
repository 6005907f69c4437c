//! Differentiation with respect to the embedded infinitesimals.
//!
//! The derivative of an expression is its total differential: `d(x^2 y) = 2 x y dx + x^2 dy`.
//! Partial derivatives fall out by dividing by a differential, since a product containing
//! differentials of opposite order vanishes.

use crate::config;
use rayon::prelude::*;
use tracing::debug;
use super::{
    build::{power_unchecked, product, sum},
    constant::Constant,
    expr::{Expr, Product, Sum},
    variable::Variable,
};

/// Applies the chain rule: `d f(u) = f'(u) du`.
fn chain_rule(df: &Expr, member: &Expr) -> Expr {
    product([df.clone(), member.derivative()])
}

fn sum_rule(s: &Sum) -> Expr {
    let terms = s.products();
    if terms.len() > config::parallelism() {
        debug!(terms = terms.len(), "differentiating sum in parallel");
        sum(terms.par_iter().map(Expr::derivative).collect::<Vec<_>>())
    } else {
        sum(terms.iter().map(Expr::derivative))
    }
}

/// Produces a derivative according to the product rule:
/// `f'*g*h + f*g'*h + f*g*h'`
fn product_rule(p: &Product) -> Expr {
    let factors = p.factors();
    let terms = (0..factors.len()).map(|derivative_index| {
        product(factors.iter().enumerate().map(|(term_index, factor)| {
            if derivative_index == term_index {
                factor.derivative()
            } else {
                factor.clone()
            }
        }))
    });
    sum(terms).scale(p.times())
}

impl Expr {
    /// Returns the total differential of the expression.
    ///
    /// The derivative of a factor with respect to its member is computed once and cached in the
    /// factor.
    pub fn derivative(&self) -> Expr {
        match self {
            Self::Constant(_) | Self::Differential(_) => Expr::ZERO,
            Self::Variable(v) => Self::Differential(v.d()),
            Self::Power(p) => {
                let df = p.df(|| {
                    let exponent = p.exponent();
                    power_unchecked(p.member().clone(), exponent - Constant::ONE).scale(exponent)
                });
                chain_rule(df, p.member())
            },
            Self::Exponential(x) => {
                let df = x.df(|| self.scale(x.base().ln_real()));
                chain_rule(df, x.member())
            },
            Self::Ln(l) => {
                let df = l.df(|| l.member().recip());
                chain_rule(df, l.member())
            },
            Self::Product(p) => product_rule(p),
            Self::Sum(s) => sum_rule(s),
        }
    }

    /// Returns the partial derivative of the expression with respect to `v`, by dividing the total
    /// differential by `dv`.
    pub fn partial(&self, v: &Variable) -> Expr {
        self.derivative() / Expr::Differential(v.d())
    }
}

#[cfg(test)]
mod tests {
    use crate::{config, symbolic::build::{exp, ln}};
    use pretty_assertions::assert_eq;
    use super::*;

    fn var(name: &str) -> Expr {
        Expr::from(Variable::new(name))
    }

    fn d(name: &str) -> Expr {
        Expr::from(Variable::new(name).d())
    }

    fn pow(base: &Expr, exponent: f64) -> Expr {
        base.pow(Constant::real(exponent)).unwrap()
    }

    /// Checks the partial derivative with respect to `x` against a central finite difference.
    #[cfg(feature = "numerical")]
    fn check_finite_difference(expr: &Expr, x: f64) {
        use assert_float_eq::{
            afe_abs,
            afe_relative_error_msg,
            afe_is_relative_eq,
            assert_float_relative_eq,
        };
        use crate::numerical::Ctxt;

        let h = 1e-6;
        let at = |x: f64| {
            let mut ctxt = Ctxt::new();
            ctxt.add_var(Variable::new("x"), x);
            expr.eval(&ctxt).unwrap()
        };
        let numerical = (at(x + h) - at(x - h)) / (2.0 * h);

        let mut ctxt = Ctxt::new();
        ctxt.add_var(Variable::new("x"), x);
        let symbolic = expr.partial(&Variable::new("x")).eval(&ctxt).unwrap();

        assert_float_relative_eq!(symbolic, numerical, 1e-5);
    }

    #[test]
    fn leaves() {
        assert_eq!(Expr::from(3.0).derivative(), Expr::ZERO);
        assert_eq!(var("x").derivative(), d("x"));
        assert_eq!(d("x").derivative(), Expr::ZERO);
    }

    #[test]
    fn power_rule() {
        let x = var("x");
        assert_eq!(pow(&x, 3.0).derivative(), pow(&x, 2.0) * d("x") * 3.0);
        assert_eq!(pow(&x, 2.0).derivative().to_string(), "2 x dx");
    }

    #[test]
    fn logarithm() {
        let x = var("x");
        let expr = ln(pow(&x, 2.0)).unwrap();
        assert_eq!(expr.derivative(), x.recip() * d("x") * 2.0);
        assert_eq!(expr.derivative(), (ln(x.clone()).unwrap() * 2.0).derivative());
    }

    #[test]
    fn exponential() {
        let x = var("x");
        let expr = exp(x.clone());
        assert_eq!(expr.derivative(), &expr * d("x"));
    }

    #[test]
    fn product_rule_with_two_variables() {
        let x = var("x");
        let y = var("y");
        let expr = &x * &y;
        assert_eq!(expr.derivative(), &y * d("x") + &x * d("y"));
    }

    #[test]
    fn partial_derivatives() {
        let x = var("x");
        let y = var("y");
        let expr = pow(&x, 2.0) + &x * &y;

        assert_eq!(expr.partial(&Variable::new("x")), &x * 2.0 + &y);
        assert_eq!(expr.partial(&Variable::new("y")), x);
        assert_eq!(expr.partial(&Variable::new("z")), Expr::ZERO);
    }

    #[test]
    fn chain_rule_through_sums() {
        let x = var("x");
        let expr = pow(&(pow(&x, 2.0) + 1.0), 3.0);
        let expected = pow(&(pow(&x, 2.0) + 1.0), 2.0) * &x * d("x") * 6.0;
        assert_eq!(expr.derivative(), expected);
    }

    #[test]
    #[cfg(feature = "numerical")]
    fn finite_differences() {
        let x = var("x");
        check_finite_difference(&(pow(&x, 3.0) * 2.0 - &x), 1.3);
        check_finite_difference(&exp(pow(&x, 2.0) * 0.5), 0.7);
        check_finite_difference(&ln(pow(&x, 2.0) + 1.0).unwrap(), 2.1);
        check_finite_difference(&(x.recip() * exp(x.clone())), 0.9);
        check_finite_difference(&pow(&(&x + 3.0), 0.5), 1.5);
    }

    #[test]
    fn parallel_sum_rule() {
        let terms = (0..64)
            .map(|i| pow(&var(&format!("x{}", i)), 2.0))
            .collect::<Vec<_>>();
        let expr = sum(terms.clone());
        let expected = sum(terms.iter().map(Expr::derivative));

        let derivative = {
            let _guard = config::ParallelismGuard::set(8);
            expr.derivative()
        };

        assert_eq!(derivative, expected);
    }
}
