use crate::symbolic::{
    constant::Constant,
    expr::{Expr, Product, Sum},
    variable::Differential,
};
use std::{
    collections::{btree_map::Entry, BTreeMap, BTreeSet},
    iter::once,
};
use tracing::trace;
use super::{power_unchecked, sum};

/// One term of a product that is being distributed over sums.
///
/// Factors are keyed by their base, so that `x * x^2` collects into `x^3`.
#[derive(Debug, Clone)]
struct PartialProduct {
    times: Constant,
    powers: BTreeMap<Expr, Constant>,

    /// The differentials in `powers` whose exponents all share the same sign.
    related: BTreeSet<Differential>,
}

impl Default for PartialProduct {
    fn default() -> Self {
        Self {
            times: Constant::ONE,
            powers: BTreeMap::new(),
            related: BTreeSet::new(),
        }
    }
}

impl PartialProduct {
    fn is_zero(&self) -> bool {
        self.times.is_zero()
    }

    /// Multiplies by a factor or a product.
    fn mult_term(&mut self, term: &Expr) {
        match term {
            Expr::Product(p) => {
                for factor in p.factors() {
                    self.mult_factor(factor);
                    if self.is_zero() {
                        return;
                    }
                }
                self.times *= p.times();
            },
            factor => self.mult_factor(factor),
        }
    }

    fn mult_factor(&mut self, factor: &Expr) {
        debug_assert!(factor.is_factor(), "not a factor: {:?}", factor);
        match factor {
            Expr::Differential(d) => {
                self.merge(factor.clone(), Constant::ONE);
                self.check(d);
            },
            Expr::Power(p) => {
                self.merge(p.member().clone(), p.exponent());
                if let Expr::Differential(d) = p.member() {
                    self.check(d);
                }
            },
            _ => self.merge(factor.clone(), Constant::ONE),
        }
    }

    /// Adds `exponent` to the exponent of `base`, removing the base if the exponents cancel.
    fn merge(&mut self, base: Expr, exponent: Constant) {
        match self.powers.entry(base) {
            Entry::Occupied(mut entry) => {
                let sum = *entry.get() + exponent;
                if sum.is_zero() {
                    entry.remove();
                } else {
                    *entry.get_mut() = sum;
                }
            },
            Entry::Vacant(entry) => {
                entry.insert(exponent);
            },
        }
    }

    /// The sign of the exponent of the given differential, if it is present.
    fn exponent_sign(&self, d: &Differential) -> Option<f64> {
        self.powers
            .get(&Expr::Differential(d.clone()))
            .map(|exponent| exponent.re().signum())
    }

    /// Applies the infinitesimal rule after the exponent of `d` changed.
    ///
    /// A product whose differentials are all raised to exponents of the same sign, such as
    /// `dx dy` or `dx^-1 dy^-1`, is a finite quantity. If a differential is raised to an exponent
    /// of the opposite sign of another, as in `dy / dx`, the product is an infinitesimal of higher
    /// order than the other terms it appears with, and it vanishes.
    fn check(&mut self, d: &Differential) {
        match self.exponent_sign(d) {
            None => {
                self.related.remove(d);
            },
            Some(sign) if self.related.iter().all(|other| self.exponent_sign(other) == Some(sign)) => {
                self.related.insert(d.clone());
            },
            Some(_) => {
                trace!(differential = %d, "differentials of opposite order cancel the product");
                self.times = Constant::ZERO;
            },
        }
    }

    fn build(self) -> Expr {
        let mut factors = self.powers
            .into_iter()
            .map(|(base, exponent)| power_unchecked(base, exponent))
            .collect::<Vec<_>>();

        if factors.is_empty() {
            return Expr::Constant(self.times);
        }
        if factors.len() == 1 && self.times.is_one() {
            return factors.swap_remove(0);
        }

        factors.sort();
        let collides = factors.windows(2).any(|pair| pair[0] == pair[1]);
        if !collides && factors.iter().all(Expr::is_factor) {
            Expr::Product(Product::new_unchecked(factors, self.times))
        } else {
            // raising a base to its exponent produced something other than a single new factor,
            // such as `e^(x y)^2` becoming `(e^2)^(x y)`, so collect the result again
            product(factors.into_iter().chain(once(Expr::Constant(self.times))))
        }
    }
}

/// Accumulates the terms of a product, distributing it over any sums.
#[derive(Debug)]
pub(crate) struct MultBuilder(Vec<PartialProduct>);

impl Default for MultBuilder {
    fn default() -> Self {
        Self(vec![PartialProduct::default()])
    }
}

impl MultBuilder {
    pub(crate) fn mult(&mut self, e: &Expr) {
        match e {
            Expr::Constant(c) if c.is_zero() => self.0.clear(),
            Expr::Constant(c) if c.is_one() => (),
            Expr::Constant(c) => self.0.retain_mut(|partial| {
                partial.times *= *c;
                !partial.is_zero()
            }),
            Expr::Sum(s) => self.distribute(s),
            term => self.0.retain_mut(|partial| {
                partial.mult_term(term);
                !partial.is_zero()
            }),
        }
    }

    /// Multiplies every partial product by each term of the sum.
    fn distribute(&mut self, s: &Sum) {
        let partials = std::mem::take(&mut self.0);
        for partial in partials {
            for term in s.products() {
                let mut next = partial.clone();
                next.mult_term(term);
                if !next.is_zero() {
                    self.0.push(next);
                }
            }

            if !s.tail().is_zero() {
                let mut next = partial;
                next.times *= s.tail();
                if !next.is_zero() {
                    self.0.push(next);
                }
            }
        }
    }

    fn is_zero(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<MultBuilder> for Expr {
    fn from(builder: MultBuilder) -> Self {
        sum(builder.0.into_iter().map(PartialProduct::build))
    }
}

/// Builds the canonical product of the given expressions.
///
/// Factors with the same base have their exponents added, constants are folded into the
/// coefficient, and the product is distributed over any sums among the factors. The product of
/// no expressions is one, and a product with a zero factor is zero.
pub fn product(factors: impl IntoIterator<Item = Expr>) -> Expr {
    let mut builder = MultBuilder::default();
    for factor in factors {
        builder.mult(&factor);
        if builder.is_zero() {
            trace!("product annihilated");
            return Expr::ZERO;
        }
    }
    builder.into()
}

#[cfg(test)]
mod tests {
    use crate::symbolic::variable::Variable;
    use pretty_assertions::assert_eq;
    use super::*;

    fn var(name: &str) -> Expr {
        Expr::from(Variable::new(name))
    }

    fn d(name: &str) -> Expr {
        Expr::from(Variable::new(name).d())
    }

    fn pow(base: Expr, exponent: f64) -> Expr {
        base.pow(Constant::real(exponent)).unwrap()
    }

    #[test]
    fn empty_product_is_one() {
        assert_eq!(product(Vec::new()), Expr::ONE);
    }

    #[test]
    fn zero_annihilates() {
        assert_eq!(product([var("x"), Expr::ZERO, var("y")]), Expr::ZERO);
    }

    #[test]
    fn exponents_collect() {
        let x = var("x");
        let expr = product([x.clone(), pow(x.clone(), 2.0), Expr::from(3.0)]);
        assert_eq!(expr, pow(x.clone(), 3.0) * 3.0);
        assert_eq!(product([x.clone(), x.recip()]), Expr::ONE);
    }

    #[test]
    fn distributes_over_sums() {
        let x = var("x");
        let expr = product([&x + 1.0, &x - 1.0]);
        assert_eq!(expr, pow(x.clone(), 2.0) - 1.0);
        assert_eq!(expr.to_string(), "x^2 - 1");
    }

    #[test]
    fn distributing_cancels_terms() {
        let x = var("x");
        let y = var("y");
        let expr = product([&x + &y, &x - &y]);
        assert_eq!(expr, pow(x, 2.0) - pow(y, 2.0));
    }

    #[test]
    fn same_sign_differentials_coexist() {
        let expr = product([d("x"), d("y")]);
        let Expr::Product(p) = &expr else {
            panic!("expected a product, got {:?}", expr);
        };
        assert_eq!(p.factors(), &[d("x"), d("y")]);

        let inverse = product([d("x").recip(), d("y").recip()]);
        assert!(matches!(inverse, Expr::Product(_)));
    }

    #[test]
    fn opposite_sign_differentials_vanish() {
        assert_eq!(product([d("y"), d("x").recip()]), Expr::ZERO);
        assert_eq!(product([d("x").recip(), var("z"), d("y")]), Expr::ZERO);
    }

    #[test]
    fn cancelled_differential_is_forgotten() {
        // dx cancels, after which dy^-1 is the only differential
        let expr = product([d("x"), d("x").recip(), d("y").recip()]);
        assert_eq!(expr, d("y").recip());
    }

    #[test]
    fn order_independent() {
        let a = product([var("y"), Expr::from(2.0), var("x")]);
        let b = product([var("x"), var("y"), Expr::from(2.0)]);
        assert_eq!(a, b);
    }
}
