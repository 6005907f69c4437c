use crate::symbolic::{constant::Constant, expr::{Expr, Sum}};
use std::collections::{btree_map::Entry, BTreeMap};

/// Accumulates the terms of a sum, keyed by their shape.
#[derive(Debug, Default)]
pub(crate) struct SumBuilder {
    /// Maps the shape of each term to its coefficient.
    terms: BTreeMap<Expr, Constant>,

    /// The sum of the constant terms.
    tail: Constant,
}

impl SumBuilder {
    /// Adds an expression to the sum. Nested sums are flattened into this one.
    pub(crate) fn add(&mut self, expr: Expr) {
        match expr {
            Expr::Constant(c) => self.tail += c,
            Expr::Sum(s) => {
                for term in s.products() {
                    self.add_term(term);
                }
                self.tail += s.tail();
            },
            term => self.add_term(&term),
        }
    }

    /// Adds a factor or product to the sum.
    fn add_term(&mut self, term: &Expr) {
        let times = term.times();
        match self.terms.entry(term.shape()) {
            Entry::Occupied(mut entry) => {
                let coefficient = *entry.get() + times;
                if coefficient.is_zero() {
                    entry.remove();
                } else {
                    *entry.get_mut() = coefficient;
                }
            },
            Entry::Vacant(entry) => {
                if !times.is_zero() {
                    entry.insert(times);
                }
            },
        }
    }
}

impl From<SumBuilder> for Expr {
    fn from(builder: SumBuilder) -> Self {
        let mut products = builder.terms
            .into_iter()
            .map(|(shape, times)| shape.with_times(times))
            .collect::<Vec<_>>();

        if products.is_empty() {
            Expr::Constant(builder.tail)
        } else if products.len() == 1 && builder.tail.is_zero() {
            products.swap_remove(0)
        } else {
            Expr::Sum(Sum::new_unchecked(products, builder.tail))
        }
    }
}

/// Builds the canonical sum of the given expressions.
///
/// Terms with the same shape have their coefficients added, and terms whose coefficients cancel
/// are removed. The sum of no expressions is zero.
pub fn sum(terms: impl IntoIterator<Item = Expr>) -> Expr {
    let mut builder = SumBuilder::default();
    for term in terms {
        builder.add(term);
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

    #[test]
    fn empty_sum_is_zero() {
        assert_eq!(sum(Vec::new()), Expr::ZERO);
    }

    #[test]
    fn single_term_is_itself() {
        assert_eq!(sum([var("x")]), var("x"));
    }

    #[test]
    fn nested_sums_flatten() {
        let inner = sum([var("x"), Expr::from(1.0)]);
        let outer = sum([inner, var("y"), Expr::from(2.0)]);

        let Expr::Sum(s) = &outer else {
            panic!("expected a sum, got {:?}", outer);
        };
        assert_eq!(s.products(), &[var("x"), var("y")]);
        assert_eq!(s.tail(), Constant::real(3.0));
    }

    #[test]
    fn cancellation() {
        let x = var("x");
        let y = var("y");
        let expr = sum([x.clone() * 2.0, y.clone(), x.clone() * -2.0]);
        assert_eq!(expr, y);
    }

    #[test]
    fn idempotent() {
        let expr = sum([var("x") * 3.0, var("y"), Expr::from(4.0)]);
        assert_eq!(sum([expr.clone()]), expr);
        assert_eq!(sum([expr.clone(), Expr::ZERO]), expr);
    }

    #[test]
    fn order_independent() {
        let a = sum([var("b"), var("a") * 2.0, Expr::from(1.0)]);
        let b = sum([Expr::from(1.0), var("a") * 2.0, var("b")]);
        assert_eq!(a, b);
    }
}
