//! Substitution of subexpressions.
//!
//! Substituted trees are rebuilt through the builders, so the result is canonical. Rebuilding
//! factors can fail, for example when substituting `-1` for `x` in `ln x`.

use std::{collections::HashMap, iter::once};
use sym_error::Error;
use super::{
    build::{exponential_unchecked, ln, power, product, sum},
    expr::Expr,
};

impl Expr {
    /// Replaces every occurrence of `from` with `to`.
    ///
    /// If `from` is a variable `x`, its differential `dx` is replaced with the derivative of `to`,
    /// so that substitution commutes with differentiation.
    pub fn substitute(&self, from: &Expr, to: &Expr) -> Result<Expr, Error> {
        self.substitute_with(&|e| if e == from { Some(to.clone()) } else { None })
    }

    /// Replaces every occurrence of each key of `map` with its value, in a single pass.
    ///
    /// Replacements are not substituted again, so a map that swaps two variables works as
    /// expected.
    pub fn substitute_all(&self, map: &HashMap<Expr, Expr>) -> Result<Expr, Error> {
        self.substitute_with(&|e| map.get(e).cloned())
    }

    /// Rebuilds the expression, replacing every subexpression for which `replace` returns a
    /// replacement.
    fn substitute_with(&self, replace: &dyn Fn(&Expr) -> Option<Expr>) -> Result<Expr, Error> {
        if let Some(to) = replace(self) {
            return Ok(to);
        }

        match self {
            Self::Constant(_) | Self::Variable(_) => Ok(self.clone()),
            Self::Differential(d) => {
                let variable = Self::Variable(d.variable().clone());
                Ok(replace(&variable).map_or_else(|| self.clone(), |to| to.derivative()))
            },
            Self::Power(p) => power(p.member().substitute_with(replace)?, p.exponent()),
            Self::Exponential(x) => {
                Ok(exponential_unchecked(x.base(), x.member().substitute_with(replace)?))
            },
            Self::Ln(l) => ln(l.member().substitute_with(replace)?),
            Self::Product(p) => {
                let factors = p.factors()
                    .iter()
                    .map(|factor| factor.substitute_with(replace))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(product(factors).scale(p.times()))
            },
            Self::Sum(s) => {
                let terms = s.products()
                    .iter()
                    .map(|term| term.substitute_with(replace))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(sum(terms.into_iter().chain(once(Self::Constant(s.tail())))))
            },
        }
    }
}
