use crate::symbolic::{
    constant::Constant,
    error::InvalidExponentialBase,
    expr::{Exponential, Expr},
};
use std::iter::once;
use sym_error::Error;
use super::{power_unchecked, product};

/// Builds the canonical form of `base^member`.
///
/// A base of zero or one folds to that constant. Any other base must be a positive real number,
/// otherwise an [`InvalidExponentialBase`] error is returned.
pub fn exponential(base: Constant, member: Expr) -> Result<Expr, Error> {
    if base.is_zero() || base.is_one() {
        return Ok(Expr::Constant(base));
    }
    if !base.is_real() || !(base.re() > 0.0) {
        let source = format!("{}^({})", base, member);
        return Err(Error::spanning(source, InvalidExponentialBase { base }));
    }
    Ok(exponential_unchecked(base, member))
}

/// Builds the canonical form of `e^member`.
pub fn exp(member: Expr) -> Expr {
    exponential_unchecked(Constant::E, member)
}

/// Returns true if `base` can be the base of an [`Exponential`] node.
fn is_proper_base(base: Constant) -> bool {
    base.re().is_finite() && !base.is_zero() && !base.is_one()
}

/// Builds the canonical form of `base^member`. The base must be a non-negative real number.
pub(crate) fn exponential_unchecked(base: Constant, member: Expr) -> Expr {
    if base.is_zero() || base.is_one() {
        return Expr::Constant(base);
    }

    match member {
        Expr::Constant(c) => Expr::Constant(base.pow(c)),
        // b^(k ln x) = x^(k ln b)
        Expr::Ln(l) => power_unchecked(l.member().clone(), base.ln_real()),
        Expr::Product(p) => {
            let core = p.with_times(Constant::ONE);
            let folded = base.pow(p.times());
            match core {
                Expr::Ln(l) => power_unchecked(l.member().clone(), base.ln_real() * p.times()),
                // the coefficient stays in the exponent if the folded base over- or underflows
                _ if !is_proper_base(folded) => {
                    Expr::Exponential(Exponential::new_unchecked(base, Expr::Product(p)))
                },
                Expr::Product(_) => Expr::Exponential(Exponential::new_unchecked(folded, core)),
                factor => exponential_unchecked(folded, factor),
            }
        },
        // b^(x + y + c) = b^x b^y b^c
        Expr::Sum(s) => product(
            s.products()
                .iter()
                .map(|term| exponential_unchecked(base, term.clone()))
                .chain(once(Expr::Constant(base.pow(s.tail()))))
        ),
        member => Expr::Exponential(Exponential::new_unchecked(base, member)),
    }
}
