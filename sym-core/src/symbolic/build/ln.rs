use crate::symbolic::{
    constant::Constant,
    error::{InvalidLogBase, InvalidOperand},
    expr::{Expr, Ln, Product},
};
use std::iter::once;
use sym_error::Error;
use super::{product, sum};

/// Builds the canonical form of the natural logarithm of `e`.
///
/// Logarithms of powers, exponentials and products are expanded, so that `ln(x^2 e^y)` becomes
/// `2 ln x + y`. Returns an error if the logarithm is taken of a non-positive constant, or of a
/// differential or a product containing one.
pub fn ln(e: Expr) -> Result<Expr, Error> {
    match e {
        Expr::Constant(c) => c.ln().map(Expr::Constant),
        Expr::Differential(_) => Err(Error::spanning(
            e.to_string(),
            InvalidOperand { operation: "take the logarithm of", operand: e.to_string() },
        )),
        // ln(x^k) = k ln x
        Expr::Power(p) => Ok(ln(p.member().clone())?.scale(p.exponent())),
        // ln(b^x) = x ln b
        Expr::Exponential(x) => Ok(x.member().scale(x.base().ln_real())),
        Expr::Product(p) => ln_product(&p),
        Expr::Variable(_) | Expr::Ln(_) | Expr::Sum(_) => Ok(Expr::Ln(Ln::new_unchecked(e))),
    }
}

/// Expands the logarithm of a product into a sum of logarithms.
///
/// Exponential factors are pulled out, and the logarithm of the coefficient is added as a
/// constant. The sign of the coefficient stays with the remaining factors, so that `ln(-x)` is not
/// split into the undefined `ln(-1) + ln x`. Products containing a differential have no
/// logarithm.
fn ln_product(p: &Product) -> Result<Expr, Error> {
    if p.factors().iter().any(Expr::is_differential_factor) {
        let operand = Expr::Product(p.clone()).to_string();
        return Err(Error::spanning(
            operand.clone(),
            InvalidOperand { operation: "take the logarithm of", operand },
        ));
    }

    let (exponentials, others) = p.factors()
        .iter()
        .partition::<Vec<_>, _>(|factor| matches!(factor, Expr::Exponential(_)));

    let sign = if p.times().re() < 0.0 { Constant::NEG_ONE } else { Constant::ONE };
    let remainder = product(others.into_iter().cloned()).scale(sign);
    let remainder_ln = match remainder {
        Expr::Product(_) => Expr::Ln(Ln::new_unchecked(remainder)),
        remainder => ln(remainder)?,
    };

    let exponential_terms = exponentials
        .into_iter()
        .filter_map(|factor| match factor {
            Expr::Exponential(x) => Some(x.member().scale(x.base().ln_real())),
            _ => None,
        });
    let coefficient = (p.times() / sign).ln()?;

    Ok(sum(
        once(remainder_ln)
            .chain(exponential_terms)
            .chain(once(Expr::Constant(coefficient)))
    ))
}

/// Builds the canonical form of the logarithm of `e` in the given base.
///
/// The base must be a positive real number other than one, otherwise an [`InvalidLogBase`] error
/// is returned.
pub fn log(base: Constant, e: Expr) -> Result<Expr, Error> {
    if !base.is_real() || !(base.re() > 0.0) || base.is_one() {
        let source = format!("log({}, {})", base, e);
        return Err(Error::spanning(source, InvalidLogBase { base }));
    }
    Ok(ln(e)?.scale(Constant::ONE / base.ln_real()))
}
