use crate::symbolic::expr::Expr;
use sym_error::Error;
use super::{ctxt::Ctxt, error::{invalid_operand, unbound}};

impl Expr {
    /// Evaluates the expression by walking the tree, reading the values of variables from the
    /// given context.
    ///
    /// Only the real part of each constant is used. Evaluating a differential is an error, since
    /// it has no finite value.
    pub fn eval(&self, ctxt: &Ctxt) -> Result<f64, Error> {
        Ok(match self {
            Self::Constant(c) => c.re(),
            Self::Variable(v) => ctxt.get_var(v).ok_or_else(|| unbound(v))?,
            Self::Differential(_) => return Err(invalid_operand(self, "evaluate")),
            Self::Power(p) => p.member().eval(ctxt)?.powf(p.exponent().re()),
            Self::Exponential(x) => x.base().re().powf(x.member().eval(ctxt)?),
            Self::Ln(l) => l.member().eval(ctxt)?.ln(),
            Self::Product(p) => p.factors()
                .iter()
                .try_fold(p.times().re(), |acc, factor| factor.eval(ctxt).map(|n| acc * n))?,
            Self::Sum(s) => s.products()
                .iter()
                .try_fold(s.tail().re(), |acc, term| term.eval(ctxt).map(|n| acc + n))?,
        })
    }
}
