//! Compilation of expressions into numeric closures.
//!
//! Compiling walks the tree once and produces a tree of closures, so that repeatedly evaluating
//! the same expression does not repeat the work of matching on it. Sums and products with more
//! terms than [`config::parallelism`] evaluate their terms on the [`rayon`] thread pool.

use crate::{
    config,
    symbolic::{expr::Expr, variable::{Variable, VariableSpace}},
};
use rayon::prelude::*;
use std::sync::Arc;
use sym_error::Error;
use tracing::debug;
use super::error::{invalid_operand, unbound};

/// A compiled function of a single variable.
pub type ScalarFunction = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// A compiled function of the variables in a [`VariableSpace`], taking their values in order.
pub type VectorFunction = Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// A compiled function reading its variables from a `T`.
type Compiled<T> = Arc<dyn Fn(&T) -> f64 + Send + Sync>;

/// Compiles the expression, using `leaf` to compile each variable.
fn compile<T>(
    expr: &Expr,
    leaf: &dyn Fn(&Variable) -> Option<Compiled<T>>,
) -> Result<Compiled<T>, Error>
where
    T: ?Sized + Sync + 'static,
{
    let compiled: Compiled<T> = match expr {
        Expr::Constant(c) => {
            let value = c.re();
            Arc::new(move |_: &T| value)
        },
        Expr::Variable(v) => leaf(v).ok_or_else(|| unbound(v))?,
        Expr::Differential(_) => return Err(invalid_operand(expr, "compile")),
        Expr::Power(p) => {
            let member = compile(p.member(), leaf)?;
            let exponent = p.exponent().re();
            Arc::new(move |t: &T| member(t).powf(exponent))
        },
        Expr::Exponential(x) => {
            let member = compile(x.member(), leaf)?;
            let base = x.base().re();
            Arc::new(move |t: &T| base.powf(member(t)))
        },
        Expr::Ln(l) => {
            let member = compile(l.member(), leaf)?;
            Arc::new(move |t: &T| member(t).ln())
        },
        Expr::Product(p) => {
            let factors = compile_all(p.factors(), leaf)?;
            let times = p.times().re();
            if factors.len() > config::parallelism() {
                debug!(factors = factors.len(), "compiling product for parallel evaluation");
                Arc::new(move |t: &T| times * factors.par_iter().map(|f| f(t)).product::<f64>())
            } else {
                Arc::new(move |t: &T| factors.iter().fold(times, |acc, f| acc * f(t)))
            }
        },
        Expr::Sum(s) => {
            let terms = compile_all(s.products(), leaf)?;
            let tail = s.tail().re();
            if terms.len() > config::parallelism() {
                debug!(terms = terms.len(), "compiling sum for parallel evaluation");
                Arc::new(move |t: &T| terms.par_iter().map(|f| f(t)).sum::<f64>() + tail)
            } else {
                Arc::new(move |t: &T| terms.iter().fold(tail, |acc, f| acc + f(t)))
            }
        },
    };
    Ok(compiled)
}

fn compile_all<T>(
    exprs: &[Expr],
    leaf: &dyn Fn(&Variable) -> Option<Compiled<T>>,
) -> Result<Vec<Compiled<T>>, Error>
where
    T: ?Sized + Sync + 'static,
{
    exprs.iter().map(|expr| compile(expr, leaf)).collect()
}

impl Expr {
    /// Compiles the expression into a function of the variable `v`.
    ///
    /// Only the real part of each constant is used. Returns an error if the expression contains a
    /// differential, or any variable other than `v`.
    pub fn compile_scalar(&self, v: &Variable) -> Result<ScalarFunction, Error> {
        let f = compile::<f64>(self, &|other| {
            (other == v).then(|| Arc::new(|x: &f64| *x) as Compiled<f64>)
        })?;
        Ok(Arc::new(move |x| f(&x)))
    }

    /// Compiles the expression into a function of the variables in `space`. The returned function
    /// reads the value of each variable from the position of the variable in `space`, and panics
    /// if it is given fewer values than that.
    ///
    /// Only the real part of each constant is used. Returns an error if the expression contains a
    /// differential, or any variable not in `space`.
    pub fn compile_vector(&self, space: &VariableSpace) -> Result<VectorFunction, Error> {
        compile::<[f64]>(self, &|v| {
            space.index_of(v).map(|i| Arc::new(move |values: &[f64]| values[i]) as Compiled<[f64]>)
        })
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
    use crate::{
        numerical::{ctxt::Ctxt, error::{InvalidOperand, UnboundVariable}},
        symbolic::{build::{exp, ln, sum}, constant::Constant},
    };
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use super::*;

    fn var(name: &str) -> Expr {
        Expr::from(Variable::new(name))
    }

    fn pow(base: &Expr, exponent: f64) -> Expr {
        base.pow(Constant::real(exponent)).unwrap()
    }

    #[test]
    fn scalar_agrees_with_closed_form() {
        let x = var("x");
        let expr = pow(&x, 3.0) * 2.0 - &x * 4.0 + exp(&x * 0.5) + ln(pow(&x, 2.0) + 1.0).unwrap();
        let f = expr.compile_scalar(&Variable::new("x")).unwrap();
        let expected = |x: f64| 2.0 * x.powi(3) - 4.0 * x + (0.5 * x).exp() + (x * x + 1.0).ln();

        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..100 {
            let x = rng.gen_range(-3.0..3.0);
            assert_float_relative_eq!(f(x), expected(x), 1e-9);
        }
    }

    #[test]
    fn vector_agrees_with_direct_evaluation() {
        let (x, y, z) = (var("x"), var("y"), var("z"));
        let expr = (&x + &y) * (&y - &z) * 3.0 + pow(&(&x + 2.0), -1.0) + exp(&z * &x);
        let space = ["x", "y", "z"].into_iter().map(Variable::new).collect::<VariableSpace>();
        let f = expr.compile_vector(&space).unwrap();

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let values = (0..3).map(|_| rng.gen_range(0.0..2.0)).collect::<Vec<f64>>();
            let ctxt = space.iter().cloned().zip(values.iter().copied()).collect::<Ctxt>();
            assert_float_relative_eq!(f(values.as_slice()), expr.eval(&ctxt).unwrap(), 1e-9);
        }
    }

    #[test]
    fn constants_compile_to_their_real_part() {
        let f = Expr::from(Constant::new(2.0, 5.0)).compile_scalar(&Variable::new("x")).unwrap();
        assert_eq!(f(10.0), 2.0);
    }

    #[test]
    fn parallel_sum_agrees() {
        let terms = (0..40).map(|i| var("x") * (i as f64) + pow(&var("y"), i as f64));
        let expr = sum(terms.collect::<Vec<_>>());
        let space = ["x", "y"].into_iter().map(Variable::new).collect::<VariableSpace>();

        let sequential = {
            let _guard = config::ParallelismGuard::set(config::DEFAULT_PARALLELISM);
            expr.compile_vector(&space).unwrap()
        };
        let parallel = {
            let _guard = config::ParallelismGuard::set(4);
            expr.compile_vector(&space).unwrap()
        };

        let values = [0.5, 0.9];
        assert_float_relative_eq!(parallel(&values[..]), sequential(&values[..]), 1e-12);
    }

    #[test]
    fn unbound_variable() {
        let expr = var("x") + var("y");
        let err = expr.compile_scalar(&Variable::new("x")).err().unwrap();
        assert!(err.is::<UnboundVariable>());

        let space = [Variable::new("y")].into_iter().collect::<VariableSpace>();
        assert!(expr.compile_vector(&space).err().unwrap().is::<UnboundVariable>());
    }

    #[test]
    fn differentials_cannot_be_compiled() {
        let expr = pow(&var("x"), 2.0).derivative();
        let err = expr.compile_scalar(&Variable::new("x")).err().unwrap();
        assert!(err.is::<InvalidOperand>());
    }
}
