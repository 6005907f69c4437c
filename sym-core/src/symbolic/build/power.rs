use crate::symbolic::{
    constant::Constant,
    error::FractionalDifferentialOrder,
    expr::{Expr, Power},
};
use sym_error::Error;
use super::{exponential_unchecked, product};

/// Returns an error if raising `base` to `exponent` would raise a differential to a non-integer
/// power.
fn check_differential_order(base: &Expr, exponent: Constant) -> Result<(), Error> {
    let order = match base {
        Expr::Differential(_) => exponent,
        Expr::Power(p) if matches!(p.member(), Expr::Differential(_)) => p.exponent() * exponent,
        Expr::Product(p) => {
            return p.factors()
                .iter()
                .try_for_each(|factor| check_differential_order(factor, exponent));
        },
        _ => return Ok(()),
    };

    if order.is_integer() {
        Ok(())
    } else {
        Err(Error::spanning(base.to_string(), FractionalDifferentialOrder { order }))
    }
}

/// Builds the canonical form of `base^exponent`.
///
/// Returns an error if this would raise a differential to a non-integer power.
pub fn power(base: Expr, exponent: Constant) -> Result<Expr, Error> {
    if !exponent.is_zero() {
        check_differential_order(&base, exponent)?;
    }
    Ok(power_unchecked(base, exponent))
}

/// Builds the canonical form of `base^exponent`, without checking the order of differentials.
pub(crate) fn power_unchecked(base: Expr, exponent: Constant) -> Expr {
    if exponent.is_zero() {
        return Expr::ONE;
    }
    if exponent.is_one() {
        return base;
    }

    match base {
        Expr::Constant(c) if c.is_zero() => Expr::ZERO,
        Expr::Constant(c) => Expr::Constant(c.pow(exponent)),
        Expr::Power(p) => power_unchecked(p.member().clone(), p.exponent() * exponent),
        Expr::Exponential(x) => exponential_unchecked(x.base(), x.member().scale(exponent)),
        Expr::Product(p) => {
            let times = p.times().pow(exponent);
            product(p.factors().iter().map(|factor| power_unchecked(factor.clone(), exponent)))
                .scale(times)
        },
        member => Expr::Power(Power::new_unchecked(member, exponent)),
    }
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
    fn trivial_exponents() {
        let x = var("x");
        assert_eq!(power(x.clone(), Constant::ZERO).unwrap(), Expr::ONE);
        assert_eq!(power(x.clone(), Constant::ONE).unwrap(), x);
    }

    #[test]
    fn constants_fold() {
        assert_eq!(power(Expr::from(3.0), Constant::real(2.0)).unwrap(), Expr::from(9.0));
        assert_eq!(power(Expr::ZERO, Constant::real(2.0)).unwrap(), Expr::ZERO);
        assert_eq!(power(Expr::ZERO, Constant::NEG_ONE).unwrap(), Expr::ZERO);
    }

    #[test]
    fn nested_powers_multiply() {
        let x = var("x");
        let nested = power(power(x.clone(), Constant::real(2.0)).unwrap(), Constant::real(3.0)).unwrap();
        assert_eq!(nested, power(x.clone(), Constant::real(6.0)).unwrap());

        let cancelled = power(power(x.clone(), Constant::real(2.0)).unwrap(), Constant::real(0.5)).unwrap();
        assert_eq!(cancelled, x);
    }

    #[test]
    fn distributes_over_products() {
        let x = var("x");
        let y = var("y");
        let expr = power(&x * &y * 2.0, Constant::real(2.0)).unwrap();
        let expected = power(x, Constant::real(2.0)).unwrap() * power(y, Constant::real(2.0)).unwrap() * 4.0;
        assert_eq!(expr, expected);
    }

    #[test]
    fn sums_stay_intact() {
        let sum = var("x") + 1.0;
        let expr = power(sum.clone(), Constant::real(2.0)).unwrap();
        let Expr::Power(p) = &expr else {
            panic!("expected a power, got {:?}", expr);
        };
        assert_eq!(p.member(), &sum);
        assert_eq!(p.exponent(), Constant::real(2.0));
    }

    #[test]
    fn fractional_differential_order() {
        let dx = Expr::from(Variable::new("x").d());
        assert!(power(dx.clone(), Constant::real(2.0)).is_ok());

        let err = power(dx.clone(), Constant::real(0.5)).unwrap_err();
        assert!(err.is::<FractionalDifferentialOrder>());

        let squared = power(dx.clone(), Constant::real(2.0)).unwrap();
        assert!(power(squared.clone(), Constant::real(0.5)).is_ok());
        assert!(power(squared, Constant::real(0.25)).is_err());

        let scaled = var("y") * dx;
        assert!(power(scaled, Constant::real(1.5)).is_err());
    }
}
