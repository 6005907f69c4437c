//! Plain-text and TeX rendering of expressions.

use crate::symbolic::constant::Constant;
use std::fmt::{Display, Formatter, Result};
use super::{Exponential, Expr, Ln, Power, Product, Sum};

/// The markup an expression is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Plain,
    Tex,
}

/// Renders an expression in the given style.
struct Render<'a> {
    expr: &'a Expr,
    style: Style,
}

impl<'a> Render<'a> {
    fn new(expr: &'a Expr, style: Style) -> Self {
        Self { expr, style }
    }

    /// Renders another expression in the same style.
    fn with<'b>(&self, expr: &'b Expr) -> Render<'b> {
        Render::new(expr, self.style)
    }
}

/// Writes a constant that appears as a coefficient or exponent.
fn fmt_component(f: &mut Formatter<'_>, c: Constant) -> Result {
    if c.needs_parens() {
        write!(f, "({})", c)
    } else {
        write!(f, "{}", c)
    }
}

/// Writes the member of a factor, adding parentheses unless it is a bare variable.
fn fmt_parameter(f: &mut Formatter<'_>, member: Render<'_>) -> Result {
    match member.expr {
        Expr::Variable(_) => write!(f, "{}", member),
        _ if member.style == Style::Tex => write!(f, "\\left({}\\right)", member),
        _ => write!(f, "({})", member),
    }
}

fn fmt_power(f: &mut Formatter<'_>, render: &Render<'_>, p: &Power) -> Result {
    let member = render.with(p.member());
    match render.style {
        Style::Plain => {
            fmt_parameter(f, member)?;
            write!(f, "^")?;
            fmt_component(f, p.exponent())
        },
        Style::Tex if p.exponent() == Constant::real(0.5) => write!(f, "\\sqrt{{{}}}", member),
        Style::Tex if p.exponent() == Constant::real(-0.5) => {
            write!(f, "\\frac{{1}}{{\\sqrt{{{}}}}}", member)
        },
        Style::Tex => {
            write!(f, "{{")?;
            fmt_parameter(f, member)?;
            write!(f, "}}^{{{}}}", p.exponent())
        },
    }
}

fn fmt_exponential(f: &mut Formatter<'_>, render: &Render<'_>, x: &Exponential) -> Result {
    let member = render.with(x.member());
    match render.style {
        Style::Plain => {
            fmt_component(f, x.base())?;
            write!(f, "^")?;
            fmt_parameter(f, member)
        },
        Style::Tex => write!(f, "{{{}}}^{{{}}}", x.base(), member),
    }
}

fn fmt_ln(f: &mut Formatter<'_>, render: &Render<'_>, l: &Ln) -> Result {
    match render.style {
        Style::Plain => write!(f, "ln")?,
        Style::Tex => write!(f, "\\ln")?,
    }
    if matches!(l.member(), Expr::Variable(_)) {
        write!(f, " ")?;
    }
    fmt_parameter(f, render.with(l.member()))
}

/// Writes the factors of a product, with differentials last, without the coefficient.
fn fmt_factors(f: &mut Formatter<'_>, render: &Render<'_>, p: &Product) -> Result {
    let separator = match render.style {
        Style::Plain => " ",
        Style::Tex => " \\, ",
    };
    let (differentials, others) = p.factors()
        .iter()
        .partition::<Vec<_>, _>(|factor| factor.is_differential_factor());

    for (i, factor) in others.into_iter().chain(differentials).enumerate() {
        if i > 0 {
            write!(f, "{}", separator)?;
        }
        write!(f, "{}", render.with(factor))?;
    }
    Ok(())
}

/// Writes a product with the given coefficient in place of its own.
fn fmt_scaled(f: &mut Formatter<'_>, render: &Render<'_>, p: &Product, times: Constant) -> Result {
    if times == Constant::NEG_ONE {
        write!(f, "-")?;
    } else if !times.is_one() {
        fmt_component(f, times)?;
        write!(f, " ")?;
    }
    fmt_factors(f, render, p)
}

fn fmt_sum(f: &mut Formatter<'_>, render: &Render<'_>, s: &Sum) -> Result {
    let mut terms = s.products().iter();
    if let Some(first) = terms.next() {
        write!(f, "{}", render.with(first))?;
    }

    for term in terms {
        match term {
            Expr::Product(p) if p.times().is_sign_negative() => {
                write!(f, " - ")?;
                fmt_scaled(f, render, p, -p.times())?;
            },
            _ => write!(f, " + {}", render.with(term))?,
        }
    }

    let tail = s.tail();
    if tail.is_zero() {
        Ok(())
    } else if tail.is_sign_negative() && !tail.needs_parens() {
        write!(f, " - {}", -tail)
    } else {
        write!(f, " + ")?;
        fmt_component(f, tail)
    }
}

impl Display for Render<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self.expr {
            Expr::Constant(c) => write!(f, "{}", c),
            Expr::Variable(v) => write!(f, "{}", v),
            Expr::Differential(d) => match self.style {
                Style::Plain => write!(f, "{}", d),
                Style::Tex => write!(f, "\\mathrm{{d}}{}", d.variable()),
            },
            Expr::Power(p) => fmt_power(f, self, p),
            Expr::Exponential(x) => fmt_exponential(f, self, x),
            Expr::Ln(l) => fmt_ln(f, self, l),
            Expr::Product(p) => fmt_scaled(f, self, p, p.times()),
            Expr::Sum(s) => fmt_sum(f, self, s),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", Render::new(self, Style::Plain))
    }
}

impl Expr {
    /// Renders the expression as TeX math markup.
    pub fn to_tex(&self) -> String {
        Render::new(self, Style::Tex).to_string()
    }
}

#[cfg(test)]
mod tests {
    use crate::symbolic::{
        build::{exp, ln},
        variable::Variable,
    };
    use pretty_assertions::assert_eq;
    use super::*;

    fn var(name: &str) -> Expr {
        Expr::from(Variable::new(name))
    }

    fn pow(base: &Expr, exponent: f64) -> Expr {
        base.pow(Constant::real(exponent)).unwrap()
    }

    #[test]
    fn leaves() {
        assert_eq!(Expr::from(2.5).to_string(), "2.5");
        assert_eq!(var("x").to_string(), "x");
        assert_eq!(var("x").derivative().to_string(), "dx");
    }

    #[test]
    fn products() {
        let x = var("x");
        let y = var("y");
        assert_eq!((&x * &y).to_string(), "x y");
        assert_eq!((&x * -1.0).to_string(), "-x");
        assert_eq!((&x * &y * 3.0).to_string(), "3 x y");
        assert_eq!((y.derivative() * &x).to_string(), "x dy");
    }

    #[test]
    fn powers() {
        let x = var("x");
        assert_eq!(pow(&x, 2.0).to_string(), "x^2");
        assert_eq!(x.recip().to_string(), "x^-1");
        assert_eq!(pow(&(&x + 1.0), 2.0).to_string(), "(x + 1)^2");
    }

    #[test]
    fn sums() {
        let x = var("x");
        let y = var("y");
        assert_eq!((&x + 1.0).to_string(), "x + 1");
        assert_eq!((&x - &y * 2.0 - 3.0).to_string(), "x - 2 y - 3");
        assert_eq!((&x - &y).to_string(), "x - y");
    }

    #[test]
    fn functions() {
        let x = var("x");
        assert_eq!(exp(x.clone()).to_string(), "e^x");
        assert_eq!(ln(x.clone()).unwrap().to_string(), "ln x");
        assert_eq!(ln(&x + 1.0).unwrap().to_string(), "ln(x + 1)");
    }

    #[test]
    fn tex() {
        let x = var("x");
        assert_eq!(pow(&x, 0.5).to_tex(), "\\sqrt{x}");
        assert_eq!(pow(&x, -0.5).to_tex(), "\\frac{1}{\\sqrt{x}}");
        assert_eq!(pow(&x, 3.0).to_tex(), "{x}^{3}");
        assert_eq!(x.derivative().to_tex(), "\\mathrm{d}x");
        assert_eq!(ln(x.clone()).unwrap().to_tex(), "\\ln x");
        assert_eq!(exp(x).to_tex(), "{e}^{x}");
    }
}
