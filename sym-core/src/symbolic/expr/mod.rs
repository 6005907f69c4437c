//! The canonical expression tree.
//!
//! An [`Expr`] is an immutable tree that is always kept in **canonical form**: every node is
//! produced by one of the builders in [`crate::symbolic::build`], and the builders guarantee that
//! two mathematically-equal expressions that were built from the same primitives compare equal.
//! This makes [`PartialEq`] and [`Hash`] on [`Expr`] cheap structural comparisons.
//!
//! The invariants maintained by the builders are:
//!
//! - A [`Product`] holds at least one factor, and each factor is a [`Variable`], [`Differential`],
//!   [`Power`], [`Exponential`] or [`Ln`]. No two factors share the same base, and the
//!   coefficient is never zero. A product with a single factor has a coefficient other than one.
//! - A [`Sum`] holds at least one term, and each term is a factor or a [`Product`]. No two terms
//!   share the same shape (the term with its coefficient reset to one), and a sum with a single
//!   term has a non-zero constant tail.
//! - A [`Power`] never has a constant, product, power or exponential as its member, and its
//!   exponent is never zero or one.
//! - An [`Exponential`] has a positive real base other than one, and its member is never a
//!   constant, sum, or logarithm.
//!
//! Nodes are reference counted, so cloning an [`Expr`] is cheap.

mod fmt;
mod iter;
mod ops;

pub use iter::ExprIter;

use once_cell::sync::OnceCell;
use std::{
    cmp::Ordering,
    fmt::{Debug, Formatter},
    hash::{Hash, Hasher},
    sync::Arc,
};
use super::{constant::Constant, variable::{Differential, Variable, VariableSpace}};

/// A symbolic expression in canonical form.
///
/// The variants are listed in the order used to sort terms and factors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Expr {
    /// A numeric constant.
    Constant(Constant),

    /// A named variable.
    Variable(Variable),

    /// The infinitesimal change of a variable.
    Differential(Differential),

    /// An expression raised to a constant exponent.
    Power(Power),

    /// A constant raised to an expression.
    Exponential(Exponential),

    /// The natural logarithm of an expression.
    Ln(Ln),

    /// A product of factors, scaled by a constant coefficient.
    Product(Product),

    /// A sum of terms, plus a constant tail.
    Sum(Sum),
}

impl Expr {
    /// The constant zero.
    pub const ZERO: Self = Self::Constant(Constant::ZERO);

    /// The constant one.
    pub const ONE: Self = Self::Constant(Constant::ONE);

    /// Returns the constant value of the expression, if it is a constant.
    pub fn as_constant(&self) -> Option<Constant> {
        match self {
            Self::Constant(c) => Some(*c),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Constant(c) if c.is_zero())
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Self::Constant(c) if c.is_one())
    }

    /// Returns true if the expression can be a factor of a [`Product`].
    pub fn is_factor(&self) -> bool {
        matches!(
            self,
            Self::Variable(_) | Self::Differential(_) | Self::Power(_) | Self::Exponential(_) | Self::Ln(_)
        )
    }

    /// Returns true if the expression is a differential, or a power of one.
    pub fn is_differential_factor(&self) -> bool {
        match self {
            Self::Differential(_) => true,
            Self::Power(p) => matches!(p.member(), Self::Differential(_)),
            _ => false,
        }
    }

    /// Returns the coefficient this term contributes to a sum: the coefficient of a product, or
    /// one for a bare factor.
    pub(crate) fn times(&self) -> Constant {
        match self {
            Self::Product(p) => p.times(),
            _ => Constant::ONE,
        }
    }

    /// Returns the term with its coefficient reset to one.
    pub(crate) fn shape(&self) -> Expr {
        match self {
            Self::Product(p) => p.with_times(Constant::ONE),
            term => term.clone(),
        }
    }

    /// Scales a factor, or a shape returned by [`Expr::shape`], by a non-zero coefficient.
    pub(crate) fn with_times(self, times: Constant) -> Expr {
        if times.is_one() {
            return self;
        }
        match self {
            Self::Product(p) => p.with_times(times),
            factor => Self::Product(Product::new_unchecked(vec![factor], times)),
        }
    }

    /// Returns the direct children of this expression.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Self::Constant(_) | Self::Variable(_) | Self::Differential(_) => Vec::new(),
            Self::Power(p) => vec![p.member()],
            Self::Exponential(x) => vec![x.member()],
            Self::Ln(l) => vec![l.member()],
            Self::Product(p) => p.factors().iter().collect(),
            Self::Sum(s) => s.products().iter().collect(),
        }
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// Returns the variables that appear in the expression, including those that only appear
    /// through their differentials, in the order they are first visited in post-order.
    pub fn variables(&self) -> VariableSpace {
        self.post_order_iter()
            .filter_map(|expr| match expr {
                Self::Variable(v) => Some(v.clone()),
                Self::Differential(d) => Some(d.variable().clone()),
                _ => None,
            })
            .collect()
    }
}

impl From<Constant> for Expr {
    fn from(c: Constant) -> Self {
        Self::Constant(c)
    }
}

impl From<f64> for Expr {
    fn from(n: f64) -> Self {
        Self::Constant(Constant::real(n))
    }
}

impl From<Variable> for Expr {
    fn from(v: Variable) -> Self {
        Self::Variable(v)
    }
}

impl From<Differential> for Expr {
    fn from(d: Differential) -> Self {
        Self::Differential(d)
    }
}

/// Implements equality, hashing and ordering for a reference-counted node by comparing the key
/// returned by its `key` method. The cached derivative is not part of the key.
macro_rules! impl_node_cmp {
    ($name:ident) => {
        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.0, &other.0) || self.key() == other.key()
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.key().hash(state);
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                if Arc::ptr_eq(&self.0, &other.0) {
                    return Ordering::Equal;
                }
                self.key().cmp(&other.key())
            }
        }
    };
}

struct PowerNode {
    member: Expr,
    exponent: Constant,
    df: OnceCell<Expr>,
}

/// `member^exponent`, for a constant exponent.
#[derive(Clone)]
pub struct Power(Arc<PowerNode>);

impl Power {
    pub(crate) fn new_unchecked(member: Expr, exponent: Constant) -> Self {
        Self(Arc::new(PowerNode { member, exponent, df: OnceCell::new() }))
    }

    /// The expression being raised to a power.
    pub fn member(&self) -> &Expr {
        &self.0.member
    }

    pub fn exponent(&self) -> Constant {
        self.0.exponent
    }

    /// Returns the derivative of the power with respect to its member, computing it on first use.
    pub(crate) fn df(&self, init: impl FnOnce() -> Expr) -> &Expr {
        self.0.df.get_or_init(init)
    }

    fn key(&self) -> (&Expr, Constant) {
        (&self.0.member, self.0.exponent)
    }
}

impl_node_cmp!(Power);

impl Debug for Power {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Power")
            .field("member", self.member())
            .field("exponent", &self.exponent())
            .finish()
    }
}

struct ExponentialNode {
    base: Constant,
    member: Expr,
    df: OnceCell<Expr>,
}

/// `base^member`, for a positive real base.
#[derive(Clone)]
pub struct Exponential(Arc<ExponentialNode>);

impl Exponential {
    pub(crate) fn new_unchecked(base: Constant, member: Expr) -> Self {
        Self(Arc::new(ExponentialNode { base, member, df: OnceCell::new() }))
    }

    pub fn base(&self) -> Constant {
        self.0.base
    }

    /// The exponent.
    pub fn member(&self) -> &Expr {
        &self.0.member
    }

    pub(crate) fn df(&self, init: impl FnOnce() -> Expr) -> &Expr {
        self.0.df.get_or_init(init)
    }

    fn key(&self) -> (Constant, &Expr) {
        (self.0.base, &self.0.member)
    }
}

impl_node_cmp!(Exponential);

impl Debug for Exponential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exponential")
            .field("base", &self.base())
            .field("member", self.member())
            .finish()
    }
}

struct LnNode {
    member: Expr,
    df: OnceCell<Expr>,
}

/// The natural logarithm of an expression.
#[derive(Clone)]
pub struct Ln(Arc<LnNode>);

impl Ln {
    pub(crate) fn new_unchecked(member: Expr) -> Self {
        Self(Arc::new(LnNode { member, df: OnceCell::new() }))
    }

    pub fn member(&self) -> &Expr {
        &self.0.member
    }

    pub(crate) fn df(&self, init: impl FnOnce() -> Expr) -> &Expr {
        self.0.df.get_or_init(init)
    }

    fn key(&self) -> &Expr {
        &self.0.member
    }
}

impl_node_cmp!(Ln);

impl Debug for Ln {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Ln").field(self.member()).finish()
    }
}

/// A product of factors scaled by a constant coefficient.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Product {
    factors: Arc<[Expr]>,
    times: Constant,
}

impl Product {
    /// Creates a product from factors that already satisfy the product invariants. The factors are
    /// sorted.
    pub(crate) fn new_unchecked(mut factors: Vec<Expr>, times: Constant) -> Self {
        factors.sort();
        Self { factors: factors.into(), times }
    }

    /// The factors of the product, in canonical order.
    pub fn factors(&self) -> &[Expr] {
        &self.factors
    }

    /// The constant coefficient.
    pub fn times(&self) -> Constant {
        self.times
    }

    /// Returns the same factors scaled by a different non-zero coefficient. A single factor with a
    /// coefficient of one is returned as the factor itself.
    pub(crate) fn with_times(&self, times: Constant) -> Expr {
        if times.is_one() && self.factors.len() == 1 {
            self.factors[0].clone()
        } else {
            Expr::Product(Self { factors: Arc::clone(&self.factors), times })
        }
    }
}

/// A sum of terms plus a constant tail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sum {
    products: Arc<[Expr]>,
    tail: Constant,
}

impl Sum {
    /// Creates a sum from terms that already satisfy the sum invariants. The terms are sorted.
    pub(crate) fn new_unchecked(mut products: Vec<Expr>, tail: Constant) -> Self {
        products.sort();
        Self { products: products.into(), tail }
    }

    /// The non-constant terms of the sum, in canonical order.
    pub fn products(&self) -> &[Expr] {
        &self.products
    }

    /// The constant term.
    pub fn tail(&self) -> Constant {
        self.tail
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use super::*;

    fn var(name: &str) -> Expr {
        Expr::from(Variable::new(name))
    }

    #[test]
    fn variables_include_differentials() {
        let expr = var("y") * var("x").derivative() + var("z");
        let expected = ["z", "y", "x"].into_iter().map(Variable::new).collect::<VariableSpace>();
        assert_eq!(expr.variables(), expected);
    }

    #[test]
    fn equal_expressions_hash_equally() {
        let a = (var("x") + 1.0) * var("y");
        let b = var("y") * (1.0 + var("x"));
        assert_eq!(a, b);

        let set = [a, b].into_iter().collect::<HashSet<_>>();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn children() {
        let expr = var("x") * var("y") * 3.0;
        assert_eq!(expr.children(), vec![&var("x"), &var("y")]);
        assert!(var("x").children().is_empty());
    }
}
