//! Symbolic expressions in canonical form.
//!
//! Expressions are built from [`Constant`]s, [`Variable`]s and their [`Differential`]s with the
//! arithmetic operators and the builders in [`build`]. Every expression is kept in canonical form,
//! so structural equality is mathematical equality for expressions built from the same
//! primitives.

pub mod build;
pub mod constant;
mod derivative;
pub mod error;
pub mod expr;
mod substitute;
pub mod variable;

pub use build::{exp, exponential, ln, log, power, product, sum};
pub use constant::Constant;
pub use expr::Expr;
pub use variable::{Differential, Variable, VariableSpace};
