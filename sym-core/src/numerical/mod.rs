//! Numeric evaluation of symbolic expressions.
//!
//! An expression can be evaluated directly with [`Expr::eval`](crate::symbolic::expr::Expr::eval),
//! or compiled once into a closure with
//! [`Expr::compile_scalar`](crate::symbolic::expr::Expr::compile_scalar) or
//! [`Expr::compile_vector`](crate::symbolic::expr::Expr::compile_vector) and then evaluated many
//! times. Both only use the real part of constants.

#![cfg(feature = "numerical")]

pub mod compile;
pub mod ctxt;
pub mod error;
mod eval;

pub use compile::{ScalarFunction, VectorFunction};
pub use ctxt::Ctxt;
