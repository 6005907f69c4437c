//! Kinds of errors produced while evaluating expressions numerically.

use crate::symbolic::{expr::Expr, variable::Variable};
use sym_attrs::ErrorKind;
use sym_error::Error;

pub use crate::symbolic::error::InvalidOperand;

/// The variable has no value.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` has no value", name),
    labels = ["this expression uses the variable"],
    help = format!("add `{}` to the context or variable space being evaluated in", name),
)]
pub struct UnboundVariable {
    /// The name of the variable.
    pub name: String,
}

/// Builds the error for a variable that has no value.
pub(crate) fn unbound(variable: &Variable) -> Error {
    Error::spanning(variable.to_string(), UnboundVariable { name: variable.name().to_string() })
}

/// Builds the error for an expression that has no numeric value, such as a differential.
pub(crate) fn invalid_operand(expr: &Expr, operation: &'static str) -> Error {
    let operand = expr.to_string();
    Error::spanning(operand.clone(), InvalidOperand { operation, operand })
}
