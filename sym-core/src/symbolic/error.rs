//! Kinds of errors produced while building or transforming symbolic expressions.

use ariadne::Fmt;
use crate::symbolic::constant::Constant;
use sym_attrs::ErrorKind;
use sym_error::EXPR;

/// Attempted to take the logarithm of a non-positive real number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot take the logarithm of `{}`", value),
    labels = [format!("this evaluates to {}", value.fg(EXPR))],
    help = "the logarithm is only defined for positive real numbers",
)]
pub struct NonPositiveLogarithm {
    /// The offending value.
    pub value: Constant,
}

/// The base of a logarithm is not a positive real number other than one.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a valid logarithm base", base),
    labels = ["the logarithm of this expression"],
    help = "logarithm bases must be positive real numbers, and cannot be `1`",
)]
pub struct InvalidLogBase {
    /// The offending base.
    pub base: Constant,
}

/// The base of an exponential is not a positive real number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a valid exponential base", base),
    labels = ["this exponent"],
    help = "exponential bases must be non-negative real numbers",
)]
pub struct InvalidExponentialBase {
    /// The offending base.
    pub base: Constant,
}

/// A differential was raised to a power that is not an integer.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot raise a differential to the power of `{}`", order),
    labels = ["this expression contains the differential"],
    help = "differentials can only be raised to integer powers",
)]
pub struct FractionalDifferentialOrder {
    /// The resulting order of the differential.
    pub order: Constant,
}

/// An operation was applied to an operand it is not defined for.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot {} `{}`", operation, operand),
    labels = ["this operand"],
)]
pub struct InvalidOperand {
    /// A description of the operation, such as `"evaluate"`.
    pub operation: &'static str,

    /// The plain-text rendering of the operand.
    pub operand: String,
}
