#![doc = include_str!("../README.md")]

pub mod config;
pub mod numerical;
pub mod symbolic;

pub use symbolic::{
    build::{exp, exponential, ln, log, power, product, sum},
    Constant,
    Differential,
    Expr,
    Variable,
    VariableSpace,
};
