//! Builders that construct expressions in canonical form.
//!
//! These functions are the only way to construct compound expressions. Each one accepts arbitrary
//! (canonical) input expressions and returns the canonical form of the result, folding constants,
//! collecting like terms and factors, and distributing products over sums.
//!
//! Builders that can be given invalid arguments, such as [`ln`] of a negative constant, return a
//! [`Result`]. Sums and products are always defined, and are infallible.
//!
//! [`Result`]: std::result::Result

mod exponential;
mod ln;
mod power;
mod product;
mod sum;

pub use exponential::{exp, exponential};
pub(crate) use exponential::exponential_unchecked;
pub use ln::{ln, log};
pub use power::power;
pub(crate) use power::power_unchecked;
pub use product::product;
pub use sum::sum;
