//! Named variables, their differentials, and ordered spaces of variables.

use std::{fmt::{Display, Formatter}, sync::Arc};

/// A named variable. Variables with the same name are the same variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    name: Arc<str>,
}

impl Variable {
    /// Creates a variable with the given name.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    /// The name of the variable.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The infinitesimal change of this variable, written `dx` for a variable `x`.
    pub fn d(&self) -> Differential {
        Differential::new(self.clone())
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The infinitesimal change `dx` of a [`Variable`] `x`.
///
/// Differentials take part in products like any other factor, so that a partial derivative is a
/// quotient of differentials.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Differential {
    variable: Variable,
}

impl Differential {
    pub fn new(variable: Variable) -> Self {
        Self { variable }
    }

    /// The variable this is the differential of.
    pub fn variable(&self) -> &Variable {
        &self.variable
    }
}

impl Display for Differential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.variable)
    }
}

/// An ordered list of distinct variables.
///
/// The position of each variable is the index of the argument it is read from when evaluating a
/// function compiled with [`Expr::compile_vector`](crate::symbolic::expr::Expr::compile_vector).
/// Adding a variable that is already present keeps its first position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableSpace {
    variables: Vec<Variable>,
}

impl VariableSpace {
    /// Creates an empty variable space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the variable to the space, unless it is already present. Returns its index.
    pub fn push(&mut self, variable: Variable) -> usize {
        match self.index_of(&variable) {
            Some(index) => index,
            None => {
                self.variables.push(variable);
                self.variables.len() - 1
            },
        }
    }

    /// Returns the position of the variable in the space.
    pub fn index_of(&self, variable: &Variable) -> Option<usize> {
        self.variables.iter().position(|v| v == variable)
    }

    pub fn contains(&self, variable: &Variable) -> bool {
        self.index_of(variable).is_some()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }
}

impl FromIterator<Variable> for VariableSpace {
    fn from_iter<I: IntoIterator<Item = Variable>>(iter: I) -> Self {
        let mut space = Self::new();
        for variable in iter {
            space.push(variable);
        }
        space
    }
}

impl<'a> IntoIterator for &'a VariableSpace {
    type Item = &'a Variable;
    type IntoIter = std::slice::Iter<'a, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.iter()
    }
}
