use crate::symbolic::variable::Variable;
use std::collections::HashMap;

/// A context to use when evaluating an expression directly, containing the values of the
/// variables that can be used within the expression.
#[derive(Debug, Clone, Default)]
pub struct Ctxt {
    /// The variables in the context.
    vars: HashMap<Variable, f64>,
}

impl Ctxt {
    /// Creates a new empty context.
    pub fn new() -> Ctxt {
        Ctxt::default()
    }

    /// Add a variable to the context.
    pub fn add_var(&mut self, variable: Variable, value: f64) {
        self.vars.insert(variable, value);
    }

    /// Get the value of a variable in the context.
    pub fn get_var(&self, variable: &Variable) -> Option<f64> {
        self.vars.get(variable).copied()
    }

    /// Returns the variables in the context.
    pub fn get_vars(&self) -> &HashMap<Variable, f64> {
        &self.vars
    }
}

impl FromIterator<(Variable, f64)> for Ctxt {
    fn from_iter<I: IntoIterator<Item = (Variable, f64)>>(iter: I) -> Self {
        Self { vars: iter.into_iter().collect() }
    }
}
