use std::fmt;

use super::instruction::Argument;

/// A named variable reference paired with the value it currently resolves to.
///
/// Bindings take part in bytecode equality by name *and* value, so two
/// traversals that bind different names to the same value are not equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binding {
    name: String,
    value: Box<Argument>,
}

impl Binding {
    pub fn new(name: impl Into<String>, value: impl Into<Argument>) -> Self {
        Self {
            name: name.into(),
            value: Box::new(value.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Argument {
        &self.value
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "binding[{}={}]", self.name, self.value)
    }
}
