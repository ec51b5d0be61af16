use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::structure::{Graph, Value};

type PredicateFn = dyn Fn(&Graph, &Value) -> bool + Send + Sync;

/// Named closure predicate.
///
/// Closures cannot be compared, so a lambda is identified by its name: two
/// lambdas with the same name are treated as the same instruction argument.
#[derive(Clone)]
pub struct Lambda {
    name: String,
    predicate: Arc<PredicateFn>,
}

impl Lambda {
    pub fn predicate<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Graph, &Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn test(&self, graph: &Graph, value: &Value) -> bool {
        (self.predicate)(graph, value)
    }
}

impl PartialEq for Lambda {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Lambda {}

impl Hash for Lambda {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lambda").field("name", &self.name).finish()
    }
}

impl fmt::Display for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lambda[{}]", self.name)
    }
}
