use crate::error::TraversalResult;
use crate::structure::{Graph, Value};
use crate::traversal::Traversal;

/// Keeps an input when its sub-traversal yields at least one result.
#[derive(Debug, Clone)]
pub struct FilterStep {
    traversal: Traversal,
    injected_by: Option<&'static str>,
}

impl FilterStep {
    pub fn new(traversal: Traversal) -> Self {
        Self {
            traversal,
            injected_by: None,
        }
    }

    /// A filter added by a strategy rather than by the user.
    pub fn injected(traversal: Traversal, strategy: &'static str) -> Self {
        Self {
            traversal,
            injected_by: Some(strategy),
        }
    }

    pub fn traversal(&self) -> &Traversal {
        &self.traversal
    }

    pub(crate) fn traversal_mut(&mut self) -> &mut Traversal {
        &mut self.traversal
    }

    pub fn injected_by(&self) -> Option<&'static str> {
        self.injected_by
    }

    pub(crate) fn process(&mut self, graph: &Graph, item: Value) -> TraversalResult<Vec<Value>> {
        if self.traversal.test(graph, &item)? {
            Ok(vec![item])
        } else {
            Ok(Vec::new())
        }
    }
}

/// `and(t1, t2, ...)`: every sub-traversal must yield something.
pub(crate) fn process_and(
    traversals: &mut [Traversal],
    graph: &Graph,
    item: Value,
) -> TraversalResult<Vec<Value>> {
    for traversal in traversals.iter_mut() {
        if !traversal.test(graph, &item)? {
            return Ok(Vec::new());
        }
    }
    Ok(vec![item])
}
