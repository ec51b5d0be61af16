use crate::error::{TraversalError, TraversalResult};
use crate::structure::{Graph, Value};
use crate::traversal::Traversal;

/// `repeat(t).times(n)`: feeds the output of `t` back into itself `n` times.
#[derive(Debug, Clone)]
pub struct RepeatStep {
    traversal: Traversal,
    times: Option<usize>,
}

impl RepeatStep {
    pub fn new(traversal: Traversal) -> Self {
        Self {
            traversal,
            times: None,
        }
    }

    pub fn traversal(&self) -> &Traversal {
        &self.traversal
    }

    pub(crate) fn traversal_mut(&mut self) -> &mut Traversal {
        &mut self.traversal
    }

    pub fn times(&self) -> Option<usize> {
        self.times
    }

    pub(crate) fn set_times(&mut self, times: usize) {
        self.times = Some(times);
    }

    pub(crate) fn process(&mut self, graph: &Graph, item: Value) -> TraversalResult<Vec<Value>> {
        let times = self
            .times
            .ok_or_else(|| TraversalError::Execution("repeat() requires times()".into()))?;
        let mut current = vec![item];
        for _ in 0..times {
            if current.is_empty() {
                break;
            }
            let mut next = Vec::new();
            for value in current {
                next.extend(self.traversal.apply_to(graph, value)?);
            }
            current = next;
        }
        Ok(current)
    }
}
