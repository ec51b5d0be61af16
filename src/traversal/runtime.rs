//==================================================
// File: traversal/runtime.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Pull-based pipeline execution
// Objective: Hand out one result per pull, expanding upstream inputs only
//            when a stage runs dry
//==================================================

use std::collections::VecDeque;

use tracing::trace;

use crate::error::TraversalResult;
use crate::step::Step;
use crate::structure::{Graph, Value};

//==================================================
// SECTION: Stage State
//==================================================

#[derive(Debug, Clone, Default)]
struct Stage {
    /// Outputs of the input most recently expanded by this stage.
    buffer: VecDeque<Value>,
    /// Inputs a barrier has gathered so far.
    collected: Vec<Value>,
    /// Values let through by a `limit`.
    emitted: usize,
    exhausted: bool,
}

/// Execution state for one run of a step pipeline.
///
/// Stage `i` holds what step `i` produced and has not yet handed on. A pull
/// on stage `i` takes from its buffer, or pulls exactly one value from stage
/// `i - 1` and expands it. `count`, `groupCount` and `order` are the only
/// steps that drain their upstream before emitting; `limit` stops pulling
/// once its quota is met.
#[derive(Debug, Clone, Default)]
pub(crate) struct Runtime {
    source: VecDeque<Value>,
    stages: Vec<Stage>,
}

//==================================================
// SECTION: Pulling
//==================================================

impl Runtime {
    pub(crate) fn new(seeds: impl IntoIterator<Item = Value>, depth: usize) -> Self {
        Self {
            source: seeds.into_iter().collect(),
            stages: vec![Stage::default(); depth],
        }
    }

    /// Next value out of the last step, or `None` once the pipeline is
    /// drained. An error fails only the input that was being expanded; the
    /// following pull carries on with the next input.
    pub(crate) fn next(&mut self, steps: &mut [Step], graph: &Graph) -> Option<TraversalResult<Value>> {
        let depth = steps.len();
        if depth != self.stages.len() {
            self.stages.resize(depth, Stage::default());
        }
        self.pull(steps, graph, depth)
    }

    fn pull(&mut self, steps: &mut [Step], graph: &Graph, level: usize) -> Option<TraversalResult<Value>> {
        let Some(index) = level.checked_sub(1) else {
            return self.source.pop_front().map(Ok);
        };
        loop {
            if let Some(value) = self.stages[index].buffer.pop_front() {
                return Some(Ok(value));
            }
            if self.stages[index].exhausted {
                return None;
            }

            if let Step::Limit(limit) = &steps[index] {
                let limit = *limit;
                if self.stages[index].emitted >= limit {
                    trace!(limit, "limit reached; upstream left unpulled");
                    self.stages[index].exhausted = true;
                    return None;
                }
                let pulled = self.pull(steps, graph, index);
                match &pulled {
                    Some(Ok(_)) => self.stages[index].emitted += 1,
                    None => self.stages[index].exhausted = true,
                    Some(Err(_)) => {}
                }
                return pulled;
            }

            if steps[index].is_barrier() {
                while let Some(pulled) = self.pull(steps, graph, index) {
                    match pulled {
                        Ok(value) => self.stages[index].collected.push(value),
                        Err(err) => return Some(Err(err)),
                    }
                }
                let inputs = std::mem::take(&mut self.stages[index].collected);
                self.stages[index].exhausted = true;
                trace!(step = steps[index].name(), inputs = inputs.len(), "barrier released");
                match steps[index].barrier(graph, inputs) {
                    Ok(outputs) => self.stages[index].buffer.extend(outputs),
                    Err(err) => return Some(Err(err)),
                }
                continue;
            }

            match self.pull(steps, graph, index) {
                Some(Ok(item)) => match steps[index].process(graph, item) {
                    Ok(outputs) => self.stages[index].buffer.extend(outputs),
                    Err(err) => return Some(Err(err)),
                },
                Some(Err(err)) => return Some(Err(err)),
                None => {
                    self.stages[index].exhausted = true;
                    return None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{VertexId, modern};

    #[test]
    fn limit_stops_pulling_upstream() {
        let graph = modern().unwrap();
        let mut steps = vec![Step::AddV("clone".into()), Step::Limit(1)];
        let mut runtime = Runtime::new(vec![Value::Null; 3], steps.len());
        assert!(matches!(runtime.next(&mut steps, &graph), Some(Ok(Value::Vertex(_)))));
        assert!(runtime.next(&mut steps, &graph).is_none());
        assert_eq!(graph.vertex_ids().len(), 7);
    }

    #[test]
    fn failed_input_does_not_end_the_run() {
        let graph = modern().unwrap();
        let mut steps = vec![Step::Adjacent {
            direction: crate::structure::Direction::Out,
            labels: vec!["created".into()],
        }];
        let seeds = vec![Value::Integer(0), Value::Vertex(VertexId(6))];
        let mut runtime = Runtime::new(seeds, steps.len());
        assert!(matches!(runtime.next(&mut steps, &graph), Some(Err(_))));
        assert_eq!(
            runtime.next(&mut steps, &graph).map(|r| r.unwrap()),
            Some(Value::Vertex(VertexId(3)))
        );
        assert!(runtime.next(&mut steps, &graph).is_none());
    }

    #[test]
    fn count_waits_for_every_input() {
        let graph = modern().unwrap();
        let mut steps = vec![Step::Start(Vec::new()), Step::Count];
        let mut runtime = Runtime::new([Value::Null], steps.len());
        assert_eq!(
            runtime.next(&mut steps, &graph).map(|r| r.unwrap()),
            Some(Value::Integer(6))
        );
        assert!(runtime.next(&mut steps, &graph).is_none());
    }
}
