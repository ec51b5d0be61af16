//! Traversals: a step pipeline paired with the bytecode that recorded it.
//!
//! Every fluent method on [`Traversal`] does two things at once: it appends
//! a [`Step`] to the executable pipeline and records the matching
//! instruction into the traversal's [`Bytecode`]. Strategies later rewrite
//! the pipeline but never the bytecode, which stays a faithful log of what
//! the caller asked for.

pub mod anon;
pub mod dsl;
pub mod lambda;
mod runtime;
pub mod source;
pub mod token;
pub mod translator;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tracing::debug;

use crate::bytecode::{Argument, Bytecode};
use crate::error::{TraversalError, TraversalResult};
use crate::step::Step;
use crate::strategy::StrategySet;
use crate::structure::{Graph, Value};

pub use dsl::Names;
pub use source::GraphTraversalSource;

use runtime::Runtime;

/// Where a traversal is meant to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    #[default]
    Standard,
    /// Marked for graph-computer execution. Evaluation still happens
    /// serially in-process.
    Computer { workers: Option<usize> },
}

/// Progress of a root traversal's own run.
#[derive(Debug, Clone, Default)]
enum RunState {
    #[default]
    Pending,
    Running(Runtime),
    Finished,
}

#[derive(Debug, Clone, Default)]
pub struct Traversal {
    steps: Vec<Step>,
    bytecode: Bytecode,
    strategies: StrategySet,
    graph: Option<Arc<Graph>>,
    mode: ExecutionMode,
    strategies_applied: bool,
    state: RunState,
    peeked: Option<Value>,
}

impl Traversal {
    /// Empty anonymous traversal, the starting point for sub-traversals.
    pub fn start() -> Self {
        Self::default()
    }

    pub(crate) fn bound(graph: Arc<Graph>, strategies: StrategySet, bytecode: Bytecode) -> Self {
        Self {
            graph: Some(graph),
            strategies,
            bytecode,
            ..Self::default()
        }
    }

    pub fn bytecode(&self) -> &Bytecode {
        &self.bytecode
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub(crate) fn steps_mut(&mut self) -> &mut Vec<Step> {
        &mut self.steps
    }

    pub fn strategies(&self) -> &StrategySet {
        &self.strategies
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        self.mode
    }

    pub(crate) fn set_execution_mode(&mut self, mode: ExecutionMode) {
        self.mode = mode;
    }

    pub fn is_anonymous(&self) -> bool {
        self.graph.is_none()
    }

    pub(crate) fn push(&mut self, step: Step, operator: &str, arguments: Vec<Argument>) {
        self.steps.push(step);
        self.bytecode.add_step(operator, arguments);
    }

    pub(crate) fn record(&mut self, operator: &str, arguments: Vec<Argument>) {
        self.bytecode.add_step(operator, arguments);
    }

    pub(crate) fn last_step_mut(&mut self, operator: &str) -> TraversalResult<&mut Step> {
        self.steps.last_mut().ok_or_else(|| {
            TraversalError::InvalidOption(format!("{operator}() needs a preceding step"))
        })
    }

    /// Runs the strategy set over the pipeline. Only the first call does
    /// any work; later calls return immediately.
    pub fn apply_strategies(&mut self) -> TraversalResult<()> {
        if self.strategies_applied {
            return Ok(());
        }
        let strategies = self.strategies.clone();
        strategies.apply(self)?;
        self.strategies_applied = true;
        Ok(())
    }

    /// Evaluates this traversal as a sub-traversal of `input`, draining
    /// every result.
    pub(crate) fn apply_to(&mut self, graph: &Graph, input: Value) -> TraversalResult<Vec<Value>> {
        let mut runtime = Runtime::new([input], self.steps.len());
        let mut output = Vec::new();
        while let Some(value) = runtime.next(&mut self.steps, graph) {
            output.push(value?);
        }
        Ok(output)
    }

    /// First result of the sub-traversal for `input`. Nothing past it is
    /// evaluated.
    pub(crate) fn first(&mut self, graph: &Graph, input: Value) -> TraversalResult<Option<Value>> {
        Runtime::new([input], self.steps.len())
            .next(&mut self.steps, graph)
            .transpose()
    }

    /// True when the sub-traversal yields at least one result for `input`.
    pub(crate) fn test(&mut self, graph: &Graph, input: &Value) -> TraversalResult<bool> {
        Ok(self.first(graph, input.clone())?.is_some())
    }

    fn prepare(&mut self) -> TraversalResult<Runtime> {
        if self.graph.is_none() {
            return Err(TraversalError::Execution(
                "anonymous traversal is not bound to a graph".into(),
            ));
        }
        self.apply_strategies()?;
        if let ExecutionMode::Computer { workers } = self.mode {
            debug!(?workers, "computer execution requested; evaluating in-process");
        }
        Ok(Runtime::new([Value::Null], self.steps.len()))
    }

    fn pull(&mut self) -> Option<TraversalResult<Value>> {
        if let Some(value) = self.peeked.take() {
            return Some(Ok(value));
        }
        if matches!(self.state, RunState::Pending) {
            match self.prepare() {
                Ok(runtime) => self.state = RunState::Running(runtime),
                Err(err) => {
                    self.state = RunState::Finished;
                    return Some(Err(err));
                }
            }
        }
        let graph = self.graph.clone()?;
        let RunState::Running(runtime) = &mut self.state else {
            return None;
        };
        let pulled = runtime.next(&mut self.steps, &graph);
        if pulled.is_none() {
            self.state = RunState::Finished;
        }
        pulled
    }

    /// Pulls ahead by one result. An error is returned here and is not
    /// reported again by the next pull.
    pub fn has_next(&mut self) -> TraversalResult<bool> {
        if self.peeked.is_some() {
            return Ok(true);
        }
        match self.pull() {
            Some(Ok(value)) => {
                self.peeked = Some(value);
                Ok(true)
            }
            Some(Err(err)) => Err(err),
            None => Ok(false),
        }
    }

    /// Collects every result, stopping at the first error.
    pub fn to_list(self) -> TraversalResult<Vec<Value>> {
        self.collect()
    }

    /// Runs the traversal for its side effects.
    pub fn iterate(self) -> TraversalResult<()> {
        for result in self {
            result?;
        }
        Ok(())
    }
}

impl Iterator for Traversal {
    type Item = TraversalResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pull()
    }
}

/// Traversals compare by the bytecode that built them.
impl PartialEq for Traversal {
    fn eq(&self, other: &Self) -> bool {
        self.bytecode == other.bytecode
    }
}

impl Eq for Traversal {}

impl Hash for Traversal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytecode.hash(state);
    }
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, step) in self.steps.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            f.write_str(step.name())?;
        }
        f.write_str("]")
    }
}
