//==================================================
// File: strategy/decoration.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Decoration strategies
// Objective: Restrict traversals to a subgraph and mark them for computer
//            execution
//==================================================

use crate::bytecode::Argument;
use crate::error::TraversalResult;
use crate::step::{FilterStep, Produces, Step};
use crate::structure::{Direction, Value};
use crate::traversal::{ExecutionMode, Traversal};

use super::{Configuration, StrategyCategory, TraversalStrategy};

//==================================================
// SECTION: SubgraphStrategy
//==================================================

/// Hides every vertex and edge that fails the configured criteria.
///
/// A filter is injected after each step that emits vertices or edges. When
/// an edge criterion exists, `out()`/`in()` are expanded into
/// `outE().filter().inV()` / `inE().filter().outV()` so the edges walked are
/// checked too.
#[derive(Debug, Clone, Default)]
pub struct SubgraphStrategy {
    vertices: Option<Traversal>,
    edges: Option<Traversal>,
}

impl SubgraphStrategy {
    pub const NAME: &'static str = "SubgraphStrategy";

    pub fn build() -> SubgraphStrategyBuilder {
        SubgraphStrategyBuilder::default()
    }

    pub fn vertex_criterion(&self) -> Option<&Traversal> {
        self.vertices.as_ref()
    }

    pub fn edge_criterion(&self) -> Option<&Traversal> {
        self.edges.as_ref()
    }

    fn push_filter(criterion: &Option<Traversal>, steps: &mut Vec<Step>) {
        if let Some(criterion) = criterion {
            steps.push(Step::Filter(FilterStep::injected(criterion.clone(), Self::NAME)));
        }
    }

    fn already_filtered(next: Option<&Step>) -> bool {
        matches!(next, Some(Step::Filter(filter)) if filter.injected_by() == Some(Self::NAME))
    }
}

#[derive(Debug, Clone, Default)]
pub struct SubgraphStrategyBuilder {
    vertices: Option<Traversal>,
    edges: Option<Traversal>,
}

impl SubgraphStrategyBuilder {
    pub fn vertices(mut self, criterion: Traversal) -> Self {
        self.vertices = Some(criterion);
        self
    }

    pub fn edges(mut self, criterion: Traversal) -> Self {
        self.edges = Some(criterion);
        self
    }

    pub fn create(self) -> SubgraphStrategy {
        SubgraphStrategy {
            vertices: self.vertices,
            edges: self.edges,
        }
    }
}

impl TraversalStrategy for SubgraphStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn category(&self) -> StrategyCategory {
        StrategyCategory::Decoration
    }

    fn configuration(&self) -> Configuration {
        let mut configuration = Configuration::new();
        if let Some(vertices) = &self.vertices {
            configuration = configuration.with("vertices", Argument::Traversal(vertices.bytecode().clone()));
        }
        if let Some(edges) = &self.edges {
            configuration = configuration.with("edges", Argument::Traversal(edges.bytecode().clone()));
        }
        configuration
    }

    fn apply(&self, traversal: &mut Traversal) -> TraversalResult<()> {
        let original = std::mem::take(traversal.steps_mut());
        let mut rewritten = Vec::with_capacity(original.len() * 2);
        let mut steps = original.into_iter().peekable();
        while let Some(step) = steps.next() {
            if Self::already_filtered(steps.peek()) {
                rewritten.push(step);
                continue;
            }
            match step {
                Step::Adjacent { direction, labels }
                    if self.edges.is_some() && direction != Direction::Both =>
                {
                    rewritten.push(Step::Incident { direction, labels });
                    Self::push_filter(&self.edges, &mut rewritten);
                    rewritten.push(Step::EdgeVertex(direction.opposite()));
                    Self::push_filter(&self.vertices, &mut rewritten);
                }
                step => {
                    let produces = step.produces();
                    rewritten.push(step);
                    match produces {
                        Produces::Vertices => Self::push_filter(&self.vertices, &mut rewritten),
                        Produces::Edges => Self::push_filter(&self.edges, &mut rewritten),
                        Produces::Other => {}
                    }
                }
            }
        }
        *traversal.steps_mut() = rewritten;
        Ok(())
    }
}

//==================================================
// SECTION: VertexProgramStrategy
//==================================================

/// Graph-computer settings passed to `with_computer`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Computer {
    workers: Option<usize>,
}

impl Computer {
    pub fn compute() -> Self {
        Self::default()
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn worker_count(&self) -> Option<usize> {
        self.workers
    }
}

/// Marks traversals for graph-computer execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VertexProgramStrategy {
    workers: Option<usize>,
}

impl VertexProgramStrategy {
    pub const NAME: &'static str = "VertexProgramStrategy";
    pub const WORKERS: &'static str = "workers";

    pub fn new(workers: Option<usize>) -> Self {
        Self { workers }
    }

    pub fn workers(&self) -> Option<usize> {
        self.workers
    }
}

impl From<Computer> for VertexProgramStrategy {
    fn from(computer: Computer) -> Self {
        Self::new(computer.workers)
    }
}

impl TraversalStrategy for VertexProgramStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn category(&self) -> StrategyCategory {
        StrategyCategory::Decoration
    }

    fn configuration(&self) -> Configuration {
        match self.workers {
            Some(workers) => Configuration::new().with(Self::WORKERS, Value::from(workers)),
            None => Configuration::new(),
        }
    }

    fn apply(&self, traversal: &mut Traversal) -> TraversalResult<()> {
        traversal.set_execution_mode(ExecutionMode::Computer {
            workers: self.workers,
        });
        Ok(())
    }
}
