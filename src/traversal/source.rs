//==================================================
// File: traversal/source.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Entry point for bound traversals
// Objective: Hold the graph, the strategy set and the source instructions
//            every spawned traversal starts from
//==================================================

use std::sync::Arc;

use tracing::debug;

use crate::bytecode::{Argument, Bytecode};
use crate::config::TraversalConfig;
use crate::error::TraversalResult;
use crate::strategy::{
    Computer, StrategyCategory, StrategyRef, StrategySet, TraversalStrategy, VertexProgramStrategy,
    default_strategies,
};
use crate::structure::{Graph, Value};
use crate::traversal::Traversal;

/// `g` in `g.V().out()`.
///
/// Configuration calls consume and return the source so they chain; each one
/// records a source instruction. Traversals spawned from the source get a
/// copy of its strategies and instructions.
#[derive(Debug, Clone)]
pub struct GraphTraversalSource {
    graph: Arc<Graph>,
    strategies: StrategySet,
    bytecode: Bytecode,
}

impl GraphTraversalSource {
    pub fn new(graph: Arc<Graph>) -> Self {
        Self {
            graph,
            strategies: default_strategies(),
            bytecode: Bytecode::new(),
        }
    }

    /// Source whose strategies come from `config`. Decoration and
    /// verification strategies are recorded as `withStrategies`; the
    /// optimizations stay implicit as they do for [`GraphTraversalSource::new`].
    pub fn from_config(graph: Arc<Graph>, config: &TraversalConfig) -> TraversalResult<Self> {
        let strategies = config.strategy_set()?;
        let mut bytecode = Bytecode::new();
        for strategy in strategies.iter() {
            if strategy.category() != StrategyCategory::Optimization {
                bytecode.add_source("withStrategies", vec![Argument::Strategy(strategy.clone())]);
            }
        }
        debug!(strategies = ?strategies.names(), "traversal source configured");
        Ok(Self {
            graph,
            strategies,
            bytecode,
        })
    }

    pub fn with_strategies(self, strategy: impl TraversalStrategy) -> TraversalResult<Self> {
        self.with_strategy_ref(StrategyRef::new(strategy))
    }

    pub fn with_strategy_ref(mut self, strategy: StrategyRef) -> TraversalResult<Self> {
        self.strategies.add_ref(strategy.clone())?;
        self.bytecode
            .add_source("withStrategies", vec![Argument::Strategy(strategy)]);
        Ok(self)
    }

    /// Shorthand for adding a [`VertexProgramStrategy`] built from `computer`.
    pub fn with_computer(self, computer: Computer) -> TraversalResult<Self> {
        self.with_strategies(VertexProgramStrategy::from(computer))
    }

    pub fn without_strategies(mut self, names: &[&str]) -> Self {
        for name in names {
            if !self.strategies.remove(name) {
                debug!(strategy = name, "withoutStrategies named an absent strategy");
            }
        }
        let arguments = names.iter().map(|name| Argument::from(*name)).collect();
        self.bytecode.add_source("withoutStrategies", arguments);
        self
    }

    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }

    pub fn strategies(&self) -> &StrategySet {
        &self.strategies
    }

    pub fn bytecode(&self) -> &Bytecode {
        &self.bytecode
    }

    /// Bound traversal with no steps yet.
    pub(crate) fn spawn(&self) -> Traversal {
        Traversal::bound(self.graph.clone(), self.strategies.clone(), self.bytecode.clone())
    }

    /// `V()`: every vertex.
    pub fn v(&self) -> Traversal {
        self.spawn().v(Vec::new())
    }

    /// `V(ids...)`: the listed vertices, in graph order.
    pub fn v_ids<I, V>(&self, ids: I) -> Traversal
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.spawn().v(ids.into_iter().map(Into::into).collect())
    }

    pub fn add_v(&self, label: &str) -> Traversal {
        self.spawn().add_v(label)
    }
}
