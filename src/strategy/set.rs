//==================================================
// File: strategy/set.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Ordered strategy registry
// Objective: Keep strategies topologically sorted by category and declared
//            prior/post constraints; apply them over a traversal tree
//==================================================

use std::collections::BTreeSet;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use tracing::{debug, instrument};

use super::{
    IdentityRemovalStrategy, IncidentToAdjacentStrategy, StrategyCategory, StrategyRef,
    TraversalStrategy,
};
use crate::error::{TraversalError, TraversalResult};
use crate::traversal::Traversal;

static DEFAULT_STRATEGIES: Lazy<StrategySet> = Lazy::new(|| StrategySet {
    strategies: vec![
        StrategyRef::new(IdentityRemovalStrategy),
        StrategyRef::new(IncidentToAdjacentStrategy),
    ],
});

/// The optimizations every traversal source starts with.
pub fn default_strategies() -> StrategySet {
    DEFAULT_STRATEGIES.clone()
}

//==================================================
// SECTION: Registry
//==================================================

/// Strategies in application order. At most one strategy per name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategySet {
    strategies: Vec<StrategyRef>,
}

impl StrategySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, strategy: impl TraversalStrategy) -> TraversalResult<()> {
        self.add_ref(StrategyRef::new(strategy))
    }

    /// Adds `strategy`, replacing any strategy of the same name, and
    /// re-sorts. On a cycle the set is left untouched.
    pub fn add_ref(&mut self, strategy: StrategyRef) -> TraversalResult<()> {
        let mut candidates: Vec<StrategyRef> = self
            .strategies
            .iter()
            .filter(|existing| existing.name() != strategy.name())
            .cloned()
            .collect();
        candidates.push(strategy);
        self.strategies = sort(candidates)?;
        debug!(order = ?self.names(), "strategy set sorted");
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.strategies.len();
        self.strategies.retain(|strategy| strategy.name() != name);
        before != self.strategies.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&StrategyRef> {
        self.strategies.iter().find(|strategy| strategy.name() == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|strategy| strategy.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StrategyRef> {
        self.strategies.iter()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Applies each strategy in order to `traversal` and all of its child
    /// traversals before moving on to the next strategy.
    #[instrument(level = "debug", skip_all, fields(strategies = self.strategies.len()))]
    pub fn apply(&self, traversal: &mut Traversal) -> TraversalResult<()> {
        for strategy in &self.strategies {
            debug!(strategy = strategy.name(), category = %strategy.category(), "applying strategy");
            apply_recursive(&**strategy, traversal)?;
        }
        Ok(())
    }
}

fn apply_recursive(strategy: &dyn TraversalStrategy, traversal: &mut Traversal) -> TraversalResult<()> {
    strategy.apply(traversal)?;
    for step in traversal.steps_mut().iter_mut() {
        for child in step.children_mut() {
            apply_recursive(strategy, child)?;
        }
    }
    Ok(())
}

//==================================================
// SECTION: Ordering
//==================================================

/// Kahn's algorithm over category edges plus declared prior/post edges.
/// Ready nodes leave in (category, registration position) order.
fn sort(strategies: Vec<StrategyRef>) -> TraversalResult<Vec<StrategyRef>> {
    let positions: IndexMap<&'static str, usize> = strategies
        .iter()
        .enumerate()
        .map(|(position, strategy)| (strategy.name(), position))
        .collect();

    let count = strategies.len();
    let mut successors: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); count];
    for (a, left) in strategies.iter().enumerate() {
        for (b, right) in strategies.iter().enumerate() {
            if left.category() < right.category() {
                successors[a].insert(b);
            }
        }
        for prior in left.apply_prior() {
            if let Some(&before) = positions.get(prior) {
                successors[before].insert(a);
            }
        }
        for post in left.apply_post() {
            if let Some(&after) = positions.get(post) {
                successors[a].insert(after);
            }
        }
    }

    let mut in_degree = vec![0usize; count];
    for edges in &successors {
        for &target in edges {
            in_degree[target] += 1;
        }
    }

    let rank = |index: usize| -> (StrategyCategory, usize) { (strategies[index].category(), index) };
    let mut ready: BTreeSet<(StrategyCategory, usize)> = (0..count)
        .filter(|&index| in_degree[index] == 0)
        .map(rank)
        .collect();

    let mut order = Vec::with_capacity(count);
    while let Some(next) = ready.pop_first() {
        let index = next.1;
        order.push(index);
        for &target in &successors[index] {
            in_degree[target] -= 1;
            if in_degree[target] == 0 {
                ready.insert(rank(target));
            }
        }
    }

    if order.len() < count {
        let involved = cycle_members(&successors, &in_degree)
            .into_iter()
            .map(|index| strategies[index].name().to_string())
            .collect();
        return Err(TraversalError::StrategyCycle(involved));
    }

    Ok(order.into_iter().map(|index| strategies[index].clone()).collect())
}

/// Nodes Kahn's pass could not release, minus those that merely sit
/// downstream of a cycle: every survivor has both an unresolved predecessor
/// and an unresolved successor.
fn cycle_members(successors: &[BTreeSet<usize>], in_degree: &[usize]) -> BTreeSet<usize> {
    let mut remaining: BTreeSet<usize> = (0..in_degree.len())
        .filter(|&index| in_degree[index] > 0)
        .collect();
    loop {
        let sinks: Vec<usize> = remaining
            .iter()
            .copied()
            .filter(|&index| successors[index].iter().all(|target| !remaining.contains(target)))
            .collect();
        if sinks.is_empty() {
            return remaining;
        }
        for sink in sinks {
            remaining.remove(&sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{LambdaRestrictionStrategy, ReadOnlyStrategy, SubgraphStrategy};
    use crate::traversal::anon;

    struct Named {
        name: &'static str,
        category: StrategyCategory,
        prior: &'static [&'static str],
        post: &'static [&'static str],
    }

    impl TraversalStrategy for Named {
        fn name(&self) -> &'static str {
            self.name
        }

        fn category(&self) -> StrategyCategory {
            self.category
        }

        fn apply_prior(&self) -> &'static [&'static str] {
            self.prior
        }

        fn apply_post(&self) -> &'static [&'static str] {
            self.post
        }

        fn apply(&self, _traversal: &mut Traversal) -> TraversalResult<()> {
            Ok(())
        }
    }

    fn named(name: &'static str, category: StrategyCategory) -> Named {
        Named {
            name,
            category,
            prior: &[],
            post: &[],
        }
    }

    #[test]
    fn categories_order_before_registration() {
        let mut set = StrategySet::new();
        set.add(ReadOnlyStrategy).unwrap();
        set.add(IdentityRemovalStrategy).unwrap();
        set.add(SubgraphStrategy::build().vertices(anon::has_label("person")).create())
            .unwrap();
        assert_eq!(
            set.names(),
            ["SubgraphStrategy", "IdentityRemovalStrategy", "ReadOnlyStrategy"]
        );
    }

    #[test]
    fn apply_prior_wins_over_registration_order() {
        let mut set = StrategySet::new();
        set.add(IncidentToAdjacentStrategy).unwrap();
        set.add(IdentityRemovalStrategy).unwrap();
        assert_eq!(set.names(), ["IdentityRemovalStrategy", "IncidentToAdjacentStrategy"]);
        assert_eq!(set, default_strategies());
    }

    #[test]
    fn ties_keep_registration_order() {
        let mut set = StrategySet::new();
        set.add(LambdaRestrictionStrategy).unwrap();
        set.add(ReadOnlyStrategy).unwrap();
        assert_eq!(set.names(), ["LambdaRestrictionStrategy", "ReadOnlyStrategy"]);
    }

    #[test]
    fn cycle_is_rejected_and_set_unchanged() {
        let mut set = StrategySet::new();
        set.add(Named {
            prior: &["B"],
            ..named("A", StrategyCategory::Optimization)
        })
        .unwrap();
        let err = set
            .add(Named {
                prior: &["A"],
                ..named("B", StrategyCategory::Optimization)
            })
            .unwrap_err();
        assert_eq!(err, TraversalError::StrategyCycle(vec!["A".into(), "B".into()]));
        assert_eq!(set.names(), ["A"]);
    }

    #[test]
    fn cycle_error_leaves_out_downstream_strategies() {
        let mut set = StrategySet::new();
        set.add(ReadOnlyStrategy).unwrap();
        set.add(SubgraphStrategy::build().vertices(anon::has_label("person")).create())
            .unwrap();
        set.add(Named {
            prior: &["B"],
            ..named("A", StrategyCategory::Optimization)
        })
        .unwrap();
        let err = set
            .add(Named {
                prior: &["A"],
                ..named("B", StrategyCategory::Optimization)
            })
            .unwrap_err();
        assert_eq!(err, TraversalError::StrategyCycle(vec!["A".into(), "B".into()]));
        assert_eq!(set.names(), ["SubgraphStrategy", "A", "ReadOnlyStrategy"]);
    }

    #[test]
    fn constraint_against_category_order_is_a_cycle() {
        let mut set = StrategySet::new();
        set.add(named("Early", StrategyCategory::Decoration)).unwrap();
        let err = set
            .add(Named {
                post: &["Early"],
                ..named("Late", StrategyCategory::Verification)
            })
            .unwrap_err();
        assert!(matches!(err, TraversalError::StrategyCycle(_)));
    }

    #[test]
    fn same_name_replaces() {
        let mut set = StrategySet::new();
        set.add(ReadOnlyStrategy).unwrap();
        set.add(ReadOnlyStrategy).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.remove("ReadOnlyStrategy"));
        assert!(!set.remove("ReadOnlyStrategy"));
        assert!(set.is_empty());
    }
}
