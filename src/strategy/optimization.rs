//==================================================
// File: strategy/optimization.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Pipeline-shrinking rewrites
// Objective: Drop no-op steps and fuse edge walks into adjacency steps
//==================================================

use crate::error::TraversalResult;
use crate::step::Step;
use crate::structure::Direction;
use crate::traversal::Traversal;

use super::{StrategyCategory, TraversalStrategy};

/// Removes `identity()` steps. A pipeline that is only one step long is
/// left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityRemovalStrategy;

impl IdentityRemovalStrategy {
    pub const NAME: &'static str = "IdentityRemovalStrategy";
}

impl TraversalStrategy for IdentityRemovalStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn category(&self) -> StrategyCategory {
        StrategyCategory::Optimization
    }

    fn apply(&self, traversal: &mut Traversal) -> TraversalResult<()> {
        let steps = traversal.steps_mut();
        if steps.len() > 1 {
            steps.retain(|step| !matches!(step, Step::Identity));
        }
        Ok(())
    }
}

/// `outE().inV()` becomes `out()` and `inE().outV()` becomes `in()`, keeping
/// the edge labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IncidentToAdjacentStrategy;

impl IncidentToAdjacentStrategy {
    pub const NAME: &'static str = "IncidentToAdjacentStrategy";
}

impl TraversalStrategy for IncidentToAdjacentStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn category(&self) -> StrategyCategory {
        StrategyCategory::Optimization
    }

    fn apply_prior(&self) -> &'static [&'static str] {
        &[IdentityRemovalStrategy::NAME]
    }

    fn apply(&self, traversal: &mut Traversal) -> TraversalResult<()> {
        let original = std::mem::take(traversal.steps_mut());
        let mut rewritten: Vec<Step> = Vec::with_capacity(original.len());
        for step in original {
            let fused = match (rewritten.last(), &step) {
                (Some(Step::Incident { direction, labels }), Step::EdgeVertex(target))
                    if *direction != Direction::Both && *target == direction.opposite() =>
                {
                    Some(Step::Adjacent {
                        direction: *direction,
                        labels: labels.clone(),
                    })
                }
                _ => None,
            };
            match fused {
                Some(adjacent) => {
                    rewritten.pop();
                    rewritten.push(adjacent);
                }
                None => rewritten.push(step),
            }
        }
        *traversal.steps_mut() = rewritten;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traversal::anon;

    fn names(traversal: &Traversal) -> Vec<&'static str> {
        traversal.steps().iter().map(Step::name).collect()
    }

    #[test]
    fn identity_removed_only_from_longer_pipelines() {
        let mut single = anon::identity();
        IdentityRemovalStrategy.apply(&mut single).unwrap();
        assert_eq!(names(&single), ["identity"]);

        let mut longer = anon::out().identity().count();
        IdentityRemovalStrategy.apply(&mut longer).unwrap();
        assert_eq!(names(&longer), ["out", "count"]);
    }

    #[test]
    fn incident_pairs_fuse_into_adjacent() {
        let mut traversal = anon::out_e_labeled("knows").in_v().in_e().out_v().out_e().out_v();
        IncidentToAdjacentStrategy.apply(&mut traversal).unwrap();
        assert_eq!(names(&traversal), ["out", "in", "outE", "outV"]);
        match &traversal.steps()[0] {
            Step::Adjacent { labels, .. } => assert_eq!(labels, &["knows".to_string()]),
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn bytecode_is_not_rewritten() {
        let mut traversal = anon::out_e().in_v();
        let before = traversal.bytecode().clone();
        IncidentToAdjacentStrategy.apply(&mut traversal).unwrap();
        assert_eq!(traversal.bytecode(), &before);
        assert_eq!(traversal.steps().len(), 1);
    }
}
