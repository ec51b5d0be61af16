//==================================================
// File: strategy/verification.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Policy checks run last
// Objective: Reject mutating and lambda-based traversals when asked to
//==================================================

use crate::error::{TraversalError, TraversalResult};
use crate::step::Step;
use crate::traversal::Traversal;

use super::{StrategyCategory, TraversalStrategy};

fn reject_first<F>(strategy: &str, traversal: &Traversal, offending: F, reason: &str) -> TraversalResult<()>
where
    F: Fn(&Step) -> bool,
{
    match traversal.steps().iter().find(|&step| offending(step)) {
        Some(step) => Err(TraversalError::verification(
            strategy,
            format!("{}() {reason}", step.name()),
        )),
        None => Ok(()),
    }
}

/// Fails any traversal that would write to the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOnlyStrategy;

impl ReadOnlyStrategy {
    pub const NAME: &'static str = "ReadOnlyStrategy";
}

impl TraversalStrategy for ReadOnlyStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn category(&self) -> StrategyCategory {
        StrategyCategory::Verification
    }

    fn apply(&self, traversal: &mut Traversal) -> TraversalResult<()> {
        reject_first(Self::NAME, traversal, Step::is_mutating, "mutates the graph")
    }
}

/// Fails any traversal holding a closure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LambdaRestrictionStrategy;

impl LambdaRestrictionStrategy {
    pub const NAME: &'static str = "LambdaRestrictionStrategy";
}

impl TraversalStrategy for LambdaRestrictionStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn category(&self) -> StrategyCategory {
        StrategyCategory::Verification
    }

    fn apply(&self, traversal: &mut Traversal) -> TraversalResult<()> {
        reject_first(Self::NAME, traversal, Step::uses_lambda, "uses a lambda")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::traversal::anon;
    use crate::traversal::lambda::Lambda;

    #[test]
    fn read_only_rejects_drop() {
        let mut traversal = anon::out().drop();
        let err = ReadOnlyStrategy.apply(&mut traversal).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Verification);
        assert_eq!(err.to_string(), "ReadOnlyStrategy rejected traversal: drop() mutates the graph");
        assert!(ReadOnlyStrategy.apply(&mut anon::out().count()).is_ok());
    }

    #[test]
    fn lambda_restriction_rejects_closures() {
        let mut traversal = anon::identity().choose_lambda(
            Lambda::predicate("any", |_, _| true),
            anon::identity(),
            anon::identity(),
        );
        assert!(LambdaRestrictionStrategy.apply(&mut traversal).is_err());
        let mut plain = anon::identity().choose_if(anon::out(), anon::identity(), anon::identity());
        assert!(LambdaRestrictionStrategy.apply(&mut plain).is_ok());
    }
}
