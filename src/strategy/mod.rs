//! Traversal strategies: rewrite passes run over a step pipeline before it
//! executes.
//!
//! A strategy belongs to one [`StrategyCategory`] and may name other
//! strategies that must run before (`apply_prior`) or after (`apply_post`)
//! it. [`StrategySet`] keeps its members in an order honoring both the
//! category ranking and those declarations.

pub mod decoration;
pub mod optimization;
pub mod set;
pub mod verification;

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use crate::bytecode::Argument;
use crate::error::TraversalResult;
use crate::traversal::Traversal;

pub use decoration::{Computer, SubgraphStrategy, SubgraphStrategyBuilder, VertexProgramStrategy};
pub use optimization::{IdentityRemovalStrategy, IncidentToAdjacentStrategy};
pub use set::{StrategySet, default_strategies};
pub use verification::{LambdaRestrictionStrategy, ReadOnlyStrategy};

/// Strategy categories in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StrategyCategory {
    Decoration,
    Optimization,
    Verification,
}

impl fmt::Display for StrategyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyCategory::Decoration => "decoration",
            StrategyCategory::Optimization => "optimization",
            StrategyCategory::Verification => "verification",
        };
        f.write_str(name)
    }
}

/// Key-value view of a strategy's settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Configuration(BTreeMap<String, Argument>);

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Argument>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Argument> {
        self.0.get(key)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Argument::resolve).and_then(|v| v.as_integer())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Argument)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A rewrite pass over a traversal's steps.
///
/// `apply` sees one traversal at a time; [`StrategySet::apply`] takes care of
/// visiting child traversals. Only verification strategies should fail.
pub trait TraversalStrategy: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn category(&self) -> StrategyCategory;

    /// Strategies that must run before this one.
    fn apply_prior(&self) -> &'static [&'static str] {
        &[]
    }

    /// Strategies that must run after this one.
    fn apply_post(&self) -> &'static [&'static str] {
        &[]
    }

    fn configuration(&self) -> Configuration {
        Configuration::default()
    }

    fn apply(&self, traversal: &mut Traversal) -> TraversalResult<()>;
}

/// Shared handle to a strategy instance. Two handles are equal when they
/// name the same strategy with the same configuration.
#[derive(Clone)]
pub struct StrategyRef(Arc<dyn TraversalStrategy>);

impl StrategyRef {
    pub fn new(strategy: impl TraversalStrategy) -> Self {
        Self(Arc::new(strategy))
    }
}

impl Deref for StrategyRef {
    type Target = dyn TraversalStrategy;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl PartialEq for StrategyRef {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name() && self.configuration() == other.configuration()
    }
}

impl Eq for StrategyRef {}

impl Hash for StrategyRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
        self.configuration().hash(state);
    }
}

impl fmt::Debug for StrategyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRef")
            .field("name", &self.name())
            .field("category", &self.category())
            .field("configuration", &self.configuration())
            .finish()
    }
}

impl fmt::Display for StrategyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        let configuration = self.configuration();
        if configuration.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (index, (key, value)) in configuration.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traversal::anon;

    #[test]
    fn categories_rank_decoration_first() {
        assert!(StrategyCategory::Decoration < StrategyCategory::Optimization);
        assert!(StrategyCategory::Optimization < StrategyCategory::Verification);
    }

    #[test]
    fn refs_compare_by_name_and_configuration() {
        assert_eq!(StrategyRef::new(ReadOnlyStrategy), StrategyRef::new(ReadOnlyStrategy));
        assert_ne!(
            StrategyRef::new(VertexProgramStrategy::new(Some(2))),
            StrategyRef::new(VertexProgramStrategy::new(Some(3)))
        );
        let knows = SubgraphStrategy::build().edges(anon::has_label("knows")).create();
        assert_eq!(
            StrategyRef::new(knows.clone()).to_string(),
            "SubgraphStrategy(edges=[[], [hasLabel(\"knows\")]])"
        );
        assert_eq!(StrategyRef::new(ReadOnlyStrategy).to_string(), "ReadOnlyStrategy");
    }

    #[test]
    fn configuration_reads_integers_through_bindings() {
        let configuration = Configuration::new()
            .with("workers", crate::bytecode::Binding::new("w", 8_i64));
        assert_eq!(configuration.get_int("workers"), Some(8));
        assert_eq!(configuration.get_int("missing"), None);
    }
}
