//==================================================
// File: traversal/dsl.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Fluent step builders
// Objective: Append a step and record its instruction in one call
//==================================================

use crate::bytecode::{Argument, Binding};
use crate::error::{TraversalError, TraversalResult};
use crate::step::{
    ChooseStep, FilterStep, GroupCountStep, Modulator, OptionToken, OrderStep, ProjectStep,
    RepeatStep, Step,
};
use crate::structure::{Direction, Value};
use crate::traversal::Traversal;
use crate::traversal::lambda::Lambda;
use crate::traversal::token::{Column, Order};

//==================================================
// SECTION: Name arguments
//==================================================

#[derive(Debug, Clone, PartialEq)]
enum NameArg {
    Literal(String),
    Bound(Binding),
}

/// Labels or property keys passed to a step, each either a literal or a
/// [`Binding`]. Bound names are recorded as bindings and resolved to their
/// current value for execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Names(Vec<NameArg>);

impl Names {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn push(mut self, name: impl Into<Names>) -> Self {
        self.0.extend(name.into().0);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn resolved(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|name| match name {
                NameArg::Literal(name) => name.clone(),
                NameArg::Bound(binding) => match binding.value().resolve() {
                    Some(Value::String(value)) => value.clone(),
                    Some(other) => other.to_string(),
                    None => binding.value().to_string(),
                },
            })
            .collect()
    }

    pub(crate) fn arguments(&self) -> Vec<Argument> {
        self.0
            .iter()
            .map(|name| match name {
                NameArg::Literal(name) => Argument::from(name.as_str()),
                NameArg::Bound(binding) => Argument::Binding(binding.clone()),
            })
            .collect()
    }
}

impl From<&str> for Names {
    fn from(value: &str) -> Self {
        Names(vec![NameArg::Literal(value.to_string())])
    }
}

impl From<String> for Names {
    fn from(value: String) -> Self {
        Names(vec![NameArg::Literal(value)])
    }
}

impl<const N: usize> From<[&str; N]> for Names {
    fn from(values: [&str; N]) -> Self {
        Names(
            values
                .into_iter()
                .map(|value| NameArg::Literal(value.to_string()))
                .collect(),
        )
    }
}

impl From<Vec<String>> for Names {
    fn from(values: Vec<String>) -> Self {
        Names(values.into_iter().map(NameArg::Literal).collect())
    }
}

impl From<Binding> for Names {
    fn from(value: Binding) -> Self {
        Names(vec![NameArg::Bound(value)])
    }
}

//==================================================
// SECTION: Navigation
//==================================================

impl Traversal {
    fn adjacent(mut self, operator: &str, direction: Direction, labels: Names) -> Self {
        let step = Step::Adjacent {
            direction,
            labels: labels.resolved(),
        };
        self.push(step, operator, labels.arguments());
        self
    }

    fn incident(mut self, operator: &str, direction: Direction, labels: Names) -> Self {
        let step = Step::Incident {
            direction,
            labels: labels.resolved(),
        };
        self.push(step, operator, labels.arguments());
        self
    }

    /// `V(ids...)` in the middle of a pipeline.
    pub fn v(mut self, ids: Vec<Value>) -> Self {
        let arguments = ids.iter().cloned().map(Argument::Literal).collect();
        self.push(Step::Start(ids), "V", arguments);
        self
    }

    pub fn out(self) -> Self {
        self.adjacent("out", Direction::Out, Names::none())
    }

    pub fn out_labeled(self, labels: impl Into<Names>) -> Self {
        self.adjacent("out", Direction::Out, labels.into())
    }

    pub fn in_(self) -> Self {
        self.adjacent("in", Direction::In, Names::none())
    }

    pub fn in_labeled(self, labels: impl Into<Names>) -> Self {
        self.adjacent("in", Direction::In, labels.into())
    }

    pub fn both(self) -> Self {
        self.adjacent("both", Direction::Both, Names::none())
    }

    pub fn both_labeled(self, labels: impl Into<Names>) -> Self {
        self.adjacent("both", Direction::Both, labels.into())
    }

    pub fn out_e(self) -> Self {
        self.incident("outE", Direction::Out, Names::none())
    }

    pub fn out_e_labeled(self, labels: impl Into<Names>) -> Self {
        self.incident("outE", Direction::Out, labels.into())
    }

    pub fn in_e(self) -> Self {
        self.incident("inE", Direction::In, Names::none())
    }

    pub fn in_e_labeled(self, labels: impl Into<Names>) -> Self {
        self.incident("inE", Direction::In, labels.into())
    }

    pub fn out_v(mut self) -> Self {
        self.push(Step::EdgeVertex(Direction::Out), "outV", Vec::new());
        self
    }

    pub fn in_v(mut self) -> Self {
        self.push(Step::EdgeVertex(Direction::In), "inV", Vec::new());
        self
    }
}

//==================================================
// SECTION: Filters and maps
//==================================================

impl Traversal {
    pub fn has_label(mut self, labels: impl Into<Names>) -> Self {
        let labels = labels.into();
        self.push(Step::HasLabel(labels.resolved()), "hasLabel", labels.arguments());
        self
    }

    pub fn has(mut self, key: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        let arguments = vec![Argument::from(key), Argument::Literal(value.clone())];
        self.push(
            Step::Has {
                key: key.to_string(),
                value,
            },
            "has",
            arguments,
        );
        self
    }

    pub fn values(mut self, keys: impl Into<Names>) -> Self {
        let keys = keys.into();
        self.push(Step::Values(keys.resolved()), "values", keys.arguments());
        self
    }

    pub fn value_map(mut self) -> Self {
        self.push(Step::ValueMap, "valueMap", Vec::new());
        self
    }

    pub fn label(mut self) -> Self {
        self.push(Step::Label, "label", Vec::new());
        self
    }

    pub fn id(mut self) -> Self {
        self.push(Step::Id, "id", Vec::new());
        self
    }

    pub fn identity(mut self) -> Self {
        self.push(Step::Identity, "identity", Vec::new());
        self
    }

    pub fn count(mut self) -> Self {
        self.push(Step::Count, "count", Vec::new());
        self
    }

    pub fn is(mut self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.push(Step::Is(value.clone()), "is", vec![Argument::Literal(value)]);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.push(Step::Limit(limit), "limit", vec![Argument::from(Value::from(limit))]);
        self
    }

    pub fn unfold(mut self) -> Self {
        self.push(Step::Unfold, "unfold", Vec::new());
        self
    }

    pub fn select(mut self, column: Column) -> Self {
        self.push(Step::Select(column), "select", vec![column.into()]);
        self
    }

    pub fn filter(mut self, traversal: Traversal) -> Self {
        let argument = Argument::Traversal(traversal.bytecode().clone());
        self.push(Step::Filter(FilterStep::new(traversal)), "filter", vec![argument]);
        self
    }

    pub fn and(mut self, traversals: Vec<Traversal>) -> Self {
        let arguments = traversals
            .iter()
            .map(|t| Argument::Traversal(t.bytecode().clone()))
            .collect();
        self.push(Step::And(traversals), "and", arguments);
        self
    }
}

//==================================================
// SECTION: Branching and modulation
//==================================================

impl Traversal {
    pub fn repeat(mut self, traversal: Traversal) -> Self {
        let argument = Argument::Traversal(traversal.bytecode().clone());
        self.push(Step::Repeat(RepeatStep::new(traversal)), "repeat", vec![argument]);
        self
    }

    /// Sets the loop count of the preceding `repeat()`.
    pub fn times(mut self, times: usize) -> TraversalResult<Self> {
        match self.last_step_mut("times")? {
            Step::Repeat(repeat) => repeat.set_times(times),
            other => {
                return Err(TraversalError::InvalidOption(format!(
                    "times() must follow repeat(), not {}()",
                    other.name()
                )));
            }
        }
        self.record("times", vec![Argument::from(Value::from(times))]);
        Ok(self)
    }

    /// `choose(predicate, true_branch, false_branch)` with a closure predicate.
    pub fn choose_lambda(mut self, predicate: Lambda, true_branch: Traversal, false_branch: Traversal) -> Self {
        let arguments = vec![
            Argument::Lambda(predicate.clone()),
            Argument::Traversal(true_branch.bytecode().clone()),
            Argument::Traversal(false_branch.bytecode().clone()),
        ];
        let step = ChooseStep::with_lambda(predicate, true_branch, false_branch);
        self.push(Step::Choose(step), "choose", arguments);
        self
    }

    /// `choose(predicate, true_branch, false_branch)` where the predicate is
    /// a traversal that holds when it yields anything.
    pub fn choose_if(mut self, predicate: Traversal, true_branch: Traversal, false_branch: Traversal) -> Self {
        let arguments = vec![
            Argument::Traversal(predicate.bytecode().clone()),
            Argument::Traversal(true_branch.bytecode().clone()),
            Argument::Traversal(false_branch.bytecode().clone()),
        ];
        let step = ChooseStep::with_predicate(predicate, true_branch, false_branch);
        self.push(Step::Choose(step), "choose", arguments);
        self
    }

    /// `choose(selector)` followed by `option(token, traversal)` clauses.
    pub fn choose(mut self, selector: Traversal) -> Self {
        let argument = Argument::Traversal(selector.bytecode().clone());
        self.push(Step::Choose(ChooseStep::with_selector(selector)), "choose", vec![argument]);
        self
    }

    pub fn option(mut self, token: impl Into<OptionToken>, traversal: Traversal) -> TraversalResult<Self> {
        let token = token.into();
        let arguments = vec![token.to_argument(), Argument::Traversal(traversal.bytecode().clone())];
        match self.last_step_mut("option")? {
            Step::Choose(choose) => choose.add_option(token, traversal)?,
            other => {
                return Err(TraversalError::InvalidOption(format!(
                    "option() must follow choose(), not {}()",
                    other.name()
                )));
            }
        }
        self.record("option", arguments);
        Ok(self)
    }

    pub fn group_count(mut self) -> Self {
        self.push(Step::GroupCount(GroupCountStep::new()), "groupCount", Vec::new());
        self
    }

    pub fn project(mut self, keys: impl Into<Names>) -> Self {
        let keys = keys.into();
        self.push(Step::Project(ProjectStep::new(keys.resolved())), "project", keys.arguments());
        self
    }

    pub fn order(mut self) -> Self {
        self.push(Step::Order(OrderStep::new()), "order", Vec::new());
        self
    }

    /// Adds a `by(traversal)` modulator to the preceding step.
    pub fn by(mut self, traversal: Traversal) -> TraversalResult<Self> {
        let argument = Argument::Traversal(traversal.bytecode().clone());
        self.last_step_mut("by")?
            .modulate_by(Modulator::Traversal(traversal))?;
        self.record("by", vec![argument]);
        Ok(self)
    }

    /// Adds a `by(order)` modulator to the preceding step.
    pub fn by_order(mut self, order: Order) -> TraversalResult<Self> {
        self.last_step_mut("by")?.modulate_by(Modulator::Order(order))?;
        self.record("by", vec![order.into()]);
        Ok(self)
    }
}

//==================================================
// SECTION: Mutation
//==================================================

impl Traversal {
    pub fn add_v(mut self, label: &str) -> Self {
        self.push(Step::AddV(label.to_string()), "addV", vec![label.into()]);
        self
    }

    pub fn property(mut self, key: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        let arguments = vec![Argument::from(key), Argument::Literal(value.clone())];
        self.push(
            Step::Property {
                key: key.to_string(),
                value,
            },
            "property",
            arguments,
        );
        self
    }

    pub fn drop(mut self) -> Self {
        self.push(Step::Drop, "drop", Vec::new());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traversal::anon;

    #[test]
    fn bound_labels_record_binding_and_resolve_value() {
        let traversal = anon::out_labeled(Binding::new("a", "created"));
        let instruction = &traversal.bytecode().step_instructions()[0];
        assert_eq!(instruction.arguments(), [Argument::Binding(Binding::new("a", "created"))]);
        match &traversal.steps()[0] {
            Step::Adjacent { labels, .. } => assert_eq!(labels, &["created".to_string()]),
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn modulators_need_a_modulatable_step() {
        let err = anon::out().by(anon::identity()).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::Configuration);
        assert!(Traversal::start().times(2).is_err());
        assert!(anon::out().option(1, anon::identity()).is_err());
    }

    #[test]
    fn times_and_by_are_recorded_without_new_steps() {
        let traversal = anon::out()
            .repeat(anon::out())
            .times(2)
            .unwrap()
            .group_count()
            .by(anon::label())
            .unwrap();
        assert_eq!(traversal.steps().len(), 3);
        let operators: Vec<_> = traversal
            .bytecode()
            .step_instructions()
            .iter()
            .map(|i| i.operator())
            .collect();
        assert_eq!(operators, ["out", "repeat", "times", "groupCount", "by"]);
    }
}
