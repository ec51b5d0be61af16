//==================================================
// File: step/choose.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Conditional branch step
// Objective: Route every input through exactly one sub-traversal chosen by a
//            predicate or by the token a selector traversal computes
//==================================================

use tracing::{debug, trace};

use crate::bytecode::Argument;
use crate::error::{TraversalError, TraversalResult};
use crate::structure::{Graph, Value};
use crate::traversal::Traversal;
use crate::traversal::lambda::Lambda;
use crate::traversal::token::{Pick, Token};

//==================================================
// SECTION: Data Model
//==================================================

/// How a `choose` step decides where an input goes.
#[derive(Debug, Clone)]
pub enum Selector {
    /// Closure predicate; true and false branches.
    Lambda(Lambda),
    /// Sub-traversal predicate: true when it yields at least one result.
    Predicate(Traversal),
    /// Sub-traversal producing exactly one token per input.
    Value(Traversal),
}

impl Selector {
    fn is_boolean(&self) -> bool {
        !matches!(self, Selector::Value(_))
    }
}

/// Token an `option(...)` is registered under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OptionToken {
    Value(Value),
    Pick(Pick),
}

impl OptionToken {
    pub fn to_argument(&self) -> Argument {
        match self {
            OptionToken::Value(value) => Argument::Literal(value.clone()),
            OptionToken::Pick(pick) => Argument::Token(Token::Pick(*pick)),
        }
    }
}

impl From<Value> for OptionToken {
    fn from(value: Value) -> Self {
        OptionToken::Value(value)
    }
}

impl From<i64> for OptionToken {
    fn from(value: i64) -> Self {
        OptionToken::Value(Value::Integer(value))
    }
}

impl From<i32> for OptionToken {
    fn from(value: i32) -> Self {
        OptionToken::Value(Value::Integer(value.into()))
    }
}

impl From<&str> for OptionToken {
    fn from(value: &str) -> Self {
        OptionToken::Value(value.into())
    }
}

impl From<bool> for OptionToken {
    fn from(value: bool) -> Self {
        OptionToken::Value(Value::Boolean(value))
    }
}

impl From<Pick> for OptionToken {
    fn from(value: Pick) -> Self {
        OptionToken::Pick(value)
    }
}

/// Per-item evaluation phase. The step is back in `Unevaluated` between
/// items; nothing about routing carries over from one input to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BranchState {
    #[default]
    Unevaluated,
    Selecting,
    Routed,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Option(usize),
    Default,
    Filtered,
}

#[derive(Debug, Clone)]
pub struct ChooseStep {
    selector: Selector,
    options: Vec<(OptionToken, Traversal)>,
    default: Option<Traversal>,
    state: BranchState,
}

//==================================================
// SECTION: Construction
//==================================================

impl ChooseStep {
    pub fn with_lambda(predicate: Lambda, true_branch: Traversal, false_branch: Traversal) -> Self {
        Self::boolean(Selector::Lambda(predicate), true_branch, false_branch)
    }

    pub fn with_predicate(predicate: Traversal, true_branch: Traversal, false_branch: Traversal) -> Self {
        Self::boolean(Selector::Predicate(predicate), true_branch, false_branch)
    }

    pub fn with_selector(selector: Traversal) -> Self {
        Self {
            selector: Selector::Value(selector),
            options: Vec::new(),
            default: None,
            state: BranchState::Unevaluated,
        }
    }

    fn boolean(selector: Selector, true_branch: Traversal, false_branch: Traversal) -> Self {
        Self {
            selector,
            options: vec![
                (OptionToken::Value(Value::Boolean(true)), true_branch),
                (OptionToken::Value(Value::Boolean(false)), false_branch),
            ],
            default: None,
            state: BranchState::Unevaluated,
        }
    }

    /// Registers a branch for `token`. Predicate selectors carry fixed
    /// true/false branches and reject further options; at most one
    /// `Pick::None` fallback is allowed. Duplicate value tokens are kept and
    /// the earliest registration wins when routing.
    pub fn add_option(&mut self, token: OptionToken, traversal: Traversal) -> TraversalResult<()> {
        if self.selector.is_boolean() {
            return Err(TraversalError::InvalidOption(
                "choose() with a predicate has fixed true/false branches".into(),
            ));
        }
        match token {
            OptionToken::Pick(Pick::None) => {
                if self.default.is_some() {
                    return Err(TraversalError::InvalidOption(
                        "choose() already has a none option".into(),
                    ));
                }
                self.default = Some(traversal);
            }
            token => {
                if self.options.iter().any(|(existing, _)| *existing == token) {
                    debug!(?token, "duplicate choose option; earliest registration wins");
                }
                self.options.push((token, traversal));
            }
        }
        Ok(())
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn options(&self) -> &[(OptionToken, Traversal)] {
        &self.options
    }

    pub fn default_branch(&self) -> Option<&Traversal> {
        self.default.as_ref()
    }

    pub fn state(&self) -> BranchState {
        self.state
    }

    pub(crate) fn children(&self) -> Vec<&Traversal> {
        let selector = match &self.selector {
            Selector::Predicate(traversal) | Selector::Value(traversal) => Some(traversal),
            Selector::Lambda(_) => None,
        };
        selector
            .into_iter()
            .chain(self.options.iter().map(|(_, t)| t))
            .chain(self.default.iter())
            .collect()
    }

    pub(crate) fn children_mut(&mut self) -> Vec<&mut Traversal> {
        let selector = match &mut self.selector {
            Selector::Predicate(traversal) | Selector::Value(traversal) => Some(traversal),
            Selector::Lambda(_) => None,
        };
        selector
            .into_iter()
            .chain(self.options.iter_mut().map(|(_, t)| t))
            .chain(self.default.iter_mut())
            .collect()
    }
}

//==================================================
// SECTION: Evaluation
//==================================================

impl ChooseStep {
    /// Routes one pulled input and runs its branch. A failure ends this
    /// input's evaluation only; the step is ready for the next one either way.
    pub(crate) fn process(&mut self, graph: &Graph, item: Value) -> TraversalResult<Vec<Value>> {
        let produced = self.evaluate(graph, item);
        self.state = BranchState::Unevaluated;
        produced
    }

    fn evaluate(&mut self, graph: &Graph, item: Value) -> TraversalResult<Vec<Value>> {
        self.state = BranchState::Selecting;
        let route = self.select(graph, &item)?;
        self.state = BranchState::Routed;
        trace!(?route, input = %item, "choose routed");
        let produced = match route {
            Route::Option(index) => self.options[index].1.apply_to(graph, item)?,
            Route::Default => match self.default.as_mut() {
                Some(traversal) => traversal.apply_to(graph, item)?,
                None => Vec::new(),
            },
            Route::Filtered => Vec::new(),
        };
        self.state = BranchState::Done;
        Ok(produced)
    }

    fn select(&mut self, graph: &Graph, item: &Value) -> TraversalResult<Route> {
        let token = match &mut self.selector {
            Selector::Lambda(lambda) => Value::Boolean(lambda.test(graph, item)),
            Selector::Predicate(traversal) => Value::Boolean(traversal.test(graph, item)?),
            Selector::Value(traversal) => {
                let mut values = traversal.apply_to(graph, item.clone())?;
                if values.len() != 1 {
                    return Err(TraversalError::Selection { count: values.len() });
                }
                values.remove(0)
            }
        };
        let matched = self
            .options
            .iter()
            .position(|(option, _)| matches!(option, OptionToken::Value(value) if *value == token));
        Ok(match matched {
            Some(index) => Route::Option(index),
            None if self.default.is_some() => Route::Default,
            None => Route::Filtered,
        })
    }
}
