//==================================================
// File: traversal/translator.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Bytecode replay
// Objective: Rebuild an executable traversal from recorded instructions by
//            driving the same builder calls that produced them
//==================================================

use tracing::trace;

use crate::bytecode::{Argument, Bytecode, Instruction};
use crate::error::{TraversalError, TraversalResult};
use crate::step::OptionToken;
use crate::strategy::StrategyRef;
use crate::structure::Value;
use crate::traversal::token::Token;
use crate::traversal::{GraphTraversalSource, Names, Traversal};

/// Replays bytecode against a traversal source.
///
/// Label and key bindings are kept in the rebuilt bytecode; any other
/// binding is replayed by its current value.
#[derive(Debug, Clone)]
pub struct Translator {
    source: GraphTraversalSource,
}

impl Translator {
    pub fn new(source: GraphTraversalSource) -> Self {
        Self { source }
    }

    pub fn translate(&self, bytecode: &Bytecode) -> TraversalResult<Traversal> {
        let mut source = self.source.clone();
        for instruction in bytecode.source_instructions() {
            source = apply_source(source, instruction)?;
        }
        let mut traversal = source.spawn();
        for instruction in bytecode.step_instructions() {
            traversal = self.apply_step(traversal, instruction)?;
        }
        Ok(traversal)
    }

    fn anonymous(&self, bytecode: &Bytecode) -> TraversalResult<Traversal> {
        if let Some(instruction) = bytecode.source_instructions().first() {
            return Err(TraversalError::translation(
                instruction.operator(),
                "child traversals cannot carry source instructions",
            ));
        }
        let mut traversal = Traversal::start();
        for instruction in bytecode.step_instructions() {
            traversal = self.apply_step(traversal, instruction)?;
        }
        Ok(traversal)
    }

    fn apply_step(&self, traversal: Traversal, instruction: &Instruction) -> TraversalResult<Traversal> {
        trace!(%instruction, "replaying step");
        let args = Args { instruction };
        Ok(match instruction.operator() {
            "V" => traversal.v(args.literals()?),
            "out" => traversal.out_labeled(args.names()?),
            "in" => traversal.in_labeled(args.names()?),
            "both" => traversal.both_labeled(args.names()?),
            "outE" => traversal.out_e_labeled(args.names()?),
            "inE" => traversal.in_e_labeled(args.names()?),
            "outV" => traversal.out_v(),
            "inV" => traversal.in_v(),
            "hasLabel" => traversal.has_label(args.names()?),
            "has" => traversal.has(&args.string(0)?, args.literal(1)?),
            "values" => traversal.values(args.names()?),
            "valueMap" => traversal.value_map(),
            "label" => traversal.label(),
            "id" => traversal.id(),
            "identity" => traversal.identity(),
            "count" => traversal.count(),
            "is" => traversal.is(args.literal(0)?),
            "limit" => traversal.limit(args.count(0)?),
            "unfold" => traversal.unfold(),
            "select" => match args.token(0)? {
                Token::Column(column) => traversal.select(column),
                _ => return Err(args.invalid("expected keys or values")),
            },
            "filter" => traversal.filter(self.anonymous(args.bytecode(0)?)?),
            "and" => {
                let children = (0..instruction.arguments().len())
                    .map(|index| self.anonymous(args.bytecode(index)?))
                    .collect::<TraversalResult<Vec<_>>>()?;
                traversal.and(children)
            }
            "repeat" => traversal.repeat(self.anonymous(args.bytecode(0)?)?),
            "times" => traversal.times(args.count(0)?)?,
            "choose" => match instruction.arguments().len() {
                1 => traversal.choose(self.anonymous(args.bytecode(0)?)?),
                3 => traversal.choose_if(
                    self.anonymous(args.bytecode(0)?)?,
                    self.anonymous(args.bytecode(1)?)?,
                    self.anonymous(args.bytecode(2)?)?,
                ),
                _ => return Err(args.invalid("expected one selector or a predicate and two branches")),
            },
            "option" => {
                let token = match args.get(0)? {
                    Argument::Token(Token::Pick(pick)) => OptionToken::Pick(*pick),
                    other => match other.resolve() {
                        Some(value) => OptionToken::Value(value.clone()),
                        None => return Err(args.invalid("expected an option token")),
                    },
                };
                traversal.option(token, self.anonymous(args.bytecode(1)?)?)?
            }
            "groupCount" => traversal.group_count(),
            "project" => traversal.project(args.names()?),
            "order" => traversal.order(),
            "by" => match args.get(0)? {
                Argument::Token(Token::Order(order)) => traversal.by_order(*order)?,
                _ => traversal.by(self.anonymous(args.bytecode(0)?)?)?,
            },
            "addV" => traversal.add_v(&args.string(0)?),
            "property" => traversal.property(&args.string(0)?, args.literal(1)?),
            "drop" => traversal.drop(),
            other => return Err(TraversalError::translation(other, "unknown step")),
        })
    }
}

fn apply_source(source: GraphTraversalSource, instruction: &Instruction) -> TraversalResult<GraphTraversalSource> {
    let args = Args { instruction };
    match instruction.operator() {
        "withStrategies" => {
            let strategies: Vec<StrategyRef> = instruction
                .arguments()
                .iter()
                .map(|argument| match argument {
                    Argument::Strategy(strategy) => Ok(strategy.clone()),
                    _ => Err(args.invalid("expected a strategy")),
                })
                .collect::<TraversalResult<_>>()?;
            strategies
                .into_iter()
                .try_fold(source, |source, strategy| source.with_strategy_ref(strategy))
        }
        "withoutStrategies" => {
            let names = (0..instruction.arguments().len())
                .map(|index| args.string(index))
                .collect::<TraversalResult<Vec<_>>>()?;
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            Ok(source.without_strategies(&names))
        }
        other => Err(TraversalError::translation(other, "unknown source instruction")),
    }
}

//==================================================
// SECTION: Argument access
//==================================================

struct Args<'a> {
    instruction: &'a Instruction,
}

impl<'a> Args<'a> {
    fn invalid(&self, reason: &str) -> TraversalError {
        TraversalError::translation(self.instruction.operator(), reason)
    }

    fn get(&self, index: usize) -> TraversalResult<&'a Argument> {
        let argument = self
            .instruction
            .arguments()
            .get(index)
            .ok_or_else(|| self.invalid(&format!("missing argument {index}")))?;
        if let Argument::Lambda(lambda) = argument {
            return Err(self.invalid(&format!("{lambda} cannot be replayed")));
        }
        Ok(argument)
    }

    fn literal(&self, index: usize) -> TraversalResult<Value> {
        self.get(index)?
            .resolve()
            .cloned()
            .ok_or_else(|| self.invalid(&format!("argument {index} is not a literal")))
    }

    fn literals(&self) -> TraversalResult<Vec<Value>> {
        (0..self.instruction.arguments().len())
            .map(|index| self.literal(index))
            .collect()
    }

    fn string(&self, index: usize) -> TraversalResult<String> {
        match self.literal(index)? {
            Value::String(value) => Ok(value),
            other => Err(self.invalid(&format!("expected a string, found {}", other.type_name()))),
        }
    }

    fn count(&self, index: usize) -> TraversalResult<usize> {
        self.literal(index)?
            .as_integer()
            .and_then(|value| usize::try_from(value).ok())
            .ok_or_else(|| self.invalid("expected a non-negative integer"))
    }

    fn token(&self, index: usize) -> TraversalResult<Token> {
        match self.get(index)? {
            Argument::Token(token) => Ok(*token),
            _ => Err(self.invalid("expected a token")),
        }
    }

    fn bytecode(&self, index: usize) -> TraversalResult<&'a Bytecode> {
        self.get(index)?
            .as_bytecode()
            .ok_or_else(|| self.invalid(&format!("argument {index} is not a traversal")))
    }

    fn names(&self) -> TraversalResult<Names> {
        self.instruction
            .arguments()
            .iter()
            .try_fold(Names::none(), |names, argument| match argument {
                Argument::Binding(binding) => Ok(names.push(binding.clone())),
                Argument::Literal(Value::String(name)) => Ok(names.push(name.clone())),
                _ => Err(self.invalid("expected a label or key")),
            })
    }
}
