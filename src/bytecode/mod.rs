//! Language-agnostic record of a traversal.
//!
//! A [`Bytecode`] holds two append-only instruction logs: *source*
//! instructions that configure the execution context (`withStrategies`,
//! `withoutStrategies`) and *step* instructions that describe the pipeline
//! (`V`, `out`, `choose`, ...). It is a pure value type: equality and hashing
//! are structural and `clone` is deep, which makes it usable as a cache key
//! and as the unit handed to a serializer or to [`Translator`] for replay.
//!
//! [`Translator`]: crate::traversal::translator::Translator

pub mod binding;
pub mod instruction;

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

pub use binding::Binding;
pub use instruction::{Argument, Instruction};

const SOURCE_SEED: u64 = 0x736f_7572_6365;
const STEP_SEED: u64 = 0x7374_6570;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bytecode {
    source_instructions: Vec<Instruction>,
    step_instructions: Vec<Instruction>,
}

impl Bytecode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(&mut self, operator: impl Into<String>, arguments: Vec<Argument>) {
        self.source_instructions
            .push(Instruction::new(operator, arguments));
    }

    pub fn add_step(&mut self, operator: impl Into<String>, arguments: Vec<Argument>) {
        self.step_instructions
            .push(Instruction::new(operator, arguments));
    }

    pub fn source_instructions(&self) -> &[Instruction] {
        &self.source_instructions
    }

    pub fn step_instructions(&self) -> &[Instruction] {
        &self.step_instructions
    }

    /// Source instructions followed by step instructions, in append order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> + '_ {
        self.source_instructions
            .iter()
            .chain(self.step_instructions.iter())
    }

    pub fn instruction_count(&self) -> usize {
        self.source_instructions.len() + self.step_instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruction_count() == 0
    }

    /// Every binding reachable from the instructions, keyed by name. When a
    /// name is bound more than once the last value seen wins.
    pub fn bindings(&self) -> IndexMap<String, Argument> {
        let mut bindings = IndexMap::new();
        self.collect_bindings(&mut bindings);
        bindings
    }

    fn collect_bindings(&self, bindings: &mut IndexMap<String, Argument>) {
        for instruction in self.instructions() {
            for argument in instruction.arguments() {
                collect_argument(argument, bindings);
            }
        }
    }

    /// Order-sensitive hash: each instruction hash is rotated left by its
    /// position before being folded in, so reordered pipelines built from the
    /// same instructions do not collide.
    pub fn hash_code(&self) -> u64 {
        let source = fold_instructions(&self.source_instructions, SOURCE_SEED);
        let steps = fold_instructions(&self.step_instructions, STEP_SEED);
        source ^ steps.rotate_left(32)
    }
}

fn collect_argument(argument: &Argument, bindings: &mut IndexMap<String, Argument>) {
    match argument {
        Argument::Binding(binding) => {
            bindings.insert(binding.name().to_string(), binding.value().clone());
            collect_argument(binding.value(), bindings);
        }
        Argument::Traversal(bytecode) => bytecode.collect_bindings(bindings),
        Argument::Strategy(strategy) => {
            for (_, value) in strategy.configuration().iter() {
                collect_argument(value, bindings);
            }
        }
        Argument::Literal(_) | Argument::Token(_) | Argument::Lambda(_) => {}
    }
}

fn fold_instructions(instructions: &[Instruction], seed: u64) -> u64 {
    instructions
        .iter()
        .enumerate()
        .fold(seed, |acc, (position, instruction)| {
            let mut hasher = DefaultHasher::new();
            instruction.hash(&mut hasher);
            acc ^ hasher.finish().rotate_left((position % 64) as u32)
        })
}

impl Hash for Bytecode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl fmt::Display for Bytecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, instructions: &[Instruction]) -> fmt::Result {
            f.write_str("[")?;
            for (index, instruction) in instructions.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{instruction}")?;
            }
            f.write_str("]")
        }
        f.write_str("[")?;
        list(f, &self.source_instructions)?;
        f.write_str(", ")?;
        list(f, &self.step_instructions)?;
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v_out() -> Bytecode {
        let mut bytecode = Bytecode::new();
        bytecode.add_step("V", vec![]);
        bytecode.add_step("out", vec![]);
        bytecode
    }

    #[test]
    fn reordered_steps_hash_differently() {
        let mut a = Bytecode::new();
        a.add_step("out", vec![]);
        a.add_step("in", vec![]);
        let mut b = Bytecode::new();
        b.add_step("in", vec![]);
        b.add_step("out", vec![]);
        assert_ne!(a, b);
        assert_ne!(a.hash_code(), b.hash_code());
    }

    #[test]
    fn source_and_step_sequences_are_distinct() {
        let mut a = Bytecode::new();
        a.add_source("withoutStrategies", vec![]);
        let mut b = Bytecode::new();
        b.add_step("withoutStrategies", vec![]);
        assert_ne!(a, b);
        assert_ne!(a.hash_code(), b.hash_code());
    }

    #[test]
    fn instructions_are_restartable() {
        let mut bytecode = v_out();
        bytecode.add_source("withoutStrategies", vec![]);
        let operators: Vec<_> = bytecode.instructions().map(|i| i.operator()).collect();
        assert_eq!(operators, ["withoutStrategies", "V", "out"]);
        assert_eq!(bytecode.instructions().count(), 3);
    }

    #[test]
    fn nested_bindings_are_collected_last_write_wins() {
        let mut inner = Bytecode::new();
        inner.add_step("out", vec![Binding::new("x", "knows").into()]);
        let mut outer = Bytecode::new();
        outer.add_step("hasLabel", vec![Binding::new("x", "person").into()]);
        outer.add_step("filter", vec![inner.into()]);

        let bindings = outer.bindings();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings.get("x"), Some(&Argument::from("knows")));
    }

    #[test]
    fn display_lists_both_sequences() {
        let mut bytecode = v_out();
        bytecode.add_step("has", vec!["name".into(), "marko".into()]);
        assert_eq!(bytecode.to_string(), r#"[[], [V(), out(), has("name", "marko")]]"#);
    }
}
