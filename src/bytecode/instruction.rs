use std::fmt;

use super::Bytecode;
use super::binding::Binding;
use crate::strategy::StrategyRef;
use crate::structure::Value;
use crate::traversal::lambda::Lambda;
use crate::traversal::token::{Column, Order, Pick, Token};

/// One argument of an [`Instruction`].
///
/// Every variant compares and hashes by value: nested bytecode structurally,
/// strategies by name and configuration, lambdas by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Argument {
    Literal(Value),
    Token(Token),
    Traversal(Bytecode),
    Binding(Binding),
    Strategy(StrategyRef),
    Lambda(Lambda),
}

impl Argument {
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Argument::Literal(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bytecode(&self) -> Option<&Bytecode> {
        match self {
            Argument::Traversal(bytecode) => Some(bytecode),
            _ => None,
        }
    }

    /// The literal this argument stands for, looking through a binding.
    pub fn resolve(&self) -> Option<&Value> {
        match self {
            Argument::Literal(value) => Some(value),
            Argument::Binding(binding) => binding.value().resolve(),
            _ => None,
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Literal(Value::String(s)) => write!(f, "{s:?}"),
            Argument::Literal(value) => write!(f, "{value}"),
            Argument::Token(token) => write!(f, "{token}"),
            Argument::Traversal(bytecode) => write!(f, "{bytecode}"),
            Argument::Binding(binding) => write!(f, "{binding}"),
            Argument::Strategy(strategy) => write!(f, "{strategy}"),
            Argument::Lambda(lambda) => write!(f, "{lambda}"),
        }
    }
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Argument::Literal(value)
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Argument::Literal(value.into())
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Argument::Literal(value.into())
    }
}

impl From<i64> for Argument {
    fn from(value: i64) -> Self {
        Argument::Literal(value.into())
    }
}

impl From<bool> for Argument {
    fn from(value: bool) -> Self {
        Argument::Literal(value.into())
    }
}

impl From<Bytecode> for Argument {
    fn from(value: Bytecode) -> Self {
        Argument::Traversal(value)
    }
}

impl From<Binding> for Argument {
    fn from(value: Binding) -> Self {
        Argument::Binding(value)
    }
}

impl From<Token> for Argument {
    fn from(value: Token) -> Self {
        Argument::Token(value)
    }
}

impl From<Column> for Argument {
    fn from(value: Column) -> Self {
        Argument::Token(Token::Column(value))
    }
}

impl From<Order> for Argument {
    fn from(value: Order) -> Self {
        Argument::Token(Token::Order(value))
    }
}

impl From<Pick> for Argument {
    fn from(value: Pick) -> Self {
        Argument::Token(Token::Pick(value))
    }
}

impl From<StrategyRef> for Argument {
    fn from(value: StrategyRef) -> Self {
        Argument::Strategy(value)
    }
}

impl From<Lambda> for Argument {
    fn from(value: Lambda) -> Self {
        Argument::Lambda(value)
    }
}

/// An operator name plus its ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instruction {
    operator: String,
    arguments: Vec<Argument>,
}

impl Instruction {
    pub fn new(operator: impl Into<String>, arguments: Vec<Argument>) -> Self {
        Self {
            operator: operator.into(),
            arguments,
        }
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.operator)?;
        for (index, argument) in self.arguments.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{argument}")?;
        }
        f.write_str(")")
    }
}
