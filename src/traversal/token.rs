use std::fmt;

/// Selects the keys or the values of a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Keys,
    Values,
}

/// Sort direction for `order().by(...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    Asc,
    Desc,
}

/// Special option tokens for `choose`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pick {
    /// Fallback branch taken when no other option token matches.
    None,
}

/// Enum constants that may appear as instruction arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Column(Column),
    Order(Order),
    Pick(Pick),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Column(Column::Keys) => f.write_str("keys"),
            Token::Column(Column::Values) => f.write_str("values"),
            Token::Order(Order::Asc) => f.write_str("asc"),
            Token::Order(Order::Desc) => f.write_str("desc"),
            Token::Pick(Pick::None) => f.write_str("none"),
        }
    }
}
