use confval_types::Type;
use std::fmt;

/// Errors from building a [`Value`](crate::Value) out of parts.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueError {
    /// Elements of a list, set or map do not all share one type
    InconsistentElementTypes {
        kind: &'static str,
        expected: Type,
        found: Type,
    },
    /// Element type of an empty collection cannot be inferred; use the `*_empty` constructors
    EmptyCollection { kind: &'static str },
    /// The same key or attribute name appears twice in a map or object
    DuplicateKey { kind: &'static str, key: String },
    /// Text is not a decimal number literal
    InvalidNumber(String),
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueError::InconsistentElementTypes {
                kind,
                expected,
                found,
            } => write!(
                f,
                "inconsistent {kind} element types: expected {expected}, found {found}"
            ),
            ValueError::EmptyCollection { kind } => {
                write!(f, "cannot infer the element type of an empty {kind}")
            }
            ValueError::DuplicateKey { kind, key } => {
                write!(f, "duplicate {kind} key {key:?}")
            }
            ValueError::InvalidNumber(text) => write!(f, "invalid number literal {text:?}"),
        }
    }
}

impl std::error::Error for ValueError {}
