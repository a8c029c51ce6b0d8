use confval_types::Type;
use std::fmt;

/// Failure of a language function on otherwise valid arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FuncError {
    /// The call would not change anything and the caller asked for a change
    /// on purpose. The argument is returned to the caller untouched.
    RedundantOperation { reason: String },
}

impl fmt::Display for FuncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuncError::RedundantOperation { reason } => f.write_str(reason),
        }
    }
}

impl std::error::Error for FuncError {}

/// Errors from calling a function by name through a [`FuncRegistry`](crate::FuncRegistry).
#[derive(Debug, Clone, PartialEq)]
pub enum CallError {
    /// No function registered under this name
    UnknownFunction(String),
    /// Wrong number of arguments
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },
    /// Argument does not conform to the parameter type
    ArgumentType {
        name: String,
        param: &'static str,
        expected: Type,
        found: Type,
    },
    /// Argument is unknown or null and the parameter does not accept that
    ArgumentState {
        name: String,
        param: &'static str,
        state: &'static str,
    },
    /// The function itself failed
    Func { name: String, err: FuncError },
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallError::UnknownFunction(name) => write!(f, "unknown function: {}", name),
            CallError::Arity {
                name,
                expected,
                found,
            } => write!(
                f,
                "function {} expects {} argument(s), found {}",
                name, expected, found
            ),
            CallError::ArgumentType {
                name,
                param,
                expected,
                found,
            } => write!(
                f,
                "invalid value for \"{}\" parameter of {}: {} required, found {}",
                param,
                name,
                expected.friendly_name(),
                found.friendly_name()
            ),
            CallError::ArgumentState { name, param, state } => write!(
                f,
                "invalid value for \"{}\" parameter of {}: argument must not be {}",
                param, name, state
            ),
            CallError::Func { name, err } => write!(f, "call to {} failed: {}", name, err),
        }
    }
}

impl std::error::Error for CallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CallError::Func { err, .. } => Some(err),
            _ => None,
        }
    }
}
