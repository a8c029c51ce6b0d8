//! Function table mapping language function names to implementations.
//!
//! An evaluator resolves a call such as `sensitive(var.password)` by name,
//! asks for the result type while type-checking, and calls the function
//! once the arguments are evaluated.

use std::collections::HashMap;
use std::fmt;

use confval_types::Type;
use confval_value::{MarkSet, Value};
use tracing::debug;

use crate::{nonsensitive, sensitive, CallError, FuncError};

/// Type alias for function implementation signatures.
pub type FuncImpl = fn(&[Value]) -> Result<Value, FuncError>;

/// Type alias for result type computation from argument types.
pub type ReturnTypeFn = fn(&[Type]) -> Type;

/// Positional parameter of a function.
///
/// When `allow_marked` is false the function never sees marks on this
/// argument: they are stripped before the call and attached to the result.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: &'static str,
    pub ty: Type,
    pub allow_unknown: bool,
    pub allow_null: bool,
    pub allow_marked: bool,
}

impl Parameter {
    /// Parameter that takes any value at all: any type, unknown, null or marked.
    pub fn any(name: &'static str) -> Self {
        Parameter {
            name,
            ty: Type::Dynamic,
            allow_unknown: true,
            allow_null: true,
            allow_marked: true,
        }
    }

    fn check(&self, func: &str, arg: &Value) -> Result<(), CallError> {
        if !arg.ty().conforms_to(&self.ty) {
            return Err(CallError::ArgumentType {
                name: func.to_string(),
                param: self.name,
                expected: self.ty.clone(),
                found: arg.ty().clone(),
            });
        }
        let bad_state = if !arg.is_known() && !self.allow_unknown {
            Some("unknown")
        } else if arg.is_null() && !self.allow_null {
            Some("null")
        } else {
            None
        };
        if let Some(state) = bad_state {
            return Err(CallError::ArgumentState {
                name: func.to_string(),
                param: self.name,
                state,
            });
        }
        Ok(())
    }
}

/// Signature and implementation of one function.
#[derive(Clone)]
pub struct FuncSpec {
    pub params: Vec<Parameter>,
    return_type: ReturnTypeFn,
    imp: FuncImpl,
}

impl FuncSpec {
    pub fn new(params: Vec<Parameter>, return_type: ReturnTypeFn, imp: FuncImpl) -> Self {
        Self {
            params,
            return_type,
            imp,
        }
    }
}

impl fmt::Debug for FuncSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuncSpec")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Registry of callable functions.
pub struct FuncRegistry {
    functions: HashMap<String, FuncSpec>,
}

impl fmt::Debug for FuncRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuncRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

impl Default for FuncRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FuncRegistry {
    /// Create a registry with all built-in functions.
    pub fn new() -> Self {
        let mut reg = Self {
            functions: HashMap::new(),
        };
        reg.register(
            "sensitive",
            FuncSpec::new(vec![Parameter::any("value")], same_as_first, call_sensitive),
        );
        reg.register(
            "nonsensitive",
            FuncSpec::new(
                vec![Parameter::any("value")],
                same_as_first,
                call_nonsensitive,
            ),
        );
        reg
    }

    pub fn register(&mut self, name: &str, spec: FuncSpec) {
        self.functions.insert(name.to_string(), spec);
    }

    pub fn get(&self, name: &str) -> Option<&FuncSpec> {
        self.functions.get(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn lookup(&self, name: &str, argc: usize) -> Result<&FuncSpec, CallError> {
        let spec = self
            .functions
            .get(name)
            .ok_or_else(|| CallError::UnknownFunction(name.to_string()))?;
        if spec.params.len() != argc {
            return Err(CallError::Arity {
                name: name.to_string(),
                expected: spec.params.len(),
                found: argc,
            });
        }
        Ok(spec)
    }

    /// Result type of calling `name` with arguments of the given types.
    pub fn return_type(&self, name: &str, arg_types: &[Type]) -> Result<Type, CallError> {
        let spec = self.lookup(name, arg_types.len())?;
        Ok((spec.return_type)(arg_types))
    }

    /// Checks the arguments against the parameters and calls the function.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, CallError> {
        let spec = self.lookup(name, args.len())?;
        let mut stripped = MarkSet::new();
        let mut call_args = Vec::with_capacity(args.len());
        for (param, arg) in spec.params.iter().zip(args) {
            param.check(name, arg)?;
            if param.allow_marked || !arg.is_marked() {
                call_args.push(arg.clone());
            } else {
                let (raw, marks) = arg.unmark();
                stripped = stripped.union(&marks);
                call_args.push(raw);
            }
        }
        let result = (spec.imp)(&call_args).map_err(|err| {
            debug!(function = name, error = %err, "function call failed");
            CallError::Func {
                name: name.to_string(),
                err,
            }
        })?;
        Ok(result.with_marks(&stripped))
    }
}

fn same_as_first(args: &[Type]) -> Type {
    args.first().cloned().unwrap_or(Type::Dynamic)
}

fn call_sensitive(args: &[Value]) -> Result<Value, FuncError> {
    Ok(sensitive(&args[0]))
}

fn call_nonsensitive(args: &[Value]) -> Result<Value, FuncError> {
    nonsensitive(&args[0])
}
