#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
#![forbid(unsafe_code)]

mod error;
mod function;
mod sensitive;

pub use error::{CallError, FuncError};
pub use function::{FuncImpl, FuncRegistry, FuncSpec, Parameter, ReturnTypeFn};
pub use sensitive::{nonsensitive, sensitive};
