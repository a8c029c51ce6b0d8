#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
#![forbid(unsafe_code)]

mod error;
mod mark;
mod number;
mod value;

pub use confval_types::{PrimType, Type};
pub use error::ValueError;
pub use mark::{Mark, MarkSet};
pub use number::Number;
pub use value::{Data, State, Value};
