//! `sensitive` and `nonsensitive` language functions.
//!
//! Both act on the top-level marks of their argument only. Marks on
//! elements nested inside the argument are neither inspected nor changed.

use confval_value::{Mark, Value};
use tracing::debug;

use crate::FuncError;

/// Marks `v` as sensitive. Succeeds for every type and payload state,
/// including unknown, null and already-sensitive values.
pub fn sensitive(v: &Value) -> Value {
    v.mark(Mark::Sensitive)
}

/// Removes the sensitive mark from `v` itself.
///
/// Fails with [`FuncError::RedundantOperation`] when `v` is not marked
/// sensitive, even if one of its elements is. Other marks on `v` are kept.
pub fn nonsensitive(v: &Value) -> Result<Value, FuncError> {
    let (out, removed) = v.unmark_only(Mark::Sensitive);
    if !removed {
        debug!(ty = %v.ty(), "rejecting nonsensitive on a value that is not sensitive");
        return Err(FuncError::RedundantOperation {
            reason: "the given value is not sensitive, so this call is redundant".to_string(),
        });
    }
    Ok(out)
}
