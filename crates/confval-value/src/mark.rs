//! Marks: out-of-band annotations attached to a single [`Value`].
//!
//! A mark belongs only to the value it is attached to. Marking a collection
//! never marks its elements, and embedding a marked element in a collection
//! never marks the collection. None of the operations here look below the
//! top level of a value.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::Value;

/// A mark token.
///
/// Well-known tokens are variants of their own, so `Mark::from("sensitive")`
/// and `Mark::Sensitive` are the same token and no custom token can collide
/// with a well-known one.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mark {
    /// The value must not be shown in rendered output.
    Sensitive,
    /// An opaque token chosen by the caller.
    Custom(Arc<str>),
}

impl Mark {
    pub fn name(&self) -> &str {
        match self {
            Mark::Sensitive => "sensitive",
            Mark::Custom(name) => name,
        }
    }
}

impl From<&str> for Mark {
    fn from(name: &str) -> Self {
        match name {
            "sensitive" => Mark::Sensitive,
            other => Mark::Custom(Arc::from(other)),
        }
    }
}

impl From<String> for Mark {
    fn from(name: String) -> Self {
        Mark::from(name.as_str())
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.name())
    }
}

/// Unordered set of marks, persistent so copies share structure.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MarkSet(im::OrdSet<Mark>);

impl MarkSet {
    pub fn new() -> Self {
        Self(im::OrdSet::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, mark: &Mark) -> bool {
        self.0.contains(mark)
    }

    /// A copy of this set that also holds `mark`.
    pub fn with(&self, mark: Mark) -> Self {
        Self(self.0.update(mark))
    }

    /// A copy of this set without `mark`.
    pub fn without(&self, mark: &Mark) -> Self {
        Self(self.0.without(mark))
    }

    pub fn union(&self, other: &MarkSet) -> Self {
        Self(self.0.clone().union(other.0.clone()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mark> {
        self.0.iter()
    }
}

impl FromIterator<Mark> for MarkSet {
    fn from_iter<I: IntoIterator<Item = Mark>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a MarkSet {
    type Item = &'a Mark;
    type IntoIter = im::ordset::Iter<'a, Mark>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Debug for MarkSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.iter()).finish()
    }
}

impl Value {
    /// Returns this value with `mark` attached at the top level.
    ///
    /// Marking is idempotent and works the same for known, unknown and null
    /// values of any type.
    pub fn mark(&self, mark: impl Into<Mark>) -> Value {
        let mark = mark.into();
        trace!(mark = %mark, ty = %self.ty(), "attaching mark");
        self.replace_marks(self.marks().with(mark))
    }

    /// Returns this value with every mark in `marks` attached at the top level.
    pub fn with_marks(&self, marks: &MarkSet) -> Value {
        if marks.is_empty() {
            return self.clone();
        }
        self.replace_marks(self.marks().union(marks))
    }

    /// True iff `mark` is attached to this value itself. Elements are not
    /// inspected.
    pub fn has_mark(&self, mark: impl Into<Mark>) -> bool {
        self.marks().contains(&mark.into())
    }

    pub fn is_marked(&self) -> bool {
        !self.marks().is_empty()
    }

    /// Strips all top-level marks, returning the unmarked value and the
    /// marks that were removed. Element marks are left in place.
    pub fn unmark(&self) -> (Value, MarkSet) {
        let removed = self.marks().clone();
        if !removed.is_empty() {
            trace!(marks = ?removed, ty = %self.ty(), "removing all marks");
        }
        (self.replace_marks(MarkSet::new()), removed)
    }

    /// Strips one top-level mark and keeps the others. The flag reports
    /// whether the mark was present.
    pub fn unmark_only(&self, mark: impl Into<Mark>) -> (Value, bool) {
        let mark = mark.into();
        if !self.marks().contains(&mark) {
            return (self.clone(), false);
        }
        trace!(mark = %mark, ty = %self.ty(), "removing mark");
        (self.replace_marks(self.marks().without(&mark)), true)
    }
}
