//! Immutable dynamic values.
//!
//! A [`Value`] is a type, a payload state and a set of marks. The payload is
//! shared behind an `Arc`, so deriving a value with different marks never
//! copies the data, and values can be read from any number of threads.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use confval_types::Type;

use crate::{MarkSet, Number, ValueError};

#[derive(Clone)]
pub struct Value {
    ty: Arc<Type>,
    state: State,
    marks: MarkSet,
}

/// Payload state of a value. Every value is in exactly one of these states
/// for its type.
#[derive(Clone)]
pub enum State {
    /// Known data matching the shape of the value's type.
    Concrete(Arc<Data>),
    /// Not yet known; carries the type but no data.
    Unknown,
    /// Explicit, typed absence of data.
    Null,
}

/// Known payload. Elements keep their own marks.
pub enum Data {
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<Value>),
    /// Elements in construction order, without raw-equal duplicates.
    Set(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Object(BTreeMap<String, Value>),
    Tuple(Vec<Value>),
}

impl Value {
    fn concrete(ty: Type, data: Data) -> Self {
        Value {
            ty: Arc::new(ty),
            state: State::Concrete(Arc::new(data)),
            marks: MarkSet::new(),
        }
    }

    pub fn bool(b: bool) -> Self {
        Self::concrete(Type::bool(), Data::Bool(b))
    }

    pub fn number(n: impl Into<Number>) -> Self {
        Self::concrete(Type::number(), Data::Number(n.into()))
    }

    pub fn number_int(i: i64) -> Self {
        Self::number(Number::from_int(i))
    }

    /// Number parsed from decimal text, e.g. `"1.5"` or `"2e10"`.
    pub fn number_parse(text: &str) -> Result<Self, ValueError> {
        Ok(Self::number(Number::parse(text)?))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::concrete(Type::string(), Data::String(s.into()))
    }

    /// List of one or more elements, all of the same type.
    pub fn list(elems: Vec<Value>) -> Result<Self, ValueError> {
        let elem_ty = common_type("list", elems.iter())?;
        Ok(Self::concrete(Type::list(elem_ty), Data::List(elems)))
    }

    pub fn list_empty(elem_ty: Type) -> Self {
        Self::concrete(Type::list(elem_ty), Data::List(Vec::new()))
    }

    /// Set of one or more elements, all of the same type.
    ///
    /// A known element that is raw-equal to an earlier one is dropped, and
    /// its marks, at every depth, are merged into the element that is kept.
    /// Unknown elements are never merged, since two unknowns may turn out to
    /// differ.
    pub fn set(elems: Vec<Value>) -> Result<Self, ValueError> {
        let elem_ty = common_type("set", elems.iter())?;
        let mut kept: Vec<Value> = Vec::with_capacity(elems.len());
        for elem in elems {
            let existing = elem.is_wholly_known().then(|| {
                kept.iter()
                    .position(|k| k.is_wholly_known() && k.raw_equals(&elem))
            });
            match existing.flatten() {
                Some(i) => kept[i] = kept[i].merge_marks(&elem),
                None => kept.push(elem),
            }
        }
        Ok(Self::concrete(Type::set(elem_ty), Data::Set(kept)))
    }

    pub fn set_empty(elem_ty: Type) -> Self {
        Self::concrete(Type::set(elem_ty), Data::Set(Vec::new()))
    }

    /// Map with one or more entries, all values of the same type. A key
    /// given twice is an error.
    pub fn map<K: Into<String>>(
        entries: impl IntoIterator<Item = (K, Value)>,
    ) -> Result<Self, ValueError> {
        let entries = unique_keys("map", entries)?;
        let elem_ty = common_type("map", entries.values())?;
        Ok(Self::concrete(Type::map(elem_ty), Data::Map(entries)))
    }

    pub fn map_empty(elem_ty: Type) -> Self {
        Self::concrete(Type::map(elem_ty), Data::Map(BTreeMap::new()))
    }

    /// Object whose type is built from the types of its attributes. An
    /// attribute given twice is an error.
    pub fn object<K: Into<String>>(
        attrs: impl IntoIterator<Item = (K, Value)>,
    ) -> Result<Self, ValueError> {
        let attrs = unique_keys("object", attrs)?;
        let ty = Type::Object(
            attrs
                .iter()
                .map(|(k, v)| (k.clone(), v.ty().clone()))
                .collect(),
        );
        Ok(Self::concrete(ty, Data::Object(attrs)))
    }

    pub fn empty_object() -> Self {
        Self::concrete(Type::empty_object(), Data::Object(BTreeMap::new()))
    }

    pub fn tuple(elems: Vec<Value>) -> Self {
        let ty = Type::tuple(elems.iter().map(|v| v.ty().clone()).collect::<Vec<_>>());
        Self::concrete(ty, Data::Tuple(elems))
    }

    pub fn empty_tuple() -> Self {
        Self::tuple(Vec::new())
    }

    /// Placeholder for a value of type `ty` that is not known yet.
    pub fn unknown(ty: Type) -> Self {
        Value {
            ty: Arc::new(ty),
            state: State::Unknown,
            marks: MarkSet::new(),
        }
    }

    /// Unknown value whose type is not known either.
    pub fn dynamic() -> Self {
        Self::unknown(Type::Dynamic)
    }

    pub fn null(ty: Type) -> Self {
        Value {
            ty: Arc::new(ty),
            state: State::Null,
            marks: MarkSet::new(),
        }
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Top-level marks of this value.
    pub fn marks(&self) -> &MarkSet {
        &self.marks
    }

    /// Same type and payload, different top-level marks.
    pub(crate) fn replace_marks(&self, marks: MarkSet) -> Value {
        Value {
            ty: Arc::clone(&self.ty),
            state: self.state.clone(),
            marks,
        }
    }

    /// True unless the value itself is unknown. Elements are not inspected.
    pub fn is_known(&self) -> bool {
        !matches!(self.state, State::Unknown)
    }

    /// True if neither the value nor any element, at any depth, is unknown.
    pub fn is_wholly_known(&self) -> bool {
        match &self.state {
            State::Unknown => false,
            State::Null => true,
            State::Concrete(_) => self.elements().all(Value::is_wholly_known),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.state, State::Null)
    }

    pub fn data(&self) -> Option<&Data> {
        match &self.state {
            State::Concrete(data) => Some(data.as_ref()),
            State::Unknown | State::Null => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.data()? {
            Data::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self.data()? {
            Data::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.data()? {
            Data::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Number of elements or attributes of a known structural value.
    pub fn length(&self) -> Option<usize> {
        match self.data()? {
            Data::List(xs) | Data::Set(xs) | Data::Tuple(xs) => Some(xs.len()),
            Data::Map(m) | Data::Object(m) => Some(m.len()),
            Data::Bool(_) | Data::Number(_) | Data::String(_) => None,
        }
    }

    /// Element `i` of a known list or tuple, with its own marks.
    pub fn index(&self, i: usize) -> Option<&Value> {
        match self.data()? {
            Data::List(xs) | Data::Tuple(xs) => xs.get(i),
            _ => None,
        }
    }

    /// Attribute of a known object, with its own marks.
    pub fn get_attr(&self, name: &str) -> Option<&Value> {
        match self.data()? {
            Data::Object(attrs) => attrs.get(name),
            _ => None,
        }
    }

    /// Entry of a known map, with its own marks.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self.data()? {
            Data::Map(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Direct elements of a known structural value: list, set and tuple
    /// elements, or map and object values in key order. Empty for anything
    /// else.
    pub fn elements(&self) -> Box<dyn Iterator<Item = &Value> + '_> {
        match self.data() {
            Some(Data::List(xs) | Data::Set(xs) | Data::Tuple(xs)) => Box::new(xs.iter()),
            Some(Data::Map(m) | Data::Object(m)) => Box::new(m.values()),
            _ => Box::new(std::iter::empty()),
        }
    }

    /// Structural equality of type and payload, ignoring marks at every level.
    ///
    /// Unknown equals only unknown of the same type, and null only null of
    /// the same type.
    pub fn raw_equals(&self, other: &Value) -> bool {
        self.equal_with(other, false)
    }

    fn equal_with(&self, other: &Value, compare_marks: bool) -> bool {
        if compare_marks && self.marks != other.marks {
            return false;
        }
        if self.ty != other.ty {
            return false;
        }
        match (&self.state, &other.state) {
            (State::Unknown, State::Unknown) | (State::Null, State::Null) => true,
            (State::Concrete(a), State::Concrete(b)) => {
                Arc::ptr_eq(a, b) || a.equal_with(b, compare_marks)
            }
            _ => false,
        }
    }
}

impl Value {
    /// Combines two raw-equal values into one carrying the marks of both, at
    /// every depth. Set elements are paired with a raw-equal partner.
    fn merge_marks(&self, other: &Value) -> Value {
        let marks = self.marks.union(&other.marks);
        let (State::Concrete(a), State::Concrete(b)) = (&self.state, &other.state) else {
            return self.replace_marks(marks);
        };
        if Arc::ptr_eq(a, b) {
            return self.replace_marks(marks);
        }
        let zip = |xs: &[Value], ys: &[Value]| -> Vec<Value> {
            xs.iter().zip(ys).map(|(x, y)| x.merge_marks(y)).collect()
        };
        let zip_keyed = |xs: &BTreeMap<String, Value>, ys: &BTreeMap<String, Value>| {
            xs.iter()
                .zip(ys.values())
                .map(|((k, x), y)| (k.clone(), x.merge_marks(y)))
                .collect::<BTreeMap<_, _>>()
        };
        let data = match (a.as_ref(), b.as_ref()) {
            (Data::List(xs), Data::List(ys)) => Data::List(zip(xs, ys)),
            (Data::Tuple(xs), Data::Tuple(ys)) => Data::Tuple(zip(xs, ys)),
            (Data::Set(xs), Data::Set(ys)) => Data::Set(merge_set_elements(xs, ys)),
            (Data::Map(xs), Data::Map(ys)) => Data::Map(zip_keyed(xs, ys)),
            (Data::Object(xs), Data::Object(ys)) => Data::Object(zip_keyed(xs, ys)),
            // Scalars carry no nested marks.
            _ => return self.replace_marks(marks),
        };
        Value {
            ty: Arc::clone(&self.ty),
            state: State::Concrete(Arc::new(data)),
            marks,
        }
    }
}

fn merge_set_elements(xs: &[Value], ys: &[Value]) -> Vec<Value> {
    let mut used = vec![false; ys.len()];
    xs.iter()
        .map(|x| {
            let partner = (0..ys.len()).find(|&i| !used[i] && x.raw_equals(&ys[i]));
            match partner {
                Some(i) => {
                    used[i] = true;
                    x.merge_marks(&ys[i])
                }
                None => x.clone(),
            }
        })
        .collect()
}

impl Data {
    fn equal_with(&self, other: &Data, compare_marks: bool) -> bool {
        let seq_eq = |a: &[Value], b: &[Value]| {
            a.len() == b.len()
                && a.iter()
                    .zip(b.iter())
                    .all(|(x, y)| x.equal_with(y, compare_marks))
        };
        let keyed_eq = |a: &BTreeMap<String, Value>, b: &BTreeMap<String, Value>| {
            a.len() == b.len()
                && a.iter()
                    .zip(b.iter())
                    .all(|((ka, va), (kb, vb))| ka == kb && va.equal_with(vb, compare_marks))
        };
        match (self, other) {
            (Data::Bool(a), Data::Bool(b)) => a == b,
            (Data::Number(a), Data::Number(b)) => a == b,
            (Data::String(a), Data::String(b)) => a == b,
            (Data::List(a), Data::List(b)) | (Data::Tuple(a), Data::Tuple(b)) => seq_eq(a, b),
            (Data::Map(a), Data::Map(b)) | (Data::Object(a), Data::Object(b)) => keyed_eq(a, b),
            (Data::Set(a), Data::Set(b)) => set_eq(a, b, compare_marks),
            _ => false,
        }
    }
}

/// Order-independent comparison; each element of `a` is paired with a
/// distinct equal element of `b`.
fn set_eq(a: &[Value], b: &[Value], compare_marks: bool) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    a.iter().all(|x| {
        let found = b
            .iter()
            .enumerate()
            .position(|(i, y)| !used[i] && x.equal_with(y, compare_marks));
        match found {
            Some(i) => {
                used[i] = true;
                true
            }
            None => false,
        }
    })
}

fn unique_keys<K: Into<String>>(
    kind: &'static str,
    entries: impl IntoIterator<Item = (K, Value)>,
) -> Result<BTreeMap<String, Value>, ValueError> {
    let mut out = BTreeMap::new();
    for (k, v) in entries {
        let key = k.into();
        if out.contains_key(&key) {
            return Err(ValueError::DuplicateKey { kind, key });
        }
        out.insert(key, v);
    }
    Ok(out)
}

fn common_type<'a>(
    kind: &'static str,
    mut elems: impl Iterator<Item = &'a Value>,
) -> Result<Type, ValueError> {
    let first = elems.next().ok_or(ValueError::EmptyCollection { kind })?;
    let expected = first.ty();
    for elem in elems {
        if elem.ty() != expected {
            return Err(ValueError::InconsistentElementTypes {
                kind,
                expected: expected.clone(),
                found: elem.ty().clone(),
            });
        }
    }
    Ok(expected.clone())
}

/// Equality including marks at every level. Use [`Value::raw_equals`] to
/// ignore marks.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equal_with(other, true)
    }
}

impl Eq for Value {}

// Debug output mirrors constructor calls, e.g. `list([number(1).mark("sensitive")])`.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            State::Unknown => write!(f, "unknown({})", self.ty)?,
            State::Null => write!(f, "null({})", self.ty)?,
            State::Concrete(data) => write!(f, "{:?}", data)?,
        }
        for mark in &self.marks {
            write!(f, ".mark({:?})", mark)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Data::Bool(b) => write!(f, "bool({b})"),
            Data::Number(n) => write!(f, "number({n})"),
            Data::String(s) => write!(f, "string({s:?})"),
            Data::List(xs) => write!(f, "list({xs:?})"),
            Data::Set(xs) => write!(f, "set({xs:?})"),
            Data::Tuple(xs) => write!(f, "tuple({xs:?})"),
            Data::Map(m) => write!(f, "map({m:?})"),
            Data::Object(m) => write!(f, "object({m:?})"),
        }
    }
}
