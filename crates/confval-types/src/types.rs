//! Core `Type` definitions for configuration values.

use std::collections::BTreeMap;
use std::fmt;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimType {
    Bool,
    /// Arbitrary-precision number.
    Number,
    String,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Primitive types.
    Prim(PrimType),

    /// Homogeneous ordered sequence: `list(elem)`
    List(Box<Type>),

    /// Homogeneous unordered collection without duplicates: `set(elem)`
    Set(Box<Type>),

    /// Homogeneous string-keyed mapping: `map(elem)`
    Map(Box<Type>),

    /// Record with a fixed set of named attributes, ordered by name.
    Object(BTreeMap<String, Type>),

    /// Heterogeneous, fixed-length sequence: `tuple([t0, t1, ..., tn])`
    Tuple(Vec<Type>),

    /// Wildcard placeholder for a type that cannot be determined yet.
    /// Conforms to, and is conformed to by, every other type.
    Dynamic,
}

impl Type {
    #[inline]
    pub fn bool() -> Self {
        Type::Prim(PrimType::Bool)
    }
    #[inline]
    pub fn number() -> Self {
        Type::Prim(PrimType::Number)
    }
    #[inline]
    pub fn string() -> Self {
        Type::Prim(PrimType::String)
    }
    #[inline]
    pub fn list(elem: Type) -> Self {
        Type::List(Box::new(elem))
    }
    #[inline]
    pub fn set(elem: Type) -> Self {
        Type::Set(Box::new(elem))
    }
    #[inline]
    pub fn map(elem: Type) -> Self {
        Type::Map(Box::new(elem))
    }
    pub fn object<K: Into<String>>(attrs: impl IntoIterator<Item = (K, Type)>) -> Self {
        Type::Object(attrs.into_iter().map(|(k, t)| (k.into(), t)).collect())
    }
    #[inline]
    pub fn tuple(elems: impl Into<Vec<Type>>) -> Self {
        Type::Tuple(elems.into())
    }
    /// Object type with no attributes.
    pub fn empty_object() -> Self {
        Type::Object(BTreeMap::new())
    }
    /// Tuple type with no elements.
    pub fn empty_tuple() -> Self {
        Type::Tuple(Vec::new())
    }
    #[inline]
    pub fn dynamic() -> Self {
        Type::Dynamic
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Prim(_))
    }

    /// List, set and map types; objects and tuples are structural, not collections.
    pub fn is_collection(&self) -> bool {
        matches!(self, Type::List(_) | Type::Set(_) | Type::Map(_))
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Type::Dynamic)
    }

    /// Element type of a list, set or map type.
    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Type::List(elem) | Type::Set(elem) | Type::Map(elem) => Some(elem),
            _ => None,
        }
    }

    pub fn attribute_type(&self, name: &str) -> Option<&Type> {
        match self {
            Type::Object(attrs) => attrs.get(name),
            _ => None,
        }
    }

    pub fn attribute_types(&self) -> Option<&BTreeMap<String, Type>> {
        match self {
            Type::Object(attrs) => Some(attrs),
            _ => None,
        }
    }

    pub fn tuple_element_types(&self) -> Option<&[Type]> {
        match self {
            Type::Tuple(elems) => Some(elems),
            _ => None,
        }
    }

    /// Structural conformance where `Dynamic` on either side matches anything,
    /// at any depth.
    pub fn conforms_to(&self, want: &Type) -> bool {
        match (self, want) {
            (Type::Dynamic, _) | (_, Type::Dynamic) => true,
            (Type::Prim(a), Type::Prim(b)) => a == b,
            (Type::List(a), Type::List(b))
            | (Type::Set(a), Type::Set(b))
            | (Type::Map(a), Type::Map(b)) => a.conforms_to(b),
            (Type::Object(a), Type::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|((ka, ta), (kb, tb))| ka == kb && ta.conforms_to(tb))
            }
            (Type::Tuple(a), Type::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.conforms_to(y))
            }
            _ => false,
        }
    }

    /// Short human-oriented name for diagnostics, e.g. `list of string`.
    pub fn friendly_name(&self) -> String {
        match self {
            Type::Prim(PrimType::Bool) => "bool".to_string(),
            Type::Prim(PrimType::Number) => "number".to_string(),
            Type::Prim(PrimType::String) => "string".to_string(),
            Type::List(elem) => format!("list of {}", elem.friendly_name()),
            Type::Set(elem) => format!("set of {}", elem.friendly_name()),
            Type::Map(elem) => format!("map of {}", elem.friendly_name()),
            Type::Object(_) => "object".to_string(),
            Type::Tuple(_) => "tuple".to_string(),
            Type::Dynamic => "dynamic".to_string(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Prim(PrimType::Bool) => write!(f, "bool"),
            Type::Prim(PrimType::Number) => write!(f, "number"),
            Type::Prim(PrimType::String) => write!(f, "string"),
            Type::List(elem) => write!(f, "list({elem})"),
            Type::Set(elem) => write!(f, "set({elem})"),
            Type::Map(elem) => write!(f, "map({elem})"),
            Type::Object(attrs) => {
                write!(f, "object({{")?;
                for (i, (name, ty)) in attrs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {name} = {ty}")?;
                }
                if !attrs.is_empty() {
                    write!(f, " ")?;
                }
                write!(f, "}})")
            }
            Type::Tuple(elems) => {
                write!(f, "tuple([")?;
                for (i, ty) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{ty}")?;
                }
                write!(f, "])")
            }
            Type::Dynamic => write!(f, "dynamic"),
        }
    }
}
