use crate::{evaluator, printer};
use derive_more::Deref;
use std::fmt;
use std::fmt::Formatter;
use std::ops::{RangeFrom, RangeInclusive};
use std::rc::Rc;

pub type MalInt = i64;

/// Elements of a list. Immutable once built: there is no `DerefMut`.
#[derive(Deref, Debug, PartialEq, Eq)]
pub struct MalList(Vec<MalObject>);

#[derive(Deref, Debug, PartialEq, Eq)]
pub struct MalVector(Vec<MalObject>);

/// A hashmap literal, kept as the flat sequence key, value, key, value...
/// No pairing or deduplication happens.
#[derive(Deref, Debug, PartialEq, Eq)]
pub struct MalMap(Vec<MalObject>);

#[derive(Deref, Debug, PartialEq, Eq, Hash, Clone)]
pub struct MalSymbol(String);

impl AsRef<str> for MalSymbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MalSymbol {
    fn from(name: &str) -> Self {
        MalSymbol(String::from(name))
    }
}

impl From<String> for MalSymbol {
    fn from(name: String) -> Self {
        MalSymbol(name)
    }
}

impl fmt::Display for MalSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arity {
    Between(RangeInclusive<usize>),
    AtLeast(RangeFrom<usize>),
}

#[derive(Debug, PartialEq, Eq)]
pub struct BadArgCount {
    pub name: &'static str,
    pub expected: Arity,
    pub got: usize,
}

impl fmt::Display for BadArgCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let qualifier = if self.got < self.expected.min() {
            "insufficient arguments: "
        } else {
            ""
        };
        write!(
            f,
            "{}when evaluating {} expected {} arguments, but received {} arguments",
            qualifier, self.name, self.expected, self.got
        )
    }
}

impl Arity {
    pub const fn exactly(n: usize) -> Self {
        Self::Between(n..=n)
    }

    pub const fn at_least(n: usize) -> Self {
        Self::AtLeast(n..)
    }

    pub fn contains(&self, n: usize) -> bool {
        match self {
            Self::Between(range) => range.contains(&n),
            Self::AtLeast(range) => range.contains(&n),
        }
    }

    pub fn min(&self) -> usize {
        match self {
            Self::Between(range) => *range.start(),
            Self::AtLeast(range) => range.start,
        }
    }

    pub fn validate_for(&self, n: usize, name: &'static str) -> Result<(), BadArgCount> {
        match self.contains(n) {
            true => Ok(()),
            false => Err(BadArgCount {
                name,
                expected: self.clone(),
                got: n,
            }),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Between(r) => {
                if r.start() == r.end() {
                    write!(f, "exactly {}", r.start())
                } else {
                    write!(f, "from {} to {}", r.start(), r.end())
                }
            }
            Arity::AtLeast(r) => write!(f, "at least {}", r.start),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeMismatch {
    NotAnInt,
    NotAList,
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeMismatch::NotAnInt => write!(f, "an integer"),
            TypeMismatch::NotAList => write!(f, "a list"),
        }
    }
}

/// An argument of the wrong type. `position` counts from 1.
#[derive(Debug, PartialEq, Eq)]
pub struct BadArgType {
    pub name: &'static str,
    pub position: usize,
    pub expected: TypeMismatch,
    pub got: &'static str,
}

impl fmt::Display for BadArgType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} expected argument {} to be {}, but received {}",
            self.name, self.position, self.expected, self.got
        )
    }
}

pub struct PrimitiveFn {
    pub name: &'static str,
    pub arity: Arity,
    pub fn_ptr: fn(&[MalObject]) -> evaluator::Result,
}

impl fmt::Debug for PrimitiveFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "primitive function #<{}>", self.name)
    }
}

#[derive(Debug, Clone)]
pub enum MalObject {
    Integer(MalInt),
    String(String),
    Keyword(String),
    Symbol(MalSymbol),
    List(Rc<MalList>),
    Vector(Rc<MalVector>),
    Map(Rc<MalMap>),
    Primitive(&'static PrimitiveFn),
}

impl MalObject {
    pub fn type_name(&self) -> &'static str {
        match self {
            MalObject::Integer(_) => "integer",
            MalObject::String(_) => "string",
            MalObject::Keyword(_) => "keyword",
            MalObject::Symbol(_) => "symbol",
            MalObject::List(_) => "list",
            MalObject::Vector(_) => "vector",
            MalObject::Map(_) => "hashmap",
            MalObject::Primitive(_) => "function",
        }
    }

    pub fn is_callable(&self) -> bool {
        use MalObject::*;
        match self {
            Primitive(_) => true,
            Integer(_) | String(_) | Keyword(_) | Symbol(_) | List(_) | Vector(_) | Map(_) => {
                false
            }
        }
    }

    pub fn as_int(&self) -> Result<MalInt, TypeMismatch> {
        match self {
            MalObject::Integer(x) => Ok(*x),
            _ => Err(TypeMismatch::NotAnInt),
        }
    }

    pub fn as_list(&self) -> Result<&[MalObject], TypeMismatch> {
        match self {
            MalObject::List(x) => Ok(x.as_slice()),
            _ => Err(TypeMismatch::NotAList),
        }
    }

    pub fn new_list() -> Self {
        Self::List(Rc::new(MalList(Vec::new())))
    }

    pub fn wrap_list(elements: Vec<MalObject>) -> Self {
        Self::List(Rc::new(MalList(elements)))
    }

    pub fn wrap_vector(elements: Vec<MalObject>) -> Self {
        Self::Vector(Rc::new(MalVector(elements)))
    }

    pub fn wrap_map(entries: Vec<MalObject>) -> Self {
        Self::Map(Rc::new(MalMap(entries)))
    }

    pub fn new_symbol(name: &str) -> Self {
        Self::Symbol(MalSymbol::from(name))
    }

    pub fn new_keyword(name: &str) -> Self {
        Self::Keyword(String::from(name))
    }

    pub fn new_string(content: &str) -> Self {
        Self::String(String::from(content))
    }
}

impl PartialEq for MalObject {
    fn eq(&self, other: &Self) -> bool {
        use MalObject::*;
        match (self, other) {
            (Integer(x), Integer(y)) => x == y,
            (String(x), String(y)) => x == y,
            (Keyword(x), Keyword(y)) => x == y,
            (Symbol(x), Symbol(y)) => x == y,
            (List(x), List(y)) => x == y,
            (Vector(x), Vector(y)) => x == y,
            (Map(x), Map(y)) => x == y,
            (Primitive(x), Primitive(y)) => std::ptr::eq(*x, *y),
            _ => false,
        }
    }
}

impl Eq for MalObject {}

impl fmt::Display for MalObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            printer::pr_str(self, printer::PrintMode::ReadableRepresentation)
        )
    }
}
