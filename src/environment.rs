use crate::core;
use crate::types::{MalObject, MalSymbol, PrimitiveFn};
use indexmap::IndexMap;
use std::fmt;

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownSymbol(pub MalSymbol);

impl fmt::Display for UnknownSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' not found", self.0)
    }
}

/// What evaluating a symbol with no binding produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolResolution {
    /// The symbol evaluates to itself.
    Permissive,
    /// Evaluation fails with an unknown symbol error.
    Strict,
}

impl Default for SymbolResolution {
    fn default() -> Self {
        SymbolResolution::Permissive
    }
}

/// A single flat table of bindings, kept in insertion order.
#[derive(Debug, Default)]
pub struct Environment {
    bindings: IndexMap<MalSymbol, MalObject>,
    resolution: SymbolResolution,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolution(resolution: SymbolResolution) -> Self {
        Self {
            bindings: IndexMap::new(),
            resolution,
        }
    }

    pub fn resolution(&self) -> SymbolResolution {
        self.resolution
    }

    pub fn set<T>(&mut self, key: T, value: MalObject) -> Option<MalObject>
    where
        T: Into<MalSymbol>,
    {
        self.bindings.insert(key.into(), value)
    }

    pub fn register(&mut self, func: &'static PrimitiveFn) -> Option<MalObject> {
        self.set(func.name, MalObject::Primitive(func))
    }

    pub fn get(&self, key: &MalSymbol) -> Option<&MalObject> {
        self.bindings.get(key)
    }

    pub fn fetch(&self, key: &MalSymbol) -> Result<MalObject, UnknownSymbol> {
        self.get(key)
            .cloned()
            .ok_or_else(|| UnknownSymbol(key.clone()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MalSymbol, &MalObject)> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.bindings.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}

/// An environment with the core built-ins bound to their names.
pub fn repl_env() -> Environment {
    repl_env_with(SymbolResolution::default())
}

pub fn repl_env_with(resolution: SymbolResolution) -> Environment {
    let mut env = Environment::with_resolution(resolution);
    for &func in core::CORE.iter() {
        env.register(func);
    }
    log::debug!("repl environment: {}", env);
    env
}
