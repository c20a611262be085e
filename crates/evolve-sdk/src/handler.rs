//! Builtin registry - name-based dispatch
//!
//! The evaluator resolves a call to a builtin name and hands it to
//! [`BuiltinRegistry::dispatch`]. Each entry carries its declared arity,
//! which is checked before the implementation runs.
//!
//! The registry is generic over the context `C` handed to every
//! implementation, so stdlib modules can register handlers against any
//! host that provides the services they need.

use crate::error::{BuiltinError, BuiltinResult};
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Number of arguments a builtin accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` arguments
    Exact(usize),
    /// `n` or more arguments
    AtLeast(usize),
}

impl Arity {
    /// Check whether `count` arguments satisfy this arity
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

/// A builtin implementation
pub type BuiltinFn<C> = Arc<dyn Fn(&C, &[Value]) -> BuiltinResult<Value> + Send + Sync>;

/// Registered builtin: name, calling contract and implementation.
pub struct BuiltinDescriptor<C> {
    name: String,
    arity: Arity,
    handler: BuiltinFn<C>,
}

impl<C> BuiltinDescriptor<C> {
    /// Builtin name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared arity
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Check arity, then run the implementation.
    pub fn invoke(&self, ctx: &C, args: &[Value]) -> BuiltinResult<Value> {
        if !self.arity.accepts(args.len()) {
            return Err(BuiltinError::ArityMismatch {
                name: self.name.clone(),
                expected: self.arity,
                got: args.len(),
            });
        }
        (self.handler)(ctx, args)
    }
}

impl<C> Clone for BuiltinDescriptor<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            arity: self.arity,
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<C> fmt::Debug for BuiltinDescriptor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinDescriptor")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Registry of builtins indexed by name.
pub struct BuiltinRegistry<C> {
    builtins: HashMap<String, BuiltinDescriptor<C>>,
}

impl<C> BuiltinRegistry<C> {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            builtins: HashMap::new(),
        }
    }

    /// Register a builtin by name. A later registration replaces an earlier one.
    pub fn register(
        &mut self,
        name: &str,
        arity: Arity,
        handler: impl Fn(&C, &[Value]) -> BuiltinResult<Value> + Send + Sync + 'static,
    ) {
        let descriptor = BuiltinDescriptor {
            name: name.to_string(),
            arity,
            handler: Arc::new(handler),
        };
        if self.builtins.insert(name.to_string(), descriptor).is_some() {
            tracing::debug!(builtin = name, "replaced existing builtin");
        }
    }

    /// Look up a builtin by name
    pub fn get(&self, name: &str) -> Option<&BuiltinDescriptor<C>> {
        self.builtins.get(name)
    }

    /// Check if a builtin is registered
    pub fn contains(&self, name: &str) -> bool {
        self.builtins.contains_key(name)
    }

    /// Number of registered builtins
    pub fn len(&self) -> usize {
        self.builtins.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.builtins.is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builtins.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve `name`, check arity and invoke it.
    ///
    /// Errors from the implementation are returned unchanged.
    pub fn dispatch(&self, ctx: &C, name: &str, args: &[Value]) -> BuiltinResult<Value> {
        let descriptor = self
            .builtins
            .get(name)
            .ok_or_else(|| BuiltinError::UnknownBuiltin(name.to_string()))?;
        tracing::trace!(builtin = name, argc = args.len(), "dispatch");
        let result = descriptor.invoke(ctx, args);
        if let Err(e) = &result {
            tracing::debug!(builtin = name, error = %e, "builtin failed");
        }
        result
    }
}

impl<C> Default for BuiltinRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}
