//! Host function registry.
//!
//! Hosts bind names to callables; `call` statements invoke them with
//! positionally evaluated arguments.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use palaver_foundation::{Error, ErrorKind, Result, Value};

/// A host-supplied function.
pub type HostFn = Arc<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;

/// Name to host function bindings.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, HostFn>,
}

impl FunctionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `function` under `name`, replacing any previous binding.
    pub fn register<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
    }

    /// Removes the binding for `name`, returning true if one existed.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.functions.remove(name).is_some()
    }

    /// Looks up a function.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&HostFn> {
        self.functions.get(name)
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Invokes `name` with `args`.
    ///
    /// # Errors
    /// Returns [`ErrorKind::UnregisteredFunction`] if nothing is bound to
    /// `name`, or whatever the function itself reports.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        let function = self
            .get(name)
            .ok_or_else(|| Error::new(ErrorKind::UnregisteredFunction(name.to_string())))?;
        function(args)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}
