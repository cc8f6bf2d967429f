/*
 * invoke.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Function table for deferred invocation.
 */

//! Dynamic invocation of configured functions.
//!
//! Config trees refer to functions by `(module, function)` atom pairs. Those
//! references are resolved against a [`FunctionTable`] that the host builds at
//! startup from ordinary Rust closures; nothing is looked up by symbol at
//! runtime.
//!
//! ```rust
//! use quarto_deferred_config::{ConfigValue, FunctionRef, FunctionTable, InvokeError};
//!
//! let mut table = FunctionTable::with_builtins();
//! table.register("Secrets", "api_key", 1, |args| match args[0].as_str() {
//!     Some(prefix) => Ok(ConfigValue::string(format!("{prefix}-1234"))),
//!     None => Err(InvokeError::BadArgument("expected a string".into())),
//! });
//!
//! let result = table
//!     .invoke(&FunctionRef::new("Secrets", "api_key"), &[ConfigValue::string("key")])
//!     .unwrap();
//! assert_eq!(result, ConfigValue::string("key-1234"));
//! ```

use crate::error::InvokeError;
use crate::types::ConfigValue;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A native function callable from configuration.
pub type NativeFn = dyn Fn(&[ConfigValue]) -> Result<ConfigValue, InvokeError> + Send + Sync;

/// Reference to a function by module and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionRef {
    pub module: String,
    pub function: String,
}

impl FunctionRef {
    pub fn new(module: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            function: function.into(),
        }
    }
}

impl fmt::Display for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.function)
    }
}

#[derive(Clone)]
struct Entry {
    arity: usize,
    func: Arc<NativeFn>,
}

/// Registered functions, keyed by [`FunctionRef`].
#[derive(Clone, Default)]
pub struct FunctionTable {
    entries: HashMap<FunctionRef, Entry>,
}

impl FunctionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table holding the `String` conversion builtins.
    ///
    /// Each takes one string argument:
    /// `to_integer`, `to_float`, `to_atom`, `to_boolean`, `upcase`, `downcase`, `trim`.
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        table
            .register("String", "to_integer", 1, |args| {
                let s = string_arg(args)?;
                s.parse::<i64>()
                    .map(ConfigValue::integer)
                    .map_err(|e| InvokeError::BadArgument(format!("{:?}: {}", s, e)))
            })
            .register("String", "to_float", 1, |args| {
                let s = string_arg(args)?;
                s.parse::<f64>()
                    .map(ConfigValue::float)
                    .map_err(|e| InvokeError::BadArgument(format!("{:?}: {}", s, e)))
            })
            .register("String", "to_atom", 1, |args| {
                Ok(ConfigValue::atom(string_arg(args)?))
            })
            .register("String", "to_boolean", 1, |args| match string_arg(args)? {
                "true" => Ok(ConfigValue::bool(true)),
                "false" => Ok(ConfigValue::bool(false)),
                other => Err(InvokeError::BadArgument(format!(
                    "{:?} is not a boolean",
                    other
                ))),
            })
            .register("String", "upcase", 1, |args| {
                Ok(ConfigValue::string(string_arg(args)?.to_uppercase()))
            })
            .register("String", "downcase", 1, |args| {
                Ok(ConfigValue::string(string_arg(args)?.to_lowercase()))
            })
            .register("String", "trim", 1, |args| {
                Ok(ConfigValue::string(string_arg(args)?.trim()))
            });
        table
    }

    /// Register a function. Replaces any previous entry with the same reference.
    pub fn register<F>(
        &mut self,
        module: impl Into<String>,
        function: impl Into<String>,
        arity: usize,
        func: F,
    ) -> &mut Self
    where
        F: Fn(&[ConfigValue]) -> Result<ConfigValue, InvokeError> + Send + Sync + 'static,
    {
        self.entries.insert(
            FunctionRef::new(module, function),
            Entry {
                arity,
                func: Arc::new(func),
            },
        );
        self
    }

    pub fn contains(&self, function: &FunctionRef) -> bool {
        self.entries.contains_key(function)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invoke a registered function.
    ///
    /// # Errors
    ///
    /// `UnknownFunction` if nothing is registered under `function`,
    /// `ArityMismatch` if `args` has the wrong length, or whatever the
    /// function itself returns.
    pub fn invoke(
        &self,
        function: &FunctionRef,
        args: &[ConfigValue],
    ) -> Result<ConfigValue, InvokeError> {
        let entry = self
            .entries
            .get(function)
            .ok_or_else(|| InvokeError::UnknownFunction(function.clone()))?;
        if entry.arity != args.len() {
            return Err(InvokeError::ArityMismatch {
                function: function.clone(),
                expected: entry.arity,
                actual: args.len(),
            });
        }
        (entry.func)(args)
    }
}

impl fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.entries.keys().map(|r| r.to_string()).collect();
        names.sort();
        f.debug_struct("FunctionTable")
            .field("functions", &names)
            .finish()
    }
}

fn string_arg(args: &[ConfigValue]) -> Result<&str, InvokeError> {
    match args {
        [value] => value
            .as_str()
            .ok_or_else(|| InvokeError::BadArgument(format!("expected a string, got {}", value))),
        _ => Err(InvokeError::BadArgument(format!(
            "expected one argument, got {}",
            args.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(table: &FunctionTable, module: &str, function: &str, arg: ConfigValue) -> Result<ConfigValue, InvokeError> {
        table.invoke(&FunctionRef::new(module, function), &[arg])
    }

    #[test]
    fn test_builtin_to_integer() {
        let table = FunctionTable::with_builtins();
        let result = call(&table, "String", "to_integer", ConfigValue::string("4000")).unwrap();
        assert_eq!(result, ConfigValue::integer(4000));
    }

    #[test]
    fn test_builtin_to_integer_rejects_garbage() {
        let table = FunctionTable::with_builtins();
        let err = call(&table, "String", "to_integer", ConfigValue::string("40x")).unwrap_err();
        assert!(matches!(err, InvokeError::BadArgument(_)));
    }

    #[test]
    fn test_builtin_rejects_nil() {
        let table = FunctionTable::with_builtins();
        let err = call(&table, "String", "to_integer", ConfigValue::nil()).unwrap_err();
        assert!(matches!(err, InvokeError::BadArgument(_)));
    }

    #[test]
    fn test_builtin_conversions() {
        let table = FunctionTable::with_builtins();
        assert_eq!(
            call(&table, "String", "to_float", ConfigValue::string("1.5")).unwrap(),
            ConfigValue::float(1.5)
        );
        assert_eq!(
            call(&table, "String", "to_atom", ConfigValue::string("info")).unwrap(),
            ConfigValue::atom("info")
        );
        assert_eq!(
            call(&table, "String", "to_boolean", ConfigValue::string("false")).unwrap(),
            ConfigValue::bool(false)
        );
        assert_eq!(
            call(&table, "String", "upcase", ConfigValue::string("abc")).unwrap(),
            ConfigValue::string("ABC")
        );
        assert_eq!(
            call(&table, "String", "trim", ConfigValue::string("  x ")).unwrap(),
            ConfigValue::string("x")
        );
    }

    #[test]
    fn test_builtins_registered() {
        let table = FunctionTable::with_builtins();
        assert!(table.contains(&FunctionRef::new("String", "to_integer")));
        assert!(table.contains(&FunctionRef::new("String", "trim")));
        assert!(!table.contains(&FunctionRef::new("String", "to_existing_atom")));
        assert!(!FunctionTable::new().contains(&FunctionRef::new("String", "trim")));
    }

    #[test]
    fn test_unknown_function() {
        let table = FunctionTable::new();
        let err = call(&table, "Nope", "missing", ConfigValue::nil()).unwrap_err();
        assert!(matches!(err, InvokeError::UnknownFunction(ref f) if f.to_string() == "Nope.missing"));
    }

    #[test]
    fn test_arity_mismatch() {
        let mut table = FunctionTable::new();
        table.register("M", "two", 2, |_| Ok(ConfigValue::nil()));
        let err = call(&table, "M", "two", ConfigValue::nil()).unwrap_err();
        assert!(matches!(
            err,
            InvokeError::ArityMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_register_replaces() {
        let mut table = FunctionTable::new();
        table.register("M", "f", 0, |_| Ok(ConfigValue::integer(1)));
        table.register("M", "f", 0, |_| Ok(ConfigValue::integer(2)));
        assert_eq!(table.len(), 1);
        let result = table.invoke(&FunctionRef::new("M", "f"), &[]).unwrap();
        assert_eq!(result, ConfigValue::integer(2));
    }
}
