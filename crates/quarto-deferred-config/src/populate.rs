/*
 * populate.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Resolver pipeline over an application's configuration.
 */

//! Populating an application's configuration.
//!
//! A [`Populator`] holds an ordered list of resolvers. Each resolver runs as
//! a complete pass over every top-level value before the next one starts, so
//! a pass always sees the output of the previous pass. Top-level keys are
//! never walked.
//!
//! Values are written back only after every pass succeeds: a failing pass
//! leaves the registry untouched.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use quarto_deferred_config::{
//!     ConfigRegistry, ConfigValue, FunctionTable, InMemoryRegistry, MapEnv, Populator,
//! };
//!
//! let mut registry = InMemoryRegistry::new();
//! registry.put(
//!     "web",
//!     "port".to_string(),
//!     ConfigValue::tuple(vec![
//!         ConfigValue::atom("system"),
//!         ConfigValue::string("PORT"),
//!         ConfigValue::string("8080"),
//!     ]),
//! );
//!
//! let populator = Populator::with_defaults(
//!     Arc::new(MapEnv::new().with("PORT", "4000")),
//!     Arc::new(FunctionTable::with_builtins()),
//! );
//! populator.populate(&mut registry, "web").unwrap();
//!
//! assert_eq!(registry.get("web", "port"), Some(&ConfigValue::string("4000")));
//! ```

use crate::Result;
use crate::env::EnvLookup;
use crate::invoke::FunctionTable;
use crate::policy::{ApplyTupleResolver, SystemTupleResolver};
use crate::registry::ConfigRegistry;
use crate::resolver::Resolver;
use crate::types::ConfigValue;
use crate::walk::walk;
use std::sync::Arc;

/// An ordered pipeline of resolvers.
///
/// Resolvers run in insertion order.
pub struct Populator {
    resolvers: Vec<Box<dyn Resolver>>,
}

impl Populator {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// The default pipeline: system tuples, then apply tuples.
    pub fn with_defaults(env: Arc<dyn EnvLookup>, functions: Arc<FunctionTable>) -> Self {
        let mut populator = Self::new();
        populator.push(Box::new(SystemTupleResolver::new(env, functions.clone())));
        populator.push(Box::new(ApplyTupleResolver::new(functions)));
        populator
    }

    /// Add a resolver to the pipeline.
    pub fn push(&mut self, resolver: Box<dyn Resolver>) {
        self.resolvers.push(resolver);
    }

    /// Add multiple resolvers to the pipeline.
    pub fn extend(&mut self, resolvers: impl IntoIterator<Item = Box<dyn Resolver>>) {
        self.resolvers.extend(resolvers);
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// List the names of all resolvers in execution order.
    pub fn resolver_names(&self) -> Vec<&str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    /// Run every pass over `entries` without touching a registry.
    ///
    /// # Errors
    ///
    /// Returns the first transform error. Execution stops on error.
    pub fn resolve(&self, entries: Vec<(String, ConfigValue)>) -> Result<Vec<(String, ConfigValue)>> {
        let mut entries = entries;
        for resolver in &self.resolvers {
            tracing::debug!(
                resolver = resolver.name(),
                entries = entries.len(),
                "Running resolver pass"
            );
            entries = entries
                .into_iter()
                .map(|(key, value)| walk(value, &**resolver).map(|value| (key, value)))
                .collect::<Result<Vec<_>>>()?;
        }
        Ok(entries)
    }

    /// Resolve the configuration of `app` and write it back.
    ///
    /// # Errors
    ///
    /// Returns the first transform error; nothing is written in that case.
    pub fn populate(&self, registry: &mut dyn ConfigRegistry, app: &str) -> Result<()> {
        let resolved = self.resolve(registry.get_all(app))?;
        tracing::debug!(app, keys = resolved.len(), "Writing resolved configuration");
        for (key, value) in resolved {
            registry.put(app, key, value);
        }
        Ok(())
    }
}

impl Default for Populator {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve system and apply tuples in the configuration of `app`.
pub fn populate(
    registry: &mut dyn ConfigRegistry,
    app: &str,
    env: Arc<dyn EnvLookup>,
    functions: Arc<FunctionTable>,
) -> Result<()> {
    Populator::with_defaults(env, functions).populate(registry, app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use crate::registry::InMemoryRegistry;
    use crate::resolver::FnResolver;
    use std::sync::Mutex;

    fn tagging(name: &'static str, from: &'static str, to: &'static str) -> Box<dyn Resolver> {
        Box::new(FnResolver::new(
            name,
            move |v: &ConfigValue| v.as_atom() == Some(from),
            move |_: ConfigValue| Ok(ConfigValue::atom(to)),
        ))
    }

    #[test]
    fn test_empty_pipeline() {
        let populator = Populator::new();
        assert!(populator.is_empty());
        assert_eq!(populator.len(), 0);
        let entries = vec![("k".to_string(), ConfigValue::atom("v"))];
        assert_eq!(populator.resolve(entries.clone()).unwrap(), entries);
    }

    #[test]
    fn test_default_resolver_names() {
        let populator = Populator::with_defaults(
            Arc::new(crate::env::MapEnv::new()),
            Arc::new(FunctionTable::new()),
        );
        assert_eq!(populator.resolver_names(), vec!["system-tuple", "apply-tuple"]);
    }

    #[test]
    fn test_passes_run_in_sequence() {
        // The second pass only matches what the first pass produced.
        let mut populator = Populator::new();
        populator.push(tagging("first", "a", "b"));
        populator.push(tagging("second", "b", "c"));

        let resolved = populator
            .resolve(vec![("k".to_string(), ConfigValue::sequence([ConfigValue::atom("a")]))])
            .unwrap();
        assert_eq!(
            resolved,
            vec![("k".to_string(), ConfigValue::sequence([ConfigValue::atom("c")]))]
        );
    }

    #[test]
    fn test_passes_do_not_interleave() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut populator = Populator::new();
        for name in ["first", "second"] {
            let order = order.clone();
            populator.push(Box::new(FnResolver::new(
                name,
                move |v: &ConfigValue| {
                    order.lock().unwrap().push((name, v.to_string()));
                    false
                },
                |v: ConfigValue| Ok(v),
            )));
        }

        populator
            .resolve(vec![
                ("x".to_string(), ConfigValue::integer(1)),
                ("y".to_string(), ConfigValue::integer(2)),
            ])
            .unwrap();

        assert_eq!(
            *order.lock().unwrap(),
            vec![
                ("first", "1".to_string()),
                ("first", "2".to_string()),
                ("second", "1".to_string()),
                ("second", "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_keys_are_not_walked() {
        let mut registry = InMemoryRegistry::new();
        registry.put("app", "a".to_string(), ConfigValue::string("a"));

        let mut populator = Populator::new();
        populator.push(Box::new(FnResolver::new(
            "strings",
            |v: &ConfigValue| v.as_str() == Some("a"),
            |_: ConfigValue| Ok(ConfigValue::string("replaced")),
        )));
        populator.populate(&mut registry, "app").unwrap();

        assert_eq!(
            registry.get_all("app"),
            vec![("a".to_string(), ConfigValue::string("replaced"))]
        );
    }

    #[test]
    fn test_failure_writes_nothing() {
        let mut registry = InMemoryRegistry::new();
        registry.put("app", "ok".to_string(), ConfigValue::atom("a"));
        registry.put("app", "bad".to_string(), ConfigValue::atom("boom"));

        let mut populator = Populator::new();
        populator.push(tagging("first", "a", "b"));
        populator.push(Box::new(FnResolver::new(
            "failing",
            |v: &ConfigValue| v.as_atom() == Some("boom"),
            |_: ConfigValue| Err(ResolveError::resolver("failing", "boom")),
        )));

        let result = populator.populate(&mut registry, "app");

        assert!(result.is_err());
        assert_eq!(registry.get("app", "ok"), Some(&ConfigValue::atom("a")));
        assert_eq!(registry.get("app", "bad"), Some(&ConfigValue::atom("boom")));
    }
}
