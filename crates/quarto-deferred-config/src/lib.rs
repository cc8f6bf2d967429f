//! Startup-time resolution of deferred configuration values.
//!
//! Some configuration values cannot be known when configuration is written:
//! a port read from the environment, a secret fetched by calling a function.
//! This crate lets such values be written as tagged placeholders and replaces
//! them, once, before the rest of the process reads its configuration.
//!
//! # Key Features
//!
//! - **Generic replacing walk**: [`walk`] rebuilds any [`ConfigValue`] tree,
//!   replacing the nodes a [`Resolver`] recognizes
//! - **Shape-aware recursion**: containers are offered to the resolver whole
//!   first, and the resulting shape decides whether children are visited
//! - **Record capability**: application records opt into container semantics
//!   through [`ConfigRecord::as_key_values`]; broken enumerations are logged,
//!   not fatal
//! - **Built-in policies**: `system` tuples ([`SystemTupleResolver`]) and
//!   `apply` tuples ([`ApplyTupleResolver`])
//!
//! # Architecture
//!
//! - [`ConfigValue`]: leaves, sequences, mappings, pairs, tuples and records
//! - [`Resolver`]: a recognizer/transformer pair
//! - [`Populator`]: runs resolvers as sequential passes over an application's
//!   entries in a [`ConfigRegistry`] and writes the results back
//! - [`EnvLookup`] and [`FunctionTable`]: the environment and the functions
//!   the built-in policies call out to
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use quarto_deferred_config::{
//!     ConfigRegistry, ConfigValue, FunctionTable, InMemoryRegistry, MapEnv, populate,
//! };
//!
//! let mut registry = InMemoryRegistry::new();
//! registry
//!     .load_yaml("web", "host: localhost\n")
//!     .unwrap();
//! registry.put(
//!     "web",
//!     "port".to_string(),
//!     ConfigValue::tuple(vec![
//!         ConfigValue::atom("system"),
//!         ConfigValue::string("PORT"),
//!         ConfigValue::integer(8080),
//!         ConfigValue::pair(ConfigValue::atom("String"), ConfigValue::atom("to_integer")),
//!     ]),
//! );
//!
//! populate(
//!     &mut registry,
//!     "web",
//!     Arc::new(MapEnv::new().with("PORT", "4000")),
//!     Arc::new(FunctionTable::with_builtins()),
//! )
//! .unwrap();
//!
//! assert_eq!(registry.get("web", "port"), Some(&ConfigValue::integer(4000)));
//! assert_eq!(registry.get("web", "host"), Some(&ConfigValue::string("localhost")));
//! ```

mod convert;
mod env;
mod error;
mod invoke;
mod policy;
mod populate;
mod record;
mod registry;
mod resolver;
mod types;
mod walk;

pub use types::{ConfigMap, ConfigValue, Scalar, TupleItems};

pub use record::{ConfigRecord, FieldRecord, KeyValueEnumerable, enumerate_pairs};

pub use error::{ConvertError, EnumerationError, InvokeError, ResolveError, Result};

pub use resolver::{FnResolver, Resolver};

pub use walk::{walk, walk_with};

pub use policy::{APPLY_TAG, ApplyTupleResolver, SYSTEM_TAG, SystemTupleResolver};

pub use env::{EnvLookup, MapEnv, ProcessEnv};

pub use invoke::{FunctionRef, FunctionTable, NativeFn};

pub use registry::{ConfigRegistry, InMemoryRegistry};

pub use populate::{Populator, populate};

pub use convert::{config_value_from_yaml, entries_from_yaml_str};
