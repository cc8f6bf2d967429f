/*
 * resolver.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Recognizer/transformer pairs driving the replacing walk.
 */

//! The pluggable policy unit of the replacing walk.
//!
//! A [`Resolver`] bundles a recognizer predicate with a transformer. The walk
//! calls `transform` only on values for which `recognize` returned true, and
//! it never catches `transform` errors.

use crate::Result;
use crate::types::ConfigValue;

/// A recognizer/transformer pair.
///
/// # Thread Safety
///
/// Resolvers must be `Send + Sync` so a populator can be shared by a host.
pub trait Resolver: Send + Sync {
    /// Human-readable name for this resolver.
    ///
    /// Used for logging and debugging.
    fn name(&self) -> &str;

    /// Decide whether `value` should be replaced.
    fn recognize(&self, value: &ConfigValue) -> bool;

    /// Compute the replacement for a recognized value.
    ///
    /// # Errors
    ///
    /// Any error is fatal for the current pass.
    fn transform(&self, value: ConfigValue) -> Result<ConfigValue>;
}

/// A resolver built from two closures.
pub struct FnResolver<R, T> {
    name: String,
    recognize: R,
    transform: T,
}

impl<R, T> FnResolver<R, T>
where
    R: Fn(&ConfigValue) -> bool,
    T: Fn(ConfigValue) -> Result<ConfigValue>,
{
    pub fn new(name: impl Into<String>, recognize: R, transform: T) -> Self {
        Self {
            name: name.into(),
            recognize,
            transform,
        }
    }
}

impl<R, T> Resolver for FnResolver<R, T>
where
    R: Fn(&ConfigValue) -> bool + Send + Sync,
    T: Fn(ConfigValue) -> Result<ConfigValue> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn recognize(&self, value: &ConfigValue) -> bool {
        (self.recognize)(value)
    }

    fn transform(&self, value: ConfigValue) -> Result<ConfigValue> {
        (self.transform)(value)
    }
}

impl<R, T> std::fmt::Debug for FnResolver<R, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnResolver").field("name", &self.name).finish()
    }
}
