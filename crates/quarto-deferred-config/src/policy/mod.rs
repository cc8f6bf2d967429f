/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Built-in resolvers for deferred values.
 */

//! Built-in resolvers.
//!
//! - [`SystemTupleResolver`]: `(system, name, ...)` environment substitution
//! - [`ApplyTupleResolver`]: `(apply, (module, function, args))` invocation

mod apply;
mod system;

pub use apply::{APPLY_TAG, ApplyTupleResolver};
pub use system::{SYSTEM_TAG, SystemTupleResolver};
