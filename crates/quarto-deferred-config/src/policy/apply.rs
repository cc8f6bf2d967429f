/*
 * apply.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Deferred function invocation for `apply` tuples.
 */

//! Apply-tuple resolution.
//!
//! `(apply, (module, function, [args...]))` is replaced by the result of
//! calling `module.function(args...)` through the [`FunctionTable`]. A pair
//! tagged `apply` with any other payload is logged and left as a literal.

use crate::Result;
use crate::error::ResolveError;
use crate::invoke::{FunctionRef, FunctionTable};
use crate::resolver::Resolver;
use crate::types::ConfigValue;
use std::sync::Arc;

/// Tag atom of an apply tuple.
pub const APPLY_TAG: &str = "apply";

/// Resolves `apply` tuples by invoking functions.
pub struct ApplyTupleResolver {
    functions: Arc<FunctionTable>,
}

impl ApplyTupleResolver {
    pub fn new(functions: Arc<FunctionTable>) -> Self {
        Self { functions }
    }
}

/// The payload of an `apply`-tagged pair, if the value is one.
fn apply_payload(value: &ConfigValue) -> Option<&ConfigValue> {
    let (tag, payload) = value.as_pair()?;
    (tag.as_atom() == Some(APPLY_TAG)).then_some(payload)
}

fn parse_call(payload: &ConfigValue) -> Option<(FunctionRef, &[ConfigValue])> {
    let ConfigValue::Tuple(items) = payload else {
        return None;
    };
    let [module, function, ConfigValue::Sequence(args)] = items.as_slice() else {
        return None;
    };
    Some((
        FunctionRef::new(module.as_atom()?, function.as_atom()?),
        args.as_slice(),
    ))
}

impl Resolver for ApplyTupleResolver {
    fn name(&self) -> &str {
        "apply-tuple"
    }

    fn recognize(&self, value: &ConfigValue) -> bool {
        let Some(payload) = apply_payload(value) else {
            return false;
        };
        if parse_call(payload).is_some() {
            return true;
        }
        tracing::warn!(
            value = %value,
            "Malformed apply tuple left as-is; expected (apply, (module, function, [args]))"
        );
        false
    }

    fn transform(&self, value: ConfigValue) -> Result<ConfigValue> {
        let Some((function, args)) = apply_payload(&value).and_then(parse_call) else {
            return Err(ResolveError::UnrecognizedShape {
                resolver: self.name().to_string(),
                value: value.to_string(),
            });
        };

        tracing::debug!(%function, args = args.len(), "Invoking apply tuple");
        self.functions
            .invoke(&function, args)
            .map_err(|source| ResolveError::Invoke { function, source })
    }
}
