/*
 * system.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Environment variable substitution for `system` tuples.
 */

//! System-tuple resolution.
//!
//! Recognized shapes, all tagged with the atom `system` and a non-empty
//! string variable name:
//!
//! | Shape | Result |
//! |---|---|
//! | `(system, name)` | the variable, or `nil` if unset |
//! | `(system, name, (m, f))` | `m.f` applied to the variable (or to `nil`) |
//! | `(system, name, default)` | the variable if set, else `default` |
//! | `(system, name, default, (m, f))` | `m.f` applied to the variable if set, else `default`; a falsy converted value also yields `default` |
//!
//! A converter is a pair of atoms. In the three-element form a converter-shaped
//! third element is always read as a converter.

use crate::Result;
use crate::env::EnvLookup;
use crate::error::ResolveError;
use crate::invoke::{FunctionRef, FunctionTable};
use crate::resolver::Resolver;
use crate::types::ConfigValue;
use std::sync::Arc;

/// Tag atom of a system tuple.
pub const SYSTEM_TAG: &str = "system";

/// Resolves `system` tuples from an environment.
pub struct SystemTupleResolver {
    env: Arc<dyn EnvLookup>,
    functions: Arc<FunctionTable>,
}

impl SystemTupleResolver {
    /// Create a resolver reading from `env` and converting through `functions`.
    pub fn new(env: Arc<dyn EnvLookup>, functions: Arc<FunctionTable>) -> Self {
        Self { env, functions }
    }

    fn convert(&self, converter: &FunctionRef, value: ConfigValue) -> Result<ConfigValue> {
        self.functions
            .invoke(converter, &[value])
            .map_err(|source| ResolveError::Invoke {
                function: converter.clone(),
                source,
            })
    }
}

struct SystemTuple<'a> {
    name: &'a str,
    default: Option<&'a ConfigValue>,
    converter: Option<FunctionRef>,
}

fn parse(value: &ConfigValue) -> Option<SystemTuple<'_>> {
    match value {
        ConfigValue::Pair(pair) => Some(SystemTuple {
            name: tagged_name(&pair.0, &pair.1)?,
            default: None,
            converter: None,
        }),
        ConfigValue::Tuple(items) => match items.as_slice() {
            [tag, name, third] => {
                let name = tagged_name(tag, name)?;
                Some(match converter_ref(third) {
                    Some(converter) => SystemTuple {
                        name,
                        default: None,
                        converter: Some(converter),
                    },
                    None => SystemTuple {
                        name,
                        default: Some(third),
                        converter: None,
                    },
                })
            }
            [tag, name, default, converter] => Some(SystemTuple {
                name: tagged_name(tag, name)?,
                default: Some(default),
                converter: Some(converter_ref(converter)?),
            }),
            _ => None,
        },
        _ => None,
    }
}

fn tagged_name<'a>(tag: &ConfigValue, name: &'a ConfigValue) -> Option<&'a str> {
    if tag.as_atom() != Some(SYSTEM_TAG) {
        return None;
    }
    name.as_str().filter(|name| !name.is_empty())
}

fn converter_ref(value: &ConfigValue) -> Option<FunctionRef> {
    let (module, function) = value.as_pair()?;
    Some(FunctionRef::new(module.as_atom()?, function.as_atom()?))
}

impl Resolver for SystemTupleResolver {
    fn name(&self) -> &str {
        "system-tuple"
    }

    fn recognize(&self, value: &ConfigValue) -> bool {
        parse(value).is_some()
    }

    fn transform(&self, value: ConfigValue) -> Result<ConfigValue> {
        let Some(tuple) = parse(&value) else {
            return Err(ResolveError::UnrecognizedShape {
                resolver: self.name().to_string(),
                value: value.to_string(),
            });
        };

        let found = self.env.env_get(tuple.name);
        tracing::debug!(
            variable = tuple.name,
            set = found.is_some(),
            "Resolving system tuple"
        );
        let found = found.map(ConfigValue::string);

        match (tuple.default, tuple.converter) {
            (None, None) => Ok(found.unwrap_or_else(ConfigValue::nil)),
            (None, Some(converter)) => {
                self.convert(&converter, found.unwrap_or_else(ConfigValue::nil))
            }
            (Some(default), None) => Ok(found.unwrap_or_else(|| default.clone())),
            (Some(default), Some(converter)) => match found {
                Some(found) => {
                    let converted = self.convert(&converter, found)?;
                    if converted.is_falsy() {
                        Ok(default.clone())
                    } else {
                        Ok(converted)
                    }
                }
                None => Ok(default.clone()),
            },
        }
    }
}
