/*
 * walk.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The replacing walk over configuration values.
 */

//! Recursive replacement of recognized values.
//!
//! [`walk`] rebuilds a [`ConfigValue`] tree, replacing every node the
//! resolver recognizes. Containers are offered to the resolver whole before
//! their children are visited, and the shape *after* that step decides
//! whether recursion continues. A transform can therefore turn a mapping
//! into a leaf (or the reverse) and the walk follows its decision.
//!
//! Dispatch, in order:
//!
//! 1. Empty sequence: returned as-is, the resolver is not consulted.
//! 2. Non-empty sequence: each item is replaced if recognized and then walked.
//! 3. Record: folded like a mapping if it exposes the key-value capability,
//!    otherwise handled as a leaf.
//! 4. Mapping: replaced if recognized; if the result is still key-value
//!    enumerable, its keys are replaced if recognized (never recursed into)
//!    and its values are walked. Colliding keys keep the later value.
//! 5. Pair: replaced if recognized; if still a pair, both components are walked.
//! 6. Anything else: replaced if recognized.
//!
//! Only transform errors propagate. A record that claims the capability but
//! fails to enumerate is logged and left unchanged.

use crate::Result;
use crate::record::enumerate_pairs;
use crate::resolver::{FnResolver, Resolver};
use crate::types::{ConfigMap, ConfigValue};

/// Walk `value`, replacing nodes recognized by `resolver`.
///
/// # Errors
///
/// Returns the first error raised by `resolver.transform`.
pub fn walk(value: ConfigValue, resolver: &dyn Resolver) -> Result<ConfigValue> {
    match value {
        ConfigValue::Sequence(items) if items.is_empty() => Ok(ConfigValue::Sequence(items)),
        ConfigValue::Sequence(items) => walk_sequence(items, resolver),
        ConfigValue::Record(record) => {
            let value = ConfigValue::Record(record);
            if value.is_key_value_enumerable() {
                walk_mapping(value, resolver)
            } else {
                replace_if_recognized(value, resolver)
            }
        }
        value @ ConfigValue::Mapping(_) => walk_mapping(value, resolver),
        value @ ConfigValue::Pair(_) => walk_pair(value, resolver),
        value => replace_if_recognized(value, resolver),
    }
}

/// Walk `value` with a recognizer and transformer given as closures.
pub fn walk_with<R, T>(value: ConfigValue, recognize: R, transform: T) -> Result<ConfigValue>
where
    R: Fn(&ConfigValue) -> bool + Send + Sync,
    T: Fn(ConfigValue) -> Result<ConfigValue> + Send + Sync,
{
    walk(value, &FnResolver::new("walk", recognize, transform))
}

fn replace_if_recognized(value: ConfigValue, resolver: &dyn Resolver) -> Result<ConfigValue> {
    if resolver.recognize(&value) {
        resolver.transform(value)
    } else {
        Ok(value)
    }
}

fn walk_sequence(items: Vec<ConfigValue>, resolver: &dyn Resolver) -> Result<ConfigValue> {
    items
        .into_iter()
        .map(|item| {
            let item = replace_if_recognized(item, resolver)?;
            walk(item, resolver)
        })
        .collect::<Result<Vec<_>>>()
        .map(ConfigValue::Sequence)
}

fn walk_mapping(value: ConfigValue, resolver: &dyn Resolver) -> Result<ConfigValue> {
    let value = replace_if_recognized(value, resolver)?;
    let entries = match key_value_entries(value) {
        Entries::Pairs(entries) => entries,
        Entries::Opaque(value) => return Ok(value),
    };

    let mut walked = ConfigMap::with_capacity(entries.len());
    for (key, entry_value) in entries {
        let key = replace_if_recognized(key, resolver)?;
        let entry_value = walk(entry_value, resolver)?;
        walked.insert(key, entry_value);
    }
    Ok(ConfigValue::Mapping(walked))
}

fn walk_pair(value: ConfigValue, resolver: &dyn Resolver) -> Result<ConfigValue> {
    match replace_if_recognized(value, resolver)? {
        ConfigValue::Pair(pair) => {
            let (first, second) = *pair;
            Ok(ConfigValue::pair(
                walk(first, resolver)?,
                walk(second, resolver)?,
            ))
        }
        other => Ok(other),
    }
}

enum Entries {
    Pairs(Vec<(ConfigValue, ConfigValue)>),
    Opaque(ConfigValue),
}

fn key_value_entries(value: ConfigValue) -> Entries {
    match value {
        ConfigValue::Mapping(map) => Entries::Pairs(map.into_iter().collect()),
        ConfigValue::Record(record) => match record.as_key_values().map(enumerate_pairs) {
            Some(Ok(entries)) => Entries::Pairs(entries),
            Some(Err(error)) => {
                tracing::warn!(
                    record = record.type_name(),
                    %error,
                    "Record does not enumerate as key-value pairs; leaving it unchanged"
                );
                Entries::Opaque(ConfigValue::Record(record))
            }
            None => Entries::Opaque(ConfigValue::Record(record)),
        },
        other => Entries::Opaque(other),
    }
}
