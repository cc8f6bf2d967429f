/*
 * record.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Opaque structured values and the key-value enumeration capability.
 */

//! Record values.
//!
//! A record is an application-defined structured value embedded in a config
//! tree. By default the walk treats it as a leaf: it may be replaced wholesale
//! but its fields are never visited.
//!
//! A record type can opt into container semantics by returning itself from
//! [`ConfigRecord::as_key_values`]. The walk then folds it into a `Mapping`,
//! visiting every entry. The contract is narrow: [`KeyValueEnumerable::enumerate`]
//! must yield `Pair`s only. Violations are caught at walk time, logged, and
//! the record is left as it was.

use crate::error::EnumerationError;
use crate::types::ConfigValue;
use std::fmt;

/// An opaque structured value.
pub trait ConfigRecord: fmt::Debug + Send + Sync {
    /// Name of the record type, used for display and equality.
    fn type_name(&self) -> &str;

    /// Named fields, used for display and equality.
    fn fields(&self) -> Vec<(String, ConfigValue)>;

    /// Probe the key-value enumeration capability.
    fn as_key_values(&self) -> Option<&dyn KeyValueEnumerable> {
        None
    }
}

/// Capability: iterable as a sequence of (key, value) pairs.
pub trait KeyValueEnumerable {
    /// Enumerate entries. Every item must be a `ConfigValue::Pair`.
    fn enumerate(&self) -> Result<Vec<ConfigValue>, EnumerationError>;
}

/// Enumerate and check the pair contract.
pub fn enumerate_pairs(
    enumerable: &dyn KeyValueEnumerable,
) -> Result<Vec<(ConfigValue, ConfigValue)>, EnumerationError> {
    enumerable
        .enumerate()?
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            ConfigValue::Pair(pair) => Ok(*pair),
            other => Err(EnumerationError::NotAPair {
                index,
                found: other.to_string(),
            }),
        })
        .collect()
}

/// A record built from named fields.
///
/// Field names become atom keys when the record is enumerable.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRecord {
    type_name: String,
    fields: Vec<(String, ConfigValue)>,
    enumerable: bool,
}

impl FieldRecord {
    /// Create a record that the walk treats as a leaf.
    pub fn opaque(type_name: impl Into<String>, fields: Vec<(String, ConfigValue)>) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
            enumerable: false,
        }
    }

    /// Create a record that the walk folds into a mapping.
    pub fn enumerable(type_name: impl Into<String>, fields: Vec<(String, ConfigValue)>) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
            enumerable: true,
        }
    }
}

impl ConfigRecord for FieldRecord {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn fields(&self) -> Vec<(String, ConfigValue)> {
        self.fields.clone()
    }

    fn as_key_values(&self) -> Option<&dyn KeyValueEnumerable> {
        if self.enumerable {
            Some(self as &dyn KeyValueEnumerable)
        } else {
            None
        }
    }
}

impl KeyValueEnumerable for FieldRecord {
    fn enumerate(&self) -> Result<Vec<ConfigValue>, EnumerationError> {
        Ok(self
            .fields
            .iter()
            .map(|(name, value)| ConfigValue::pair(ConfigValue::atom(name), value.clone()))
            .collect())
    }
}
