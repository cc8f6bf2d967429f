/*
 * types.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Value model for deferred configuration resolution.
 */

//! Core type definitions for configuration values.

use crate::record::ConfigRecord;
use std::fmt;
use std::sync::Arc;

/// Terminal values. Never recursed into.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// The absent marker.
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Identifier-like symbol, used for tuple tags and function references.
    Atom(String),
    Binary(Vec<u8>),
}

/// A configuration value.
///
/// This is the recursive shape the replacing walk operates over. Containers
/// (`Sequence`, `Mapping`, `Pair`, and key-value enumerable `Record`s) are
/// recursed into; everything else is a leaf.
#[derive(Debug, Clone)]
pub enum ConfigValue {
    /// Opaque terminal value.
    Scalar(Scalar),

    /// Ordered list of values.
    Sequence(Vec<ConfigValue>),

    /// Key-value entries with value-equality keys.
    Mapping(ConfigMap),

    /// Exactly two components.
    ///
    /// Distinct from a two-element `Sequence`: a pair is a key-value
    /// association taken out of its mapping.
    Pair(Box<(ConfigValue, ConfigValue)>),

    /// Fixed-arity tuple of any arity other than two.
    ///
    /// Treated as a leaf by the walk. Built only through
    /// [`ConfigValue::tuple`], which turns arity two into a `Pair`.
    Tuple(TupleItems),

    /// Opaque structured value, possibly enumerable as key-value pairs.
    Record(Arc<dyn ConfigRecord>),
}

impl ConfigValue {
    pub fn nil() -> Self {
        ConfigValue::Scalar(Scalar::Nil)
    }

    pub fn bool(value: bool) -> Self {
        ConfigValue::Scalar(Scalar::Bool(value))
    }

    pub fn integer(value: i64) -> Self {
        ConfigValue::Scalar(Scalar::Integer(value))
    }

    pub fn float(value: f64) -> Self {
        ConfigValue::Scalar(Scalar::Float(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        ConfigValue::Scalar(Scalar::String(value.into()))
    }

    pub fn atom(name: impl Into<String>) -> Self {
        ConfigValue::Scalar(Scalar::Atom(name.into()))
    }

    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        ConfigValue::Scalar(Scalar::Binary(bytes.into()))
    }

    pub fn sequence(items: impl IntoIterator<Item = ConfigValue>) -> Self {
        ConfigValue::Sequence(items.into_iter().collect())
    }

    /// Build a mapping. Later entries overwrite earlier ones with an equal key.
    pub fn mapping(entries: impl IntoIterator<Item = (ConfigValue, ConfigValue)>) -> Self {
        ConfigValue::Mapping(entries.into_iter().collect())
    }

    pub fn pair(first: ConfigValue, second: ConfigValue) -> Self {
        ConfigValue::Pair(Box::new((first, second)))
    }

    /// Build a tuple, normalizing arity two to a `Pair`.
    pub fn tuple(items: Vec<ConfigValue>) -> Self {
        match <[ConfigValue; 2]>::try_from(items) {
            Ok([first, second]) => ConfigValue::pair(first, second),
            Err(items) => ConfigValue::Tuple(TupleItems(items)),
        }
    }

    pub fn record(record: impl ConfigRecord + 'static) -> Self {
        ConfigValue::Record(Arc::new(record))
    }

    /// Check if this is the absent marker.
    pub fn is_nil(&self) -> bool {
        matches!(self, ConfigValue::Scalar(Scalar::Nil))
    }

    /// Falsy values are `Nil` and `false`. Everything else is truthy.
    pub fn is_falsy(&self) -> bool {
        matches!(self, ConfigValue::Scalar(Scalar::Nil | Scalar::Bool(false)))
    }

    /// Check if the value can be folded as key-value pairs by the walk.
    ///
    /// True for mappings and for records exposing the enumeration capability.
    /// Enumeration itself may still fail at runtime.
    pub fn is_key_value_enumerable(&self) -> bool {
        match self {
            ConfigValue::Mapping(_) => true,
            ConfigValue::Record(record) => record.as_key_values().is_some(),
            _ => false,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            ConfigValue::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Get the atom name if this is an atom.
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            ConfigValue::Scalar(Scalar::Atom(name)) => Some(name),
            _ => None,
        }
    }

    /// Get the string contents if this is a string (not an atom).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ConfigValue::Scalar(Scalar::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<(&ConfigValue, &ConfigValue)> {
        match self {
            ConfigValue::Pair(pair) => Some((&pair.0, &pair.1)),
            _ => None,
        }
    }

    /// Look up a mapping entry by atom key.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.as_mapping()?.get(&ConfigValue::atom(key))
    }
}

impl PartialEq for ConfigValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ConfigValue::Scalar(a), ConfigValue::Scalar(b)) => a == b,
            (ConfigValue::Sequence(a), ConfigValue::Sequence(b)) => a == b,
            (ConfigValue::Mapping(a), ConfigValue::Mapping(b)) => a == b,
            (ConfigValue::Pair(a), ConfigValue::Pair(b)) => a == b,
            (ConfigValue::Tuple(a), ConfigValue::Tuple(b)) => a == b,
            (ConfigValue::Record(a), ConfigValue::Record(b)) => {
                Arc::ptr_eq(a, b) || (a.type_name() == b.type_name() && a.fields() == b.fields())
            }
            _ => false,
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::string(value)
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::string(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::integer(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::float(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::bool(value)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(items: Vec<ConfigValue>) -> Self {
        ConfigValue::Sequence(items)
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(map: ConfigMap) -> Self {
        ConfigValue::Mapping(map)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Nil => write!(f, "nil"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{:?}", x),
            Scalar::String(s) => write!(f, "{:?}", s),
            Scalar::Atom(name) => write!(f, "{}", name),
            Scalar::Binary(bytes) => write!(f, "<binary: {} bytes>", bytes.len()),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[ConfigValue]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Scalar(scalar) => write!(f, "{}", scalar),
            ConfigValue::Sequence(items) => {
                write!(f, "[")?;
                write_joined(f, items)?;
                write!(f, "]")
            }
            ConfigValue::Mapping(map) => write!(f, "{}", map),
            ConfigValue::Pair(pair) => write!(f, "({}, {})", pair.0, pair.1),
            ConfigValue::Tuple(items) => {
                write!(f, "(")?;
                write_joined(f, items.as_slice())?;
                write!(f, ")")
            }
            ConfigValue::Record(record) => {
                write!(f, "{}{{", record.type_name())?;
                for (i, (name, value)) in record.fields().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Components of a tuple whose arity is not two.
///
/// The field is private so that a two-component tuple can only exist as a
/// `Pair`.
#[derive(Debug, Clone, PartialEq)]
pub struct TupleItems(Vec<ConfigValue>);

impl TupleItems {
    pub fn as_slice(&self) -> &[ConfigValue] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<ConfigValue> {
        self.0
    }
}

/// Key-value entries of a `Mapping`.
///
/// Keys are arbitrary values compared with `PartialEq` (floats and records
/// included, so they are not hashed). Lookup and insert are linear in the
/// number of entries, and building a map of `n` entries is O(n²). This is
/// sized for configuration mappings, not bulk data. Inserting an existing key
/// replaces its value in place. Equality ignores entry order.
#[derive(Debug, Clone, Default)]
pub struct ConfigMap {
    entries: Vec<(ConfigValue, ConfigValue)>,
}

impl ConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert an entry, returning the previous value for an equal key.
    pub fn insert(&mut self, key: ConfigValue, value: ConfigValue) -> Option<ConfigValue> {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &ConfigValue) -> Option<&ConfigValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &ConfigValue) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ConfigValue, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &ConfigValue> {
        self.entries.iter().map(|(k, _)| k)
    }
}

impl PartialEq for ConfigMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl FromIterator<(ConfigValue, ConfigValue)> for ConfigMap {
    fn from_iter<I: IntoIterator<Item = (ConfigValue, ConfigValue)>>(iter: I) -> Self {
        let mut map = ConfigMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl IntoIterator for ConfigMap {
    type Item = (ConfigValue, ConfigValue);
    type IntoIter = std::vec::IntoIter<(ConfigValue, ConfigValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl fmt::Display for ConfigMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a(name: &str) -> ConfigValue {
        ConfigValue::atom(name)
    }

    #[test]
    fn test_tuple_of_two_is_pair() {
        let value = ConfigValue::tuple(vec![a("x"), ConfigValue::integer(1)]);
        assert!(matches!(value, ConfigValue::Pair(_)));
    }

    #[test]
    fn test_tuple_of_three_stays_tuple() {
        let value = ConfigValue::tuple(vec![a("x"), a("y"), a("z")]);
        assert!(matches!(value, ConfigValue::Tuple(ref items) if items.len() == 3));
    }

    #[test]
    fn test_tuple_items_never_hold_two_components() {
        for arity in 0..5i64 {
            let items: Vec<_> = (0..arity).map(ConfigValue::integer).collect();
            match ConfigValue::tuple(items.clone()) {
                ConfigValue::Pair(pair) => {
                    let (first, second) = *pair;
                    assert_eq!(arity, 2);
                    assert_eq!(vec![first, second], items);
                }
                ConfigValue::Tuple(tuple) => {
                    assert_ne!(tuple.len(), 2);
                    assert_eq!(tuple.is_empty(), arity == 0);
                    assert_eq!(tuple.as_slice(), items.as_slice());
                    assert_eq!(tuple.into_vec(), items);
                }
                other => panic!("unexpected tuple shape: {:?}", other),
            }
        }
    }

    #[test]
    fn test_accessors() {
        assert!(ConfigValue::nil().is_nil());
        assert!(!ConfigValue::bool(false).is_nil());
        assert_eq!(
            ConfigValue::integer(3).as_scalar(),
            Some(&Scalar::Integer(3))
        );
        assert_eq!(ConfigValue::sequence([]).as_scalar(), None);
        assert_eq!(
            ConfigValue::sequence([a("x")]).as_sequence(),
            Some([a("x")].as_slice())
        );
        assert_eq!(a("x").as_sequence(), None);
    }

    #[test]
    fn test_map_keys_and_contains() {
        let map: ConfigMap = vec![
            (a("b"), ConfigValue::integer(1)),
            (a("a"), ConfigValue::integer(2)),
        ]
        .into_iter()
        .collect();
        assert!(map.contains_key(&a("a")));
        assert!(!map.contains_key(&ConfigValue::string("a")));
        assert_eq!(map.keys().cloned().collect::<Vec<_>>(), vec![a("b"), a("a")]);
    }

    #[test]
    fn test_pair_differs_from_two_element_sequence() {
        let pair = ConfigValue::pair(a("x"), a("y"));
        let seq = ConfigValue::sequence([a("x"), a("y")]);
        assert_ne!(pair, seq);
    }

    #[test]
    fn test_falsy() {
        assert!(ConfigValue::nil().is_falsy());
        assert!(ConfigValue::bool(false).is_falsy());
        assert!(!ConfigValue::bool(true).is_falsy());
        assert!(!ConfigValue::integer(0).is_falsy());
        assert!(!ConfigValue::string("").is_falsy());
    }

    #[test]
    fn test_map_insert_last_write_wins() {
        let mut map = ConfigMap::new();
        assert_eq!(map.insert(a("k"), ConfigValue::integer(1)), None);
        assert_eq!(
            map.insert(a("k"), ConfigValue::integer(2)),
            Some(ConfigValue::integer(1))
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&a("k")), Some(&ConfigValue::integer(2)));
    }

    #[test]
    fn test_map_collect_collapses_duplicates() {
        let map: ConfigMap = vec![
            (a("k"), ConfigValue::integer(1)),
            (a("j"), ConfigValue::integer(2)),
            (a("k"), ConfigValue::integer(3)),
        ]
        .into_iter()
        .collect();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&a("k")), Some(&ConfigValue::integer(3)));
    }

    #[test]
    fn test_map_equality_ignores_order() {
        let left = ConfigValue::mapping([
            (a("a"), ConfigValue::integer(1)),
            (a("b"), ConfigValue::integer(2)),
        ]);
        let right = ConfigValue::mapping([
            (a("b"), ConfigValue::integer(2)),
            (a("a"), ConfigValue::integer(1)),
        ]);
        assert_eq!(left, right);
    }

    #[test]
    fn test_atom_and_string_are_distinct_keys() {
        let map = ConfigValue::mapping([
            (a("port"), ConfigValue::integer(1)),
            (ConfigValue::string("port"), ConfigValue::integer(2)),
        ]);
        assert_eq!(map.as_mapping().unwrap().len(), 2);
        assert_eq!(map.get("port"), Some(&ConfigValue::integer(1)));
    }

    #[test]
    fn test_display() {
        let value = ConfigValue::mapping([(
            a("c"),
            ConfigValue::sequence([
                ConfigValue::pair(a("a"), ConfigValue::integer(3)),
                ConfigValue::string("x"),
                ConfigValue::nil(),
            ]),
        )]);
        assert_eq!(value.to_string(), r#"{c: [(a, 3), "x", nil]}"#);
    }
}
