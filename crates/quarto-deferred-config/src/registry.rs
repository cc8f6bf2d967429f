/*
 * registry.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Per-application configuration store.
 */

use crate::convert::entries_from_yaml_str;
use crate::error::ConvertError;
use crate::types::ConfigValue;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Key-value configuration store scoped by application name.
///
/// The populator reads an application's entries once, resolves them, and
/// writes each key back once. Hosts should populate before anything else
/// reads the configuration.
pub trait ConfigRegistry {
    /// All entries for `app`, in registry order. Unknown apps have no entries.
    fn get_all(&self, app: &str) -> Vec<(String, ConfigValue)>;

    /// Set `key` for `app`, replacing any previous value.
    fn put(&mut self, app: &str, key: String, value: ConfigValue);
}

/// Registry held in memory, preserving insertion order per application.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    apps: HashMap<String, IndexMap<String, ConfigValue>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, app: &str, key: &str) -> Option<&ConfigValue> {
        self.apps.get(app)?.get(key)
    }

    /// Load the entries of a YAML mapping into `app`.
    ///
    /// Existing keys are overwritten. Returns the number of entries loaded.
    pub fn load_yaml(&mut self, app: &str, source: &str) -> Result<usize, ConvertError> {
        let entries = entries_from_yaml_str(source)?;
        let count = entries.len();
        for (key, value) in entries {
            self.put(app, key, value);
        }
        Ok(count)
    }
}

impl ConfigRegistry for InMemoryRegistry {
    fn get_all(&self, app: &str) -> Vec<(String, ConfigValue)> {
        self.apps.get(app).map_or_else(Vec::new, |entries| {
            entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
    }

    fn put(&mut self, app: &str, key: String, value: ConfigValue) {
        self.apps
            .entry(app.to_string())
            .or_default()
            .insert(key, value);
    }
}
