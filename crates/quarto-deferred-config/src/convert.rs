//! Conversion from YAML to ConfigValue.
//!
//! YAML sequences become `Sequence`s, mappings become `Mapping`s (keys are
//! converted like any other value), and scalars map to the matching `Scalar`.
//! YAML has no atoms, pairs or tuples, so deferred values are added to a
//! registry programmatically; YAML supplies the static part.

use crate::error::ConvertError;
use crate::types::{ConfigMap, ConfigValue};
use yaml_rust2::{Yaml, YamlLoader};

/// Convert a YAML value to a `ConfigValue`.
pub fn config_value_from_yaml(yaml: Yaml) -> Result<ConfigValue, ConvertError> {
    match yaml {
        Yaml::Null => Ok(ConfigValue::nil()),
        Yaml::Boolean(b) => Ok(ConfigValue::bool(b)),
        Yaml::Integer(i) => Ok(ConfigValue::integer(i)),
        Yaml::String(s) => Ok(ConfigValue::string(s)),
        real @ Yaml::Real(_) => real
            .as_f64()
            .map(ConfigValue::float)
            .ok_or(ConvertError::Unsupported("unparseable real")),
        Yaml::Array(items) => items
            .into_iter()
            .map(config_value_from_yaml)
            .collect::<Result<Vec<_>, _>>()
            .map(ConfigValue::Sequence),
        Yaml::Hash(hash) => {
            let mut map = ConfigMap::with_capacity(hash.len());
            for (key, value) in hash {
                map.insert(config_value_from_yaml(key)?, config_value_from_yaml(value)?);
            }
            Ok(ConfigValue::Mapping(map))
        }
        Yaml::Alias(_) => Err(ConvertError::Unsupported("alias")),
        Yaml::BadValue => Err(ConvertError::Unsupported("bad value")),
    }
}

/// Parse a YAML document into top-level configuration entries.
///
/// The document must be a mapping with string keys; an empty document yields
/// no entries. Entry order follows the document.
pub fn entries_from_yaml_str(source: &str) -> Result<Vec<(String, ConfigValue)>, ConvertError> {
    let docs = YamlLoader::load_from_str(source)?;
    let Some(doc) = docs.into_iter().next() else {
        return Ok(Vec::new());
    };

    match doc {
        Yaml::Null => Ok(Vec::new()),
        Yaml::Hash(hash) => hash
            .into_iter()
            .map(|(key, value)| match key {
                Yaml::String(key) => Ok((key, config_value_from_yaml(value)?)),
                other => Err(ConvertError::NonStringKey(format!("{:?}", other))),
            })
            .collect(),
        Yaml::Array(_) => Err(ConvertError::NotAMapping("a sequence")),
        _ => Err(ConvertError::NotAMapping("a scalar")),
    }
}
