//! JSON configuration documents
//!
//! Mapping from a JSON object to a [`ConfigNode`]:
//!
//! ```text
//! {
//!   "type": "cuda3d",                  -> attribute `type`
//!   "option": { "GPUIndex": 0 },       -> options
//!   "ProjectionKernel": "bicubic",     -> child node with content
//!   "VolumeGeometry": { ... }          -> child node, recursively
//! }
//! ```
//!
//! Nested numerical arrays are flattened row-major into a single list.

use crate::check::Config;
use crate::error::{ConfigError, Result};
use crate::node::ConfigNode;
use crate::value::ConfigValue;
use serde_json::{Map, Value};
use std::path::Path;

/// Key holding the options of a node
pub const OPTION_KEY: &str = "option";

/// Key mapped to the `type` attribute
pub const TYPE_KEY: &str = "type";

/// Root node name used for documents loaded from JSON
pub const ROOT_NAME: &str = "Config";

impl ConfigNode {
    /// Build a node from a JSON object
    pub fn from_json(name: impl Into<String>, value: &Value) -> Result<Self> {
        let name = name.into();
        let Value::Object(map) = value else {
            return Err(ConfigError::InvalidDocument(format!(
                "node \"{}\" must be a JSON object",
                name
            )));
        };
        node_from_map(name, map)
    }
}

impl Config {
    /// Parse a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Config::new(ConfigNode::from_json(ROOT_NAME, &value)?))
    }

    /// Load a JSON document from disk
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

fn node_from_map(name: String, map: &Map<String, Value>) -> Result<ConfigNode> {
    let mut node = ConfigNode::new(name);

    for (key, value) in map {
        match (key.as_str(), value) {
            (TYPE_KEY, Value::String(kind)) => node.set_attribute(TYPE_KEY, kind.as_str()),
            (TYPE_KEY, other) => {
                return Err(ConfigError::InvalidDocument(format!(
                    "\"type\" of \"{}\" must be a string, got {}",
                    node.name(),
                    other
                )));
            }
            (OPTION_KEY, Value::Object(options)) => {
                for (option, value) in options {
                    node.push_option(option.as_str(), scalar(option, value)?);
                }
            }
            (OPTION_KEY, other) => {
                return Err(ConfigError::InvalidDocument(format!(
                    "\"option\" of \"{}\" must be an object, got {}",
                    node.name(),
                    other
                )));
            }
            (_, Value::Object(child)) => node.push_child(node_from_map(key.clone(), child)?),
            (_, value) => {
                node.push_child(ConfigNode::new(key.as_str()).with_content(scalar(key, value)?))
            }
        }
    }

    Ok(node)
}

fn scalar(key: &str, value: &Value) -> Result<ConfigValue> {
    match value {
        Value::Bool(b) => Ok(ConfigValue::Bool(*b)),
        Value::Number(n) => n.as_f64().map(ConfigValue::Number).ok_or_else(|| {
            ConfigError::InvalidDocument(format!("\"{}\" is not representable: {}", key, n))
        }),
        Value::String(s) => Ok(ConfigValue::Text(s.clone())),
        Value::Array(_) => {
            let mut values = Vec::new();
            flatten(key, value, &mut values)?;
            Ok(ConfigValue::List(values))
        }
        Value::Null | Value::Object(_) => Err(ConfigError::InvalidDocument(format!(
            "\"{}\" must be a boolean, number, string or numerical array",
            key
        ))),
    }
}

fn flatten(key: &str, value: &Value, out: &mut Vec<f64>) -> Result<()> {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten(key, item, out)?;
            }
            Ok(())
        }
        Value::Number(n) => {
            let n = n.as_f64().ok_or_else(|| {
                ConfigError::InvalidDocument(format!("\"{}\" is not representable: {}", key, n))
            })?;
            out.push(n);
            Ok(())
        }
        other => Err(ConfigError::InvalidDocument(format!(
            "\"{}\" may only contain numbers, found {}",
            key, other
        ))),
    }
}
