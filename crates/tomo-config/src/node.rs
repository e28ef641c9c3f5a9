//! Configuration tree nodes
//!
//! A node has a name, optional content, attributes, ordered child nodes and
//! ordered options. Lookups return the first match in insertion order.

use crate::error::{ConfigError, Result};
use crate::value::ConfigValue;

/// A named node of the configuration tree
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigNode {
    name: String,
    content: Option<ConfigValue>,
    attributes: Vec<(String, String)>,
    children: Vec<ConfigNode>,
    options: Vec<(String, ConfigValue)>,
}

impl ConfigNode {
    /// Create an empty node
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the content
    pub fn with_content(mut self, content: impl Into<ConfigValue>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Add a child node
    pub fn with_child(mut self, child: ConfigNode) -> Self {
        self.children.push(child);
        self
    }

    /// Add a child node that only carries content
    pub fn with_value(self, name: impl Into<String>, content: impl Into<ConfigValue>) -> Self {
        self.with_child(ConfigNode::new(name).with_content(content))
    }

    /// Add an option
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.options.push((key.into(), value.into()));
        self
    }

    /// Set or replace an attribute
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Set the content in place
    pub fn set_content(&mut self, content: impl Into<ConfigValue>) {
        self.content = Some(content.into());
    }

    /// Append a child node in place
    pub fn push_child(&mut self, child: ConfigNode) {
        self.children.push(child);
    }

    /// Append an option in place
    pub fn push_option(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.options.push((key.into(), value.into()));
    }

    /// Node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node content
    pub fn content(&self) -> Option<&ConfigValue> {
        self.content.as_ref()
    }

    /// Attribute lookup
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Child nodes in order
    pub fn children(&self) -> &[ConfigNode] {
        &self.children
    }

    /// Options in order
    pub fn options(&self) -> &[(String, ConfigValue)] {
        &self.options
    }

    /// First child node with the given name
    pub fn single_node(&self, name: &str) -> Option<&ConfigNode> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Whether a child node with the given name exists
    pub fn has_node(&self, name: &str) -> bool {
        self.single_node(name).is_some()
    }

    /// Raw option lookup
    pub fn option(&self, key: &str) -> Option<&ConfigValue> {
        self.options
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Whether an option with the given key exists
    pub fn has_option(&self, key: &str) -> bool {
        self.option(key).is_some()
    }

    /// Numerical option, `default` when absent
    pub fn option_numerical(&self, key: &str, default: f64) -> Result<f64> {
        match self.option(key) {
            None => Ok(default),
            Some(value) => value.as_number().ok_or_else(|| ConfigError::NotNumeric {
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Boolean option, `default` when absent
    pub fn option_bool(&self, key: &str, default: bool) -> Result<bool> {
        match self.option(key) {
            None => Ok(default),
            Some(value) => value.as_bool().ok_or_else(|| ConfigError::NotBoolean {
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Content interpreted as text
    pub fn content_text(&self) -> Result<&str> {
        self.content
            .as_ref()
            .and_then(ConfigValue::as_text)
            .ok_or_else(|| ConfigError::NotText {
                key: self.name.clone(),
                value: self.describe_content(),
            })
    }

    /// Content interpreted as a number
    pub fn content_number(&self) -> Result<f64> {
        self.content
            .as_ref()
            .and_then(ConfigValue::as_number)
            .ok_or_else(|| ConfigError::NotNumeric {
                key: self.name.clone(),
                value: self.describe_content(),
            })
    }

    /// Content interpreted as a numerical list
    pub fn content_list(&self) -> Result<Vec<f64>> {
        self.content
            .as_ref()
            .and_then(ConfigValue::as_list)
            .ok_or_else(|| ConfigError::NotList {
                key: self.name.clone(),
                value: self.describe_content(),
            })
    }

    fn describe_content(&self) -> String {
        match &self.content {
            Some(value) => value.to_string(),
            None => "<empty>".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConfigNode {
        ConfigNode::new("Projector3D")
            .with_attribute("type", "cuda3d")
            .with_value("ProjectionKernel", "bicubic")
            .with_option("VoxelSuperSampling", 3)
            .with_option("DensityWeighting", "yes")
            .with_option("GPUIndex", "two")
    }

    #[test]
    fn test_node_lookup() {
        let node = sample();
        assert_eq!(node.attribute("type"), Some("cuda3d"));
        assert!(node.has_node("ProjectionKernel"));
        assert!(!node.has_node("ProjectionGeometry"));
        assert_eq!(
            node.single_node("ProjectionKernel")
                .unwrap()
                .content_text()
                .unwrap(),
            "bicubic"
        );
    }

    #[test]
    fn test_option_defaults() {
        let node = sample();
        assert_eq!(node.option_numerical("VoxelSuperSampling", 1.0).unwrap(), 3.0);
        assert_eq!(
            node.option_numerical("DetectorSuperSampling", 1.0).unwrap(),
            1.0
        );
        assert!(node.option_bool("DensityWeighting", false).unwrap());
        assert!(!node.option_bool("Missing", false).unwrap());
    }

    #[test]
    fn test_option_type_errors() {
        let node = sample();
        let err = node.option_numerical("GPUIndex", -1.0).unwrap_err();
        assert!(matches!(err, ConfigError::NotNumeric { ref key, .. } if key == "GPUIndex"));

        let err = node.option_bool("VoxelSuperSampling", false).unwrap_err();
        assert!(matches!(err, ConfigError::NotBoolean { .. }));
    }

    #[test]
    fn test_first_match_wins() {
        let node = ConfigNode::new("root")
            .with_option("GPUIndex", 1)
            .with_option("GPUIndex", 2);
        assert_eq!(node.option_numerical("GPUIndex", -1.0).unwrap(), 1.0);
    }

    #[test]
    fn test_content_errors() {
        let node = ConfigNode::new("DetectorRowCount");
        assert!(matches!(
            node.content_number(),
            Err(ConfigError::NotNumeric { .. })
        ));
        let node = ConfigNode::new("ProjectionKernel").with_content(4);
        assert!(matches!(node.content_text(), Err(ConfigError::NotText { .. })));
    }

    #[test]
    fn test_set_attribute_replaces() {
        let mut node = ConfigNode::new("ProjectionGeometry").with_attribute("type", "cone");
        node.set_attribute("type", "cone_vec");
        assert_eq!(node.attribute("type"), Some("cone_vec"));
    }
}
