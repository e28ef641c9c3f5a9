//! Configuration consumption tracking
//!
//! Components open a [`ConfigStackCheck`] scope while they read a [`Config`]
//! and mark every node and option they examine. Scopes nest: a base step and
//! a specialised step can each open their own scope on the same config. When
//! the outermost scope is dropped, on success and error paths alike, every
//! direct child node and option of the root that was never marked is recorded
//! as unused and logged.

use crate::error::{ConfigError, Result};
use crate::node::ConfigNode;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, warn};

/// Kind of an unused configuration entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Node,
    Option,
}

/// An entry of the configuration that no component read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedEntry {
    /// Component whose scope reported the entry
    pub component: String,
    pub kind: EntryKind,
    pub name: String,
}

impl UnusedEntry {
    /// Shorthand for an unused option
    pub fn option(component: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            kind: EntryKind::Option,
            name: name.into(),
        }
    }

    /// Shorthand for an unused node
    pub fn node(component: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            kind: EntryKind::Node,
            name: name.into(),
        }
    }
}

impl fmt::Display for UnusedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EntryKind::Node => write!(f, "unused node \"{}\"", self.name),
            EntryKind::Option => write!(f, "unused option \"{}\"", self.name),
        }
    }
}

#[derive(Debug, Default)]
struct CheckData {
    depth: usize,
    component: Option<&'static str>,
    parsed_nodes: BTreeSet<String>,
    parsed_options: BTreeSet<String>,
    nested: Vec<UnusedEntry>,
}

/// A configuration handle as passed to component initialization
///
/// Wraps the root node together with the consumption state of the current
/// initialization call and the report of the last completed one.
#[derive(Debug, Default)]
pub struct Config {
    root: Option<ConfigNode>,
    check: RefCell<CheckData>,
    unused: RefCell<Vec<UnusedEntry>>,
}

impl Config {
    /// Wrap a root node
    pub fn new(root: ConfigNode) -> Self {
        Self {
            root: Some(root),
            ..Default::default()
        }
    }

    /// A handle without a root node
    ///
    /// Components reject it with a precondition error.
    pub fn detached() -> Self {
        Self::default()
    }

    /// The root node, if any
    pub fn root(&self) -> Option<&ConfigNode> {
        self.root.as_ref()
    }

    /// The root node, or a precondition error naming `component`
    pub fn node(&self, component: &str) -> Result<&ConfigNode> {
        self.root.as_ref().ok_or_else(|| ConfigError::MissingRoot {
            component: component.to_string(),
        })
    }

    /// Sub-configuration for a child node
    pub fn sub_config(&self, name: &str) -> Option<Config> {
        self.root
            .as_ref()
            .and_then(|root| root.single_node(name))
            .map(|node| Config::new(node.clone()))
    }

    /// Open a tracking scope for `component`
    pub fn check(&self, component: &'static str) -> ConfigStackCheck<'_> {
        let mut data = self.check.borrow_mut();
        if data.depth == 0 {
            data.component = Some(component);
            data.parsed_nodes.clear();
            data.parsed_options.clear();
            data.nested.clear();
            self.unused.borrow_mut().clear();
        }
        data.depth += 1;

        ConfigStackCheck {
            config: self,
            component,
        }
    }

    /// Entries reported unused by the last completed outermost scope
    pub fn unused(&self) -> Vec<UnusedEntry> {
        self.unused.borrow().clone()
    }

    /// Whether the last completed scope consumed every entry
    pub fn fully_consumed(&self) -> bool {
        self.unused.borrow().is_empty()
    }

    /// Fail with [`ConfigError::Unconsumed`] if entries were left unread
    pub fn ensure_consumed(&self) -> Result<()> {
        let unused = self.unused.borrow();
        if unused.is_empty() {
            return Ok(());
        }

        Err(ConfigError::Unconsumed {
            component: unused[0].component.clone(),
            entries: unused.iter().map(|entry| entry.to_string()).collect(),
        })
    }

    fn stop_parsing(&self, data: &CheckData) -> Vec<UnusedEntry> {
        let Some(root) = &self.root else {
            return Vec::new();
        };
        let component = data.component.unwrap_or("Config");

        let nodes = root
            .children()
            .iter()
            .map(|child| child.name())
            .filter(|name| !data.parsed_nodes.contains(*name))
            .map(|name| UnusedEntry::node(component, name));

        let options = root
            .options()
            .iter()
            .map(|(key, _)| key.as_str())
            .filter(|key| !data.parsed_options.contains(*key))
            .map(|key| UnusedEntry::option(component, key));

        let mut entries: Vec<UnusedEntry> = Vec::new();
        for entry in nodes.chain(options).chain(data.nested.iter().cloned()) {
            if !entries.contains(&entry) {
                entries.push(entry);
            }
        }
        entries
    }
}

impl From<ConfigNode> for Config {
    fn from(root: ConfigNode) -> Self {
        Self::new(root)
    }
}

/// Scoped consumption tracker over a [`Config`]
pub struct ConfigStackCheck<'a> {
    config: &'a Config,
    component: &'static str,
}

impl<'a> ConfigStackCheck<'a> {
    /// Component that opened this scope
    pub fn component(&self) -> &'static str {
        self.component
    }

    /// The tracked configuration
    pub fn config(&self) -> &'a Config {
        self.config
    }

    /// The root node, or a precondition error naming this component
    pub fn node(&self) -> Result<&'a ConfigNode> {
        self.config.node(self.component)
    }

    /// Record that the child node `name` was examined
    pub fn mark_node_parsed(&self, name: &str) {
        self.config
            .check
            .borrow_mut()
            .parsed_nodes
            .insert(name.to_string());
    }

    /// Carry the report of a sub-configuration into this one
    ///
    /// Used when a child node is handed to another component that tracks its
    /// own scope; its leftovers are reported with the parent's.
    pub fn merge_unused(&self, sub: &Config) {
        let sub_unused = sub.unused();
        self.config.check.borrow_mut().nested.extend(sub_unused);
    }

    /// Record that the option `key` was examined
    pub fn mark_option_parsed(&self, key: &str) {
        self.config
            .check
            .borrow_mut()
            .parsed_options
            .insert(key.to_string());
    }
}

impl Drop for ConfigStackCheck<'_> {
    fn drop(&mut self) {
        let mut data = self.config.check.borrow_mut();
        data.depth = data.depth.saturating_sub(1);
        if data.depth > 0 {
            return;
        }

        let entries = self.config.stop_parsing(&data);
        if entries.is_empty() {
            debug!(component = self.component, "configuration fully consumed");
        } else {
            let listed: Vec<String> = entries.iter().map(|entry| entry.to_string()).collect();
            warn!(
                component = data.component.unwrap_or(self.component),
                unused = %listed.join(", "),
                "unused configuration entries"
            );
        }

        data.component = None;
        data.parsed_nodes.clear();
        data.parsed_options.clear();
        data.nested.clear();
        *self.config.unused.borrow_mut() = entries;
    }
}
