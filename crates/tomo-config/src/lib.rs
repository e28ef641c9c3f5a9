//! Tomo Config - Configuration trees for component initialization
//!
//! Components are constructed from a hierarchical configuration tree. This
//! crate provides the tree itself, typed lookups with defaults, JSON loading
//! and the consumption tracker that reports entries no component read.
//!
//! # Consumption Tracking
//!
//! ```text
//! Config ──check("GpuProjector3D")──► ConfigStackCheck
//!                                       │ mark_node_parsed / mark_option_parsed
//!                                       ▼
//!                       drop of outermost scope ──► Config::unused()
//! ```
//!
//! Every key a component examines is marked, whether or not it was present.
//! Anything left over after the outermost scope closes is a typo or a setting
//! the component does not support.

pub mod check;
pub mod error;
pub mod json;
pub mod node;
pub mod value;

pub use check::{Config, ConfigStackCheck, EntryKind, UnusedEntry};
pub use error::{ConfigError, Result};
pub use node::ConfigNode;
pub use value::ConfigValue;
