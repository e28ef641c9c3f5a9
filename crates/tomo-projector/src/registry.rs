//! Projector registry
//!
//! Maps the `type` attribute of a projector configuration to a constructor.

use crate::error::{ProjectorError, Result};
use crate::gpu::GpuProjector3D;
use crate::projector::Projector3D;
use std::collections::HashMap;
use tomo_config::Config;
use tracing::debug;

/// Constructor for an uninitialized projector
pub type ProjectorConstructor = fn() -> Box<dyn Projector3D>;

/// Registry of projector types
#[derive(Debug, Clone, Default)]
pub struct ProjectorRegistry {
    constructors: HashMap<String, ProjectorConstructor>,
}

impl ProjectorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in projector type
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(GpuProjector3D::TYPE_NAME, gpu_projector);
        registry
    }

    /// Register a projector type, replacing any previous constructor
    pub fn register(&mut self, type_name: impl Into<String>, constructor: ProjectorConstructor) {
        let type_name = type_name.into();
        debug!(type_name = %type_name, "registered projector type");
        self.constructors.insert(type_name, constructor);
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name)
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Construct an uninitialized projector
    pub fn construct(&self, type_name: &str) -> Result<Box<dyn Projector3D>> {
        self.constructors
            .get(type_name)
            .map(|constructor| constructor())
            .ok_or_else(|| ProjectorError::UnknownType(type_name.to_string()))
    }

    /// Construct and initialize the projector described by `cfg`
    pub fn create(&self, cfg: &Config) -> Result<Box<dyn Projector3D>> {
        let root = cfg.node("ProjectorRegistry")?;
        let type_name = root.attribute("type").ok_or(ProjectorError::MissingType)?;

        let mut projector = self.construct(type_name)?;
        projector.initialize(cfg)?;
        Ok(projector)
    }
}

fn gpu_projector() -> Box<dyn Projector3D> {
    Box::new(GpuProjector3D::new())
}
