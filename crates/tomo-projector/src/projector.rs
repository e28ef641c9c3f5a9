//! Projector abstraction
//!
//! Every projector type implements [`Projector3D`]. The shared base step,
//! [`ProjectorBase`], builds the geometries a projector config may carry and
//! holds them for the concrete type.

use crate::error::{ProjectorError, Result};
use crate::parameters::ProjectorParameters;
use std::fmt;
use tomo_config::Config;
use tomo_geometry::{GeometryKind, ProjectionGeometry3D, VolumeGeometry3D};
use tracing::{debug, warn};

/// Child node holding the projection geometry
pub const PROJECTION_GEOMETRY: &str = "ProjectionGeometry";
/// Child node holding the volume geometry
pub const VOLUME_GEOMETRY: &str = "VolumeGeometry";

const BASE_COMPONENT: &str = "Projector3D";

/// Lifecycle state of a projector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleState {
    #[default]
    Uninitialized,
    Ready,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Ready => write!(f, "ready"),
        }
    }
}

/// Check that both geometries are present and initialized
///
/// The projection geometry is checked first. Neither geometry is modified.
pub fn readiness(
    component: &str,
    projection: Option<&ProjectionGeometry3D>,
    volume: Option<&VolumeGeometry3D>,
) -> Result<()> {
    if !projection.is_some_and(|g| g.is_initialized()) {
        return Err(ProjectorError::MissingDependency {
            component: component.to_string(),
            dependency: "ProjectionGeometry3D",
        });
    }
    if !volume.is_some_and(|g| g.is_initialized()) {
        return Err(ProjectorError::MissingDependency {
            component: component.to_string(),
            dependency: "VolumeGeometry3D",
        });
    }
    Ok(())
}

/// Like [`readiness`], logging the failure instead of returning it
pub fn check_ready(
    component: &str,
    projection: Option<&ProjectionGeometry3D>,
    volume: Option<&VolumeGeometry3D>,
) -> bool {
    match readiness(component, projection, volume) {
        Ok(()) => true,
        Err(e) => {
            warn!(component, "{}", e);
            false
        }
    }
}

/// A configurable 3D projector
pub trait Projector3D: fmt::Debug {
    /// Registry name of the projector type
    fn type_name(&self) -> &'static str;

    /// Configure from `cfg` and validate readiness
    ///
    /// Re-initializing a ready projector clears it first. On failure the
    /// projector is left uninitialized.
    fn initialize(&mut self, cfg: &Config) -> Result<()>;

    /// Release geometries and parameters
    fn clear(&mut self);

    fn state(&self) -> LifecycleState;

    fn is_initialized(&self) -> bool {
        self.state() == LifecycleState::Ready
    }

    /// Parameters of the last successful parse
    fn parameters(&self) -> Option<&ProjectorParameters>;

    fn projection_geometry(&self) -> Option<&ProjectionGeometry3D>;

    fn volume_geometry(&self) -> Option<&VolumeGeometry3D>;

    /// Human readable description
    fn description(&self) -> String {
        String::new()
    }
}

/// Geometry ownership and the base initialization step
#[derive(Debug, Clone, Default)]
pub struct ProjectorBase {
    projection: Option<ProjectionGeometry3D>,
    volume: Option<VolumeGeometry3D>,
}

impl ProjectorBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build geometries from the `ProjectionGeometry` and `VolumeGeometry`
    /// child nodes of `cfg`
    ///
    /// Absent nodes keep the geometry already held. On error nothing is
    /// replaced.
    pub fn initialize(&mut self, cfg: &Config) -> Result<()> {
        *self = self.configured(cfg)?;
        Ok(())
    }

    /// The geometries `cfg` describes, falling back to the held ones
    ///
    /// `self` is left untouched, so a caller can run further checks before
    /// committing the result. Entries the geometries leave unread are
    /// reported with the projector config.
    pub fn configured(&self, cfg: &Config) -> Result<ProjectorBase> {
        let cc = cfg.check(BASE_COMPONENT);
        cc.node()?;

        cc.mark_node_parsed(PROJECTION_GEOMETRY);
        let projection = match cfg.sub_config(PROJECTION_GEOMETRY) {
            Some(sub) => {
                let geometry = ProjectionGeometry3D::from_config(&sub);
                cc.merge_unused(&sub);
                Some(geometry?)
            }
            None => self.projection.clone(),
        };

        cc.mark_node_parsed(VOLUME_GEOMETRY);
        let volume = match cfg.sub_config(VOLUME_GEOMETRY) {
            Some(sub) => {
                let geometry = VolumeGeometry3D::from_config(&sub);
                cc.merge_unused(&sub);
                Some(geometry?)
            }
            None => self.volume.clone(),
        };

        let base = ProjectorBase { projection, volume };
        debug!(
            projection = ?base.geometry_kind(),
            volume = base.volume.is_some(),
            "base projector step complete"
        );
        Ok(base)
    }

    /// Take ownership of caller-built geometries
    pub fn attach(&mut self, projection: ProjectionGeometry3D, volume: VolumeGeometry3D) {
        self.projection = Some(projection);
        self.volume = Some(volume);
    }

    /// Drop both geometries
    pub fn clear(&mut self) {
        self.projection = None;
        self.volume = None;
    }

    pub fn projection(&self) -> Option<&ProjectionGeometry3D> {
        self.projection.as_ref()
    }

    pub fn volume(&self) -> Option<&VolumeGeometry3D> {
        self.volume.as_ref()
    }

    /// Kind of the held projection geometry
    pub fn geometry_kind(&self) -> Option<GeometryKind> {
        self.projection.as_ref().map(ProjectionGeometry3D::kind)
    }
}
