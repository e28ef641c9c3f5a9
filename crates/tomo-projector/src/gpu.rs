//! GPU-accelerated 3D projector
//!
//! Holds configuration and readiness only; the projection kernels that run on
//! the device live elsewhere and read [`ProjectorParameters`] from here.

use crate::error::Result;
use crate::parameters::ProjectorParameters;
use crate::projector::{LifecycleState, Projector3D, ProjectorBase, readiness};
use tomo_config::Config;
use tomo_geometry::{GeometryKind, ProjectionGeometry3D, VolumeGeometry3D};
use tracing::{debug, info, warn};

/// The `cuda3d` projector
#[derive(Debug, Default)]
pub struct GpuProjector3D {
    base: ProjectorBase,
    parameters: Option<ProjectorParameters>,
    state: LifecycleState,
}

impl GpuProjector3D {
    /// Registry name
    pub const TYPE_NAME: &'static str = "cuda3d";
    /// Component name used in diagnostics and consumption reports
    pub const COMPONENT: &'static str = "GpuProjector3D";

    pub fn new() -> Self {
        Self::default()
    }

    /// Create a projector owning the given geometries
    pub fn with_geometries(projection: ProjectionGeometry3D, volume: VolumeGeometry3D) -> Self {
        let mut projector = Self::new();
        projector.attach_geometries(projection, volume);
        projector
    }

    /// Replace the held geometries
    ///
    /// Readiness has to be established again by [`Projector3D::initialize`].
    pub fn attach_geometries(&mut self, projection: ProjectionGeometry3D, volume: VolumeGeometry3D) {
        self.base.attach(projection, volume);
        self.state = LifecycleState::Uninitialized;
    }

    /// Parse parameters only
    ///
    /// Geometries are neither built nor checked, and the lifecycle state is
    /// left as it is. The parsed parameters are stored on success.
    pub fn initialize_parameters(&mut self, cfg: &Config) -> Result<ProjectorParameters> {
        let parameters = Self::parse_parameters(cfg, self.geometry_kind())?;
        self.parameters = Some(parameters);
        Ok(parameters)
    }

    /// Parse the parameters of `cfg` for a given projection geometry kind
    ///
    /// Consumption is tracked and reported under [`Self::COMPONENT`]. No
    /// projector state is involved.
    pub fn parse_parameters(
        cfg: &Config,
        geometry: Option<GeometryKind>,
    ) -> Result<ProjectorParameters> {
        let cc = cfg.check(Self::COMPONENT);
        ProjectorParameters::parse(&cc, geometry)
    }

    /// Kind of the held projection geometry
    pub fn geometry_kind(&self) -> Option<GeometryKind> {
        self.base.geometry_kind()
    }

    /// Run every initialization step without touching `self`
    fn configure(&self, cfg: &Config) -> Result<(ProjectorBase, ProjectorParameters)> {
        let _cc = cfg.check(Self::COMPONENT);

        let base = self.base.configured(cfg)?;
        let parameters = Self::parse_parameters(cfg, base.geometry_kind())?;
        readiness(Self::COMPONENT, base.projection(), base.volume())?;

        Ok((base, parameters))
    }
}

impl Projector3D for GpuProjector3D {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn initialize(&mut self, cfg: &Config) -> Result<()> {
        if self.state == LifecycleState::Ready {
            self.clear();
        }

        match self.configure(cfg) {
            Ok((base, parameters)) => {
                info!(
                    kernel = %parameters.kernel,
                    geometry = ?base.geometry_kind(),
                    gpu_index = parameters.gpu_index,
                    "projector ready"
                );
                self.base = base;
                self.parameters = Some(parameters);
                self.state = LifecycleState::Ready;
                Ok(())
            }
            Err(e) => {
                warn!(component = Self::COMPONENT, error = %e, "projector initialization failed");
                self.parameters = None;
                self.state = LifecycleState::Uninitialized;
                Err(e)
            }
        }
    }

    fn clear(&mut self) {
        self.base.clear();
        self.parameters = None;
        self.state = LifecycleState::Uninitialized;
    }

    fn state(&self) -> LifecycleState {
        self.state
    }

    fn parameters(&self) -> Option<&ProjectorParameters> {
        self.parameters.as_ref()
    }

    fn projection_geometry(&self) -> Option<&ProjectionGeometry3D> {
        self.base.projection()
    }

    fn volume_geometry(&self) -> Option<&VolumeGeometry3D> {
        self.base.volume()
    }
}

impl Drop for GpuProjector3D {
    fn drop(&mut self) {
        if self.state == LifecycleState::Ready {
            debug!("releasing ready projector");
            self.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProjectorError;
    use crate::kernel::ProjectionKernel;
    use crate::parameters::{DENSITY_WEIGHTING, GPU_INDEX, GPU_INDEX_LEGACY};
    use crate::projector::{PROJECTION_GEOMETRY, VOLUME_GEOMETRY};
    use tomo_config::{ConfigNode, UnusedEntry};
    use tomo_geometry::{ParallelGeometry3D, VectorGeometry3D};

    fn volume_node() -> ConfigNode {
        ConfigNode::new(VOLUME_GEOMETRY)
            .with_value("GridColCount", 16)
            .with_value("GridRowCount", 16)
            .with_value("GridSliceCount", 8)
    }

    fn parallel_node() -> ConfigNode {
        ConfigNode::new(PROJECTION_GEOMETRY)
            .with_attribute("type", "parallel3d")
            .with_value("DetectorRowCount", 8)
            .with_value("DetectorColCount", 16)
            .with_value("DetectorSpacingX", 1.0)
            .with_value("DetectorSpacingY", 1.0)
            .with_value("ProjectionAngles", vec![0.0, 0.1, 0.2])
    }

    fn cone_vec_node() -> ConfigNode {
        let vector = vec![
            0.0, -100.0, 0.0, 0.0, 50.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
        ];
        ConfigNode::new(PROJECTION_GEOMETRY)
            .with_attribute("type", "cone_vec")
            .with_value("DetectorRowCount", 8)
            .with_value("DetectorColCount", 16)
            .with_value("Vectors", vector)
    }

    fn projector_node(geometry: ConfigNode) -> ConfigNode {
        ConfigNode::new("Projector3D")
            .with_attribute("type", GpuProjector3D::TYPE_NAME)
            .with_child(geometry)
            .with_child(volume_node())
    }

    fn parallel() -> ProjectionGeometry3D {
        ProjectionGeometry3D::Parallel3d(ParallelGeometry3D::new(
            8,
            16,
            [1.0, 1.0],
            vec![0.0, 0.1],
        ))
    }

    #[test]
    fn test_initialize_becomes_ready() {
        let cfg = Config::new(
            projector_node(parallel_node())
                .with_value("ProjectionKernel", "bicubic")
                .with_option("VoxelSuperSampling", 3),
        );
        let mut projector = GpuProjector3D::new();
        projector.initialize(&cfg).unwrap();

        assert_eq!(projector.state(), LifecycleState::Ready);
        assert!(projector.is_initialized());
        let parameters = projector.parameters().unwrap();
        assert_eq!(parameters.kernel, ProjectionKernel::Bicubic);
        assert_eq!(parameters.voxel_super_sampling, 3);
        assert_eq!(parameters.detector_super_sampling, 1);
        assert_eq!(
            projector.projection_geometry().unwrap().kind(),
            GeometryKind::Parallel3d
        );
        assert!(cfg.fully_consumed());
    }

    #[test]
    fn test_reinitialize_keeps_only_second_parameters() {
        let first = Config::new(
            projector_node(cone_vec_node())
                .with_value("ProjectionKernel", "bspline3")
                .with_option(DENSITY_WEIGHTING, true)
                .with_option(GPU_INDEX, 2),
        );
        let second = Config::new(projector_node(parallel_node()));

        let mut projector = GpuProjector3D::new();
        projector.initialize(&first).unwrap();
        assert!(projector.parameters().unwrap().density_weighting);

        projector.initialize(&second).unwrap();
        assert!(projector.is_initialized());
        assert_eq!(projector.parameters(), Some(&ProjectorParameters::default()));
        assert_eq!(projector.geometry_kind(), Some(GeometryKind::Parallel3d));
    }

    #[test]
    fn test_reinitialize_does_not_keep_cleared_geometry() {
        let mut projector = GpuProjector3D::new();
        projector
            .initialize(&Config::new(projector_node(parallel_node())))
            .unwrap();

        // A ready projector is cleared before the new config is read
        let cfg = Config::new(ConfigNode::new("Projector3D").with_child(volume_node()));
        let err = projector.initialize(&cfg).unwrap_err();
        assert!(matches!(
            err,
            ProjectorError::MissingDependency { dependency: "ProjectionGeometry3D", .. }
        ));
        assert!(projector.projection_geometry().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut projector = GpuProjector3D::new();
        projector.clear();
        assert_eq!(projector.state(), LifecycleState::Uninitialized);
        projector.clear();
        assert_eq!(projector.state(), LifecycleState::Uninitialized);

        projector
            .initialize(&Config::new(projector_node(parallel_node())))
            .unwrap();
        projector.clear();
        assert_eq!(projector.state(), LifecycleState::Uninitialized);
        assert!(projector.parameters().is_none());
        assert!(projector.projection_geometry().is_none());
        assert!(projector.volume_geometry().is_none());
    }

    #[test]
    fn test_missing_volume_is_not_ready() {
        let cfg = Config::new(ConfigNode::new("Projector3D").with_child(parallel_node()));
        let mut projector = GpuProjector3D::new();

        let err = projector.initialize(&cfg).unwrap_err();
        assert_eq!(
            err.to_string(),
            "GpuProjector3D: VolumeGeometry3D not initialized."
        );
        assert_eq!(projector.state(), LifecycleState::Uninitialized);
        assert!(projector.parameters().is_none());
        assert!(cfg.fully_consumed());
    }

    #[test]
    fn test_failed_initialize_exposes_no_parameters() {
        let mut projector = GpuProjector3D::new();
        projector
            .initialize(&Config::new(projector_node(parallel_node())))
            .unwrap();

        let cfg = Config::new(
            projector_node(parallel_node()).with_value("ProjectionKernel", "trilinear"),
        );
        let err = projector.initialize(&cfg).unwrap_err();
        assert!(matches!(err, ProjectorError::InvalidValue { .. }));
        assert!(!projector.is_initialized());
        assert!(projector.parameters().is_none());
    }

    #[test]
    fn test_failed_initialize_keeps_no_geometry_from_rejected_config() {
        let rejected = Config::new(
            projector_node(parallel_node()).with_value("ProjectionKernel", "trilinear"),
        );
        let mut projector = GpuProjector3D::new();
        assert!(projector.initialize(&rejected).is_err());
        assert!(projector.projection_geometry().is_none());
        assert!(projector.volume_geometry().is_none());

        let empty = Config::new(ConfigNode::new("Projector3D"));
        assert!(matches!(
            projector.initialize(&empty),
            Err(ProjectorError::MissingDependency { dependency: "ProjectionGeometry3D", .. })
        ));
        assert_eq!(projector.state(), LifecycleState::Uninitialized);
    }

    #[test]
    fn test_failed_initialize_keeps_attached_pair_intact() {
        let attached = VolumeGeometry3D::new(4, 4, 4);
        let mut projector = GpuProjector3D::with_geometries(parallel(), attached.clone());

        // Projection geometry builds, volume geometry does not
        let cfg = Config::new(
            ConfigNode::new("Projector3D")
                .with_child(cone_vec_node())
                .with_child(ConfigNode::new(VOLUME_GEOMETRY).with_value("GridColCount", 16)),
        );
        assert!(projector.initialize(&cfg).is_err());
        assert_eq!(projector.geometry_kind(), Some(GeometryKind::Parallel3d));
        assert_eq!(projector.volume_geometry(), Some(&attached));

        projector
            .initialize(&Config::new(ConfigNode::new("Projector3D")))
            .unwrap();
        assert_eq!(projector.geometry_kind(), Some(GeometryKind::Parallel3d));
    }

    #[test]
    fn test_detached_config_is_precondition_error() {
        let mut projector = GpuProjector3D::new();
        assert!(matches!(
            projector.initialize(&Config::detached()),
            Err(ProjectorError::Precondition { .. })
        ));
        assert!(!projector.is_initialized());
    }

    #[test]
    fn test_attached_geometries() {
        let cfg = Config::new(ConfigNode::new("Projector3D").with_option(DENSITY_WEIGHTING, true));
        let mut projector =
            GpuProjector3D::with_geometries(parallel(), VolumeGeometry3D::new(16, 16, 8));
        projector.initialize(&cfg).unwrap();

        assert!(projector.is_initialized());
        assert!(!projector.parameters().unwrap().density_weighting);
        assert_eq!(
            cfg.unused(),
            vec![UnusedEntry::option(GpuProjector3D::COMPONENT, DENSITY_WEIGHTING)]
        );

        projector.attach_geometries(parallel(), VolumeGeometry3D::new(4, 4, 4));
        assert_eq!(projector.state(), LifecycleState::Uninitialized);
    }

    #[test]
    fn test_unused_entries_are_reported_against_projector() {
        let cfg = Config::new(
            projector_node(parallel_node())
                .with_option(GPU_INDEX, 1)
                .with_option(GPU_INDEX_LEGACY, 3)
                .with_option("Supersampling", 2),
        );
        let mut projector = GpuProjector3D::new();
        projector.initialize(&cfg).unwrap();

        assert_eq!(projector.parameters().unwrap().gpu_index, 1);
        assert_eq!(
            cfg.unused(),
            vec![
                UnusedEntry::option(GpuProjector3D::COMPONENT, GPU_INDEX_LEGACY),
                UnusedEntry::option(GpuProjector3D::COMPONENT, "Supersampling"),
            ]
        );
        assert!(cfg.ensure_consumed().is_err());
    }

    #[test]
    fn test_parameters_only_matches_full_initialize() {
        let node = projector_node(cone_vec_node())
            .with_value("ProjectionKernel", "sum_square_weights")
            .with_option("DetectorSuperSampling", 2)
            .with_option(DENSITY_WEIGHTING, "yes")
            .with_option(GPU_INDEX_LEGACY, 1);

        let mut full = GpuProjector3D::new();
        full.initialize(&Config::new(node.clone())).unwrap();

        let vectors = VectorGeometry3D::new(
            8,
            16,
            vec![[0.0, -100.0, 0.0, 0.0, 50.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0]],
        );
        let mut partial = GpuProjector3D::with_geometries(
            ProjectionGeometry3D::ConeVec(vectors),
            VolumeGeometry3D::new(16, 16, 8),
        );
        let parameters = partial
            .initialize_parameters(&Config::new(node))
            .unwrap();

        assert_eq!(Some(&parameters), full.parameters());
        assert_eq!(partial.parameters(), Some(&parameters));
        assert_eq!(partial.state(), LifecycleState::Uninitialized);
    }

    #[test]
    fn test_parameters_only_keeps_state() {
        let mut projector = GpuProjector3D::new();
        projector
            .initialize(&Config::new(projector_node(parallel_node())))
            .unwrap();

        let cfg = Config::new(ConfigNode::new("Projector3D").with_option("VoxelSuperSampling", 4));
        projector.initialize_parameters(&cfg).unwrap();
        assert!(projector.is_initialized());
        assert_eq!(projector.parameters().unwrap().voxel_super_sampling, 4);

        let bad = Config::new(ConfigNode::new("Projector3D").with_option("VoxelSuperSampling", "many"));
        assert!(projector.initialize_parameters(&bad).is_err());
        assert_eq!(projector.parameters().unwrap().voxel_super_sampling, 4);
    }

    #[test]
    fn test_description_is_empty() {
        let projector = GpuProjector3D::new();
        assert_eq!(projector.description(), "");
        assert_eq!(projector.type_name(), "cuda3d");
    }
}
