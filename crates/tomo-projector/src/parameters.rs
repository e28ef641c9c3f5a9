//! Projector parameters
//!
//! Translates the options of a projector configuration node into a typed
//! parameter set. Every key examined is marked on the tracking scope, present
//! or not, so only keys this parser does not know about are left over.

use crate::error::{ProjectorError, Result};
use crate::kernel::ProjectionKernel;
use serde::{Deserialize, Serialize};
use tomo_config::{ConfigNode, ConfigStackCheck};
use tomo_geometry::GeometryKind;
use tracing::debug;

/// Node selecting the projection kernel
pub const PROJECTION_KERNEL: &str = "ProjectionKernel";
/// Option for voxel super-sampling
pub const VOXEL_SUPER_SAMPLING: &str = "VoxelSuperSampling";
/// Option for detector super-sampling
pub const DETECTOR_SUPER_SAMPLING: &str = "DetectorSuperSampling";
/// Option enabling density weighting, cone beam only
pub const DENSITY_WEIGHTING: &str = "DensityWeighting";
/// Option selecting the GPU
pub const GPU_INDEX: &str = "GPUIndex";
/// Legacy spelling of [`GPU_INDEX`], lower precedence
pub const GPU_INDEX_LEGACY: &str = "GPUindex";

/// Device index meaning "let the runtime choose"
pub const AUTO_GPU_INDEX: i32 = -1;

/// Typed projector parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectorParameters {
    /// Projection kernel
    pub kernel: ProjectionKernel,
    /// Sub-samples per voxel and axis
    pub voxel_super_sampling: i32,
    /// Sub-samples per detector pixel and axis
    pub detector_super_sampling: i32,
    /// Density weighting for cone beam geometries
    pub density_weighting: bool,
    /// GPU index, negative for automatic selection
    pub gpu_index: i32,
}

impl Default for ProjectorParameters {
    fn default() -> Self {
        Self {
            kernel: ProjectionKernel::Default,
            voxel_super_sampling: 1,
            detector_super_sampling: 1,
            density_weighting: false,
            gpu_index: AUTO_GPU_INDEX,
        }
    }
}

impl ProjectorParameters {
    /// Parse parameters from the node tracked by `cc`
    ///
    /// `geometry` is the kind of the projection geometry assigned to the
    /// projector, if any. It decides whether `DensityWeighting` is read.
    pub fn parse(cc: &ConfigStackCheck<'_>, geometry: Option<GeometryKind>) -> Result<Self> {
        let node = cc.node()?;

        cc.mark_node_parsed(PROJECTION_KERNEL);
        let kernel = parse_kernel(node)?;

        cc.mark_option_parsed(VOXEL_SUPER_SAMPLING);
        let voxel_super_sampling =
            integer(VOXEL_SUPER_SAMPLING, node.option_numerical(VOXEL_SUPER_SAMPLING, 1.0)?)?;

        cc.mark_option_parsed(DETECTOR_SUPER_SAMPLING);
        let detector_super_sampling =
            integer(DETECTOR_SUPER_SAMPLING, node.option_numerical(DETECTOR_SUPER_SAMPLING, 1.0)?)?;

        // Left unmarked for other geometries so a supplied value is reported
        let mut density_weighting = false;
        if Self::density_weighting_applies(geometry) {
            cc.mark_option_parsed(DENSITY_WEIGHTING);
            density_weighting = node.option_bool(DENSITY_WEIGHTING, false)?;
        }

        // The legacy alias is only marked when the canonical key is absent
        let has_canonical = node.has_option(GPU_INDEX);
        cc.mark_option_parsed(GPU_INDEX);
        if !has_canonical {
            cc.mark_option_parsed(GPU_INDEX_LEGACY);
        }
        let legacy = node.option_numerical(GPU_INDEX_LEGACY, AUTO_GPU_INDEX as f64)?;
        let gpu_index = integer(GPU_INDEX, node.option_numerical(GPU_INDEX, legacy)?)?;

        let parameters = Self {
            kernel,
            voxel_super_sampling,
            detector_super_sampling,
            density_weighting,
            gpu_index,
        };
        debug!(
            component = cc.component(),
            kernel = %parameters.kernel,
            voxel_super_sampling,
            detector_super_sampling,
            density_weighting,
            gpu_index,
            "projector parameters parsed"
        );
        Ok(parameters)
    }

    /// Whether `DensityWeighting` is read for a projection geometry kind
    ///
    /// True when no geometry is assigned yet, or for cone beam geometries.
    pub fn density_weighting_applies(geometry: Option<GeometryKind>) -> bool {
        geometry.is_none_or(|kind| kind.is_cone_beam())
    }

    /// Explicit device index, `None` for automatic selection
    pub fn device(&self) -> Option<u32> {
        u32::try_from(self.gpu_index).ok()
    }
}

fn parse_kernel(node: &ConfigNode) -> Result<ProjectionKernel> {
    let Some(kernel) = node.single_node(PROJECTION_KERNEL) else {
        return Ok(ProjectionKernel::Default);
    };

    match kernel.content() {
        Some(value) => match value.as_text() {
            Some(text) => text.parse(),
            None => value.to_string().parse(),
        },
        None => "".parse(),
    }
}

/// Truncate toward zero, rejecting values no `i32` can hold
fn integer(key: &str, value: f64) -> Result<i32> {
    let truncated = value.trunc();
    if !truncated.is_finite() || truncated < i32::MIN as f64 || truncated > i32::MAX as f64 {
        return Err(ProjectorError::InvalidValue {
            key: key.to_string(),
            message: format!("{} is not a representable integer", value),
        });
    }
    Ok(truncated as i32)
}
