//! Params command

use tomo_config::Config;
use tomo_geometry::GeometryKind;
use tomo_projector::projector::PROJECTION_GEOMETRY;
use tomo_projector::{GpuProjector3D, ProjectorParameters};
use tracing::{info, warn};

pub fn run(input: &str, geometry: Option<GeometryKind>) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::from_json_file(input)?;
    let parameters = parse(&cfg, geometry)?;

    println!("{}", serde_json::to_string_pretty(&parameters)?);
    Ok(())
}

/// Parse only the projector parameters of `cfg`
///
/// Without an explicit geometry kind, the `type` of the document's
/// `ProjectionGeometry` node decides whether density weighting applies. The
/// geometry nodes themselves are not read and show up as unused.
pub fn parse(
    cfg: &Config,
    geometry: Option<GeometryKind>,
) -> Result<ProjectorParameters, Box<dyn std::error::Error>> {
    let geometry = geometry.or_else(|| document_geometry(cfg));
    info!(geometry = ?geometry, "Parsing projector parameters");

    let parameters = GpuProjector3D::parse_parameters(cfg, geometry)?;

    for entry in cfg.unused() {
        warn!("{}", entry);
    }
    Ok(parameters)
}

fn document_geometry(cfg: &Config) -> Option<GeometryKind> {
    cfg.root()?
        .single_node(PROJECTION_GEOMETRY)?
        .attribute("type")
        .and_then(GeometryKind::from_type_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use tomo_config::UnusedEntry;
    use tomo_geometry::{ConeGeometry3D, ProjectionGeometry3D, VolumeGeometry3D};
    use tomo_projector::ProjectionKernel;

    const CONFIG: &str = r#"{
        "ProjectionKernel": "bicubic_derivative_1",
        "ProjectionGeometry": { "type": "parallel3d" },
        "option": {
            "VoxelSuperSampling": 2,
            "DensityWeighting": true,
            "GPUindex": 1
        }
    }"#;

    #[test]
    fn test_params_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("params.json");
        fs::write(&path, CONFIG).unwrap();

        let cfg = Config::from_json_file(&path).unwrap();
        let parameters = parse(&cfg, None).unwrap();

        assert_eq!(parameters.kernel, ProjectionKernel::BicubicDerivative1);
        assert_eq!(parameters.voxel_super_sampling, 2);
        assert_eq!(parameters.gpu_index, 1);
        // parallel3d from the document: density weighting is not read
        assert!(!parameters.density_weighting);
        assert_eq!(
            cfg.unused(),
            vec![
                UnusedEntry::node(GpuProjector3D::COMPONENT, PROJECTION_GEOMETRY),
                UnusedEntry::option(GpuProjector3D::COMPONENT, "DensityWeighting"),
            ]
        );
    }

    #[test]
    fn test_explicit_geometry_overrides_document() {
        let cfg = Config::from_json_str(CONFIG).unwrap();
        let parameters = parse(&cfg, Some(GeometryKind::ConeVec)).unwrap();

        assert!(parameters.density_weighting);
        assert_eq!(
            cfg.unused(),
            vec![UnusedEntry::node(GpuProjector3D::COMPONENT, PROJECTION_GEOMETRY)]
        );
    }

    #[test]
    fn test_matches_parameter_only_initialization() {
        let cfg = Config::from_json_str(CONFIG).unwrap();
        let parameters = parse(&cfg, Some(GeometryKind::Cone)).unwrap();

        let mut projector = GpuProjector3D::with_geometries(
            ProjectionGeometry3D::Cone(ConeGeometry3D::new(
                4,
                4,
                [1.0, 1.0],
                vec![0.0],
                10.0,
                10.0,
            )),
            VolumeGeometry3D::new(4, 4, 4),
        );
        let expected = projector.initialize_parameters(&cfg).unwrap();
        assert_eq!(parameters, expected);
    }

    #[test]
    fn test_params_serialize_with_config_spellings() {
        let cfg = Config::from_json_str(CONFIG).unwrap();
        let parameters = parse(&cfg, None).unwrap();
        let json = serde_json::to_value(parameters).unwrap();

        assert_eq!(json["kernel"], "bicubic_derivative_1");
        assert_eq!(json["gpu_index"], 1);
    }
}
