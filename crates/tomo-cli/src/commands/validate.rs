//! Validate command

use tomo_config::{Config, EntryKind};
use tomo_projector::{Projector3D, ProjectorRegistry};
use tracing::info;

pub fn run(input: &str, allow_unused: bool) -> Result<(), Box<dyn std::error::Error>> {
    let projector = check(input, allow_unused)?;

    println!();
    println!("✓ {} projector is ready", projector.type_name());
    Ok(())
}

/// Load, initialize and report on the projector described by `input`
pub fn check(
    input: &str,
    allow_unused: bool,
) -> Result<Box<dyn Projector3D>, Box<dyn std::error::Error>> {
    info!("Validating projector configuration {}", input);

    let cfg = Config::from_json_file(input)?;
    check_config(&cfg, allow_unused)
}

/// Initialize the projector `cfg` describes and report on it
///
/// Unused entries are printed whether or not initialization succeeded.
pub fn check_config(
    cfg: &Config,
    allow_unused: bool,
) -> Result<Box<dyn Projector3D>, Box<dyn std::error::Error>> {
    let registry = ProjectorRegistry::with_defaults();
    let projector = match registry.create(cfg) {
        Ok(projector) => projector,
        Err(e) => {
            print_unused(cfg);
            return Err(e.into());
        }
    };

    print_report(projector.as_ref());
    print_unused(cfg);

    if !allow_unused {
        cfg.ensure_consumed()?;
    }
    Ok(projector)
}

fn print_report(projector: &dyn Projector3D) {
    println!("Projector: {}", projector.type_name());
    println!("==============================");

    if let Some(parameters) = projector.parameters() {
        println!("Kernel:                 {}", parameters.kernel);
        println!("Voxel super-sampling:   {}", parameters.voxel_super_sampling);
        println!("Detector super-sampling: {}", parameters.detector_super_sampling);
        println!("Density weighting:      {}", parameters.density_weighting);
        match parameters.device() {
            Some(index) => println!("GPU:                    {}", index),
            None => println!("GPU:                    auto"),
        }
    }

    println!();
    if let Some(projection) = projector.projection_geometry() {
        let (rows, cols) = projection.detector_shape();
        println!(
            "Projection geometry: {} ({} projections, {}x{} detector)",
            projection.kind(),
            projection.projection_count(),
            rows,
            cols
        );
    }
    if let Some(volume) = projector.volume_geometry() {
        println!(
            "Volume geometry:     {}x{}x{} voxels",
            volume.cols, volume.rows, volume.slices
        );
    }
}

fn print_unused(cfg: &Config) {
    let lines = unused_lines(cfg);
    if lines.is_empty() {
        return;
    }

    println!();
    println!("Unused entries:");
    for line in lines {
        println!("  - {}", line);
    }
}

/// One line per entry the last initialization left unread
fn unused_lines(cfg: &Config) -> Vec<String> {
    cfg.unused()
        .iter()
        .map(|entry| {
            let kind = match entry.kind {
                EntryKind::Node => "node",
                EntryKind::Option => "option",
            };
            format!("{} {} ({})", kind, entry.name, entry.component)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = r#"{
        "type": "cuda3d",
        "ProjectionKernel": "bspline3",
        "ProjectionGeometry": {
            "type": "cone",
            "DetectorRowCount": 16,
            "DetectorColCount": 32,
            "DetectorSpacingX": 1.0,
            "DetectorSpacingY": 1.0,
            "ProjectionAngles": [0.0, 0.5, 1.0],
            "DistanceOriginSource": 500,
            "DistanceOriginDetector": 200
        },
        "VolumeGeometry": {
            "GridColCount": 32,
            "GridRowCount": 32,
            "GridSliceCount": 16
        },
        "option": { "DensityWeighting": true, "GPUIndex": 0 }
    }"#;

    fn write(dir: &TempDir, json: &str) -> String {
        let path = dir.path().join("projector.json");
        fs::write(&path, json).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_valid_configuration() {
        let dir = TempDir::new().unwrap();
        let projector = check(&write(&dir, CONFIG), false).unwrap();

        assert!(projector.is_initialized());
        let parameters = projector.parameters().unwrap();
        assert!(parameters.density_weighting);
        assert_eq!(parameters.device(), Some(0));
    }

    #[test]
    fn test_unused_entries() {
        let dir = TempDir::new().unwrap();
        let json = CONFIG.replace("\"GPUIndex\": 0", "\"GPUIndex\": 0, \"Threads\": 4");
        let path = write(&dir, &json);

        let err = check(&path, false).unwrap_err();
        assert!(err.to_string().contains("unused option \"Threads\""));

        assert!(check(&path, true).is_ok());
    }

    #[test]
    fn test_unused_entries_survive_failed_initialization() {
        let cfg = Config::from_json_str(
            r#"{
                "type": "cuda3d",
                "ProjectionGeometry": {
                    "type": "parallel3d",
                    "DetectorRowCount": 4,
                    "DetectorColCount": 4,
                    "DetectorSpacingX": 1.0,
                    "DetectorSpacingY": 1.0,
                    "ProjectionAngles": [0.0]
                },
                "option": { "Threads": 4 }
            }"#,
        )
        .unwrap();

        let err = check_config(&cfg, true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "GpuProjector3D: VolumeGeometry3D not initialized."
        );
        assert_eq!(
            unused_lines(&cfg),
            vec!["option Threads (GpuProjector3D)".to_string()]
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");
        assert!(check(&path.to_string_lossy(), true).is_err());
    }
}
