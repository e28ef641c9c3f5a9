//! Volume geometry
//!
//! A voxel grid together with the world-space window it spans.

use crate::error::{GeometryError, Result};
use crate::read;
use serde::{Deserialize, Serialize};
use tomo_config::Config;
use tracing::debug;

const COMPONENT: &str = "VolumeGeometry3D";

/// World-space extent of the reconstruction volume
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VolumeWindow {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl VolumeWindow {
    /// Window centred on the origin with unit voxels
    pub fn centered(cols: u32, rows: u32, slices: u32) -> Self {
        Self {
            min_x: -(cols as f64) / 2.0,
            max_x: cols as f64 / 2.0,
            min_y: -(rows as f64) / 2.0,
            max_y: rows as f64 / 2.0,
            min_z: -(slices as f64) / 2.0,
            max_z: slices as f64 / 2.0,
        }
    }

    fn axes(&self) -> [(&'static str, f64, f64); 3] {
        [
            ("WindowMinX", self.min_x, self.max_x),
            ("WindowMinY", self.min_y, self.max_y),
            ("WindowMinZ", self.min_z, self.max_z),
        ]
    }
}

/// 3D volume geometry
///
/// The default value is an unassigned grid and reports itself as not
/// initialized.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VolumeGeometry3D {
    /// Number of voxel columns (x)
    pub cols: u32,
    /// Number of voxel rows (y)
    pub rows: u32,
    /// Number of voxel slices (z)
    pub slices: u32,
    /// World-space window
    pub window: VolumeWindow,
}

impl VolumeGeometry3D {
    /// Create a grid with a window centred on the origin
    pub fn new(cols: u32, rows: u32, slices: u32) -> Self {
        Self {
            cols,
            rows,
            slices,
            window: VolumeWindow::centered(cols, rows, slices),
        }
    }

    /// Set the window
    pub fn with_window(mut self, window: VolumeWindow) -> Self {
        self.window = window;
        self
    }

    /// Build from a `VolumeGeometry` configuration node
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let cc = cfg.check(COMPONENT);
        let node = cc.node()?;

        let cols = read::count(&cc, node, "GridColCount")?;
        let rows = read::count(&cc, node, "GridRowCount")?;
        let slices = read::count(&cc, node, "GridSliceCount")?;

        let centered = VolumeWindow::centered(cols, rows, slices);
        let window = VolumeWindow {
            min_x: read::option(&cc, node, "WindowMinX", centered.min_x)?,
            max_x: read::option(&cc, node, "WindowMaxX", centered.max_x)?,
            min_y: read::option(&cc, node, "WindowMinY", centered.min_y)?,
            max_y: read::option(&cc, node, "WindowMaxY", centered.max_y)?,
            min_z: read::option(&cc, node, "WindowMinZ", centered.min_z)?,
            max_z: read::option(&cc, node, "WindowMaxZ", centered.max_z)?,
        };

        let geometry = Self {
            cols,
            rows,
            slices,
            window,
        };
        geometry.validate()?;

        debug!(cols, rows, slices, "volume geometry configured");
        Ok(geometry)
    }

    /// Check the geometry invariants
    pub fn validate(&self) -> Result<()> {
        for (field, count) in [
            ("GridColCount", self.cols),
            ("GridRowCount", self.rows),
            ("GridSliceCount", self.slices),
        ] {
            if count == 0 {
                return Err(GeometryError::invalid(COMPONENT, field, "must be positive"));
            }
        }

        for (field, min, max) in self.window.axes() {
            if !(min.is_finite() && max.is_finite() && min < max) {
                return Err(GeometryError::invalid(
                    COMPONENT,
                    field,
                    format!("window [{}, {}] is empty", min, max),
                ));
            }
        }

        Ok(())
    }

    /// Whether the geometry is fully specified
    pub fn is_initialized(&self) -> bool {
        self.validate().is_ok()
    }

    /// Total number of voxels
    pub fn voxel_count(&self) -> u64 {
        self.cols as u64 * self.rows as u64 * self.slices as u64
    }
}
