//! Projection geometries
//!
//! The set of projection geometries is closed: parallel beam and cone beam,
//! each either described by angles or by explicit per-projection vectors.
//! Components that behave differently per variant query [`GeometryKind`]
//! instead of inspecting concrete types.

use crate::error::{GeometryError, Result};
use crate::read;
use serde::{Deserialize, Serialize};
use tomo_config::Config;
use tracing::debug;

/// Number of components of one projection vector
///
/// Source or ray direction, detector centre, and the two detector pixel
/// basis vectors, three components each.
pub const VECTOR_LEN: usize = 12;

/// Runtime tag of a projection geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    #[serde(rename = "parallel3d")]
    Parallel3d,
    #[serde(rename = "parallel3d_vec")]
    Parallel3dVec,
    #[serde(rename = "cone")]
    Cone,
    #[serde(rename = "cone_vec")]
    ConeVec,
}

impl GeometryKind {
    /// All kinds in declaration order
    pub const ALL: [GeometryKind; 4] = [
        GeometryKind::Parallel3d,
        GeometryKind::Parallel3dVec,
        GeometryKind::Cone,
        GeometryKind::ConeVec,
    ];

    /// Configuration `type` attribute for this kind
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Parallel3d => "parallel3d",
            Self::Parallel3dVec => "parallel3d_vec",
            Self::Cone => "cone",
            Self::ConeVec => "cone_vec",
        }
    }

    /// Parse a configuration `type` attribute
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == name)
    }

    /// Cone-beam geometries, with or without explicit vectors
    pub fn is_cone_beam(&self) -> bool {
        matches!(self, Self::Cone | Self::ConeVec)
    }

    /// Geometries described by explicit projection vectors
    pub fn is_vector_based(&self) -> bool {
        matches!(self, Self::Parallel3dVec | Self::ConeVec)
    }

    fn component(&self) -> &'static str {
        match self {
            Self::Parallel3d => "ParallelProjectionGeometry3D",
            Self::Parallel3dVec => "ParallelVecProjectionGeometry3D",
            Self::Cone => "ConeProjectionGeometry3D",
            Self::ConeVec => "ConeVecProjectionGeometry3D",
        }
    }
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Angle-based parallel beam geometry
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParallelGeometry3D {
    pub detector_rows: u32,
    pub detector_cols: u32,
    pub detector_spacing_x: f64,
    pub detector_spacing_y: f64,
    /// Projection angles in radians
    pub angles: Vec<f64>,
}

impl ParallelGeometry3D {
    /// Create a new parallel beam geometry
    pub fn new(
        detector_rows: u32,
        detector_cols: u32,
        detector_spacing: [f64; 2],
        angles: Vec<f64>,
    ) -> Self {
        Self {
            detector_rows,
            detector_cols,
            detector_spacing_x: detector_spacing[0],
            detector_spacing_y: detector_spacing[1],
            angles,
        }
    }

    fn validate(&self, component: &str) -> Result<()> {
        validate_angular(
            component,
            self.detector_rows,
            self.detector_cols,
            [self.detector_spacing_x, self.detector_spacing_y],
            &self.angles,
        )
    }
}

/// Angle-based cone beam geometry
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConeGeometry3D {
    pub detector_rows: u32,
    pub detector_cols: u32,
    pub detector_spacing_x: f64,
    pub detector_spacing_y: f64,
    /// Projection angles in radians
    pub angles: Vec<f64>,
    /// Distance from the rotation axis to the source
    pub origin_source: f64,
    /// Distance from the rotation axis to the detector
    pub origin_detector: f64,
}

impl ConeGeometry3D {
    /// Create a new cone beam geometry
    pub fn new(
        detector_rows: u32,
        detector_cols: u32,
        detector_spacing: [f64; 2],
        angles: Vec<f64>,
        origin_source: f64,
        origin_detector: f64,
    ) -> Self {
        Self {
            detector_rows,
            detector_cols,
            detector_spacing_x: detector_spacing[0],
            detector_spacing_y: detector_spacing[1],
            angles,
            origin_source,
            origin_detector,
        }
    }

    fn validate(&self, component: &str) -> Result<()> {
        validate_angular(
            component,
            self.detector_rows,
            self.detector_cols,
            [self.detector_spacing_x, self.detector_spacing_y],
            &self.angles,
        )?;
        for (field, distance) in [
            ("DistanceOriginSource", self.origin_source),
            ("DistanceOriginDetector", self.origin_detector),
        ] {
            if !(distance.is_finite() && distance > 0.0) {
                return Err(GeometryError::invalid(component, field, "must be positive"));
            }
        }
        Ok(())
    }
}

/// Geometry described by one 12-component vector per projection
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VectorGeometry3D {
    pub detector_rows: u32,
    pub detector_cols: u32,
    pub vectors: Vec<[f64; VECTOR_LEN]>,
}

impl VectorGeometry3D {
    /// Create a new vector geometry
    pub fn new(detector_rows: u32, detector_cols: u32, vectors: Vec<[f64; VECTOR_LEN]>) -> Self {
        Self {
            detector_rows,
            detector_cols,
            vectors,
        }
    }

    fn validate(&self, component: &str) -> Result<()> {
        validate_detector(component, self.detector_rows, self.detector_cols)?;
        if self.vectors.is_empty() {
            return Err(GeometryError::invalid(component, "Vectors", "is empty"));
        }
        if self.vectors.iter().flatten().any(|v| !v.is_finite()) {
            return Err(GeometryError::invalid(
                component,
                "Vectors",
                "contains non-finite values",
            ));
        }
        Ok(())
    }
}

/// A 3D projection geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProjectionGeometry3D {
    #[serde(rename = "parallel3d")]
    Parallel3d(ParallelGeometry3D),
    #[serde(rename = "parallel3d_vec")]
    Parallel3dVec(VectorGeometry3D),
    #[serde(rename = "cone")]
    Cone(ConeGeometry3D),
    #[serde(rename = "cone_vec")]
    ConeVec(VectorGeometry3D),
}

impl ProjectionGeometry3D {
    /// Runtime tag of this geometry
    pub fn kind(&self) -> GeometryKind {
        match self {
            Self::Parallel3d(_) => GeometryKind::Parallel3d,
            Self::Parallel3dVec(_) => GeometryKind::Parallel3dVec,
            Self::Cone(_) => GeometryKind::Cone,
            Self::ConeVec(_) => GeometryKind::ConeVec,
        }
    }

    /// Check the geometry invariants
    pub fn validate(&self) -> Result<()> {
        let component = self.kind().component();
        match self {
            Self::Parallel3d(g) => g.validate(component),
            Self::Cone(g) => g.validate(component),
            Self::Parallel3dVec(g) | Self::ConeVec(g) => g.validate(component),
        }
    }

    /// Whether the geometry is fully specified
    pub fn is_initialized(&self) -> bool {
        self.validate().is_ok()
    }

    /// Number of projections
    pub fn projection_count(&self) -> usize {
        match self {
            Self::Parallel3d(g) => g.angles.len(),
            Self::Cone(g) => g.angles.len(),
            Self::Parallel3dVec(g) | Self::ConeVec(g) => g.vectors.len(),
        }
    }

    /// Detector size as (rows, cols)
    pub fn detector_shape(&self) -> (u32, u32) {
        match self {
            Self::Parallel3d(g) => (g.detector_rows, g.detector_cols),
            Self::Cone(g) => (g.detector_rows, g.detector_cols),
            Self::Parallel3dVec(g) | Self::ConeVec(g) => (g.detector_rows, g.detector_cols),
        }
    }

    /// Build from a `ProjectionGeometry` configuration node
    ///
    /// The `type` attribute selects the variant. Each variant reads its fields
    /// inside its own tracking scope.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let root = cfg.node("ProjectionGeometry3D")?;
        let type_name = root
            .attribute("type")
            .ok_or_else(|| GeometryError::MissingType {
                component: "ProjectionGeometry3D".to_string(),
            })?;
        let kind = GeometryKind::from_type_name(type_name)
            .ok_or_else(|| GeometryError::UnknownType(type_name.to_string()))?;

        let component = kind.component();
        let cc = cfg.check(component);
        let node = cc.node()?;

        let geometry = match kind {
            GeometryKind::Parallel3d => Self::Parallel3d(ParallelGeometry3D {
                detector_rows: read::count(&cc, node, "DetectorRowCount")?,
                detector_cols: read::count(&cc, node, "DetectorColCount")?,
                detector_spacing_x: read::number(&cc, node, "DetectorSpacingX")?,
                detector_spacing_y: read::number(&cc, node, "DetectorSpacingY")?,
                angles: read::list(&cc, node, "ProjectionAngles")?,
            }),
            GeometryKind::Cone => Self::Cone(ConeGeometry3D {
                detector_rows: read::count(&cc, node, "DetectorRowCount")?,
                detector_cols: read::count(&cc, node, "DetectorColCount")?,
                detector_spacing_x: read::number(&cc, node, "DetectorSpacingX")?,
                detector_spacing_y: read::number(&cc, node, "DetectorSpacingY")?,
                angles: read::list(&cc, node, "ProjectionAngles")?,
                origin_source: read::number(&cc, node, "DistanceOriginSource")?,
                origin_detector: read::number(&cc, node, "DistanceOriginDetector")?,
            }),
            GeometryKind::Parallel3dVec | GeometryKind::ConeVec => {
                let vectors = VectorGeometry3D {
                    detector_rows: read::count(&cc, node, "DetectorRowCount")?,
                    detector_cols: read::count(&cc, node, "DetectorColCount")?,
                    vectors: read_vectors(component, read::list(&cc, node, "Vectors")?)?,
                };
                if kind == GeometryKind::ConeVec {
                    Self::ConeVec(vectors)
                } else {
                    Self::Parallel3dVec(vectors)
                }
            }
        };
        geometry.validate()?;

        let (rows, cols) = geometry.detector_shape();
        debug!(
            kind = %kind,
            projections = geometry.projection_count(),
            detector_rows = rows,
            detector_cols = cols,
            "projection geometry configured"
        );
        Ok(geometry)
    }
}

fn validate_detector(component: &str, rows: u32, cols: u32) -> Result<()> {
    if rows == 0 {
        return Err(GeometryError::invalid(
            component,
            "DetectorRowCount",
            "must be positive",
        ));
    }
    if cols == 0 {
        return Err(GeometryError::invalid(
            component,
            "DetectorColCount",
            "must be positive",
        ));
    }
    Ok(())
}

fn validate_angular(
    component: &str,
    rows: u32,
    cols: u32,
    spacing: [f64; 2],
    angles: &[f64],
) -> Result<()> {
    validate_detector(component, rows, cols)?;
    for (field, value) in [("DetectorSpacingX", spacing[0]), ("DetectorSpacingY", spacing[1])] {
        if !(value.is_finite() && value > 0.0) {
            return Err(GeometryError::invalid(component, field, "must be positive"));
        }
    }
    if angles.is_empty() {
        return Err(GeometryError::invalid(
            component,
            "ProjectionAngles",
            "is empty",
        ));
    }
    Ok(())
}

fn read_vectors(component: &str, values: Vec<f64>) -> Result<Vec<[f64; VECTOR_LEN]>> {
    if values.len() % VECTOR_LEN != 0 {
        return Err(GeometryError::invalid(
            component,
            "Vectors",
            format!(
                "length {} is not a multiple of {}",
                values.len(),
                VECTOR_LEN
            ),
        ));
    }

    Ok(values
        .chunks_exact(VECTOR_LEN)
        .map(|chunk| {
            let mut row = [0.0; VECTOR_LEN];
            row.copy_from_slice(chunk);
            row
        })
        .collect())
}
