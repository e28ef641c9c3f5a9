//! Tomo Geometry - Volume and projection geometries
//!
//! Projectors do not compute with geometry here; they own it, check that it
//! is fully specified, and branch on the projection geometry's
//! [`GeometryKind`].
//!
//! # Configuration
//!
//! ```text
//! VolumeGeometry      GridColCount, GridRowCount, GridSliceCount,
//!                     option WindowMin{X,Y,Z} / WindowMax{X,Y,Z}
//! ProjectionGeometry  type = parallel3d | parallel3d_vec | cone | cone_vec
//!                     DetectorRowCount, DetectorColCount, then either
//!                     DetectorSpacing{X,Y} + ProjectionAngles
//!                     (+ DistanceOriginSource, DistanceOriginDetector for cone)
//!                     or Vectors (12 values per projection)
//! ```

pub mod error;
pub mod projection;
mod read;
pub mod volume;

pub use error::{GeometryError, Result};
pub use projection::{
    ConeGeometry3D, GeometryKind, ParallelGeometry3D, ProjectionGeometry3D, VECTOR_LEN,
    VectorGeometry3D,
};
pub use volume::{VolumeGeometry3D, VolumeWindow};
