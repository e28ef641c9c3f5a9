//! Tomo Projector - Configuration-validated GPU projectors
//!
//! A projector is configured from a [`tomo_config::Config`] tree, validates
//! every entry it reads, and only becomes ready once both of its geometries
//! are fully specified.
//!
//! # Lifecycle
//!
//! ```text
//!                 initialize (ok)
//! Uninitialized ─────────────────→ Ready
//!       ↑                            │
//!       └──── clear / attach / ──────┘
//!             failed initialize
//! ```
//!
//! Initialization runs the base step (geometries), then the parameter parse,
//! then the readiness check. Consumption of the whole projector config is
//! tracked across all three and reported once at the end.

pub mod error;
pub mod gpu;
pub mod kernel;
pub mod parameters;
pub mod projector;
pub mod registry;

// Re-export commonly used types
pub use error::{ProjectorError, Result};
pub use gpu::GpuProjector3D;
pub use kernel::ProjectionKernel;
pub use parameters::ProjectorParameters;
pub use projector::{LifecycleState, Projector3D, ProjectorBase, check_ready, readiness};
pub use registry::{ProjectorConstructor, ProjectorRegistry};
