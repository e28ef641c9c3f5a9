//! Tomo CLI - Projector configuration validator
//!
//! Loads projector configurations from JSON and reports what a projector
//! makes of them.

use clap::{Parser, Subcommand};
use tomo_geometry::GeometryKind;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;

/// Tomo - validate GPU projector configurations
#[derive(Parser)]
#[command(name = "tomo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and initialize the projector described by a file
    Validate {
        /// Projector configuration (JSON)
        input: String,

        /// Succeed even if entries were left unread
        #[arg(long)]
        allow_unused: bool,
    },

    /// Parse projector parameters only and print them as JSON
    Params {
        /// Projector configuration (JSON)
        input: String,

        /// Projection geometry kind to assume, defaults to the file's
        /// ProjectionGeometry type
        #[arg(short, long, value_enum)]
        geometry: Option<GeometryArg>,
    },

    /// List the accepted projection kernels
    Kernels,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum GeometryArg {
    /// Parallel beam, angles
    Parallel3d,
    /// Parallel beam, vectors
    Parallel3dVec,
    /// Cone beam, angles
    Cone,
    /// Cone beam, vectors
    ConeVec,
}

impl From<GeometryArg> for GeometryKind {
    fn from(arg: GeometryArg) -> Self {
        match arg {
            GeometryArg::Parallel3d => GeometryKind::Parallel3d,
            GeometryArg::Parallel3dVec => GeometryKind::Parallel3dVec,
            GeometryArg::Cone => GeometryKind::Cone,
            GeometryArg::ConeVec => GeometryKind::ConeVec,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_ansi(!cli.no_color)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Validate {
            input,
            allow_unused,
        } => {
            commands::validate::run(&input, allow_unused)?;
        }

        Commands::Params { input, geometry } => {
            commands::params::run(&input, geometry.map(GeometryKind::from))?;
        }

        Commands::Kernels => {
            commands::kernels::run();
        }
    }

    Ok(())
}
