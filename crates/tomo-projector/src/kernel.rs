//! Projection kernels
//!
//! The weighting scheme the compute stage applies when projecting. Each
//! variant has exactly one configuration spelling; matching is case-sensitive.

use crate::error::ProjectorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Projection kernel variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProjectionKernel {
    #[default]
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "sum_square_weights")]
    SumSquareWeights,
    #[serde(rename = "bicubic")]
    Bicubic,
    #[serde(rename = "bicubic_derivative_1")]
    BicubicDerivative1,
    #[serde(rename = "bicubic_derivative_2")]
    BicubicDerivative2,
    #[serde(rename = "bspline3")]
    BSpline3,
    #[serde(rename = "bspline3_derivative_1")]
    BSpline3Derivative1,
    #[serde(rename = "bspline3_derivative_2")]
    BSpline3Derivative2,
}

impl ProjectionKernel {
    /// All kernels in declaration order
    pub const ALL: [ProjectionKernel; 8] = [
        ProjectionKernel::Default,
        ProjectionKernel::SumSquareWeights,
        ProjectionKernel::Bicubic,
        ProjectionKernel::BicubicDerivative1,
        ProjectionKernel::BicubicDerivative2,
        ProjectionKernel::BSpline3,
        ProjectionKernel::BSpline3Derivative1,
        ProjectionKernel::BSpline3Derivative2,
    ];

    /// Configuration spelling
    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::SumSquareWeights => "sum_square_weights",
            Self::Bicubic => "bicubic",
            Self::BicubicDerivative1 => "bicubic_derivative_1",
            Self::BicubicDerivative2 => "bicubic_derivative_2",
            Self::BSpline3 => "bspline3",
            Self::BSpline3Derivative1 => "bspline3_derivative_1",
            Self::BSpline3Derivative2 => "bspline3_derivative_2",
        }
    }

    /// Get description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Default => "Standard interpolating projection",
            Self::SumSquareWeights => "Sum of squared projection weights",
            Self::Bicubic => "Bicubic texture interpolation",
            Self::BicubicDerivative1 => "First derivative of the bicubic kernel",
            Self::BicubicDerivative2 => "Second derivative of the bicubic kernel",
            Self::BSpline3 => "Cubic B-spline interpolation",
            Self::BSpline3Derivative1 => "First derivative of the cubic B-spline kernel",
            Self::BSpline3Derivative2 => "Second derivative of the cubic B-spline kernel",
        }
    }

    /// Quoted, comma separated list of every accepted spelling
    pub fn admissible_choices() -> String {
        let names: Vec<String> = Self::ALL
            .iter()
            .map(|kernel| format!("\"{}\"", kernel.name()))
            .collect();
        names.join(", ")
    }
}

impl fmt::Display for ProjectionKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProjectionKernel {
    type Err = ProjectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kernel| kernel.name() == s)
            .ok_or_else(|| ProjectorError::InvalidValue {
                key: "ProjectionKernel".to_string(),
                message: format!(
                    "\"{}\" is not a projection kernel. Admissible choices are {}.",
                    s,
                    Self::admissible_choices()
                ),
            })
    }
}
