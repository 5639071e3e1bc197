//! Error and warning types for marker correlation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a marker configuration cannot produce a unique transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegeneracyKind {
    /// All 3D fit markers sit on the same spot.
    CoincidentPoints,
    /// 3D fit markers lie on a single line, rotation about it is unconstrained.
    CollinearPoints,
    /// Cross-covariance between 3D and 2D markers has rank below 2.
    RankDeficientCrossCovariance,
    /// Scale denominator (3D spread about the centroid) vanished.
    ZeroScaleDenominator,
    /// Eigenvector picked as rotation quaternion had near-zero norm.
    ZeroQuaternionNorm,
    /// Fitted scale was zero or negative.
    NonPositiveScale,
}

impl std::fmt::Display for DegeneracyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegeneracyKind::CoincidentPoints => write!(f, "all 3D markers are identical"),
            DegeneracyKind::CollinearPoints => write!(f, "all 3D markers are collinear"),
            DegeneracyKind::RankDeficientCrossCovariance => {
                write!(f, "cross-covariance of 3D and 2D markers has rank < 2")
            }
            DegeneracyKind::ZeroScaleDenominator => write!(f, "scale denominator is zero"),
            DegeneracyKind::ZeroQuaternionNorm => {
                write!(f, "rotation quaternion has near-zero norm")
            }
            DegeneracyKind::NonPositiveScale => write!(f, "fitted scale is not positive"),
        }
    }
}

/// Errors that abort a correlation run. No partial result accompanies them.
#[derive(Debug, Error)]
pub enum CorrelationError {
    #[error("At least {required} marker pairs are needed, got {found}")]
    InsufficientPoints { found: usize, required: usize },

    #[error("Marker count mismatch: {markers_3d} 3D markers, {markers_2d} 2D markers")]
    MismatchedCounts {
        markers_3d: usize,
        markers_2d: usize,
    },

    #[error("Marker {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    #[error("Degenerate marker geometry: {0}")]
    DegenerateGeometry(DegeneracyKind),

    #[error("Failed to write correlation report '{path}': {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Non-fatal conditions reported next to a valid fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitWarning {
    /// The two largest eigenvalues of Horn's orientation matrix nearly coincide,
    /// so the rotation is poorly determined.
    DegenerateRotation { largest: f64, second: f64 },
}

impl std::fmt::Display for FitWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitWarning::DegenerateRotation { largest, second } => write!(
                f,
                "rotation may be unstable: leading eigenvalues {:.6e} and {:.6e} nearly coincide",
                largest, second
            ),
        }
    }
}
