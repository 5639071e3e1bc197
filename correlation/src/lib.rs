//! Correlation - 3D to 2D fiducial marker registration.
//!
//! Fits a similarity transform (rotation, isotropic scale, translation) that
//! maps marker positions picked in a 3D volume (e.g. a FIB/SEM or confocal
//! stack) onto the same markers picked in a 2D image, then uses it to:
//! - report rotation as a quaternion and ZXZ Euler angles
//! - grade the fit from per-marker residuals
//! - project points of interest from the volume into the image
//! - re-express the translation about a user-chosen rotation center
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use correlation::{CorrelationInput, correlate};
//!
//! // 3D table: fit markers first, points of interest after them.
//! let input = CorrelationInput::from_marker_tables(&markers_3d, &markers_2d)?;
//! let result = correlate(&input, None, None)?;
//!
//! println!("{}", result.transform);
//! if let Some(spots) = &result.projected_spots {
//!     println!("First point of interest at {:?}", spots[0]);
//! }
//! ```

pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod estimator;
pub(crate) mod markers;
pub(crate) mod pipeline;
pub(crate) mod projector;
pub(crate) mod report;
pub(crate) mod residuals;
pub(crate) mod rotation_center;
pub(crate) mod transform;

// ============================================================================
// Input
// ============================================================================

pub use markers::{CorrelationInput, Correspondences, centroid_2d, centroid_3d};

// ============================================================================
// Transform and fitting
// ============================================================================

pub use estimator::{SimilarityFit, estimate_similarity, rms_error};
pub use transform::{EulerAngles, SimilarityTransform};

// ============================================================================
// Results
// ============================================================================

pub use pipeline::{CorrelationResult, Correlator, correlate};
pub use projector::{project_points, project_spots};
pub use report::CorrelationReport;
pub use residuals::{QualityGrade, ResidualSet, transformed_markers};
pub use rotation_center::RotationCenter;

// ============================================================================
// Configuration and errors
// ============================================================================

pub use config::{CorrelationConfig, MIN_MARKERS, QualityThresholds};
pub use error::{CorrelationError, DegeneracyKind, FitWarning};

// Re-exported so callers can load configs without naming `common` directly.
pub use common::FileFormat;
