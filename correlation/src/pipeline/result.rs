//! Correlation result bundle.

use glam::{DVec2, DVec3};

use crate::config::QualityThresholds;
use crate::error::FitWarning;
use crate::residuals::{QualityGrade, ResidualSet};
use crate::rotation_center::RotationCenter;
use crate::transform::SimilarityTransform;

/// Everything one correlation run produces.
#[derive(Debug, Clone)]
pub struct CorrelationResult {
    /// Fitted transform, carrying its RMS error.
    pub transform: SimilarityTransform,

    /// Fit markers mapped into image space, z kept.
    pub fitted_3d: Vec<DVec3>,

    /// Points of interest projected onto the image. `None` when none were given.
    pub projected_spots: Option<Vec<DVec2>>,

    /// Per-marker residuals, in marker order.
    pub residuals: ResidualSet,

    /// Mean of the 3D fit markers used for centering.
    pub centroid_3d: DVec3,

    /// Pivot the alternate translation is expressed about.
    pub rotation_center: RotationCenter,

    /// Translation re-expressed about `rotation_center`.
    pub translation_about_center: DVec3,

    /// Non-fatal conditions found during the fit.
    pub warnings: Vec<FitWarning>,

    /// Processing time in milliseconds.
    pub elapsed_ms: f64,
}

impl CorrelationResult {
    /// Predicted image positions of the fit markers.
    pub fn predicted_2d(&self) -> &[DVec2] {
        self.residuals.predicted()
    }

    pub fn rms_error(&self) -> f64 {
        self.transform.rms_error()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Grades of the mean absolute delta and of the RMS error.
    pub fn quality(&self, thresholds: &QualityThresholds) -> (QualityGrade, QualityGrade) {
        (
            self.residuals.grade_mean_delta(thresholds),
            self.residuals.grade_rms(thresholds),
        )
    }

    /// Set the elapsed time.
    pub fn with_elapsed(mut self, ms: f64) -> Self {
        self.elapsed_ms = ms;
        self
    }
}
