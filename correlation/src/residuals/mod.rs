//! Per-marker residuals and fit quality.
//!
//! Residuals are `observed - predicted` in image pixels, kept in marker order
//! so they map back to marker numbers in the picking tables.

use glam::{DVec2, DVec3};

use crate::config::QualityThresholds;
use crate::markers::Correspondences;
use crate::projector::project_points;
use crate::transform::SimilarityTransform;

#[cfg(test)]
mod tests;

/// Traffic-light grade of a fit quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityGrade {
    Good,
    Marginal,
    Poor,
}

impl std::fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityGrade::Good => write!(f, "good"),
            QualityGrade::Marginal => write!(f, "marginal"),
            QualityGrade::Poor => write!(f, "poor"),
        }
    }
}

/// Residuals of one fit. Rebuilt whenever the transform or markers change.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualSet {
    observed: Vec<DVec2>,
    predicted: Vec<DVec2>,
    deltas: Vec<DVec2>,
    mean_abs_delta: DVec2,
    rms_error: f64,
}

impl ResidualSet {
    /// Project every 3D fit marker and compare with its observed 2D marker.
    pub fn compute(transform: &SimilarityTransform, correspondences: &Correspondences) -> Self {
        let predicted = project_points(transform, correspondences.markers_3d());
        Self::from_predictions(
            correspondences.markers_2d().to_vec(),
            predicted,
            transform.rms_error(),
        )
    }

    fn from_predictions(observed: Vec<DVec2>, predicted: Vec<DVec2>, rms_error: f64) -> Self {
        let deltas: Vec<DVec2> = observed
            .iter()
            .zip(predicted.iter())
            .map(|(o, p)| *o - *p)
            .collect();

        let mean_abs_delta = if deltas.is_empty() {
            DVec2::ZERO
        } else {
            deltas.iter().map(|d| d.abs()).sum::<DVec2>() / deltas.len() as f64
        };

        Self {
            observed,
            predicted,
            deltas,
            mean_abs_delta,
            rms_error,
        }
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    pub fn observed(&self) -> &[DVec2] {
        &self.observed
    }

    pub fn predicted(&self) -> &[DVec2] {
        &self.predicted
    }

    /// `observed - predicted` per marker.
    pub fn deltas(&self) -> &[DVec2] {
        &self.deltas
    }

    /// Element-wise `|delta|` for display. Stored deltas keep their sign.
    pub fn absolute_deltas(&self) -> Vec<DVec2> {
        self.deltas.iter().map(|d| d.abs()).collect()
    }

    /// Either signed or absolute deltas, as the results table shows them.
    pub fn display_deltas(&self, absolute: bool) -> Vec<DVec2> {
        if absolute {
            self.absolute_deltas()
        } else {
            self.deltas.clone()
        }
    }

    /// Mean of `|dx|` and `|dy|` over all markers.
    pub fn mean_abs_delta(&self) -> DVec2 {
        self.mean_abs_delta
    }

    /// RMS error of the fit (3D distance to the image plane markers).
    pub fn rms_error(&self) -> f64 {
        self.rms_error
    }

    /// Component-wise sum of deltas. Near zero for a centroid-aligned fit.
    pub fn delta_sum(&self) -> DVec2 {
        self.deltas.iter().copied().sum()
    }

    pub fn magnitudes(&self) -> Vec<f64> {
        self.deltas.iter().map(|d| d.length()).collect()
    }

    /// Index and length of the largest residual.
    pub fn worst(&self) -> Option<(usize, f64)> {
        self.deltas
            .iter()
            .map(|d| d.length())
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Observed marker moved by its residual onto the predicted position,
    /// for correcting a mis-clicked 2D marker.
    pub fn shifted_marker(&self, index: usize) -> Option<DVec2> {
        let observed = self.observed.get(index)?;
        let delta = self.deltas.get(index)?;
        Some(*observed - *delta)
    }

    pub fn grade_mean_delta(&self, thresholds: &QualityThresholds) -> QualityGrade {
        let m = self.mean_abs_delta;
        if m.x <= thresholds.good_mean_delta && m.y <= thresholds.good_mean_delta {
            QualityGrade::Good
        } else if m.x < thresholds.marginal_mean_delta || m.y < thresholds.marginal_mean_delta {
            QualityGrade::Marginal
        } else {
            QualityGrade::Poor
        }
    }

    pub fn grade_rms(&self, thresholds: &QualityThresholds) -> QualityGrade {
        if self.rms_error < thresholds.good_rms {
            QualityGrade::Good
        } else {
            QualityGrade::Marginal
        }
    }
}

/// Full 3D images of the fit markers, `s * R * p + d` with z kept.
pub fn transformed_markers(transform: &SimilarityTransform, markers_3d: &[DVec3]) -> Vec<DVec3> {
    markers_3d.iter().map(|p| transform.apply(*p)).collect()
}
