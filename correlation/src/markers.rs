//! Marker correspondences and points of interest.

use glam::{DVec2, DVec3};

use crate::config::MIN_MARKERS;
use crate::error::CorrelationError;

/// Ordered 3D/2D marker pairs used for fitting.
///
/// Guaranteed: both sides have the same length, at least [`MIN_MARKERS`]
/// pairs, and all coordinates are finite. Order is kept so residuals map back
/// to marker numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct Correspondences {
    markers_3d: Vec<DVec3>,
    markers_2d: Vec<DVec2>,
}

impl Correspondences {
    pub fn new(markers_3d: Vec<DVec3>, markers_2d: Vec<DVec2>) -> Result<Self, CorrelationError> {
        if markers_3d.len() != markers_2d.len() {
            return Err(CorrelationError::MismatchedCounts {
                markers_3d: markers_3d.len(),
                markers_2d: markers_2d.len(),
            });
        }
        if markers_3d.len() < MIN_MARKERS {
            return Err(CorrelationError::InsufficientPoints {
                found: markers_3d.len(),
                required: MIN_MARKERS,
            });
        }

        let non_finite = markers_3d
            .iter()
            .zip(markers_2d.iter())
            .position(|(p3, p2)| !p3.is_finite() || !p2.is_finite());
        if let Some(index) = non_finite {
            return Err(CorrelationError::NonFiniteCoordinate { index });
        }

        Ok(Self {
            markers_3d,
            markers_2d,
        })
    }

    pub fn len(&self) -> usize {
        self.markers_3d.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers_3d.is_empty()
    }

    pub fn markers_3d(&self) -> &[DVec3] {
        &self.markers_3d
    }

    pub fn markers_2d(&self) -> &[DVec2] {
        &self.markers_2d
    }

    pub fn iter(&self) -> impl Iterator<Item = (DVec3, DVec2)> + '_ {
        self.markers_3d
            .iter()
            .copied()
            .zip(self.markers_2d.iter().copied())
    }
}

/// Everything a correlation run consumes: fit pairs plus points of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationInput {
    pub correspondences: Correspondences,
    /// 3D points projected with the fitted transform but not used for fitting.
    pub spots_3d: Vec<DVec3>,
}

impl CorrelationInput {
    pub fn new(correspondences: Correspondences, spots_3d: Vec<DVec3>) -> Self {
        Self {
            correspondences,
            spots_3d,
        }
    }

    /// Split marker tables as the picking tool keeps them: the 3D table holds
    /// the fit markers first and any extra rows after them are points of
    /// interest. The 2D table only holds fit markers.
    pub fn from_marker_tables(
        markers_3d: &[DVec3],
        markers_2d: &[DVec2],
    ) -> Result<Self, CorrelationError> {
        let fit_count = markers_2d.len();
        if markers_3d.len() < fit_count {
            return Err(CorrelationError::MismatchedCounts {
                markers_3d: markers_3d.len(),
                markers_2d: fit_count,
            });
        }

        let (fit_3d, spots_3d) = markers_3d.split_at(fit_count);
        let correspondences = Correspondences::new(fit_3d.to_vec(), markers_2d.to_vec())?;

        Ok(Self::new(correspondences, spots_3d.to_vec()))
    }

    /// Same as [`Self::from_marker_tables`] for 2D tables stored with a z column,
    /// which is ignored.
    pub fn from_marker_tables_xyz(
        markers_3d: &[DVec3],
        markers_2d: &[DVec3],
    ) -> Result<Self, CorrelationError> {
        let markers_2d: Vec<DVec2> = markers_2d.iter().map(|p| p.truncate()).collect();
        Self::from_marker_tables(markers_3d, &markers_2d)
    }
}

/// Mean of 3D points. Zero for an empty slice.
pub fn centroid_3d(points: &[DVec3]) -> DVec3 {
    if points.is_empty() {
        return DVec3::ZERO;
    }

    let mut sum = DVec3::ZERO;
    for p in points {
        sum += *p;
    }
    sum / points.len() as f64
}

/// Mean of 2D points. Zero for an empty slice.
pub fn centroid_2d(points: &[DVec2]) -> DVec2 {
    if points.is_empty() {
        return DVec2::ZERO;
    }

    let mut sum = DVec2::ZERO;
    for p in points {
        sum += *p;
    }
    sum / points.len() as f64
}
