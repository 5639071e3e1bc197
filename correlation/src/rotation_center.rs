//! Pivot used to report the translation in a human-readable way.
//!
//! The fitted transform rotates about the volume origin. Users often want the
//! translation "about the middle of the volume" instead; re-expressing it
//! about a pivot changes the reported numbers only.

use glam::DVec3;

use crate::transform::SimilarityTransform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationCenter(pub DVec3);

impl RotationCenter {
    /// Center of a cube with edge `max_dim`, i.e. `0.5 * max_dim` on every axis.
    pub fn cube(max_dim: f64) -> Self {
        let half = 0.5 * max_dim;
        Self(DVec3::splat(half))
    }

    /// Cube center derived from the largest coordinate among the 3D points,
    /// standing in for the longest edge of the volume.
    pub fn from_extent(points: &[DVec3]) -> Self {
        let max_dim = points
            .iter()
            .map(|p| p.max_element())
            .fold(0.0_f64, f64::max);
        Self::cube(max_dim)
    }

    pub fn position(&self) -> DVec3 {
        self.0
    }

    /// Translation of `transform` re-expressed about this pivot.
    pub fn translation_for(&self, transform: &SimilarityTransform) -> DVec3 {
        transform.translation_about(self.0)
    }
}

impl From<DVec3> for RotationCenter {
    fn from(value: DVec3) -> Self {
        Self(value)
    }
}
