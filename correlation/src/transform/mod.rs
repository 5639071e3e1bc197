//! Similarity transform mapping 3D volume coordinates onto the 2D image plane.

mod euler;

pub use euler::EulerAngles;

use glam::{DMat3, DQuat, DVec2, DVec3};


/// Rotation + isotropic scale + translation: `p' = s * R(q) * p + d`.
///
/// The 2D image point of a 3D point is `p'` with z dropped. Built once per
/// correlation run and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityTransform {
    rotation: DQuat,
    scale: f64,
    translation: DVec3,
    rms_error: f64,
}

impl Default for SimilarityTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::fmt::Display for SimilarityTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let euler = self.euler_angles().to_degrees();
        write!(
            f,
            "Similarity(phi={:.3}°, theta={:.3}°, psi={:.3}°, scale={:.4}, dx={:.3}, dy={:.3}, dz={:.3}, rms={:.5})",
            euler.phi,
            euler.theta,
            euler.psi,
            self.scale,
            self.translation.x,
            self.translation.y,
            self.translation.z,
            self.rms_error
        )
    }
}

impl SimilarityTransform {
    pub fn identity() -> Self {
        Self {
            rotation: DQuat::IDENTITY,
            scale: 1.0,
            translation: DVec3::ZERO,
            rms_error: 0.0,
        }
    }

    /// Build from parts. The rotation is renormalized and put in the
    /// hemisphere with a non-negative scalar part.
    pub fn new(rotation: DQuat, scale: f64, translation: DVec3) -> Self {
        let rotation = rotation.normalize();
        let rotation = if rotation.w < 0.0 { -rotation } else { rotation };
        Self {
            rotation,
            scale,
            translation,
            rms_error: 0.0,
        }
    }

    /// Attach the RMS error of the fit that produced this transform.
    pub fn with_rms_error(mut self, rms_error: f64) -> Self {
        self.rms_error = rms_error;
        self
    }

    pub fn rotation(&self) -> DQuat {
        self.rotation
    }

    /// Quaternion as `[q0, q1, q2, q3]`, scalar first.
    pub fn quaternion(&self) -> [f64; 4] {
        [
            self.rotation.w,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        ]
    }

    pub fn rotation_matrix(&self) -> DMat3 {
        DMat3::from_quat(self.rotation)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translation(&self) -> DVec3 {
        self.translation
    }

    pub fn rms_error(&self) -> f64 {
        self.rms_error
    }

    /// Euler angles (radians) for display. Never used for computation.
    pub fn euler_angles(&self) -> EulerAngles {
        EulerAngles::from_quat(self.rotation)
    }

    /// `s * R(q) * p + d`, keeping z.
    #[inline]
    pub fn apply(&self, p: DVec3) -> DVec3 {
        self.scale * (self.rotation * p) + self.translation
    }

    /// Image-plane position of a 3D point (z dropped).
    #[inline]
    pub fn project(&self, p: DVec3) -> DVec2 {
        self.apply(p).truncate()
    }

    /// Translation re-expressed for rotation about `pivot` instead of the origin.
    ///
    /// Returns `d_r` with `s * R * (p - r) + r + d_r == s * R * p + d` for every
    /// `p`, i.e. `d_r = d + s * R * r - r`. Predictions do not change.
    pub fn translation_about(&self, pivot: DVec3) -> DVec3 {
        self.translation + self.scale * (self.rotation * pivot) - pivot
    }

    /// Apply the transform in its pivot parameterization. Equals [`Self::apply`].
    pub fn apply_about(&self, pivot: DVec3, translation_about_pivot: DVec3, p: DVec3) -> DVec3 {
        self.scale * (self.rotation * (p - pivot)) + pivot + translation_about_pivot
    }
}
