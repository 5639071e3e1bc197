//! Euler angles in the x-convention (z-x-z) for displaying a fitted rotation.
//!
//! The rotation matrix is `R = Rz(psi) * Rx(theta) * Rz(phi)`: first `phi`
//! about z, then `theta` about the new x, then `psi` about z again.

use glam::{DMat3, DQuat};

/// Below this `sin(theta)` the first and last z rotations are not separable.
const GIMBAL_LOCK_SIN: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerAngles {
    pub phi: f64,
    pub theta: f64,
    pub psi: f64,
}

impl EulerAngles {
    pub fn new(phi: f64, theta: f64, psi: f64) -> Self {
        Self { phi, theta, psi }
    }

    pub fn from_quat(q: DQuat) -> Self {
        Self::from_matrix(&DMat3::from_quat(q.normalize()))
    }

    /// Extract `(phi, theta, psi)` from a rotation matrix.
    ///
    /// `theta` is in `[0, pi]`. At gimbal lock (`theta` near 0 or pi) only the
    /// combined z rotation is defined; it is reported entirely as `psi` with
    /// `phi = 0`.
    pub fn from_matrix(r: &DMat3) -> Self {
        // r(i, j): row i, column j (glam stores columns).
        let r = |i: usize, j: usize| r.col(j)[i];

        // Rounding can push |r22| slightly past 1.
        let theta = r(2, 2).clamp(-1.0, 1.0).acos();
        let sin_theta = r(2, 0).hypot(r(2, 1));

        if sin_theta < GIMBAL_LOCK_SIN {
            // theta = 0: R = Rz(phi + psi); theta = pi: R = Rz(psi - phi) * Rx(pi).
            // Either way entries (0,0) and (1,0) carry the remaining angle.
            let psi = r(1, 0).atan2(r(0, 0));
            return Self::new(0.0, theta, psi);
        }

        let phi = r(2, 0).atan2(r(2, 1));
        let psi = r(0, 2).atan2(-r(1, 2));
        Self::new(phi, theta, psi)
    }

    /// Rebuild the rotation these angles describe.
    pub fn to_quat(&self) -> DQuat {
        DQuat::from_rotation_z(self.psi)
            * DQuat::from_rotation_x(self.theta)
            * DQuat::from_rotation_z(self.phi)
    }

    pub fn to_degrees(&self) -> Self {
        Self::new(
            self.phi.to_degrees(),
            self.theta.to_degrees(),
            self.psi.to_degrees(),
        )
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.phi, self.theta, self.psi]
    }
}
