//! Closed-form similarity fit of 3D markers onto 2D image markers.
//!
//! Absolute orientation in quaternion form (Horn, 1987): the optimal rotation
//! is the eigenvector of the largest eigenvalue of a symmetric 4x4 matrix built
//! from the cross-covariance of the centered point sets. 2D markers take part
//! as 3D points with z = 0. Scale uses the asymmetric least-squares form with
//! the 3D markers as source, translation aligns the centroids.

use glam::{DQuat, DVec2, DVec3};
use nalgebra::{Matrix3, Matrix4, SymmetricEigen, Vector3};

use common::float_ext::FloatExt;

use crate::config::CorrelationConfig;
use crate::error::{CorrelationError, DegeneracyKind, FitWarning};
use crate::markers::{Correspondences, centroid_2d, centroid_3d};
use crate::transform::SimilarityTransform;


/// Eigenvector norms below this are treated as a failed decomposition.
const MIN_QUATERNION_NORM: f64 = 1e-12;

/// Output of [`estimate_similarity`].
#[derive(Debug, Clone)]
pub struct SimilarityFit {
    pub transform: SimilarityTransform,
    /// Mean of the 3D fit markers; the fit is centered on it.
    pub centroid_3d: DVec3,
    pub centroid_2d: DVec2,
    /// Eigenvalues of the orientation matrix, largest first.
    pub orientation_eigenvalues: [f64; 4],
    pub warnings: Vec<FitWarning>,
}

/// Fit `s * R(q) * p3d + d ≈ (p2d, 0)` in the least-squares sense.
///
/// Rejects coincident or collinear 3D markers and a rank-deficient
/// cross-covariance with [`CorrelationError::DegenerateGeometry`]. A nearly
/// repeated largest eigenvalue still returns a fit, with a
/// [`FitWarning::DegenerateRotation`].
pub fn estimate_similarity(
    correspondences: &Correspondences,
    config: &CorrelationConfig,
) -> Result<SimilarityFit, CorrelationError> {
    let tolerance = config.degeneracy_tolerance;

    let src_centroid = centroid_3d(correspondences.markers_3d());
    let dst_centroid_2d = centroid_2d(correspondences.markers_2d());
    let dst_centroid = dst_centroid_2d.extend(0.0);

    let src_centered: Vec<DVec3> = correspondences
        .markers_3d()
        .iter()
        .map(|p| *p - src_centroid)
        .collect();
    let dst_centered: Vec<DVec3> = correspondences
        .markers_2d()
        .iter()
        .map(|p| p.extend(0.0) - dst_centroid)
        .collect();

    check_spread(correspondences.markers_3d(), &src_centered, tolerance)?;

    let cross_covariance = cross_covariance(&src_centered, &dst_centered);
    check_cross_covariance_rank(&cross_covariance, tolerance)?;

    let orientation = orientation_matrix(&cross_covariance);
    let eigen = SymmetricEigen::new(orientation);

    let mut order = [0usize, 1, 2, 3];
    order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));
    let eigenvalues = order.map(|i| eigen.eigenvalues[i]);

    tracing::debug!(
        "Orientation eigenvalues: {:.6e} {:.6e} {:.6e} {:.6e}",
        eigenvalues[0],
        eigenvalues[1],
        eigenvalues[2],
        eigenvalues[3]
    );

    let mut warnings = Vec::new();
    if eigenvalues[0].relatively_eq(eigenvalues[1], config.eigen_gap_tolerance) {
        let warning = FitWarning::DegenerateRotation {
            largest: eigenvalues[0],
            second: eigenvalues[1],
        };
        tracing::warn!("{}", warning);
        warnings.push(warning);
    }

    let q = eigen.eigenvectors.column(order[0]);
    let norm = q.norm();
    if norm.is_nan() || norm < MIN_QUATERNION_NORM {
        return Err(CorrelationError::DegenerateGeometry(
            DegeneracyKind::ZeroQuaternionNorm,
        ));
    }
    // Column layout is (q0, q1, q2, q3) with q0 the scalar part.
    let rotation = DQuat::from_xyzw(q[1] / norm, q[2] / norm, q[3] / norm, q[0] / norm);

    let scale = optimal_scale(rotation, &src_centered, &dst_centered)?;
    let translation = dst_centroid - scale * (rotation * src_centroid);

    let transform = SimilarityTransform::new(rotation, scale, translation);
    let rms_error = rms_error(&transform, correspondences);
    let transform = transform.with_rms_error(rms_error);

    tracing::debug!(
        "Centroids: 3D ({:.3}, {:.3}, {:.3}), 2D ({:.3}, {:.3})",
        src_centroid.x,
        src_centroid.y,
        src_centroid.z,
        dst_centroid_2d.x,
        dst_centroid_2d.y
    );

    Ok(SimilarityFit {
        transform,
        centroid_3d: src_centroid,
        centroid_2d: dst_centroid_2d,
        orientation_eigenvalues: eigenvalues,
        warnings,
    })
}

/// Reject 3D markers that are all identical or all on one line.
fn check_spread(
    points: &[DVec3],
    centered: &[DVec3],
    tolerance: f64,
) -> Result<(), CorrelationError> {
    let magnitude: f64 = points.iter().map(|p| p.length_squared()).sum();

    let mut scatter = Matrix3::<f64>::zeros();
    for p in centered {
        let v = Vector3::new(p.x, p.y, p.z);
        scatter += v * v.transpose();
    }

    if scatter.trace().is_negligible_against(magnitude, tolerance) {
        return Err(CorrelationError::DegenerateGeometry(
            DegeneracyKind::CoincidentPoints,
        ));
    }

    let mut spread: Vec<f64> = SymmetricEigen::new(scatter)
        .eigenvalues
        .iter()
        .copied()
        .collect();
    spread.sort_by(|a, b| b.total_cmp(a));

    if spread[1].is_negligible_against(spread[0], tolerance) {
        return Err(CorrelationError::DegenerateGeometry(
            DegeneracyKind::CollinearPoints,
        ));
    }

    Ok(())
}

/// `M[a][b] = Σ src_a * dst_b` over centered points.
fn cross_covariance(src: &[DVec3], dst: &[DVec3]) -> Matrix3<f64> {
    let mut m = Matrix3::<f64>::zeros();
    for (s, d) in src.iter().zip(dst.iter()) {
        m += Vector3::new(s.x, s.y, s.z) * Vector3::new(d.x, d.y, d.z).transpose();
    }
    m
}

fn check_cross_covariance_rank(m: &Matrix3<f64>, tolerance: f64) -> Result<(), CorrelationError> {
    let mut singular: Vec<f64> = m.singular_values().iter().copied().collect();
    singular.sort_by(|a, b| b.total_cmp(a));

    if singular[0] <= 0.0 || singular[1].is_negligible_against(singular[0], tolerance) {
        return Err(CorrelationError::DegenerateGeometry(
            DegeneracyKind::RankDeficientCrossCovariance,
        ));
    }
    Ok(())
}

/// Horn's symmetric 4x4 matrix. Its top eigenvector is the rotation quaternion
/// `(q0, q1, q2, q3)` taking source onto destination.
#[rustfmt::skip]
fn orientation_matrix(m: &Matrix3<f64>) -> Matrix4<f64> {
    let (sxx, sxy, sxz) = (m[(0, 0)], m[(0, 1)], m[(0, 2)]);
    let (syx, syy, syz) = (m[(1, 0)], m[(1, 1)], m[(1, 2)]);
    let (szx, szy, szz) = (m[(2, 0)], m[(2, 1)], m[(2, 2)]);

    Matrix4::new(
        sxx + syy + szz, syz - szy,        szx - sxz,        sxy - syx,
        syz - szy,       sxx - syy - szz,  sxy + syx,        szx + sxz,
        szx - sxz,       sxy + syx,        -sxx + syy - szz, syz + szy,
        sxy - syx,       szx + sxz,        syz + szy,        -sxx - syy + szz,
    )
}

/// `s = Σ (R p_i') · q_i' / Σ |p_i'|²`.
fn optimal_scale(
    rotation: DQuat,
    src_centered: &[DVec3],
    dst_centered: &[DVec3],
) -> Result<f64, CorrelationError> {
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (s, d) in src_centered.iter().zip(dst_centered.iter()) {
        numerator += (rotation * *s).dot(*d);
        denominator += s.length_squared();
    }

    if !denominator.is_finite() || denominator <= 0.0 {
        return Err(CorrelationError::DegenerateGeometry(
            DegeneracyKind::ZeroScaleDenominator,
        ));
    }

    let scale = numerator / denominator;
    if scale.is_nan() || scale <= 0.0 {
        return Err(CorrelationError::DegenerateGeometry(
            DegeneracyKind::NonPositiveScale,
        ));
    }
    Ok(scale)
}

/// `sqrt(Σ |s R p_i + d - (q_i, 0)|² / N)`.
pub fn rms_error(transform: &SimilarityTransform, correspondences: &Correspondences) -> f64 {
    if correspondences.is_empty() {
        return 0.0;
    }

    let sum_sq: f64 = correspondences
        .iter()
        .map(|(p3, p2)| (transform.apply(p3) - p2.extend(0.0)).length_squared())
        .sum();
    (sum_sq / correspondences.len() as f64).sqrt()
}
