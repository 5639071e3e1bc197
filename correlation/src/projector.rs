//! Predict image-plane positions of 3D points.

use glam::{DVec2, DVec3};

use crate::transform::SimilarityTransform;

/// Project points in order. Works for fit markers and for points of interest
/// that never took part in the fit.
pub fn project_points(transform: &SimilarityTransform, points: &[DVec3]) -> Vec<DVec2> {
    points.iter().map(|p| transform.project(*p)).collect()
}

/// Like [`project_points`], but `None` for an empty input so callers can tell
/// "no points of interest" apart from an empty projection.
pub fn project_spots(transform: &SimilarityTransform, spots: &[DVec3]) -> Option<Vec<DVec2>> {
    if spots.is_empty() {
        None
    } else {
        Some(project_points(transform, spots))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DQuat;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_projection_keeps_order() {
        let t = SimilarityTransform::new(
            DQuat::from_rotation_z(FRAC_PI_2),
            2.0,
            DVec3::new(5.0, 5.0, 0.0),
        );
        let projected = project_points(
            &t,
            &[
                DVec3::new(0.0, 10.0, 0.0),
                DVec3::new(5.0, 5.0, 0.0),
                DVec3::new(10.0, 0.0, 0.0),
            ],
        );
        let expected = [
            DVec2::new(-15.0, 5.0),
            DVec2::new(-5.0, 15.0),
            DVec2::new(5.0, 25.0),
        ];
        for (p, e) in projected.iter().zip(expected.iter()) {
            assert!((*p - *e).length() < 1e-12, "expected {e:?}, got {p:?}");
        }
    }

    #[test]
    fn test_depth_does_not_shift_projection_without_tilt() {
        let t = SimilarityTransform::identity();
        let a = project_points(&t, &[DVec3::new(3.0, 4.0, 0.0)]);
        let b = project_points(&t, &[DVec3::new(3.0, 4.0, 250.0)]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_spots_is_none() {
        let t = SimilarityTransform::identity();
        assert!(project_spots(&t, &[]).is_none());
        assert_eq!(
            project_spots(&t, &[DVec3::new(1.0, 1.0, 1.0)]),
            Some(vec![DVec2::new(1.0, 1.0)])
        );
    }
}
