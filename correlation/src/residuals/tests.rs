use super::*;
use crate::config::CorrelationConfig;
use crate::estimator::estimate_similarity;
use glam::DQuat;
use std::f64::consts::FRAC_PI_2;

fn quarter_turn() -> SimilarityTransform {
    SimilarityTransform::new(
        DQuat::from_rotation_z(FRAC_PI_2),
        2.0,
        DVec3::new(5.0, 5.0, 0.0),
    )
}

fn noisy_correspondences() -> Correspondences {
    Correspondences::new(
        vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(10.0, 0.0, 0.0),
            DVec3::new(0.0, 10.0, 0.0),
            DVec3::new(10.0, 10.0, 0.0),
            DVec3::new(4.0, 7.0, 0.0),
        ],
        vec![
            DVec2::new(5.3, 4.8),
            DVec2::new(5.0, 25.4),
            DVec2::new(-15.2, 5.0),
            DVec2::new(-14.6, 25.1),
            DVec2::new(-9.0, 13.0),
        ],
    )
    .unwrap()
}

#[test]
fn test_exact_transform_has_zero_deltas() {
    let correspondences = Correspondences::new(
        vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(10.0, 0.0, 0.0),
            DVec3::new(0.0, 10.0, 0.0),
        ],
        vec![
            DVec2::new(5.0, 5.0),
            DVec2::new(5.0, 25.0),
            DVec2::new(-15.0, 5.0),
        ],
    )
    .unwrap();

    let residuals = ResidualSet::compute(&quarter_turn(), &correspondences);

    assert_eq!(residuals.len(), 3);
    for d in residuals.deltas() {
        assert!(d.length() < 1e-12, "expected zero delta, got {d:?}");
    }
    assert!(residuals.mean_abs_delta().length() < 1e-12);
}

#[test]
fn test_delta_is_observed_minus_predicted() {
    let correspondences = Correspondences::new(
        vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(10.0, 0.0, 0.0),
            DVec3::new(0.0, 10.0, 0.0),
        ],
        vec![
            DVec2::new(6.0, 5.0),
            DVec2::new(5.0, 23.0),
            DVec2::new(-15.0, 5.0),
        ],
    )
    .unwrap();

    let residuals = ResidualSet::compute(&quarter_turn(), &correspondences);
    let deltas = residuals.deltas();

    assert!((deltas[0] - DVec2::new(1.0, 0.0)).length() < 1e-12);
    assert!((deltas[1] - DVec2::new(0.0, -2.0)).length() < 1e-12);
    assert!(deltas[2].length() < 1e-12);
    assert!((residuals.mean_abs_delta() - DVec2::new(1.0 / 3.0, 2.0 / 3.0)).length() < 1e-12);
}

#[test]
fn test_absolute_view_does_not_change_stored_deltas() {
    let correspondences = noisy_correspondences();
    let fit = estimate_similarity(&correspondences, &CorrelationConfig::default()).unwrap();
    let residuals = ResidualSet::compute(&fit.transform, &correspondences);
    let before = residuals.deltas().to_vec();

    let absolute = residuals.display_deltas(true);
    assert!(absolute.iter().all(|d| d.x >= 0.0 && d.y >= 0.0));
    assert!(before.iter().any(|d| d.x < 0.0 || d.y < 0.0));
    assert_eq!(residuals.deltas(), &before[..]);
    assert_eq!(residuals.display_deltas(false), before);
}

#[test]
fn test_centroid_fit_deltas_sum_to_zero() {
    let correspondences = noisy_correspondences();
    let fit = estimate_similarity(&correspondences, &CorrelationConfig::default()).unwrap();
    let residuals = ResidualSet::compute(&fit.transform, &correspondences);

    assert!(residuals.magnitudes().iter().any(|m| *m > 0.01));
    assert!(
        residuals.delta_sum().length() < 1e-9,
        "delta sum = {:?}",
        residuals.delta_sum()
    );
}

#[test]
fn test_projection_reproduces_observations_within_rms() {
    let correspondences = noisy_correspondences();
    let fit = estimate_similarity(&correspondences, &CorrelationConfig::default()).unwrap();
    let residuals = ResidualSet::compute(&fit.transform, &correspondences);

    let n = residuals.len() as f64;
    let bound = fit.transform.rms_error() * n.sqrt();
    for m in residuals.magnitudes() {
        assert!(m <= bound + 1e-12, "residual {m} exceeds {bound}");
    }
    assert_eq!(residuals.rms_error(), fit.transform.rms_error());
}

#[test]
fn test_worst_marker_and_shift() {
    let correspondences = Correspondences::new(
        vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(10.0, 0.0, 0.0),
            DVec3::new(0.0, 10.0, 0.0),
        ],
        vec![
            DVec2::new(5.5, 5.0),
            DVec2::new(5.0, 22.0),
            DVec2::new(-15.0, 5.25),
        ],
    )
    .unwrap();
    let residuals = ResidualSet::compute(&quarter_turn(), &correspondences);

    let (index, magnitude) = residuals.worst().unwrap();
    assert_eq!(index, 1);
    assert!((magnitude - 3.0).abs() < 1e-12);

    // Shifting the mis-clicked marker lands it on the prediction.
    let shifted = residuals.shifted_marker(1).unwrap();
    assert!((shifted - DVec2::new(5.0, 25.0)).length() < 1e-12);
    assert!(residuals.shifted_marker(3).is_none());
}

#[test]
fn test_quality_grades() {
    let thresholds = QualityThresholds::default();
    let grade = |mean: DVec2, rms: f64| {
        let set = ResidualSet {
            observed: vec![],
            predicted: vec![],
            deltas: vec![],
            mean_abs_delta: mean,
            rms_error: rms,
        };
        (
            set.grade_mean_delta(&thresholds),
            set.grade_rms(&thresholds),
        )
    };

    assert_eq!(
        grade(DVec2::new(0.4, 1.0), 0.5),
        (QualityGrade::Good, QualityGrade::Good)
    );
    assert_eq!(
        grade(DVec2::new(1.5, 3.0), 1.0),
        (QualityGrade::Marginal, QualityGrade::Marginal)
    );
    assert_eq!(
        grade(DVec2::new(2.0, 2.5), 4.0),
        (QualityGrade::Poor, QualityGrade::Marginal)
    );
}

#[test]
fn test_transformed_markers_keep_depth() {
    let t = SimilarityTransform::new(DQuat::IDENTITY, 2.0, DVec3::new(0.0, 0.0, 1.0));
    let out = transformed_markers(&t, &[DVec3::new(1.0, 2.0, 3.0)]);
    assert_eq!(out, vec![DVec3::new(2.0, 4.0, 7.0)]);
}
