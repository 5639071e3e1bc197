//! Full correlation run: fit, residuals, projection, pivot translation, report.
//!
//! # Stages
//!
//! 1. **Fit** - similarity transform from the marker pairs
//! 2. **Residuals** - observed minus predicted image positions
//! 3. **Projection** - points of interest into the image
//! 4. **Pivot** - translation re-expressed about the rotation center
//! 5. **Report** (optional) - plain text summary written to disk

mod result;

pub use result::CorrelationResult;

use std::path::Path;
use std::time::Instant;

use crate::config::CorrelationConfig;
use crate::error::CorrelationError;
use crate::estimator::estimate_similarity;
use crate::markers::CorrelationInput;
use crate::projector::project_spots;
use crate::report::CorrelationReport;
use crate::residuals::{ResidualSet, transformed_markers};
use crate::rotation_center::RotationCenter;


/// Runs correlations with a fixed configuration.
#[derive(Debug)]
pub struct Correlator {
    config: CorrelationConfig,
}

impl Default for Correlator {
    fn default() -> Self {
        Self::new(CorrelationConfig::default())
    }
}

impl Correlator {
    /// Create a new correlator with the given configuration.
    pub fn new(config: CorrelationConfig) -> Self {
        config.validate();
        Self { config }
    }

    pub fn config(&self) -> &CorrelationConfig {
        &self.config
    }

    /// Fit the markers and derive every result quantity.
    ///
    /// `rotation_center` defaults to [`RotationCenter::from_extent`] over all
    /// 3D points, fit markers and points of interest alike. Nothing is written.
    pub fn correlate(
        &self,
        input: &CorrelationInput,
        rotation_center: Option<RotationCenter>,
    ) -> Result<CorrelationResult, CorrelationError> {
        let start = Instant::now();
        let correspondences = &input.correspondences;

        let fit = estimate_similarity(correspondences, &self.config)?;
        let transform = fit.transform;

        let residuals = ResidualSet::compute(&transform, correspondences);
        let fitted_3d = transformed_markers(&transform, correspondences.markers_3d());
        let projected_spots = project_spots(&transform, &input.spots_3d);

        let rotation_center = rotation_center.unwrap_or_else(|| {
            let all_points: Vec<_> = correspondences
                .markers_3d()
                .iter()
                .chain(input.spots_3d.iter())
                .copied()
                .collect();
            RotationCenter::from_extent(&all_points)
        });
        let translation_about_center = rotation_center.translation_for(&transform);

        tracing::info!(
            "Correlated {} markers ({} points of interest): {}",
            correspondences.len(),
            input.spots_3d.len(),
            transform
        );

        let result = CorrelationResult {
            transform,
            fitted_3d,
            projected_spots,
            residuals,
            centroid_3d: fit.centroid_3d,
            rotation_center,
            translation_about_center,
            warnings: fit.warnings,
            elapsed_ms: 0.0,
        };

        Ok(result.with_elapsed(start.elapsed().as_secs_f64() * 1000.0))
    }

    /// [`Self::correlate`], then write the text report to `results_file`
    /// unless the path is empty.
    pub fn correlate_with_report(
        &self,
        input: &CorrelationInput,
        rotation_center: Option<RotationCenter>,
        results_file: &Path,
    ) -> Result<CorrelationResult, CorrelationError> {
        let result = self.correlate(input, rotation_center)?;

        if !results_file.as_os_str().is_empty() {
            CorrelationReport::new(&result, &self.config.quality).write_to(results_file)?;
            tracing::info!("Correlation report written to {}", results_file.display());
        }

        Ok(result)
    }
}

/// One-shot correlation with the default configuration.
///
/// ```ignore
/// let input = CorrelationInput::from_marker_tables(&markers_3d, &markers_2d)?;
/// let result = correlation::correlate(&input, None, None)?;
/// println!("RMS error: {:.3} px", result.rms_error());
/// ```
pub fn correlate(
    input: &CorrelationInput,
    rotation_center: Option<RotationCenter>,
    results_file: Option<&Path>,
) -> Result<CorrelationResult, CorrelationError> {
    let correlator = Correlator::default();
    match results_file {
        Some(path) => correlator.correlate_with_report(input, rotation_center, path),
        None => correlator.correlate(input, rotation_center),
    }
}
