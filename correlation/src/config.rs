//! Numerical tolerances and result grading thresholds.
//!
//! Geometry never lives here: markers and the rotation center are passed to
//! [`crate::correlate`] explicitly. The config only controls how strictly
//! degenerate input is rejected and how residuals are graded.

use serde::{Deserialize, Serialize};

use common::{FileFormat, SerdeFormatResult};

/// Minimum number of marker pairs for a similarity fit.
pub const MIN_MARKERS: usize = 3;

// =============================================================================
// Quality thresholds
// =============================================================================

/// Pixel thresholds used to grade a fit.
///
/// Defaults follow the traffic-light display of the marker picking tool:
/// mean |dx|,|dy| up to 1 px is good, below 2 px on either axis is marginal,
/// RMS below 1 px is good.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    /// Both mean absolute deltas at or below this are graded good.
    pub good_mean_delta: f64,
    /// Either mean absolute delta below this is graded marginal.
    pub marginal_mean_delta: f64,
    /// RMS error below this is graded good.
    pub good_rms: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            good_mean_delta: 1.0,
            marginal_mean_delta: 2.0,
            good_rms: 1.0,
        }
    }
}

impl QualityThresholds {
    pub fn validate(&self) {
        assert!(
            self.good_mean_delta > 0.0,
            "good_mean_delta must be positive, got {}",
            self.good_mean_delta
        );
        assert!(
            self.marginal_mean_delta >= self.good_mean_delta,
            "marginal_mean_delta ({}) must not be below good_mean_delta ({})",
            self.marginal_mean_delta,
            self.good_mean_delta
        );
        assert!(
            self.good_rms > 0.0,
            "good_rms must be positive, got {}",
            self.good_rms
        );
    }
}

// =============================================================================
// Correlation configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Relative tolerance for rejecting coincident/collinear markers and a
    /// rank-deficient cross-covariance. Compared against the largest
    /// eigen/singular value of the respective matrix.
    pub degeneracy_tolerance: f64,
    /// Relative gap between the two largest eigenvalues of the orientation
    /// matrix below which a [`crate::FitWarning::DegenerateRotation`] is raised.
    pub eigen_gap_tolerance: f64,
    pub quality: QualityThresholds,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            degeneracy_tolerance: 1e-10,
            eigen_gap_tolerance: 1e-9,
            quality: QualityThresholds::default(),
        }
    }
}

impl CorrelationConfig {
    /// Panics on out-of-range values.
    pub fn validate(&self) {
        assert!(
            self.degeneracy_tolerance > 0.0 && self.degeneracy_tolerance < 1.0,
            "degeneracy_tolerance must be in (0, 1), got {}",
            self.degeneracy_tolerance
        );
        assert!(
            self.eigen_gap_tolerance >= 0.0 && self.eigen_gap_tolerance < 1.0,
            "eigen_gap_tolerance must be in [0, 1), got {}",
            self.eigen_gap_tolerance
        );
        self.quality.validate();
    }

    /// Parse a config from YAML or JSON text. Missing fields take defaults.
    pub fn parse(text: &str, format: FileFormat) -> SerdeFormatResult<Self> {
        common::deserialize(text, format)
    }

    pub fn to_text(&self, format: FileFormat) -> SerdeFormatResult<String> {
        common::serialize(self, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        CorrelationConfig::default().validate();
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config =
            CorrelationConfig::parse("eigen_gap_tolerance: 1.0e-6\n", FileFormat::Yaml).unwrap();
        assert_eq!(config.eigen_gap_tolerance, 1e-6);
        assert_eq!(config.degeneracy_tolerance, 1e-10);
        assert_eq!(config.quality, QualityThresholds::default());
    }

    #[test]
    fn test_nested_quality_from_json() {
        let config = CorrelationConfig::parse(
            r#"{"quality": {"good_mean_delta": 0.5, "marginal_mean_delta": 1.5}}"#,
            FileFormat::Json,
        )
        .unwrap();
        assert_eq!(config.quality.good_mean_delta, 0.5);
        assert_eq!(config.quality.marginal_mean_delta, 1.5);
        assert_eq!(config.quality.good_rms, 1.0);
        config.validate();
    }

    #[test]
    fn test_yaml_text_reparses_to_same_config() {
        let config = CorrelationConfig {
            degeneracy_tolerance: 1e-8,
            ..Default::default()
        };
        let text = config.to_text(FileFormat::Yaml).unwrap();
        assert_eq!(CorrelationConfig::parse(&text, FileFormat::Yaml).unwrap(), config);
    }

    #[test]
    #[should_panic(expected = "degeneracy_tolerance")]
    fn test_zero_degeneracy_tolerance_panics() {
        CorrelationConfig {
            degeneracy_tolerance: 0.0,
            ..Default::default()
        }
        .validate();
    }

    #[test]
    #[should_panic(expected = "marginal_mean_delta")]
    fn test_inverted_quality_thresholds_panic() {
        QualityThresholds {
            good_mean_delta: 2.0,
            marginal_mean_delta: 1.0,
            good_rms: 1.0,
        }
        .validate();
    }
}
