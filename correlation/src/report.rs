//! Plain text correlation report.
//!
//! Tab-delimited and meant for humans; nothing reads it back.

use std::fmt::Write as _;
use std::path::Path;

use crate::config::QualityThresholds;
use crate::error::CorrelationError;
use crate::pipeline::CorrelationResult;

pub struct CorrelationReport<'a> {
    result: &'a CorrelationResult,
    thresholds: &'a QualityThresholds,
}

impl<'a> CorrelationReport<'a> {
    pub fn new(result: &'a CorrelationResult, thresholds: &'a QualityThresholds) -> Self {
        Self { result, thresholds }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn write_to(&self, path: &Path) -> Result<(), CorrelationError> {
        std::fs::write(path, self.render()).map_err(|source| {
            tracing::warn!("Failed to write report {}: {}", path.display(), source);
            CorrelationError::ReportWrite {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}

impl std::fmt::Display for CorrelationReport<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let r = self.result;
        let t = &r.transform;
        let residuals = &r.residuals;
        let [q0, q1, q2, q3] = t.quaternion();
        let euler = t.euler_angles().to_degrees();
        let d = t.translation();
        let center = r.rotation_center.position();
        let d_center = r.translation_about_center;
        let mean = residuals.mean_abs_delta();
        let (mean_grade, rms_grade) = r.quality(self.thresholds);

        writeln!(f, "# Correlation")?;
        writeln!(f, "markers\t{}", residuals.len())?;
        writeln!(
            f,
            "points_of_interest\t{}",
            r.projected_spots.as_ref().map_or(0, |s| s.len())
        )?;
        writeln!(f, "quaternion_q0_q1_q2_q3\t{q0:.8}\t{q1:.8}\t{q2:.8}\t{q3:.8}")?;
        writeln!(
            f,
            "euler_deg_phi_theta_psi\t{:.3}\t{:.3}\t{:.3}",
            euler.phi, euler.theta, euler.psi
        )?;
        writeln!(f, "scale\t{:.6}", t.scale())?;
        writeln!(f, "translation\t{:.3}\t{:.3}\t{:.3}", d.x, d.y, d.z)?;
        writeln!(
            f,
            "rotation_center\t{:.3}\t{:.3}\t{:.3}",
            center.x, center.y, center.z
        )?;
        writeln!(
            f,
            "translation_about_center\t{:.3}\t{:.3}\t{:.3}",
            d_center.x, d_center.y, d_center.z
        )?;
        writeln!(
            f,
            "centroid_3d\t{:.3}\t{:.3}\t{:.3}",
            r.centroid_3d.x, r.centroid_3d.y, r.centroid_3d.z
        )?;
        writeln!(f, "rms_error\t{:.5}\t{}", t.rms_error(), rms_grade)?;
        writeln!(f, "mean_abs_delta\t{:.5}\t{:.5}\t{}", mean.x, mean.y, mean_grade)?;
        for warning in &r.warnings {
            writeln!(f, "warning\t{warning}")?;
        }

        writeln!(f)?;
        writeln!(f, "# Residuals")?;
        writeln!(
            f,
            "nr\tobserved_x\tobserved_y\tpredicted_x\tpredicted_y\tdx\tdy"
        )?;
        let rows = residuals
            .observed()
            .iter()
            .zip(residuals.predicted())
            .zip(residuals.deltas());
        for (i, ((o, p), delta)) in rows.enumerate() {
            writeln!(
                f,
                "{}\t{:.5}\t{:.5}\t{:.5}\t{:.5}\t{:.5}\t{:.5}",
                i + 1,
                o.x,
                o.y,
                p.x,
                p.y,
                delta.x,
                delta.y
            )?;
        }

        if let Some(spots) = &r.projected_spots {
            writeln!(f)?;
            writeln!(f, "# Points of interest")?;
            writeln!(f, "nr\tpredicted_x\tpredicted_y")?;
            let mut rows = String::new();
            for (i, s) in spots.iter().enumerate() {
                let _ = writeln!(rows, "{}\t{:.5}\t{:.5}", i + 1, s.x, s.y);
            }
            f.write_str(&rows)?;
        }

        Ok(())
    }
}
