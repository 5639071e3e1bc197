//! Example: Marker Correlation
//!
//! Correlates a small set of fiducial markers picked in a 3D stack with the
//! same markers picked in a 2D image:
//! 1. Build the input from marker tables (fit markers, then points of interest)
//! 2. Fit the similarity transform
//! 3. Print rotation, scale, translation and per-marker residuals
//! 4. Optionally write the tab-delimited report
//!
//! # Usage
//!
//! ```bash
//! cargo run --example correlate_markers -- [report.txt] [config.yaml]
//! ```

use std::env;
use std::path::Path;

use anyhow::Context;
use glam::{DVec2, DVec3};

use common::log_setup::setup_logging;
use correlation::{CorrelationConfig, CorrelationInput, Correlator, FileFormat, RotationCenter};

fn main() -> anyhow::Result<()> {
    setup_logging("info");

    let args: Vec<String> = env::args().collect();
    let report_path = args.get(1).map(Path::new);

    let config = match args.get(2) {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {path}"))?;
            let format = FileFormat::from_file_name(path)?;
            CorrelationConfig::parse(&text, format)?
        }
        None => CorrelationConfig::default(),
    };

    // Bead positions in the stack (pixels, z in slices); the last row is the
    // fluorescent spot whose image position we want.
    let markers_3d = [
        DVec3::new(112.0, 340.5, 22.0),
        DVec3::new(498.3, 315.0, 40.5),
        DVec3::new(460.7, 702.2, 31.0),
        DVec3::new(141.4, 655.8, 18.5),
        DVec3::new(300.0, 500.0, 60.0),
        DVec3::new(288.5, 471.0, 35.0),
    ];
    // The same beads in the image, as picked by hand.
    let markers_2d = [
        DVec2::new(1210.4, 830.2),
        DVec2::new(1980.9, 776.5),
        DVec2::new(1907.1, 1555.3),
        DVec2::new(1270.6, 1468.0),
        DVec2::new(1592.0, 1143.8),
    ];

    let input = CorrelationInput::from_marker_tables(&markers_3d, &markers_2d)?;
    println!(
        "Correlating {} markers, {} point(s) of interest",
        input.correspondences.len(),
        input.spots_3d.len()
    );

    let correlator = Correlator::new(config);
    let center = RotationCenter::cube(1024.0);
    let result = match report_path {
        Some(path) => correlator.correlate_with_report(&input, Some(center), path)?,
        None => correlator.correlate(&input, Some(center))?,
    };

    let t = &result.transform;
    let euler = t.euler_angles().to_degrees();
    let [q0, q1, q2, q3] = t.quaternion();
    println!("\nTransform: {t}");
    println!("  Quaternion: ({q0:.6}, {q1:.6}, {q2:.6}, {q3:.6})");
    println!(
        "  Euler (phi, theta, psi): {:.3}, {:.3}, {:.3} deg",
        euler.phi, euler.theta, euler.psi
    );
    println!("  Scale: {:.5}", t.scale());
    let d = result.translation_about_center;
    println!(
        "  Translation about {:?}: ({:.3}, {:.3}, {:.3})",
        center.position(),
        d.x,
        d.y,
        d.z
    );

    let (mean_grade, rms_grade) = result.quality(&correlator.config().quality);
    println!("\nResiduals (observed - predicted):");
    for (i, delta) in result.residuals.deltas().iter().enumerate() {
        println!("  #{:<2} dx = {:+.3}  dy = {:+.3}", i + 1, delta.x, delta.y);
    }
    let mean = result.residuals.mean_abs_delta();
    println!(
        "  Mean |dx| = {:.3}, |dy| = {:.3} ({mean_grade})",
        mean.x, mean.y
    );
    println!("  RMS error: {:.3} ({rms_grade})", result.rms_error());
    if let Some((index, magnitude)) = result.residuals.worst() {
        println!("  Worst marker: #{} ({magnitude:.3} px)", index + 1);
    }

    for warning in &result.warnings {
        println!("\nWarning: {warning}");
    }

    if let Some(spots) = &result.projected_spots {
        println!("\nPoints of interest:");
        for (i, s) in spots.iter().enumerate() {
            println!("  #{} -> ({:.2}, {:.2})", i + 1, s.x, s.y);
        }
    }

    if let Some(path) = report_path {
        println!("\nReport written to {}", path.display());
    }
    println!("Elapsed: {:.2} ms", result.elapsed_ms);

    Ok(())
}
