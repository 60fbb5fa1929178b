//! Presentation of profiles and raw level samples.
//!
//! Every exporter gets the same fields in the same order: altitude,
//! wind speed (kts), wind direction (deg), plus the metadata block.

use std::path::Path;

use anyhow::Context;
use forecast_resolver::ResolvedRun;
use grid_sampler::GridCell;
use wind_profile::{LevelSample, Profile};

/// Render the metadata block shared by the table and CSV outputs.
fn metadata_lines(profile: &Profile, resolved: &ResolvedRun, cell: &GridCell) -> Vec<String> {
    let mut lines = vec![
        format!("model: {} ({})", resolved.model.id, resolved.model.name),
        format!("run: {}", resolved.run),
        format!(
            "grid point: {:.4}, {:.4} (row {}, col {})",
            cell.lat, cell.lon, cell.row, cell.col
        ),
        format!("altitude reference: {}", profile.reference),
    ];
    if let Some(valid) = profile.valid_time {
        lines.push(format!("valid: {}", valid.format("%Y-%m-%d %H:%MZ")));
    }
    if let Some(ground) = profile.ground_elevation_ft {
        lines.push(format!("ground elevation: {:.0} ft MSL", ground));
    }
    lines
}

/// Print the interpolated profile as a fixed-width table.
pub fn print_profile(profile: &Profile, resolved: &ResolvedRun, cell: &GridCell) {
    for line in metadata_lines(profile, resolved, cell) {
        println!("{}", line);
    }
    println!();
    println!("{:>11}  {:>14}  {:>18}", "Altitude_ft", "Wind_Speed_kts", "Wind_Direction_deg");
    for row in &profile.rows {
        println!(
            "{:>11.0}  {:>14.1}  {:>18.1}",
            row.altitude_ft, row.speed_kts, row.direction_deg
        );
    }
}

/// Print raw per-level samples without interpolation.
pub fn print_levels(samples: &[LevelSample], resolved: &ResolvedRun, cell: &GridCell) {
    println!("model: {} ({})", resolved.model.id, resolved.model.name);
    println!("run: {}", resolved.run);
    println!(
        "grid point: {:.4}, {:.4} (row {}, col {})",
        cell.lat, cell.lon, cell.row, cell.col
    );
    println!();
    println!(
        "{:>12}  {:>11}  {:>13}  {:>13}",
        "Pressure_hPa", "Altitude_ft", "Speed_mps", "Direction_deg"
    );
    for sample in samples {
        println!(
            "{:>12.1}  {:>11.0}  {:>13.1}  {:>13.1}",
            sample.pressure_hpa, sample.altitude_ft, sample.speed_mps, sample.direction_deg
        );
    }
}

/// Write the profile as CSV: metadata as comment lines, then a header,
/// then one row per altitude step.
pub fn write_csv(
    profile: &Profile,
    resolved: &ResolvedRun,
    cell: &GridCell,
    path: &Path,
) -> anyhow::Result<()> {
    let mut out = String::new();
    for line in metadata_lines(profile, resolved, cell) {
        out.push_str("# ");
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str("altitude_ft,wind_speed_kts,wind_direction_deg\n");
    for row in &profile.rows {
        out.push_str(&format!(
            "{:.0},{:.2},{:.2}\n",
            row.altitude_ft, row.speed_kts, row.direction_deg
        ));
    }

    std::fs::write(path, out)
        .with_context(|| format!("failed to write CSV to {}", path.display()))?;
    Ok(())
}
