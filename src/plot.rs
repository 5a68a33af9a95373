//! Convergence chart export.

use crate::error::Error;
use plotters::prelude::*;
use std::path::Path;

/// Draws the per-generation best cost as a line chart and writes it to
/// `path` as a bitmap image.
pub fn plot_convergence(path: &Path, title: &str, costs: &[f64]) -> Result<(), Error> {
    if costs.is_empty() {
        return Err(Error::configuration(
            "cannot plot an empty convergence series",
        ));
    }
    draw(path, title, costs)
        .map_err(|error| Error::persistence(format!("{}: {}", path.display(), error)))
}

fn draw(path: &Path, title: &str, costs: &[f64]) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let lowest = costs.iter().copied().fold(f64::INFINITY, f64::min);
    let highest = costs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // Flat series still need a visible band around the line.
    let margin = if highest > lowest {
        (highest - lowest) * 0.05
    } else {
        1.0
    };

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0..costs.len() as i32, (lowest - margin)..(highest + margin))?;

    chart
        .configure_mesh()
        .x_desc("Generation")
        .y_desc("Best cost")
        .draw()?;

    chart.draw_series(LineSeries::new(
        costs.iter().enumerate().map(|(generation, &cost)| (generation as i32, cost)),
        &RED,
    ))?;

    root.present()?;
    Ok(())
}
