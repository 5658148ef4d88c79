//! Raster plot rendering with `plotters`.
//!
//! Three independent renderings, each a pure function of its inputs that
//! saves a PNG and returns nothing consumed downstream: the distance-matrix
//! heatmap, the dendrogram, and the silhouette-score curve. Output files
//! are overwritten unconditionally.

use std::io;
use std::path::Path;

use log::warn;
use ndarray::Array2;
use plotters::prelude::*;
use plotters::style::colors::colormaps::{ColorMap, ViridisRGB};
use plotters::style::FontTransform;
use thiserror::Error;

use crate::cluster::LinkageTree;

#[derive(Error, Debug)]
pub enum VisualizationError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Plot error: {0}")]
    PlotError(String),
}

fn plot_err<E: std::fmt::Display>(e: E) -> VisualizationError {
    VisualizationError::PlotError(e.to_string())
}

/// Renders the square distance matrix as a viridis-mapped grid with no axis
/// labels. NaN entries are drawn in grey.
pub fn plot_heatmap(dist: &Array2<f64>, output: &Path) -> Result<(), VisualizationError> {
    let n = dist.nrows();
    let root = BitMapBackend::new(output, (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Distance Matrix Heatmap", ("sans-serif", 24))
        .margin(10)
        .build_cartesian_2d(0i32..n as i32, 0i32..n as i32)
        .map_err(plot_err)?;

    let max = dist
        .iter()
        .copied()
        .filter(|d| d.is_finite())
        .fold(0.0f64, f64::max)
        .max(f64::MIN_POSITIVE);

    chart
        .draw_series((0..n).flat_map(|i| (0..n).map(move |j| (i, j))).map(|(i, j)| {
            let d = dist[[i, j]];
            let color = if d.is_finite() {
                ViridisRGB.get_color((d / max).clamp(0.0, 1.0))
            } else {
                RGBColor(128, 128, 128)
            };
            // Row 0 is drawn at the top, matrix-style.
            Rectangle::new(
                [
                    (j as i32, (n - 1 - i) as i32),
                    (j as i32 + 1, (n - i) as i32),
                ],
                color.filled(),
            )
        }))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Renders the linkage tree as a dendrogram, leaves labeled by sequence
/// identifier with 90-degree rotation.
pub fn plot_dendrogram(
    tree: &LinkageTree,
    labels: &[String],
    output: &Path,
) -> Result<(), VisualizationError> {
    let n = tree.n_leaves();
    let merges = tree.merges();
    let order = tree.leaf_order();

    // X position and merge height per cluster id; leaves sit at height 0.
    let mut x = vec![0.0f64; n + merges.len()];
    let mut height = vec![0.0f64; n + merges.len()];
    for (slot, &leaf) in order.iter().enumerate() {
        x[leaf] = slot as f64 + 0.5;
    }
    for (t, merge) in merges.iter().enumerate() {
        x[n + t] = (x[merge.left] + x[merge.right]) / 2.0;
        height[n + t] = merge.distance;
    }

    let y_max = merges
        .iter()
        .map(|m| m.distance)
        .filter(|d| d.is_finite())
        .fold(0.0f64, f64::max)
        .max(1e-3)
        * 1.05;

    let root = BitMapBackend::new(output, (1600, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Hierarchical Clustering (UPGMA)", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(140)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..n as f64, 0.0..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(0)
        .y_desc("Cosine distance")
        .draw()
        .map_err(plot_err)?;

    // One U-shaped bridge per merge.
    let mut skipped = 0usize;
    chart
        .draw_series(merges.iter().enumerate().filter_map(|(t, merge)| {
            let h = height[n + t];
            let (hl, hr) = (height[merge.left], height[merge.right]);
            if !(h.is_finite() && hl.is_finite() && hr.is_finite()) {
                skipped += 1;
                return None;
            }
            Some(PathElement::new(
                vec![
                    (x[merge.left], hl),
                    (x[merge.left], h),
                    (x[merge.right], h),
                    (x[merge.right], hr),
                ],
                BLUE.stroke_width(2),
            ))
        }))
        .map_err(plot_err)?;
    if skipped > 0 {
        warn!("Skipped {} merges with non-finite heights in dendrogram", skipped);
    }

    // Leaf labels, rotated 90 degrees into the x label area.
    let label_style = ("sans-serif", 12)
        .into_font()
        .transform(FontTransform::Rotate90)
        .color(&BLACK);
    for (slot, &leaf) in order.iter().enumerate() {
        let name = labels.get(leaf).cloned().unwrap_or_else(|| leaf.to_string());
        let (px, py) = chart.backend_coord(&(slot as f64 + 0.5, 0.0));
        root.draw(&Text::new(name, (px + 4, py + 6), label_style.clone()))
            .map_err(plot_err)?;
    }

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Plots the silhouette-score series as a line chart with point markers.
pub fn plot_silhouette(
    ks: &[usize],
    scores: &[f64],
    output: &Path,
) -> Result<(), VisualizationError> {
    if ks.is_empty() || ks.len() != scores.len() {
        return Err(VisualizationError::PlotError(
            "empty or misaligned silhouette series".to_string(),
        ));
    }

    let x_min = *ks.first().expect("non-empty") as f64;
    let x_max = *ks.last().expect("non-empty") as f64;
    let (mut y_min, mut y_max) = scores
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| {
            (lo.min(s), hi.max(s))
        });
    let pad = ((y_max - y_min) * 0.1).max(0.01);
    y_min -= pad;
    y_max += pad;

    let root = BitMapBackend::new(output, (600, 400)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Cluster Validation", ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min - 0.5..x_max + 0.5, y_min..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Number of clusters")
        .y_desc("Silhouette score")
        .draw()
        .map_err(plot_err)?;

    let points: Vec<(f64, f64)> = ks
        .iter()
        .zip(scores)
        .map(|(&k, &s)| (k as f64, s))
        .collect();
    chart
        .draw_series(LineSeries::new(points.iter().copied(), BLUE.stroke_width(2)))
        .map_err(plot_err)?;
    chart
        .draw_series(
            points
                .iter()
                .map(|&(kx, s)| Circle::new((kx, s), 4, BLUE.filled())),
        )
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}
