//! Pipeline orchestration.
//!
//! Runs the six analysis stages in order, handing each stage's output to the
//! next. Data flows strictly forward; no stage reads back from a later one.

use anyhow::{Context, Result};
use log::info;

use crate::cluster;
use crate::features::KmerVectorizer;
use crate::io::{convert, fasta};
use crate::stats::silhouette;
use crate::visualization::plotter;
use crate::Args;

/// Executes the full analysis pipeline once.
pub fn run_pipeline(args: &Args) -> Result<()> {
    // 1. Convert CSV -> FASTA
    convert::csv_to_fasta(&args.input, args.seq_col, args.name_col, &args.fasta)
        .with_context(|| format!("converting {} to FASTA", args.input.display()))?;

    // 2. Load FASTA
    let (sequences, ids) = fasta::load_fasta(&args.fasta)
        .with_context(|| format!("loading {}", args.fasta.display()))?;

    // 3. Vectorization
    let vectorizer = KmerVectorizer::new(args.kmer_size)?;
    let x = vectorizer.fit_transform(&sequences);
    info!(
        "Feature matrix: {} sequences x {} k-mers",
        x.rows(),
        x.cols()
    );

    // 4. Clustering
    let condensed = cluster::pairwise_distances(&x, args.metric);
    let dist_matrix = cluster::squareform(&condensed, x.rows());
    let tree = cluster::linkage(&condensed, x.rows(), args.method)?;

    // 5. Visualizations
    plotter::plot_heatmap(&dist_matrix, &args.heatmap)?;
    info!("Wrote heatmap to {}", args.heatmap.display());
    plotter::plot_dendrogram(&tree, &ids, &args.dendrogram)?;
    info!("Wrote dendrogram to {}", args.dendrogram.display());

    // 6. Validation
    let (ks, scores) =
        silhouette::silhouette_sweep(&x, &tree, args.k_min, args.k_max, args.metric)
            .context("silhouette sweep over candidate cluster counts")?;
    plotter::plot_silhouette(&ks, &scores, &args.silhouette)?;
    info!("Wrote silhouette curve to {}", args.silhouette.display());

    Ok(())
}
