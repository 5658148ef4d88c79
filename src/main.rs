//! Main entry point for the viralclust application.
//!
//! Exploratory hierarchical clustering of viral genomic sequences:
//! 1. Convert a tabular sequence dataset (CSV) into FASTA.
//! 2. Load the FASTA records.
//! 3. Vectorize sequences with k-mer TF-IDF.
//! 4. Compute pairwise distances and build a UPGMA linkage tree.
//! 5. Render a distance heatmap and a dendrogram.
//! 6. Sweep candidate cluster counts and plot silhouette scores.

mod cli;
mod cluster;
mod features;
mod io;
mod stats;
mod visualization;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::error;

use crate::cluster::{LinkageMethod, Metric};

/// Define command-line arguments using clap.
///
/// Every parameter has a default, so a bare invocation runs the full
/// analysis end to end.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input CSV file with one sequence record per row.
    #[arg(
        short,
        long,
        default_value = "Genetic-Sequences-for-the-SARS-CoV-2-Coronavirus.csv"
    )]
    input: PathBuf,

    /// Zero-based index of the sequence column in the CSV.
    #[arg(long, default_value_t = 6)]
    seq_col: usize,

    /// Zero-based index of the name column in the CSV.
    #[arg(long, default_value_t = 0)]
    name_col: usize,

    /// Path of the intermediate FASTA file written by the converter.
    #[arg(long, default_value = "sequences.fasta")]
    fasta: PathBuf,

    /// K-mer size used for TF-IDF vectorization.
    #[arg(short = 'k', long, default_value_t = 6)]
    kmer_size: usize,

    /// Linkage method for the agglomerative clustering.
    #[arg(long, value_enum, default_value_t = LinkageMethod::Average)]
    method: LinkageMethod,

    /// Distance metric between feature vectors.
    #[arg(long, value_enum, default_value_t = Metric::Cosine)]
    metric: Metric,

    /// Smallest candidate cluster count for the silhouette sweep (inclusive).
    #[arg(long, default_value_t = 2)]
    k_min: usize,

    /// Largest candidate cluster count for the silhouette sweep (exclusive).
    #[arg(long, default_value_t = 10)]
    k_max: usize,

    /// Output path of the distance-matrix heatmap.
    #[arg(long, default_value = "heatmap.png")]
    heatmap: PathBuf,

    /// Output path of the dendrogram.
    #[arg(long, default_value = "dendrogram.png")]
    dendrogram: PathBuf,

    /// Output path of the silhouette-score curve.
    #[arg(long, default_value = "silhouette_score.png")]
    silhouette: PathBuf,
}

/// Main function: parses arguments and runs the analysis pipeline.
fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    if let Err(e) = cli::run_pipeline(&args) {
        error!("Pipeline failed: {:#}", e);
        return Err(e);
    }

    Ok(())
}
