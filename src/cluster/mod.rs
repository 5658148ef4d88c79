//! Hierarchical clustering engine.
//!
//! - `distance`: condensed pairwise-distance vector and square-form
//!   expansion over the sparse feature matrix.
//! - `linkage`: agglomerative merge tree and flat-cluster cutting.

pub mod distance;
pub mod linkage;

use thiserror::Error;

pub use distance::{pairwise_distances, squareform, Metric};
pub use linkage::{linkage, LinkageMethod, LinkageTree, Merge};

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("empty input: no observations to cluster")]
    EmptyInput,

    #[error("degenerate partition: {0}")]
    DegeneratePartition(String),
}
