//! Cluster validation statistics.

pub mod silhouette;
