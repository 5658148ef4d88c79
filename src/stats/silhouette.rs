//! Silhouette scoring and the cluster-count sweep.
//!
//! The silhouette of a point compares its mean distance to its own cluster
//! (cohesion) against its mean distance to the nearest other cluster
//! (separation): s = (b - a) / max(a, b). The score of a partition is the
//! mean over all points. Singleton clusters score 0 for their member.

use log::info;
use ndarray::Array2;
use sprs::CsMat;

use crate::cluster::{pairwise_distances, squareform, ClusterError, LinkageTree, Metric};

/// Mean silhouette of the partition given a precomputed distance matrix and
/// one label per observation.
///
/// Fails with [`ClusterError::DegeneratePartition`] when fewer than two
/// clusters are populated, when a single cluster holds every observation,
/// or when the score is undefined (all relevant distances zero or NaN).
pub fn silhouette_score(dist: &Array2<f64>, labels: &[usize]) -> Result<f64, ClusterError> {
    let n = labels.len();
    if n == 0 {
        return Err(ClusterError::EmptyInput);
    }
    let max_label = *labels.iter().max().expect("labels is non-empty");
    let mut cluster_sizes = vec![0usize; max_label + 1];
    for &l in labels {
        cluster_sizes[l] += 1;
    }
    let populated = cluster_sizes.iter().filter(|&&s| s > 0).count();
    if populated < 2 {
        return Err(ClusterError::DegeneratePartition(format!(
            "silhouette requires at least 2 populated clusters, found {}",
            populated
        )));
    }
    if cluster_sizes.iter().any(|&s| s == n) {
        return Err(ClusterError::DegeneratePartition(
            "one cluster contains every observation".to_string(),
        ));
    }

    let mut total = 0.0f64;
    for i in 0..n {
        // Mean distance from point i to each cluster.
        let mut dist_sums = vec![0.0f64; max_label + 1];
        for j in 0..n {
            if j != i {
                dist_sums[labels[j]] += dist[[i, j]];
            }
        }

        let own = labels[i];
        if cluster_sizes[own] == 1 {
            // Singleton clusters contribute a neutral score.
            continue;
        }
        let a = dist_sums[own] / (cluster_sizes[own] - 1) as f64;
        let b = dist_sums
            .iter()
            .enumerate()
            .filter(|&(l, _)| l != own && cluster_sizes[l] > 0)
            .map(|(l, &sum)| sum / cluster_sizes[l] as f64)
            .fold(f64::INFINITY, f64::min);

        total += (b - a) / a.max(b);
    }

    let score = total / n as f64;
    if !score.is_finite() {
        return Err(ClusterError::DegeneratePartition(
            "silhouette score is undefined for this partition".to_string(),
        ));
    }
    Ok(score)
}

/// Sweeps candidate cluster counts over [k_min, k_max), cutting the linkage
/// tree at each count and scoring the resulting partition against the
/// feature matrix with the given metric.
///
/// Returns the parallel vectors of counts and scores. Any degenerate
/// candidate aborts the sweep.
pub fn silhouette_sweep(
    x: &CsMat<f64>,
    tree: &LinkageTree,
    k_min: usize,
    k_max: usize,
    metric: Metric,
) -> Result<(Vec<usize>, Vec<f64>), ClusterError> {
    let n = tree.n_leaves();
    let condensed = pairwise_distances(x, metric);
    let dist = squareform(&condensed, n);

    let mut ks = Vec::new();
    let mut scores = Vec::new();
    for k in k_min..k_max {
        if k < 2 || k >= n {
            return Err(ClusterError::DegeneratePartition(format!(
                "candidate count {} is out of range for {} observations",
                k, n
            )));
        }
        let labels = tree.cut(k)?;
        let score = silhouette_score(&dist, &labels)?;
        info!("Silhouette score for k={}: {:.4}", k, score);
        ks.push(k);
        scores.push(score);
    }
    Ok((ks, scores))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{linkage, LinkageMethod};
    use crate::features::KmerVectorizer;

    fn features(raw: &[&str], k: usize) -> CsMat<f64> {
        let seqs: Vec<String> = raw.iter().map(|s| s.to_string()).collect();
        KmerVectorizer::new(k).unwrap().fit_transform(&seqs)
    }

    fn sweep(
        raw: &[&str],
        kmer: usize,
        k_min: usize,
        k_max: usize,
    ) -> Result<(Vec<usize>, Vec<f64>), ClusterError> {
        let x = features(raw, kmer);
        let condensed = pairwise_distances(&x, Metric::Cosine);
        let tree = linkage(&condensed, x.rows(), LinkageMethod::Average).unwrap();
        silhouette_sweep(&x, &tree, k_min, k_max, Metric::Cosine)
    }

    #[test]
    fn test_two_tight_groups_score_high_at_two() {
        let raw = [
            "ACGTACGTACGT",
            "ACGTACGTACGA",
            "TTGGCCTTGGCC",
            "TTGGCCTTGGCA",
        ];
        let (ks, scores) = sweep(&raw, 4, 2, 4).unwrap();
        assert_eq!(ks, vec![2, 3]);
        assert!(scores[0] > scores[1], "k=2 should fit two groups best");
        assert!(scores[0] > 0.5);
    }

    #[test]
    fn test_identical_sequences_fail_explicitly() {
        // Three identical sequences: all pairwise distances are zero, so
        // every silhouette denominator vanishes.
        let raw = ["ACGTACGT", "ACGTACGT", "ACGTACGT"];
        let err = sweep(&raw, 4, 2, 3).unwrap_err();
        assert!(matches!(err, ClusterError::DegeneratePartition(_)));
    }

    #[test]
    fn test_out_of_range_candidate_fails() {
        let raw = ["ACGTACGT", "TTGGCCAA", "ACGTAAGT"];
        // k_max reaches the number of observations.
        assert!(sweep(&raw, 4, 2, 4).is_err());
        // k_min below 2.
        assert!(sweep(&raw, 4, 1, 3).is_err());
    }

    #[test]
    fn test_single_cluster_partition_rejected() {
        let dist = Array2::<f64>::zeros((3, 3));
        assert!(silhouette_score(&dist, &[1, 1, 1]).is_err());
    }
}
