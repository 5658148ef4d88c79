//! Pairwise distance computation.
//!
//! Distances are produced in condensed form: a vector of the n*(n-1)/2
//! upper-triangle entries in row-major order, expandable to a dense square
//! matrix with [`squareform`]. Cosine distance of an all-zero row is
//! undefined and propagates as NaN.

use clap::ValueEnum;
use itertools::Itertools;
use ndarray::Array2;
use sprs::CsMat;

/// Distance metric between feature vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Metric {
    /// 1 - cosine similarity.
    Cosine,
    /// L2 distance.
    Euclidean,
}

/// Index of the pair (i, j), i < j, in the condensed distance vector.
pub(crate) fn condensed_index(n: usize, i: usize, j: usize) -> usize {
    debug_assert!(i < j && j < n);
    n * i - i * (i + 1) / 2 + (j - i - 1)
}

/// Computes the condensed pairwise-distance vector over the rows of `x`.
pub fn pairwise_distances(x: &CsMat<f64>, metric: Metric) -> Vec<f64> {
    let rows: Vec<_> = x.outer_iterator().collect();
    let norms: Vec<f64> = rows.iter().map(|r| r.dot(r).sqrt()).collect();
    let n = rows.len();

    let mut condensed = Vec::with_capacity(n.saturating_sub(1) * n / 2);
    for (i, j) in (0..n).tuple_combinations() {
        let dot = rows[i].dot(&rows[j]);
        let d = match metric {
            Metric::Cosine => {
                if norms[i] == 0.0 || norms[j] == 0.0 {
                    f64::NAN
                } else {
                    1.0 - dot / (norms[i] * norms[j])
                }
            }
            Metric::Euclidean => {
                (norms[i] * norms[i] + norms[j] * norms[j] - 2.0 * dot).max(0.0).sqrt()
            }
        };
        condensed.push(d);
    }
    condensed
}

/// Expands a condensed distance vector into a dense symmetric matrix with a
/// zero diagonal.
pub fn squareform(condensed: &[f64], n: usize) -> Array2<f64> {
    let mut matrix = Array2::<f64>::zeros((n, n));
    for (i, j) in (0..n).tuple_combinations() {
        let d = condensed[condensed_index(n, i, j)];
        matrix[[i, j]] = d;
        matrix[[j, i]] = d;
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::KmerVectorizer;
    use approx::assert_relative_eq;

    fn features(raw: &[&str], k: usize) -> CsMat<f64> {
        let seqs: Vec<String> = raw.iter().map(|s| s.to_string()).collect();
        KmerVectorizer::new(k).unwrap().fit_transform(&seqs)
    }

    #[test]
    fn test_condensed_length_and_index() {
        let x = features(&["ACGTAC", "TTGGCC", "ACGTAA", "GGGGGG"], 3);
        let condensed = pairwise_distances(&x, Metric::Cosine);
        assert_eq!(condensed.len(), 6);
        assert_eq!(condensed_index(4, 0, 1), 0);
        assert_eq!(condensed_index(4, 0, 3), 2);
        assert_eq!(condensed_index(4, 2, 3), 5);
    }

    #[test]
    fn test_squareform_symmetric_zero_diagonal() {
        let x = features(&["ACGTACGT", "TTGGCCAA", "ACGTAAGT"], 3);
        let condensed = pairwise_distances(&x, Metric::Cosine);
        let m = squareform(&condensed, 3);
        for i in 0..3 {
            assert_relative_eq!(m[[i, i]], 0.0);
            for j in 0..3 {
                assert_relative_eq!(m[[i, j]], m[[j, i]]);
            }
        }
    }

    #[test]
    fn test_identical_rows_have_zero_cosine_distance() {
        let x = features(&["ACGTAC", "ACGTAC"], 3);
        let condensed = pairwise_distances(&x, Metric::Cosine);
        assert_relative_eq!(condensed[0], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_row_propagates_nan() {
        // Second sequence is shorter than k, so its feature row is zero.
        let x = features(&["ACGTACGT", "ACG"], 6);
        let condensed = pairwise_distances(&x, Metric::Cosine);
        assert!(condensed[0].is_nan());
    }

    #[test]
    fn test_single_substitution_closer_than_unrelated() {
        // Two sequences differing by one symbol inside a k-window are
        // strictly closer than an unrelated sequence of equal length.
        let x = features(
            &[
                "ACGTACGTACGTACGT",
                "ACGTACGAACGTACGT",
                "GGCCTTAAGGCCTTAA",
            ],
            6,
        );
        let condensed = pairwise_distances(&x, Metric::Cosine);
        let n = 3;
        let d_related = condensed[condensed_index(n, 0, 1)];
        let d_unrelated = condensed[condensed_index(n, 0, 2)];
        assert!(d_related > 0.0);
        assert!(d_related < d_unrelated);
    }

    #[test]
    fn test_euclidean_on_normalized_rows() {
        let x = features(&["ACGTAC", "ACGTAC", "TTTTTT"], 3);
        let condensed = pairwise_distances(&x, Metric::Euclidean);
        // Identical rows at distance zero, disjoint unit rows at sqrt(2).
        assert_relative_eq!(condensed[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(condensed[1], 2f64.sqrt(), epsilon = 1e-12);
    }
}
