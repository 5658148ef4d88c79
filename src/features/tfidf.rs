//! K-mer TF-IDF vectorization.
//!
//! Each sequence is mapped to a sparse vector over the vocabulary of all
//! length-k substrings observed across the corpus (character-level, no word
//! boundaries). Counts are weighted by smoothed inverse document frequency,
//! `ln((1 + n) / (1 + df)) + 1`, and every row is L2-normalized. The
//! vocabulary is data-dependent and unbounded.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::warn;
use sprs::{CsMat, TriMat};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("k-mer length must be at least 1, got {0}")]
    InvalidKmerLength(usize),
}

/// Corpus-level k-mer TF-IDF vectorizer.
pub struct KmerVectorizer {
    k: usize,
}

impl KmerVectorizer {
    pub fn new(k: usize) -> Result<Self, FeatureError> {
        if k == 0 {
            return Err(FeatureError::InvalidKmerLength(k));
        }
        Ok(KmerVectorizer { k })
    }

    /// Builds the vocabulary over `sequences` and returns the TF-IDF
    /// feature matrix, rows aligned to input order.
    ///
    /// Sequences shorter than k contribute no features and yield an
    /// all-zero row.
    pub fn fit_transform(&self, sequences: &[String]) -> CsMat<f64> {
        let n = sequences.len();
        let mut vocab: IndexMap<String, usize> = IndexMap::new();
        let mut df: Vec<usize> = Vec::new();
        let mut row_counts: Vec<HashMap<usize, usize>> = Vec::with_capacity(n);

        for (row, seq) in sequences.iter().enumerate() {
            let mut counts: HashMap<usize, usize> = HashMap::new();
            let bytes = seq.as_bytes();
            if bytes.len() >= self.k {
                for window in bytes.windows(self.k) {
                    let kmer = String::from_utf8_lossy(window).into_owned();
                    let col = if let Some(&c) = vocab.get(&kmer) {
                        c
                    } else {
                        let c = vocab.len();
                        vocab.insert(kmer, c);
                        df.push(0);
                        c
                    };
                    *counts.entry(col).or_insert(0) += 1;
                }
            } else {
                warn!(
                    "Sequence {} is shorter than k={}; it contributes no features",
                    row, self.k
                );
            }
            for &col in counts.keys() {
                df[col] += 1;
            }
            row_counts.push(counts);
        }

        // Smoothed inverse document frequency.
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n as f64) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let mut tri = TriMat::new((n, vocab.len()));
        for (row, counts) in row_counts.iter().enumerate() {
            let mut vals: Vec<(usize, f64)> = counts
                .iter()
                .map(|(&col, &tf)| (col, tf as f64 * idf[col]))
                .collect();
            let norm = vals.iter().map(|&(_, v)| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                vals.sort_unstable_by_key(|&(col, _)| col);
                for (col, v) in vals {
                    tri.add_triplet(row, col, v / norm);
                }
            }
        }
        tri.to_csr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seqs(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn row_dense(x: &CsMat<f64>, row: usize) -> Vec<f64> {
        let mut out = vec![0.0; x.cols()];
        if let Some(v) = x.outer_view(row) {
            for (col, val) in v.iter() {
                out[col] = *val;
            }
        }
        out
    }

    #[test]
    fn test_rows_aligned_to_input_order() {
        let x = KmerVectorizer::new(3)
            .unwrap()
            .fit_transform(&seqs(&["ACGTAC", "TTTTTT", "ACGTAC"]));
        assert_eq!(x.rows(), 3);
        // Identical sequences produce identical rows.
        assert_eq!(row_dense(&x, 0), row_dense(&x, 2));
        assert_ne!(row_dense(&x, 0), row_dense(&x, 1));
    }

    #[test]
    fn test_rows_are_l2_normalized() {
        let x = KmerVectorizer::new(2)
            .unwrap()
            .fit_transform(&seqs(&["ACGT", "GGCA"]));
        for row in 0..x.rows() {
            let norm: f64 = row_dense(&x, row).iter().map(|v| v * v).sum::<f64>();
            assert_relative_eq!(norm, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_short_sequence_yields_zero_row() {
        let x = KmerVectorizer::new(6)
            .unwrap()
            .fit_transform(&seqs(&["ACGTACGT", "ACG"]));
        assert_eq!(x.rows(), 2);
        assert_eq!(x.outer_view(1).map(|v| v.nnz()).unwrap_or(0), 0);
    }

    #[test]
    fn test_shared_kmers_do_not_dominate() {
        // "AAT" and "AAG" share the k-mer AA; the distinguishing k-mers AT
        // and AG keep the rows apart.
        let x = KmerVectorizer::new(2)
            .unwrap()
            .fit_transform(&seqs(&["AAT", "AAG"]));
        let a = row_dense(&x, 0);
        let b = row_dense(&x, 1);
        let dot: f64 = a.iter().zip(&b).map(|(u, v)| u * v).sum();
        assert!(dot > 0.0, "shared k-mer should give nonzero similarity");
        assert!(dot < 0.99, "distinguishing k-mers should keep rows apart");
    }

    #[test]
    fn test_zero_k_rejected() {
        assert!(KmerVectorizer::new(0).is_err());
    }
}
