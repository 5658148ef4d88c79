//! Agglomerative linkage tree construction and flat-cluster cutting.
//!
//! Starts from singleton clusters and repeatedly merges the closest active
//! pair, recording each merge. Cluster ids follow the usual convention:
//! leaves are 0..n, the cluster formed by merge t is n + t. Inter-cluster
//! distances are maintained with the Lance-Williams update for the chosen
//! method.

use clap::ValueEnum;
use log::warn;

use super::distance::condensed_index;
use super::ClusterError;

/// Linkage criterion for the agglomeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LinkageMethod {
    /// Mean inter-cluster distance (UPGMA).
    Average,
    /// Minimum inter-cluster distance.
    Single,
    /// Maximum inter-cluster distance.
    Complete,
}

/// One merge step: the two cluster ids merged, the distance at which they
/// merged, and the size of the resulting cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct Merge {
    pub left: usize,
    pub right: usize,
    pub distance: f64,
    pub size: usize,
}

/// The full merge history over `n_leaves` observations.
#[derive(Debug, Clone)]
pub struct LinkageTree {
    n_leaves: usize,
    merges: Vec<Merge>,
}

/// Builds the linkage tree from a condensed distance vector over `n`
/// observations.
///
/// NaN distances (from zero feature rows) are never selected as a minimum,
/// which can make the merge order arbitrary; this is a known edge case and
/// is only warned about.
pub fn linkage(
    condensed: &[f64],
    n: usize,
    method: LinkageMethod,
) -> Result<LinkageTree, ClusterError> {
    if n == 0 {
        return Err(ClusterError::EmptyInput);
    }
    if condensed.iter().any(|d| d.is_nan()) {
        warn!("Distance vector contains NaN entries; merge order may be arbitrary");
    }

    // Working copy of the distances, indexed by cluster slot.
    let mut d = vec![vec![0.0f64; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let v = condensed[condensed_index(n, i, j)];
            d[i][j] = v;
            d[j][i] = v;
        }
    }

    let mut active = vec![true; n];
    let mut ids: Vec<usize> = (0..n).collect();
    let mut sizes = vec![1usize; n];
    let mut merges = Vec::with_capacity(n.saturating_sub(1));

    for step in 0..n.saturating_sub(1) {
        // Closest active pair; NaN distances lose every comparison, so a
        // fully-NaN frontier falls back to the first active pair.
        let mut best: Option<(usize, usize, f64)> = None;
        for i in 0..n {
            if !active[i] {
                continue;
            }
            for j in (i + 1)..n {
                if !active[j] {
                    continue;
                }
                match best {
                    None => best = Some((i, j, d[i][j])),
                    Some((_, _, bd)) if d[i][j] < bd => best = Some((i, j, d[i][j])),
                    _ => {}
                }
            }
        }
        let (i, j, dist) = best.expect("at least two active clusters remain");

        merges.push(Merge {
            left: ids[i].min(ids[j]),
            right: ids[i].max(ids[j]),
            distance: dist,
            size: sizes[i] + sizes[j],
        });

        // Lance-Williams update of distances from the merged cluster, stored
        // in slot i.
        let (si, sj) = (sizes[i] as f64, sizes[j] as f64);
        for k in 0..n {
            if !active[k] || k == i || k == j {
                continue;
            }
            d[i][k] = match method {
                LinkageMethod::Average => (si * d[i][k] + sj * d[j][k]) / (si + sj),
                LinkageMethod::Single => d[i][k].min(d[j][k]),
                LinkageMethod::Complete => d[i][k].max(d[j][k]),
            };
            d[k][i] = d[i][k];
        }
        ids[i] = n + step;
        sizes[i] += sizes[j];
        active[j] = false;
    }

    Ok(LinkageTree { n_leaves: n, merges })
}

impl LinkageTree {
    pub fn n_leaves(&self) -> usize {
        self.n_leaves
    }

    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    /// Children of a non-leaf cluster id, or None for a leaf.
    pub fn children(&self, id: usize) -> Option<(usize, usize)> {
        if id < self.n_leaves {
            None
        } else {
            let m = &self.merges[id - self.n_leaves];
            Some((m.left, m.right))
        }
    }

    /// Leaf ids in dendrogram drawing order (left-to-right tree traversal).
    pub fn leaf_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.n_leaves);
        if self.n_leaves == 0 {
            return order;
        }
        let root = if self.merges.is_empty() {
            0
        } else {
            self.n_leaves + self.merges.len() - 1
        };
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            match self.children(id) {
                None => order.push(id),
                Some((left, right)) => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        order
    }

    /// Cuts the tree into exactly `k` flat clusters (max-cluster criterion).
    ///
    /// Returns one label per leaf, in leaf order, with labels 1..=k assigned
    /// by first occurrence.
    pub fn cut(&self, k: usize) -> Result<Vec<usize>, ClusterError> {
        let n = self.n_leaves;
        if k == 0 || k > n {
            return Err(ClusterError::DegeneratePartition(format!(
                "cannot cut {} observations into {} clusters",
                n, k
            )));
        }

        // Union-find over leaves; apply the first n - k merges.
        let mut parent: Vec<usize> = (0..n).collect();
        fn find(parent: &mut Vec<usize>, x: usize) -> usize {
            let mut root = x;
            while parent[root] != root {
                root = parent[root];
            }
            let mut cur = x;
            while parent[cur] != root {
                let next = parent[cur];
                parent[cur] = root;
                cur = next;
            }
            root
        }

        // Representative leaf for every cluster id seen so far.
        let mut rep: Vec<usize> = (0..n).collect();
        for (t, merge) in self.merges.iter().take(n - k).enumerate() {
            let (a, b) = (rep[merge.left], rep[merge.right]);
            let (ra, rb) = (find(&mut parent, a), find(&mut parent, b));
            parent[rb] = ra;
            rep.push(a);
            debug_assert_eq!(rep.len(), n + t + 1);
        }

        // Relabel roots to 1..=k in leaf order.
        let mut labels = vec![0usize; n];
        let mut next_label = 0usize;
        let mut root_label = vec![0usize; n];
        for leaf in 0..n {
            let root = find(&mut parent, leaf);
            if root_label[root] == 0 {
                next_label += 1;
                root_label[root] = next_label;
            }
            labels[leaf] = root_label[root];
        }
        Ok(labels)
    }
}
