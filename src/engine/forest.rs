//! Bagged decision-tree classifier for 3-way match outcomes.
//!
//! Each tree is a CART fit on a bootstrap resample of the training set with a
//! random feature subset considered at every split (gini impurity). The
//! ensemble probability is the average of the per-tree leaf distributions.
//! Everything is serde-serializable so the whole ensemble persists as part of
//! the model artifact.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fixed class count: home / away / draw.
pub const NUM_CLASSES: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestParams {
    pub trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    /// Features considered per split; 0 means √(num_features).
    pub features_per_split: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        ForestParams {
            trees: 100,
            max_depth: 12,
            min_samples_split: 4,
            features_per_split: 0,
        }
    }
}

/// Flat-arena tree node. Split nodes index into the owning tree's node vec.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        probs: [f64; NUM_CLASSES],
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    fn fit<R: Rng>(
        x: &[Vec<f64>],
        y: &[usize],
        indices: &[usize],
        params: &ForestParams,
        features_per_split: usize,
        rng: &mut R,
    ) -> Self {
        let mut tree = DecisionTree { nodes: Vec::new() };
        tree.build(x, y, indices, 0, params, features_per_split, rng);
        tree
    }

    /// Recursively grow the tree; returns the arena index of the built node.
    #[allow(clippy::too_many_arguments)]
    fn build<R: Rng>(
        &mut self,
        x: &[Vec<f64>],
        y: &[usize],
        indices: &[usize],
        depth: usize,
        params: &ForestParams,
        features_per_split: usize,
        rng: &mut R,
    ) -> usize {
        let counts = class_counts(y, indices);
        let impurity = gini(&counts, indices.len());

        let stop = depth >= params.max_depth
            || indices.len() < params.min_samples_split
            || impurity == 0.0;

        if !stop {
            if let Some((feature, threshold)) =
                best_split(x, y, indices, features_per_split, impurity, rng)
            {
                let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
                    .iter()
                    .copied()
                    .partition(|&i| x[i][feature] <= threshold);
                if !left_idx.is_empty() && !right_idx.is_empty() {
                    // Reserve our slot before the children claim theirs.
                    let node_idx = self.nodes.len();
                    self.nodes.push(Node::Leaf {
                        probs: [0.0; NUM_CLASSES],
                    });
                    let left =
                        self.build(x, y, &left_idx, depth + 1, params, features_per_split, rng);
                    let right =
                        self.build(x, y, &right_idx, depth + 1, params, features_per_split, rng);
                    self.nodes[node_idx] = Node::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    };
                    return node_idx;
                }
            }
        }

        let total = indices.len().max(1) as f64;
        let mut probs = [0.0; NUM_CLASSES];
        for (c, &count) in counts.iter().enumerate() {
            probs[c] = count as f64 / total;
        }
        let node_idx = self.nodes.len();
        self.nodes.push(Node::Leaf { probs });
        node_idx
    }

    fn predict_proba(&self, features: &[f64]) -> [f64; NUM_CLASSES] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { probs } => return *probs,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

/// Bagged ensemble of decision trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forest {
    trees: Vec<DecisionTree>,
    num_features: usize,
}

impl Forest {
    /// Fit `params.trees` trees, each on a bootstrap resample of the rows.
    pub fn fit<R: Rng>(x: &[Vec<f64>], y: &[usize], params: &ForestParams, rng: &mut R) -> Self {
        assert!(!x.is_empty(), "training set must not be empty");
        assert_eq!(x.len(), y.len(), "feature/label row count mismatch");

        let num_features = x[0].len();
        let features_per_split = if params.features_per_split == 0 {
            (num_features as f64).sqrt().round().max(1.0) as usize
        } else {
            params.features_per_split.min(num_features)
        };

        let n = x.len();
        let trees = (0..params.trees)
            .map(|_| {
                let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                DecisionTree::fit(x, y, &sample, params, features_per_split, rng)
            })
            .collect();

        Forest {
            trees,
            num_features,
        }
    }

    /// Average per-tree leaf distributions into one 3-way distribution.
    pub fn predict_proba(&self, features: &[f64]) -> [f64; NUM_CLASSES] {
        assert_eq!(features.len(), self.num_features, "feature width mismatch");
        let mut acc = [0.0; NUM_CLASSES];
        for tree in &self.trees {
            let p = tree.predict_proba(features);
            for c in 0..NUM_CLASSES {
                acc[c] += p[c];
            }
        }
        let n = self.trees.len().max(1) as f64;
        for p in &mut acc {
            *p /= n;
        }
        acc
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }
}

fn class_counts(y: &[usize], indices: &[usize]) -> [usize; NUM_CLASSES] {
    let mut counts = [0usize; NUM_CLASSES];
    for &i in indices {
        counts[y[i]] += 1;
    }
    counts
}

fn gini(counts: &[usize; NUM_CLASSES], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

/// Pick the (feature, threshold) pair with the best weighted-gini reduction
/// over a random feature subset. Returns `None` when no candidate split
/// improves on the parent impurity.
fn best_split<R: Rng>(
    x: &[Vec<f64>],
    y: &[usize],
    indices: &[usize],
    features_per_split: usize,
    parent_impurity: f64,
    rng: &mut R,
) -> Option<(usize, f64)> {
    let num_features = x[indices[0]].len();
    let mut candidates: Vec<usize> = (0..num_features).collect();
    candidates.shuffle(rng);
    candidates.truncate(features_per_split);

    let total = indices.len() as f64;
    let mut best: Option<(usize, f64)> = None;
    let mut best_impurity = parent_impurity;

    for &feature in &candidates {
        // Sort sample rows by this feature and sweep split points between
        // consecutive distinct values, keeping running class counts.
        let mut order: Vec<usize> = indices.to_vec();
        order.sort_by(|&a, &b| {
            x[a][feature]
                .partial_cmp(&x[b][feature])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut left_counts = [0usize; NUM_CLASSES];
        let mut right_counts = class_counts(y, indices);

        for w in 0..order.len() - 1 {
            let i = order[w];
            left_counts[y[i]] += 1;
            right_counts[y[i]] -= 1;

            let v = x[i][feature];
            let v_next = x[order[w + 1]][feature];
            if v == v_next {
                continue;
            }

            let n_left = w + 1;
            let n_right = order.len() - n_left;
            let weighted = (n_left as f64 / total) * gini(&left_counts, n_left)
                + (n_right as f64 / total) * gini(&right_counts, n_right);
            if weighted < best_impurity {
                best_impurity = weighted;
                best = Some((feature, (v + v_next) / 2.0));
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Three well-separated clusters in 2D, one per class.
    fn clustered_data() -> (Vec<Vec<f64>>, Vec<usize>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..30 {
            let jitter = (i % 5) as f64 * 0.01;
            x.push(vec![0.1 + jitter, 0.1 + jitter]);
            y.push(0);
            x.push(vec![0.9 + jitter, 0.1 + jitter]);
            y.push(1);
            x.push(vec![0.5 + jitter, 0.9 + jitter]);
            y.push(2);
        }
        (x, y)
    }

    fn small_params() -> ForestParams {
        ForestParams {
            trees: 15,
            max_depth: 6,
            min_samples_split: 2,
            features_per_split: 0,
        }
    }

    #[test]
    fn learns_separable_clusters() {
        let (x, y) = clustered_data();
        let mut rng = StdRng::seed_from_u64(7);
        let forest = Forest::fit(&x, &y, &small_params(), &mut rng);

        let p0 = forest.predict_proba(&[0.1, 0.1]);
        let p1 = forest.predict_proba(&[0.9, 0.1]);
        let p2 = forest.predict_proba(&[0.5, 0.9]);
        assert!(p0[0] > 0.8, "class 0 cluster: {:?}", p0);
        assert!(p1[1] > 0.8, "class 1 cluster: {:?}", p1);
        assert!(p2[2] > 0.8, "class 2 cluster: {:?}", p2);
    }

    #[test]
    fn probabilities_sum_to_one() {
        let (x, y) = clustered_data();
        let mut rng = StdRng::seed_from_u64(7);
        let forest = Forest::fit(&x, &y, &small_params(), &mut rng);
        let p = forest.predict_proba(&[0.4, 0.4]);
        assert_relative_eq!(p.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        assert!(p.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn same_seed_same_forest() {
        let (x, y) = clustered_data();
        let f1 = Forest::fit(&x, &y, &small_params(), &mut StdRng::seed_from_u64(3));
        let f2 = Forest::fit(&x, &y, &small_params(), &mut StdRng::seed_from_u64(3));
        let p1 = f1.predict_proba(&[0.3, 0.6]);
        let p2 = f2.predict_proba(&[0.3, 0.6]);
        for c in 0..NUM_CLASSES {
            assert_relative_eq!(p1[c], p2[c], epsilon = 1e-12);
        }
    }

    #[test]
    fn serde_round_trip_preserves_predictions() {
        let (x, y) = clustered_data();
        let mut rng = StdRng::seed_from_u64(11);
        let forest = Forest::fit(&x, &y, &small_params(), &mut rng);
        let json = serde_json::to_string(&forest).expect("serialize");
        let restored: Forest = serde_json::from_str(&json).expect("deserialize");
        let a = forest.predict_proba(&[0.2, 0.3]);
        let b = restored.predict_proba(&[0.2, 0.3]);
        for c in 0..NUM_CLASSES {
            assert_relative_eq!(a[c], b[c], epsilon = 1e-12);
        }
    }
}
