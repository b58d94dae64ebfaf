//! CART decision tree (gini impurity) for the approve/reject classes.
//!
//! Candidate features are visited in an order drawn from a seeded RNG at every node and
//! the first strictly best split wins, so a fixed seed gives a fixed tree.

use super::{Classifier, Probabilities};
use crate::error::ModelError;
use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

const IMPURITY_EPSILON: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub seed: u64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 7,
            min_samples_split: 2,
            min_samples_leaf: 1,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Node {
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
    /// Training sample counts per class reaching this leaf
    Leaf { reject: f64, approve: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    params: TreeParams,
    n_features: usize,
    nodes: Vec<Node>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f32,
    impurity: f64,
}

/// Class counts: `[reject, approve]`
type Counts = [f64; 2];

fn gini(c: &Counts) -> f64 {
    let n = c[0] + c[1];
    if n == 0.0 {
        return 0.0;
    }
    let (p0, p1) = (c[0] / n, c[1] / n);
    1.0 - p0 * p0 - p1 * p1
}

impl DecisionTree {
    pub fn new(params: TreeParams) -> Self {
        Self {
            params,
            n_features: 0,
            nodes: Vec::new(),
        }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Longest root-to-leaf path, in splits.
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], id: usize) -> usize {
            match nodes[id] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    /// Structural check for trees that did not come out of `fit` (e.g. deserialized).
    pub fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }
        for (id, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if feature >= self.n_features {
                        return Err(format!("node {id} splits on feature {feature} of {}", self.n_features));
                    }
                    if left <= id || right <= id || left >= self.nodes.len() || right >= self.nodes.len() {
                        return Err(format!("node {id} has invalid children"));
                    }
                }
                Node::Leaf { reject, approve } => {
                    if !(reject >= 0.0 && approve >= 0.0 && reject + approve > 0.0) {
                        return Err(format!("leaf {id} has no class weight"));
                    }
                }
            }
        }
        Ok(())
    }

    fn counts(y: &[bool], idx: &[usize]) -> Counts {
        let mut c = [0.0; 2];
        for &i in idx {
            c[y[i] as usize] += 1.0;
        }
        c
    }

    fn build(
        &mut self,
        x: &ArrayView2<'_, f32>,
        y: &[bool],
        idx: Vec<usize>,
        depth: usize,
        rng: &mut StdRng,
    ) -> usize {
        let counts = Self::counts(y, &idx);
        let n = idx.len();
        let p = &self.params;
        let is_leaf = depth >= p.max_depth
            || n < p.min_samples_split
            || n < 2 * p.min_samples_leaf
            || gini(&counts) <= IMPURITY_EPSILON;

        let split = if is_leaf {
            None
        } else {
            self.best_split(x, y, &idx, rng)
        };

        let Some(split) = split else {
            self.nodes.push(Node::Leaf {
                reject: counts[0],
                approve: counts[1],
            });
            return self.nodes.len() - 1;
        };

        let id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            reject: counts[0],
            approve: counts[1],
        });
        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = idx
            .into_iter()
            .partition(|&i| x[[i, split.feature]] <= split.threshold);
        let left = self.build(x, y, left_idx, depth + 1, rng);
        let right = self.build(x, y, right_idx, depth + 1, rng);
        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }

    fn best_split(
        &self,
        x: &ArrayView2<'_, f32>,
        y: &[bool],
        idx: &[usize],
        rng: &mut StdRng,
    ) -> Option<SplitCandidate> {
        let n = idx.len() as f64;
        let min_leaf = self.params.min_samples_leaf;
        let mut features: Vec<usize> = (0..self.n_features).collect();
        features.shuffle(rng);

        let mut best: Option<SplitCandidate> = None;
        let mut samples: Vec<(f32, bool)> = Vec::with_capacity(idx.len());
        for feature in features {
            samples.clear();
            samples.extend(idx.iter().map(|&i| (x[[i, feature]], y[i])));
            samples.sort_by(|a, b| a.0.total_cmp(&b.0));

            let total = Self::counts(y, idx);
            let mut left: Counts = [0.0; 2];
            for k in 0..samples.len() - 1 {
                left[samples[k].1 as usize] += 1.0;
                if samples[k].0 == samples[k + 1].0 {
                    continue;
                }
                let n_left = k + 1;
                if n_left < min_leaf || samples.len() - n_left < min_leaf {
                    continue;
                }
                let right = [total[0] - left[0], total[1] - left[1]];
                let nl = n_left as f64;
                let impurity = (nl * gini(&left) + (n - nl) * gini(&right)) / n;
                if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: (samples[k].0 + samples[k + 1].0) / 2.0,
                        impurity,
                    });
                }
            }
        }
        best
    }

    fn leaf_for(&self, x: &[f32]) -> Result<Counts, ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::NotTrained);
        }
        if x.len() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                got: x.len(),
            });
        }
        let mut id = 0;
        loop {
            match self.nodes[id] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => id = if x[feature] <= threshold { left } else { right },
                Node::Leaf { reject, approve } => return Ok([reject, approve]),
            }
        }
    }
}

impl Classifier for DecisionTree {
    fn fit(&mut self, x: ArrayView2<'_, f32>, y: &[bool]) -> Result<(), ModelError> {
        let (rows, cols) = x.dim();
        if rows == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }
        if rows != y.len() {
            return Err(ModelError::LabelCountMismatch {
                rows,
                labels: y.len(),
            });
        }
        self.nodes.clear();
        self.n_features = cols;
        let mut rng = StdRng::seed_from_u64(self.params.seed);
        self.build(&x, y, (0..rows).collect(), 0, &mut rng);
        Ok(())
    }

    fn predict_probability(&self, x: &[f32]) -> Result<Probabilities, ModelError> {
        let [reject, approve] = self.leaf_for(x)?;
        let total = reject + approve;
        Ok(Probabilities {
            reject: reject / total,
            approve: approve / total,
        })
    }
}
