//! Regression trees grown by exact greedy split search
//!
//! Trees are fitted to first and second order gradients of the loss, so the
//! same builder serves every boosting round. Split quality uses the
//! regularised structure score
//!
//! ```text
//! score(G, H) = T(G)^2 / (H + lambda),   T(G) = sign(G) * max(|G| - alpha, 0)
//! ```
//!
//! and leaves carry the weight `-T(G) / (H + lambda)` scaled by the learning rate.

use crate::matrix::FeatureMatrix;
use serde::{Deserialize, Serialize};

/// Gains smaller than this are treated as no improvement
const RT_EPS: f64 = 1e-6;

/// A node of a regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Rows with `row[feature] < threshold` continue at `left`, the rest at `right`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Terminal node contributing `value` to the prediction
    Leaf { value: f64 },
}

impl Node {
    pub fn leaf(value: f64) -> Self {
        Node::Leaf { value }
    }

    pub fn split(feature: usize, threshold: f64, left: usize, right: usize) -> Self {
        Node::Split {
            feature,
            threshold,
            left,
            right,
        }
    }
}

/// A fitted regression tree, root at index 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Create a tree from its node table
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Walk the tree for one feature row
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(Node::Leaf { value }) => return *value,
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    idx = if row[*feature] < *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                None => return 0.0,
            }
        }
    }

    /// Number of leaves
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Depth of the deepest leaf (a lone leaf has depth 0)
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match nodes.get(idx) {
                Some(Node::Split { left, right, .. }) => {
                    1 + walk(nodes, *left).max(walk(nodes, *right))
                }
                _ => 0,
            }
        }
        walk(&self.nodes, 0)
    }
}

/// Growth parameters for a single tree
#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeParams {
    pub max_depth: usize,
    pub alpha: f64,
    pub lambda: f64,
    pub min_child_weight: f64,
    pub min_split_gain: f64,
    pub learning_rate: f64,
}

impl TreeParams {
    fn threshold_l1(&self, g: f64) -> f64 {
        if g > self.alpha {
            g - self.alpha
        } else if g < -self.alpha {
            g + self.alpha
        } else {
            0.0
        }
    }

    fn score(&self, g: f64, h: f64) -> f64 {
        let denom = h + self.lambda;
        if denom <= 0.0 {
            return 0.0;
        }
        let t = self.threshold_l1(g);
        t * t / denom
    }

    fn leaf_weight(&self, g: f64, h: f64) -> f64 {
        let denom = h + self.lambda;
        if denom <= 0.0 {
            return 0.0;
        }
        -self.threshold_l1(g) / denom
    }
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

/// Grows one tree over the rows in `x` restricted to `features`
pub(crate) struct TreeBuilder<'a> {
    x: &'a FeatureMatrix,
    grad: &'a [f64],
    hess: &'a [f64],
    features: &'a [usize],
    params: TreeParams,
    nodes: Vec<Node>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(
        x: &'a FeatureMatrix,
        grad: &'a [f64],
        hess: &'a [f64],
        features: &'a [usize],
        params: TreeParams,
    ) -> Self {
        Self {
            x,
            grad,
            hess,
            features,
            params,
            nodes: Vec::new(),
        }
    }

    pub fn build(mut self) -> RegressionTree {
        let rows: Vec<usize> = (0..self.x.n_rows()).collect();
        self.grow(rows, 0);
        RegressionTree::new(self.nodes)
    }

    fn grow(&mut self, rows: Vec<usize>, depth: usize) -> usize {
        let g: f64 = rows.iter().map(|&i| self.grad[i]).sum();
        let h: f64 = rows.iter().map(|&i| self.hess[i]).sum();

        let node_id = self.nodes.len();
        self.nodes.push(Node::leaf(0.0));

        if depth < self.params.max_depth {
            if let Some(best) = self.best_split(&rows, g, h) {
                let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
                    .iter()
                    .partition(|&&i| self.x.value(i, best.feature) < best.threshold);
                let left = self.grow(left_rows, depth + 1);
                let right = self.grow(right_rows, depth + 1);
                self.nodes[node_id] = Node::split(best.feature, best.threshold, left, right);
                return node_id;
            }
        }

        let value = self.params.leaf_weight(g, h) * self.params.learning_rate;
        self.nodes[node_id] = Node::leaf(value);
        node_id
    }

    fn best_split(&self, rows: &[usize], g: f64, h: f64) -> Option<SplitCandidate> {
        let parent_score = self.params.score(g, h);
        let mut best: Option<SplitCandidate> = None;
        let mut sorted = rows.to_vec();

        for &feature in self.features {
            sorted.sort_by(|&a, &b| self.x.value(a, feature).total_cmp(&self.x.value(b, feature)));

            let mut gl = 0.0;
            let mut hl = 0.0;
            for k in 0..sorted.len().saturating_sub(1) {
                let i = sorted[k];
                gl += self.grad[i];
                hl += self.hess[i];

                let here = self.x.value(i, feature);
                let next = self.x.value(sorted[k + 1], feature);
                if here == next {
                    continue;
                }

                let gr = g - gl;
                let hr = h - hl;
                if hl < self.params.min_child_weight || hr < self.params.min_child_weight {
                    continue;
                }

                let gain = 0.5
                    * (self.params.score(gl, hl) + self.params.score(gr, hr) - parent_score);
                let improves = match best {
                    Some(b) => gain > b.gain,
                    None => true,
                };
                if improves && gain > self.params.min_split_gain && gain >= RT_EPS {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: 0.5 * (here + next),
                        gain,
                    });
                }
            }
        }

        best
    }
}
