//! Trained tier classifier exported to JSON.
//!
//! The artifact is a tagged object: `"kind": "random_forest"` carries the
//! flattened decision trees of a forest, `"kind": "logistic_regression"` the
//! per-class coefficients of a linear model. Class order matches the order the
//! estimator was fitted with, and ties resolve to the lowest class index.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use crate::classifier::{InferenceError, TierClassifier};
use crate::features::FeatureVector;

pub const BUILTIN_MODEL: &str = include_str!("data/sustainability_model.json");

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read model artifact from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    RandomForest(RandomForest),
    LogisticRegression(LogisticRegression),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RandomForest {
    classes: Vec<String>,
    n_features: usize,
    trees: Vec<DecisionTree>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
}

/// Flattened tree node. Samples with `x[feature] <= threshold` go left.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        leaf: Vec<f64>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogisticRegression {
    classes: Vec<String>,
    coefficients: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
}

impl ModelArtifact {
    pub fn builtin() -> Result<Self, ModelError> {
        Self::from_json_str(BUILTIN_MODEL)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = serde_json::from_str(json)?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let contents = fs::read_to_string(path).map_err(|source| ModelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn classes(&self) -> &[String] {
        match self {
            ModelArtifact::RandomForest(forest) => &forest.classes,
            ModelArtifact::LogisticRegression(linear) => &linear.classes,
        }
    }

    pub fn input_width(&self) -> usize {
        match self {
            ModelArtifact::RandomForest(forest) => forest.n_features,
            ModelArtifact::LogisticRegression(linear) => {
                linear.coefficients.first().map_or(0, Vec::len)
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::RandomForest(_) => "random_forest",
            ModelArtifact::LogisticRegression(_) => "logistic_regression",
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        let classes = self.classes();
        if classes.len() < 2 {
            return Err(invalid(format!(
                "expected at least 2 classes, found {}",
                classes.len()
            )));
        }
        match self {
            ModelArtifact::RandomForest(forest) => forest.validate(),
            ModelArtifact::LogisticRegression(linear) => linear.validate(),
        }
    }

    fn predict_row(&self, row: &FeatureVector) -> Result<&str, InferenceError> {
        let expected = self.input_width();
        if row.len() != expected {
            return Err(InferenceError::RowWidth {
                expected,
                actual: row.len(),
            });
        }
        if let Some((name, _)) = row.iter().find(|(_, value)| !value.is_finite()) {
            return Err(InferenceError::NonFinite {
                feature: name.to_string(),
            });
        }
        let class = match self {
            ModelArtifact::RandomForest(forest) => forest.predict_class(row.values())?,
            ModelArtifact::LogisticRegression(linear) => linear.predict_class(row.values()),
        };
        Ok(&self.classes()[class])
    }
}

impl TierClassifier for ModelArtifact {
    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<String>, InferenceError> {
        rows.iter()
            .map(|row| self.predict_row(row).map(str::to_string))
            .collect()
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.input_width())
    }
}

impl RandomForest {
    fn validate(&self) -> Result<(), ModelError> {
        if self.n_features == 0 {
            return Err(invalid("random forest declares zero features"));
        }
        if self.trees.is_empty() {
            return Err(invalid("random forest has no trees"));
        }
        for (tree_idx, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(invalid(format!("tree {tree_idx} has no nodes")));
            }
            for (node_idx, node) in tree.nodes.iter().enumerate() {
                match node {
                    TreeNode::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if *feature >= self.n_features {
                            return Err(invalid(format!(
                                "tree {tree_idx} node {node_idx} splits on feature {feature} of {}",
                                self.n_features
                            )));
                        }
                        if !threshold.is_finite() {
                            return Err(invalid(format!(
                                "tree {tree_idx} node {node_idx} has a non-finite threshold"
                            )));
                        }
                        // Children always follow their parent, which also rules out cycles.
                        for child in [*left, *right] {
                            if child <= node_idx || child >= tree.nodes.len() {
                                return Err(invalid(format!(
                                    "tree {tree_idx} node {node_idx} has out-of-order child {child}"
                                )));
                            }
                        }
                    }
                    TreeNode::Leaf { leaf } => {
                        if leaf.len() != self.classes.len() {
                            return Err(invalid(format!(
                                "tree {tree_idx} leaf {node_idx} has {} weights for {} classes",
                                leaf.len(),
                                self.classes.len()
                            )));
                        }
                        let total: f64 = leaf.iter().sum();
                        if leaf.iter().any(|w| !w.is_finite() || *w < 0.0) || total <= 0.0 {
                            return Err(invalid(format!(
                                "tree {tree_idx} leaf {node_idx} has invalid class weights"
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Average the normalized leaf distributions and take the arg-max.
    fn predict_class(&self, values: &[f64]) -> Result<usize, InferenceError> {
        let mut votes = vec![0.0f64; self.classes.len()];
        for (tree_idx, tree) in self.trees.iter().enumerate() {
            let leaf = tree.leaf_for(tree_idx, values)?;
            let total: f64 = leaf.iter().sum();
            for (vote, weight) in votes.iter_mut().zip(leaf) {
                *vote += weight / total;
            }
        }
        Ok(arg_max(&votes))
    }
}

impl DecisionTree {
    fn leaf_for(&self, tree_idx: usize, values: &[f64]) -> Result<&[f64], InferenceError> {
        let mut idx = 0usize;
        // Validated trees only move forward, so a walk never exceeds the node count.
        for _ in 0..self.nodes.len() {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { leaf }) => return Ok(leaf.as_slice()),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = values.get(*feature).copied().ok_or(InferenceError::BadNode {
                        tree: tree_idx,
                        node: idx,
                    })?;
                    idx = if value <= *threshold { *left } else { *right };
                }
                None => break,
            }
        }
        Err(InferenceError::BadNode {
            tree: tree_idx,
            node: idx,
        })
    }
}

impl LogisticRegression {
    fn is_binary(&self) -> bool {
        self.classes.len() == 2 && self.coefficients.len() == 1
    }

    fn validate(&self) -> Result<(), ModelError> {
        let rows = if self.is_binary() {
            1
        } else {
            self.classes.len()
        };
        if self.coefficients.len() != rows || self.intercepts.len() != rows {
            return Err(invalid(format!(
                "expected {rows} coefficient rows and intercepts, found {} and {}",
                self.coefficients.len(),
                self.intercepts.len()
            )));
        }
        let width = self.coefficients[0].len();
        if width == 0 {
            return Err(invalid("logistic regression declares zero features"));
        }
        if self.coefficients.iter().any(|row| row.len() != width) {
            return Err(invalid("coefficient rows differ in width"));
        }
        let all_finite = self
            .coefficients
            .iter()
            .flatten()
            .chain(self.intercepts.iter())
            .all(|value| value.is_finite());
        if !all_finite {
            return Err(invalid("coefficients must be finite"));
        }
        Ok(())
    }

    fn predict_class(&self, values: &[f64]) -> usize {
        let scores: Vec<f64> = self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(weights, intercept)| {
                weights
                    .iter()
                    .zip(values)
                    .map(|(weight, value)| weight * value)
                    .sum::<f64>()
                    + intercept
            })
            .collect();
        if self.is_binary() {
            usize::from(scores[0] > 0.0)
        } else {
            arg_max(&scores)
        }
    }
}

fn arg_max(scores: &[f64]) -> usize {
    let mut best = 0;
    for (idx, score) in scores.iter().enumerate().skip(1) {
        if *score > scores[best] {
            best = idx;
        }
    }
    best
}

fn invalid(reason: impl Into<String>) -> ModelError {
    ModelError::Invalid(reason.into())
}
