//! Artifact-backed trained models: random-forest regression and
//! one-vs-rest logistic text tagging
//!
//! Fitting happens offline; these types only load fitted parameters from
//! JSON and run inference.

use crate::error::{EngineError, Result};
use crate::features::FeatureVector;
use crate::predictors::{check_width, ScorePredictor, TagClassifier};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A node of a fitted regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Go left when `x[feature] <= threshold`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    fn validate(&self, tree: usize, n_features: usize) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(invalid_forest(format!("tree {} has no nodes", tree)));
        }

        for (index, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *feature >= n_features {
                    return Err(invalid_forest(format!(
                        "tree {} node {} splits on feature {} of {}",
                        tree, index, feature, n_features
                    )));
                }
                // Children always come after their parent, so traversal terminates
                for child in [*left, *right] {
                    if child <= index || child >= self.nodes.len() {
                        return Err(invalid_forest(format!(
                            "tree {} node {} has invalid child {}",
                            tree, index, child
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn predict(&self, x: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

fn invalid_forest(details: String) -> EngineError {
    EngineError::Configuration(format!("invalid score model: {}", details))
}

/// Random-forest regressor: mean of the per-tree leaf values.
///
/// Only constructed through `new` or `from_json`, so every tree is known
/// to terminate and stay within the declared feature width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForestScoreModel {
    feature_names: Vec<String>,
    trees: Vec<RegressionTree>,
}

/// On-disk layout of a forest artifact
#[derive(Deserialize)]
struct ForestArtifact {
    feature_names: Vec<String>,
    trees: Vec<RegressionTree>,
}

impl ForestScoreModel {
    pub fn new(feature_names: Vec<String>, trees: Vec<RegressionTree>) -> Result<Self> {
        let model = Self {
            feature_names,
            trees,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let artifact: ForestArtifact = serde_json::from_slice(bytes)
            .map_err(|e| EngineError::Configuration(format!("invalid score model: {}", e)))?;
        Self::new(artifact.feature_names, artifact.trees)
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(invalid_forest("no trees".to_string()));
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(index, self.feature_names.len())?;
        }
        Ok(())
    }
}

impl ScorePredictor for ForestScoreModel {
    fn name(&self) -> &'static str {
        "random_forest"
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, features: &FeatureVector<'_>) -> Result<f64> {
        check_width(self.name(), self.feature_names.len(), features)?;

        let x = features.values();
        let total: f64 = self.trees.iter().map(|tree| tree.predict(x)).sum();
        Ok(total / self.trees.len() as f64)
    }
}

/// TF-IDF features followed by one logistic regression per class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogisticTagModel {
    classes: Vec<String>,
    vocabulary: HashMap<String, usize>, // term -> column
    idf: Vec<f64>,
    ngram_range: (usize, usize),
    coef: Vec<Vec<f64>>, // [class][column]
    intercept: Vec<f64>,
}

/// On-disk layout of a text model artifact
#[derive(Deserialize)]
struct TextModelArtifact {
    classes: Vec<String>,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 2)
}

fn invalid_text_model(details: String) -> EngineError {
    EngineError::Configuration(format!("invalid text model: {}", details))
}

impl LogisticTagModel {
    pub fn new(
        classes: Vec<String>,
        vocabulary: HashMap<String, usize>,
        idf: Vec<f64>,
        ngram_range: (usize, usize),
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    ) -> Result<Self> {
        let model = Self {
            classes,
            vocabulary,
            idf,
            ngram_range,
            coef,
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let artifact: TextModelArtifact = serde_json::from_slice(bytes)
            .map_err(|e| invalid_text_model(e.to_string()))?;
        Self::new(
            artifact.classes,
            artifact.vocabulary,
            artifact.idf,
            artifact.ngram_range,
            artifact.coef,
            artifact.intercept,
        )
    }

    pub fn ngram_range(&self) -> (usize, usize) {
        self.ngram_range
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    fn validate(&self) -> Result<()> {
        let columns = self.idf.len();
        let (min_n, max_n) = self.ngram_range;

        if min_n == 0 || min_n > max_n {
            return Err(invalid_text_model(format!(
                "bad ngram range ({}, {})",
                min_n, max_n
            )));
        }
        if self.coef.len() != self.classes.len() || self.intercept.len() != self.classes.len() {
            return Err(invalid_text_model(format!(
                "{} classes but {} coefficient rows and {} intercepts",
                self.classes.len(),
                self.coef.len(),
                self.intercept.len()
            )));
        }
        if let Some(row) = self.coef.iter().position(|row| row.len() != columns) {
            return Err(invalid_text_model(format!(
                "coefficient row {} does not have {} columns",
                row, columns
            )));
        }
        if let Some((term, column)) = self.vocabulary.iter().find(|(_, c)| **c >= columns) {
            return Err(invalid_text_model(format!(
                "term '{}' maps to column {} of {}",
                term, column, columns
            )));
        }
        Ok(())
    }

    /// L2-normalized TF-IDF weights as sparse (column, weight) pairs
    fn tfidf(&self, text: &str) -> Vec<(usize, f64)> {
        let tokens = tokenize(text);
        let (min_n, max_n) = self.ngram_range;

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for n in min_n..=max_n {
            for window in tokens.windows(n) {
                if let Some(column) = self.vocabulary.get(&window.join(" ")) {
                    *counts.entry(*column).or_insert(0.0) += 1.0;
                }
            }
        }

        let mut weights: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(column, tf)| (column, tf * self.idf[column]))
            .collect();

        let norm = weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut weights {
                *w /= norm;
            }
        }
        weights
    }
}

/// Word tokens: runs of alphanumerics or '_' at least two characters long
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .collect()
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl TagClassifier for LogisticTagModel {
    fn name(&self) -> &'static str {
        "logistic_ovr"
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict_proba(&self, normalized_text: &str) -> Result<BTreeMap<String, f64>> {
        let x = self.tfidf(&normalized_text.to_lowercase());

        Ok(self
            .classes
            .iter()
            .zip(self.coef.iter().zip(&self.intercept))
            .map(|(class, (row, bias))| {
                let logit = bias + x.iter().map(|(column, w)| row[*column] * w).sum::<f64>();
                (class.clone(), sigmoid(logit))
            })
            .collect())
    }
}
