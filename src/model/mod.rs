//! Approval classifier and the fitted model bundle (classifier + frozen feature schema).

mod artifact;
mod tree;

pub use tree::{DecisionTree, TreeParams};

use crate::error::{ModelError, TrainingDataError};
use crate::features::{FeatureEncoder, FeatureSchema, FeatureVector, TrainingSet};
use chrono::{DateTime, Utc};
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

/// Class probabilities; `reject + approve == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probabilities {
    pub reject: f64,
    pub approve: f64,
}

/// Binary approve/reject classifier over numeric feature rows.
pub trait Classifier {
    fn fit(&mut self, x: ArrayView2<'_, f32>, y: &[bool]) -> Result<(), ModelError>;

    fn predict_probability(&self, x: &[f32]) -> Result<Probabilities, ModelError>;

    /// `true` = approve. Ties go to reject.
    fn predict_label(&self, x: &[f32]) -> Result<bool, ModelError> {
        let p = self.predict_probability(x)?;
        Ok(p.approve > p.reject)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub trained_at: DateTime<Utc>,
    pub training_rows: usize,
    /// SHA-256 of the training file the model was fitted on
    pub dataset_sha256: String,
}

/// A fitted classifier and the schema its input vectors must follow. Immutable once built.
#[derive(Debug, Clone)]
pub struct FittedModel {
    tree: DecisionTree,
    schema: FeatureSchema,
    meta: ModelMetadata,
}

impl FittedModel {
    /// Encode the training set and fit a tree on it.
    pub fn train(
        set: &TrainingSet,
        encoder: &FeatureEncoder,
        params: TreeParams,
    ) -> Result<Self, TrainingDataError> {
        let (matrix, schema) = encoder
            .encode_batch(&set.rows)
            .map_err(|(row, source)| TrainingDataError::InvalidValue { row: row + 1, source })?;
        let mut tree = DecisionTree::new(params);
        tree.fit(matrix.view(), &set.labels)?;
        tracing::info!(
            rows = set.len(),
            columns = schema.len(),
            nodes = tree.node_count(),
            depth = tree.depth(),
            "decision tree fitted"
        );
        Ok(Self {
            tree,
            schema,
            meta: ModelMetadata {
                trained_at: Utc::now(),
                training_rows: set.len(),
                dataset_sha256: set.sha256.clone(),
            },
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.meta
    }

    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }

    pub fn predict_probability(&self, v: &FeatureVector) -> Result<Probabilities, ModelError> {
        self.tree.predict_probability(v.as_slice())
    }

    pub fn predict_label(&self, v: &FeatureVector) -> Result<bool, ModelError> {
        self.tree.predict_label(v.as_slice())
    }
}
