//! Persisted model artifact: JSON bundle of the tree, its schema and training metadata.

use super::{DecisionTree, FittedModel, ModelMetadata};
use crate::error::ArtifactError;
use crate::features::FeatureSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize)]
struct ArtifactFile {
    schema: Vec<String>,
    tree: DecisionTree,
    #[serde(flatten)]
    meta: ModelMetadata,
}

impl FittedModel {
    /// Write the artifact. Goes through a sibling temp file so a crash never leaves a torn file.
    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let file = ArtifactFile {
            schema: self.schema.names().into_iter().map(String::from).collect(),
            tree: self.tree.clone(),
            meta: self.meta.clone(),
        };
        let data = serde_json::to_vec_pretty(&file)?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Read an artifact written by [`FittedModel::save`] and check the tree against its schema.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let data = std::fs::read(path)?;
        let file: ArtifactFile = serde_json::from_slice(&data)?;
        let schema = FeatureSchema::from_names(file.schema.as_slice())
            .map_err(ArtifactError::SchemaMismatch)?;
        file.tree.validate().map_err(ArtifactError::SchemaMismatch)?;
        if file.tree.n_features() != schema.len() {
            return Err(ArtifactError::SchemaMismatch(format!(
                "tree expects {} features, schema has {} columns",
                file.tree.n_features(),
                schema.len()
            )));
        }
        Ok(Self {
            tree: file.tree,
            schema,
            meta: file.meta,
        })
    }
}
