// JSON file repository implementation
use crate::application::asset_repository::AssetRepository;
use crate::application::normalizer::RawRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

/// Reads a JSON array of row objects, as exported from the source spreadsheet.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse_rows(&self, contents: &str) -> Result<Vec<RawRecord>> {
        let rows: Vec<Value> = serde_json::from_str(contents)
            .with_context(|| format!("{} is not a JSON array", self.path.display()))?;

        rows.into_iter()
            .enumerate()
            .map(|(index, row)| match row {
                Value::Object(map) => Ok(map),
                other => anyhow::bail!(
                    "row {} in {} is not an object: {}",
                    index,
                    self.path.display(),
                    other
                ),
            })
            .collect()
    }
}

#[async_trait]
impl AssetRepository for JsonFileRepository {
    fn source(&self) -> String {
        self.path.display().to_string()
    }

    async fn load_raw_records(&self) -> Result<Vec<RawRecord>> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read dataset {}", self.path.display()))?;

        let rows = self.parse_rows(&contents)?;
        tracing::debug!("Read {} raw rows from {}", rows.len(), self.path.display());
        Ok(rows)
    }
}
