// Repository trait for raw asset data access
use crate::application::normalizer::RawRecord;
use async_trait::async_trait;

#[async_trait]
pub trait AssetRepository: Send + Sync {
    /// Human readable origin of the rows, for diagnostics
    fn source(&self) -> String;

    /// Load every raw row, in source order.
    /// Fails only when the dataset as a whole cannot be obtained.
    async fn load_raw_records(&self) -> anyhow::Result<Vec<RawRecord>>;
}
