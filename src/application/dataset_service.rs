// Dataset service - loads and normalizes the asset dataset once
use crate::application::asset_repository::AssetRepository;
use crate::application::normalizer::Normalizer;
use crate::domain::asset::{round_to_places, AssetRecord};
use crate::domain::dashboard::FilterOptions;
use std::collections::BTreeSet;
use std::sync::Arc;

const RISK_RATING_STEPS: usize = 10;

/// Normalized records of one load, ordered by id. Immutable after load.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<AssetRecord>,
    failed_ids: Vec<usize>,
}

impl Dataset {
    pub fn new(mut records: Vec<AssetRecord>, failed_ids: Vec<usize>) -> Self {
        records.sort_by_key(|record| record.id);
        Self {
            records,
            failed_ids,
        }
    }

    pub fn records(&self) -> &[AssetRecord] {
        &self.records
    }

    pub fn failed_ids(&self) -> &[usize] {
        &self.failed_ids
    }

    /// Snapshot for tooltip/detail display. None for unknown or rejected ids.
    pub fn get(&self, id: usize) -> Option<&AssetRecord> {
        self.records
            .binary_search_by_key(&id, |record| record.id)
            .ok()
            .map(|index| &self.records[index])
    }

    pub fn filter_options(&self) -> FilterOptions {
        let years: BTreeSet<i32> = self.records.iter().map(|r| r.year).collect();
        let categories: BTreeSet<&str> = self
            .records
            .iter()
            .map(|r| r.business_category.as_str())
            .collect();
        let factors: BTreeSet<&str> = self
            .records
            .iter()
            .flat_map(|r| r.risk_factors.keys().map(String::as_str))
            .collect();

        FilterOptions {
            years: years.into_iter().collect(),
            business_categories: categories.into_iter().map(str::to_string).collect(),
            risk_factors: factors.into_iter().map(str::to_string).collect(),
            risk_ratings: (0..=RISK_RATING_STEPS)
                .map(|step| round_to_places(step as f64 / RISK_RATING_STEPS as f64, 1))
                .collect(),
        }
    }
}

#[derive(Clone)]
pub struct DatasetService {
    repository: Arc<dyn AssetRepository>,
    normalizer: Normalizer,
}

impl DatasetService {
    pub fn new(repository: Arc<dyn AssetRepository>, normalizer: Normalizer) -> Self {
        Self {
            repository,
            normalizer,
        }
    }

    /// Malformed rows are logged and skipped; only an unobtainable dataset is an error.
    pub async fn load(&self) -> anyhow::Result<Dataset> {
        let source = self.repository.source();
        let rows = self.repository.load_raw_records().await?;
        let report = self.normalizer.normalize(&rows);

        for failure in &report.failures {
            tracing::warn!(
                id = failure.id,
                reason = %failure.reason,
                "Skipping asset row from {}",
                source
            );
        }

        tracing::info!(
            loaded = report.records.len(),
            failed = report.failures.len(),
            "Loaded asset dataset from {}",
            source
        );

        let failed_ids = report.failures.iter().map(|f| f.id).collect();
        Ok(Dataset::new(report.records, failed_ids))
    }
}
