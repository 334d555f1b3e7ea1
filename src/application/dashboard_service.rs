// Dashboard service - Use case for building the dashboard view
use crate::application::dataset_service::Dataset;
use crate::domain::aggregation::{aggregate, AggregationBucket, GroupBy};
use crate::domain::asset::AssetRecord;
use crate::domain::dashboard::{AssetRow, Dashboard, FilterOptions};
use crate::domain::filter::FilterSpec;
use crate::domain::marker::{map_markers, MapMarker};
use crate::domain::series::{
    average_by_year, by_category_average, count_by_category, risk_factor_total_by_year,
    LabelOrder,
};
use std::sync::Arc;

/// One dashboard render: the active filters plus the map/table selection hint.
#[derive(Debug, Clone, Default)]
pub struct DashboardQuery {
    pub filter: FilterSpec,
    pub selected_id: Option<usize>,
    pub category_order: LabelOrder,
}

#[derive(Clone)]
pub struct DashboardService {
    dataset: Arc<Dataset>,
    // Category x year buckets of the whole dataset. The dataset never changes,
    // so this is computed once.
    category_year_buckets: Arc<Vec<AggregationBucket>>,
}

impl DashboardService {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let category_year_buckets =
            Arc::new(aggregate(dataset.records(), GroupBy::CategoryAndYear));
        Self {
            dataset,
            category_year_buckets,
        }
    }

    pub fn get_dashboard(&self, query: &DashboardQuery) -> Dashboard {
        let filtered = self.filtered(&query.filter);

        let average_by_category = by_category_average(
            &self.category_year_buckets,
            query.filter.year,
            query.filter.category(),
            query.category_order,
        );
        let filtered_buckets = aggregate(filtered.iter().copied(), GroupBy::CategoryAndYear);

        tracing::debug!(
            matched = filtered.len(),
            total = self.dataset.records().len(),
            "Building dashboard"
        );

        Dashboard {
            average_by_category,
            average_by_year: average_by_year(&filtered_buckets),
            asset_count_by_category: count_by_category(filtered.iter().copied()),
            risk_factors_by_year: risk_factor_total_by_year(filtered.iter().copied()),
            assets: filtered.iter().copied().map(AssetRow::from).collect(),
            markers: map_markers(filtered.iter().copied()),
            selected: query.selected_id.and_then(|id| self.get_asset(id)),
        }
    }

    pub fn list_assets(&self, filter: &FilterSpec) -> Vec<AssetRow> {
        filter.apply(self.dataset.records()).map(AssetRow::from).collect()
    }

    pub fn list_markers(&self, filter: &FilterSpec) -> Vec<MapMarker> {
        map_markers(filter.apply(self.dataset.records()))
    }

    pub fn get_asset(&self, id: usize) -> Option<AssetRow> {
        self.dataset.get(id).map(AssetRow::from)
    }

    pub fn filter_options(&self) -> FilterOptions {
        self.dataset.filter_options()
    }

    fn filtered(&self, filter: &FilterSpec) -> Vec<&AssetRecord> {
        filter.apply(self.dataset.records()).collect()
    }
}
