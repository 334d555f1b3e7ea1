// Dashboard domain model
use super::asset::{AssetRecord, RiskFactors};
use super::marker::MapMarker;
use super::series::Series;
use serde::Serialize;

/// Table/tooltip view of a record. Risk factors are rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRow {
    pub id: usize,
    pub asset_name: String,
    pub lat: f64,
    pub long: f64,
    pub business_category: String,
    pub risk_rating: f64,
    pub risk_factors: RiskFactors,
    pub year: i32,
    pub geo_valid: bool,
}

impl From<&AssetRecord> for AssetRow {
    fn from(record: &AssetRecord) -> Self {
        Self {
            id: record.id,
            asset_name: record.asset_name.clone(),
            lat: record.lat,
            long: record.long,
            business_category: record.business_category.clone(),
            risk_rating: record.risk_rating,
            risk_factors: record.rounded_risk_factors(),
            year: record.year,
            geo_valid: record.has_valid_location(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub average_by_category: Series<String>,
    pub average_by_year: Series<i32>,
    pub asset_count_by_category: Series<String>,
    pub risk_factors_by_year: Series<i32>,
    pub assets: Vec<AssetRow>,
    pub markers: Vec<MapMarker>,
    pub selected: Option<AssetRow>,
}

/// Options offered by the filter selectors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub business_categories: Vec<String>,
    pub risk_factors: Vec<String>,
    pub risk_ratings: Vec<f64>,
}
