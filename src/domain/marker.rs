// Map-facing projection of asset records
use super::asset::AssetRecord;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RiskBand {
    Low,
    Moderate,
    High,
    Severe,
}

impl RiskBand {
    pub fn for_rating(risk_rating: f64) -> Self {
        if risk_rating < 0.25 {
            Self::Low
        } else if risk_rating < 0.5 {
            Self::Moderate
        } else if risk_rating < 0.75 {
            Self::High
        } else {
            Self::Severe
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Low => "green",
            Self::Moderate => "yellow",
            Self::High => "orange",
            Self::Severe => "red",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    pub id: usize,
    pub asset_name: String,
    pub business_category: String,
    pub lat: f64,
    pub long: f64,
    pub risk_rating: f64,
    pub band: RiskBand,
    pub color: &'static str,
}

impl MapMarker {
    /// None when the record's coordinates cannot be placed on a map.
    pub fn from_record(record: &AssetRecord) -> Option<Self> {
        if !record.has_valid_location() {
            return None;
        }
        let band = RiskBand::for_rating(record.risk_rating);
        Some(Self {
            id: record.id,
            asset_name: record.asset_name.clone(),
            business_category: record.business_category.clone(),
            lat: record.lat,
            long: record.long,
            risk_rating: record.risk_rating,
            band,
            color: band.color(),
        })
    }
}

pub fn map_markers<'a, I>(records: I) -> Vec<MapMarker>
where
    I: IntoIterator<Item = &'a AssetRecord>,
{
    records.into_iter().filter_map(MapMarker::from_record).collect()
}
