// Asset domain model
use serde::Serialize;
use std::collections::BTreeMap;

/// Hazard name -> severity score. Unique keys within one record.
pub type RiskFactors = BTreeMap<String, f64>;

pub const RISK_FACTOR_DISPLAY_PLACES: i32 = 2;

/// Canonical asset record. Immutable once built by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    pub id: usize,
    pub asset_name: String,
    pub lat: f64,
    pub long: f64,
    pub business_category: String,
    pub risk_rating: f64,
    pub risk_factors: RiskFactors,
    pub year: i32,
}

impl AssetRecord {
    /// True when both coordinates fall inside the WGS84 ranges.
    /// Only map-facing output cares about this.
    pub fn has_valid_location(&self) -> bool {
        is_valid_lat(self.lat) && is_valid_long(self.long)
    }

    /// Copy of the risk factors rounded for display. The record keeps its raw values.
    pub fn rounded_risk_factors(&self) -> RiskFactors {
        self.risk_factors
            .iter()
            .map(|(name, value)| {
                (
                    name.clone(),
                    round_to_places(*value, RISK_FACTOR_DISPLAY_PLACES),
                )
            })
            .collect()
    }

    pub fn has_risk_factor(&self, name: &str) -> bool {
        self.risk_factors.contains_key(name)
    }

    pub fn risk_factor_count(&self) -> usize {
        self.risk_factors.len()
    }
}

pub fn is_valid_lat(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat)
}

pub fn is_valid_long(long: f64) -> bool {
    (-180.0..=180.0).contains(&long)
}

/// Round half away from zero at the given number of decimal places.
/// Values too large to scale are returned unchanged.
pub fn round_to_places(value: f64, places: i32) -> f64 {
    let multiplier = 10f64.powi(places);
    let scaled = value * multiplier;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / multiplier
}
