// Record normalizer - raw heterogeneous rows into canonical asset records
use crate::domain::asset::{AssetRecord, RiskFactors};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// One decoded CSV/JSON row: arbitrary keys to text, number or serialized text.
pub type RawRecord = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    AssetName,
    Lat,
    Long,
    BusinessCategory,
    RiskRating,
    RiskFactors,
    Year,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AssetName => "assetName",
            Self::Lat => "lat",
            Self::Long => "long",
            Self::BusinessCategory => "businessCategory",
            Self::RiskRating => "riskRating",
            Self::RiskFactors => "riskFactors",
            Self::Year => "year",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum NormalizationError {
    #[error("missing field {0}")]
    MissingField(Field),

    #[error("field {0} is empty")]
    EmptyField(Field),

    #[error("field {field} is not text: {value}")]
    InvalidText { field: Field, value: Value },

    #[error("field {field} is not a number: {value}")]
    InvalidNumber { field: Field, value: Value },

    #[error("field {field} is not an integer: {value}")]
    InvalidInteger { field: Field, value: Value },

    #[error("risk factors could not be decoded: {0}")]
    RiskFactors(#[from] serde_json::Error),
}

/// Canonical field -> source keys, tried in order.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AliasTable {
    #[serde(default = "default_asset_name")]
    pub asset_name: Vec<String>,
    #[serde(default = "default_lat")]
    pub lat: Vec<String>,
    #[serde(default = "default_long")]
    pub long: Vec<String>,
    #[serde(default = "default_business_category")]
    pub business_category: Vec<String>,
    #[serde(default = "default_risk_rating")]
    pub risk_rating: Vec<String>,
    #[serde(default = "default_risk_factors")]
    pub risk_factors: Vec<String>,
    #[serde(default = "default_year")]
    pub year: Vec<String>,
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn default_asset_name() -> Vec<String> {
    keys(&["Asset Name", "assetName", "asset_name"])
}

fn default_lat() -> Vec<String> {
    keys(&["Lat", "lat", "latitude"])
}

fn default_long() -> Vec<String> {
    keys(&["Long", "long", "lng", "longitude"])
}

fn default_business_category() -> Vec<String> {
    keys(&["Business Category", "businessCategory", "business_category"])
}

fn default_risk_rating() -> Vec<String> {
    keys(&["Risk Rating", "riskRating", "risk_rating"])
}

fn default_risk_factors() -> Vec<String> {
    keys(&["Risk Factors", "riskFactors", "risk_factors"])
}

fn default_year() -> Vec<String> {
    keys(&["Year", "year"])
}

impl Default for AliasTable {
    fn default() -> Self {
        Self {
            asset_name: default_asset_name(),
            lat: default_lat(),
            long: default_long(),
            business_category: default_business_category(),
            risk_rating: default_risk_rating(),
            risk_factors: default_risk_factors(),
            year: default_year(),
        }
    }
}

impl AliasTable {
    fn aliases(&self, field: Field) -> &[String] {
        match field {
            Field::AssetName => &self.asset_name,
            Field::Lat => &self.lat,
            Field::Long => &self.long,
            Field::BusinessCategory => &self.business_category,
            Field::RiskRating => &self.risk_rating,
            Field::RiskFactors => &self.risk_factors,
            Field::Year => &self.year,
        }
    }

    /// First alias present with a non-null value.
    fn resolve<'r>(&self, raw: &'r RawRecord, field: Field) -> Result<&'r Value, NormalizationError> {
        self.aliases(field)
            .iter()
            .filter_map(|key| raw.get(key))
            .find(|value| !value.is_null())
            .ok_or(NormalizationError::MissingField(field))
    }
}

#[derive(Debug)]
pub struct NormalizationFailure {
    pub id: usize,
    pub reason: NormalizationError,
}

#[derive(Debug, Default)]
pub struct NormalizationReport {
    pub records: Vec<AssetRecord>,
    pub failures: Vec<NormalizationFailure>,
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    aliases: AliasTable,
}

impl Normalizer {
    pub fn new(aliases: AliasTable) -> Self {
        Self { aliases }
    }

    /// Lazily normalizes rows. Ids are input positions, assigned before validation,
    /// so a failed row never shifts the ids of the rows after it.
    pub fn iter<'a, I>(
        &'a self,
        raw: I,
    ) -> impl Iterator<Item = (usize, Result<AssetRecord, NormalizationError>)> + 'a
    where
        I: IntoIterator<Item = &'a RawRecord>,
        I::IntoIter: 'a,
    {
        raw.into_iter()
            .enumerate()
            .map(move |(id, row)| (id, self.normalize_one(id, row)))
    }

    pub fn normalize<'a, I>(&'a self, raw: I) -> NormalizationReport
    where
        I: IntoIterator<Item = &'a RawRecord>,
        I::IntoIter: 'a,
    {
        let mut report = NormalizationReport::default();
        for (id, result) in self.iter(raw) {
            match result {
                Ok(record) => report.records.push(record),
                Err(reason) => report.failures.push(NormalizationFailure { id, reason }),
            }
        }
        report
    }

    pub fn normalize_one(&self, id: usize, raw: &RawRecord) -> Result<AssetRecord, NormalizationError> {
        Ok(AssetRecord {
            id,
            asset_name: self.text(raw, Field::AssetName)?,
            lat: self.number(raw, Field::Lat)?,
            long: self.number(raw, Field::Long)?,
            business_category: self.text(raw, Field::BusinessCategory)?,
            risk_rating: self.number(raw, Field::RiskRating)?,
            risk_factors: self.risk_factors(raw)?,
            year: self.integer(raw, Field::Year)?,
        })
    }

    fn text(&self, raw: &RawRecord, field: Field) -> Result<String, NormalizationError> {
        let value = self.aliases.resolve(raw, field)?;
        let text = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => {
                return Err(NormalizationError::InvalidText {
                    field,
                    value: other.clone(),
                })
            }
        };
        if text.is_empty() {
            return Err(NormalizationError::EmptyField(field));
        }
        Ok(text)
    }

    fn number(&self, raw: &RawRecord, field: Field) -> Result<f64, NormalizationError> {
        let value = self.aliases.resolve(raw, field)?;
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed
            .filter(|n| n.is_finite())
            .ok_or_else(|| NormalizationError::InvalidNumber {
                field,
                value: value.clone(),
            })
    }

    fn integer(&self, raw: &RawRecord, field: Field) -> Result<i32, NormalizationError> {
        let value = self.aliases.resolve(raw, field)?;
        let parsed = match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        parsed
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| NormalizationError::InvalidInteger {
                field,
                value: value.clone(),
            })
    }

    /// Serialized JSON text, or an already-decoded object.
    fn risk_factors(&self, raw: &RawRecord) -> Result<RiskFactors, NormalizationError> {
        let value = self.aliases.resolve(raw, Field::RiskFactors)?;
        let factors = match value {
            Value::String(blob) => serde_json::from_str(blob)?,
            other => RiskFactors::deserialize(other)?,
        };
        Ok(factors)
    }
}
