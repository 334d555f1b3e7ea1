// Filter engine - conjunction of optional predicates over asset records
use super::asset::{round_to_places, AssetRecord};

/// Ratings are compared at this precision, matching the 0.1-step rating selector
/// and the two-decimal display of table values.
const RATING_MATCH_PLACES: i32 = 2;

/// One view's active filters. Absent fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub year: Option<i32>,
    pub business_category: Option<String>,
    pub risk_factor_key: Option<String>,
    pub risk_rating: Option<f64>,
    pub name_substring: Option<String>,
}

impl FilterSpec {
    pub fn is_empty(&self) -> bool {
        self.year.is_none()
            && self.category().is_none()
            && self.risk_factor().is_none()
            && self.risk_rating.is_none()
            && self.name_needle().is_none()
    }

    /// A record passes iff every configured predicate accepts it.
    pub fn matches(&self, record: &AssetRecord) -> bool {
        let matches_year = self.year.is_none_or(|year| record.year == year);
        let matches_category = self
            .category()
            .is_none_or(|category| record.business_category == category);
        let matches_risk_factor = self
            .risk_factor()
            .is_none_or(|key| record.has_risk_factor(key));
        let matches_rating = self.risk_rating.is_none_or(|rating| {
            round_to_places(record.risk_rating, RATING_MATCH_PLACES)
                == round_to_places(rating, RATING_MATCH_PLACES)
        });
        let matches_name = self
            .name_needle()
            .is_none_or(|needle| record.asset_name.to_lowercase().contains(&needle));

        matches_year && matches_category && matches_risk_factor && matches_rating && matches_name
    }

    /// Lazily yields the matching records in input order. Restartable: call again
    /// for a fresh pass. Yielded records borrow from `records`, not from the filter.
    pub fn apply<'s, 'r>(
        &'s self,
        records: &'r [AssetRecord],
    ) -> impl Iterator<Item = &'r AssetRecord> + use<'s, 'r> {
        records.iter().filter(move |record| self.matches(record))
    }

    /// Category constraint, with an empty string treated as absent.
    pub fn category(&self) -> Option<&str> {
        non_empty(&self.business_category)
    }

    pub fn risk_factor(&self) -> Option<&str> {
        non_empty(&self.risk_factor_key)
    }

    fn name_needle(&self) -> Option<String> {
        non_empty(&self.name_substring).map(str::to_lowercase)
    }
}

/// An empty text field counts as absent.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::fixtures::{asset, with_factors};

    fn sample() -> Vec<AssetRecord> {
        vec![
            asset(0, "Energy", 2030, 0.4),
            asset(1, "Energy", 2030, 0.6),
            asset(2, "Retail", 2030, 0.2),
        ]
    }

    fn ids<'a>(records: impl Iterator<Item = &'a AssetRecord>) -> Vec<usize> {
        records.map(|r| r.id).collect()
    }

    #[test]
    fn test_empty_spec_is_identity() {
        let records = sample();
        let spec = FilterSpec::default();

        assert!(spec.is_empty());
        assert_eq!(ids(spec.apply(&records)), vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_text_fields_impose_no_constraint() {
        let records = sample();
        let specs = [
            FilterSpec {
                name_substring: Some(String::new()),
                ..Default::default()
            },
            FilterSpec {
                business_category: Some(String::new()),
                ..Default::default()
            },
            FilterSpec {
                risk_factor_key: Some(String::new()),
                ..Default::default()
            },
            FilterSpec {
                business_category: Some(String::new()),
                risk_factor_key: Some(String::new()),
                name_substring: Some(String::new()),
                ..Default::default()
            },
        ];

        for spec in &specs {
            assert!(spec.is_empty(), "{:?}", spec);
            assert_eq!(ids(spec.apply(&records)), vec![0, 1, 2]);
        }
    }

    #[test]
    fn test_results_outlive_the_filter() {
        let records = sample();
        let matched: Vec<&AssetRecord> = {
            let spec = FilterSpec {
                business_category: Some("Retail".to_string()),
                ..Default::default()
            };
            spec.apply(&records).collect()
        };

        assert_eq!(ids(matched.into_iter()), vec![2]);
    }

    #[test]
    fn test_category_filter_keeps_relative_order() {
        let records = sample();
        let spec = FilterSpec {
            business_category: Some("Energy".to_string()),
            ..Default::default()
        };

        let filtered: Vec<&AssetRecord> = spec.apply(&records).collect();
        assert_eq!(filtered, vec![&records[0], &records[1]]);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let records = sample();
        let spec = FilterSpec {
            year: Some(2030),
            risk_rating: Some(0.6),
            ..Default::default()
        };

        let first: Vec<AssetRecord> = spec.apply(&records).cloned().collect();
        let second: Vec<AssetRecord> = spec.apply(&first).cloned().collect();
        assert_eq!(first, second);
        assert_eq!(ids(spec.apply(&records)), ids(spec.apply(&records)));
    }

    #[test]
    fn test_risk_factor_presence_ignores_value() {
        let records = vec![
            with_factors(asset(0, "Energy", 2030, 0.4), &[("Flooding", 0.0)]),
            with_factors(asset(1, "Energy", 2030, 0.4), &[("Wildfire", 0.9)]),
        ];
        let spec = FilterSpec {
            risk_factor_key: Some("Flooding".to_string()),
            ..Default::default()
        };

        assert_eq!(ids(spec.apply(&records)), vec![0]);
    }

    #[test]
    fn test_name_match_is_case_insensitive() {
        let mut records = sample();
        records[1].asset_name = "Northern Hydro Plant".to_string();
        let spec = FilterSpec {
            name_substring: Some("HYDRO".to_string()),
            ..Default::default()
        };

        assert_eq!(ids(spec.apply(&records)), vec![1]);
    }

    #[test]
    fn test_rating_zero_is_a_real_constraint() {
        let mut records = sample();
        records[2].risk_rating = 0.0;
        let spec = FilterSpec {
            risk_rating: Some(0.0),
            ..Default::default()
        };

        assert_eq!(ids(spec.apply(&records)), vec![2]);
    }

    #[test]
    fn test_nan_rating_matches_nothing() {
        let records = sample();
        let spec = FilterSpec {
            risk_rating: Some(f64::NAN),
            ..Default::default()
        };

        assert_eq!(spec.apply(&records).count(), 0);
    }

    #[test]
    fn test_predicates_are_anded() {
        let records = vec![
            with_factors(asset(0, "Energy", 2030, 0.4), &[("Flooding", 0.3)]),
            with_factors(asset(1, "Energy", 2040, 0.4), &[("Flooding", 0.3)]),
            with_factors(asset(2, "Retail", 2030, 0.4), &[("Flooding", 0.3)]),
            asset(3, "Energy", 2030, 0.4),
        ];
        let spec = FilterSpec {
            year: Some(2030),
            business_category: Some("Energy".to_string()),
            risk_factor_key: Some("Flooding".to_string()),
            ..Default::default()
        };

        assert_eq!(ids(spec.apply(&records)), vec![0]);
    }
}
